use std::collections::BTreeSet;

use serde::Serialize;

use crate::orders::normalize::format_order_date;
use crate::orders::types::RowSet;
use crate::state::AppState;

/// Valeurs alimentant les contrôles de filtrage de la barre latérale:
/// listes déroulantes (catégorie, moyen de paiement) et bornes du
/// sélecteur de dates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub moyens_paiement: Vec<String>,
    pub has_payment_method: bool,
    pub plage_dates: Option<(String, String)>,
}

pub fn build_filter_options(rows: &RowSet) -> FilterOptions {
    let categories: BTreeSet<&str> = rows
        .rows
        .iter()
        .map(|r| r.category.as_str())
        .filter(|c| !c.is_empty())
        .collect();

    let moyens_paiement: BTreeSet<&str> = if rows.has_payment_method {
        rows.rows
            .iter()
            .filter_map(|r| r.payment_method.as_deref())
            .collect()
    } else {
        BTreeSet::new()
    };

    let dates: Vec<_> = rows.rows.iter().filter_map(|r| r.order_date).collect();
    let plage_dates = match (dates.iter().min(), dates.iter().max()) {
        (Some(min), Some(max)) => Some((format_order_date(min), format_order_date(max))),
        _ => None,
    };

    FilterOptions {
        categories: categories.into_iter().map(str::to_string).collect(),
        moyens_paiement: moyens_paiement.into_iter().map(str::to_string).collect(),
        has_payment_method: rows.has_payment_method,
        plage_dates,
    }
}

#[tauri::command]
pub async fn get_filter_options(
    state: tauri::State<'_, AppState>,
) -> Result<FilterOptions, String> {
    let rows = state.load_orders().map_err(|e| e.to_string())?;
    Ok(build_filter_options(&rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::normalize::parse_order_date;
    use crate::orders::types::OrderRow;

    fn ligne(date: Option<&str>, categorie: &str, paiement: Option<&str>) -> OrderRow {
        OrderRow {
            order_id: 1,
            user_id: 1,
            order_date: date.and_then(parse_order_date),
            total_amount: 10.0,
            product_name: "Produit".to_string(),
            category: categorie.to_string(),
            quantity: 1,
            price: 10.0,
            payment_method: paiement.map(str::to_string),
        }
    }

    #[test]
    fn test_options_uniques_et_triees() {
        let rows = RowSet {
            rows: vec![
                ligne(Some("2024-03-01T10:00:00"), "Electronics", Some("paypal")),
                ligne(Some("2024-01-01T10:00:00"), "Books", Some("card")),
                ligne(Some("2024-02-01T10:00:00"), "Electronics", Some("card")),
                ligne(None, "Books", None),
            ],
            has_payment_method: true,
        };
        let options = build_filter_options(&rows);

        assert_eq!(options.categories, vec!["Books", "Electronics"]);
        assert_eq!(options.moyens_paiement, vec!["card", "paypal"]);
        assert!(options.has_payment_method);
        assert_eq!(
            options.plage_dates,
            Some((
                "2024-01-01T10:00:00".to_string(),
                "2024-03-01T10:00:00".to_string()
            ))
        );
    }

    #[test]
    fn test_options_sans_colonne_paiement() {
        let rows = RowSet {
            rows: vec![ligne(Some("2024-01-01T10:00:00"), "Books", None)],
            has_payment_method: false,
        };
        let options = build_filter_options(&rows);

        assert!(options.moyens_paiement.is_empty());
        assert!(!options.has_payment_method);
    }

    #[test]
    fn test_options_jeu_vide() {
        let rows = RowSet {
            rows: vec![],
            has_payment_method: true,
        };
        let options = build_filter_options(&rows);

        assert!(options.categories.is_empty());
        assert!(options.plage_dates.is_none());
    }
}
