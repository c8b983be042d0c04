use chrono::NaiveDate;
use serde::Deserialize;

use crate::orders::types::{OrderRow, RowSet};

/// Sentinelle des listes déroulantes: désactive le filtre correspondant.
pub const ALL: &str = "All";

/// Prédicats indépendants et tous optionnels appliqués au jeu de lignes.
/// Un champ absent (ou la sentinelle `"All"`) signifie « aucune
/// restriction ».
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub category: Option<String>,
    pub payment_method: Option<String>,
}

impl FilterSpec {
    /// Bornes de dates actives. Une borne seule est inerte: le filtre ne
    /// s'applique que lorsque les deux sont fournies.
    fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.date_from, self.date_to) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => None,
        }
    }

    fn active_category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| *c != ALL)
    }

    fn active_payment_method(&self) -> Option<&str> {
        self.payment_method.as_deref().filter(|p| *p != ALL)
    }
}

/// Applique les prédicats actifs (composition en ET logique). Fonction
/// pure: l'entrée n'est jamais modifiée, les lignes retenues sont copiées.
/// Un filtre visant une colonne absente du jeu (moyen de paiement sans
/// relation Payments) est ignoré, jamais une erreur.
pub fn apply_filters(rows: &RowSet, spec: &FilterSpec) -> RowSet {
    let range = spec.date_range();
    let category = spec.active_category();
    let payment = if rows.has_payment_method {
        spec.active_payment_method()
    } else {
        None
    };

    let filtered: Vec<OrderRow> = rows
        .rows
        .iter()
        .filter(|r| keep_row(r, range, category, payment))
        .cloned()
        .collect();

    RowSet {
        rows: filtered,
        has_payment_method: rows.has_payment_method,
    }
}

fn keep_row(
    row: &OrderRow,
    range: Option<(NaiveDate, NaiveDate)>,
    category: Option<&str>,
    payment: Option<&str>,
) -> bool {
    if let Some((from, to)) = range {
        // Une date manquante ne matche jamais l'intervalle.
        match row.order_date {
            Some(dt) => {
                let d = dt.date();
                if d < from || d > to {
                    return false;
                }
            }
            None => return false,
        }
    }

    if let Some(cat) = category {
        if row.category != cat {
            return false;
        }
    }

    if let Some(pm) = payment {
        if row.payment_method.as_deref() != Some(pm) {
            return false;
        }
    }

    true
}
