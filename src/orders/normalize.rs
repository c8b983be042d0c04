use chrono::{NaiveDate, NaiveDateTime};

use crate::orders::types::{OrderRow, RawRowSet, RowSet};

/// Représentation canonique des dates de commande dans tout le pipeline.
pub const CANONICAL_DT_FMT: &str = "%Y-%m-%dT%H:%M:%S";

/// Formats acceptés en entrée: canonique, datetime SQL, ISO suffixé Z.
const ACCEPTED_DT_FMTS: &[&str] = &[CANONICAL_DT_FMT, "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%SZ"];

/// Coerce une date de commande brute. Retourne `None` pour une valeur vide
/// ou illisible. La relecture du format canonique redonne toujours la même
/// date: renormaliser un jeu déjà normalisé ne change rien.
pub fn parse_order_date(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in ACCEPTED_DT_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn format_order_date(dt: &NaiveDateTime) -> String {
    dt.format(CANONICAL_DT_FMT).to_string()
}

/// Étape de normalisation du pipeline: coercition de `order_date`, tout le
/// reste passe tel quel. Aucune ligne n'est rejetée.
pub fn normalize_rows(raw: RawRowSet) -> RowSet {
    let mut illisibles = 0usize;

    let rows: Vec<OrderRow> = raw
        .rows
        .into_iter()
        .map(|r| {
            let order_date = r.order_date.as_deref().and_then(parse_order_date);
            if order_date.is_none()
                && r.order_date
                    .as_deref()
                    .map(|s| !s.trim().is_empty())
                    .unwrap_or(false)
            {
                illisibles += 1;
            }
            OrderRow {
                order_id: r.order_id,
                user_id: r.user_id,
                order_date,
                total_amount: r.total_amount,
                product_name: r.product_name,
                category: r.category,
                quantity: r.quantity,
                price: r.price,
                payment_method: r.payment_method,
            }
        })
        .collect();

    if illisibles > 0 {
        log::warn!(
            "{} date(s) de commande illisibles conservées comme valeurs manquantes",
            illisibles
        );
    }

    RowSet {
        rows,
        has_payment_method: raw.has_payment_method,
    }
}
