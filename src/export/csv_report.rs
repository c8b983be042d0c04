use crate::error::AppError;
use crate::orders::normalize::format_order_date;
use crate::orders::types::RowSet;

/// Nom de fichier proposé pour le téléchargement (type MIME text/csv).
pub const CSV_FILENAME: &str = "ecommerce_report.csv";

/// Sérialise le jeu de lignes filtré complet en CSV UTF-8 avec ligne
/// d'en-tête. La colonne `payment_method` n'apparaît que si la relation
/// Payments a été chargée; une date manquante devient une cellule vide.
pub fn generate_csv(rows: &RowSet) -> Result<Vec<u8>, AppError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    let mut header = vec![
        "order_id",
        "user_id",
        "order_date",
        "total_amount",
        "product_name",
        "category",
        "quantity",
        "price",
    ];
    if rows.has_payment_method {
        header.push("payment_method");
    }
    wtr.write_record(&header)?;

    for r in &rows.rows {
        let mut record = vec![
            r.order_id.to_string(),
            r.user_id.to_string(),
            r.order_date.as_ref().map(format_order_date).unwrap_or_default(),
            r.total_amount.to_string(),
            r.product_name.clone(),
            r.category.clone(),
            r.quantity.to_string(),
            r.price.to_string(),
        ];
        if rows.has_payment_method {
            record.push(r.payment_method.clone().unwrap_or_default());
        }
        wtr.write_record(&record)?;
    }

    wtr.into_inner()
        .map_err(|e| AppError::Custom(format!("Finalisation CSV: {}", e)))
}
