use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use crate::analyzer::dashboard::{DashboardData, PaymentSection};
use crate::error::AppError;
use crate::export::{
    create_header_format, create_integer_format, create_money_format, create_percent_format,
};

fn xlsx_err(e: XlsxError) -> AppError {
    AppError::Custom(e.to_string())
}

/// Génère le rapport de ventes Excel (synthèse + classements).
/// Retourne les bytes XLSX via workbook.save_to_buffer().
pub fn generate_sales_report(data: &DashboardData) -> Result<Vec<u8>, AppError> {
    let mut wb = Workbook::new();
    write_synthese(&mut wb, data).map_err(xlsx_err)?;
    write_categories(&mut wb, data).map_err(xlsx_err)?;
    write_produits(&mut wb, data).map_err(xlsx_err)?;
    write_paiements(&mut wb, data).map_err(xlsx_err)?;
    wb.save_to_buffer().map_err(xlsx_err)
}

// ── Onglet 1 : Synthèse ──────────────────────────────────────────────────────

fn write_synthese(wb: &mut Workbook, data: &DashboardData) -> Result<(), XlsxError> {
    let ws = wb.add_worksheet();
    ws.set_name("Synthèse")?;

    let hdr = create_header_format();
    let money = create_money_format();
    let int = create_integer_format();

    ws.write_with_format(0, 0, "Indicateur", &hdr)?;
    ws.write_with_format(0, 1, "Valeur", &hdr)?;

    ws.write(1, 0, "Chiffre d'affaires total")?;
    ws.write_with_format(1, 1, data.kpi.ca_total, &money)?;
    ws.write(2, 0, "Commandes")?;
    ws.write_with_format(2, 1, data.kpi.nb_commandes as f64, &int)?;
    ws.write(3, 0, "Clients uniques")?;
    ws.write_with_format(3, 1, data.kpi.nb_clients as f64, &int)?;
    ws.write(4, 0, "Panier moyen")?;
    ws.write_with_format(4, 1, data.kpi.panier_moyen, &money)?;

    // Section tendance du CA
    let debut = 6u32;
    ws.write_with_format(debut, 0, "Date", &hdr)?;
    ws.write_with_format(debut, 1, "CA", &hdr)?;
    for (i, point) in data.tendance_ca.iter().enumerate() {
        let row = debut + 1 + i as u32;
        ws.write(row, 0, point.date.as_str())?;
        ws.write_with_format(row, 1, point.ca, &money)?;
    }

    ws.set_column_width(0, 26)?;
    ws.set_column_width(1, 16)?;

    Ok(())
}

// ── Onglet 2 : Catégories ────────────────────────────────────────────────────

fn write_categories(wb: &mut Workbook, data: &DashboardData) -> Result<(), XlsxError> {
    let ws = wb.add_worksheet();
    ws.set_name("Catégories")?;

    let hdr = create_header_format();
    let money = create_money_format();
    let pct = create_percent_format();

    ws.write_with_format(0, 0, "Catégorie", &hdr)?;
    ws.write_with_format(0, 1, "CA", &hdr)?;
    ws.write_with_format(0, 2, "Part", &hdr)?;

    for (i, cat) in data.ca_par_categorie.iter().enumerate() {
        let row = (i + 1) as u32;
        ws.write(row, 0, cat.category.as_str())?;
        ws.write_with_format(row, 1, cat.ca, &money)?;
        ws.write_with_format(row, 2, cat.part_pct / 100.0, &pct)?;
    }

    freeze_and_filter(ws, data.ca_par_categorie.len(), 2)?;
    ws.set_column_width(0, 22)?;
    ws.set_column_width(1, 16)?;

    Ok(())
}

// ── Onglet 3 : Produits ──────────────────────────────────────────────────────

fn write_produits(wb: &mut Workbook, data: &DashboardData) -> Result<(), XlsxError> {
    let ws = wb.add_worksheet();
    ws.set_name("Top produits")?;

    let hdr = create_header_format();
    let int = create_integer_format();

    ws.write_with_format(0, 0, "Produit", &hdr)?;
    ws.write_with_format(0, 1, "Quantité vendue", &hdr)?;

    for (i, produit) in data.top_produits.iter().enumerate() {
        let row = (i + 1) as u32;
        ws.write(row, 0, produit.product_name.as_str())?;
        ws.write_with_format(row, 1, produit.quantite as f64, &int)?;
    }

    freeze_and_filter(ws, data.top_produits.len(), 1)?;
    ws.set_column_width(0, 30)?;
    ws.set_column_width(1, 16)?;

    Ok(())
}

// ── Onglet 4 : Paiements ou top clients ──────────────────────────────────────

fn write_paiements(wb: &mut Workbook, data: &DashboardData) -> Result<(), XlsxError> {
    let ws = wb.add_worksheet();

    let hdr = create_header_format();
    let money = create_money_format();
    let pct = create_percent_format();

    match &data.paiements {
        PaymentSection::MoyensPaiement(items) => {
            ws.set_name("Paiements")?;
            ws.write_with_format(0, 0, "Moyen de paiement", &hdr)?;
            ws.write_with_format(0, 1, "CA", &hdr)?;
            ws.write_with_format(0, 2, "Part", &hdr)?;

            for (i, item) in items.iter().enumerate() {
                let row = (i + 1) as u32;
                ws.write(row, 0, item.payment_method.as_str())?;
                ws.write_with_format(row, 1, item.ca, &money)?;
                ws.write_with_format(row, 2, item.part_pct / 100.0, &pct)?;
            }
        }
        PaymentSection::TopClients(clients) => {
            ws.set_name("Top clients")?;
            ws.write_with_format(0, 0, "Client", &hdr)?;
            ws.write_with_format(0, 1, "Dépenses", &hdr)?;

            for (i, client) in clients.iter().enumerate() {
                let row = (i + 1) as u32;
                ws.write(row, 0, client.user_id as f64)?;
                ws.write_with_format(row, 1, client.ca, &money)?;
            }
        }
    }

    ws.set_column_width(0, 22)?;
    ws.set_column_width(1, 16)?;

    Ok(())
}

fn freeze_and_filter(ws: &mut Worksheet, nb_rows: usize, last_col: u16) -> Result<(), XlsxError> {
    if nb_rows > 0 {
        ws.set_freeze_panes(1, 0)?;
        ws.autofilter(0, 0, nb_rows as u32, last_col)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::dashboard::{build_dashboard, DashboardPayload};
    use crate::orders::normalize::parse_order_date;
    use crate::orders::types::{OrderRow, RowSet};

    fn jeu_minimal(has_payment_method: bool) -> RowSet {
        RowSet {
            rows: vec![OrderRow {
                order_id: 1,
                user_id: 11,
                order_date: parse_order_date("2024-01-05T10:00:00"),
                total_amount: 100.0,
                product_name: "Clavier".to_string(),
                category: "Electronics".to_string(),
                quantity: 1,
                price: 100.0,
                payment_method: has_payment_method.then(|| "card".to_string()),
            }],
            has_payment_method,
        }
    }

    fn data(rows: &RowSet) -> crate::analyzer::dashboard::DashboardData {
        match build_dashboard(rows) {
            DashboardPayload::Ready(d) => d,
            DashboardPayload::Empty => panic!("jeu vide"),
        }
    }

    /// Les bytes XLSX commencent par la signature ZIP PK (0x50 0x4B).
    #[test]
    fn test_rapport_ventes_pk() {
        let bytes = generate_sales_report(&data(&jeu_minimal(true))).unwrap();
        assert!(bytes.len() > 4);
        assert_eq!(bytes[0], 0x50);
        assert_eq!(bytes[1], 0x4B);
    }

    #[test]
    fn test_rapport_ventes_repli_top_clients_pk() {
        let bytes = generate_sales_report(&data(&jeu_minimal(false))).unwrap();
        assert_eq!(bytes[0], 0x50);
        assert_eq!(bytes[1], 0x4B);
    }
}
