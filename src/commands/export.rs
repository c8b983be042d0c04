use std::time::Instant;

use serde::Serialize;

use crate::analyzer::dashboard::{build_dashboard, DashboardPayload};
use crate::export::{csv_report, sales_report};
use crate::orders::filter::{apply_filters, FilterSpec};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    pub path: String,
    pub size_bytes: u64,
    pub duration_ms: u64,
}

/// Écrit le jeu de lignes filtré en CSV (`ecommerce_report.csv` proposé
/// côté surface comme nom de téléchargement).
#[tauri::command]
pub async fn export_csv(
    state: tauri::State<'_, AppState>,
    path: String,
    filters: Option<FilterSpec>,
) -> Result<ExportResult, String> {
    let start = Instant::now();

    let rows = state.load_orders().map_err(|e| e.to_string())?;
    let filtered = apply_filters(&rows, &filters.unwrap_or_default());

    // Un dossier choisi dans la boîte de dialogue reçoit le nom proposé
    let target = std::path::PathBuf::from(&path);
    let target = if target.is_dir() {
        target.join(csv_report::CSV_FILENAME)
    } else {
        target
    };

    let bytes = csv_report::generate_csv(&filtered).map_err(|e| e.to_string())?;
    std::fs::write(&target, &bytes).map_err(|e| e.to_string())?;

    Ok(ExportResult {
        path: target.display().to_string(),
        size_bytes: bytes.len() as u64,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Écrit le rapport de ventes Excel pour les mêmes filtres que le rendu.
#[tauri::command]
pub async fn export_excel_dashboard(
    state: tauri::State<'_, AppState>,
    path: String,
    filters: Option<FilterSpec>,
) -> Result<ExportResult, String> {
    let start = Instant::now();

    let rows = state.load_orders().map_err(|e| e.to_string())?;
    let filtered = apply_filters(&rows, &filters.unwrap_or_default());

    let data = match build_dashboard(&filtered) {
        DashboardPayload::Ready(data) => data,
        DashboardPayload::Empty => {
            return Err("Aucune donnée pour les filtres sélectionnés".to_string())
        }
    };

    let bytes = sales_report::generate_sales_report(&data).map_err(|e| e.to_string())?;
    std::fs::write(&path, &bytes).map_err(|e| e.to_string())?;

    Ok(ExportResult {
        path,
        size_bytes: bytes.len() as u64,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}
