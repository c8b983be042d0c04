use crate::analyzer::dashboard::{build_dashboard, DashboardPayload};
use crate::orders::filter::{apply_filters, FilterSpec};
use crate::state::AppState;

/// Rendu complet du tableau de bord: cache → filtres → agrégats.
/// Les filtres absents valent « aucune restriction ».
#[tauri::command]
pub async fn get_dashboard(
    state: tauri::State<'_, AppState>,
    filters: Option<FilterSpec>,
) -> Result<DashboardPayload, String> {
    let depuis_cache = state.cache.is_loaded();
    let rows = state.load_orders().map_err(|e| e.to_string())?;
    log::debug!(
        "Rendu: {} ligne(s), cache {}",
        rows.len(),
        if depuis_cache { "réutilisé" } else { "rempli" }
    );

    let spec = filters.unwrap_or_default();
    let filtered = apply_filters(&rows, &spec);
    Ok(build_dashboard(&filtered))
}
