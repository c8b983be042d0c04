use crate::config::{save_config, AppConfig};
use crate::state::AppState;

#[tauri::command]
pub async fn get_config(state: tauri::State<'_, AppState>) -> Result<AppConfig, String> {
    state.current_config().map_err(|e| e.to_string())
}

/// Met à jour la configuration, la persiste et invalide le cache: un
/// changement de base source ne doit jamais resservir d'anciennes lignes.
#[tauri::command]
pub async fn update_config(
    state: tauri::State<'_, AppState>,
    config: AppConfig,
) -> Result<(), String> {
    let path = state
        .config_path
        .lock()
        .map_err(|e| format!("Mutex poisoned: {}", e))?
        .clone();
    if let Some(path) = path {
        save_config(&path, &config).map_err(|e| e.to_string())?;
    }

    let mut guard = state
        .config
        .lock()
        .map_err(|e| format!("Mutex poisoned: {}", e))?;
    *guard = config;
    drop(guard);

    state.cache.invalidate();
    Ok(())
}
