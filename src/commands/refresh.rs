use std::sync::atomic::Ordering;
use std::time::Instant;

use serde::Serialize;
use tauri::{Emitter, Manager};

use crate::config::DEFAULT_REFRESH_SECS;
use crate::error::AppError;
use crate::state::AppState;

/// Événement émis vers la surface après chaque rechargement périodique.
pub const REFRESHED_EVENT: &str = "orders://refreshed";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadSummary {
    pub nb_lignes: usize,
    pub has_payment_method: bool,
    pub dates_manquantes: usize,
    pub duration_ms: u64,
}

/// Invalide le cache puis recharge depuis la source. Partagé entre la
/// commande manuelle et la tâche périodique.
pub(crate) fn run_reload(state: &AppState) -> Result<LoadSummary, AppError> {
    let start = Instant::now();

    state.cache.invalidate();
    let rows = state.load_orders()?;

    Ok(LoadSummary {
        nb_lignes: rows.len(),
        has_payment_method: rows.has_payment_method,
        dates_manquantes: rows.missing_dates(),
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Déclencheur manuel de vidage du cache + rechargement.
#[tauri::command]
pub async fn reload_orders(state: tauri::State<'_, AppState>) -> Result<LoadSummary, String> {
    run_reload(&state).map_err(|e| e.to_string())
}

/// Active ou coupe le rafraîchissement périodique. La tâche de fond tourne
/// en continu; le drapeau décide si un tick recharge ou non.
#[tauri::command]
pub async fn set_auto_refresh(
    state: tauri::State<'_, AppState>,
    enabled: bool,
) -> Result<(), String> {
    state.auto_refresh.store(enabled, Ordering::Relaxed);
    log::info!(
        "Rafraîchissement automatique {}",
        if enabled { "activé" } else { "désactivé" }
    );
    Ok(())
}

/// Tâche périodique lancée une seule fois au démarrage. Chaque tick, si le
/// drapeau est levé, rejoue le pipeline de chargement et notifie la
/// surface. Les rendus ne se chevauchent pas: le cache sérialise les accès
/// et un tick attend la fin du précédent.
pub fn spawn_refresh_task(app: tauri::AppHandle) {
    tauri::async_runtime::spawn(async move {
        loop {
            let secs = app
                .state::<AppState>()
                .current_config()
                .map(|c| c.auto_refresh_secs)
                .unwrap_or(DEFAULT_REFRESH_SECS)
                .max(1);
            tokio::time::sleep(std::time::Duration::from_secs(secs)).await;

            let state = app.state::<AppState>();
            if !state.auto_refresh.load(Ordering::Relaxed) {
                continue;
            }

            match run_reload(&state) {
                Ok(summary) => {
                    log::info!(
                        "Rechargement périodique: {} ligne(s) en {} ms",
                        summary.nb_lignes,
                        summary.duration_ms
                    );
                    if let Err(e) = app.emit(REFRESHED_EVENT, &summary) {
                        log::warn!("Émission de {} impossible: {}", REFRESHED_EVENT, e);
                    }
                }
                Err(e) => log::warn!("Rechargement périodique en échec: {}", e),
            }
        }
    });
}
