use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Intervalle de rafraîchissement automatique par défaut (secondes).
pub const DEFAULT_REFRESH_SECS: u64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Chemin de la base e-commerce source (lecture seule).
    pub source_db_path: String,
    /// Intervalle du rafraîchissement périodique, en secondes.
    pub auto_refresh_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            source_db_path: "ecommerce.db".to_string(),
            auto_refresh_secs: DEFAULT_REFRESH_SECS,
        }
    }
}

/// Charge la configuration depuis `path`. Un fichier absent ou illisible
/// retombe sur les valeurs par défaut, jamais sur une erreur au démarrage.
pub fn load_config(path: &Path) -> AppConfig {
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Configuration illisible ({}), valeurs par défaut", e);
                AppConfig::default()
            }
        },
        Err(_) => AppConfig::default(),
    }
}

pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), AppError> {
    let contents = serde_json::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}
