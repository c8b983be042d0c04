use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use crate::cache::OrderCache;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::orders::normalize::normalize_rows;
use crate::orders::types::RowSet;

pub struct AppState {
    pub config: Mutex<AppConfig>,
    pub config_path: Mutex<Option<PathBuf>>,
    pub cache: OrderCache,
    pub auto_refresh: AtomicBool,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            config: Mutex::new(AppConfig::default()),
            config_path: Mutex::new(None),
            cache: OrderCache::new(),
            auto_refresh: AtomicBool::new(false),
        }
    }

    /// Pipeline de chargement: source → cache → normalisation.
    /// Le cache ne mémorise que des jeux de lignes déjà normalisés.
    pub fn load_orders(&self) -> Result<Arc<RowSet>, AppError> {
        let path = self
            .config
            .lock()
            .map_err(|e| AppError::Custom(format!("Mutex poisoned: {}", e)))?
            .source_db_path
            .clone();

        self.cache.get_or_load(|| {
            let raw = crate::db::queries::fetch_orders(&path)?;
            Ok(normalize_rows(raw))
        })
    }

    pub fn current_config(&self) -> Result<AppConfig, AppError> {
        self.config
            .lock()
            .map(|guard| guard.clone())
            .map_err(|e| AppError::Custom(format!("Mutex poisoned: {}", e)))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
