use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::orders::types::RowSet;

/// Cache du dernier chargement de commandes. Le premier rendu délègue au
/// chargeur, les suivants relisent le résultat mémorisé; seule une
/// invalidation explicite (ou l'arrêt du processus) force un rechargement.
/// Un chargement en échec n'est jamais mémorisé.
pub struct OrderCache {
    inner: Mutex<Option<Arc<RowSet>>>,
}

impl OrderCache {
    pub fn new() -> Self {
        OrderCache {
            inner: Mutex::new(None),
        }
    }

    pub fn get_or_load<F>(&self, loader: F) -> Result<Arc<RowSet>, AppError>
    where
        F: FnOnce() -> Result<RowSet, AppError>,
    {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| AppError::Custom(format!("Mutex poisoned: {}", e)))?;
        if let Some(rows) = guard.as_ref() {
            return Ok(Arc::clone(rows));
        }
        let loaded = Arc::new(loader()?);
        *guard = Some(Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Vide le cache; le prochain rendu repartira de la source.
    pub fn invalidate(&self) {
        if let Ok(mut guard) = self.inner.lock() {
            *guard = None;
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.inner
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }
}

impl Default for OrderCache {
    fn default() -> Self {
        Self::new()
    }
}
