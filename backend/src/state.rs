use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use lingopress_shared::{ContentService, DocumentStore};

#[derive(Clone)]
pub struct AppState {
    service: Arc<ContentService>,
}

impl AppState {
    pub fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;
        let store = DocumentStore::open(&data_dir.join("lingopress.db"))
            .context("failed to open document store")?;
        Ok(Self::with_store(store))
    }

    /// Build state around an already-open store (in-memory in tests).
    pub fn with_store(store: DocumentStore) -> Self {
        Self {
            service: Arc::new(ContentService::new(Arc::new(store))),
        }
    }

    pub fn service(&self) -> &ContentService {
        &self.service
    }
}
