//! HAR import and entry storage

mod entry_store;
mod har;

pub use entry_store::EntryStore;
pub use har::{
    cookies_from_request_headers, cookies_from_response_headers, extract_protocol,
    import_har_from_path, import_har_from_path_async, import_har_from_slice, import_har_from_str,
    import_har_from_str_with_progress, normalize, normalize_async, normalize_entry,
    saml_request_from_params, saml_response_from_body, ImportProgress, NoProgress,
    PROGRESS_INTERVAL,
};

use crate::config::ViewerConfig;
use crate::error::ImportError;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// The currently opened HAR file.
///
/// A new import is built off to the side and swapped in whole; readers hold an
/// `Arc` snapshot that stays valid (and unchanged) after a replacement.
#[derive(Default)]
pub struct HarSession {
    current: RwLock<Option<Arc<EntryStore>>>,
}

impl HarSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the open store, if any
    pub fn store(&self) -> anyhow::Result<Option<Arc<EntryStore>>> {
        let guard = self
            .current
            .read()
            .map_err(|e| anyhow::anyhow!("lock poisoned: {}", e))?;
        Ok(guard.clone())
    }

    /// Make `store` the open store and return a snapshot of it.
    pub fn replace(&self, store: EntryStore) -> anyhow::Result<Arc<EntryStore>> {
        let store = Arc::new(store);
        let mut guard = self
            .current
            .write()
            .map_err(|e| anyhow::anyhow!("lock poisoned: {}", e))?;
        *guard = Some(Arc::clone(&store));
        Ok(store)
    }

    /// Import `path` and make it the open store. On failure the previously
    /// open store is left in place.
    pub fn open(
        &self,
        path: impl AsRef<Path>,
        config: &ViewerConfig,
    ) -> anyhow::Result<Arc<EntryStore>> {
        let path = path.as_ref();
        let store = import_har_from_path(path, config).map_err(|err: ImportError| {
            tracing::warn!("Import of {:?} failed: {}", path, err);
            anyhow::Error::new(err)
        })?;
        self.replace(store)
    }

    /// Async variant of [`HarSession::open`] that reports progress.
    pub async fn open_async(
        &self,
        path: impl AsRef<Path>,
        config: &ViewerConfig,
        progress: &mut impl ImportProgress,
    ) -> anyhow::Result<Arc<EntryStore>> {
        let store = import_har_from_path_async(path, config, progress).await?;
        self.replace(store)
    }

    pub fn close(&self) -> anyhow::Result<()> {
        let mut guard = self
            .current
            .write()
            .map_err(|e| anyhow::anyhow!("lock poisoned: {}", e))?;
        *guard = None;
        Ok(())
    }
}
