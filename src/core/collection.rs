//! Collection archives: a zip whose first entry is the collection manifest
//! (`exported.json`) followed by the files of the mod tree.

pub mod export;
pub mod import;
pub mod io_strategy;
pub mod payload;

use crate::core::progress::{NoProgress, ProgressSink};
use crate::models::constants::EXPORTED_MOD_CONTENT_ID;
use crate::models::error::SError;
use crate::utils::path::trim_separators;
use io_strategy::{platform_strategy, ReadStrategy};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub use import::ImportMode;

/// Exports and imports collection archives, one entry at a time.
#[derive(Clone)]
pub struct CollectionArchiver {
    progress: Arc<dyn ProgressSink>,
    strategy: Arc<dyn ReadStrategy>,
    cancel: CancellationToken,
}

impl Default for CollectionArchiver {
    fn default() -> Self {
        Self::new(Arc::new(NoProgress))
    }
}

impl CollectionArchiver {
    pub fn new(progress: Arc<dyn ProgressSink>) -> Self {
        Self {
            progress,
            strategy: platform_strategy(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn ReadStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn check_cancelled(&self) -> Result<(), SError> {
        if self.cancel.is_cancelled() {
            return Err(SError::Cancelled);
        }
        Ok(())
    }
}

pub(crate) fn is_manifest_entry(name: &str) -> bool {
    trim_separators(name).eq_ignore_ascii_case(EXPORTED_MOD_CONTENT_ID)
}
