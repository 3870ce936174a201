use crate::models::error::SError;
use camino::Utf8Path;
use std::fs::File;
use std::io::{Cursor, Read};
use std::sync::Arc;

/// How source files are opened while an archive is written.
pub trait ReadStrategy: Send + Sync {
    fn open(&self, path: &Utf8Path) -> Result<Box<dyn Read>, SError>;
}

/// Streams straight from the file handle.
pub struct DirectRead;

impl ReadStrategy for DirectRead {
    fn open(&self, path: &Utf8Path) -> Result<Box<dyn Read>, SError> {
        Ok(Box::new(File::open(path)?))
    }
}

/// Loads the whole file and closes the handle before the entry is written.
/// Keeps the number of open descriptors at zero between entries on handle-limited systems.
pub struct BufferedRead;

impl ReadStrategy for BufferedRead {
    fn open(&self, path: &Utf8Path) -> Result<Box<dyn Read>, SError> {
        Ok(Box::new(Cursor::new(std::fs::read(path)?)))
    }
}

pub fn platform_strategy() -> Arc<dyn ReadStrategy> {
    if cfg!(target_os = "macos") {
        Arc::new(BufferedRead)
    } else {
        Arc::new(DirectRead)
    }
}
