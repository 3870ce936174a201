use super::{is_manifest_entry, payload, CollectionArchiver};
use crate::core::progress::ProgressTracker;
use crate::models::constants::EXPORTED_MOD_CONTENT_ID;
use crate::models::error::SError;
use crate::utils::file::FileUtils;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Datelike, Local, Timelike};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::time::SystemTime;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug)]
pub enum EntrySource {
    Bytes(Vec<u8>),
    File(Utf8PathBuf),
}

/// One archive entry, in write order.
#[derive(Debug)]
pub struct StagedEntry {
    pub name: String,
    pub source: EntrySource,
    pub modified: Option<SystemTime>,
}

impl CollectionArchiver {
    /// Writes `manifest` and, unless `mod_order_only`, every file under `root` into a zip at
    /// `destination`. The archive only appears at `destination` once it is complete.
    #[instrument(skip(self, manifest))]
    pub fn export<T: Serialize>(
        &self,
        manifest: &T,
        root: Option<&Utf8Path>,
        destination: &Utf8Path,
        mod_order_only: bool,
    ) -> Result<(), SError> {
        let staged = Self::stage(manifest, root, mod_order_only)?;

        if let Some(parent) = destination.parent().filter(|p| !p.as_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let temp = temp_sibling(destination);
        match self.write_archive(&staged, &temp) {
            Ok(()) => {
                std::fs::rename(&temp, destination)?;
                info!("Exported {} entries to {destination}", staged.len());
                Ok(())
            }
            Err(e) => {
                if let Err(cleanup) = std::fs::remove_file(&temp) {
                    debug!("Could not remove {temp}: {cleanup}");
                }
                Err(e)
            }
        }
    }

    /// Manifest first, then the mod tree in name order.
    pub fn stage<T: Serialize>(
        manifest: &T,
        root: Option<&Utf8Path>,
        mod_order_only: bool,
    ) -> Result<Vec<StagedEntry>, SError> {
        let mut staged = vec![StagedEntry {
            name: EXPORTED_MOD_CONTENT_ID.to_string(),
            source: EntrySource::Bytes(payload::serialize(manifest)?.into_bytes()),
            modified: Some(SystemTime::now()),
        }];

        let Some(root) = root.filter(|r| !mod_order_only && r.is_dir()) else {
            return Ok(staged);
        };

        for file in FileUtils::collect_files(root)? {
            let name = FileUtils::relative_entry_name(root, &file)?;
            if is_manifest_entry(&name) {
                warn!("Skipping {file}, its name is reserved for the manifest");
                continue;
            }
            staged.push(StagedEntry {
                name,
                modified: FileUtils::modified(&file),
                source: EntrySource::File(file),
            });
        }
        Ok(staged)
    }

    fn write_archive(&self, staged: &[StagedEntry], path: &Utf8Path) -> Result<(), SError> {
        let mut zip = ZipWriter::new(File::create(path)?);
        let mut tracker = ProgressTracker::new(self.progress.as_ref(), staged.len());

        for entry in staged {
            self.check_cancelled()?;
            let options = SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .last_modified_time(zip_time(entry.modified));
            zip.start_file(entry.name.as_str(), options)?;

            match &entry.source {
                EntrySource::Bytes(bytes) => zip.write_all(bytes)?,
                EntrySource::File(file) => {
                    let mut reader = self.strategy.open(file)?;
                    io::copy(&mut reader, &mut zip)?;
                }
            }
            tracker.advance();
        }

        zip.finish()?;
        Ok(())
    }
}

/// Local wall-clock time in the zip's DOS format. Dates the format cannot hold map to its epoch.
pub fn zip_time(modified: Option<SystemTime>) -> zip::DateTime {
    modified
        .map(DateTime::<Local>::from)
        .and_then(|t| {
            zip::DateTime::from_date_and_time(
                u16::try_from(t.year()).ok()?,
                t.month() as u8,
                t.day() as u8,
                t.hour() as u8,
                t.minute() as u8,
                t.second() as u8,
            )
            .ok()
        })
        .unwrap_or_default()
}

fn temp_sibling(destination: &Utf8Path) -> Utf8PathBuf {
    let name = destination.file_name().unwrap_or("collection");
    destination.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4()))
}
