use super::{is_manifest_entry, payload, CollectionArchiver};
use crate::core::progress::ProgressTracker;
use crate::models::error::SError;
use crate::utils::file::FileUtils;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{Local, NaiveDate, TimeZone};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::{debug, info, instrument, warn};
use zip::read::read_zipfile_from_stream;
use zip::ZipArchive;

#[derive(Clone, Copy, Debug)]
pub enum ImportMode<'a> {
    /// Stop at the manifest entry, touch nothing on disk.
    ManifestOnly,
    /// Write every content entry below the directory.
    Extract(&'a Utf8Path),
}

#[derive(Debug, Default)]
pub struct ImportOutcome {
    pub manifest: Option<String>,
    pub extracted: usize,
}

struct EntryInfo {
    name: String,
    enclosed: Option<PathBuf>,
    modified: Option<zip::DateTime>,
}

impl CollectionArchiver {
    /// Reads the manifest of `source` into `target`. `Ok(false)` when the archive has none.
    pub fn import_manifest<T>(&self, source: &Utf8Path, target: &mut T) -> Result<bool, SError>
    where
        T: Serialize + DeserializeOwned,
    {
        let outcome = self.import(source, ImportMode::ManifestOnly)?;
        match outcome.manifest {
            Some(text) => {
                payload::populate(target, &text)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Extracts the mod files of `source` into `extract_to`, wiping it first when `replace`.
    pub fn import_files(
        &self,
        source: &Utf8Path,
        extract_to: &Utf8Path,
        replace: bool,
    ) -> Result<bool, SError> {
        if replace && extract_to.exists() {
            FileUtils::delete_directory(extract_to)?;
        }
        let outcome = self.import(source, ImportMode::Extract(extract_to))?;
        info!("Imported {} files into {extract_to}", outcome.extracted);
        Ok(true)
    }

    /// Random-access reader first; when it cannot read the archive, a forward-only pass.
    #[instrument(skip(self))]
    pub fn import(&self, source: &Utf8Path, mode: ImportMode<'_>) -> Result<ImportOutcome, SError> {
        let mut tracker = ProgressTracker::new(self.progress.as_ref(), 0);
        match self.read_with_archive(source, mode, &mut tracker) {
            Ok(outcome) => Ok(outcome),
            Err(SError::Cancelled) => Err(SError::Cancelled),
            Err(e) => {
                warn!("Could not read {source} as a zip archive, retrying as a stream: {e}");
                self.read_with_stream(source, mode, &mut tracker)
            }
        }
    }

    fn read_with_archive(
        &self,
        source: &Utf8Path,
        mode: ImportMode<'_>,
        tracker: &mut ProgressTracker<'_>,
    ) -> Result<ImportOutcome, SError> {
        let mut archive = ZipArchive::new(File::open(source)?)?;
        let total = match mode {
            ImportMode::ManifestOnly => 1,
            ImportMode::Extract(_) => archive.file_names().filter(|n| !n.ends_with('/')).count(),
        };

        tracker.restart(total);
        let mut outcome = ImportOutcome::default();
        for i in 0..archive.len() {
            self.check_cancelled()?;
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let info = EntryInfo {
                name: entry.name().to_string(),
                enclosed: entry.enclosed_name(),
                modified: entry.last_modified(),
            };
            if self.handle_entry(info, &mut entry, mode, &mut outcome, tracker)? {
                break;
            }
        }
        Ok(outcome)
    }

    /// Forward-only reader. It cannot rewind, so extraction opens the archive twice:
    /// once to count entries for progress and once to extract.
    fn read_with_stream(
        &self,
        source: &Utf8Path,
        mode: ImportMode<'_>,
        tracker: &mut ProgressTracker<'_>,
    ) -> Result<ImportOutcome, SError> {
        let total = match mode {
            ImportMode::ManifestOnly => 1,
            ImportMode::Extract(_) => Self::count_stream_entries(source)?,
        };

        let mut reader = BufReader::new(File::open(source)?);
        tracker.restart(total);
        let mut outcome = ImportOutcome::default();
        loop {
            self.check_cancelled()?;
            let Some(mut entry) = read_zipfile_from_stream(&mut reader)? else {
                break;
            };
            if entry.is_dir() {
                continue;
            }
            let info = EntryInfo {
                name: entry.name().to_string(),
                enclosed: entry.enclosed_name(),
                modified: entry.last_modified(),
            };
            if self.handle_entry(info, &mut entry, mode, &mut outcome, tracker)? {
                break;
            }
        }
        Ok(outcome)
    }

    /// Non-directory entries reachable by a forward-only read.
    pub fn count_stream_entries(source: &Utf8Path) -> Result<usize, SError> {
        let mut reader = BufReader::new(File::open(source)?);
        let mut count = 0;
        while let Some(entry) = read_zipfile_from_stream(&mut reader)? {
            if !entry.is_dir() {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Returns `true` once the read can stop.
    fn handle_entry<R: Read>(
        &self,
        info: EntryInfo,
        reader: &mut R,
        mode: ImportMode<'_>,
        outcome: &mut ImportOutcome,
        tracker: &mut ProgressTracker<'_>,
    ) -> Result<bool, SError> {
        if is_manifest_entry(&info.name) {
            if let ImportMode::ManifestOnly = mode {
                let mut text = String::new();
                reader.read_to_string(&mut text)?;
                outcome.manifest = Some(text);
                tracker.advance();
                return Ok(true);
            }
            tracker.advance();
            return Ok(false);
        }

        let ImportMode::Extract(destination) = mode else {
            return Ok(false);
        };
        let Some(relative) = info.enclosed else {
            warn!("Skipping entry outside the destination: {}", info.name);
            tracker.advance();
            return Ok(false);
        };

        let target = destination.join(Utf8PathBuf::try_from(relative)?);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if target.is_file() {
            FileUtils::set_read_only(&target, false)?;
        }
        let mut file = File::create(&target)?;
        io::copy(reader, &mut file)?;
        drop(file);

        if let Some(time) = info.modified.and_then(system_time) {
            FileUtils::set_modified(&target, time)?;
        }
        debug!("Extracted {target}");
        outcome.extracted += 1;
        tracker.advance();
        Ok(false)
    }
}

/// Inverse of [`zip_time`](super::export::zip_time).
pub fn system_time(time: zip::DateTime) -> Option<SystemTime> {
    let naive = NaiveDate::from_ymd_opt(time.year().into(), time.month().into(), time.day().into())?
        .and_hms_opt(
            time.hour().into(),
            time.minute().into(),
            time.second().into(),
        )?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(SystemTime::from)
}
