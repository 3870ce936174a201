use crate::models::error::SError;
use camino::{Utf8Path, Utf8PathBuf};
use filetime::FileTime;
use std::time::SystemTime;
use tracing::warn;
use walkdir::WalkDir;

pub struct FileUtils;

impl FileUtils {
    /// Every file below `root`, depth first, siblings ordered by name.
    /// Unreadable entries abort the walk.
    pub fn collect_files(root: &Utf8Path) -> Result<Vec<Utf8PathBuf>, SError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            files.push(Utf8PathBuf::try_from(entry.into_path())?);
        }
        Ok(files)
    }

    /// Like [`collect_files`](Self::collect_files), but unreadable entries and
    /// non-UTF-8 names are skipped with a warning.
    pub fn collect_files_lenient(root: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {root}: {e}");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            match Utf8PathBuf::try_from(entry.into_path()) {
                Ok(path) => files.push(path),
                Err(e) => warn!("Skipping non UTF-8 file name {}", e.as_path().display()),
            }
        }
        files
    }

    /// Path of `path` relative to `root` as a forward-slash archive entry name.
    pub fn relative_entry_name(root: &Utf8Path, path: &Utf8Path) -> Result<String, SError> {
        let rel = path.strip_prefix(root)?;
        let name = crate::utils::path::to_forward_slashes(rel.as_str());
        Ok(crate::utils::path::trim_separators(&name).to_string())
    }

    /// Removes a directory tree, clearing read-only flags that would block removal on Windows.
    pub fn delete_directory(path: &Utf8Path) -> Result<(), SError> {
        if !path.exists() {
            return Ok(());
        }
        for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(file) = Utf8Path::from_path(entry.path()) {
                let _ = Self::set_read_only(file, false);
            }
        }
        std::fs::remove_dir_all(path)?;
        Ok(())
    }

    pub fn is_read_only(path: &Utf8Path) -> Result<bool, SError> {
        Ok(std::fs::metadata(path)?.permissions().readonly())
    }

    #[allow(clippy::permissions_set_readonly_false)]
    pub fn set_read_only(path: &Utf8Path, read_only: bool) -> Result<(), SError> {
        let mut permissions = std::fs::metadata(path)?.permissions();
        if permissions.readonly() == read_only {
            return Ok(());
        }
        permissions.set_readonly(read_only);
        std::fs::set_permissions(path, permissions)?;
        Ok(())
    }

    pub fn modified(path: &Utf8Path) -> Option<SystemTime> {
        std::fs::metadata(path).and_then(|m| m.modified()).ok()
    }

    pub fn set_modified(path: &Utf8Path, time: SystemTime) -> Result<(), SError> {
        filetime::set_file_mtime(path, FileTime::from_system_time(time))?;
        Ok(())
    }
}
