use crate::core::descriptor_parser::DescriptorParser;
use crate::models::constants::MOD_DIRECTORY;
use crate::models::error::SError;
use crate::models::mod_dto::Mod;
use crate::utils::file::FileUtils;
use camino::{Utf8Path, Utf8PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Writes and removes descriptors below a game's user directory.
#[derive(Clone)]
pub struct DescriptorWriter {
    parser: Arc<dyn DescriptorParser>,
}

impl DescriptorWriter {
    pub fn new(parser: Arc<dyn DescriptorParser>) -> Self {
        Self { parser }
    }

    pub fn descriptor_path(user_directory: &Utf8Path, mod_entry: &Mod) -> Utf8PathBuf {
        user_directory.join(&mod_entry.descriptor_file)
    }

    /// (Re)writes the descriptor of `mod_entry` and applies its lock flag afterwards.
    pub fn write_descriptor(&self, user_directory: &Utf8Path, mod_entry: &Mod) -> Result<(), SError> {
        let path = Self::descriptor_path(user_directory, mod_entry);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if path.is_file() {
            FileUtils::set_read_only(&path, false)?;
        }

        let content = self.parser.serialize(&mod_entry.to_descriptor());
        std::fs::write(&path, content)?;
        if mod_entry.is_locked {
            FileUtils::set_read_only(&path, true)?;
        }
        debug!("Wrote descriptor {path}");
        Ok(())
    }

    /// `Ok(false)` when the descriptor does not exist.
    pub fn set_descriptor_lock(
        user_directory: &Utf8Path,
        mod_entry: &Mod,
        locked: bool,
    ) -> Result<bool, SError> {
        let path = Self::descriptor_path(user_directory, mod_entry);
        if !path.is_file() {
            return Ok(false);
        }
        FileUtils::set_read_only(&path, locked)?;
        Ok(true)
    }

    /// `Ok(false)` when there was nothing to delete.
    pub fn delete_descriptor(user_directory: &Utf8Path, mod_entry: &Mod) -> Result<bool, SError> {
        let path = Self::descriptor_path(user_directory, mod_entry);
        if !path.is_file() {
            return Ok(false);
        }
        FileUtils::set_read_only(&path, false)?;
        std::fs::remove_file(&path)?;
        debug!("Deleted descriptor {path}");
        Ok(true)
    }

    pub fn create_mod_directory(user_directory: &Utf8Path) -> Result<Utf8PathBuf, SError> {
        let dir = user_directory.join(MOD_DIRECTORY);
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    pub fn mod_directory_exists(user_directory: &Utf8Path, folder: &str) -> bool {
        user_directory.join(MOD_DIRECTORY).join(folder).is_dir()
    }

    /// Deletes `<user>/mod/<folder>` with everything in it.
    pub fn purge_mod_directory(user_directory: &Utf8Path, folder: &str) -> Result<bool, SError> {
        let dir = user_directory.join(MOD_DIRECTORY).join(folder);
        if !dir.is_dir() {
            return Ok(false);
        }
        FileUtils::delete_directory(&dir)?;
        Ok(true)
    }
}
