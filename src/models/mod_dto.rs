use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Where a mod was discovered. Decides the descriptor naming convention.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ModSource {
    Local,
    Steam,
    Paradox,
    #[default]
    Unspecified,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AchievementStatus {
    #[default]
    NotEvaluated,
    Compatible,
    NotCompatible,
}

/// Structured content of a descriptor (`.mod`) file.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ModDescriptor {
    pub name: String,
    pub version: Option<String>,
    pub path: Option<String>,
    pub archive: Option<String>,
    pub picture: Option<String>,
    pub remote_id: Option<i64>,
    pub supported_version: Option<String>,
    pub tags: Vec<String>,
    pub dependencies: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Mod {
    pub name: String,
    pub version: Option<String>,
    /// Original location, forward-slash separated.
    pub file_name: String,
    /// Original location, OS separators.
    pub full_path: String,
    /// Canonical identity relative to the user directory, e.g. `mod/steam_123.mod`.
    pub descriptor_file: String,
    pub remote_id: Option<i64>,
    pub source: ModSource,
    pub is_locked: bool,
    pub is_valid: bool,
    pub picture: Option<String>,
    pub supported_version: Option<String>,
    pub tags: Vec<String>,
    pub dependencies: Vec<String>,
    /// Content files relative to the mod root, forward-slash separated.
    pub files: Vec<String>,
    pub achievement_status: AchievementStatus,
}

impl Mod {
    pub fn from_descriptor(descriptor: ModDescriptor) -> Self {
        Self {
            name: descriptor.name,
            version: descriptor.version,
            remote_id: descriptor.remote_id,
            picture: descriptor.picture,
            supported_version: descriptor.supported_version,
            tags: descriptor.tags,
            dependencies: descriptor.dependencies,
            is_valid: true,
            ..Default::default()
        }
    }

    pub fn is_package(&self) -> bool {
        crate::utils::path::is_package_file(&self.file_name)
    }

    /// Descriptor content for this mod, pointing back at its content location.
    pub fn to_descriptor(&self) -> ModDescriptor {
        let (path, archive) = if self.is_package() {
            (None, Some(self.file_name.clone()))
        } else {
            (Some(self.file_name.clone()), None)
        };
        ModDescriptor {
            name: self.name.clone(),
            version: self.version.clone(),
            path,
            archive,
            picture: self.picture.clone(),
            remote_id: self.remote_id,
            supported_version: self.supported_version.clone(),
            tags: self.tags.clone(),
            dependencies: self.dependencies.clone(),
        }
    }
}

/// An on-disk artifact considered during discovery.
#[derive(Clone, Debug, PartialEq)]
pub struct ModCandidate {
    pub path: Utf8PathBuf,
    pub is_directory: bool,
    pub source: ModSource,
    /// Set when the directory could not be listed; the candidate is reported invalid.
    pub listing_error: Option<String>,
}

/// Working unit between discovery and install. Never persisted.
#[derive(Clone, Debug, Default)]
pub struct DiscoveryResult {
    pub mod_entry: Option<Mod>,
    pub path: Utf8PathBuf,
    pub invalid: bool,
    pub installed: bool,
}

#[derive(Debug, Default)]
pub struct InstallReport {
    pub installed: Vec<DiscoveryResult>,
    pub failed: Vec<DiscoveryResult>,
    pub invalid: Vec<DiscoveryResult>,
}

impl InstallReport {
    pub fn is_empty(&self) -> bool {
        self.installed.is_empty() && self.failed.is_empty() && self.invalid.is_empty()
    }
}
