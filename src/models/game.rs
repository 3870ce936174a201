use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::models::paths::UserDirPaths;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct GameProfile {
    pub name: String,
    pub user_directory: Utf8PathBuf,
    #[serde(default)]
    pub workshop_directory: Option<Utf8PathBuf>,
    #[serde(default)]
    pub paradox_directory: Option<Utf8PathBuf>,
    #[serde(default)]
    pub steam_app_id: Option<u64>,
    /// Content folders whose modification disables achievements.
    #[serde(default)]
    pub checksum_folders: Vec<String>,
    /// Local zip/bin mods are required by the game and must stay unlocked.
    #[serde(default)]
    pub mandatory_local_packages: bool,
    #[serde(default)]
    pub is_selected: bool,
}

impl GameProfile {
    pub fn user_paths(&self) -> UserDirPaths {
        UserDirPaths::new(&self.user_directory)
    }

    pub fn mod_directory(&self) -> Utf8PathBuf {
        self.user_paths().mods
    }

    pub fn workshop_directory(&self) -> Option<&Utf8Path> {
        self.workshop_directory.as_deref()
    }

    pub fn paradox_directory(&self) -> Option<&Utf8Path> {
        self.paradox_directory.as_deref()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct GameList {
    #[serde(default)]
    pub games: Vec<GameProfile>,
}
