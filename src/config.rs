use crate::models::error::SError;
use crate::models::paths::AppPathRules;
use camino::Utf8PathBuf;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "mod_vault";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub version: u8,
    pub games_file: Utf8PathBuf,
    pub log_directory: Utf8PathBuf,
    pub export_directory: Utf8PathBuf,
}

impl Default for AppSettings {
    fn default() -> Self {
        let base_dir = ProjectDirs::from("com", "martes", APP_NAME)
            .map(|dirs| dirs.data_dir().to_path_buf())
            .or_else(|| {
                std::env::current_exe()
                    .ok()
                    .and_then(|exe_path| exe_path.parent().map(|p| p.to_path_buf()))
            })
            .and_then(|p| Utf8PathBuf::try_from(p).ok())
            .unwrap_or_else(|| Utf8PathBuf::from("."));

        Self::with_base(&base_dir)
    }
}

impl AppSettings {
    /// Settings with every location below `base`.
    pub fn with_base(base: &camino::Utf8Path) -> Self {
        let paths = AppPathRules::new(base);
        Self {
            version: 0,
            games_file: paths.games,
            log_directory: paths.logs,
            export_directory: paths.exports,
        }
    }

    pub fn load() -> Result<AppSettings, SError> {
        Ok(confy::load(APP_NAME, None)?)
    }

    pub fn save(&self) -> Result<(), SError> {
        Ok(confy::store(APP_NAME, None, self)?)
    }
}
