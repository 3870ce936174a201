use crate::models::error::SError;
use crate::models::game::{GameList, GameProfile};
use crate::utils::toml::Toml;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;

/// Game profiles stored in a TOML file.
pub struct GameRegistry {
    path: Utf8PathBuf,
    games: Vec<GameProfile>,
}

impl GameRegistry {
    /// A missing file is an empty registry.
    pub fn load(path: &Utf8Path) -> Result<Self, SError> {
        let games = if path.is_file() {
            Toml::read::<GameList>(path)?.games
        } else {
            Vec::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            games,
        })
    }

    pub fn save(&self) -> Result<(), SError> {
        Toml::write(
            &self.path,
            &GameList {
                games: self.games.clone(),
            },
        )
    }

    pub fn games(&self) -> &[GameProfile] {
        &self.games
    }

    pub fn selected(&self) -> Result<&GameProfile, SError> {
        self.games
            .iter()
            .find(|g| g.is_selected)
            .ok_or(SError::NoSelectedGame)
    }

    /// Selects `name` (case-insensitive) and clears every other selection.
    pub fn select(&mut self, name: &str) -> Result<&GameProfile, SError> {
        if !self.games.iter().any(|g| g.name.eq_ignore_ascii_case(name)) {
            return Err(SError::ConfigError(format!("Unknown game '{name}'")));
        }
        for game in self.games.iter_mut() {
            game.is_selected = game.name.eq_ignore_ascii_case(name);
        }
        info!("Selected game {name}");
        self.selected()
    }

    /// Adds or replaces a profile with the same name.
    pub fn upsert(&mut self, game: GameProfile) {
        match self.games.iter_mut().find(|g| g.name.eq_ignore_ascii_case(&game.name)) {
            Some(existing) => *existing = game,
            None => self.games.push(game),
        }
    }
}
