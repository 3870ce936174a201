use crate::models::game::GameProfile;
use crate::models::mod_dto::{Mod, ModSource};

/// Games that ship required local zip/bin mods expect those descriptors to stay writable.
pub fn should_force_unlocked(game: &GameProfile, mod_entry: &Mod) -> bool {
    game.mandatory_local_packages && mod_entry.source == ModSource::Local && mod_entry.is_package()
}

/// Lock flag to write for a freshly installed mod. A retained lock from a
/// previously known descriptor wins over the flag read from disk.
pub fn resolve_lock(game: &GameProfile, mod_entry: &Mod, retained: Option<bool>) -> bool {
    if should_force_unlocked(game, mod_entry) {
        return false;
    }
    retained.unwrap_or(mod_entry.is_locked)
}
