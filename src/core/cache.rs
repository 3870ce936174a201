use crate::models::mod_dto::Mod;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Read-cache of installed descriptors, keyed by [`mods_key`].
#[derive(Default)]
pub struct DescriptorCache {
    entries: RwLock<BTreeMap<String, Vec<Mod>>>,
    invalidations: AtomicUsize,
}

pub fn mods_key(game: &str, valid_only: bool) -> String {
    let scope = if valid_only { "valid" } else { "all" };
    format!("mods:{game}:{scope}")
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Vec<Mod>> {
        self.entries.read().get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, mods: Vec<Mod>) {
        self.entries.write().insert(key.into(), mods);
    }

    /// Drops every listed key in one write.
    pub fn invalidate<I, K>(&self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut entries = self.entries.write();
        for key in keys {
            entries.remove(key.as_ref());
        }
        self.invalidations.fetch_add(1, Ordering::SeqCst);
    }

    /// Drops both installed-mod listings of `game`.
    pub fn invalidate_game(&self, game: &str) {
        self.invalidate([mods_key(game, true), mods_key(game, false)]);
    }

    /// How many times [`invalidate`](Self::invalidate) ran.
    pub fn invalidation_count(&self) -> usize {
        self.invalidations.load(Ordering::SeqCst)
    }
}
