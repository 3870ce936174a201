use crate::core::descriptor_writer::DescriptorWriter;
use crate::core::lock_policy;
use crate::models::constants::PATCH_MOD_PREFIX;
use crate::models::error::SError;
use crate::models::game::GameProfile;
use crate::models::mod_dto::{DiscoveryResult, Mod};
use std::collections::{HashMap, HashSet};
use tokio::task::JoinSet;
use tracing::{error, info, instrument};

/// Mods generated by the collection patcher carry a reserved name prefix.
pub fn is_patch_mod(name: &str) -> bool {
    name.to_lowercase()
        .starts_with(&PATCH_MOD_PREFIX.to_lowercase())
}

pub struct InstallationDiffer;

impl InstallationDiffer {
    /// Results worth writing: resolved, not a patch mod, and not already known under the
    /// same descriptor (case-insensitive). When several results share a descriptor only
    /// the first is kept.
    pub fn diff(discovered: Vec<DiscoveryResult>, known: &[Mod]) -> Vec<DiscoveryResult> {
        let mut seen: HashSet<String> = known
            .iter()
            .map(|m| m.descriptor_file.to_lowercase())
            .collect();

        discovered
            .into_iter()
            .filter(|result| {
                let Some(mod_entry) = &result.mod_entry else {
                    return false;
                };
                !is_patch_mod(&mod_entry.name) && seen.insert(mod_entry.descriptor_file.to_lowercase())
            })
            .collect()
    }

    /// Writes every descriptor concurrently and waits for all of them.
    /// Returns `(installed, failed)` in input order; `installed` is only set on results whose
    /// write completed.
    #[instrument(skip_all, fields(game = %game.name, count = installable.len()))]
    pub async fn install_batch(
        writer: &DescriptorWriter,
        game: &GameProfile,
        installable: Vec<DiscoveryResult>,
        retained: &[Mod],
    ) -> Result<(Vec<DiscoveryResult>, Vec<DiscoveryResult>), SError> {
        let retained_locks: HashMap<String, bool> = retained
            .iter()
            .map(|m| (m.descriptor_file.to_lowercase(), m.is_locked))
            .collect();

        let mut tasks = JoinSet::new();
        for (index, mut result) in installable.into_iter().enumerate() {
            let Some(mod_entry) = result.mod_entry.as_mut() else {
                continue;
            };
            let retained = retained_locks
                .get(&mod_entry.descriptor_file.to_lowercase())
                .copied();
            mod_entry.is_locked = lock_policy::resolve_lock(game, mod_entry, retained);

            let writer = writer.clone();
            let root = game.user_directory.clone();
            tasks.spawn_blocking(move || {
                let written = match &result.mod_entry {
                    Some(m) => writer.write_descriptor(&root, m),
                    None => Ok(()),
                };
                (index, result, written)
            });
        }

        let mut completed = Vec::with_capacity(tasks.len());
        let mut join_error = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(done) => completed.push(done),
                Err(e) => {
                    error!("Descriptor write task failed: {e}");
                    join_error.get_or_insert(e);
                }
            }
        }
        if let Some(e) = join_error {
            return Err(e.into());
        }
        completed.sort_by_key(|(index, _, _)| *index);

        let mut installed = Vec::new();
        let mut failed = Vec::new();
        for (_, mut result, written) in completed {
            match written {
                Ok(()) => {
                    result.installed = true;
                    installed.push(result);
                }
                Err(e) => {
                    error!("Failed to write descriptor for {}: {e}", result.path);
                    failed.push(result);
                }
            }
        }
        info!("Installed {} mods, {} failed", installed.len(), failed.len());
        Ok((installed, failed))
    }
}
