use crate::core::cache::{mods_key, DescriptorCache};
use crate::core::descriptor_parser::DescriptorParser;
use crate::core::descriptor_reader::DescriptorReader;
use crate::core::descriptor_writer::DescriptorWriter;
use crate::core::discovery::ModDiscovery;
use crate::core::installer::{is_patch_mod, InstallationDiffer};
use crate::core::lock_policy;
use crate::models::constants::{
    MOD_DIRECTORY, MOD_EXTENSION, PARADOX_MOD_ID, PARADOX_URL, PATCH_MOD_PREFIX, STEAM_MOD_ID,
    STEAM_PROTOCOL_URI, STEAM_URL,
};
use crate::models::error::SError;
use crate::models::game::GameProfile;
use crate::models::mod_dto::{AchievementStatus, DiscoveryResult, InstallReport, Mod, ModSource};
use crate::utils::file::FileUtils;
use crate::utils::id::short_file_name_hash_id;
use crate::utils::path::{
    generate_valid_file_name, has_extension, standardize_directory_separator, to_forward_slashes,
};
use camino::{Utf8Path, Utf8PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, instrument, warn};

const PATCH_NAME_HASH_LENGTH: usize = 8;

/// Installed-mod bookkeeping for one game: listing, install, lock, delete and purge.
#[derive(Clone)]
pub struct ModService {
    parser: Arc<dyn DescriptorParser>,
    writer: DescriptorWriter,
    cache: Arc<DescriptorCache>,
}

impl ModService {
    pub fn new(parser: Arc<dyn DescriptorParser>, cache: Arc<DescriptorCache>) -> Self {
        Self {
            writer: DescriptorWriter::new(parser.clone()),
            parser,
            cache,
        }
    }

    pub fn cache(&self) -> &DescriptorCache {
        &self.cache
    }

    /// Descriptors currently installed in `<user>/mod`. With `valid_only` unreadable
    /// descriptors are left out, otherwise they are listed with `is_valid == false`.
    pub fn installed_mods(&self, game: &GameProfile, valid_only: bool) -> Result<Vec<Mod>, SError> {
        let key = mods_key(&game.name, valid_only);
        if let Some(mods) = self.cache.get(&key) {
            return Ok(mods);
        }

        let mod_dir = game.mod_directory();
        let mut mods = Vec::new();
        if mod_dir.is_dir() {
            let mut descriptors: Vec<Utf8PathBuf> = mod_dir
                .read_dir_utf8()?
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
                .filter(|e| has_extension(e.file_name(), MOD_EXTENSION))
                .map(|e| e.into_path())
                .collect();
            descriptors.sort();

            for path in descriptors {
                match self.read_installed(&path) {
                    Ok(m) => mods.push(m),
                    Err(e) => {
                        warn!("Unreadable descriptor {path}: {e}");
                        if !valid_only {
                            mods.push(Self::invalid_installed(&path));
                        }
                    }
                }
            }
        }

        self.cache.set(key, mods.clone());
        Ok(mods)
    }

    pub fn refresh_installed_mods(&self, game: &GameProfile) -> Result<Vec<Mod>, SError> {
        self.cache.invalidate_game(&game.name);
        self.installed_mods(game, true)
    }

    /// Discovery over every mod location of `game`: the user mod folder as local, the
    /// workshop as Steam and the launcher folder as Paradox.
    pub fn discover_all(&self, game: &GameProfile) -> Vec<DiscoveryResult> {
        let discovery = ModDiscovery::new(self.parser.as_ref());
        let mut results = discovery.discover(&game.mod_directory(), ModSource::Local);
        if let Some(dir) = game.workshop_directory() {
            results.extend(discovery.discover(dir, ModSource::Steam));
        }
        if let Some(dir) = game.paradox_directory() {
            results.extend(discovery.discover(dir, ModSource::Paradox));
        }
        results
    }

    /// Writes descriptors for every discovered mod that is not installed yet.
    /// `status_to_retain` carries lock flags of mods whose descriptors were removed earlier.
    #[instrument(skip_all, fields(game = %game.name))]
    pub async fn install_mods(
        &self,
        game: &GameProfile,
        status_to_retain: &[Mod],
    ) -> Result<InstallReport, SError> {
        let mut report = InstallReport::default();
        let (invalid, discovered): (Vec<_>, Vec<_>) =
            self.discover_all(game).into_iter().partition(|r| r.invalid);
        report.invalid = invalid;

        let known = self.installed_mods(game, false)?;
        let installable = InstallationDiffer::diff(discovered, &known);
        if installable.is_empty() {
            info!("Nothing to install");
            return Ok(report);
        }

        info!("Installing {} mods", installable.len());
        DescriptorWriter::create_mod_directory(&game.user_directory)?;
        let batch =
            InstallationDiffer::install_batch(&self.writer, game, installable, status_to_retain)
                .await;
        // Finished writes are on disk even when a task died
        self.cache.invalidate_game(&game.name);
        let (installed, failed) = batch?;

        report.installed = installed;
        report.failed = failed;
        Ok(report)
    }

    /// Locks or unlocks descriptors concurrently. Mods the lock policy keeps writable are
    /// skipped. Returns how many descriptors changed.
    pub async fn lock_descriptors(
        &self,
        game: &GameProfile,
        mods: &mut [Mod],
        locked: bool,
    ) -> Result<usize, SError> {
        let mut tasks = JoinSet::new();
        for (index, mod_entry) in mods.iter().enumerate() {
            if locked && lock_policy::should_force_unlocked(game, mod_entry) {
                continue;
            }
            let root = game.user_directory.clone();
            let mod_entry = mod_entry.clone();
            tasks.spawn_blocking(move || {
                (index, DescriptorWriter::set_descriptor_lock(&root, &mod_entry, locked))
            });
        }

        let mut changed = 0;
        let mut first_error = None;
        while let Some(joined) = tasks.join_next().await {
            let (index, outcome) = match joined {
                Ok(done) => done,
                Err(e) => {
                    first_error.get_or_insert(e.into());
                    continue;
                }
            };
            match outcome {
                Ok(true) => {
                    mods[index].is_locked = locked;
                    changed += 1;
                }
                Ok(false) => {}
                Err(e) => {
                    warn!("Failed to change lock of {}: {e}", mods[index].descriptor_file);
                    first_error.get_or_insert(e);
                }
            }
        }
        self.cache.invalidate_game(&game.name);

        match first_error {
            Some(e) => Err(e),
            None => Ok(changed),
        }
    }

    /// Removes descriptors concurrently. Returns how many were deleted.
    pub async fn delete_descriptors(&self, game: &GameProfile, mods: &[Mod]) -> Result<usize, SError> {
        let mut tasks = JoinSet::new();
        for mod_entry in mods.iter().cloned() {
            let root = game.user_directory.clone();
            tasks.spawn_blocking(move || DescriptorWriter::delete_descriptor(&root, &mod_entry));
        }

        let mut deleted = 0;
        let mut first_error = None;
        while let Some(joined) = tasks.join_next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    first_error.get_or_insert(e.into());
                    continue;
                }
            };
            match outcome {
                Ok(true) => deleted += 1,
                Ok(false) => {}
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        self.cache.invalidate_game(&game.name);

        match first_error {
            Some(e) => Err(e),
            None => Ok(deleted),
        }
    }

    pub fn mod_directory_exists(&self, game: &GameProfile, folder: &str) -> bool {
        DescriptorWriter::mod_directory_exists(&game.user_directory, folder)
    }

    /// Deletes `<user>/mod/<folder>` and every installed descriptor pointing inside it.
    pub async fn purge_mod_directory(&self, game: &GameProfile, folder: &str) -> Result<bool, SError> {
        let target = standardize_directory_separator(game.mod_directory().join(folder).as_str())
            .to_lowercase();
        let orphaned: Vec<Mod> = self
            .installed_mods(game, false)?
            .into_iter()
            .filter(|m| !m.full_path.is_empty() && m.full_path.to_lowercase().starts_with(&target))
            .collect();
        if !orphaned.is_empty() {
            self.delete_descriptors(game, &orphaned).await?;
        }

        let purged = DescriptorWriter::purge_mod_directory(&game.user_directory, folder)?;
        self.cache.invalidate_game(&game.name);
        Ok(purged)
    }

    fn read_installed(&self, path: &Utf8Path) -> Result<Mod, SError> {
        let content = std::fs::read_to_string(path)?;
        let descriptor = self.parser.parse(&content)?;
        let location = descriptor
            .archive
            .clone()
            .or_else(|| descriptor.path.clone())
            .unwrap_or_default();

        let mut mod_entry = Mod::from_descriptor(descriptor);
        mod_entry.descriptor_file = descriptor_file_name(path);
        mod_entry.file_name = to_forward_slashes(&location);
        mod_entry.full_path = standardize_directory_separator(&location);
        mod_entry.is_locked = FileUtils::is_read_only(path)?;
        mod_entry.source = source_from_descriptor(&mod_entry.descriptor_file);

        let content_root = Utf8Path::new(&location);
        if content_root.exists() {
            match DescriptorReader::list_files(content_root) {
                Ok(files) => mod_entry.files = files,
                Err(e) => warn!("Could not list files of {location}: {e}"),
            }
        }
        Ok(mod_entry)
    }

    fn invalid_installed(path: &Utf8Path) -> Mod {
        Mod {
            name: path.file_stem().unwrap_or_default().to_string(),
            descriptor_file: descriptor_file_name(path),
            is_valid: false,
            ..Default::default()
        }
    }
}

fn descriptor_file_name(path: &Utf8Path) -> String {
    format!("{MOD_DIRECTORY}/{}", path.file_name().unwrap_or_default())
}

/// Installed descriptors carry their source in the file name prefix.
fn source_from_descriptor(descriptor_file: &str) -> ModSource {
    let name = descriptor_file
        .rsplit('/')
        .next()
        .unwrap_or(descriptor_file)
        .to_lowercase();
    if name.starts_with(STEAM_MOD_ID) {
        ModSource::Steam
    } else if name.starts_with(PARADOX_MOD_ID) {
        ModSource::Paradox
    } else {
        ModSource::Local
    }
}

/// Workshop page of the mod, or an empty string when it has no remote id.
/// Anything but a Paradox mod links to Steam, local copies of workshop mods included.
/// A demoted id of 0 counts as no id.
pub fn build_mod_url(mod_entry: &Mod) -> String {
    let Some(id) = mod_entry.remote_id.filter(|id| *id > 0) else {
        return String::new();
    };
    match mod_entry.source {
        ModSource::Paradox => format!("{PARADOX_URL}{id}/Any"),
        _ => format!("{STEAM_URL}{id}"),
    }
}

/// `steam://openurl/` link opening the workshop page inside the Steam client.
pub fn build_steam_url(mod_entry: &Mod) -> String {
    if mod_entry.source == ModSource::Paradox {
        return String::new();
    }
    let url = build_mod_url(mod_entry);
    if url.is_empty() {
        return url;
    }
    format!("{STEAM_PROTOCOL_URI}{url}")
}

/// Marks every valid mod as compatible unless it touches one of the game's checksum folders.
/// Returns `false` when there was nothing to evaluate.
pub fn eval_achievement_compatibility(game: &GameProfile, mods: &mut [Mod]) -> bool {
    if mods.is_empty() {
        return false;
    }
    let folders: Vec<String> = game
        .checksum_folders
        .iter()
        .map(|f| to_forward_slashes(f).to_lowercase())
        .collect();

    for mod_entry in mods.iter_mut().filter(|m| m.is_valid) {
        if mod_entry.files.is_empty() {
            mod_entry.achievement_status = AchievementStatus::NotEvaluated;
            continue;
        }
        let touches_checksum = mod_entry.files.iter().any(|file| {
            let file = to_forward_slashes(file).to_lowercase();
            folders.iter().any(|folder| file.starts_with(folder))
        });
        mod_entry.achievement_status = if touches_checksum {
            AchievementStatus::NotCompatible
        } else {
            AchievementStatus::Compatible
        };
    }
    true
}

pub fn is_patch(mod_entry: &Mod) -> bool {
    is_patch_mod(&mod_entry.name)
}

/// Name of the patch mod generated for a collection.
pub fn collection_patch_name(collection: &str) -> String {
    let mut name = generate_valid_file_name(collection);
    if name.trim().is_empty() {
        name = short_file_name_hash_id(collection, PATCH_NAME_HASH_LENGTH);
    }
    format!("{PATCH_MOD_PREFIX}{name}")
}
