//! Canonical descriptor identity for a discovered mod.
//!
//! Every mod gets a local fallback identity `mod/<name>.mod` derived from its folder or
//! package name. Steam and Paradox mods prefer `mod/<prefix><remote id>.mod`, but only
//! when a positive remote id could be established; otherwise they are demoted to local.

use crate::models::constants::{MOD_DIRECTORY, MOD_EXTENSION, PARADOX_MOD_ID, STEAM_MOD_ID};
use crate::models::mod_dto::ModSource;
use crate::utils::path::last_segment;
use camino::Utf8Path;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub descriptor_file: String,
    pub remote_id: Option<i64>,
    pub source: ModSource,
}

/// Resolves `path` (a mod folder or package file) to its descriptor identity.
/// `manifest_remote_id` is the id already declared by the mod's own descriptor, if any.
pub fn resolve(
    path: &Utf8Path,
    is_directory: bool,
    declared: ModSource,
    manifest_remote_id: Option<i64>,
) -> Resolution {
    let local = local_path(path, is_directory);

    match declared {
        ModSource::Steam => {
            let remote_id = match manifest_remote_id {
                Some(id) if id != 0 => id,
                _ => derive_remote_id(path, is_directory, STEAM_MOD_ID),
            };
            let desired = remote_path(STEAM_MOD_ID, remote_id);
            apply_fallback(desired, local, remote_id, ModSource::Steam)
        }
        ModSource::Paradox => {
            let remote_id = derive_remote_id(path, is_directory, PARADOX_MOD_ID);
            let desired = remote_path(PARADOX_MOD_ID, remote_id);
            apply_fallback(desired, local, remote_id, ModSource::Paradox)
        }
        ModSource::Local => Resolution {
            descriptor_file: local,
            remote_id: manifest_remote_id,
            source: ModSource::Local,
        },
        ModSource::Unspecified => Resolution {
            descriptor_file: local,
            remote_id: manifest_remote_id,
            source: ModSource::Unspecified,
        },
    }
}

/// `mod/<last segment without extension>.mod`.
pub fn local_path(path: &Utf8Path, is_directory: bool) -> String {
    let name = if is_directory {
        last_segment(path.as_str()).unwrap_or_default()
    } else {
        path.file_stem().unwrap_or_default()
    };
    format!("{MOD_DIRECTORY}/{name}{MOD_EXTENSION}")
}

/// A directory whose name contains the Paradox id token is always a Paradox mod.
pub fn effective_source(directory: &Utf8Path, hint: ModSource) -> ModSource {
    let is_paradox = last_segment(directory.as_str())
        .map(|name| name.to_lowercase().contains(PARADOX_MOD_ID))
        .unwrap_or(false);
    if is_paradox {
        ModSource::Paradox
    } else {
        hint
    }
}

/// Strips every occurrence of `prefix` (case-insensitive) and parses the rest.
/// Anything non-numeric or out of range gives 0.
pub fn parse_remote_id(name: &str, prefix: &str) -> i64 {
    let lowered = name.to_lowercase();
    let stripped = lowered.replace(&prefix.to_lowercase(), "");
    stripped.trim().parse::<i64>().unwrap_or(0)
}

/// Packages are named after their id (`123.zip`) or live in an id-named folder
/// (`<workshop>/123/mod.zip`); folders carry the id in their own name.
fn derive_remote_id(path: &Utf8Path, is_directory: bool, prefix: &str) -> i64 {
    if is_directory {
        return last_segment(path.as_str())
            .map(|name| parse_remote_id(name, prefix))
            .unwrap_or(0);
    }

    let from_stem = path
        .file_stem()
        .map(|stem| parse_remote_id(stem, prefix))
        .unwrap_or(0);
    if from_stem > 0 {
        return from_stem;
    }
    path.parent()
        .and_then(|parent| last_segment(parent.as_str()))
        .map(|name| parse_remote_id(name, prefix))
        .unwrap_or(0)
}

fn remote_path(prefix: &str, remote_id: i64) -> String {
    format!("{MOD_DIRECTORY}/{prefix}{remote_id}{MOD_EXTENSION}")
}

fn apply_fallback(desired: String, local: String, remote_id: i64, source: ModSource) -> Resolution {
    if desired.eq_ignore_ascii_case(&local) || remote_id > 0 {
        return Resolution {
            descriptor_file: desired,
            remote_id: Some(remote_id),
            source,
        };
    }
    Resolution {
        descriptor_file: local,
        remote_id: Some(remote_id),
        source: ModSource::Local,
    }
}
