//! Naming conventions shared by discovery, descriptor writes and collection archives.
//! Changing any of these breaks round-trips with previously written descriptors and archives.

/// Subdirectory of the game's user directory holding descriptors.
pub const MOD_DIRECTORY: &str = "mod";
pub const MOD_EXTENSION: &str = ".mod";
pub const ZIP_EXTENSION: &str = ".zip";
pub const BIN_EXTENSION: &str = ".bin";

/// Descriptor name looked up first inside a mod folder or package (case-sensitive).
pub const DESCRIPTOR_FILE: &str = "descriptor.mod";

pub const STEAM_MOD_ID: &str = "steam_";
pub const PARADOX_MOD_ID: &str = "pdx_";

/// Reserved entry name of the manifest inside a collection archive.
pub const EXPORTED_MOD_CONTENT_ID: &str = "exported.json";

/// Name prefix of the engine-generated patch mod.
pub const PATCH_MOD_PREFIX: &str = "ModVault_";

pub const STEAM_URL: &str = "https://steamcommunity.com/sharedfiles/filedetails/?id=";
pub const PARADOX_URL: &str = "https://mods.paradoxplaza.com/mods/";
pub const STEAM_PROTOCOL_URI: &str = "steam://openurl/";

pub const PACKAGE_EXTENSIONS: [&str; 2] = [ZIP_EXTENSION, BIN_EXTENSION];
