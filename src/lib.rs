pub mod config;
pub mod core;
pub mod models;
pub mod utils;

use crate::config::AppSettings;
use crate::core::cache::DescriptorCache;
use crate::core::collection::CollectionArchiver;
use crate::core::descriptor_parser::ParadoxDescriptorParser;
use crate::core::discovery::ModDiscovery;
use crate::core::game::GameRegistry;
use crate::core::mod_service::ModService;
use crate::core::progress::ProgressEvent;
use crate::models::error::SError;
use crate::models::mod_dto::ModSource;
use camino::Utf8PathBuf;
use std::sync::Arc;
use tracing::{debug, error};

const USAGE: &str = "\
mod_vault
  discover <dir> [local|steam|paradox]   List the mods found in a directory
  install                                Install descriptors for the selected game
  export <manifest.json> <mod-dir> <archive> [--order-only]
  import <archive> <dest> [--manifest-only] [--replace]";

pub fn run() -> Result<(), SError> {
    let settings = AppSettings::load()?;
    let _guard = utils::logging::init(&settings.log_directory)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (flags, positional): (Vec<&str>, Vec<&str>) = args
        .iter()
        .map(String::as_str)
        .partition(|a| a.starts_with("--"));
    let has_flag = |name: &str| flags.contains(&name);

    let result = match positional.as_slice() {
        ["discover", dir, rest @ ..] => discover(dir, rest.first().copied()),
        ["install"] => install(&settings),
        ["export", manifest, mod_dir, archive] => {
            export(manifest, mod_dir, archive, has_flag("--order-only"))
        }
        ["import", archive, dest] => import(
            archive,
            dest,
            has_flag("--manifest-only"),
            has_flag("--replace"),
        ),
        _ => {
            println!("{USAGE}");
            Ok(())
        }
    };

    if let Err(e) = &result {
        error!("{e}");
    }
    result
}

fn parse_source(value: Option<&str>) -> Result<ModSource, SError> {
    match value.map(str::to_lowercase).as_deref() {
        None | Some("local") => Ok(ModSource::Local),
        Some("steam") => Ok(ModSource::Steam),
        Some("paradox") => Ok(ModSource::Paradox),
        Some(other) => Err(SError::ParseError(format!("Unknown mod source '{other}'"))),
    }
}

fn discover(dir: &str, source: Option<&str>) -> Result<(), SError> {
    let parser = ParadoxDescriptorParser;
    let results = ModDiscovery::new(&parser).discover(&Utf8PathBuf::from(dir), parse_source(source)?);
    for result in &results {
        match &result.mod_entry {
            Some(m) => println!("{}\t{:?}\t{}", m.descriptor_file, m.source, m.name),
            None => println!("invalid\t{}", result.path),
        }
    }
    Ok(())
}

fn install(settings: &AppSettings) -> Result<(), SError> {
    let registry = GameRegistry::load(&settings.games_file)?;
    let game = registry.selected()?;
    let service = ModService::new(
        Arc::new(ParadoxDescriptorParser),
        Arc::new(DescriptorCache::new()),
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let report = runtime.block_on(service.install_mods(game, &[]))?;
    println!(
        "{} installed, {} failed, {} invalid",
        report.installed.len(),
        report.failed.len(),
        report.invalid.len()
    );
    Ok(())
}

fn archiver() -> CollectionArchiver {
    CollectionArchiver::new(Arc::new(|e: ProgressEvent| {
        debug!("{:.2}%", e.percentage);
    }))
}

fn export(manifest: &str, mod_dir: &str, archive: &str, order_only: bool) -> Result<(), SError> {
    let manifest: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(manifest)?)?;
    let mod_dir = Utf8PathBuf::from(mod_dir);
    archiver().export(
        &manifest,
        Some(&mod_dir),
        &Utf8PathBuf::from(archive),
        order_only,
    )?;
    println!("Exported {archive}");
    Ok(())
}

fn import(archive: &str, dest: &str, manifest_only: bool, replace: bool) -> Result<(), SError> {
    let archive = Utf8PathBuf::from(archive);
    if manifest_only {
        let mut manifest = serde_json::Value::Object(Default::default());
        if archiver().import_manifest(&archive, &mut manifest)? {
            println!("{manifest}");
        } else {
            println!("No manifest in {archive}");
        }
        return Ok(());
    }
    archiver().import_files(&archive, &Utf8PathBuf::from(dest), replace)?;
    println!("Imported {archive} into {dest}");
    Ok(())
}
