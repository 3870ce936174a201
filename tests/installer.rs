mod common;

use camino::Utf8PathBuf;
use common::{create_mod_folder, create_package, descriptor_text, setup_test_env, test_game};
use mod_vault_lib::core::cache::DescriptorCache;
use mod_vault_lib::core::descriptor_parser::{DescriptorParser, ParadoxDescriptorParser};
use mod_vault_lib::core::installer::InstallationDiffer;
use mod_vault_lib::core::lock_policy::{resolve_lock, should_force_unlocked};
use mod_vault_lib::core::mod_service::ModService;
use mod_vault_lib::models::error::SError;
use mod_vault_lib::models::mod_dto::{DiscoveryResult, Mod, ModDescriptor, ModSource};
use mod_vault_lib::utils::file::FileUtils;
use std::fs;
use std::sync::Arc;

fn discovered(descriptor_file: &str, name: &str) -> DiscoveryResult {
    DiscoveryResult {
        mod_entry: Some(Mod {
            name: name.to_string(),
            descriptor_file: descriptor_file.to_string(),
            is_valid: true,
            ..Default::default()
        }),
        path: Utf8PathBuf::from(format!("/mods/{name}")),
        ..Default::default()
    }
}

fn known(descriptor_file: &str) -> Mod {
    Mod {
        name: "known".to_string(),
        descriptor_file: descriptor_file.to_string(),
        ..Default::default()
    }
}

fn service() -> ModService {
    ModService::new(
        Arc::new(ParadoxDescriptorParser),
        Arc::new(DescriptorCache::new()),
    )
}

#[test]
fn test_diff_against_empty_known_set() {
    let results = vec![
        discovered("mod/steam_1.mod", "One"),
        discovered("mod/steam_2.mod", "Two"),
        DiscoveryResult {
            invalid: true,
            ..Default::default()
        },
        discovered("mod/ModVault_collection.mod", "ModVault_collection"),
    ];

    let installable = InstallationDiffer::diff(results, &[]);

    let names: Vec<_> = installable
        .iter()
        .map(|r| r.mod_entry.as_ref().unwrap().name.as_str())
        .collect();
    assert_eq!(names, vec!["One", "Two"]);
}

#[test]
fn test_diff_skips_known_descriptors() {
    let results = vec![discovered("mod/steam_1.mod", "One")];

    let installable = InstallationDiffer::diff(results, &[known("MOD/STEAM_1.mod")]);

    assert!(installable.is_empty());
}

#[test]
fn test_diff_keeps_first_of_each_descriptor() {
    let results = vec![
        discovered("mod/shared.mod", "Folder"),
        discovered("mod/Shared.mod", "Package"),
        discovered("mod/other.mod", "Other"),
    ];

    let installable = InstallationDiffer::diff(results, &[]);

    assert_eq!(installable.len(), 2);
    assert_eq!(installable[0].mod_entry.as_ref().unwrap().name, "Folder");
    assert_eq!(installable[1].mod_entry.as_ref().unwrap().name, "Other");
}

#[test]
fn test_lock_policy() {
    let (_tmp, user, _workshop) = setup_test_env();
    let mut game = test_game(&user, None);
    let package = Mod {
        file_name: "/games/mod/required.zip".to_string(),
        source: ModSource::Local,
        is_locked: true,
        ..Default::default()
    };

    assert!(!should_force_unlocked(&game, &package));
    assert!(resolve_lock(&game, &package, None));
    assert!(!resolve_lock(&game, &package, Some(false)));

    game.mandatory_local_packages = true;
    assert!(should_force_unlocked(&game, &package));
    assert!(!resolve_lock(&game, &package, Some(true)));

    // Folders and remote mods are not affected
    let folder = Mod {
        file_name: "/games/mod/folder".to_string(),
        ..package.clone()
    };
    let steam = Mod {
        source: ModSource::Steam,
        ..package
    };
    assert!(!should_force_unlocked(&game, &folder));
    assert!(!should_force_unlocked(&game, &steam));
}

#[tokio::test]
async fn test_install_writes_descriptors_once() {
    let (_tmp, user, workshop) = setup_test_env();
    let game = test_game(&user, Some(&workshop));
    let service = service();

    // 1. Two workshop mods and a local folder mod
    create_mod_folder(&workshop, "100", &descriptor_text("Folder Mod", None));
    create_package(
        &workshop.join("200.zip"),
        &[("descriptor.mod", descriptor_text("Package Mod", None).as_str())],
    );
    create_mod_folder(&user.join("mod"), "local_mod", &descriptor_text("Local Mod", None));

    // 2. First pass installs everything
    let report = service.install_mods(&game, &[]).await.unwrap();
    assert_eq!(report.installed.len(), 3);
    assert!(report.failed.is_empty());
    assert!(report.installed.iter().all(|r| r.installed));
    assert_eq!(service.cache().invalidation_count(), 1);

    let mod_dir = user.join("mod");
    assert!(mod_dir.join("steam_100.mod").is_file());
    assert!(mod_dir.join("local_mod.mod").is_file());
    let package = fs::read_to_string(mod_dir.join("steam_200.mod")).unwrap();
    assert!(package.contains("name=\"Package Mod\""));
    assert!(package.contains("archive=\""));
    assert!(package.contains("200.zip\""));
    let folder = fs::read_to_string(mod_dir.join("steam_100.mod")).unwrap();
    assert!(folder.contains("path=\""));

    // 3. Second pass is a no-op
    let report = service.install_mods(&game, &[]).await.unwrap();
    assert!(report.installed.is_empty());
    assert_eq!(service.cache().invalidation_count(), 1);

    let installed = service.installed_mods(&game, true).unwrap();
    assert_eq!(installed.len(), 3);
}

#[tokio::test]
async fn test_install_carries_lock_forward() {
    let (_tmp, user, workshop) = setup_test_env();
    let game = test_game(&user, Some(&workshop));
    let service = service();

    create_mod_folder(&workshop, "100", &descriptor_text("Locked Mod", None));
    let retained = vec![Mod {
        descriptor_file: "mod/steam_100.mod".to_string(),
        is_locked: true,
        ..Default::default()
    }];

    let report = service.install_mods(&game, &retained).await.unwrap();

    assert_eq!(report.installed.len(), 1);
    assert!(report.installed[0].mod_entry.as_ref().unwrap().is_locked);
    let descriptor = user.join("mod/steam_100.mod");
    assert!(FileUtils::is_read_only(&descriptor).unwrap());

    FileUtils::set_read_only(&descriptor, false).unwrap();
}

#[tokio::test]
async fn test_install_forces_mandatory_packages_unlocked() {
    let (_tmp, user, _workshop) = setup_test_env();
    let mut game = test_game(&user, None);
    game.mandatory_local_packages = true;
    let service = service();

    create_package(
        &user.join("mod/required.zip"),
        &[("descriptor.mod", descriptor_text("Required", None).as_str())],
    );
    let retained = vec![Mod {
        descriptor_file: "mod/required.mod".to_string(),
        is_locked: true,
        ..Default::default()
    }];

    let report = service.install_mods(&game, &retained).await.unwrap();

    assert_eq!(report.installed.len(), 1);
    assert!(!report.installed[0].mod_entry.as_ref().unwrap().is_locked);
    assert!(!FileUtils::is_read_only(&user.join("mod/required.mod")).unwrap());
}

#[tokio::test]
async fn test_failed_write_is_not_installed() {
    let (_tmp, user, workshop) = setup_test_env();
    let game = test_game(&user, Some(&workshop));
    let service = service();

    create_mod_folder(&workshop, "100", &descriptor_text("Good", None));
    create_mod_folder(&workshop, "200", &descriptor_text("Blocked", None));
    // A directory where the descriptor file should go
    fs::create_dir_all(user.join("mod/steam_200.mod")).unwrap();

    let report = service.install_mods(&game, &[]).await.unwrap();

    assert_eq!(report.installed.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert!(!report.failed[0].installed);
    assert_eq!(
        report.failed[0].mod_entry.as_ref().unwrap().descriptor_file,
        "mod/steam_200.mod"
    );
    assert_eq!(service.cache().invalidation_count(), 1);
}

#[tokio::test]
async fn test_invalid_mods_are_reported() {
    let (_tmp, user, workshop) = setup_test_env();
    let game = test_game(&user, Some(&workshop));
    let service = service();

    create_mod_folder(&workshop, "100", &descriptor_text("Good", None));
    create_mod_folder(&workshop, "300", "version=\"1\"\n");

    let report = service.install_mods(&game, &[]).await.unwrap();

    assert_eq!(report.installed.len(), 1);
    assert_eq!(report.invalid.len(), 1);
    assert!(report.invalid[0].path.ends_with("300"));
}

/// Parses normally but blows up when asked to write the named mod.
struct PanickingParser(&'static str);

impl DescriptorParser for PanickingParser {
    fn parse(&self, text: &str) -> Result<ModDescriptor, SError> {
        ParadoxDescriptorParser.parse(text)
    }

    fn serialize(&self, descriptor: &ModDescriptor) -> String {
        if descriptor.name == self.0 {
            panic!("cannot serialize {}", descriptor.name);
        }
        ParadoxDescriptorParser.serialize(descriptor)
    }
}

#[tokio::test]
async fn test_crashed_write_still_invalidates_cache() {
    let (_tmp, user, workshop) = setup_test_env();
    let game = test_game(&user, Some(&workshop));
    let service = ModService::new(
        Arc::new(PanickingParser("Crash")),
        Arc::new(DescriptorCache::new()),
    );

    create_mod_folder(&workshop, "100", &descriptor_text("Good", None));
    create_mod_folder(&workshop, "200", &descriptor_text("Crash", None));

    // 1. Prime the cache
    assert!(service.installed_mods(&game, true).unwrap().is_empty());

    // 2. One write task panics
    assert!(service.install_mods(&game, &[]).await.is_err());
    assert_eq!(service.cache().invalidation_count(), 1);

    // 3. The finished write is visible right away
    assert!(user.join("mod/steam_100.mod").is_file());
    let installed = service.installed_mods(&game, true).unwrap();
    assert_eq!(installed.len(), 1);
    assert_eq!(installed[0].name, "Good");
}
