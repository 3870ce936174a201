mod common;

use common::{create_mod_folder, create_package, descriptor_text, setup_test_env};
use mod_vault_lib::core::descriptor_parser::{DescriptorParser, ParadoxDescriptorParser};
use mod_vault_lib::core::descriptor_reader::{DescriptorLookup, DescriptorReader};
use mod_vault_lib::core::descriptor_writer::DescriptorWriter;
use mod_vault_lib::models::error::SError;
use mod_vault_lib::models::mod_dto::{Mod, ModDescriptor};
use mod_vault_lib::utils::file::FileUtils;
use std::fs;
use std::sync::Arc;

#[test]
fn test_parse_descriptor() {
    let text = "\u{feff}name=\"Better Ships\"\n\
                version=\"2.1\"\n\
                tags={\n\t\"Gameplay\"\n\t\"Military\"\n}\n\
                dependencies={ \"Core Lib\" }\n\
                picture=\"thumb.png\"\n\
                remote_file_id=\"123456789\"\n\
                supported_version=\"3.*\"\n";

    let d = ParadoxDescriptorParser.parse(text).unwrap();

    assert_eq!(d.name, "Better Ships");
    assert_eq!(d.version.as_deref(), Some("2.1"));
    assert_eq!(d.tags, vec!["Gameplay", "Military"]);
    assert_eq!(d.dependencies, vec!["Core Lib"]);
    assert_eq!(d.picture.as_deref(), Some("thumb.png"));
    assert_eq!(d.remote_id, Some(123456789));
    assert_eq!(d.supported_version.as_deref(), Some("3.*"));
}

#[test]
fn test_parse_from_many_threads() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                let text = descriptor_text(&format!("Mod {i}"), Some(i));
                ParadoxDescriptorParser.parse(&text).unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let d = handle.join().unwrap();
        assert_eq!(d.name, format!("Mod {i}"));
        assert_eq!(d.remote_id, Some(i as i64));
    }
}

#[test]
fn test_parse_errors() {
    let parser = ParadoxDescriptorParser;

    assert!(matches!(
        parser.parse("version=\"1\""),
        Err(SError::ParseError(_))
    ));
    assert!(matches!(
        parser.parse("name=\"x\"\nremote_file_id=\"abc\""),
        Err(SError::ParseError(_))
    ));
}

#[test]
fn test_serialize_then_parse() {
    let parser = ParadoxDescriptorParser;
    let descriptor = ModDescriptor {
        name: "Quoted \"Name\"".to_string(),
        version: Some("1.0".to_string()),
        archive: Some("C:/mods/123.zip".to_string()),
        remote_id: Some(123),
        tags: vec!["Graphics".to_string()],
        ..Default::default()
    };

    let text = parser.serialize(&descriptor);
    assert!(text.contains("archive=\"C:/mods/123.zip\""));
    assert!(!text.contains("path="));

    let parsed = parser.parse(&text).unwrap();
    assert_eq!(parsed.name, "Quoted 'Name'");
    assert_eq!(parsed.archive, descriptor.archive);
    assert_eq!(parsed.remote_id, Some(123));
    assert_eq!(parsed.tags, descriptor.tags);
}

#[test]
fn test_read_descriptor_prefers_exact_name() {
    let (_tmp, _user, workshop) = setup_test_env();
    let dir = create_mod_folder(&workshop, "1", &descriptor_text("Exact", None));
    fs::write(dir.join("another.mod"), descriptor_text("Other", None)).unwrap();

    let info = DescriptorReader::read_descriptor(&dir).unwrap().unwrap();

    assert_eq!(info.file_name, "descriptor.mod");
    assert!(info.content.contains("Exact"));
    assert!(!info.is_read_only);
}

#[test]
#[cfg(target_os = "linux")]
fn test_exact_lookup_is_case_sensitive() {
    let (_tmp, _user, workshop) = setup_test_env();
    let dir = workshop.join("2");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("Descriptor.MOD"), descriptor_text("Upper", None)).unwrap();

    let exact =
        DescriptorReader::get_file_info(&dir, DescriptorLookup::Exact("descriptor.mod")).unwrap();
    let by_extension =
        DescriptorReader::get_file_info(&dir, DescriptorLookup::Extension(".mod")).unwrap();

    assert!(exact.is_none());
    assert_eq!(by_extension.unwrap().file_name, "Descriptor.MOD");
}

#[test]
fn test_read_descriptor_from_package() {
    let (_tmp, _user, workshop) = setup_test_env();
    let package = create_package(
        &workshop.join("3.zip"),
        &[
            ("nested/descriptor.mod", descriptor_text("Nested", None).as_str()),
            ("descriptor.mod", descriptor_text("Root", None).as_str()),
            ("common/a.txt", "a"),
        ],
    );
    FileUtils::set_read_only(&package, true).unwrap();

    let info = DescriptorReader::read_descriptor(&package).unwrap().unwrap();
    let files = DescriptorReader::list_files(&package).unwrap();

    assert!(info.content.contains("Root"));
    assert!(info.is_read_only);
    assert_eq!(files.len(), 3);
    assert!(files.contains(&"common/a.txt".to_string()));

    FileUtils::set_read_only(&package, false).unwrap();
}

#[test]
fn test_package_without_descriptor() {
    let (_tmp, _user, workshop) = setup_test_env();
    let package = create_package(&workshop.join("4.bin"), &[("readme.txt", "hi")]);

    assert!(DescriptorReader::read_descriptor(&package).unwrap().is_none());
}

#[test]
fn test_writer_rewrites_locked_descriptor() {
    let (_tmp, user, _workshop) = setup_test_env();
    let writer = DescriptorWriter::new(Arc::new(ParadoxDescriptorParser));
    let mut entry = Mod {
        name: "Writer".to_string(),
        file_name: "/games/workshop/5".to_string(),
        descriptor_file: "mod/steam_5.mod".to_string(),
        remote_id: Some(5),
        is_locked: true,
        ..Default::default()
    };

    // 1. Locked write
    writer.write_descriptor(&user, &entry).unwrap();
    let path = user.join("mod/steam_5.mod");
    assert!(FileUtils::is_read_only(&path).unwrap());
    assert!(fs::read_to_string(&path)
        .unwrap()
        .contains("path=\"/games/workshop/5\""));

    // 2. Rewriting a locked descriptor works and drops the lock when asked
    entry.is_locked = false;
    entry.version = Some("2".to_string());
    writer.write_descriptor(&user, &entry).unwrap();
    assert!(!FileUtils::is_read_only(&path).unwrap());
    assert!(fs::read_to_string(&path).unwrap().contains("version=\"2\""));

    // 3. Lock toggling and deletion
    assert!(DescriptorWriter::set_descriptor_lock(&user, &entry, true).unwrap());
    assert!(DescriptorWriter::delete_descriptor(&user, &entry).unwrap());
    assert!(!path.exists());
    assert!(!DescriptorWriter::set_descriptor_lock(&user, &entry, true).unwrap());
    assert!(!DescriptorWriter::delete_descriptor(&user, &entry).unwrap());
}
