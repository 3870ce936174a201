#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use mod_vault_lib::models::game::GameProfile;
use std::fs;
use std::io::Write;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Temp directory with a `user` (game user dir) and a `workshop` folder.
pub fn setup_test_env() -> (TempDir, Utf8PathBuf, Utf8PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();

    let user = root.join("user");
    let workshop = root.join("workshop");
    fs::create_dir_all(user.join("mod")).unwrap();
    fs::create_dir_all(&workshop).unwrap();

    (tmp, user, workshop)
}

pub fn test_game(user: &Utf8Path, workshop: Option<&Utf8Path>) -> GameProfile {
    GameProfile {
        name: "TestGame".to_string(),
        user_directory: user.to_path_buf(),
        workshop_directory: workshop.map(|w| w.to_path_buf()),
        checksum_folders: vec!["common".to_string(), "events".to_string()],
        is_selected: true,
        ..Default::default()
    }
}

pub fn descriptor_text(name: &str, remote_id: Option<i64>) -> String {
    let mut text = format!("name=\"{name}\"\nversion=\"1.0\"\n");
    if let Some(id) = remote_id {
        text.push_str(&format!("remote_file_id=\"{id}\"\n"));
    }
    text
}

/// Mod folder with `descriptor.mod` and one content file.
pub fn create_mod_folder(parent: &Utf8Path, folder: &str, descriptor: &str) -> Utf8PathBuf {
    let dir = parent.join(folder);
    fs::create_dir_all(dir.join("common")).unwrap();
    fs::write(dir.join("descriptor.mod"), descriptor).unwrap();
    fs::write(dir.join("common/data.txt"), folder).unwrap();
    dir
}

/// Zip package with the given `(name, content)` entries.
pub fn create_package(path: &Utf8Path, entries: &[(&str, &str)]) -> Utf8PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut zip = ZipWriter::new(fs::File::create(path).unwrap());
    for (name, content) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
    path.to_path_buf()
}
