use camino::Utf8PathBuf;
use mod_vault_lib::utils::file::FileUtils;
use mod_vault_lib::utils::id::{hash_id, short_file_name_hash_id};
use mod_vault_lib::utils::path::{
    generate_valid_file_name, is_package_file, last_segment, standardize_directory_separator,
    to_forward_slashes, trim_separators,
};
use std::fs;
use std::path::MAIN_SEPARATOR;
use tempfile::tempdir;

#[test]
fn test_standardize_directory_separator() {
    let expected = format!("a{MAIN_SEPARATOR}b{MAIN_SEPARATOR}c");

    assert_eq!(standardize_directory_separator("a/b\\c"), expected);
    assert_eq!(standardize_directory_separator("   "), "");
    assert_eq!(to_forward_slashes("a\\b\\c"), "a/b/c");
}

#[test]
fn test_segments_and_trimming() {
    assert_eq!(trim_separators("/a/b\\"), "a/b");
    assert_eq!(last_segment("C:\\mods\\pdx_12\\"), Some("pdx_12"));
    assert_eq!(last_segment("/"), None);
}

#[test]
fn test_valid_file_name() {
    assert_eq!(generate_valid_file_name("My: Mod?/v2"), "My_Modv2");
    assert_eq!(generate_valid_file_name("plain"), "plain");
    assert_eq!(generate_valid_file_name(""), "");
}

#[test]
fn test_package_extensions() {
    assert!(is_package_file("mod.zip"));
    assert!(is_package_file("MOD.BIN"));
    assert!(!is_package_file("mod.zip.txt"));
    assert!(!is_package_file("descriptor.mod"));
}

#[test]
fn test_short_hash_id() {
    let short = short_file_name_hash_id("My Collection", 8);

    assert_eq!(short.len(), 8);
    assert!(hash_id("My Collection").starts_with(&short));
    assert_eq!(short, short_file_name_hash_id("My Collection", 8));
    assert_eq!(short_file_name_hash_id(" ", 8), "");
}

#[test]
fn test_file_utils_walk_and_delete() {
    let temp = tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();

    fs::create_dir_all(root.join("b/c")).unwrap();
    fs::write(root.join("b/c/deep.txt"), "").unwrap();
    fs::write(root.join("a.txt"), "").unwrap();
    FileUtils::set_read_only(&root.join("a.txt"), true).unwrap();

    let files = FileUtils::collect_files(&root).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|f| FileUtils::relative_entry_name(&root, f).unwrap())
        .collect();
    assert_eq!(names, vec!["a.txt", "b/c/deep.txt"]);

    FileUtils::delete_directory(&root).unwrap();
    assert!(!root.exists());
    FileUtils::delete_directory(&root).unwrap();
}
