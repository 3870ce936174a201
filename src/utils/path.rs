use crate::models::constants::PACKAGE_EXTENSIONS;
use std::path::MAIN_SEPARATOR;

// Characters rejected in file names on at least one supported platform.
const INVALID_FILE_NAME_CHARS: [char; 9] = ['"', '<', '>', '|', ':', '*', '?', '\\', '/'];

/// Rewrites both separator styles to the separator of the current OS.
/// Blank input yields an empty string.
pub fn standardize_directory_separator(value: &str) -> String {
    if value.trim().is_empty() {
        return String::new();
    }
    value
        .chars()
        .map(|c| if c == '\\' || c == '/' { MAIN_SEPARATOR } else { c })
        .collect()
}

pub fn to_forward_slashes(value: &str) -> String {
    value.replace('\\', "/")
}

pub fn trim_separators(value: &str) -> &str {
    value.trim_matches(|c| c == '\\' || c == '/')
}

/// Last non-empty segment of a path written with either separator style.
pub fn last_segment(value: &str) -> Option<&str> {
    value
        .split(|c| c == '\\' || c == '/')
        .filter(|s| !s.is_empty())
        .last()
}

/// Strips characters that are not allowed in file names and replaces spaces with `_`.
pub fn generate_valid_file_name(value: &str) -> String {
    if value.trim().is_empty() {
        return value.to_string();
    }
    value
        .chars()
        .filter(|c| !c.is_control() && !INVALID_FILE_NAME_CHARS.contains(c))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

pub fn has_extension(name: &str, extension: &str) -> bool {
    name.len() >= extension.len()
        && name
            .get(name.len() - extension.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(extension))
}

/// True for zip-like or bin-like mod packages.
pub fn is_package_file(name: &str) -> bool {
    PACKAGE_EXTENSIONS.iter().any(|ext| has_extension(name, ext))
}
