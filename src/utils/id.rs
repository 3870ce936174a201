use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::utils::path::generate_valid_file_name;

/// Hashes a string using Blake3 (16 bytes) and encodes it with base64url (no padding).
/// Returns a stable, compact identifier (~22 characters).
pub fn hash_id(input: &str) -> String {
    let hash = blake3::hash(input.as_bytes());
    let hash_bytes = hash.as_bytes();
    let truncated = &hash_bytes[..16];
    URL_SAFE_NO_PAD.encode(truncated)
}

/// File-name safe prefix of [`hash_id`], at most `max_length` characters.
pub fn short_file_name_hash_id(value: &str, max_length: usize) -> String {
    if value.trim().is_empty() {
        return String::new();
    }
    generate_valid_file_name(&hash_id(value))
        .chars()
        .take(max_length)
        .collect()
}
