use xxhash_rust::xxh64::xxh64;

use crate::types::Anchor;

const BASE62_CHARS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Encode a u64 value as a base62 string (11 chars, zero-padded).
fn base62_encode(mut value: u64) -> String {
    let mut result = Vec::with_capacity(11);
    while value > 0 {
        result.push(BASE62_CHARS[(value % 62) as usize]);
        value /= 62;
    }
    while result.len() < 11 {
        result.push(b'0');
    }
    result.reverse();
    result.into_iter().map(char::from).collect()
}

/// Stable identifier for a finding.
///
/// hash = base62(xxhash64(file_path + anchor span + code + message))
///
/// The same finding at the same place hashes identically across runs, so
/// suppressions and report diffs can refer to it.
pub fn finding_hash(file_path: &str, anchor: &Anchor, code: &str, message: &str) -> String {
    let mut input = String::with_capacity(file_path.len() + code.len() + message.len() + 32);
    input.push_str(file_path);
    input.push('\0');
    input.push_str(&anchor.start.to_string());
    input.push(':');
    input.push_str(&anchor.end.to_string());
    input.push('\0');
    input.push_str(code);
    input.push('\0');
    input.push_str(message);

    base62_encode(xxh64(input.as_bytes(), 0))
}
