// File: src/guid.rs
//! Content-derived identifiers.
//!
//! Note GUIDs use the same encoding Anki applies to its own notes, so a deck
//! rebuilt from the same inputs merges in place instead of duplicating cards.

use sha2::{Digest, Sha256};

const BASE91_TABLE: &[u8; 91] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!#$%&()*+,-./:;<=>?@[]^_`{|}~";

/// Joins `values` with `"__"`, hashes with SHA-256, and base91-encodes the
/// first eight bytes read as a big-endian integer.
pub fn guid_for(values: &[&str]) -> String {
    let digest = Sha256::digest(values.join("__").as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    let mut n = u64::from_be_bytes(head);

    let mut reversed = Vec::new();
    while n > 0 {
        reversed.push(BASE91_TABLE[(n % 91) as usize] as char);
        n /= 91;
    }
    reversed.iter().rev().collect()
}
