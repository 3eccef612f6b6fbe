#![deny(unsafe_code)]

use std::fs;
use std::path::Path;

use sha2::Digest;

use crate::error::{ConfigError, Result};

pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    hex::encode(digest)
}

pub fn sha256_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| ConfigError::io(path, source))?;
    Ok(sha256_hex(&bytes))
}

/// True for a 64-character lowercase or uppercase hex string.
pub fn is_sha256_hex(value: &str) -> bool {
    value.len() == 64 && value.chars().all(|c| c.is_ascii_hexdigit())
}
