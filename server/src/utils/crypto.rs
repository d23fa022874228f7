//! Cryptographic helpers for session signing and schema checksums

use anyhow::{Context, Result};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Length of a generated session signing key in bytes
pub const SIGNING_KEY_LEN: usize = 32;

/// Generate a cryptographically secure random key
pub fn generate_key(len: usize) -> Vec<u8> {
    let mut key = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut key);
    key
}

/// Generate a cryptographically secure random hex token
pub fn generate_token(byte_len: usize) -> String {
    hex::encode(generate_key(byte_len))
}

/// Decode a configured secret into key bytes
///
/// Even-length hex strings of at least [`SIGNING_KEY_LEN`] bytes are decoded,
/// anything else is used as raw UTF-8 bytes.
pub fn decode_secret(secret: &str) -> Result<Vec<u8>> {
    let secret = secret.trim();
    if secret.is_empty() {
        anyhow::bail!("secret key is empty");
    }
    let looks_hex = secret.len() >= SIGNING_KEY_LEN * 2
        && secret.len().is_multiple_of(2)
        && secret.chars().all(|c| c.is_ascii_hexdigit());
    if looks_hex {
        return hex::decode(secret).context("invalid hex secret key");
    }
    Ok(secret.as_bytes().to_vec())
}

/// Calculate SHA256 hash and return as hex string
pub fn sha256_hex(data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_key_length() {
        assert_eq!(generate_key(16).len(), 16);
        assert_eq!(generate_key(SIGNING_KEY_LEN).len(), 32);
    }

    #[test]
    fn test_generate_token() {
        let token = generate_token(20);
        assert_eq!(token.len(), 40);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_token(20));
    }

    #[test]
    fn test_decode_secret_hex() {
        let hex_key = "ab".repeat(SIGNING_KEY_LEN);
        let bytes = decode_secret(&hex_key).unwrap();
        assert_eq!(bytes, vec![0xab; SIGNING_KEY_LEN]);
    }

    #[test]
    fn test_decode_secret_raw() {
        assert_eq!(decode_secret("not-so-secret").unwrap(), b"not-so-secret");
        // Short hex-looking values are taken literally
        assert_eq!(decode_secret("abcd").unwrap(), b"abcd");
    }

    #[test]
    fn test_decode_secret_empty() {
        assert!(decode_secret("   ").is_err());
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256_hex("hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }
}
