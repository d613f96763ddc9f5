//! Salted password hashing using iterated SHA-256

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::domain::DomainError;

/// Number of SHA-256 rounds applied to password + salt
pub const HASH_ITERATIONS: usize = 1000;

/// Salt length in bytes before hex encoding
pub const SALT_LENGTH: usize = 16;

/// Hash `password` with `salt` appended, returning the hex digest
///
/// The first round hashes the UTF-8 bytes of `password + salt`; every later
/// round hashes the previous raw digest. Existing stored hashes depend on this
/// exact scheme.
pub fn hash_password(password: &str, salt: &str) -> String {
    hex::encode(salted_digest(password, salt))
}

/// Check `password` against a stored hex digest and salt
///
/// Digest bytes are compared in constant time. A stored hash that is not
/// valid hex never matches.
pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    let Ok(expected) = hex::decode(expected_hash) else {
        return false;
    };

    salted_digest(password, salt)
        .as_slice()
        .ct_eq(expected.as_slice())
        .into()
}

/// Generate a fresh hex-encoded salt from the OS random source
pub fn generate_salt() -> Result<String, DomainError> {
    let mut salt = [0u8; SALT_LENGTH];

    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| DomainError::internal(format!("Failed to generate salt: {}", e)))?;

    Ok(hex::encode(salt))
}

fn salted_digest(password: &str, salt: &str) -> Vec<u8> {
    let mut input = String::with_capacity(password.len() + salt.len());
    input.push_str(password);
    input.push_str(salt);

    iterate_sha256(input.as_bytes(), HASH_ITERATIONS)
}

fn iterate_sha256(input: &[u8], rounds: usize) -> Vec<u8> {
    let mut digest = input.to_vec();

    for _ in 0..rounds {
        digest = Sha256::digest(&digest).to_vec();
    }

    digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_round_matches_sha256() {
        let digest = iterate_sha256(b"abc", 1);
        assert_eq!(
            hex::encode(digest),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_rounds_chain_raw_digests() {
        let once = iterate_sha256(b"password", 1);
        let twice = iterate_sha256(b"password", 2);
        assert_eq!(twice, Sha256::digest(&once).to_vec());
    }

    #[test]
    fn test_hash_is_deterministic() {
        let first = hash_password("password", "0011aabb");
        let second = hash_password("password", "0011aabb");

        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert_eq!(
            first,
            hex::encode(iterate_sha256(b"password0011aabb", HASH_ITERATIONS))
        );
    }

    #[test]
    fn test_salt_changes_hash() {
        assert_ne!(
            hash_password("password", "salt-one"),
            hash_password("password", "salt-two")
        );
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("password", "abcd");

        assert!(verify_password("password", "abcd", &hash));
        assert!(!verify_password("wrongpass", "abcd", &hash));
        assert!(!verify_password("password", "dcba", &hash));
    }

    #[test]
    fn test_verify_rejects_malformed_stored_hash() {
        let hash = hash_password("password", "abcd");

        assert!(verify_password("password", "abcd", &hash.to_uppercase()));
        assert!(!verify_password("password", "abcd", &hash[..62]));
        assert!(!verify_password("password", "abcd", "not-hex"));
        assert!(!verify_password("password", "abcd", ""));
    }

    #[test]
    fn test_generate_salt() {
        let salt = generate_salt().unwrap();
        assert_eq!(salt.len(), SALT_LENGTH * 2);
        assert!(salt.chars().all(|c| c.is_ascii_hexdigit()));

        assert_ne!(salt, generate_salt().unwrap());
    }
}
