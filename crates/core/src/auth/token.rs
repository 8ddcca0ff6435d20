//! Digest of issued tokens for storage.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of a token. Only this digest is ever persisted.
#[must_use]
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_token_is_stable_hex() {
        let hash = hash_token("eyJhbGciOiJIUzI1NiJ9.payload.sig");

        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, hash_token("eyJhbGciOiJIUzI1NiJ9.payload.sig"));
        assert_ne!(hash, hash_token("eyJhbGciOiJIUzI1NiJ9.payload.sih"));
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            hash_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
