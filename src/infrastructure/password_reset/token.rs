//! Reset token generation
//!
//! Tokens are random alphanumeric strings; only their SHA-256 digest is
//! persisted.

use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Result of generating a new reset token
#[derive(Debug, Clone)]
pub struct GeneratedResetToken {
    /// The plain token (only ever sent to the user)
    pub token: String,
    /// The digest kept in storage
    pub hash: String,
}

/// Generator for reset tokens
#[derive(Debug, Clone)]
pub struct ResetTokenGenerator {
    length: usize,
}

impl ResetTokenGenerator {
    pub fn new() -> Self {
        Self { length: 64 }
    }

    pub fn generate(&self) -> GeneratedResetToken {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect();

        let hash = hash_token(&token);

        GeneratedResetToken { token, hash }
    }
}

impl Default for ResetTokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Hex encoded SHA-256 digest of a token
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check a token against a stored digest in constant time
pub fn verify_token(token: &str, stored_hash: &str) -> bool {
    constant_time_compare(&hash_token(token), stored_hash)
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token() {
        let generated = ResetTokenGenerator::new().generate();

        assert_eq!(generated.token.len(), 64);
        assert!(generated.token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(generated.hash.len(), 64);
        assert_ne!(generated.token, generated.hash);
    }

    #[test]
    fn test_tokens_are_unique() {
        let generator = ResetTokenGenerator::new();

        assert_ne!(generator.generate().token, generator.generate().token);
    }

    #[test]
    fn test_verify_token() {
        let generated = ResetTokenGenerator::new().generate();

        assert!(verify_token(&generated.token, &generated.hash));
        assert!(!verify_token("wrong-token", &generated.hash));
        assert!(!verify_token(&generated.token, "short"));
    }

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(
            hash_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
