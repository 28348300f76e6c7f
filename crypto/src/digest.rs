//! SHA-256 proof digests over text or file content.

use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Compute the hex-encoded SHA-256 digest of raw bytes (file content).
pub fn digest_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Compute the hex-encoded SHA-256 digest of free text (UTF-8 bytes).
pub fn digest_text(text: &str) -> String {
    digest_bytes(text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_deterministic() {
        // Two independent calls with the same input yield identical digests.
        let a = digest_text("milestone-proof");
        let b = digest_text("milestone-proof");
        assert_eq!(a, b);
        assert_eq!(
            a,
            "220c51adeff868a58ac17e66f013f0bce329907e5bed732db941801d3e2e2fd3"
        );
    }

    #[test]
    fn digest_fixed_length_lowercase() {
        let d = digest_text("Finished 5k run");
        assert_eq!(d.len(), DIGEST_HEX_LEN);
        assert!(d.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
    }

    #[test]
    fn digest_text_matches_bytes() {
        assert_eq!(digest_text("hello"), digest_bytes(b"hello"));
        assert_eq!(
            digest_text("hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn digest_empty_input() {
        assert_eq!(
            digest_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn digest_different_inputs() {
        assert_ne!(digest_text("hello"), digest_text("world"));
    }
}
