//! CSPRNG-backed generation of OAuth state, OIDC nonce, and PKCE parameters.
//!
//! Every value is random bytes encoded as URL-safe base64 without padding, so
//! it can ride in query strings and cookies unescaped.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Generate a CSRF state parameter (16 random bytes, base64url).
pub fn state() -> String {
    random_token(16)
}

/// Generate an OIDC nonce for ID-token binding (16 random bytes, base64url).
pub fn nonce() -> String {
    random_token(16)
}

/// Generate a PKCE code verifier (32 random bytes, 43 base64url characters).
pub fn code_verifier() -> String {
    random_token(32)
}

/// Derive the S256 code challenge for a verifier: base64url(SHA-256(verifier)).
pub fn code_challenge(verifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

fn random_token(len: usize) -> String {
    // rand::thread_rng is a CSPRNG; the callback compares these byte-for-byte
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_state_values_are_distinct() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(state()), "state collision within 10,000 draws");
        }
    }

    #[test]
    fn test_code_challenge_rfc7636_vector() {
        // RFC 7636 Appendix B
        let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
        assert_eq!(
            code_challenge(verifier),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }

    #[test]
    fn test_code_challenge_is_deterministic() {
        let verifier = code_verifier();
        assert_eq!(code_challenge(&verifier), code_challenge(&verifier));
    }

    #[test]
    fn test_code_verifier_length_and_charset() {
        let verifier = code_verifier();
        // 32 bytes encode to 43 unpadded base64url characters
        assert_eq!(verifier.len(), 43);
        assert!(
            verifier
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_tokens_are_url_safe() {
        for value in [state(), nonce()] {
            assert!(!value.contains('='));
            assert!(!value.contains('+'));
            assert!(!value.contains('/'));
        }
    }
}
