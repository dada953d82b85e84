//! Opaque random tokens for password resets and account activation.

use rand::RngCore;

/// Entropy of generated tokens, in bytes (hex-encoded to 64 chars).
const TOKEN_BYTES: usize = 32;

/// Generate a cryptographically random opaque token.
///
/// Stored verbatim (reset tokens are single-use and short-lived; setup
/// tokens occupy the password-hash slot until first login).
pub fn generate_opaque_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = generate_opaque_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(generate_opaque_token(), generate_opaque_token());
    }
}
