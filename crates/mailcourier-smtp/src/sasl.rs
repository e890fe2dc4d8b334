//! SASL payload encoding.
//!
//! Implements the credential encodings the AUTH dialogue sends:
//! - PLAIN (RFC 4616) - both identities and the password in one payload
//! - LOGIN - username and password as separate base64 lines

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Generates the PLAIN initial response (RFC 4616).
///
/// Format: `\0<username>\0<password>` (base64 encoded)
///
/// The leading NUL is the empty authorization identity (same as the
/// authentication identity). The encoding is byte-exact for any username and
/// password, including ones containing NUL or non-ASCII characters.
#[must_use]
pub fn plain_response(username: &str, password: &str) -> String {
    let auth_string = format!("\0{username}\0{password}");
    STANDARD.encode(auth_string.as_bytes())
}

/// Encodes one LOGIN credential line (username or password).
#[must_use]
pub fn login_response(credential: &str) -> String {
    STANDARD.encode(credential.as_bytes())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_response_format() {
        let response = plain_response("test", "pass");
        let decoded = STANDARD.decode(&response).unwrap();
        let decoded_str = String::from_utf8(decoded).unwrap();

        // Check exact format per RFC 4616
        assert_eq!(decoded_str, "\0test\0pass");
    }

    #[test]
    fn test_plain_response_embedded_nul() {
        let response = plain_response("us\0er", "pa\0ss");
        let decoded = STANDARD.decode(&response).unwrap();
        assert_eq!(decoded, b"\0us\0er\0pa\0ss");
    }

    #[test]
    fn test_plain_response_non_ascii() {
        let response = plain_response("usér", "pässwörd");
        let decoded = STANDARD.decode(&response).unwrap();
        let decoded_str = String::from_utf8(decoded).unwrap();

        assert_eq!(decoded_str, "\0usér\0pässwörd");
    }

    #[test]
    fn test_responses_are_base64() {
        let response = plain_response("user@example.com", "hunter2");
        assert!(!response.contains("user@example.com"));
        assert!(!response.contains("hunter2"));
        assert!(STANDARD.decode(&response).is_ok());
    }

    #[test]
    fn test_login_response() {
        assert_eq!(login_response("user@example.com"), "dXNlckBleGFtcGxlLmNvbQ==");
        assert_eq!(login_response("password"), "cGFzc3dvcmQ=");
    }
}
