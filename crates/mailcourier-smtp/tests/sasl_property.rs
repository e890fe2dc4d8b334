//! Property tests for the SASL PLAIN payload.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use proptest::prelude::*;

use mailcourier_smtp::sasl::{login_response, plain_response};

proptest! {
    /// The PLAIN payload is byte-exact base64 of `\0user\0pass` for any
    /// credentials, including ones containing NUL or non-ASCII characters.
    #[test]
    fn plain_payload_is_exact(user in any::<String>(), pass in any::<String>()) {
        let payload = plain_response(&user, &pass);
        let decoded = STANDARD.decode(&payload).unwrap();

        let mut expected = Vec::new();
        expected.push(0u8);
        expected.extend_from_slice(user.as_bytes());
        expected.push(0u8);
        expected.extend_from_slice(pass.as_bytes());

        prop_assert_eq!(decoded, expected);
    }

    /// LOGIN credential lines round-trip through base64 unchanged.
    #[test]
    fn login_lines_roundtrip(credential in any::<String>()) {
        let encoded = login_response(&credential);
        let decoded = STANDARD.decode(&encoded).unwrap();
        prop_assert_eq!(decoded, credential.as_bytes());
    }
}
