//! SMTP extension types.

/// SMTP extensions discovered from an EHLO response.
///
/// These are observational: the dialogue is driven by the session
/// configuration, and the advertisement set is kept for the caller to
/// inspect.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Extension {
    /// STARTTLS - TLS upgrade
    StartTls,
    /// AUTH - Authentication
    Auth(Vec<AuthMechanism>),
    /// SIZE - Maximum message size
    Size(Option<usize>),
    /// 8BITMIME - 8-bit MIME transport
    EightBitMime,
    /// PIPELINING - Command pipelining
    Pipelining,
    /// SMTPUTF8 - UTF-8 email addresses
    SmtpUtf8,
    /// Unknown extension
    Unknown(String),
}

impl Extension {
    /// Parses an extension line from an EHLO response.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            return Self::Unknown(line.to_string());
        }

        let keyword = parts[0].to_uppercase();
        match keyword.as_str() {
            "STARTTLS" => Self::StartTls,
            "AUTH" => {
                let mechanisms = parts[1..]
                    .iter()
                    .filter_map(|m| AuthMechanism::parse(m))
                    .collect();
                Self::Auth(mechanisms)
            }
            "SIZE" => {
                let size = parts.get(1).and_then(|s| s.parse().ok());
                Self::Size(size)
            }
            "8BITMIME" => Self::EightBitMime,
            "PIPELINING" => Self::Pipelining,
            "SMTPUTF8" => Self::SmtpUtf8,
            _ => Self::Unknown(line.to_string()),
        }
    }
}

/// SASL authentication mechanism this client can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMechanism {
    /// PLAIN - single base64 credential round trip
    Plain,
    /// LOGIN - username and password in separate round trips
    Login,
}

impl AuthMechanism {
    /// Parses an authentication mechanism name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PLAIN" => Some(Self::Plain),
            "LOGIN" => Some(Self::Login),
            _ => None,
        }
    }

    /// Returns the mechanism name as a string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "PLAIN",
            Self::Login => "LOGIN",
        }
    }
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
    fn parse_starttls() {
        assert_eq!(Extension::parse("STARTTLS"), Extension::StartTls);
        assert_eq!(Extension::parse("starttls"), Extension::StartTls);
    }

    #[test]
    fn parse_auth_mechanisms() {
        let ext = Extension::parse("AUTH PLAIN LOGIN");
        if let Extension::Auth(mechs) = ext {
            assert_eq!(mechs, vec![AuthMechanism::Plain, AuthMechanism::Login]);
        } else {
            panic!("Expected Auth variant");
        }
    }

    #[test]
    fn parse_auth_skips_undriveable_mechanisms() {
        let ext = Extension::parse("AUTH XOAUTH2 PLAIN CRAM-MD5");
        if let Extension::Auth(mechs) = ext {
            assert_eq!(mechs, vec![AuthMechanism::Plain]);
        } else {
            panic!("Expected Auth variant");
        }
    }

    #[test]
    fn parse_size() {
        assert_eq!(
            Extension::parse("SIZE 52428800"),
            Extension::Size(Some(52428800))
        );
        assert_eq!(Extension::parse("SIZE"), Extension::Size(None));
    }

    #[test]
    fn parse_8bitmime() {
        assert_eq!(Extension::parse("8BITMIME"), Extension::EightBitMime);
    }

    #[test]
    fn parse_unknown() {
        let ext = Extension::parse("SOMECUSTOMEXT");
        assert!(matches!(ext, Extension::Unknown(_)));
    }

    #[test]
    fn mechanism_roundtrip() {
        assert_eq!(AuthMechanism::parse("plain"), Some(AuthMechanism::Plain));
        assert_eq!(AuthMechanism::parse("LOGIN"), Some(AuthMechanism::Login));
        assert_eq!(AuthMechanism::parse("CRAM-MD5"), None);
        assert_eq!(AuthMechanism::Plain.as_str(), "PLAIN");
        assert_eq!(AuthMechanism::Login.as_str(), "LOGIN");
    }
}
