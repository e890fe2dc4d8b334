//! SMTP command builder.

use crate::types::Address;

/// SMTP command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// EHLO - Extended greeting
    Ehlo {
        /// Client display name
        hostname: String,
    },
    /// STARTTLS - Upgrade to TLS
    StartTls,
    /// AUTH PLAIN with the encoded initial response
    AuthPlain {
        /// base64 `\0user\0pass` payload
        payload: String,
    },
    /// AUTH LOGIN - begin the three-step LOGIN exchange
    AuthLogin,
    /// A bare base64 credential line inside the LOGIN exchange
    CredentialLine {
        /// base64 username or password
        payload: String,
    },
    /// MAIL FROM - Start mail transaction
    MailFrom {
        /// Sender address
        from: Address,
    },
    /// RCPT TO - Add recipient
    RcptTo {
        /// Recipient address
        to: Address,
    },
    /// DATA - Begin message data
    Data,
    /// QUIT - Close connection
    Quit,
}

impl Command {
    /// Serializes the command to bytes.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();

        match self {
            Self::Ehlo { hostname } => {
                buf.extend_from_slice(b"EHLO ");
                buf.extend_from_slice(hostname.as_bytes());
            }
            Self::StartTls => {
                buf.extend_from_slice(b"STARTTLS");
            }
            Self::AuthPlain { payload } => {
                buf.extend_from_slice(b"AUTH PLAIN ");
                buf.extend_from_slice(payload.as_bytes());
            }
            Self::AuthLogin => {
                buf.extend_from_slice(b"AUTH LOGIN");
            }
            Self::CredentialLine { payload } => {
                buf.extend_from_slice(payload.as_bytes());
            }
            Self::MailFrom { from } => {
                buf.extend_from_slice(b"MAIL FROM:<");
                buf.extend_from_slice(from.as_str().as_bytes());
                buf.push(b'>');
            }
            Self::RcptTo { to } => {
                buf.extend_from_slice(b"RCPT TO:<");
                buf.extend_from_slice(to.as_str().as_bytes());
                buf.push(b'>');
            }
            Self::Data => {
                buf.extend_from_slice(b"DATA");
            }
            Self::Quit => {
                buf.extend_from_slice(b"QUIT");
            }
        }

        buf.extend_from_slice(b"\r\n");
        buf
    }

    /// Returns a loggable name; credential-bearing commands are censored.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Ehlo { .. } => "EHLO",
            Self::StartTls => "STARTTLS",
            Self::AuthPlain { .. } => "AUTH PLAIN [censored]",
            Self::AuthLogin => "AUTH LOGIN",
            Self::CredentialLine { .. } => "[credential line]",
            Self::MailFrom { .. } => "MAIL FROM",
            Self::RcptTo { .. } => "RCPT TO",
            Self::Data => "DATA",
            Self::Quit => "QUIT",
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
    fn test_ehlo_command() {
        let cmd = Command::Ehlo {
            hostname: "client.example.com".to_string(),
        };
        assert_eq!(cmd.serialize(), b"EHLO client.example.com\r\n");
    }

    #[test]
    fn test_starttls_command() {
        let cmd = Command::StartTls;
        assert_eq!(cmd.serialize(), b"STARTTLS\r\n");
    }

    #[test]
    fn test_auth_plain() {
        let cmd = Command::AuthPlain {
            payload: "AHVzZXIAcGFzcw==".to_string(),
        };
        assert_eq!(cmd.serialize(), b"AUTH PLAIN AHVzZXIAcGFzcw==\r\n");
    }

    #[test]
    fn test_auth_login() {
        assert_eq!(Command::AuthLogin.serialize(), b"AUTH LOGIN\r\n");
    }

    #[test]
    fn test_credential_line_is_bare() {
        let cmd = Command::CredentialLine {
            payload: "dXNlcg==".to_string(),
        };
        assert_eq!(cmd.serialize(), b"dXNlcg==\r\n");
    }

    #[test]
    fn test_mail_from() {
        let cmd = Command::MailFrom {
            from: Address::new("sender@example.com").unwrap(),
        };
        assert_eq!(cmd.serialize(), b"MAIL FROM:<sender@example.com>\r\n");
    }

    #[test]
    fn test_rcpt_to_command() {
        let cmd = Command::RcptTo {
            to: Address::new("recipient@example.com").unwrap(),
        };
        assert_eq!(cmd.serialize(), b"RCPT TO:<recipient@example.com>\r\n");
    }

    #[test]
    fn test_data_command() {
        let cmd = Command::Data;
        assert_eq!(cmd.serialize(), b"DATA\r\n");
    }

    #[test]
    fn test_quit_command() {
        let cmd = Command::Quit;
        assert_eq!(cmd.serialize(), b"QUIT\r\n");
    }

    #[test]
    fn test_censored_names() {
        let auth = Command::AuthPlain {
            payload: "c2VjcmV0".to_string(),
        };
        assert!(!auth.name().contains("c2VjcmV0"));
        let line = Command::CredentialLine {
            payload: "c2VjcmV0".to_string(),
        };
        assert!(!line.name().contains("c2VjcmV0"));
    }
}
