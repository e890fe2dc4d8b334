//! Error types for SMTP operations.

use std::io;

use crate::types::{Address, Reply, ReplyClass};

/// Result type alias for SMTP operations.
pub type Result<T> = std::result::Result<T, Error>;

/// SMTP error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TLS error.
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    /// The TCP connection (or implicit TLS handshake) did not complete in time.
    #[error("Connection attempt timed out")]
    ConnectTimeout,

    /// No complete reply line arrived before the response timeout elapsed.
    #[error("Timed out waiting for a server reply")]
    ResponseTimeout,

    /// A write did not complete before the send timeout elapsed.
    #[error("Timed out sending data")]
    SendTimeout,

    /// The server closed the connection mid-dialogue.
    #[error("Server closed the connection")]
    ConnectionClosed,

    /// The stream cannot be upgraded to TLS (it is already encrypted).
    #[error("Connection cannot be upgraded to TLS")]
    UpgradeUnsupported,

    /// The server replied with a code other than the one this step requires.
    #[error("Expected reply code {expected}, got {} ({})", .reply.code, .reply.text())]
    UnexpectedReply {
        /// Code the current protocol step requires.
        expected: u16,
        /// Reply the server actually sent.
        reply: Reply,
    },

    /// A reply line could not be parsed.
    #[error("Malformed reply line: {0}")]
    MalformedReply(String),

    /// The authentication exchange was rejected or broke down.
    #[error("Authentication failed")]
    AuthenticationFailed {
        /// The rejecting reply, when the exchange got far enough to receive one.
        reply: Option<Reply>,
    },

    /// A recipient was refused during the RCPT TO sequence.
    #[error("Recipient {address} rejected: {} ({})", .reply.code, .reply.text())]
    RecipientRejected {
        /// The refused envelope address.
        address: Address,
        /// The refusing reply.
        reply: Reply,
    },

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Invalid hostname.
    #[error("Invalid hostname: {0}")]
    InvalidHostname(String),

    /// Invalid state for operation.
    #[error("Invalid state for operation: {0}")]
    InvalidState(String),
}

/// Discrete notification kind attached to every failed operation.
///
/// These are the categories the owning application dispatches on; use
/// [`Error::kind`] to obtain one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connecting (or the TLS handshake) timed out.
    ConnectionTimeout,
    /// The server misbehaved: wrong reply code, transient refusal, or a
    /// transport-level breakdown.
    ServerError,
    /// The server permanently refused something the client asked for, or the
    /// request itself was invalid.
    ClientError,
    /// The authentication exchange failed.
    AuthenticationFailed,
    /// Sending command or message data timed out.
    SendDataTimeout,
    /// Waiting for a reply timed out.
    ResponseTimeout,
}

impl Error {
    /// Creates an authentication failure carrying the rejecting reply.
    #[must_use]
    pub const fn auth_failed(reply: Option<Reply>) -> Self {
        Self::AuthenticationFailed { reply }
    }

    /// Returns the server reply attached to this error, if any.
    #[must_use]
    pub const fn reply(&self) -> Option<&Reply> {
        match self {
            Self::UnexpectedReply { reply, .. } | Self::RecipientRejected { reply, .. } => {
                Some(reply)
            }
            Self::AuthenticationFailed { reply } => reply.as_ref(),
            _ => None,
        }
    }

    /// Returns true if the attached reply is a permanent failure (5xx).
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        self.reply()
            .is_some_and(|r| r.class() == ReplyClass::PermanentFailure)
    }

    /// Returns true if the attached reply is a transient failure (4xx).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.reply()
            .is_some_and(|r| r.class() == ReplyClass::TransientFailure)
    }

    /// Maps this error onto its notification kind.
    ///
    /// Timeouts keep their dedicated kinds. A reply-code mismatch during the
    /// handshake is a `ServerError`; a rejected recipient follows the reply
    /// class (permanent refusals are `ClientError`, everything else
    /// `ServerError`). Local usage mistakes (bad address, wrong state) are
    /// `ClientError`. Transport breakdowns are `ServerError`.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConnectTimeout => ErrorKind::ConnectionTimeout,
            Self::ResponseTimeout => ErrorKind::ResponseTimeout,
            Self::SendTimeout => ErrorKind::SendDataTimeout,
            Self::AuthenticationFailed { .. } => ErrorKind::AuthenticationFailed,
            Self::RecipientRejected { reply, .. } => {
                if reply.class() == ReplyClass::PermanentFailure {
                    ErrorKind::ClientError
                } else {
                    ErrorKind::ServerError
                }
            }
            Self::InvalidAddress(_) | Self::InvalidHostname(_) | Self::InvalidState(_) => {
                ErrorKind::ClientError
            }
            Self::Io(_)
            | Self::Tls(_)
            | Self::ConnectionClosed
            | Self::UpgradeUnsupported
            | Self::UnexpectedReply { .. }
            | Self::MalformedReply(_) => ErrorKind::ServerError,
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
    use crate::types::ReplyCode;

    fn reply(code: u16, text: &str) -> Reply {
        Reply::new(ReplyCode::new(code), vec![text.to_string()])
    }

    #[test]
    fn timeout_kinds() {
        assert_eq!(Error::ConnectTimeout.kind(), ErrorKind::ConnectionTimeout);
        assert_eq!(Error::ResponseTimeout.kind(), ErrorKind::ResponseTimeout);
        assert_eq!(Error::SendTimeout.kind(), ErrorKind::SendDataTimeout);
    }

    #[test]
    fn unexpected_reply_is_server_error() {
        let err = Error::UnexpectedReply {
            expected: 220,
            reply: reply(554, "no service"),
        };
        assert_eq!(err.kind(), ErrorKind::ServerError);
        assert!(err.is_permanent());
    }

    #[test]
    fn rejected_recipient_follows_reply_class() {
        let addr = Address::new("user@example.com").unwrap();
        let permanent = Error::RecipientRejected {
            address: addr.clone(),
            reply: reply(550, "no such user"),
        };
        assert_eq!(permanent.kind(), ErrorKind::ClientError);

        let transient = Error::RecipientRejected {
            address: addr,
            reply: reply(450, "try again later"),
        };
        assert_eq!(transient.kind(), ErrorKind::ServerError);
        assert!(transient.is_transient());
    }

    #[test]
    fn auth_failure_kind() {
        let err = Error::auth_failed(Some(reply(535, "bad credentials")));
        assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
        assert_eq!(err.reply().unwrap().code.as_u16(), 535);

        let timed_out = Error::auth_failed(None);
        assert_eq!(timed_out.kind(), ErrorKind::AuthenticationFailed);
        assert!(timed_out.reply().is_none());
    }

    #[test]
    fn display_includes_codes() {
        let err = Error::UnexpectedReply {
            expected: 250,
            reply: reply(421, "shutting down"),
        };
        let msg = format!("{err}");
        assert!(msg.contains("250"));
        assert!(msg.contains("421"));
    }
}
