//! SMTP reply types.

/// SMTP reply from server.
///
/// A reply is one or more lines sharing a single code; the final line's text
/// is the canonical response text. A stored reply is only meaningful until
/// the next read overwrites it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Reply code (e.g., 250).
    pub code: ReplyCode,
    /// Reply text, one entry per line.
    pub message: Vec<String>,
}

impl Reply {
    /// Creates a new reply.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec is not const-compatible
    pub fn new(code: ReplyCode, message: Vec<String>) -> Self {
        Self { code, message }
    }

    /// Returns the canonical response text: the final line's trailing text.
    #[must_use]
    pub fn text(&self) -> &str {
        self.message.last().map_or("", String::as_str)
    }

    /// Returns the classification of this reply's code.
    #[must_use]
    pub const fn class(&self) -> ReplyClass {
        self.code.class()
    }

    /// Returns true if this is a success reply (2xx or 3xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.class(), ReplyClass::Success)
    }
}

/// Classification of a reply code by its hundreds digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyClass {
    /// 2xx and 3xx: the step (or its continuation) was accepted.
    Success,
    /// 4xx: the server refused temporarily.
    TransientFailure,
    /// 5xx: the server refused permanently.
    PermanentFailure,
}

/// SMTP reply code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReplyCode(u16);

impl ReplyCode {
    /// Creates a new reply code.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns the classification of this code.
    #[must_use]
    pub const fn class(self) -> ReplyClass {
        match self.0 {
            400..500 => ReplyClass::TransientFailure,
            500..600 => ReplyClass::PermanentFailure,
            _ => ReplyClass::Success,
        }
    }

    /// Returns true if this is a transient error (4xx).
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(self.class(), ReplyClass::TransientFailure)
    }

    /// Returns true if this is a permanent error (5xx).
    #[must_use]
    pub const fn is_permanent(self) -> bool {
        matches!(self.class(), ReplyClass::PermanentFailure)
    }
}

impl std::fmt::Display for ReplyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Codes the dialogue checks against
impl ReplyCode {
    /// 220 Service ready
    pub const SERVICE_READY: Self = Self(220);
    /// 221 Service closing transmission channel
    pub const CLOSING: Self = Self(221);
    /// 235 Authentication succeeded
    pub const AUTH_SUCCEEDED: Self = Self(235);
    /// 250 Requested mail action okay, completed
    pub const OK: Self = Self(250);
    /// 334 Continue with authentication
    pub const AUTH_CONTINUE: Self = Self(334);
    /// 354 Start mail input
    pub const START_DATA: Self = Self(354);
    /// 421 Service not available, closing transmission channel
    pub const SERVICE_UNAVAILABLE: Self = Self(421);
    /// 535 Authentication credentials invalid
    pub const AUTH_FAILED: Self = Self(535);
    /// 550 Mailbox unavailable (not found, access denied)
    pub const MAILBOX_UNAVAILABLE: Self = Self(550);
    /// 554 Transaction failed
    pub const TRANSACTION_FAILED: Self = Self(554);
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

    mod reply_code_tests {
        use super::*;

        #[test]
        fn success_classes() {
            assert_eq!(ReplyCode::OK.class(), ReplyClass::Success);
            assert_eq!(ReplyCode::SERVICE_READY.class(), ReplyClass::Success);
            assert_eq!(ReplyCode::AUTH_CONTINUE.class(), ReplyClass::Success);
            assert_eq!(ReplyCode::START_DATA.class(), ReplyClass::Success);
        }

        #[test]
        fn transient_classes() {
            assert_eq!(
                ReplyCode::SERVICE_UNAVAILABLE.class(),
                ReplyClass::TransientFailure
            );
            assert!(ReplyCode::SERVICE_UNAVAILABLE.is_transient());
            assert!(!ReplyCode::SERVICE_UNAVAILABLE.is_permanent());
        }

        #[test]
        fn permanent_classes() {
            assert_eq!(
                ReplyCode::MAILBOX_UNAVAILABLE.class(),
                ReplyClass::PermanentFailure
            );
            assert!(ReplyCode::AUTH_FAILED.is_permanent());
            assert!(ReplyCode::TRANSACTION_FAILED.is_permanent());
            assert!(!ReplyCode::AUTH_FAILED.is_transient());
        }

        #[test]
        fn as_u16() {
            assert_eq!(ReplyCode::OK.as_u16(), 250);
            assert_eq!(ReplyCode::AUTH_SUCCEEDED.as_u16(), 235);
            assert_eq!(ReplyCode::AUTH_FAILED.as_u16(), 535);
        }

        #[test]
        fn display() {
            assert_eq!(format!("{}", ReplyCode::OK), "250");
            assert_eq!(format!("{}", ReplyCode::CLOSING), "221");
        }

        #[test]
        fn ordering() {
            assert!(ReplyCode::OK < ReplyCode::AUTH_CONTINUE);
            assert!(ReplyCode::SERVICE_UNAVAILABLE < ReplyCode::AUTH_FAILED);
        }
    }

    mod reply_tests {
        use super::*;

        #[test]
        fn text_is_final_line() {
            let reply = Reply::new(
                ReplyCode::OK,
                vec!["Hello".to_string(), "World".to_string()],
            );
            assert_eq!(reply.text(), "World");
        }

        #[test]
        fn text_of_empty_reply() {
            let reply = Reply::new(ReplyCode::OK, vec![]);
            assert_eq!(reply.text(), "");
        }

        #[test]
        fn classification() {
            assert!(Reply::new(ReplyCode::OK, vec![]).is_success());
            assert!(Reply::new(ReplyCode::START_DATA, vec![]).is_success());
            assert_eq!(
                Reply::new(ReplyCode::new(451), vec![]).class(),
                ReplyClass::TransientFailure
            );
            assert_eq!(
                Reply::new(ReplyCode::new(550), vec![]).class(),
                ReplyClass::PermanentFailure
            );
        }
    }
}
