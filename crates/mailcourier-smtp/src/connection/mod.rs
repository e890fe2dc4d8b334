//! Connection management: stream handling and the session driver.

mod session;
mod stream;

pub use session::{
    AuthMethod, ConnectionType, Session, SessionConfig, SessionConfigBuilder, SessionState,
};
pub use stream::SmtpStream;

use std::collections::HashSet;

use crate::types::{AuthMechanism, Extension};

/// Server identity and capabilities observed during the handshake.
#[derive(Debug, Clone, Default)]
pub struct ServerInfo {
    /// Server hostname from the greeting.
    pub hostname: String,
    /// Extensions from the most recent EHLO reply.
    pub extensions: HashSet<Extension>,
}

impl ServerInfo {
    /// Checks if the server advertised an extension.
    #[must_use]
    pub fn supports(&self, ext: &Extension) -> bool {
        self.extensions.contains(ext)
    }

    /// Checks if STARTTLS was advertised.
    #[must_use]
    pub fn supports_starttls(&self) -> bool {
        self.supports(&Extension::StartTls)
    }

    /// Returns the maximum message size, if advertised.
    #[must_use]
    pub fn max_message_size(&self) -> Option<usize> {
        for ext in &self.extensions {
            if let Extension::Size(size) = ext {
                return *size;
            }
        }
        None
    }

    /// Returns the advertised authentication mechanisms.
    #[must_use]
    pub fn auth_mechanisms(&self) -> Vec<AuthMechanism> {
        for ext in &self.extensions {
            if let Extension::Auth(mechanisms) = ext {
                return mechanisms.clone();
            }
        }
        Vec::new()
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
    fn test_server_info_supports() {
        let mut info = ServerInfo::default();
        info.extensions.insert(Extension::StartTls);
        info.extensions.insert(Extension::Size(Some(1000)));

        assert!(info.supports_starttls());
        assert_eq!(info.max_message_size(), Some(1000));
        assert!(info.auth_mechanisms().is_empty());
    }

    #[test]
    fn test_server_info_auth_mechanisms() {
        let mut info = ServerInfo::default();
        info.extensions.insert(Extension::Auth(vec![
            AuthMechanism::Plain,
            AuthMechanism::Login,
        ]));

        let mechs = info.auth_mechanisms();
        assert!(mechs.contains(&AuthMechanism::Plain));
        assert!(mechs.contains(&AuthMechanism::Login));
    }
}
