//! The SMTP session driver.
//!
//! `Session` owns the configuration, the stream, and the protocol position,
//! and drives the whole dialogue through four operations: `connect` (greeting,
//! EHLO, optional STARTTLS upgrade), `login` (AUTH PLAIN / LOGIN), `send_mail`
//! (MAIL FROM / RCPT TO / DATA), and the fire-and-forget `quit`.
//!
//! The conversation is strictly sequential: every write and every reply read
//! is bounded by one of three independent timeouts (connect, response, send),
//! and a timeout unwinds only the in-flight operation. Nothing is retried;
//! after a failed `login` or `send_mail` the connection is left in whatever
//! protocol state the server last saw, and recovery (usually disconnecting)
//! is the caller's decision.
//!
//! ## Example
//!
//! ```ignore
//! use mailcourier_smtp::{Address, AuthMethod, ConnectionType, OutgoingMessage, Session, SessionConfig};
//!
//! let config = SessionConfig::builder("smtp.example.com")
//!     .connection_type(ConnectionType::StartTls)
//!     .credentials("user@example.com", "password")
//!     .auth_method(AuthMethod::Login)
//!     .build();
//!
//! let mut session = Session::new(config);
//! session.connect().await?;
//! session.login().await?;
//! session.send_mail(&message).await?;
//! session.quit().await?;
//! ```

use std::time::Duration;

use super::{ServerInfo, SmtpStream};
use crate::command::Command;
use crate::error::{Error, Result};
use crate::parser::{is_last_reply_line, parse_reply};
use crate::sasl;
use crate::types::{Extension, Message, Reply, ReplyClass, ReplyCode};

/// How the connection to the server is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionType {
    /// No encryption (port 25). **Not recommended for production.**
    Plain,
    /// TLS from the first byte (port 465).
    ImplicitTls,
    /// Start with plaintext, upgrade with STARTTLS (port 587).
    #[default]
    StartTls,
}

impl ConnectionType {
    /// Returns the default port for this connection type.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Plain => 25,
            Self::ImplicitTls => 465,
            Self::StartTls => 587,
        }
    }
}

/// Authentication method the session negotiates on `login`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMethod {
    /// Do not authenticate.
    #[default]
    None,
    /// AUTH PLAIN (RFC 4616): one base64 round trip.
    Plain,
    /// AUTH LOGIN: username and password in separate round trips.
    Login,
}

/// SMTP session configuration.
///
/// Mutable between operations through the [`Session`] setters; an in-flight
/// operation holds `&mut Session`, so the configuration cannot change under
/// it.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Connection security.
    pub connection_type: ConnectionType,
    /// Name announced in EHLO.
    pub display_name: String,
    /// Username for authentication.
    pub username: String,
    /// Password for authentication.
    pub password: String,
    /// Authentication method.
    pub auth_method: AuthMethod,
    /// Budget for establishing the connection (and TLS handshakes).
    pub connect_timeout: Duration,
    /// Budget for each reply line.
    pub response_timeout: Duration,
    /// Budget for each write.
    pub send_timeout: Duration,
}

impl SessionConfig {
    /// Creates a configuration with STARTTLS submission defaults (port 587).
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 587,
            connection_type: ConnectionType::StartTls,
            display_name: "localhost".into(),
            username: String::new(),
            password: String::new(),
            auth_method: AuthMethod::None,
            connect_timeout: Duration::from_secs(5),
            response_timeout: Duration::from_secs(5),
            send_timeout: Duration::from_secs(60),
        }
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder(host: impl Into<String>) -> SessionConfigBuilder {
        SessionConfigBuilder::new(host)
    }
}

/// Builder for session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfigBuilder {
    host: String,
    port: Option<u16>,
    connection_type: ConnectionType,
    display_name: String,
    username: String,
    password: String,
    auth_method: AuthMethod,
    connect_timeout: Duration,
    response_timeout: Duration,
    send_timeout: Duration,
}

impl SessionConfigBuilder {
    /// Creates a new builder with the given hostname.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
            connection_type: ConnectionType::StartTls,
            display_name: "localhost".into(),
            username: String::new(),
            password: String::new(),
            auth_method: AuthMethod::None,
            connect_timeout: Duration::from_secs(5),
            response_timeout: Duration::from_secs(5),
            send_timeout: Duration::from_secs(60),
        }
    }

    /// Sets the port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the connection type.
    #[must_use]
    pub const fn connection_type(mut self, connection_type: ConnectionType) -> Self {
        self.connection_type = connection_type;
        self
    }

    /// Sets the name announced in EHLO.
    #[must_use]
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Sets the credentials.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Sets the authentication method.
    #[must_use]
    pub const fn auth_method(mut self, method: AuthMethod) -> Self {
        self.auth_method = method;
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the per-reply timeout.
    #[must_use]
    pub const fn response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Sets the per-write timeout.
    #[must_use]
    pub const fn send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    /// Builds the configuration.
    ///
    /// An unset port falls back to the connection type's default.
    #[must_use]
    pub fn build(self) -> SessionConfig {
        SessionConfig {
            port: self
                .port
                .unwrap_or_else(|| self.connection_type.default_port()),
            host: self.host,
            connection_type: self.connection_type,
            display_name: self.display_name,
            username: self.username,
            password: self.password,
            auth_method: self.auth_method,
            connect_timeout: self.connect_timeout,
            response_timeout: self.response_timeout,
            send_timeout: self.send_timeout,
        }
    }
}

/// The session's protocol position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No live connection.
    #[default]
    Disconnected,
    /// Handshake complete; mail commands may be issued.
    Ready,
    /// Authentication accepted.
    Authenticated,
}

/// An SMTP client session over a single connection.
pub struct Session {
    config: SessionConfig,
    stream: Option<SmtpStream>,
    state: SessionState,
    server_info: ServerInfo,
    last_reply: Option<Reply>,
}

impl Session {
    /// Creates a disconnected session.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            stream: None,
            state: SessionState::Disconnected,
            server_info: ServerInfo::default(),
            last_reply: None,
        }
    }

    /// Returns the current configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the current protocol position.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Returns true if the handshake has completed.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state != SessionState::Disconnected
    }

    /// Returns true if authentication was accepted.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    /// Returns the most recently parsed reply.
    ///
    /// Stale until the next read overwrites it.
    #[must_use]
    pub const fn last_reply(&self) -> Option<&Reply> {
        self.last_reply.as_ref()
    }

    /// Returns the server identity and capabilities seen so far.
    #[must_use]
    pub const fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    /// Sets the server hostname.
    pub fn set_host(&mut self, host: impl Into<String>) {
        self.config.host = host.into();
    }

    /// Sets the server port.
    pub const fn set_port(&mut self, port: u16) {
        self.config.port = port;
    }

    /// Sets the name announced in EHLO.
    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.config.display_name = name.into();
    }

    /// Sets the credentials used by [`Session::login`].
    pub fn set_credentials(&mut self, username: impl Into<String>, password: impl Into<String>) {
        self.config.username = username.into();
        self.config.password = password.into();
    }

    /// Sets the authentication method.
    pub const fn set_auth_method(&mut self, method: AuthMethod) {
        self.config.auth_method = method;
    }

    /// Sets the connection type.
    ///
    /// Any live connection is discarded and the session returns to
    /// `Disconnected`.
    pub fn set_connection_type(&mut self, connection_type: ConnectionType) {
        self.config.connection_type = connection_type;
        self.drop_stream();
    }

    /// Sets the connection timeout.
    pub const fn set_connect_timeout(&mut self, timeout: Duration) {
        self.config.connect_timeout = timeout;
    }

    /// Sets the per-reply timeout.
    pub const fn set_response_timeout(&mut self, timeout: Duration) {
        self.config.response_timeout = timeout;
    }

    /// Sets the per-write timeout.
    pub const fn set_send_timeout(&mut self, timeout: Duration) {
        self.config.send_timeout = timeout;
    }

    /// Connects and drives the handshake to `Ready`.
    ///
    /// Establishes the stream (encrypting first for `ImplicitTls`), requires
    /// the 220 greeting, sends EHLO, and for `StartTls` runs the upgrade and
    /// repeats EHLO on the encrypted stream. Any previous connection is
    /// discarded first.
    ///
    /// # Errors
    ///
    /// Returns a timeout error for the step that expired, or
    /// [`Error::UnexpectedReply`] when the server answers a step with the
    /// wrong code. On failure the session is left `Disconnected` with the
    /// stream torn down; the offending reply stays readable through
    /// [`Session::last_reply`].
    pub async fn connect(&mut self) -> Result<()> {
        self.drop_stream();
        self.server_info = ServerInfo::default();
        self.last_reply = None;

        let result = self.do_connect().await;
        if result.is_err() {
            self.drop_stream();
        }
        result
    }

    async fn do_connect(&mut self) -> Result<()> {
        let host = self.config.host.clone();
        let port = self.config.port;
        let limit = self.config.connect_timeout;

        let stream = match self.config.connection_type {
            ConnectionType::Plain | ConnectionType::StartTls => {
                SmtpStream::connect(&host, port, limit).await?
            }
            ConnectionType::ImplicitTls => SmtpStream::connect_tls(&host, port, limit).await?,
        };
        self.stream = Some(stream);

        let greeting = require(ReplyCode::SERVICE_READY, self.read_reply().await?)?;
        self.server_info.hostname = greeting
            .message
            .first()
            .and_then(|line| line.split_whitespace().next())
            .unwrap_or("unknown")
            .to_string();

        self.ehlo().await?;

        if self.config.connection_type == ConnectionType::StartTls {
            let reply = self.send_command(&Command::StartTls).await?;
            require(ReplyCode::SERVICE_READY, reply)?;

            let stream = self.take_stream()?;
            let upgraded = stream
                .upgrade_to_tls(&host, self.config.connect_timeout)
                .await?;
            self.stream = Some(upgraded);
            tracing::debug!(host = %host, "connection upgraded to TLS");

            // Pre-upgrade advertisements no longer apply
            self.ehlo().await?;
        }

        self.state = SessionState::Ready;
        tracing::debug!(host = %host, port, "session ready");
        Ok(())
    }

    /// Sends EHLO and records the advertised extensions.
    async fn ehlo(&mut self) -> Result<()> {
        let cmd = Command::Ehlo {
            hostname: self.config.display_name.clone(),
        };
        let reply = require(ReplyCode::OK, self.send_command(&cmd).await?)?;
        self.server_info.extensions = reply
            .message
            .iter()
            .skip(1)
            .map(|line| Extension::parse(line))
            .collect();
        Ok(())
    }

    /// Authenticates with the configured credentials and method.
    ///
    /// # Errors
    ///
    /// See [`Session::login_with`].
    pub async fn login(&mut self) -> Result<()> {
        let username = self.config.username.clone();
        let password = self.config.password.clone();
        let method = self.config.auth_method;
        self.login_with(&username, &password, method).await
    }

    /// Authenticates with explicit credentials.
    ///
    /// `AuthMethod::None` succeeds without sending anything and leaves the
    /// state untouched. For LOGIN, the exchange stops at the first rejected
    /// step; later steps are never sent.
    ///
    /// # Errors
    ///
    /// Every failure inside the exchange - a rejecting reply as well as a
    /// send or response timeout - surfaces as
    /// [`Error::AuthenticationFailed`]; the session stays unauthenticated.
    /// [`Error::InvalidState`] if the session is not connected.
    pub async fn login_with(
        &mut self,
        username: &str,
        password: &str,
        method: AuthMethod,
    ) -> Result<()> {
        if self.state == SessionState::Disconnected {
            return Err(Error::InvalidState("session is not connected".into()));
        }

        let outcome = match method {
            AuthMethod::None => return Ok(()),
            AuthMethod::Plain => self.auth_plain(username, password).await,
            AuthMethod::Login => self.auth_login(username, password).await,
        };

        match outcome {
            Ok(()) => {
                self.state = SessionState::Authenticated;
                tracing::debug!("authenticated");
                Ok(())
            }
            Err(err) => Err(collapse_auth_failure(err)),
        }
    }

    async fn auth_plain(&mut self, username: &str, password: &str) -> Result<()> {
        let cmd = Command::AuthPlain {
            payload: sasl::plain_response(username, password),
        };
        require(ReplyCode::AUTH_SUCCEEDED, self.send_command(&cmd).await?)?;
        Ok(())
    }

    async fn auth_login(&mut self, username: &str, password: &str) -> Result<()> {
        let reply = self.send_command(&Command::AuthLogin).await?;
        require(ReplyCode::AUTH_CONTINUE, reply)?;

        let user_line = Command::CredentialLine {
            payload: sasl::login_response(username),
        };
        require(ReplyCode::AUTH_CONTINUE, self.send_command(&user_line).await?)?;

        let pass_line = Command::CredentialLine {
            payload: sasl::login_response(password),
        };
        require(ReplyCode::AUTH_SUCCEEDED, self.send_command(&pass_line).await?)?;
        Ok(())
    }

    /// Runs one mail transaction: MAIL FROM, RCPT TO for every recipient in
    /// To → Cc → Bcc order, DATA, the message text verbatim, and the
    /// terminating dot line.
    ///
    /// The first rejected recipient aborts the whole transaction; no further
    /// RCPT and no DATA are sent. No `RSET` is issued on failure - the
    /// connection stays in whatever protocol state the server last saw, and
    /// the caller decides whether to disconnect.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] if the session is not connected;
    /// [`Error::RecipientRejected`] for a refused recipient;
    /// [`Error::UnexpectedReply`] for a refused MAIL, DATA, or final
    /// acknowledgment; timeout errors for an expired step.
    pub async fn send_mail(&mut self, message: &impl Message) -> Result<()> {
        if self.state == SessionState::Disconnected {
            return Err(Error::InvalidState("session is not connected".into()));
        }

        let mail = Command::MailFrom {
            from: message.sender().clone(),
        };
        require(ReplyCode::OK, self.send_command(&mail).await?)?;

        for recipient in message
            .to()
            .iter()
            .chain(message.cc())
            .chain(message.bcc())
        {
            let rcpt = Command::RcptTo {
                to: recipient.clone(),
            };
            let reply = self.send_command(&rcpt).await?;
            if reply.code != ReplyCode::OK {
                return Err(Error::RecipientRejected {
                    address: recipient.clone(),
                    reply,
                });
            }
        }

        require(ReplyCode::START_DATA, self.send_command(&Command::Data).await?)?;

        let limit = self.config.send_timeout;
        let stream = self.stream_mut()?;
        tracing::debug!(bytes = message.text().len(), "sending message data");
        stream.write_all(message.text().as_bytes(), limit).await?;
        stream.write_all(b"\r\n.\r\n", limit).await?;

        require(ReplyCode::OK, self.read_reply().await?)?;
        tracing::debug!("message accepted");
        Ok(())
    }

    /// Sends QUIT without waiting for a reply.
    ///
    /// The connection itself is left for the caller to drop.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] if there is no live connection;
    /// [`Error::SendTimeout`] if the write expires.
    pub async fn quit(&mut self) -> Result<()> {
        let data = Command::Quit.serialize();
        let limit = self.config.send_timeout;
        let stream = self.stream_mut()?;
        tracing::debug!(command = Command::Quit.name(), "sending command");
        stream.write_all(&data, limit).await
    }

    /// Writes one command and reads its reply.
    async fn send_command(&mut self, command: &Command) -> Result<Reply> {
        let data = command.serialize();
        let limit = self.config.send_timeout;
        let stream = self.stream_mut()?;
        tracing::debug!(command = command.name(), "sending command");
        stream.write_all(&data, limit).await?;
        self.read_reply().await
    }

    /// Reads one complete (possibly multi-line) reply.
    ///
    /// Lines accumulate until the final-line separator; the parsed reply is
    /// stored as `last_reply` before being returned. 4xx and 5xx codes are
    /// logged as they pass through but never abort the caller - the caller
    /// compares the code against the step's expected value.
    async fn read_reply(&mut self) -> Result<Reply> {
        let limit = self.config.response_timeout;
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| Error::InvalidState("session is not connected".into()))?;

        let mut lines = Vec::new();
        loop {
            let line = stream.read_line(limit).await?;
            if line.is_empty() {
                continue;
            }

            let is_last = is_last_reply_line(&line);
            lines.push(line);

            if is_last {
                break;
            }
        }

        let reply = parse_reply(&lines)?;
        match reply.class() {
            ReplyClass::TransientFailure => {
                tracing::warn!(code = reply.code.as_u16(), text = reply.text(), "transient server failure");
            }
            ReplyClass::PermanentFailure => {
                tracing::error!(code = reply.code.as_u16(), text = reply.text(), "permanent server failure");
            }
            ReplyClass::Success => {
                tracing::debug!(code = reply.code.as_u16(), "reply");
            }
        }
        self.last_reply = Some(reply.clone());
        Ok(reply)
    }

    fn stream_mut(&mut self) -> Result<&mut SmtpStream> {
        self.stream
            .as_mut()
            .ok_or_else(|| Error::InvalidState("session is not connected".into()))
    }

    fn take_stream(&mut self) -> Result<SmtpStream> {
        self.stream
            .take()
            .ok_or_else(|| Error::InvalidState("session is not connected".into()))
    }

    fn drop_stream(&mut self) {
        self.stream = None;
        self.state = SessionState::Disconnected;
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("connection_type", &self.config.connection_type)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Checks a reply against the code the current step requires.
fn require(expected: ReplyCode, reply: Reply) -> Result<Reply> {
    if reply.code == expected {
        Ok(reply)
    } else {
        Err(Error::UnexpectedReply {
            expected: expected.as_u16(),
            reply,
        })
    }
}

/// Callers see one failure kind for the whole auth exchange, timeouts
/// included.
fn collapse_auth_failure(err: Error) -> Error {
    match err {
        Error::UnexpectedReply { reply, .. } => Error::auth_failed(Some(reply)),
        Error::AuthenticationFailed { .. } => err,
        _ => Error::auth_failed(None),
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
    fn test_default_ports() {
        assert_eq!(ConnectionType::Plain.default_port(), 25);
        assert_eq!(ConnectionType::ImplicitTls.default_port(), 465);
        assert_eq!(ConnectionType::StartTls.default_port(), 587);
    }

    #[test]
    fn test_config_new() {
        let config = SessionConfig::new("smtp.example.com");
        assert_eq!(config.host, "smtp.example.com");
        assert_eq!(config.port, 587);
        assert_eq!(config.connection_type, ConnectionType::StartTls);
        assert_eq!(config.auth_method, AuthMethod::None);
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.response_timeout, Duration::from_secs(5));
        assert_eq!(config.send_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_config_builder() {
        let config = SessionConfig::builder("smtp.example.com")
            .port(2525)
            .connection_type(ConnectionType::Plain)
            .display_name("client.example.com")
            .credentials("user", "pass")
            .auth_method(AuthMethod::Login)
            .response_timeout(Duration::from_millis(200))
            .build();

        assert_eq!(config.port, 2525);
        assert_eq!(config.connection_type, ConnectionType::Plain);
        assert_eq!(config.display_name, "client.example.com");
        assert_eq!(config.username, "user");
        assert_eq!(config.auth_method, AuthMethod::Login);
        assert_eq!(config.response_timeout, Duration::from_millis(200));
    }

    #[test]
    fn test_config_builder_default_port_follows_connection_type() {
        let config = SessionConfig::builder("smtp.example.com")
            .connection_type(ConnectionType::ImplicitTls)
            .build();
        assert_eq!(config.port, 465);

        let config = SessionConfig::builder("smtp.example.com")
            .connection_type(ConnectionType::Plain)
            .build();
        assert_eq!(config.port, 25);
    }

    #[test]
    fn test_new_session_is_disconnected() {
        let session = Session::new(SessionConfig::new("smtp.example.com"));
        assert_eq!(session.state(), SessionState::Disconnected);
        assert!(!session.is_connected());
        assert!(!session.is_authenticated());
        assert!(session.last_reply().is_none());
    }

    #[test]
    fn test_setters_update_config() {
        let mut session = Session::new(SessionConfig::new("smtp.example.com"));
        session.set_host("mail.example.org");
        session.set_port(2525);
        session.set_display_name("me.example.org");
        session.set_credentials("user", "pass");
        session.set_auth_method(AuthMethod::Plain);
        session.set_response_timeout(Duration::from_millis(50));

        let config = session.config();
        assert_eq!(config.host, "mail.example.org");
        assert_eq!(config.port, 2525);
        assert_eq!(config.display_name, "me.example.org");
        assert_eq!(config.username, "user");
        assert_eq!(config.auth_method, AuthMethod::Plain);
        assert_eq!(config.response_timeout, Duration::from_millis(50));
    }

    #[test]
    fn test_set_connection_type_resets_state() {
        let mut session = Session::new(SessionConfig::new("smtp.example.com"));
        session.set_connection_type(ConnectionType::ImplicitTls);
        assert_eq!(session.config().connection_type, ConnectionType::ImplicitTls);
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[test]
    fn test_require_mismatch() {
        let reply = Reply::new(ReplyCode::new(421), vec!["busy".to_string()]);
        let err = require(ReplyCode::SERVICE_READY, reply).unwrap_err();
        match err {
            Error::UnexpectedReply { expected, reply } => {
                assert_eq!(expected, 220);
                assert_eq!(reply.code.as_u16(), 421);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_require_match_passes_reply_through() {
        let reply = Reply::new(ReplyCode::OK, vec!["done".to_string()]);
        let reply = require(ReplyCode::OK, reply).unwrap();
        assert_eq!(reply.text(), "done");
    }

    #[test]
    fn test_collapse_auth_failure() {
        let rejected = Error::UnexpectedReply {
            expected: 334,
            reply: Reply::new(ReplyCode::new(503), vec!["bad sequence".to_string()]),
        };
        match collapse_auth_failure(rejected) {
            Error::AuthenticationFailed { reply: Some(reply) } => {
                assert_eq!(reply.code.as_u16(), 503);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        match collapse_auth_failure(Error::ResponseTimeout) {
            Error::AuthenticationFailed { reply: None } => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
