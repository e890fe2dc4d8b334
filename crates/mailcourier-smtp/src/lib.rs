//! # mailcourier-smtp
//!
//! An SMTP submission client implementing RFC 5321: it delivers one
//! already-assembled message over one connection and tells you exactly
//! which step of the dialogue went wrong if delivery fails.
//!
//! ## Features
//!
//! - **Single-connection session**: connect, authenticate, and run the
//!   MAIL FROM / RCPT TO / DATA transaction strictly in sequence
//! - **TLS support**: Plaintext, implicit TLS (port 465), and STARTTLS
//!   upgrade (port 587), all via rustls
//! - **Authentication**: PLAIN and LOGIN
//! - **Three timeout budgets**: connect, response, and send timeouts are
//!   configured independently and bound every blocking step
//! - **Reply-code discrimination**: every failure carries the offending
//!   reply and a discrete [`ErrorKind`]
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailcourier_smtp::{Address, AuthMethod, ConnectionType, OutgoingMessage, Session, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> mailcourier_smtp::Result<()> {
//!     let config = SessionConfig::builder("smtp.example.com")
//!         .connection_type(ConnectionType::StartTls)
//!         .credentials("user@example.com", "password")
//!         .auth_method(AuthMethod::Plain)
//!         .build();
//!
//!     let mut session = Session::new(config);
//!     session.connect().await?;
//!     session.login().await?;
//!
//!     let message = OutgoingMessage::new(
//!         Address::new("sender@example.com")?,
//!         "Subject: Hello\r\n\r\nHi there!\r\n",
//!     )
//!     .with_to(Address::new("recipient@example.com")?);
//!
//!     session.send_mail(&message).await?;
//!     session.quit().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Session States
//!
//! The session tracks its protocol position at runtime:
//!
//! ```text
//! ┌──────────────┐                 ┌─────────┐                ┌───────────────┐
//! │ Disconnected │ ── connect() ──→│  Ready  │ ── login() ──→ │ Authenticated │
//! └──────────────┘                 └─────────┘                └───────────────┘
//!                                       │                            │
//!                                       └───────── send_mail() ──────┘
//! ```
//!
//! Switching the connection type tears the stream down and returns the
//! session to `Disconnected`.
//!
//! ## Modules
//!
//! - [`command`]: SMTP command builders
//! - [`connection`]: Stream handling and the session driver
//! - [`parser`]: Reply parser
//! - [`sasl`]: SASL payload encoding
//! - [`types`]: Core SMTP types (addresses, replies, extensions, messages)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
mod error;
pub mod parser;
pub mod sasl;
pub mod types;

pub use connection::{
    AuthMethod, ConnectionType, ServerInfo, Session, SessionConfig, SessionConfigBuilder,
    SessionState, SmtpStream,
};
pub use error::{Error, ErrorKind, Result};
pub use types::{
    Address, AuthMechanism, Extension, Message, OutgoingMessage, Reply, ReplyClass, ReplyCode,
};

/// SMTP protocol version supported.
pub const SMTP_VERSION: &str = "SMTP/ESMTP (RFC 5321)";
