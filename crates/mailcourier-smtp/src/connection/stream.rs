//! Low-level SMTP stream handling.
//!
//! Every operation takes an explicit time budget; the caller picks which of
//! the session's three timeouts applies.

use std::sync::Arc;
use std::time::Duration;

use rustls::pki_types::ServerName;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time;
use tokio_rustls::{
    TlsConnector,
    rustls::{ClientConfig, RootCertStore},
};

use crate::error::{Error, Result};

/// SMTP stream (TCP or TLS).
#[derive(Debug)]
pub enum SmtpStream {
    /// Plain TCP connection.
    Tcp(BufReader<TcpStream>),
    /// TLS-encrypted connection.
    Tls(Box<BufReader<tokio_rustls::client::TlsStream<TcpStream>>>),
}

impl SmtpStream {
    /// Connects over plain TCP.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectTimeout`] if the connection does not complete
    /// within `limit`, or an I/O error if it fails outright.
    pub async fn connect(host: &str, port: u16, limit: Duration) -> Result<Self> {
        let addr = format!("{host}:{port}");
        let stream = time::timeout(limit, TcpStream::connect(&addr))
            .await
            .map_err(|_| Error::ConnectTimeout)??;
        Ok(Self::Tcp(BufReader::new(stream)))
    }

    /// Connects with TLS from the start (implicit TLS, port 465).
    ///
    /// Encryption is fully established before this returns; the TCP connect
    /// and the TLS handshake share one time budget.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectTimeout`] on expiry, or a connection/TLS error.
    pub async fn connect_tls(host: &str, port: u16, limit: Duration) -> Result<Self> {
        let addr = format!("{host}:{port}");
        let server_name = server_name(host)?;
        let connector = tls_connector();

        let tls = time::timeout(limit, async {
            let tcp = TcpStream::connect(&addr).await?;
            Ok::<_, Error>(connector.connect(server_name, tcp).await?)
        })
        .await
        .map_err(|_| Error::ConnectTimeout)??;

        Ok(Self::Tls(Box::new(BufReader::new(tls))))
    }

    /// Performs an in-place TLS handshake on a connected plaintext stream.
    ///
    /// Used only for STARTTLS, after the server has accepted the upgrade.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UpgradeUnsupported`] if the stream is already
    /// encrypted, [`Error::ConnectTimeout`] if the handshake does not finish
    /// within `limit`, or a TLS error if it fails.
    pub async fn upgrade_to_tls(self, host: &str, limit: Duration) -> Result<Self> {
        let tcp = match self {
            Self::Tcp(reader) => reader.into_inner(),
            Self::Tls(_) => return Err(Error::UpgradeUnsupported),
        };

        let server_name = server_name(host)?;
        let connector = tls_connector();

        let tls = time::timeout(limit, connector.connect(server_name, tcp))
            .await
            .map_err(|_| Error::ConnectTimeout)??;

        Ok(Self::Tls(Box::new(BufReader::new(tls))))
    }

    /// Reads one CRLF-terminated line, without the terminator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResponseTimeout`] if no complete line arrives within
    /// `limit`, [`Error::ConnectionClosed`] on EOF, or an I/O error.
    pub async fn read_line(&mut self, limit: Duration) -> Result<String> {
        let mut line = String::new();
        let read = match self {
            Self::Tcp(reader) => time::timeout(limit, reader.read_line(&mut line)).await,
            Self::Tls(reader) => time::timeout(limit, reader.read_line(&mut line)).await,
        };
        let n = read.map_err(|_| Error::ResponseTimeout)??;
        if n == 0 {
            return Err(Error::ConnectionClosed);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }

    /// Writes and flushes the given bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SendTimeout`] if the write does not complete within
    /// `limit`, or an I/O error.
    pub async fn write_all(&mut self, data: &[u8], limit: Duration) -> Result<()> {
        let write = async {
            match self {
                Self::Tcp(reader) => {
                    reader.get_mut().write_all(data).await?;
                    reader.get_mut().flush().await
                }
                Self::Tls(reader) => {
                    reader.get_mut().write_all(data).await?;
                    reader.get_mut().flush().await
                }
            }
        };
        time::timeout(limit, write)
            .await
            .map_err(|_| Error::SendTimeout)??;
        Ok(())
    }

    /// Returns true if the stream is TLS-encrypted.
    #[must_use]
    pub const fn is_tls(&self) -> bool {
        matches!(self, Self::Tls(_))
    }
}

/// Validates and owns the hostname for certificate verification.
fn server_name(host: &str) -> Result<ServerName<'static>> {
    ServerName::try_from(host.to_string()).map_err(|_| Error::InvalidHostname(host.to_string()))
}

/// Creates a TLS connector with webpki root certificates.
fn tls_connector() -> TlsConnector {
    let root_store = RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };

    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    TlsConnector::from(Arc::new(config))
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
    fn test_server_name_accepts_hostname() {
        assert!(server_name("smtp.example.com").is_ok());
    }

    #[test]
    fn test_server_name_rejects_garbage() {
        assert!(matches!(
            server_name("not a hostname"),
            Err(Error::InvalidHostname(_))
        ));
    }

    #[tokio::test]
    async fn test_connect_reports_timeout() {
        // 192.0.2.0/24 is TEST-NET-1: dropped packets surface as
        // ConnectTimeout, an unroutable network as an I/O error
        let result = SmtpStream::connect("192.0.2.1", 25, Duration::from_millis(50)).await;
        assert!(matches!(
            result,
            Err(Error::ConnectTimeout | Error::Io(_))
        ));
    }
}
