//! Encrypted stream acquisition.
//!
//! The exchange logic in [`crate::api`] never opens sockets or performs
//! TLS handshakes itself; it asks a [`Transport`] for a fresh, already
//! encrypted stream at the start of each exchange and owns that stream
//! until the exchange ends. Tests substitute in-memory streams or
//! socket pairs behind the same trait.

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use native_tls::TlsConnector;
use tracing::debug;

use crate::config::ApiConfig;

/// Upper bound on how long a single read may wait for the remote.
///
/// The body phase of an exchange is a drain, not a wait-for-EOF loop;
/// the timeout is what makes "no more data available" observable on a
/// blocking socket.
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// A readable/writable byte stream carrying one exchange.
pub trait TransportStream: Read + Write {}

impl<T: Read + Write> TransportStream for T {}

/// Supplier of connected, encrypted streams.
///
/// One `open()` call per exchange; the returned stream is exclusively
/// owned by that exchange and dropped when it completes.
pub trait Transport {
    /// Open a fresh stream to the remote endpoint.
    fn open(&self) -> io::Result<Box<dyn TransportStream>>;
}

/// Production transport: TLS over TCP to the configured host and port.
pub struct TlsTransport {
    host: String,
    port: u16,
    connector: TlsConnector,
}

impl TlsTransport {
    /// Build the transport from resolved configuration.
    ///
    /// With `insecure` set, certificate verification is disabled; this
    /// mirrors a development setup behind a local proxy and must not be
    /// used against real endpoints.
    pub fn new(config: &ApiConfig) -> io::Result<Self> {
        let connector = TlsConnector::builder()
            .danger_accept_invalid_certs(config.insecure)
            .build()
            .map_err(io::Error::other)?;
        Ok(Self {
            host: config.host.clone(),
            port: config.port,
            connector,
        })
    }
}

impl Transport for TlsTransport {
    fn open(&self) -> io::Result<Box<dyn TransportStream>> {
        let tcp = TcpStream::connect((self.host.as_str(), self.port))?;
        tcp.set_read_timeout(Some(READ_TIMEOUT))?;
        let stream = self
            .connector
            .connect(&self.host, tcp)
            .map_err(io::Error::other)?;
        debug!("Connected to {}:{}", self.host, self.port);
        Ok(Box::new(stream))
    }
}
