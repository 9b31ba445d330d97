//! Chat-completion client: one prompt, one exchange.
//!
//! `ChatClient` drives the full build → send → receive → extract
//! sequence. Each invocation acquires a fresh stream from the
//! [`Transport`], owns it exclusively for the duration of the exchange,
//! and releases it on every exit path. Nothing is retained between
//! invocations and nothing is retried.

use std::io::{self, BufReader};

use thiserror::Error;
use tracing::debug;

use crate::api::framing::{self, RawResponse};
use crate::api::reply;
use crate::config::ApiConfig;
use crate::transport::{Transport, TransportStream};

/// Failure modes of a single exchange.
///
/// A structurally valid reply with no content is *not* represented
/// here; it resolves to the fallback string (see [`crate::api::extract`]).
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport could not be established or the request write failed.
    #[error("Connection error: {0}")]
    Connection(#[source] io::Error),

    /// Request payload could not be serialized.
    #[error("Request encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// Response body had no recognizable payload start, or the codec
    /// rejected it.
    #[error("Malformed response payload: {detail}")]
    MalformedPayload {
        detail: String,
        /// The raw (sliced) body, retained for diagnostics.
        body: String,
    },

    /// I/O failure while reading the response.
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

impl From<io::Error> for ApiError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::NotConnected
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof => ApiError::Connection(err),
            _ => ApiError::Io(err),
        }
    }
}

/// Drive one request/response exchange over an owned stream.
///
/// Writes the framed message in full, reads header lines until the
/// blank line (or EOF), then drains the body. The stream is consumed
/// and dropped on every exit path, including a failed write, so one
/// invocation can never leak its transport handle into the next.
///
/// # Errors
///
/// - [`ApiError::Connection`] if the write fails
/// - [`ApiError::Io`] / [`ApiError::Connection`] on read failures,
///   split by error kind
pub fn exchange(stream: Box<dyn TransportStream>, frame: &str) -> Result<RawResponse, ApiError> {
    let mut stream = stream;
    framing::write_request(&mut stream, frame).map_err(ApiError::Connection)?;
    let mut reader = BufReader::new(stream);
    let response = framing::read_response(&mut reader)?;
    Ok(response)
}

/// Single-exchange chat client.
///
/// Holds the resolved configuration and the transport; at most one
/// exchange is in flight at a time, and a new one only starts after
/// the previous stream has been released.
///
/// # Example
///
/// ```ignore
/// let client = ChatClient::new(config, TlsTransport::new(&config)?);
/// let reply = client.ask("hello")?;
/// println!("{reply}");
/// ```
pub struct ChatClient<T: Transport> {
    config: ApiConfig,
    transport: T,
}

impl<T: Transport> ChatClient<T> {
    pub fn new(config: ApiConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// Relay one prompt and return the assistant's reply text.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Encode`] if the payload cannot be serialized
    /// - [`ApiError::Connection`] if the stream cannot be opened or the
    ///   write fails
    /// - [`ApiError::MalformedPayload`] if the response body cannot be
    ///   decoded
    pub fn ask(&self, prompt: &str) -> Result<String, ApiError> {
        let built = framing::build_request(&self.config, prompt)?;
        let stream = self.transport.open().map_err(ApiError::Connection)?;
        debug!(bytes = built.frame.len(), "Sending chat request");
        let response = exchange(stream, &built.frame)?;
        debug!(
            headers = response.headers.len(),
            body_bytes = response.body.len(),
            "Response received"
        );
        reply::extract(&response.body)
    }
}
