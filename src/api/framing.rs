//! HTTP/1.1 framing for a single chat-completion exchange.
//!
//! This module owns both directions of the wire format: building the
//! framed request around a serialized JSON payload, and reading the
//! response back in two phases.
//!
//! # Wire Format
//!
//! ```text
//! POST <endpoint> HTTP/1.1\r\n
//! Host: <host>\r\n
//! Authorization: Bearer <token>\r\n
//! Content-Type: application/json\r\n
//! Content-Length: <payload byte length>\r\n
//! Connection: close\r\n
//! \r\n
//! <payload>\r\n
//! ```
//!
//! `Content-Length` counts the payload only, not the trailing CRLF.
//!
//! The response reader is a two-state machine: header lines until the
//! blank line (or EOF), then a drain of whatever body bytes remain.
//! Header parsing is deliberately minimal; the status line is just the
//! first header line and is never inspected.

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::config::ApiConfig;
use crate::models::ChatRequest;

/// A request ready for the wire.
#[derive(Debug)]
pub struct BuiltRequest {
    /// Compact JSON payload, exactly the bytes counted by `Content-Length`.
    pub payload: String,
    /// Full framed message: request line, headers, blank line, payload.
    pub frame: String,
}

/// Raw response split at the header/body boundary.
///
/// Headers are kept for diagnostics only; downstream extraction works
/// on `body` alone, which may still carry stray transport bytes around
/// the JSON payload.
#[derive(Debug)]
pub struct RawResponse {
    pub headers: Vec<String>,
    pub body: String,
}

/// Build the framed request for one prompt.
///
/// The payload is a single-turn [`ChatRequest`] serialized compactly;
/// serde performs all string escaping, so any prompt content is safe to
/// embed.
///
/// # Errors
///
/// Returns an error only if payload serialization fails.
pub fn build_request(config: &ApiConfig, prompt: &str) -> Result<BuiltRequest, serde_json::Error> {
    let request = ChatRequest::single_turn(&config.model, prompt);
    let payload = serde_json::to_string(&request)?;
    let frame = format!(
        "POST {endpoint} HTTP/1.1\r\n\
         Host: {host}\r\n\
         Authorization: Bearer {token}\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {length}\r\n\
         Connection: close\r\n\
         \r\n\
         {payload}\r\n",
        endpoint = config.endpoint,
        host = config.host,
        token = config.api_key,
        length = payload.len(),
    );
    Ok(BuiltRequest { payload, frame })
}

/// Write the framed request in full and flush.
pub fn write_request<W: Write>(writer: &mut W, frame: &str) -> io::Result<()> {
    writer.write_all(frame.as_bytes())?;
    writer.flush()
}

/// Reader state: transitions exactly once, on the blank line (or EOF).
enum ReadPhase {
    Headers,
    Body,
}

/// Read the response: header lines until the blank line, then the body.
///
/// # Protocol
///
/// 1. Read lines, surfacing each to the log and retaining it, until a
///    line that is empty after stripping its terminator. Both CRLF and
///    LF endings are handled. No status-code inspection.
/// 2. If the remote closes before ever sending a blank line, that also
///    ends the header phase; whatever was read stands.
/// 3. Drain the remaining bytes into the body. The drain stops at
///    end-of-stream or when the stream reports nothing further
///    available; under `Connection: close` the remote stops sending
///    once the reply is complete.
///
/// # Errors
///
/// Returns an error on I/O failures other than the drain-terminating
/// conditions above.
pub fn read_response<R: BufRead>(reader: &mut R) -> io::Result<RawResponse> {
    let mut headers = Vec::new();
    let mut phase = ReadPhase::Headers;

    loop {
        match phase {
            ReadPhase::Headers => {
                let mut line = String::new();
                let bytes_read = reader.read_line(&mut line)?;
                if bytes_read == 0 {
                    // Remote closed without a blank line.
                    phase = ReadPhase::Body;
                    continue;
                }
                let stripped = line.trim_end_matches(['\r', '\n']);
                if stripped.is_empty() {
                    phase = ReadPhase::Body;
                } else {
                    debug!("<- {stripped}");
                    headers.push(stripped.to_string());
                }
            }
            ReadPhase::Body => {
                let mut body = Vec::new();
                drain(reader, &mut body)?;
                return Ok(RawResponse {
                    headers,
                    body: String::from_utf8_lossy(&body).into_owned(),
                });
            }
        }
    }
}

/// Drain remaining bytes without waiting past a single blocked read.
fn drain<R: BufRead>(reader: &mut R, body: &mut Vec<u8>) -> io::Result<()> {
    let mut chunk = [0u8; 4096];
    loop {
        match reader.read(&mut chunk) {
            Ok(0) => return Ok(()),
            Ok(n) => body.extend_from_slice(&chunk[..n]),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            // Read timeout with nothing buffered: the remote has gone
            // quiet, treat the body as complete.
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
                ) =>
            {
                return Ok(())
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io::{BufReader, Cursor, Read};

    use pretty_assertions::assert_eq;

    fn test_config() -> ApiConfig {
        ApiConfig {
            host: "api.example.com".to_string(),
            port: 443,
            endpoint: "/v1/chat/completions".to_string(),
            api_key: "sk-test".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            insecure: false,
        }
    }

    /// Mock stream yielding one queued result per read call.
    struct ChunkedStream {
        chunks: VecDeque<io::Result<Vec<u8>>>,
    }

    impl ChunkedStream {
        fn new(chunks: Vec<io::Result<Vec<u8>>>) -> Self {
            Self {
                chunks: chunks.into(),
            }
        }
    }

    impl Read for ChunkedStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.chunks.pop_front() {
                Some(Ok(bytes)) => {
                    buf[..bytes.len()].copy_from_slice(&bytes);
                    Ok(bytes.len())
                }
                Some(Err(err)) => Err(err),
                None => Ok(0),
            }
        }
    }

    #[test]
    fn test_content_length_matches_payload_bytes() {
        let built = build_request(&test_config(), "What is Rust?").unwrap();
        let expected = format!("Content-Length: {}\r\n", built.payload.len());
        assert!(built.frame.contains(&expected));
        assert_eq!(built.frame.matches("Content-Length:").count(), 1);
    }

    #[test]
    fn test_payload_appears_verbatim_after_blank_line() {
        let built = build_request(&test_config(), "hello").unwrap();
        let (head, rest) = built.frame.split_once("\r\n\r\n").unwrap();
        assert!(head.starts_with("POST /v1/chat/completions HTTP/1.1"));
        assert!(head.contains("Host: api.example.com"));
        assert!(head.contains("Authorization: Bearer sk-test"));
        assert!(head.contains("Connection: close"));
        assert_eq!(rest, format!("{}\r\n", built.payload));
    }

    #[test]
    fn test_payload_round_trips_prompt() {
        let prompt = "What is the airspeed of an unladen swallow?";
        let built = build_request(&test_config(), prompt).unwrap();
        let value: serde_json::Value = serde_json::from_str(&built.payload).unwrap();
        assert_eq!(value["model"], "gpt-3.5-turbo");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], prompt);
    }

    #[test]
    fn test_content_length_counts_escaped_bytes() {
        // Quotes get escaped and the accent is multi-byte; the length
        // must count payload bytes, not prompt characters.
        let built = build_request(&test_config(), r#"say "héllo""#).unwrap();
        let expected = format!("Content-Length: {}\r\n", built.payload.len());
        assert!(built.frame.contains(&expected));
        let value: serde_json::Value = serde_json::from_str(&built.payload).unwrap();
        assert_eq!(value["messages"][0]["content"], r#"say "héllo""#);
    }

    #[test]
    fn test_read_response_splits_headers_and_body() {
        let raw = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\r\n{\"ok\":true}";
        let mut reader = BufReader::new(Cursor::new(raw));
        let response = read_response(&mut reader).unwrap();
        assert_eq!(
            response.headers,
            vec!["HTTP/1.1 200 OK", "Content-Type: application/json"]
        );
        assert_eq!(response.body, "{\"ok\":true}");
    }

    #[test]
    fn test_read_response_handles_lf_only_endings() {
        let raw = "HTTP/1.1 200 OK\nX-Test: y\n\nBODY";
        let mut reader = BufReader::new(Cursor::new(raw));
        let response = read_response(&mut reader).unwrap();
        assert_eq!(response.headers, vec!["HTTP/1.1 200 OK", "X-Test: y"]);
        assert_eq!(response.body, "BODY");
    }

    #[test]
    fn test_read_response_terminates_when_remote_closes_after_status_line() {
        // No blank line is ever sent; EOF must end the header phase.
        let raw = "HTTP/1.1 502 Bad Gateway\r\n";
        let mut reader = BufReader::new(Cursor::new(raw));
        let response = read_response(&mut reader).unwrap();
        assert_eq!(response.headers, vec!["HTTP/1.1 502 Bad Gateway"]);
        assert_eq!(response.body, "");
    }

    #[test]
    fn test_read_response_empty_stream() {
        let mut reader = BufReader::new(Cursor::new(""));
        let response = read_response(&mut reader).unwrap();
        assert!(response.headers.is_empty());
        assert_eq!(response.body, "");
    }

    #[test]
    fn test_drain_stops_on_read_timeout() {
        let timeout = io::Error::new(io::ErrorKind::WouldBlock, "timed out");
        let stream = ChunkedStream::new(vec![
            Ok(b"HTTP/1.1 200 OK\r\n\r\n".to_vec()),
            Ok(b"{\"partial\":true}".to_vec()),
            Err(timeout),
        ]);
        let mut reader = BufReader::new(stream);
        let response = read_response(&mut reader).unwrap();
        assert_eq!(response.headers, vec!["HTTP/1.1 200 OK"]);
        assert_eq!(response.body, "{\"partial\":true}");
    }

    #[test]
    fn test_read_response_propagates_hard_errors() {
        let broken = io::Error::new(io::ErrorKind::ConnectionReset, "reset");
        let stream = ChunkedStream::new(vec![
            Ok(b"HTTP/1.1 200 OK\r\n\r\n".to_vec()),
            Err(broken),
        ]);
        let mut reader = BufReader::new(stream);
        let err = read_response(&mut reader).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
    }
}
