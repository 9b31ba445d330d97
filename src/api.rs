//! Single-exchange chat-completion protocol.
//!
//! This module turns one line of user text into exactly one HTTP/1.1
//! exchange with the remote chat-completion service:
//!
//! ```text
//! ┌──────────────┐        TLS stream          ┌──────────────────────┐
//! │  ChatClient  │ ◄─────────────────────────►│ chat-completion API  │
//! │ (one prompt) │   HTTP/1.1 + JSON payload  │  (connection: close) │
//! └──────────────┘                            └──────────────────────┘
//! ```
//!
//! # Protocol
//!
//! The request is a fixed frame around a compact JSON payload:
//!
//! ```text
//! POST /v1/chat/completions HTTP/1.1\r\n
//! Host: api.example.com\r\n
//! Authorization: Bearer <token>\r\n
//! Content-Type: application/json\r\n
//! Content-Length: 63\r\n
//! Connection: close\r\n
//! \r\n
//! {"model":"gpt-3.5-turbo","messages":[{"role":"user","content":"hi"}]}
//! ```
//!
//! The response is read in two phases: header lines until the blank
//! line (surfaced to the log, never validated), then a drain of the
//! remaining body bytes. The assistant text is extracted from the
//! body's JSON substring, tolerating stray bytes on either side.
//!
//! # Usage
//!
//! ```ignore
//! use chatline::api::ChatClient;
//!
//! let client = ChatClient::new(config, transport);
//! let reply = client.ask("What is the capital of France?")?;
//! ```

mod client;
mod framing;
mod reply;

pub use client::{exchange, ApiError, ChatClient};
pub use framing::{build_request, read_response, write_request, BuiltRequest, RawResponse};
pub use reply::{extract, NO_REPLY_FALLBACK};
