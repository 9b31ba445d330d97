//! Chatline Library
//!
//! This library provides the core components for the chatline relay:
//!
//! - `api` - single-exchange chat-completion protocol (build, send, extract)
//! - `config` - endpoint, credential, and model configuration
//! - `models` - serde wire types for the request and response payloads
//! - `transport` - encrypted stream acquisition (TLS over TCP)
//!
//! # Api Module
//!
//! The `api` module is the heart of the crate: it turns one line of
//! user text into an HTTP/1.1 request, drives the exchange over a
//! stream supplied by a [`transport::Transport`], and extracts the
//! assistant's reply from the response body:
//!
//! ```ignore
//! use chatline::api::ChatClient;
//! use chatline::config::ApiConfig;
//! use chatline::transport::TlsTransport;
//!
//! let config = ApiConfig::load()?;
//! let transport = TlsTransport::new(&config)?;
//! let client = ChatClient::new(config, transport);
//! let reply = client.ask("hello there")?;
//! ```

pub mod api;
pub mod config;
pub mod models;
pub mod transport;
