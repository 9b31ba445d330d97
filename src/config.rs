//! Endpoint, credential, and model configuration.
//!
//! Configuration is an explicit value handed to the client at
//! construction time, never process-global state. Values are resolved
//! once at startup and stay constant for the process lifetime.
//!
//! Resolution order (later wins):
//!
//! 1. Built-in defaults (public OpenAI endpoint, `gpt-3.5-turbo`)
//! 2. JSON config file at `<config dir>/chatline/config.json`
//! 3. `CHATLINE_*` environment variables

use std::fs;
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use tracing::debug;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_ENDPOINT: &str = "/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_HTTPS_PORT: u16 = 443;

/// On-disk shape of the config file. Every field is optional; anything
/// left out falls back to the defaults above.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    base_url: Option<String>,
    endpoint: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    insecure: Option<bool>,
}

/// Resolved runtime configuration.
///
/// `host` and `port` are already split out of the base URL so the
/// transport and the request builder never re-parse it.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Endpoint path of the chat-completion resource, e.g. `/v1/chat/completions`.
    pub endpoint: String,
    /// Bearer credential sent in the `Authorization` header.
    pub api_key: String,
    pub model: String,
    /// Disable certificate verification. Development only.
    pub insecure: bool,
}

impl ApiConfig {
    /// Load configuration from the config file (if present) and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed, the base URL is invalid or not https, or no API key is
    /// configured anywhere.
    pub fn load() -> Result<Self> {
        let mut file = ConfigFile::default();
        if let Some(path) = default_config_path() {
            if path.exists() {
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                file = serde_json::from_str(&text)
                    .with_context(|| format!("Failed to parse {}", path.display()))?;
                debug!("Loaded config from {}", path.display());
            }
        }
        Self::resolve(overlay_env(file))
    }

    fn resolve(file: ConfigFile) -> Result<Self> {
        let base_url = file
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let url = Url::parse(&base_url)
            .with_context(|| format!("Invalid base URL: {base_url}"))?;
        ensure!(
            url.scheme() == "https",
            "Base URL must use https, got {}://",
            url.scheme()
        );
        let host = url
            .host_str()
            .with_context(|| format!("Base URL has no host: {base_url}"))?
            .to_string();
        let port = url.port_or_known_default().unwrap_or(DEFAULT_HTTPS_PORT);

        let api_key = file
            .api_key
            .filter(|key| !key.is_empty())
            .context("No API key configured (set CHATLINE_API_KEY or \"api_key\" in the config file)")?;

        Ok(Self {
            host,
            port,
            endpoint: file
                .endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            api_key,
            model: file.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            insecure: file.insecure.unwrap_or(false),
        })
    }
}

/// Overlay `CHATLINE_*` environment variables onto the file values.
fn overlay_env(mut file: ConfigFile) -> ConfigFile {
    if let Ok(value) = std::env::var("CHATLINE_BASE_URL") {
        file.base_url = Some(value);
    }
    if let Ok(value) = std::env::var("CHATLINE_ENDPOINT") {
        file.endpoint = Some(value);
    }
    if let Ok(value) = std::env::var("CHATLINE_API_KEY") {
        file.api_key = Some(value);
    }
    if let Ok(value) = std::env::var("CHATLINE_MODEL") {
        file.model = Some(value);
    }
    if let Ok(value) = std::env::var("CHATLINE_INSECURE") {
        file.insecure = Some(value == "1" || value.eq_ignore_ascii_case("true"));
    }
    file
}

/// Resolve the platform config file path.
///
/// `~/.config/chatline/config.json` on Linux, `~/Library/Application
/// Support/chatline/config.json` on macOS. `None` when the platform
/// reports no config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("chatline").join("config.json"))
}
