//! Server configuration, from command-line flags with environment fallbacks.

use axum::http::HeaderValue;
use clap::Parser;
use thiserror::Error;

use crate::domain::DEFAULT_HISTORY_CAPACITY;

/// Origin allowed when none is configured (local web client dev server)
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("history capacity must be at least 1")]
    InvalidHistoryCapacity,

    #[error("invalid origin '{0}'")]
    InvalidOrigin(String),
}

/// Command-line arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "chatrelay-server")]
#[command(about = "Real-time chat relay over WebSocket with a bounded history", long_about = None)]
pub struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Comma-separated list of origins allowed to call the server
    #[arg(long = "origin", env = "ORIGIN")]
    pub origins: Option<String>,

    /// Number of recent messages kept in memory and sent to new connections
    #[arg(long, env = "HISTORY_CAPACITY", default_value_t = DEFAULT_HISTORY_CAPACITY)]
    pub history_capacity: usize,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Validated server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub history_capacity: usize,
}

impl ServerConfig {
    /// Bind address (`host:port`)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Allowed origins as header values for the CORS layer
    pub fn origin_header_values(&self) -> Result<Vec<HeaderValue>, ConfigError> {
        self.allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| ConfigError::InvalidOrigin(origin.clone()))
            })
            .collect()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl TryFrom<Args> for ServerConfig {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        if args.history_capacity == 0 {
            return Err(ConfigError::InvalidHistoryCapacity);
        }
        Ok(Self {
            host: args.host,
            port: args.port,
            allowed_origins: parse_origins(args.origins.as_deref()),
            history_capacity: args.history_capacity,
        })
    }
}

/// Split a comma-separated origin list.
///
/// Entries are trimmed and empty entries dropped; an absent or empty list
/// falls back to [`DEFAULT_ALLOWED_ORIGIN`].
pub fn parse_origins(raw: Option<&str>) -> Vec<String> {
    let origins: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect();

    if origins.is_empty() {
        return vec![DEFAULT_ALLOWED_ORIGIN.to_string()];
    }
    origins
}
