//! Pagination configuration
//!
//! Values needed to compose queries and rebuild `next` links. They are
//! threaded explicitly into the [`Paginator`](crate::pagination::Paginator)
//! and never read from process state during a request.

use crate::error::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Environment variable holding the public protocol
pub const PROTOCOL_ENV: &str = "PROTOCOL";

/// Environment variable holding the public host
pub const HOST_ENV: &str = "HOST";

/// Configuration for composing queries and building `next` URLs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginateConfig {
    /// Protocol of the public URL (e.g., "https")
    #[serde(default = "default_protocol")]
    pub protocol: String,

    /// Host (and optional port) of the public URL
    #[serde(default = "default_host")]
    pub host: String,

    /// Page size used when the request has no `take`
    #[serde(default = "default_take")]
    pub default_take: u32,

    /// Upper bound for `take`; larger values are clamped
    #[serde(default)]
    pub max_take: Option<u32>,

    /// Field whose `order__` direction decides the cursor key
    #[serde(default = "default_cursor_order_field")]
    pub cursor_order_field: String,
}

fn default_protocol() -> String {
    "http".to_string()
}

fn default_host() -> String {
    "localhost:3000".to_string()
}

fn default_take() -> u32 {
    20
}

fn default_cursor_order_field() -> String {
    "createdAt".to_string()
}

impl Default for PaginateConfig {
    fn default() -> Self {
        Self {
            protocol: default_protocol(),
            host: default_host(),
            default_take: default_take(),
            max_take: None,
            cursor_order_field: default_cursor_order_field(),
        }
    }
}

impl PaginateConfig {
    /// Create a config for the given public origin
    pub fn new(protocol: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            host: host.into(),
            ..Default::default()
        }
    }

    /// Set the default page size
    #[must_use]
    pub fn with_default_take(mut self, take: u32) -> Self {
        self.default_take = take;
        self
    }

    /// Set the maximum page size
    #[must_use]
    pub fn with_max_take(mut self, take: u32) -> Self {
        self.max_take = Some(take);
        self
    }

    /// Set the field that drives the cursor direction
    #[must_use]
    pub fn with_cursor_order_field(mut self, field: impl Into<String>) -> Self {
        self.cursor_order_field = field.into();
        self
    }

    /// Parse config from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&contents)
    }

    /// Build config from the `PROTOCOL` and `HOST` environment variables,
    /// falling back to defaults for unset ones
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(protocol) = std::env::var(PROTOCOL_ENV) {
            config.protocol = protocol;
        }
        if let Ok(host) = std::env::var(HOST_ENV) {
            config.host = host;
        }
        config.validate()?;
        Ok(config)
    }

    /// Check that the values can produce valid queries and URLs
    pub fn validate(&self) -> Result<()> {
        if self.protocol.is_empty() || !self.protocol.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(Error::config(format!(
                "Invalid protocol '{}'",
                self.protocol
            )));
        }
        if self.host.is_empty() || self.host.contains('/') {
            return Err(Error::config(format!("Invalid host '{}'", self.host)));
        }
        if let Err(e) = Url::parse(&self.origin()) {
            return Err(Error::config(format!("Invalid origin '{}': {e}", self.origin())));
        }
        if self.default_take == 0 {
            return Err(Error::config("default_take must be positive"));
        }
        if let Some(max) = self.max_take {
            if max < self.default_take {
                return Err(Error::config(format!(
                    "max_take ({max}) is smaller than default_take ({})",
                    self.default_take
                )));
            }
        }
        Ok(())
    }

    /// Origin of `next` links, e.g. `https://api.example.com`
    pub fn origin(&self) -> String {
        format!("{}://{}", self.protocol, self.host)
    }
}
