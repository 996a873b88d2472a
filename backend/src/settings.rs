//! Process settings loaded via OrthoConfig.
//!
//! Values come from `BLOODBRIDGE_*` environment variables, an optional
//! configuration file and command-line flags. Session cookie settings are
//! read separately by [`crate::inbound::http::session_config`].

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 5;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid notification webhook URL '{value}': {source}")]
    WebhookUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Runtime configuration for the gateway.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BLOODBRIDGE")]
pub struct AppSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL; in-memory stores are used when absent.
    pub database_url: Option<String>,
    /// Webhook receiving notifications; they are logged when absent.
    pub notify_webhook_url: Option<String>,
    /// Timeout for a single webhook delivery.
    pub notify_timeout_secs: Option<u64>,
    /// Seed demo stock and `user`/`admin` accounts into in-memory stores.
    #[ortho_config(default = false)]
    pub seed_demo_data: bool,
}

impl AppSettings {
    /// The listen address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn notify_webhook_url(&self) -> Result<Option<Url>, SettingsError> {
        self.notify_webhook_url
            .as_deref()
            .map(|value| {
                Url::parse(value).map_err(|source| SettingsError::WebhookUrl {
                    value: value.to_owned(),
                    source,
                })
            })
            .transpose()
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_secs(
            self.notify_timeout_secs
                .unwrap_or(DEFAULT_NOTIFY_TIMEOUT_SECS),
        )
    }
}
