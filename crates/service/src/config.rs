//! Configuration loading and validation for `folio-svc`.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use anyhow::{Context, Result};
use axum::http::HeaderName;
use serde::Deserialize;
use vault::SymmetricKey;

/// Validated service configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Base64-encoded 32-byte AES key used to seal wallet addresses.
    /// **Required** unless `allow_dev_key` is set.
    #[serde(default)]
    pub encryption_key: Option<String>,

    /// Accept the published development key when `encryption_key` is unset.
    #[serde(default)]
    pub allow_dev_key: bool,

    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Request header carrying the caller's wallet address.
    #[serde(default = "default_wallet_header")]
    pub wallet_header_name: String,

    /// OTLP/gRPC endpoint for span export. Logs only when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Where the active encryption key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Configured,
    DevFallback,
}

fn default_listen_port() -> u16 {
    8080
}
fn default_wallet_header() -> String {
    "X-Wallet-Address".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        self.symmetric_key()?;

        if self.listen_port == 0 {
            anyhow::bail!("LISTEN_PORT must be > 0");
        }
        HeaderName::from_bytes(self.wallet_header_name.as_bytes())
            .context("WALLET_HEADER_NAME is not a valid HTTP header name")?;
        if let Some(endpoint) = &self.otel_exporter_otlp_endpoint {
            if endpoint.trim().is_empty() {
                anyhow::bail!("OTEL_EXPORTER_OTLP_ENDPOINT must not be empty when set");
            }
        }
        Ok(())
    }

    /// Resolve the encryption key.
    ///
    /// # Errors
    ///
    /// Returns an error if `ENCRYPTION_KEY` is set but is not base64 of
    /// exactly 32 bytes, or if it is unset and `ALLOW_DEV_KEY` is not `true`.
    pub fn symmetric_key(&self) -> Result<(SymmetricKey, KeySource)> {
        let configured = self
            .encryption_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty());

        match configured {
            Some(encoded) => {
                let key = SymmetricKey::from_base64(encoded).context("ENCRYPTION_KEY is invalid")?;
                Ok((key, KeySource::Configured))
            }
            None if self.allow_dev_key => Ok((SymmetricKey::dev_fallback(), KeySource::DevFallback)),
            None => anyhow::bail!(
                "ENCRYPTION_KEY is required (set ALLOW_DEV_KEY=true to run with the public development key)"
            ),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field(
                "encryption_key",
                &self.encryption_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("allow_dev_key", &self.allow_dev_key)
            .field("listen_port", &self.listen_port)
            .field("wallet_header_name", &self.wallet_header_name)
            .field("otel_exporter_otlp_endpoint", &self.otel_exporter_otlp_endpoint)
            .field("log_level", &self.log_level)
            .finish()
    }
}
