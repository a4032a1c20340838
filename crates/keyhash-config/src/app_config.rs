//! Application configuration structures.

use keyhash_core::{KeyHashError, KeyHashResult, TelemetryConfig};
use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Store connection configuration.
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Store connection configuration.
///
/// The connection target is chosen in order: an explicit `url`, a unix
/// socket `path`, then `hostname` and `port`. `password` applies to whichever
/// target is chosen unless the url already carries one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Full Redis URL.
    #[serde(default)]
    pub url: Option<String>,

    /// Unix socket path.
    #[serde(default)]
    pub path: Option<String>,

    /// Server hostname.
    #[serde(default = "default_hostname")]
    pub hostname: String,

    /// Server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Password sent on connect.
    #[serde(default)]
    pub password: Option<String>,
}

fn default_hostname() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    6379
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            path: None,
            hostname: default_hostname(),
            port: default_port(),
            password: None,
        }
    }
}

impl StoreConfig {
    /// Creates a configuration for a TCP server.
    #[must_use]
    pub fn tcp(hostname: impl Into<String>, port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            port,
            ..Self::default()
        }
    }

    /// Creates a configuration for a unix socket.
    #[must_use]
    pub fn unix(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Sets the connection password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> KeyHashResult<()> {
        if let Some(url) = &self.url {
            Url::parse(url)
                .map_err(|e| KeyHashError::configuration(format!("Invalid store url: {e}")))?;
            return Ok(());
        }

        if let Some(path) = &self.path {
            if path.is_empty() {
                return Err(KeyHashError::configuration("Store socket path is empty"));
            }
            return Ok(());
        }

        if self.hostname.is_empty() {
            return Err(KeyHashError::configuration("Store hostname is required"));
        }
        if self.port == 0 {
            return Err(KeyHashError::configuration("Store port must be non-zero"));
        }

        Ok(())
    }

    /// Builds the Redis connection URL.
    pub fn connection_url(&self) -> KeyHashResult<String> {
        self.validate()?;

        if let (None, Some(path)) = (&self.url, &self.path) {
            let mut url = format!("redis+unix://{path}");
            if let Some(password) = &self.password {
                let encoded: String = form_urlencoded::byte_serialize(password.as_bytes()).collect();
                url.push_str("?pass=");
                url.push_str(&encoded);
            }
            return Ok(url);
        }

        let raw = match &self.url {
            Some(url) => url.clone(),
            None => format!("redis://{}:{}", self.hostname, self.port),
        };

        let mut url = Url::parse(&raw)
            .map_err(|e| KeyHashError::configuration(format!("Invalid store url: {e}")))?;

        if let Some(password) = &self.password {
            if url.password().is_none() {
                url.set_password(Some(password)).map_err(|()| {
                    KeyHashError::configuration("Store url cannot carry a password")
                })?;
            }
        }

        Ok(url.to_string())
    }

    /// Returns the connection target with any password removed, for logging.
    #[must_use]
    pub fn redacted_target(&self) -> String {
        match (&self.url, &self.path) {
            (Some(url), _) => match Url::parse(url) {
                Ok(mut parsed) => {
                    if parsed.password().is_some() {
                        let _ = parsed.set_password(Some("***"));
                    }
                    parsed.to_string()
                }
                Err(_) => "<invalid url>".to_string(),
            },
            (None, Some(path)) => format!("unix:{path}"),
            (None, None) => format!("{}:{}", self.hostname, self.port),
        }
    }
}
