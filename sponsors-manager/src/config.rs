//! Manager configuration and the runtime-mutable API URL setting.

use std::sync::Arc;

use tokio::sync::watch;

use sponsors_client::ClientConfig;
use sponsors_core::constants::{DEFAULT_TIMEOUT_SECONDS, ENV_API_TIMEOUT, ENV_API_URL};
use sponsors_core::error::{Result, SponsorsError};

/// Static configuration for the sponsors subsystem.
#[derive(Clone, Debug)]
pub struct SponsorsConfig {
    /// Base URL of the sponsors API; empty disables fetching
    pub api_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for SponsorsConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl SponsorsConfig {
    /// Creates a config for the given API URL.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Default::default()
        }
    }

    /// Loads config from the environment (and `.env`, if present).
    ///
    /// Reads `SPONSORS_API_URL` and `SPONSORS_API_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let timeout_seconds = match get(ENV_API_TIMEOUT) {
            Some(raw) => raw.trim().parse().map_err(|_| {
                SponsorsError::ConfigError(format!("{ENV_API_TIMEOUT} must be a number of seconds, got '{raw}'"))
            })?,
            None => DEFAULT_TIMEOUT_SECONDS,
        };

        Ok(Self {
            api_url: get(ENV_API_URL).unwrap_or_default(),
            timeout_seconds,
        })
    }

    /// Returns true if an API URL is configured.
    pub fn is_enabled(&self) -> bool {
        !self.api_url.is_empty()
    }

    /// Returns the HTTP client configuration.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::with_timeout(self.timeout_seconds)
    }
}

/// Runtime-mutable sponsors API base URL.
///
/// Cloning yields another handle to the same setting. Components subscribe and
/// always see the latest value; an empty string disables fetching.
#[derive(Clone, Debug)]
pub struct ApiUrlSetting {
    tx: Arc<watch::Sender<String>>,
}

impl ApiUrlSetting {
    /// Creates the setting with an initial value.
    pub fn new(initial: impl Into<String>) -> Self {
        let (tx, _) = watch::channel(initial.into());
        Self { tx: Arc::new(tx) }
    }

    /// Replaces the URL. Subscribers are notified only if the value changed.
    pub fn set(&self, url: impl Into<String>) {
        let url = url.into();
        self.tx.send_if_modified(|current| {
            if *current == url {
                false
            } else {
                *current = url;
                true
            }
        });
    }

    /// Returns the current URL.
    pub fn get(&self) -> String {
        self.tx.borrow().clone()
    }

    /// Subscribes to the setting.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }
}

impl Default for ApiUrlSetting {
    fn default() -> Self {
        Self::new(String::new())
    }
}
