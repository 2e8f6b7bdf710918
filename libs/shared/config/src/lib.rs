use std::env;
use tracing::warn;

/// Backend every screen talks to unless the binary overrides it.
pub const DEFAULT_API_BASE: &str = "https://hospyback.onrender.com";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Self::default()
        }
    }

    /// Only the desk binary calls this; library code takes an `AppConfig` it is handed.
    pub fn from_env() -> Self {
        let config = Self {
            api_base_url: env::var("HOSPITAL_API_BASE")
                .unwrap_or_else(|_| {
                    warn!("HOSPITAL_API_BASE not set, using default");
                    DEFAULT_API_BASE.to_string()
                }),
            request_timeout_secs: env::var("HOSPITAL_API_TIMEOUT_SECS")
                .ok()
                .and_then(|value| match value.parse::<u64>() {
                    Ok(secs) => Some(secs),
                    Err(_) => {
                        warn!("HOSPITAL_API_TIMEOUT_SECS is not a number: {}", value);
                        None
                    }
                })
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - API base URL is empty");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        let base = self.api_base_url.trim();
        !base.is_empty() && (base.starts_with("http://") || base.starts_with("https://"))
    }

    /// Base URL without a trailing slash, so paths can always start with `/`.
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}
