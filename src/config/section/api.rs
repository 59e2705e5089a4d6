//! `[api]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [api]
//! url = "http://localhost:4000"   # Geocoding service base URL
//! timeout_secs = 15               # Upper bound for every backend call
//! ```
//!
//! `PINPOINT_API_URL` and `--api-url` override `url`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Geocoding service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the geocoding service.
    pub url: String,

    /// Seconds before a backend call is abandoned as failed.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:4000".to_string(),
            timeout_secs: 15,
        }
    }
}

impl ApiConfig {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        match url::Url::parse(&self.url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => diag.error(
                FieldPath::new("api.url"),
                format!("unsupported scheme `{}`", url.scheme()),
            ),
            Err(e) => diag.error_with_hint(
                FieldPath::new("api.url"),
                format!("invalid url `{}`: {e}", self.url),
                "use a full URL such as http://localhost:4000",
            ),
        }

        if self.timeout_secs == 0 {
            diag.error(FieldPath::new("api.timeout_secs"), "must be greater than 0");
        }
    }
}
