//! Configuration management for `pinpoint.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── api        # [api]
//! │   ├── autocomplete # [autocomplete]
//! │   └── map        # [map], [map.tiles], [map.marker]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # AppConfig (this file)
//! ```
//!
//! The config file is optional: when none is found walking up from the
//! current directory, defaults apply.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{ApiConfig, AutocompleteConfig, MapConfig, MarkerIcon, TileLayer};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{cli::Cli, log};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::Path,
};

/// Environment variable overriding `api.url`.
pub const API_URL_ENV: &str = "PINPOINT_API_URL";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing pinpoint.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Geocoding service
    #[serde(default)]
    pub api: ApiConfig,

    /// Suggestion querying
    #[serde(default)]
    pub autocomplete: AutocompleteConfig,

    /// Map widget
    #[serde(default)]
    pub map: MapConfig,
}

impl AppConfig {
    /// Load configuration for the given CLI invocation.
    ///
    /// Precedence for `api.url`: `--api-url` > `PINPOINT_API_URL` > file > default.
    pub fn load(cli: &Cli) -> Result<Self> {
        crate::logger::set_verbose(cli.verbose);

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                crate::debug!("config"; "using {}", path.display());
                Self::from_path(&path)?
            }
            None => {
                crate::debug!("config"; "{} not found, using defaults", cli.config.display());
                Self::default()
            }
        };

        if let Ok(url) = std::env::var(API_URL_ENV)
            && !url.trim().is_empty()
        {
            config.api.url = url;
        }
        Self::update_option(&mut config.api.url, cli.api_url.as_ref());

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate all sections, collecting every error before failing.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.api.validate(&mut diag);
        self.autocomplete.validate(&mut diag);
        self.map.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> AppConfig {
    let (parsed, ignored) = AppConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}
