//! Command-line interface definitions.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{ColorChoice, Parser, Subcommand};

use crate::core::LatLng;
use crate::device::{Denied, FixedPosition, Geolocator, Unsupported, parse_position};

/// Resolve addresses and map positions from the terminal
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: pinpoint.toml)
    #[arg(short = 'C', long, global = true, default_value = "pinpoint.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Geocoding service base URL (overrides config and PINPOINT_API_URL)
    #[arg(short = 'U', long = "api-url", global = true, value_hint = clap::ValueHint::Url)]
    pub api_url: Option<String>,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Resolve the device position to an address
    #[command(visible_alias = "l")]
    Locate {
        #[command(flatten)]
        device: DeviceArgs,
    },

    /// Geocode a free-text address
    #[command(visible_alias = "s")]
    Search {
        /// Address to look up (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        address: Vec<String>,
    },

    /// List address suggestions for a partial query
    Suggest {
        /// Query prefix (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Interactive session: type to get suggestions, submit or pick one
    #[command(visible_alias = "i")]
    Session {
        #[command(flatten)]
        device: DeviceArgs,
    },
}

/// Where the device position comes from.
///
/// Without `--at` or `--deny` the device reports geolocation as unsupported.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct DeviceArgs {
    /// Device position as LAT,LNG (e.g. 18.5204,73.8567)
    #[arg(long, value_name = "LAT,LNG", value_parser = parse_position, allow_hyphen_values = true, conflicts_with = "deny")]
    pub at: Option<LatLng>,

    /// Refuse the location permission
    #[arg(long)]
    pub deny: bool,
}

impl DeviceArgs {
    pub fn geolocator(&self) -> Arc<dyn Geolocator> {
        match (self.at, self.deny) {
            (Some(at), _) => Arc::new(FixedPosition(at)),
            (None, true) => Arc::new(Denied),
            (None, false) => Arc::new(Unsupported),
        }
    }
}
