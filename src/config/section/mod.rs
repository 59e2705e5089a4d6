//! Configuration section definitions.
//!
//! Each module corresponds to a section in `pinpoint.toml`:
//!
//! | Module         | TOML Section       | Purpose                            |
//! |----------------|--------------------|------------------------------------|
//! | `api`          | `[api]`            | Geocoding service URL and timeout  |
//! | `autocomplete` | `[autocomplete]`   | Suggestion debounce and threshold  |
//! | `map`          | `[map]`            | Map container, zoom, tiles, marker |

mod api;
mod autocomplete;
mod map;

pub use api::ApiConfig;
pub use autocomplete::AutocompleteConfig;
pub use map::{MapConfig, MarkerIcon, TileLayer};
