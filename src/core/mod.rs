//! Core types - pure abstractions shared across the codebase.

mod state;
mod types;

use std::future::Future;
use std::pin::Pin;

pub use state::{is_shutdown, setup_shutdown_handler, shutdown_signal};
pub use types::{AutocompleteResult, GeocodingResult, LatLng, Source, StructuredAddress};

/// Boxed future returned by collaborator traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
