//! Geocoding backend collaborator.
//!
//! The session only depends on the [`GeocodingBackend`] trait; `http` talks to
//! the real service.

pub mod http;

use thiserror::Error;

use crate::core::{AutocompleteResult, BoxFuture, GeocodingResult, LatLng};

pub use http::HttpBackend;

/// Failure of a single backend operation.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("service returned status {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("invalid response: {0}")]
    InvalidPayload(String),
}

/// The three operations the session consumes.
pub trait GeocodingBackend: Send + Sync + 'static {
    /// Resolve coordinates to an address.
    fn reverse_geocode(&self, at: LatLng) -> BoxFuture<'_, Result<GeocodingResult, BackendError>>;

    /// Resolve a free-text address to coordinates.
    fn geocode(&self, address: String) -> BoxFuture<'_, Result<GeocodingResult, BackendError>>;

    /// Candidates for a query prefix, most relevant first.
    fn autocomplete(
        &self,
        query: String,
    ) -> BoxFuture<'_, Result<Vec<AutocompleteResult>, BackendError>>;
}
