//! Device geolocation collaborator.
//!
//! A one-shot request that yields a coordinate pair or fails. The CLI has no
//! positioning hardware, so the shipped providers are a fixed position given on
//! the command line, a provider that always denies, and one that reports the
//! capability as missing.

use thiserror::Error;

use crate::core::{BoxFuture, LatLng};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("geolocation is not supported")]
    Unsupported,

    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable: {0}")]
    Unavailable(String),

    #[error("position request timed out")]
    Timeout,
}

pub trait Geolocator: Send + Sync + 'static {
    /// Whether the environment offers geolocation at all.
    fn is_available(&self) -> bool;

    /// Request the current position once.
    fn current_position(&self) -> BoxFuture<'_, Result<LatLng, GeolocationError>>;
}

/// Reports a preset position.
pub struct FixedPosition(pub LatLng);

impl Geolocator for FixedPosition {
    fn is_available(&self) -> bool {
        true
    }

    fn current_position(&self) -> BoxFuture<'_, Result<LatLng, GeolocationError>> {
        let position = self.0;
        Box::pin(async move {
            if position.is_valid() {
                Ok(position)
            } else {
                Err(GeolocationError::Unavailable(format!(
                    "invalid coordinates {position}"
                )))
            }
        })
    }
}

/// Available, but the user refuses permission.
pub struct Denied;

impl Geolocator for Denied {
    fn is_available(&self) -> bool {
        true
    }

    fn current_position(&self) -> BoxFuture<'_, Result<LatLng, GeolocationError>> {
        Box::pin(async { Err(GeolocationError::PermissionDenied) })
    }
}

/// No geolocation capability in this environment.
pub struct Unsupported;

impl Geolocator for Unsupported {
    fn is_available(&self) -> bool {
        false
    }

    fn current_position(&self) -> BoxFuture<'_, Result<LatLng, GeolocationError>> {
        Box::pin(async { Err(GeolocationError::Unsupported) })
    }
}

/// Parse `LAT,LNG` as given to `--at`.
pub fn parse_position(s: &str) -> Result<LatLng, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got `{s}`"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude `{}`: {e}", lat.trim()))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude `{}`: {e}", lng.trim()))?;

    let position = LatLng::new(lat, lng);
    if !position.is_valid() {
        return Err(format!("coordinates out of range: {position}"));
    }
    Ok(position)
}
