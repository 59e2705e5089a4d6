//! Map widget capability and its lifecycle.
//!
//! The rendering library is reached only through [`MapSurface`] and the
//! [`MapInstance`]s it creates. [`MapLifecycle`] owns the single live instance
//! for a container and keeps it in sync with the latest result.
//!
//! ```text
//! show(view) --> dispose old --> load() (async) --> [generation current?]
//!                                                      |  yes: reset container,
//!                                                      |       create, tiles, marker
//!                                                      +- no:  discard
//! ```

mod lifecycle;
pub mod terminal;

#[cfg(test)]
pub(crate) mod tests;

use thiserror::Error;

use crate::config::{MarkerIcon, TileLayer};
use crate::core::{BoxFuture, GeocodingResult, LatLng};

pub use lifecycle::{Attach, Loaded, MapLifecycle};
pub use terminal::TerminalSurface;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("failed to load map renderer: {0}")]
    Load(String),

    #[error("failed to create map in `{container}`: {reason}")]
    Create { container: String, reason: String },
}

/// What the map displays: a position and its label.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub center: LatLng,
    pub display_name: String,
}

impl MapView {
    pub fn new(center: LatLng, display_name: impl Into<String>) -> Self {
        Self {
            center,
            display_name: display_name.into(),
        }
    }
}

impl From<&GeocodingResult> for MapView {
    fn from(result: &GeocodingResult) -> Self {
        Self::new(result.position(), result.display_name.clone())
    }
}

/// Popup bound to the marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub title: String,
    pub position: LatLng,
    /// Opened as soon as the marker is placed.
    pub open: bool,
}

impl Popup {
    pub fn for_view(view: &MapView) -> Self {
        Self {
            title: view.display_name.clone(),
            position: view.center,
            open: true,
        }
    }

    /// Popup markup, coordinates to 6 decimal places.
    pub fn html(&self) -> String {
        format!(
            "<strong>{}</strong><br/>Lat: {:.6}<br/>Lng: {:.6}",
            crate::utils::html::escape(&self.title),
            self.position.lat,
            self.position.lng
        )
    }

    /// Single-line plain-text rendering.
    pub fn text(&self) -> String {
        format!(
            "{}  Lat: {:.6}  Lng: {:.6}",
            self.title, self.position.lat, self.position.lng
        )
    }
}

/// The rendering library, bound to containers by id.
pub trait MapSurface: Send + Sync + 'static {
    /// Load the rendering library. May be slow; called before every mount.
    fn load(&self) -> BoxFuture<'static, Result<(), MapError>>;

    /// Remove everything a previous instance left in the container.
    fn reset_container(&self, container: &str);

    /// Create a map in `container` centered at `center`.
    fn create(
        &self,
        container: &str,
        center: LatLng,
        zoom: u8,
    ) -> Result<Box<dyn MapInstance>, MapError>;
}

/// A live map widget.
pub trait MapInstance: Send {
    fn add_tile_layer(&mut self, layer: &TileLayer);

    /// Place a marker and bind `popup` to it.
    fn add_marker(&mut self, position: LatLng, icon: &MarkerIcon, popup: Popup);

    /// Detach from the container and release the widget.
    fn dispose(self: Box<Self>);
}
