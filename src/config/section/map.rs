//! `[map]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [map]
//! container = "map"   # Container the widget is bound to
//! zoom = 15           # Initial zoom level
//!
//! [map.tiles]
//! url = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png"
//! attribution = "&copy; OpenStreetMap contributors"
//! max_zoom = 19
//!
//! [map.marker]
//! icon_url = "https://unpkg.com/leaflet@1.9.4/dist/images/marker-icon.png"
//! icon_size = [25, 41]
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

const LEAFLET_IMAGES: &str = "https://unpkg.com/leaflet@1.9.4/dist/images";

/// Map widget settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Id of the container the map is mounted into.
    pub container: String,

    /// Zoom level used when centering on a result.
    pub zoom: u8,

    /// Base tile layer.
    pub tiles: TileLayer,

    /// Marker icon.
    pub marker: MarkerIcon,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            container: "map".to_string(),
            zoom: 15,
            tiles: TileLayer::default(),
            marker: MarkerIcon::default(),
        }
    }
}

/// Raster tile source attached to every map instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLayer {
    /// URL template with `{s}`, `{z}`, `{x}`, `{y}` placeholders.
    pub url: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors".to_string(),
            max_zoom: 19,
        }
    }
}

/// Marker icon images and geometry, in pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerIcon {
    pub icon_url: String,
    pub icon_retina_url: String,
    pub shadow_url: String,
    pub icon_size: [u16; 2],
    pub icon_anchor: [i16; 2],
    pub popup_anchor: [i16; 2],
    pub shadow_size: [u16; 2],
}

impl Default for MarkerIcon {
    fn default() -> Self {
        Self {
            icon_url: format!("{LEAFLET_IMAGES}/marker-icon.png"),
            icon_retina_url: format!("{LEAFLET_IMAGES}/marker-icon-2x.png"),
            shadow_url: format!("{LEAFLET_IMAGES}/marker-shadow.png"),
            icon_size: [25, 41],
            icon_anchor: [12, 41],
            popup_anchor: [1, -34],
            shadow_size: [41, 41],
        }
    }
}

impl MapConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.container.trim().is_empty() {
            diag.error(FieldPath::new("map.container"), "must not be empty");
        }

        if self.zoom > self.tiles.max_zoom {
            diag.error_with_hint(
                FieldPath::new("map.zoom"),
                format!(
                    "zoom {} exceeds tile max_zoom {}",
                    self.zoom, self.tiles.max_zoom
                ),
                "lower `map.zoom` or raise `map.tiles.max_zoom`",
            );
        }

        if !self.tiles.url.contains("{z}")
            || !self.tiles.url.contains("{x}")
            || !self.tiles.url.contains("{y}")
        {
            diag.error(
                FieldPath::new("map.tiles.url"),
                "template must contain {z}, {x} and {y}",
            );
        }
    }
}
