//! Map renderer for the terminal.
//!
//! Prints where the map is centered, the tile covering the center and an
//! OpenStreetMap link instead of drawing tiles.

use std::f64::consts::PI;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{MapError, MapInstance, MapSurface, Popup};
use crate::config::{MarkerIcon, TileLayer};
use crate::core::{BoxFuture, LatLng};

#[derive(Default)]
pub struct TerminalSurface {
    loaded: Arc<AtomicBool>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MapSurface for TerminalSurface {
    fn load(&self) -> BoxFuture<'static, Result<(), MapError>> {
        let loaded = Arc::clone(&self.loaded);
        Box::pin(async move {
            if !loaded.swap(true, Ordering::SeqCst) {
                crate::debug!("map"; "terminal renderer ready");
            }
            Ok(())
        })
    }

    fn reset_container(&self, container: &str) {
        crate::debug!("map"; "reset #{}", container);
    }

    fn create(
        &self,
        container: &str,
        center: LatLng,
        zoom: u8,
    ) -> Result<Box<dyn MapInstance>, MapError> {
        Ok(Box::new(TerminalMap {
            container: container.to_string(),
            center,
            zoom,
            tile: None,
            popup: None,
        }))
    }
}

struct TerminalMap {
    container: String,
    center: LatLng,
    zoom: u8,
    tile: Option<String>,
    /// Markup bound to the marker.
    popup: Option<String>,
}

impl TerminalMap {
    fn bind_popup(&mut self, popup: &Popup) -> &str {
        self.popup.insert(popup.html())
    }
}

impl MapInstance for TerminalMap {
    fn add_tile_layer(&mut self, layer: &TileLayer) {
        let zoom = self.zoom.min(layer.max_zoom);
        self.tile = Some(tile_url(&layer.url, zoom, self.center));
    }

    fn add_marker(&mut self, position: LatLng, _icon: &MarkerIcon, popup: Popup) {
        crate::log!("map"; "#{} centered at {} (zoom {})", self.container, self.center, self.zoom);
        if let Some(tile) = &self.tile {
            crate::debug!("map"; "tile {}", tile);
        }
        crate::log!("map"; "📍 {}", popup.text());
        let html = self.bind_popup(&popup);
        crate::debug!("map"; "popup {}", html);
        crate::log!("map"; "{}", osm_link(position, self.zoom));
    }

    fn dispose(self: Box<Self>) {
        crate::debug!("map"; "disposed #{}", self.container);
    }
}

/// Web Mercator tile indices of `at` at `zoom`.
fn tile_index(at: LatLng, zoom: u8) -> (u32, u32) {
    let n = f64::from(1u32 << zoom.min(31));
    let lat = at.lat.clamp(-85.051_128, 85.051_128).to_radians();
    let x = ((at.lng + 180.0) / 360.0 * n).floor();
    let y = ((1.0 - lat.tan().asinh() / PI) / 2.0 * n).floor();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let clamp = |v: f64| v.clamp(0.0, n - 1.0) as u32;
    (clamp(x), clamp(y))
}

/// Fill a `{s}/{z}/{x}/{y}` template for the tile containing `at`.
fn tile_url(template: &str, zoom: u8, at: LatLng) -> String {
    let (x, y) = tile_index(at, zoom);
    template
        .replace("{s}", "a")
        .replace("{z}", &zoom.to_string())
        .replace("{x}", &x.to_string())
        .replace("{y}", &y.to_string())
}

fn osm_link(at: LatLng, zoom: u8) -> String {
    format!(
        "https://www.openstreetmap.org/?mlat={lat:.6}&mlon={lng:.6}#map={zoom}/{lat:.6}/{lng:.6}",
        lat = at.lat,
        lng = at.lng
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_index_origin() {
        assert_eq!(tile_index(LatLng::new(0.0, 0.0), 0), (0, 0));
        assert_eq!(tile_index(LatLng::new(0.0, 0.0), 1), (1, 1));
    }

    #[test]
    fn test_tile_index_pune() {
        let (x, y) = tile_index(LatLng::new(18.5204, 73.8567), 15);
        assert_eq!(x, 23106);
        assert!((14660..14675).contains(&y));
    }

    #[test]
    fn test_tile_url_template() {
        let url = tile_url(
            "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            1,
            LatLng::new(45.0, -90.0),
        );
        assert_eq!(url, "https://a.tile.openstreetmap.org/1/0/0.png");
    }

    #[test]
    fn test_marker_binds_escaped_popup() {
        let center = LatLng::new(18.5204, 73.8567);
        let mut map = TerminalMap {
            container: "map".to_string(),
            center,
            zoom: 15,
            tile: None,
            popup: None,
        };
        let popup = Popup {
            title: "Dock <3> & Yard".to_string(),
            position: center,
            open: true,
        };
        map.add_marker(center, &MarkerIcon::default(), popup);
        assert_eq!(
            map.popup.as_deref(),
            Some("<strong>Dock &lt;3&gt; &amp; Yard</strong><br/>Lat: 18.520400<br/>Lng: 73.856700")
        );
    }

    #[test]
    fn test_osm_link() {
        let link = osm_link(LatLng::new(18.5204, 73.8567), 15);
        assert_eq!(
            link,
            "https://www.openstreetmap.org/?mlat=18.520400&mlon=73.856700#map=15/18.520400/73.856700"
        );
    }
}
