use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::lifecycle::Loaded;
use super::{Attach, MapError, MapInstance, MapLifecycle, MapSurface, MapView, Popup};
use crate::config::{MapConfig, MarkerIcon, TileLayer};
use crate::core::{BoxFuture, LatLng};

/// What the fake renderer observed.
#[derive(Default)]
pub(crate) struct Record {
    pub live: usize,
    pub max_live: usize,
    pub created: usize,
    pub disposed: usize,
    pub resets: usize,
    pub loads: usize,
    pub centers: Vec<(LatLng, u8)>,
    pub tile_layers: usize,
    pub popups: Vec<(String, bool)>,
}

/// Renderer whose load takes `delay` and optionally fails.
pub(crate) struct FakeSurface {
    pub record: Arc<Mutex<Record>>,
    delay: Duration,
    fail_load: bool,
}

impl FakeSurface {
    pub fn new(delay: Duration) -> Self {
        Self {
            record: Arc::new(Mutex::new(Record::default())),
            delay,
            fail_load: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_load: true,
            ..Self::new(Duration::from_millis(10))
        }
    }
}

impl MapSurface for FakeSurface {
    fn load(&self) -> BoxFuture<'static, Result<(), MapError>> {
        self.record.lock().loads += 1;
        let delay = self.delay;
        let fail = self.fail_load;
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            if fail {
                Err(MapError::Load("script blocked".into()))
            } else {
                Ok(())
            }
        })
    }

    fn reset_container(&self, _container: &str) {
        self.record.lock().resets += 1;
    }

    fn create(
        &self,
        _container: &str,
        center: LatLng,
        zoom: u8,
    ) -> Result<Box<dyn MapInstance>, MapError> {
        let mut record = self.record.lock();
        record.live += 1;
        record.max_live = record.max_live.max(record.live);
        record.created += 1;
        record.centers.push((center, zoom));
        Ok(Box::new(FakeMap {
            record: Arc::clone(&self.record),
            markers: 0,
        }))
    }
}

struct FakeMap {
    record: Arc<Mutex<Record>>,
    markers: usize,
}

impl MapInstance for FakeMap {
    fn add_tile_layer(&mut self, _layer: &TileLayer) {
        self.record.lock().tile_layers += 1;
    }

    fn add_marker(&mut self, _position: LatLng, _icon: &MarkerIcon, popup: Popup) {
        self.markers += 1;
        assert_eq!(self.markers, 1, "more than one marker on a map");
        self.record.lock().popups.push((popup.html(), popup.open));
    }

    fn dispose(self: Box<Self>) {
        let mut record = self.record.lock();
        record.live -= 1;
        record.disposed += 1;
    }
}

fn lifecycle(surface: FakeSurface) -> (MapLifecycle, mpsc::UnboundedReceiver<Loaded>) {
    MapLifecycle::new(Arc::new(surface), MapConfig::default())
}

fn pune() -> MapView {
    MapView::new(
        LatLng::new(18.5204, 73.8567),
        "Pune Railway Station, Pune, Maharashtra",
    )
}

#[test]
fn test_popup_html() {
    let popup = Popup::for_view(&pune());
    assert!(popup.open);
    assert_eq!(
        popup.html(),
        "<strong>Pune Railway Station, Pune, Maharashtra</strong><br/>Lat: 18.520400<br/>Lng: 73.856700"
    );
    assert!(popup.text().ends_with("Lat: 18.520400  Lng: 73.856700"));
}

#[test]
fn test_popup_escapes_name() {
    let popup = Popup::for_view(&MapView::new(LatLng::new(0.0, 0.0), "<b>Dock & Yard</b>"));
    assert!(popup.html().starts_with("<strong>&lt;b&gt;Dock &amp; Yard&lt;/b&gt;</strong>"));
}

#[tokio::test(start_paused = true)]
async fn test_show_attaches_single_map() {
    let surface = FakeSurface::new(Duration::from_millis(50));
    let record = Arc::clone(&surface.record);
    let (mut map, mut loaded_rx) = lifecycle(surface);

    map.show(pune());
    assert!(map.is_loading());
    assert!(!map.is_attached());

    let loaded = loaded_rx.recv().await.unwrap();
    assert!(matches!(map.on_loaded(loaded), Attach::Attached(_)));
    assert!(map.is_attached());

    let record = record.lock();
    assert_eq!(record.live, 1);
    assert_eq!(record.resets, 1);
    assert_eq!(record.tile_layers, 1);
    assert_eq!(record.centers, vec![(LatLng::new(18.5204, 73.8567), 15)]);
    assert_eq!(record.popups.len(), 1);
    assert!(record.popups[0].1, "popup opened by default");
}

#[tokio::test(start_paused = true)]
async fn test_same_view_does_not_remount() {
    let surface = FakeSurface::new(Duration::from_millis(10));
    let record = Arc::clone(&surface.record);
    let (mut map, mut loaded_rx) = lifecycle(surface);

    map.show(pune());
    let loaded = loaded_rx.recv().await.unwrap();
    map.on_loaded(loaded);

    map.show(pune());
    assert!(!map.is_loading());
    assert_eq!(record.lock().loads, 1);
    assert_eq!(record.lock().created, 1);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_updates_keep_one_instance() {
    let surface = FakeSurface::new(Duration::from_millis(100));
    let record = Arc::clone(&surface.record);
    let (mut map, mut loaded_rx) = lifecycle(surface);

    map.show(MapView::new(LatLng::new(18.52, 73.85), "A"));
    map.show(MapView::new(LatLng::new(19.07, 72.87), "B"));
    map.show(MapView::new(LatLng::new(12.97, 77.59), "C"));

    let loaded = loaded_rx.recv().await.unwrap();
    assert!(matches!(map.on_loaded(loaded), Attach::Attached(_)));

    // superseded loads were aborted and never report back
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(loaded_rx.try_recv().is_err());

    let record = record.lock();
    assert_eq!(record.max_live, 1);
    assert_eq!(record.live, 1);
    assert_eq!(record.created, 1);
    assert_eq!(record.centers[0].0, LatLng::new(12.97, 77.59));
}

#[tokio::test(start_paused = true)]
async fn test_update_disposes_previous_instance() {
    let surface = FakeSurface::new(Duration::from_millis(10));
    let record = Arc::clone(&surface.record);
    let (mut map, mut loaded_rx) = lifecycle(surface);

    for view in [pune(), MapView::new(LatLng::new(19.07, 72.87), "Mumbai")] {
        map.show(view);
        let loaded = loaded_rx.recv().await.unwrap();
        assert!(matches!(map.on_loaded(loaded), Attach::Attached(_)));
    }

    let record = record.lock();
    assert_eq!(record.created, 2);
    assert_eq!(record.disposed, 1);
    assert_eq!(record.max_live, 1);
    assert_eq!(record.resets, 2);
}

#[tokio::test(start_paused = true)]
async fn test_stale_generation_discarded() {
    let surface = FakeSurface::new(Duration::from_millis(10));
    let record = Arc::clone(&surface.record);
    let (mut map, _loaded_rx) = lifecycle(surface);

    map.show(pune());
    map.show(MapView::new(LatLng::new(19.07, 72.87), "Mumbai"));

    // a completion for the first generation arriving late
    let stale = Loaded {
        generation: 1,
        result: Ok(()),
    };
    assert_eq!(map.on_loaded(stale), Attach::Stale);
    assert_eq!(record.lock().created, 0);
}

#[tokio::test(start_paused = true)]
async fn test_teardown_during_pending_load() {
    let surface = FakeSurface::new(Duration::from_millis(200));
    let record = Arc::clone(&surface.record);
    let (mut map, mut loaded_rx) = lifecycle(surface);

    map.show(pune());
    map.teardown();
    assert!(!map.is_loading());

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert!(loaded_rx.try_recv().is_err());

    // even a completion that slipped through cannot attach
    let late = Loaded {
        generation: 1,
        result: Ok(()),
    };
    assert_eq!(map.on_loaded(late), Attach::Stale);
    map.show(pune());

    let record = record.lock();
    assert_eq!(record.created, 0);
    assert_eq!(record.live, 0);
    assert_eq!(record.loads, 1);
}

#[tokio::test(start_paused = true)]
async fn test_teardown_disposes_live_instance() {
    let surface = FakeSurface::new(Duration::from_millis(10));
    let record = Arc::clone(&surface.record);
    let (mut map, mut loaded_rx) = lifecycle(surface);

    map.show(pune());
    let loaded = loaded_rx.recv().await.unwrap();
    map.on_loaded(loaded);
    assert_eq!(record.lock().live, 1);

    drop(map);
    assert_eq!(record.lock().live, 0);
    assert_eq!(record.lock().disposed, 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_load_attaches_nothing() {
    let surface = FakeSurface::failing();
    let record = Arc::clone(&surface.record);
    let (mut map, mut loaded_rx) = lifecycle(surface);

    map.show(pune());
    let loaded = loaded_rx.recv().await.unwrap();
    assert_eq!(
        map.on_loaded(loaded),
        Attach::Failed(MapError::Load("script blocked".into()))
    );
    assert!(!map.is_loading());

    // showing the same view again retries
    map.show(pune());
    assert!(map.is_loading());
    assert_eq!(record.lock().loads, 2);
    assert_eq!(record.lock().created, 0);
}
