use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{MapError, MapInstance, MapSurface, MapView, Popup};
use crate::config::MapConfig;

/// Completion of an asynchronous renderer load.
#[derive(Debug)]
pub struct Loaded {
    pub(super) generation: u64,
    pub(super) result: Result<(), MapError>,
}

/// Outcome of a load completion.
#[derive(Debug, Clone, PartialEq)]
pub enum Attach {
    /// Superseded or torn down; nothing changed.
    Stale,
    Attached(MapView),
    Failed(MapError),
}

/// Owns the one map instance bound to the configured container.
///
/// Every `show` with a different view starts a new generation; a load that
/// completes for an older generation, or after teardown, is discarded, so at
/// most one instance is ever attached.
pub struct MapLifecycle {
    surface: Arc<dyn MapSurface>,
    config: MapConfig,
    /// Bumped on every new view and on teardown.
    generation: u64,
    /// View requested by the latest `show`.
    view: Option<MapView>,
    instance: Option<Box<dyn MapInstance>>,
    pending: Option<JoinHandle<()>>,
    mounted: bool,
    loaded_tx: mpsc::UnboundedSender<Loaded>,
}

impl MapLifecycle {
    /// Create a mounted manager and the channel its load completions arrive on.
    pub fn new(
        surface: Arc<dyn MapSurface>,
        config: MapConfig,
    ) -> (Self, mpsc::UnboundedReceiver<Loaded>) {
        let (loaded_tx, loaded_rx) = mpsc::unbounded_channel();
        let lifecycle = Self {
            surface,
            config,
            generation: 0,
            view: None,
            instance: None,
            pending: None,
            mounted: true,
            loaded_tx,
        };
        (lifecycle, loaded_rx)
    }

    /// Display `view`, replacing whatever is shown or loading.
    ///
    /// Must be called within a tokio runtime.
    pub fn show(&mut self, view: MapView) {
        if !self.mounted {
            crate::debug!("map"; "ignoring view after teardown");
            return;
        }
        if self.view.as_ref() == Some(&view) && (self.instance.is_some() || self.pending.is_some()) {
            return;
        }

        self.release();
        self.generation += 1;
        self.view = Some(view);

        let generation = self.generation;
        let load = self.surface.load();
        let tx = self.loaded_tx.clone();
        self.pending = Some(tokio::spawn(async move {
            let result = load.await;
            let _ = tx.send(Loaded { generation, result });
        }));
        crate::debug!("map"; "loading renderer (generation {})", generation);
    }

    /// Attach the map if `loaded` belongs to the current generation.
    pub fn on_loaded(&mut self, loaded: Loaded) -> Attach {
        if !self.mounted || loaded.generation != self.generation {
            crate::debug!("map"; "discarding stale load (generation {})", loaded.generation);
            return Attach::Stale;
        }
        self.pending = None;

        if let Err(e) = loaded.result {
            crate::log!("map"; "{}", e);
            return Attach::Failed(e);
        }
        let Some(view) = self.view.clone() else {
            return Attach::Stale;
        };

        if let Some(old) = self.instance.take() {
            old.dispose();
        }
        let container = self.config.container.as_str();
        self.surface.reset_container(container);

        match self.surface.create(container, view.center, self.config.zoom) {
            Ok(mut instance) => {
                instance.add_tile_layer(&self.config.tiles);
                instance.add_marker(view.center, &self.config.marker, Popup::for_view(&view));
                self.instance = Some(instance);
                Attach::Attached(view)
            }
            Err(e) => {
                crate::log!("map"; "{}", e);
                Attach::Failed(e)
            }
        }
    }

    /// Dispose the live instance and invalidate any pending load.
    ///
    /// Later `show` calls are ignored.
    pub fn teardown(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.generation += 1;
        self.view = None;
        self.release();
        crate::debug!("map"; "torn down");
    }

    #[cfg(test)]
    pub fn is_attached(&self) -> bool {
        self.instance.is_some()
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    fn release(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        if let Some(instance) = self.instance.take() {
            instance.dispose();
        }
    }
}

impl Drop for MapLifecycle {
    fn drop(&mut self) {
        self.teardown();
    }
}
