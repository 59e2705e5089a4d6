//! Map Actor
//!
//! Drives a [`MapLifecycle`] from session results and renderer load
//! completions. Stopping the actor tears the map down.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::messages::{MapEvent, MapMsg};
use crate::config::MapConfig;
use crate::map::{Attach, Loaded, MapLifecycle, MapSurface};

pub struct MapActor {
    rx: mpsc::Receiver<MapMsg>,
    loaded_rx: mpsc::UnboundedReceiver<Loaded>,
    lifecycle: MapLifecycle,
    events_tx: Option<mpsc::UnboundedSender<MapEvent>>,
}

impl MapActor {
    pub fn new(rx: mpsc::Receiver<MapMsg>, surface: Arc<dyn MapSurface>, config: MapConfig) -> Self {
        let (lifecycle, loaded_rx) = MapLifecycle::new(surface, config);
        Self {
            rx,
            loaded_rx,
            lifecycle,
            events_tx: None,
        }
    }

    /// Report attach outcomes on `tx`.
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<MapEvent>) -> Self {
        self.events_tx = Some(tx);
        self
    }

    /// Run the actor event loop
    pub async fn run(self) {
        let Self {
            mut rx,
            mut loaded_rx,
            mut lifecycle,
            events_tx,
        } = self;

        loop {
            tokio::select! {
                biased;
                msg = rx.recv() => match msg {
                    Some(MapMsg::Show(view)) => lifecycle.show(view),
                    Some(MapMsg::Teardown) | None => break,
                },
                Some(loaded) = loaded_rx.recv() => {
                    let event = match lifecycle.on_loaded(loaded) {
                        Attach::Stale => continue,
                        Attach::Attached(view) => MapEvent::Attached(view),
                        Attach::Failed(e) => MapEvent::Failed(e.to_string()),
                    };
                    if let Some(tx) = &events_tx {
                        let _ = tx.send(event);
                    }
                }
            }
        }

        lifecycle.teardown();
    }
}
