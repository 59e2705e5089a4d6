//! Actor Coordinator - Wires up a Session
//!
//! The Coordinator is a thin orchestrator that:
//! - Creates communication channels
//! - Wires the session to its map
//! - Runs both until shutdown

mod runtime;

use std::sync::Arc;

use crossbeam::channel::Receiver;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::map::MapActor;
use super::messages::{MapEvent, MapMsg, SessionMsg};
use super::session::{SessionActor, SessionHandle, SessionSnapshot};
use crate::backend::GeocodingBackend;
use crate::config::AppConfig;
use crate::device::Geolocator;
use crate::map::MapSurface;

const CHANNEL_BUFFER: usize = 32;

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    config: Arc<AppConfig>,
    backend: Arc<dyn GeocodingBackend>,
    geolocator: Arc<dyn Geolocator>,
    surface: Arc<dyn MapSurface>,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    pub fn new(
        config: Arc<AppConfig>,
        backend: Arc<dyn GeocodingBackend>,
        geolocator: Arc<dyn Geolocator>,
        surface: Arc<dyn MapSurface>,
    ) -> Self {
        Self {
            config,
            backend,
            geolocator,
            surface,
            shutdown_rx: None,
        }
    }

    /// Stop the session when a signal arrives on `rx`.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Spawn the session and map actors on the current runtime.
    pub fn spawn(self) -> RunningSession {
        let (session_tx, session_rx) = mpsc::channel::<SessionMsg>(CHANNEL_BUFFER);
        let (map_tx, map_rx) = mpsc::channel::<MapMsg>(CHANNEL_BUFFER);
        let (frames_tx, frames_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let map = MapActor::new(map_rx, self.surface, self.config.map.clone())
            .with_events(events_tx);
        let session = SessionActor::new(session_rx, &self.config, self.backend, self.geolocator)
            .with_map(map_tx)
            .with_frames(frames_tx);
        let handle = SessionHandle::new(session_tx);

        crate::debug!("actor"; "start");
        let task = tokio::spawn(runtime::run_actors(
            session,
            map,
            handle.clone(),
            self.shutdown_rx,
        ));

        RunningSession {
            handle,
            frames: frames_rx,
            map_events: events_rx,
            task,
        }
    }
}

/// Either stream of a running session.
#[derive(Debug)]
pub enum Update {
    Frame(SessionSnapshot),
    Map(MapEvent),
}

/// A spawned session: its input handle, published snapshots and map events.
pub struct RunningSession {
    pub handle: SessionHandle,
    frames: mpsc::UnboundedReceiver<SessionSnapshot>,
    map_events: mpsc::UnboundedReceiver<MapEvent>,
    task: JoinHandle<()>,
}

impl RunningSession {
    /// Next published snapshot; `None` once the session stopped.
    pub async fn next_frame(&mut self) -> Option<SessionSnapshot> {
        self.frames.recv().await
    }

    /// A snapshot already published, without waiting.
    #[cfg(test)]
    pub fn try_frame(&mut self) -> Option<SessionSnapshot> {
        self.frames.try_recv().ok()
    }

    /// Next attach outcome; `None` once the map stopped.
    pub async fn next_map_event(&mut self) -> Option<MapEvent> {
        self.map_events.recv().await
    }

    /// Next snapshot or map event, whichever comes first; `None` once the
    /// session stopped.
    pub async fn next_update(&mut self) -> Option<Update> {
        tokio::select! {
            frame = self.frames.recv() => frame.map(Update::Frame),
            Some(event) = self.map_events.recv() => Some(Update::Map(event)),
        }
    }

    /// Stop the session and wait for the map to be torn down.
    pub async fn shutdown(self) {
        let _ = self.handle.send(SessionMsg::Shutdown).await;
        drop(self.handle);
        let _ = self.task.await;
        crate::debug!("actor"; "stopped");
    }
}
