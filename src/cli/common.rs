//! Common utilities shared across CLI commands.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::actor::{Coordinator, MapEvent, RunningSession, SessionSnapshot};
use crate::backend::{GeocodingBackend, HttpBackend};
use crate::config::AppConfig;
use crate::device::Geolocator;
use crate::map::TerminalSurface;

use super::display::render_result;

/// Single-threaded runtime every command runs on.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")
}

pub fn backend(config: &AppConfig) -> Result<Arc<dyn GeocodingBackend>> {
    Ok(Arc::new(HttpBackend::new(&config.api)?))
}

/// Coordinator for a session against the HTTP backend with a terminal map.
pub fn coordinator(
    config: &Arc<AppConfig>,
    geolocator: Arc<dyn Geolocator>,
) -> Result<Coordinator> {
    Ok(Coordinator::new(
        Arc::clone(config),
        backend(config)?,
        geolocator,
        Arc::new(TerminalSurface::new()),
    ))
}

/// Wait for the first frame satisfying `done`.
pub async fn wait_for(
    session: &mut RunningSession,
    mut done: impl FnMut(&SessionSnapshot) -> bool,
) -> Result<SessionSnapshot> {
    while let Some(frame) = session.next_frame().await {
        if done(&frame) {
            return Ok(frame);
        }
    }
    bail!("session stopped before completing")
}

/// Wait until the map has rendered the latest result, bounded by `limit`.
pub async fn wait_for_map(session: &mut RunningSession, limit: Duration) {
    match tokio::time::timeout(limit, session.next_map_event()).await {
        Ok(Some(MapEvent::Attached(_))) => {}
        Ok(Some(MapEvent::Failed(e))) => crate::log!("map"; "not rendered: {}", e),
        Ok(None) => {}
        Err(_) => crate::debug!("map"; "gave up waiting for the map"),
    }
}

/// Print the outcome of a settled frame and turn its error into a failure.
pub async fn finish(
    mut session: RunningSession,
    frame: SessionSnapshot,
    limit: Duration,
) -> Result<()> {
    if let Some(error) = &frame.error {
        session.shutdown().await;
        bail!("{error}");
    }
    let Some(result) = &frame.result else {
        session.shutdown().await;
        bail!("no location resolved");
    };

    println!("{}", render_result(result));
    wait_for_map(&mut session, limit).await;
    session.shutdown().await;
    Ok(())
}
