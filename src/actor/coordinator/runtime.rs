use std::time::Duration;

use crossbeam::channel::Receiver;

use crate::actor::map::MapActor;
use crate::actor::messages::SessionMsg;
use crate::actor::session::{SessionActor, SessionHandle};

/// Run the session and its map until the session stops.
///
/// The session tears the map down on exit; the map gets a grace period to
/// dispose before it is abandoned.
pub(super) async fn run_actors(
    session: SessionActor,
    map: MapActor,
    handle: SessionHandle,
    shutdown_rx: Option<Receiver<()>>,
) {
    let map_handle = tokio::spawn(async move { map.run().await });
    let session_handle = tokio::spawn(async move { session.run().await });

    // Poll-based since the signal arrives on a crossbeam channel
    if let Some(rx) = shutdown_rx {
        while !session_handle.is_finished() {
            if rx.try_recv().is_ok() {
                crate::debug!("actor"; "shutdown signal received");
                let _ = handle.send(SessionMsg::Shutdown).await;
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
    drop(handle);

    let _ = session_handle.await;
    let _ = tokio::time::timeout(Duration::from_millis(500), map_handle).await;
}
