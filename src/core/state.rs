//! Process-wide shutdown state.
//!
//! `SHUTDOWN` is set once Ctrl+C is received; the actor coordinator is
//! notified through a registered channel so it can tear the session down.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam::channel::{Receiver, Sender};

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Shutdown signal sender for the actor system
static SHUTDOWN_TX: OnceLock<Sender<()>> = OnceLock::new();

/// Setup the global Ctrl+C handler. Call once at program start
///
/// - Before `shutdown_signal()` is taken: exit immediately, nothing to tear down
/// - After: notify the coordinator so the map and session shut down cleanly
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        if let Some(tx) = SHUTDOWN_TX.get() {
            crate::debug!("session"; "shutting down...");
            let _ = tx.send(());
        } else {
            std::process::exit(0);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register for the shutdown signal. Only the first caller gets a receiver.
pub fn shutdown_signal() -> Option<Receiver<()>> {
    let (tx, rx) = crossbeam::channel::bounded(1);
    SHUTDOWN_TX.set(tx).ok().map(|()| rx)
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::SeqCst)
}
