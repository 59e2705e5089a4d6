//! Actor System for an Address Session
//!
//! Message-passing concurrency for one address-entry session:
//!
//! ```text
//! SessionActor ----MapMsg----> MapActor
//! (state machine)             (map lifecycle)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `session` - Acquisition, autocomplete and submission state
//! - `map` - Map widget mount/update/teardown
//! - `coordinator` - Wires up and runs actors

pub mod coordinator;
pub mod map;
pub mod messages;
pub mod session;

pub use coordinator::{Coordinator, RunningSession, Update};
pub use messages::{MapEvent, SessionMsg};
pub use session::{Phase, SessionSnapshot};
