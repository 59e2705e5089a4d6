//! Actor Message Definitions
//!
//! ```text
//! caller --SessionMsg--> SessionActor --MapMsg--> MapActor --MapEvent--> caller
//!                          ^      |
//!                          |      +--spawn--> backend / geolocator
//!                          +---Completion---------+
//! ```

use crate::backend::BackendError;
use crate::core::{AutocompleteResult, GeocodingResult, LatLng};
use crate::device::GeolocationError;
use crate::map::MapView;

use super::session::{Origin, Ticket};

// =============================================================================
// SessionActor Messages
// =============================================================================

/// User-facing inputs to the session.
#[derive(Debug)]
pub enum SessionMsg {
    /// Session mounted: try automatic location.
    Start,
    /// The text field was edited by the user.
    TextChanged(String),
    /// The text field regained focus.
    Focus,
    /// The text field lost focus.
    Blur,
    /// Explicit submit of the current text.
    Submit,
    /// A visible suggestion was picked (0-based).
    SelectSuggestion(usize),
    /// Switch to manual entry.
    ManualInput,
    Shutdown,
}

/// Answers from spawned collaborator calls, tagged with the ticket they were
/// dispatched under.
#[derive(Debug)]
pub enum Completion {
    Position {
        ticket: Ticket,
        result: Result<LatLng, GeolocationError>,
    },
    ReverseGeocode {
        ticket: Ticket,
        result: Result<GeocodingResult, BackendError>,
    },
    Autocomplete {
        ticket: Ticket,
        query: String,
        result: Result<Vec<AutocompleteResult>, BackendError>,
    },
    Geocode {
        ticket: Ticket,
        origin: Origin,
        result: Result<GeocodingResult, BackendError>,
    },
}

// =============================================================================
// MapActor Messages
// =============================================================================

#[derive(Debug)]
pub enum MapMsg {
    /// Display a new result.
    Show(MapView),
    /// Dispose the map and stop.
    Teardown,
}

/// What the map actor reports back.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    Attached(MapView),
    Failed(String),
}
