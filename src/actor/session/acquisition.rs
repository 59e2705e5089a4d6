//! Location acquisition state machine.
//!
//! ```text
//! Idle --start--> RequestingPosition --position--> ResolvingFromPosition --ok--> Idle
//!  |                    |                                  |
//!  | unsupported        | denied / failed                  | failed
//!  v                    v                                  v
//! Error <------------------------------------------------------+
//!  |  error cleared
//!  v
//! ManualEntry   (terminal: no automatic position requests)
//! ```

use super::sequence::Ticket;
use crate::core::LatLng;
use crate::device::GeolocationError;

pub const UNSUPPORTED_MSG: &str = "Geolocation not supported. Please enter address manually.";
pub const DENIED_MSG: &str = "Location permission denied. Please enter address manually.";
pub const REVERSE_FAILED_MSG: &str = "Failed to get address for your location";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    RequestingPosition,
    ResolvingFromPosition,
    ManualEntry,
    /// Manual mode with an outstanding error message.
    Error,
}

impl Phase {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::RequestingPosition => "requesting position",
            Self::ResolvingFromPosition => "resolving address",
            Self::ManualEntry => "manual entry",
            Self::Error => "error",
        }
    }
}

/// Outcome of asking to start acquisition.
#[derive(Debug, PartialEq, Eq)]
pub enum Begin {
    /// Position request should be issued under this ticket.
    Request(Ticket),
    /// No geolocation capability; manual mode entered with this message.
    Unsupported(&'static str),
    /// Manual mode already entered.
    Suppressed,
}

/// What to do with a position answer.
#[derive(Debug, PartialEq)]
pub enum PositionStep {
    Stale,
    Resolve(LatLng),
    Failed(&'static str),
}

/// What to do with a reverse-geocode answer.
#[derive(Debug, PartialEq, Eq)]
pub enum AddressStep {
    Stale,
    Resolved,
    Failed(&'static str),
}

#[derive(Debug)]
pub struct Acquisition {
    phase: Phase,
    /// Ticket of the acquisition in progress.
    ticket: Option<Ticket>,
}

impl Default for Acquisition {
    fn default() -> Self {
        Self::new()
    }
}

impl Acquisition {
    pub const fn new() -> Self {
        Self {
            phase: Phase::Idle,
            ticket: None,
        }
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn is_manual(&self) -> bool {
        matches!(self.phase, Phase::ManualEntry | Phase::Error)
    }

    pub const fn is_acquiring(&self) -> bool {
        matches!(
            self.phase,
            Phase::RequestingPosition | Phase::ResolvingFromPosition
        )
    }

    /// Start acquisition. `issue` is only called when a request will be made.
    pub fn begin(&mut self, available: bool, issue: impl FnOnce() -> Ticket) -> Begin {
        if self.is_manual() {
            return Begin::Suppressed;
        }
        if !available {
            self.fail();
            return Begin::Unsupported(UNSUPPORTED_MSG);
        }
        let ticket = issue();
        self.phase = Phase::RequestingPosition;
        self.ticket = Some(ticket);
        Begin::Request(ticket)
    }

    pub fn on_position(
        &mut self,
        ticket: Ticket,
        result: Result<LatLng, GeolocationError>,
    ) -> PositionStep {
        if self.phase != Phase::RequestingPosition || self.ticket != Some(ticket) {
            return PositionStep::Stale;
        }
        match result {
            Ok(position) => {
                self.phase = Phase::ResolvingFromPosition;
                PositionStep::Resolve(position)
            }
            Err(e) => {
                crate::debug!("session"; "geolocation failed: {}", e);
                self.fail();
                PositionStep::Failed(DENIED_MSG)
            }
        }
    }

    pub fn on_address(&mut self, ticket: Ticket, ok: bool) -> AddressStep {
        if self.phase != Phase::ResolvingFromPosition || self.ticket != Some(ticket) {
            return AddressStep::Stale;
        }
        self.ticket = None;
        if ok {
            self.phase = Phase::Idle;
            AddressStep::Resolved
        } else {
            self.phase = Phase::Error;
            AddressStep::Failed(REVERSE_FAILED_MSG)
        }
    }

    /// Enter manual mode. Returns whether an acquisition was abandoned.
    pub fn force_manual(&mut self) -> bool {
        let abandoned = self.is_acquiring();
        self.ticket = None;
        if !self.is_manual() {
            self.phase = Phase::ManualEntry;
        }
        abandoned
    }

    /// A newer slot request took over; late answers become stale.
    pub fn supersede(&mut self) {
        if self.is_acquiring() {
            self.phase = Phase::Idle;
            self.ticket = None;
        }
    }

    /// The outstanding error was cleared.
    pub fn clear_error(&mut self) {
        if self.phase == Phase::Error {
            self.phase = Phase::ManualEntry;
        }
    }

    fn fail(&mut self) {
        self.phase = Phase::Error;
        self.ticket = None;
    }
}

#[cfg(test)]
mod tests {
    use super::super::sequence::Sequence;
    use super::*;

    fn started(seq: &mut Sequence) -> (Acquisition, Ticket) {
        let mut acq = Acquisition::new();
        let Begin::Request(ticket) = acq.begin(true, || seq.issue()) else {
            panic!("expected a position request");
        };
        (acq, ticket)
    }

    #[test]
    fn test_happy_path() {
        let mut seq = Sequence::new();
        let (mut acq, ticket) = started(&mut seq);
        assert_eq!(acq.phase(), Phase::RequestingPosition);
        assert!(acq.is_acquiring());

        let at = LatLng::new(18.5204, 73.8567);
        assert_eq!(acq.on_position(ticket, Ok(at)), PositionStep::Resolve(at));
        assert_eq!(acq.phase(), Phase::ResolvingFromPosition);

        assert_eq!(acq.on_address(ticket, true), AddressStep::Resolved);
        assert_eq!(acq.phase(), Phase::Idle);
    }

    #[test]
    fn test_unsupported_enters_manual_without_ticket() {
        let mut seq = Sequence::new();
        let mut acq = Acquisition::new();
        let begin = acq.begin(false, || seq.issue());
        assert_eq!(begin, Begin::Unsupported(UNSUPPORTED_MSG));
        assert_eq!(acq.phase(), Phase::Error);

        // nothing was issued
        let next = seq.issue();
        assert_eq!(next.id(), 1);
    }

    #[test]
    fn test_permission_denied() {
        let mut seq = Sequence::new();
        let (mut acq, ticket) = started(&mut seq);
        let step = acq.on_position(ticket, Err(GeolocationError::PermissionDenied));
        assert_eq!(step, PositionStep::Failed(DENIED_MSG));
        assert!(acq.is_manual());
    }

    #[test]
    fn test_reverse_failure() {
        let mut seq = Sequence::new();
        let (mut acq, ticket) = started(&mut seq);
        acq.on_position(ticket, Ok(LatLng::new(1.0, 2.0)));
        assert_eq!(
            acq.on_address(ticket, false),
            AddressStep::Failed(REVERSE_FAILED_MSG)
        );
        assert_eq!(acq.phase(), Phase::Error);

        acq.clear_error();
        assert_eq!(acq.phase(), Phase::ManualEntry);
    }

    #[test]
    fn test_manual_is_terminal() {
        let mut seq = Sequence::new();
        let mut acq = Acquisition::new();
        assert!(!acq.force_manual());
        assert_eq!(acq.begin(true, || seq.issue()), Begin::Suppressed);
        assert_eq!(acq.phase(), Phase::ManualEntry);
    }

    #[test]
    fn test_manual_abandons_inflight() {
        let mut seq = Sequence::new();
        let (mut acq, ticket) = started(&mut seq);
        assert!(acq.force_manual());

        let step = acq.on_position(ticket, Ok(LatLng::new(1.0, 2.0)));
        assert_eq!(step, PositionStep::Stale);
        assert_eq!(acq.phase(), Phase::ManualEntry);
    }

    #[test]
    fn test_superseded_answers_are_stale() {
        let mut seq = Sequence::new();
        let (mut acq, ticket) = started(&mut seq);
        acq.on_position(ticket, Ok(LatLng::new(1.0, 2.0)));

        acq.supersede();
        assert_eq!(acq.phase(), Phase::Idle);
        assert_eq!(acq.on_address(ticket, true), AddressStep::Stale);
    }
}
