//! Submission resolver: explicit submit and suggestion selection.
//!
//! Owns the slot sequence. Every request that may write the result slot,
//! including reverse geocoding during acquisition, takes its ticket here, so
//! only the newest one can land.

use super::sequence::{Sequence, Ticket};
use crate::backend::BackendError;
use crate::core::{AutocompleteResult, GeocodingResult};

pub const NOT_FOUND_MSG: &str = "Address not found. Please try a different address.";
pub const SELECTION_FAILED_MSG: &str = "Failed to geocode selected address.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Submit,
    Suggestion,
}

impl Origin {
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Submit => NOT_FOUND_MSG,
            Self::Suggestion => SELECTION_FAILED_MSG,
        }
    }
}

/// A forward geocode to dispatch.
#[derive(Debug, PartialEq, Eq)]
pub struct Request {
    pub ticket: Ticket,
    pub origin: Origin,
    pub address: String,
}

#[derive(Debug, PartialEq)]
pub enum Resolution {
    Stale,
    Resolved(GeocodingResult),
    Failed(&'static str),
}

#[derive(Debug, Default)]
pub struct Resolver {
    slot: Sequence,
}

impl Resolver {
    pub const fn new() -> Self {
        Self {
            slot: Sequence::new(),
        }
    }

    /// Ticket for any slot-writing request.
    pub fn issue(&mut self) -> Ticket {
        self.slot.issue()
    }

    /// Drop every outstanding slot request.
    pub fn invalidate(&mut self) {
        self.slot.invalidate();
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.slot.is_current(ticket)
    }

    /// Explicit submit. Blank text issues nothing.
    pub fn submit(&mut self, text: &str) -> Option<Request> {
        let address = text.trim();
        if address.is_empty() {
            return None;
        }
        Some(Request {
            ticket: self.issue(),
            origin: Origin::Submit,
            address: address.to_string(),
        })
    }

    /// Resolve a chosen suggestion by its display name.
    pub fn select(&mut self, suggestion: &AutocompleteResult) -> Request {
        Request {
            ticket: self.issue(),
            origin: Origin::Suggestion,
            address: suggestion.display_name.clone(),
        }
    }

    pub fn complete(
        &self,
        ticket: Ticket,
        origin: Origin,
        result: Result<GeocodingResult, BackendError>,
    ) -> Resolution {
        if !self.is_current(ticket) {
            return Resolution::Stale;
        }
        match result {
            Ok(result) => Resolution::Resolved(result),
            Err(e) => {
                crate::debug!("session"; "geocode failed: {}", e);
                Resolution::Failed(origin.failure_message())
            }
        }
    }
}
