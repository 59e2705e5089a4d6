//! Last-request-wins bookkeeping.
//!
//! A [`Ticket`] is captured when a request is dispatched and compared when its
//! response arrives; anything issued or invalidated in between makes it stale.

/// Token identifying one dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Ticket {
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Monotonic request counter for one logical action.
#[derive(Debug, Default)]
pub struct Sequence {
    latest: u64,
}

impl Sequence {
    pub const fn new() -> Self {
        Self { latest: 0 }
    }

    /// Issue a ticket superseding every earlier one.
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    /// Make every outstanding ticket stale without issuing a new one.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }
}
