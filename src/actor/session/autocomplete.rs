//! Autocomplete query coordinator.
//!
//! Pure timing and bookkeeping: the actor feeds it text changes and the clock,
//! asks it for the query due at the debounce deadline and hands it responses.
//! Only the latest dispatched query may change the suggestion list.

use std::time::Duration;

use tokio::time::Instant;

use super::sequence::{Sequence, Ticket};
use crate::backend::BackendError;
use crate::config::AutocompleteConfig;
use crate::core::AutocompleteResult;

/// Query waiting for the debounce interval to pass.
#[derive(Debug)]
struct Pending {
    query: String,
    deadline: Instant,
}

#[derive(Debug)]
pub struct AutocompleteCoordinator {
    min_chars: usize,
    debounce: Duration,
    pending: Option<Pending>,
    seq: Sequence,
    suggestions: Vec<AutocompleteResult>,
    /// Trimmed text `suggestions` were fetched for.
    fetched_for: String,
    visible: bool,
}

impl AutocompleteCoordinator {
    pub fn new(config: &AutocompleteConfig) -> Self {
        Self {
            min_chars: config.min_chars,
            debounce: config.debounce(),
            pending: None,
            seq: Sequence::new(),
            suggestions: Vec::new(),
            fetched_for: String::new(),
            visible: false,
        }
    }

    /// User edited the field. Returns whether the visible list changed.
    pub fn on_text(&mut self, text: &str, now: Instant) -> bool {
        self.seq.invalidate();
        let query = text.trim();

        if query.chars().count() < self.min_chars {
            self.pending = None;
            return self.clear();
        }

        self.pending = Some(Pending {
            query: query.to_string(),
            deadline: now + self.debounce,
        });
        false
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Take the pending query if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<(Ticket, String)> {
        if self.pending.as_ref()?.deadline > now {
            return None;
        }
        let pending = self.pending.take()?;
        Some((self.seq.issue(), pending.query))
    }

    /// Apply a response. Returns `false` for a stale one.
    pub fn on_response(
        &mut self,
        ticket: Ticket,
        query: String,
        result: Result<Vec<AutocompleteResult>, BackendError>,
    ) -> bool {
        if !self.seq.is_current(ticket) {
            crate::debug!("session"; "discarding stale suggestions for `{}`", query);
            return false;
        }
        match result {
            Ok(list) if !list.is_empty() => {
                crate::debug!("session"; "{} suggestions for `{}`", list.len(), query);
                self.suggestions = list;
                self.fetched_for = query;
                self.visible = true;
            }
            Ok(_) => {
                self.clear();
            }
            Err(e) => {
                crate::debug!("session"; "autocomplete `{}` failed: {}", query, e);
                self.clear();
            }
        }
        true
    }

    /// Field lost focus: hide the list but keep it cached.
    pub fn on_blur(&mut self) -> bool {
        std::mem::replace(&mut self.visible, false)
    }

    /// Field regained focus. Re-shows a cached list fetched for `text`.
    pub fn on_focus(&mut self, text: &str) -> bool {
        if self.visible || self.suggestions.is_empty() || self.fetched_for != text.trim() {
            return false;
        }
        self.visible = true;
        true
    }

    /// A submission began: drop the timer, outstanding responses and the list.
    pub fn reset(&mut self) -> bool {
        self.pending = None;
        self.seq.invalidate();
        self.clear()
    }

    pub fn get(&self, index: usize) -> Option<&AutocompleteResult> {
        self.suggestions.get(index)
    }

    pub fn suggestions(&self) -> &[AutocompleteResult] {
        &self.suggestions
    }

    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    fn clear(&mut self) -> bool {
        let changed = self.visible || !self.suggestions.is_empty();
        self.suggestions.clear();
        self.fetched_for.clear();
        self.visible = false;
        changed
    }
}
