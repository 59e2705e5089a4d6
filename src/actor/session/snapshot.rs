use super::acquisition::Phase;
use crate::core::{AutocompleteResult, GeocodingResult};

/// Everything a presentation layer renders, published after each change.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub text: String,
    pub loading: bool,
    pub error: Option<String>,
    pub result: Option<GeocodingResult>,
    /// Visible suggestions; empty while hidden.
    pub suggestions: Vec<AutocompleteResult>,
}

impl SessionSnapshot {
    /// No position request or resolution is outstanding.
    pub fn is_settled(&self) -> bool {
        !self.loading
            && !matches!(
                self.phase,
                Phase::RequestingPosition | Phase::ResolvingFromPosition
            )
    }

    pub fn suggestions_visible(&self) -> bool {
        !self.suggestions.is_empty()
    }
}
