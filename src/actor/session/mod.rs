//! Session Actor
//!
//! Owns one address-entry session: the text field, the single result slot,
//! loading and error state, the suggestion list and the acquisition phase.
//!
//! ```text
//! SessionMsg ──► handle ──► spawn collaborator call ──► Completion ──► complete
//!                   │                                                     │
//!                   └──────────────── publish(SessionSnapshot) ◄──────────┘
//! ```
//!
//! Collaborator calls run as spawned tasks bounded by the api timeout and post
//! back tagged with a [`Ticket`]; the actor drops answers whose ticket is no
//! longer current. The autocomplete debounce is a single deadline raced in the
//! `select!` loop.

mod acquisition;
mod autocomplete;
mod resolver;
mod sequence;
mod snapshot;


use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

use super::messages::{Completion, MapMsg, SessionMsg};
use crate::backend::{BackendError, GeocodingBackend};
use crate::config::AppConfig;
use crate::core::{GeocodingResult, LatLng};
use crate::device::{GeolocationError, Geolocator};
use crate::map::MapView;

use acquisition::{Acquisition, AddressStep, Begin, PositionStep};
use autocomplete::AutocompleteCoordinator;
use resolver::{Request, Resolution, Resolver};

pub use acquisition::Phase;
pub use resolver::Origin;
pub use sequence::Ticket;
pub use snapshot::SessionSnapshot;

/// Cloneable sender side of a session.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionMsg>,
}

impl SessionHandle {
    pub fn new(tx: mpsc::Sender<SessionMsg>) -> Self {
        Self { tx }
    }

    /// Returns `false` once the session has stopped.
    pub async fn send(&self, msg: SessionMsg) -> bool {
        self.tx.send(msg).await.is_ok()
    }

    pub async fn type_text(&self, text: impl Into<String>) -> bool {
        self.send(SessionMsg::TextChanged(text.into())).await
    }
}

/// Session Actor - runs one session until shutdown
pub struct SessionActor {
    rx: mpsc::Receiver<SessionMsg>,
    done_rx: mpsc::UnboundedReceiver<Completion>,
    session: Session,
}

impl SessionActor {
    pub fn new(
        rx: mpsc::Receiver<SessionMsg>,
        config: &AppConfig,
        backend: Arc<dyn GeocodingBackend>,
        geolocator: Arc<dyn Geolocator>,
    ) -> Self {
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        let session = Session {
            backend,
            geolocator,
            timeout: config.api.timeout(),
            done_tx,
            map_tx: None,
            frames_tx: None,
            text: String::new(),
            loading: false,
            error: None,
            result: None,
            acquisition: Acquisition::new(),
            autocomplete: AutocompleteCoordinator::new(&config.autocomplete),
            resolver: Resolver::new(),
        };
        Self {
            rx,
            done_rx,
            session,
        }
    }

    /// Forward every new result to a map actor.
    pub fn with_map(mut self, map_tx: mpsc::Sender<MapMsg>) -> Self {
        self.session.map_tx = Some(map_tx);
        self
    }

    /// Publish a snapshot after every observable change.
    pub fn with_frames(mut self, frames_tx: mpsc::UnboundedSender<SessionSnapshot>) -> Self {
        self.session.frames_tx = Some(frames_tx);
        self
    }

    /// Run the actor event loop
    pub async fn run(self) {
        let Self {
            mut rx,
            mut done_rx,
            mut session,
        } = self;

        loop {
            let deadline = session.autocomplete.deadline();
            tokio::select! {
                biased;
                msg = rx.recv() => match msg {
                    Some(SessionMsg::Shutdown) | None => break,
                    Some(msg) => session.handle(msg),
                },
                Some(done) = done_rx.recv() => session.complete(done).await,
                () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    session.fire_autocomplete();
                }
            }
        }

        session.detach().await;
        crate::debug!("session"; "stopped");
    }
}

struct Session {
    backend: Arc<dyn GeocodingBackend>,
    geolocator: Arc<dyn Geolocator>,
    timeout: Duration,
    done_tx: mpsc::UnboundedSender<Completion>,
    map_tx: Option<mpsc::Sender<MapMsg>>,
    frames_tx: Option<mpsc::UnboundedSender<SessionSnapshot>>,

    text: String,
    loading: bool,
    error: Option<String>,
    result: Option<GeocodingResult>,

    acquisition: Acquisition,
    autocomplete: AutocompleteCoordinator,
    resolver: Resolver,
}

impl Session {
    fn handle(&mut self, msg: SessionMsg) {
        match msg {
            SessionMsg::Start => self.start(),
            SessionMsg::TextChanged(text) => self.edit(text),
            SessionMsg::Focus => {
                if self.autocomplete.on_focus(&self.text) {
                    self.publish();
                }
            }
            SessionMsg::Blur => {
                if self.autocomplete.on_blur() {
                    self.publish();
                }
            }
            SessionMsg::Submit => self.submit(),
            SessionMsg::SelectSuggestion(index) => self.select(index),
            SessionMsg::ManualInput => self.manual(),
            SessionMsg::Shutdown => {}
        }
    }

    async fn complete(&mut self, done: Completion) {
        match done {
            Completion::Position { ticket, result } => {
                match self.acquisition.on_position(ticket, result) {
                    PositionStep::Stale => {
                        crate::debug!("session"; "discarding late position");
                    }
                    PositionStep::Resolve(at) => {
                        crate::debug!("session"; "position {}", at);
                        self.publish();
                        self.reverse_geocode(ticket, at);
                    }
                    PositionStep::Failed(msg) => self.fail(msg),
                }
            }
            Completion::ReverseGeocode { ticket, result } => {
                if !self.resolver.is_current(ticket) {
                    crate::debug!("session"; "discarding superseded address");
                    return;
                }
                match (self.acquisition.on_address(ticket, result.is_ok()), result) {
                    (AddressStep::Resolved, Ok(result)) => {
                        self.text = result.display_name.clone();
                        self.autocomplete.reset();
                        self.error = None;
                        self.loading = false;
                        self.store(result).await;
                        self.publish();
                    }
                    (AddressStep::Failed(msg), Err(e)) => {
                        crate::debug!("session"; "reverse geocode failed: {}", e);
                        self.fail(msg);
                    }
                    _ => crate::debug!("session"; "discarding late address"),
                }
            }
            Completion::Autocomplete {
                ticket,
                query,
                result,
            } => {
                if self.autocomplete.on_response(ticket, query, result) {
                    self.publish();
                }
            }
            Completion::Geocode {
                ticket,
                origin,
                result,
            } => match self.resolver.complete(ticket, origin, result) {
                Resolution::Stale => {
                    crate::debug!("session"; "discarding superseded geocode");
                }
                Resolution::Resolved(result) => {
                    self.loading = false;
                    self.clear_error();
                    self.store(result).await;
                    self.publish();
                }
                Resolution::Failed(msg) => self.fail(msg),
            },
        }
    }

    fn start(&mut self) {
        let available = self.geolocator.is_available();
        let resolver = &mut self.resolver;
        match self.acquisition.begin(available, || resolver.issue()) {
            Begin::Request(ticket) => {
                crate::debug!("session"; "requesting position");
                self.loading = true;
                self.publish();
                self.request_position(ticket);
            }
            Begin::Unsupported(msg) => self.fail(msg),
            Begin::Suppressed => {
                crate::debug!("session"; "manual entry, skipping position request");
            }
        }
    }

    fn edit(&mut self, text: String) {
        self.text = text;
        self.autocomplete.on_text(&self.text, Instant::now());
        self.publish();
    }

    fn submit(&mut self) {
        match self.resolver.submit(&self.text) {
            Some(request) => self.begin_resolution(request),
            None => crate::debug!("session"; "nothing to submit"),
        }
    }

    fn select(&mut self, index: usize) {
        let suggestion = match self.autocomplete.get(index) {
            Some(s) if self.autocomplete.is_visible() => s.clone(),
            _ => {
                crate::debug!("session"; "no visible suggestion #{}", index + 1);
                return;
            }
        };
        self.text = suggestion.display_name.clone();
        let request = self.resolver.select(&suggestion);
        self.begin_resolution(request);
    }

    fn manual(&mut self) {
        if self.acquisition.force_manual() {
            crate::debug!("session"; "abandoning position request");
            self.resolver.invalidate();
            self.loading = false;
        }
        self.publish();
    }

    /// Hide suggestions, then assert loading and dispatch the geocode.
    fn begin_resolution(&mut self, request: Request) {
        self.acquisition.supersede();
        let hidden = self.autocomplete.reset();
        let cleared = self.clear_error();
        if hidden || cleared {
            self.publish();
        }

        self.loading = true;
        self.publish();

        crate::debug!("session"; "geocode #{} `{}`", request.ticket.id(), request.address);
        let Request {
            ticket,
            origin,
            address,
        } = request;
        let backend = Arc::clone(&self.backend);
        let done = self.done_tx.clone();
        let limit = self.timeout;
        tokio::spawn(async move {
            let result = bounded(limit, backend.geocode(address), BackendError::Timeout).await;
            let _ = done.send(Completion::Geocode {
                ticket,
                origin,
                result,
            });
        });
    }

    fn fire_autocomplete(&mut self) {
        let Some((ticket, query)) = self.autocomplete.take_due(Instant::now()) else {
            return;
        };
        crate::debug!("session"; "autocomplete `{}`", query);
        let backend = Arc::clone(&self.backend);
        let done = self.done_tx.clone();
        let limit = self.timeout;
        tokio::spawn(async move {
            let call = backend.autocomplete(query.clone());
            let result = bounded(limit, call, BackendError::Timeout).await;
            let _ = done.send(Completion::Autocomplete {
                ticket,
                query,
                result,
            });
        });
    }

    fn request_position(&self, ticket: Ticket) {
        let geolocator = Arc::clone(&self.geolocator);
        let done = self.done_tx.clone();
        let limit = self.timeout;
        tokio::spawn(async move {
            let call = geolocator.current_position();
            let result = bounded(limit, call, GeolocationError::Timeout).await;
            let _ = done.send(Completion::Position { ticket, result });
        });
    }

    fn reverse_geocode(&self, ticket: Ticket, at: LatLng) {
        let backend = Arc::clone(&self.backend);
        let done = self.done_tx.clone();
        let limit = self.timeout;
        tokio::spawn(async move {
            let result = bounded(limit, backend.reverse_geocode(at), BackendError::Timeout).await;
            let _ = done.send(Completion::ReverseGeocode { ticket, result });
        });
    }

    /// Replace the result slot and forward it to the map.
    async fn store(&mut self, result: GeocodingResult) {
        crate::debug!("session"; "resolved `{}` ({})", result.display_name, result.source.label());
        if let Some(map) = &self.map_tx {
            let _ = map.send(MapMsg::Show(MapView::from(&result))).await;
        }
        self.result = Some(result);
    }

    fn fail(&mut self, msg: &str) {
        self.error = Some(msg.to_string());
        self.loading = false;
        self.publish();
    }

    /// Returns whether an error was showing.
    fn clear_error(&mut self) -> bool {
        self.acquisition.clear_error();
        self.error.take().is_some()
    }

    async fn detach(&mut self) {
        if let Some(map) = self.map_tx.take() {
            let _ = map.send(MapMsg::Teardown).await;
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.acquisition.phase(),
            text: self.text.clone(),
            loading: self.loading,
            error: self.error.clone(),
            result: self.result.clone(),
            suggestions: if self.autocomplete.is_visible() {
                self.autocomplete.suggestions().to_vec()
            } else {
                Vec::new()
            },
        }
    }

    fn publish(&self) {
        if let Some(tx) = &self.frames_tx {
            let _ = tx.send(self.snapshot());
        }
    }
}

/// Await `call`, failing with `elapsed` after `limit`.
async fn bounded<T, E>(
    limit: Duration,
    call: impl Future<Output = Result<T, E>>,
    elapsed: E,
) -> Result<T, E> {
    tokio::time::timeout(limit, call)
        .await
        .unwrap_or(Err(elapsed))
}
