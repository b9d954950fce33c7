use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::models::Mode;

use super::{
    update, ClientState, ClientViewModel, Effect, Frame, Msg, ProductivityBackend, StateStore, Typewriter,
};

/// A request the driver still has to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub request_id: u64,
    pub mode: Mode,
    pub industry: String,
    pub description: String,
}

/// Runs the client state machine against a backend, a store and the typing
/// animation.
pub struct Session {
    state: ClientState,
    store: Arc<dyn StateStore>,
    backend: Arc<dyn ProductivityBackend>,
    typewriter: Typewriter,
}

impl Session {
    /// Builds a session and replays any persisted snapshot. Must be called
    /// inside a tokio runtime.
    pub fn open(store: Arc<dyn StateStore>, backend: Arc<dyn ProductivityBackend>) -> Self {
        Self::with_typewriter(store, backend, Typewriter::new())
    }

    pub fn with_typewriter(
        store: Arc<dyn StateStore>,
        backend: Arc<dyn ProductivityBackend>,
        typewriter: Typewriter,
    ) -> Self {
        let mut session = Self { state: ClientState::new(), store, backend, typewriter };

        match session.store.load() {
            Ok(Some(snapshot)) => {
                info!("Restoring persisted client state");
                session.dispatch(Msg::Restore(snapshot));
            }
            Ok(None) => {}
            Err(err) => warn!("Ignoring unreadable persisted state: {err}"),
        }
        session
    }

    pub fn view(&self) -> ClientViewModel {
        self.state.view()
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    /// Narrative frames as they are typed.
    pub fn narrative(&self) -> watch::Receiver<Frame> {
        self.typewriter.subscribe()
    }

    pub fn typed_text(&self) -> String {
        self.typewriter.current().text
    }

    /// Applies `msg`, runs its local effects and returns requests to send.
    pub fn dispatch(&mut self, msg: Msg) -> Vec<PendingRequest> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        let mut pending = Vec::new();
        for effect in effects {
            match effect {
                Effect::SendRequest { request_id, mode, industry, description } => {
                    pending.push(PendingRequest { request_id, mode, industry, description });
                }
                Effect::Persist(snapshot) => {
                    if let Err(err) = self.store.save(&snapshot) {
                        warn!("Failed to persist client state: {err}");
                    }
                }
                Effect::ClearPersisted => {
                    if let Err(err) = self.store.clear() {
                        warn!("Failed to clear persisted client state: {err}");
                    }
                }
                Effect::StartTyping(text) => self.typewriter.start(text),
                Effect::ShowNarrative(text) => self.typewriter.show(text),
                Effect::CancelTyping => self.typewriter.clear(),
            }
        }
        pending
    }

    /// Sends one pending request and feeds the outcome back.
    pub async fn run_request(&mut self, request: PendingRequest) {
        let backend = Arc::clone(&self.backend);
        let outcome = backend.fetch(request.mode, &request.industry, &request.description).await;
        let msg = match outcome {
            Ok(data) => Msg::ResponseArrived { request_id: request.request_id, data },
            Err(err) => {
                warn!(mode = %request.mode, "Request failed: {err}");
                Msg::RequestFailed { request_id: request.request_id, message: err.user_message() }
            }
        };
        self.dispatch(msg);
    }

    /// Submits the current inputs in `mode` and waits for the answer.
    /// Does nothing when the inputs are incomplete or a request is in flight.
    pub async fn submit(&mut self, mode: Mode) {
        for request in self.dispatch(Msg::Submit(mode)) {
            self.run_request(request).await;
        }
    }

    pub fn set_industry(&mut self, value: impl Into<String>) {
        self.dispatch(Msg::IndustryChanged(value.into()));
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.dispatch(Msg::DescriptionChanged(value.into()));
    }

    /// Confirms and performs a clear.
    pub fn clear(&mut self) {
        self.dispatch(Msg::ClearRequested);
        self.dispatch(Msg::ClearConfirmed);
    }
}
