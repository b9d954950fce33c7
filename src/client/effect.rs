use crate::models::Mode;

use super::ClientSnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SendRequest {
        request_id: u64,
        mode: Mode,
        industry: String,
        description: String,
    },
    /// Overwrite the stored record with the full snapshot.
    Persist(ClientSnapshot),
    /// Remove the stored record entirely.
    ClearPersisted,
    /// Reveal the narrative one character at a time.
    StartTyping(String),
    /// Show the narrative at once (restored state).
    ShowNarrative(String),
    /// Stop any running animation and blank the narrative.
    CancelTyping,
}
