use crate::models::{Mode, ProductivityData};

use super::ClientSnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the industry input.
    IndustryChanged(String),
    /// User edited the job description input.
    DescriptionChanged(String),
    /// User pressed "Make Me Productive" or "Compare".
    Submit(Mode),
    /// Backend answered the request with the given id.
    ResponseArrived { request_id: u64, data: ProductivityData },
    /// Backend call with the given id failed.
    RequestFailed { request_id: u64, message: String },
    /// User pressed Clear; asks for confirmation.
    ClearRequested,
    ClearCancelled,
    ClearConfirmed,
    /// Replay persisted state on startup.
    Restore(ClientSnapshot),
}
