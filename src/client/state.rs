use serde::{Deserialize, Serialize};

use crate::models::{Mode, ProductivityData};

use super::render;
use super::view_model::{Body, ClientViewModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Displayed,
}

/// Everything that survives a reload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClientSnapshot {
    #[serde(default)]
    pub response: Option<ProductivityData>,
    #[serde(default)]
    pub mode: Option<Mode>,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientState {
    industry: String,
    description: String,
    mode: Option<Mode>,
    response: Option<ProductivityData>,
    in_flight: Option<u64>,
    next_request_id: u64,
    confirm_clear: bool,
    restored: bool,
    error: Option<String>,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match (self.in_flight, &self.response) {
            (Some(_), _) => Phase::Loading,
            (None, Some(_)) => Phase::Displayed,
            (None, None) => Phase::Idle,
        }
    }

    pub fn snapshot(&self) -> ClientSnapshot {
        ClientSnapshot {
            response: self.response.clone(),
            mode: self.mode,
            industry: self.industry.clone(),
            description: self.description.clone(),
        }
    }

    pub fn view(&self) -> ClientViewModel {
        let body = match (self.phase(), self.mode, &self.response) {
            (Phase::Loading, _, _) => Body::Loading,
            (_, Some(Mode::Generate), Some(ProductivityData::Generate(result))) => Body::Narrative {
                full_text: render::build_generate_text(result),
            },
            (_, Some(Mode::Compare), Some(ProductivityData::Compare(result))) if !result.activities.is_empty() => {
                Body::Workload {
                    heading: render::COMPARE_HEADING.to_string(),
                    total: render::COMPARE_TOTAL_LINE.to_string(),
                    rows: result.activities.iter().map(render::activity_row).collect(),
                }
            }
            _ => Body::Empty,
        };

        ClientViewModel {
            phase: self.phase(),
            mode: self.mode,
            industry: self.industry.clone(),
            description: self.description.clone(),
            error: self.error.clone(),
            confirm_clear: self.confirm_clear,
            restored: self.restored,
            body,
        }
    }

    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    pub(crate) fn can_submit(&self) -> bool {
        !self.industry.is_empty() && !self.description.is_empty() && self.in_flight.is_none()
    }

    pub(crate) fn set_industry(&mut self, value: String) -> bool {
        replace_if_changed(&mut self.industry, value)
    }

    pub(crate) fn set_description(&mut self, value: String) -> bool {
        replace_if_changed(&mut self.description, value)
    }

    /// Starts a request and returns its id.
    pub(crate) fn begin_request(&mut self, mode: Mode) -> u64 {
        self.next_request_id += 1;
        self.mode = Some(mode);
        self.response = None;
        self.error = None;
        self.restored = false;
        self.in_flight = Some(self.next_request_id);
        self.next_request_id
    }

    /// Accepts a response only for the request currently in flight.
    pub(crate) fn accept_response(&mut self, request_id: u64, data: ProductivityData) -> bool {
        if self.in_flight != Some(request_id) {
            return false;
        }
        self.in_flight = None;
        self.response = Some(data);
        true
    }

    pub(crate) fn fail_request(&mut self, request_id: u64, message: String) -> bool {
        if self.in_flight != Some(request_id) {
            return false;
        }
        self.in_flight = None;
        self.error = Some(message);
        true
    }

    pub(crate) fn set_confirm_clear(&mut self, pending: bool) {
        self.confirm_clear = pending;
    }

    pub(crate) fn confirm_clear_pending(&self) -> bool {
        self.confirm_clear
    }

    /// Resets to the empty state. Request ids keep counting so that a
    /// response for a request started before the clear is never accepted.
    pub(crate) fn reset(&mut self) {
        *self = Self { next_request_id: self.next_request_id, ..Self::default() };
    }

    pub(crate) fn restore(&mut self, snapshot: ClientSnapshot) {
        self.industry = snapshot.industry;
        self.description = snapshot.description;
        self.mode = snapshot.mode;
        self.response = snapshot.response;
        self.in_flight = None;
        self.error = None;
        self.restored = true;
    }

    pub(crate) fn clear_restored(&mut self) {
        self.restored = false;
    }

    pub(crate) fn narrative_text(&self) -> Option<String> {
        match (self.mode, &self.response) {
            (Some(Mode::Generate), Some(ProductivityData::Generate(result))) => {
                Some(render::build_generate_text(result))
            }
            _ => None,
        }
    }
}

fn replace_if_changed(slot: &mut String, value: String) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
