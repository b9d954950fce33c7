use crate::models::Mode;

use super::Phase;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Nothing to show; the panel renders its empty label.
    Empty,
    Loading,
    /// Full generate-mode text. The visible portion comes from the typewriter.
    Narrative { full_text: String },
    Workload {
        heading: String,
        total: String,
        rows: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientViewModel {
    pub phase: Phase,
    pub mode: Option<Mode>,
    pub industry: String,
    pub description: String,
    pub error: Option<String>,
    pub confirm_clear: bool,
    pub restored: bool,
    pub body: Body,
}
