use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The two request intents understood by the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Generate,
    Compare,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Generate => "generate",
            Mode::Compare => "compare",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generate" => Ok(Mode::Generate),
            "compare" => Ok(Mode::Compare),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

/// Wire shape of `POST /api/productivity`. Fields stay untyped so the handler
/// can answer any falsy value (`null`, `false`, `0`, `""`) with its own
/// envelope instead of a deserialization failure.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProductivityRequest {
    #[serde(default)]
    pub industry: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub mode: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct GenerateResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub improvements: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub daily_plan: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub growth_tips: Vec<String>,
}

impl GenerateResult {
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.improvements.is_empty()
            && self.daily_plan.is_empty()
            && self.growth_tips.is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Activity {
    pub title: String,
    pub hours: String,
}

impl Activity {
    pub fn new(title: impl Into<String>, hours: impl Into<String>) -> Self {
        Self { title: title.into(), hours: hours.into() }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CompareResult {
    pub activities: Vec<Activity>,
}

/// Normalized model output for either mode.
///
/// Untagged on the wire; `Compare` is tried first because it is the only
/// variant with a required field.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ProductivityData {
    Compare(CompareResult),
    Generate(GenerateResult),
}

impl ProductivityData {
    pub fn mode(&self) -> Mode {
        match self {
            ProductivityData::Generate(_) => Mode::Generate,
            ProductivityData::Compare(_) => Mode::Compare,
        }
    }
}

/// Uniform response wrapper returned by the endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ProductivityData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Envelope {
    pub fn ok(data: ProductivityData) -> Self {
        Self { success: true, data: Some(data), message: None }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { success: false, data: None, message: Some(message.into()) }
    }
}
