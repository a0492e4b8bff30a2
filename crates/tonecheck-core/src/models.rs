//! Core data models shared by the API client and the history store.
//!
//! The response types are only ever constructed by [`crate::schema`], which
//! checks the decoded JSON before any of these values reach the rest of
//! the application.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default sampling temperature sent to the analysis service.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
/// Lowest accepted temperature.
pub const MIN_TEMPERATURE: f64 = 0.0;
/// Highest accepted temperature.
pub const MAX_TEMPERATURE: f64 = 2.0;
/// Maximum input length, in characters.
pub const TEXT_MAX_LENGTH: usize = 5000;
/// Accepted number of suggestions in an analysis response.
pub const MIN_SUGGESTIONS: usize = 2;
pub const MAX_SUGGESTIONS: usize = 3;

/// Categorical sentiment label attached to an analyzed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Neutral,
    Negative,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Positive => "positive",
            Tone::Neutral => "neutral",
            Tone::Negative => "negative",
        }
    }

    /// Parse one of the three wire literals. Matching is exact.
    pub fn from_literal(s: &str) -> Option<Self> {
        match s {
            "positive" => Some(Tone::Positive),
            "neutral" => Some(Tone::Neutral),
            "negative" => Some(Tone::Negative),
            _ => None,
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated response of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub suggestions: Vec<String>,
    pub tone: Tone,
    pub alternative_text: String,
}

/// Validated response of `POST /generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub generated_text: String,
}

/// Body of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzeRequest {
    pub text: String,
    pub temperature: f64,
}

/// Body of `POST /generate`.
///
/// `selected_suggestions[i]` marks whether `suggestions[i]` should be
/// applied. The service does the filtering; the client sends the full
/// alignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest {
    pub text: String,
    pub suggestions: Vec<String>,
    pub selected_suggestions: Vec<bool>,
    pub temperature: f64,
}

/// One persisted analysis, as stored in the history collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedEntry {
    pub id: String,
    /// The original input text.
    pub text: String,
    pub result: AnalysisResult,
    /// Epoch milliseconds at save time.
    pub timestamp: i64,
}
