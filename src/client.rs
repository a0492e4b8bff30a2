//! HTTP client for the external analysis service.
//!
//! Wraps the two remote operations (`POST /analyze`, `POST /generate`) and
//! the liveness probe (`GET /health`). Every response body passes through
//! [`tonecheck_core::schema`] before it is returned, and every transport
//! problem is turned into a structured [`ApiFailure`].
//!
//! # Failure Mapping
//!
//! | Condition | Result |
//! |-----------|--------|
//! | Timeout (connect or body) | `ApiFailure { kind: Timeout }` |
//! | Connection refused, DNS, reset | `ApiFailure { kind: Network }` |
//! | HTTP 503 | `ApiFailure { kind: ServiceUnavailable }` |
//! | HTTP 422 | `ApiFailure { kind: ValidationRejected }` |
//! | Any other non-2xx | `ApiFailure { kind: HttpStatus(n) }` |
//! | 2xx with a malformed body | `ClientError::Schema` |
//! | Caller input out of bounds | `ClientError::InvalidRequest` (nothing sent) |
//!
//! The client never retries and never drops or deduplicates a request.
//! Retrying is the caller's decision.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use tonecheck_core::error::{ApiFailure, ClientError, SchemaViolation};
use tonecheck_core::models::{AnalysisResult, GenerationResult};
use tonecheck_core::schema;

use crate::config::ApiConfig;

pub const API_ANALYZE: &str = "/analyze";
pub const API_GENERATE: &str = "/generate";
pub const API_HEALTH_CHECK: &str = "/health";

/// Client for the analysis/generation API.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for `base_url` with a per-request `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> anyhow::Result<Self> {
        let client = Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))?;
        debug!(base_url = %client.base_url, timeout_secs = config.timeout_secs, "API client initialized");
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Analyze `text` and return its tone, suggestions, and an alternative
    /// phrasing.
    pub async fn analyze(
        &self,
        text: &str,
        temperature: f64,
    ) -> Result<AnalysisResult, ClientError> {
        let body = schema::validate_analyze_request(text, temperature)
            .map_err(ClientError::InvalidRequest)?;
        let value = self.post_json(API_ANALYZE, &body).await?;
        let result = schema::validate_analyze_response(&value).map_err(|e| {
            warn!(endpoint = API_ANALYZE, error = %e, "response failed validation");
            ClientError::Schema(e)
        })?;
        debug!(tone = %result.tone, suggestions = result.suggestions.len(), "analysis received");
        Ok(result)
    }

    /// Regenerate `text` applying the suggestions flagged in `selected`.
    ///
    /// `selected` must have exactly one flag per suggestion; a mismatch is
    /// rejected before anything is sent. The full alignment is sent and
    /// the service applies the filter.
    pub async fn generate(
        &self,
        text: &str,
        suggestions: &[String],
        selected: &[bool],
        temperature: f64,
    ) -> Result<GenerationResult, ClientError> {
        let body = schema::build_generate_request(text, suggestions, selected, temperature)
            .map_err(ClientError::InvalidRequest)?;
        let value = self.post_json(API_GENERATE, &body).await?;
        schema::validate_generate_response(&value).map_err(|e| {
            warn!(endpoint = API_GENERATE, error = %e, "response failed validation");
            ClientError::Schema(e)
        })
    }

    /// Liveness probe. `Ok(true)` when the service answers 2xx.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let url = self.url(API_HEALTH_CHECK);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(transport_failure)?;
        Ok(response.status().is_success())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, ClientError> {
        let url = self.url(path);
        debug!(%url, "sending request");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                let failure = transport_failure(e);
                warn!(%url, error = %failure, "request failed");
                failure
            })?;

        let status = response.status();

        if !status.is_success() {
            // An unreadable body only loses the detail, never the status.
            let detail = response
                .text()
                .await
                .ok()
                .and_then(|body| extract_detail(&body));
            let failure = ApiFailure::from_status(status.as_u16(), detail);
            warn!(%url, status = status.as_u16(), error = %failure, "API returned an error status");
            return Err(failure.into());
        }

        let text = response.text().await.map_err(transport_failure)?;
        serde_json::from_str(&text).map_err(|e| {
            ClientError::Schema(SchemaViolation::new(
                "$",
                format!("response body is not valid JSON: {}", e),
            ))
        })
    }
}

fn transport_failure(e: reqwest::Error) -> ApiFailure {
    if e.is_timeout() {
        ApiFailure::timeout()
    } else {
        ApiFailure::network(e.to_string())
    }
}

/// Pull a human-readable message out of an error response body.
///
/// Understands `{"detail": "..."}`, the list form
/// `{"detail": [{"msg": "..."}, ...]}`, and `{"message": "..."}`.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    match value.get("detail") {
        Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.trim().to_string()),
        Some(Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if !msgs.is_empty() {
                return Some(msgs.join("; "));
            }
        }
        _ => {}
    }

    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
