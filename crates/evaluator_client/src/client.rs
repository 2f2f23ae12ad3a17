//! Evaluator HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required). One POST per
//! evaluation, no retries.

use std::time::Duration;

use dss_model::{DecisionDocument, EvaluationResult};
use thiserror::Error;

/// Shown for every transport failure; the underlying cause goes to the log.
pub const TRANSPORT_MESSAGE: &str = "cannot reach the evaluation backend";

/// Used when a failure response carries no usable message.
pub const UNKNOWN_REMOTE_MESSAGE: &str = "unknown evaluation error";

/// Anything that can turn a decision document into a result.
///
/// The workflow only talks to this trait; tests substitute fakes.
pub trait Evaluator {
    fn evaluate(&self, document: &DecisionDocument) -> Result<EvaluationResult, EvaluatorError>;
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluatorError {
    /// No response at all: refused, DNS, timeout, TLS.
    #[error("{}", TRANSPORT_MESSAGE)]
    Transport { detail: String },

    /// The evaluator answered with a non-success status.
    #[error("{message}")]
    Remote { status: u16, message: String },

    /// Success status, but the body is not a result document.
    #[error("invalid response from evaluator: {0}")]
    Parse(String),
}

impl EvaluatorError {
    pub fn status(&self) -> Option<u16> {
        match self {
            EvaluatorError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Where and how to reach the evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatorConfig {
    pub base_url: String,
    pub endpoint_path: String,
    pub health_path: String,
    pub timeout: Duration,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            endpoint_path: "/api/dss/evaluar".to_string(),
            health_path: "/api/health".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl EvaluatorConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }

    pub fn endpoint_url(&self) -> String {
        join(&self.base_url, &self.endpoint_path)
    }

    pub fn health_url(&self) -> String {
        join(&self.base_url, &self.health_path)
    }
}

/// Remote evaluator client (blocking).
#[derive(Clone)]
pub struct EvaluatorClient {
    http: reqwest::blocking::Client,
    endpoint_url: String,
    health_url: String,
}

impl EvaluatorClient {
    pub fn new(config: &EvaluatorConfig) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("dss/{}", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            endpoint_url: config.endpoint_url(),
            health_url: config.health_url(),
        }
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// POST the document, return the parsed result.
    pub fn evaluate(&self, document: &DecisionDocument) -> Result<EvaluationResult, EvaluatorError> {
        tracing::info!(url = %self.endpoint_url, mode = document.mode(), "sending evaluation request");

        let response = self.http.post(&self.endpoint_url)
            .json(document)
            .send()
            .map_err(transport_error)?;
        let response = check_status(response)?;

        // A body cut short is a transport failure, not a bad document
        let body = response.text().map_err(transport_error)?;
        let result: EvaluationResult =
            serde_json::from_str(&body).map_err(|e| EvaluatorError::Parse(e.to_string()))?;

        tracing::info!(
            ranking = result.ranking.len(),
            winner = result.winner().unwrap_or("-"),
            "evaluation received"
        );
        Ok(result)
    }

    /// GET the health endpoint, return its body text.
    pub fn health(&self) -> Result<String, EvaluatorError> {
        tracing::debug!(url = %self.health_url, "health check");

        let response = self.http.get(&self.health_url)
            .send()
            .map_err(transport_error)?;
        let response = check_status(response)?;

        response
            .text()
            .map(|body| body.trim().to_string())
            .map_err(transport_error)
    }
}

impl Evaluator for EvaluatorClient {
    fn evaluate(&self, document: &DecisionDocument) -> Result<EvaluationResult, EvaluatorError> {
        EvaluatorClient::evaluate(self, document)
    }
}

// ── Internal helpers ────────────────────────────────────────────────

fn transport_error(e: reqwest::Error) -> EvaluatorError {
    tracing::warn!(error = %e, "evaluator unreachable");
    EvaluatorError::Transport { detail: e.to_string() }
}

fn check_status(
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, EvaluatorError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    let message = failure_message(&body);
    tracing::info!(status = status.as_u16(), message = %message, "evaluator rejected request");
    Err(EvaluatorError::Remote { status: status.as_u16(), message })
}

/// First non-empty of `mensaje`, `message`; otherwise the generic fallback.
fn failure_message(body: &str) -> String {
    let json: serde_json::Value = match serde_json::from_str(body) {
        Ok(json) => json,
        Err(_) => return UNKNOWN_REMOTE_MESSAGE.to_string(),
    };
    ["mensaje", "message"]
        .iter()
        .filter_map(|key| json[*key].as_str())
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .unwrap_or(UNKNOWN_REMOTE_MESSAGE)
        .to_string()
}

fn join(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
