//! The messaging boundary between a restricted context and the one allowed to
//! make network calls. Messages and replies are plain JSON values so either
//! side can live in another process.

use jobguard_core::{AnalysisError, AnalysisOutcome, FailureKind};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::relay::Analyzer;
use crate::wire::outcome_from_value;

const UNKNOWN_SOURCE: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum RelayMessage {
    #[serde(rename = "analyzeJob", rename_all = "camelCase")]
    AnalyzeJob {
        job_text: String,
        #[serde(default)]
        job_title: String,
        #[serde(default)]
        job_company: String,
        #[serde(default)]
        source: String,
    },
}

/// Reply shape: the verdict fields, or `{error, kind, status?}`.
pub fn outcome_to_json(outcome: &AnalysisOutcome) -> Value {
    match outcome {
        Ok(result) => json!({
            "prediction": result.prediction.as_str(),
            "confidence": result.confidence,
            "reasoning": result.reasoning,
            "red_flags": result.red_flags,
        }),
        Err(err) => {
            let (kind, status) = match err.kind {
                FailureKind::Transport => ("transport", None),
                FailureKind::HttpStatus(code) => ("http_status", Some(code)),
                FailureKind::MalformedResponse => ("malformed_response", None),
                FailureKind::Service => ("service", None),
                FailureKind::InsufficientText => ("insufficient_text", None),
                FailureKind::InvalidInput => ("invalid_input", None),
            };
            let mut reply = json!({ "error": err.message, "kind": kind });
            if let Some(code) = status {
                reply["status"] = json!(code);
            }
            reply
        }
    }
}

/// Inverse of [`outcome_to_json`]; error replies without a known kind are
/// service errors.
pub fn json_to_outcome(value: &Value) -> AnalysisOutcome {
    let Some(message) = value.get("error").and_then(Value::as_str) else {
        return outcome_from_value(value);
    };
    let kind = match value.get("kind").and_then(Value::as_str) {
        Some("transport") => FailureKind::Transport,
        Some("http_status") => value
            .get("status")
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok())
            .map(FailureKind::HttpStatus)
            .unwrap_or(FailureKind::Service),
        Some("malformed_response") => FailureKind::MalformedResponse,
        Some("insufficient_text") => FailureKind::InsufficientText,
        Some("invalid_input") => FailureKind::InvalidInput,
        _ => FailureKind::Service,
    };
    Err(AnalysisError::new(kind, message))
}

/// Privileged side: decodes messages, runs the analysis, encodes the reply.
#[derive(Debug)]
pub struct MessageRelay<A> {
    analyzer: A,
}

impl<A: Analyzer> MessageRelay<A> {
    pub fn new(analyzer: A) -> Self {
        Self { analyzer }
    }

    pub async fn handle(&self, message: &Value) -> Value {
        let message = match serde_json::from_value::<RelayMessage>(message.clone()) {
            Ok(message) => message,
            Err(err) => {
                jobguard_logging::guard_warn!("rejected relay message: {err}");
                return outcome_to_json(&Err(AnalysisError::new(
                    FailureKind::InvalidInput,
                    format!("Unsupported message: {err}"),
                )));
            }
        };

        let RelayMessage::AnalyzeJob {
            job_text,
            job_title,
            job_company,
            source,
        } = message;
        if job_text.trim().is_empty() {
            return outcome_to_json(&Err(AnalysisError::new(
                FailureKind::InvalidInput,
                "No job text provided",
            )));
        }
        jobguard_logging::guard_debug!(
            "relaying analysis for {job_title:?} at {job_company:?} ({} chars)",
            job_text.chars().count()
        );
        let source = if source.trim().is_empty() {
            UNKNOWN_SOURCE
        } else {
            source.as_str()
        };
        outcome_to_json(
            &self
                .analyzer
                .analyze_job(&job_text, &job_title, &job_company, source)
                .await,
        )
    }
}

/// Restricted side: an [`Analyzer`] whose calls cross the message boundary.
#[derive(Debug)]
pub struct RelayedAnalyzer<A> {
    relay: MessageRelay<A>,
}

impl<A: Analyzer> RelayedAnalyzer<A> {
    pub fn new(relay: MessageRelay<A>) -> Self {
        Self { relay }
    }
}

#[async_trait::async_trait]
impl<A: Analyzer> Analyzer for RelayedAnalyzer<A> {
    async fn analyze(&self, text: &str, source: &str) -> AnalysisOutcome {
        self.analyze_job(text, "", "", source).await
    }

    async fn analyze_job(
        &self,
        text: &str,
        title: &str,
        company: &str,
        source: &str,
    ) -> AnalysisOutcome {
        let message = RelayMessage::AnalyzeJob {
            job_text: text.to_string(),
            job_title: title.to_string(),
            job_company: company.to_string(),
            source: source.to_string(),
        };
        let message = serde_json::to_value(&message)
            .map_err(|err| AnalysisError::new(FailureKind::InvalidInput, err.to_string()))?;
        let reply = self.relay.handle(&message).await;
        json_to_outcome(&reply)
    }
}
