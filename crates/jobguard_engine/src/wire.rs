//! JSON shapes exchanged with the analysis service and their normalisation
//! into [`AnalysisOutcome`] values.

use jobguard_core::{AnalysisError, AnalysisOutcome, AnalysisResult, FailureKind, Prediction};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MALFORMED_MESSAGE: &str = "Invalid response from analysis server";

/// Confidence given to a plain-text `Real` or `Fake` verdict.
const TEXT_VERDICT_CONFIDENCE: f64 = 0.9;
/// Confidence given to an `Uncertain` verdict, shown as a caution.
const UNCERTAIN_CONFIDENCE: f64 = 0.5;

static VERDICT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^\s*verdict:\s*(real|fake|uncertain)\b").expect("Failed to compile verdict regex")
});
static MARKUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*|__|</?[^>]+>").expect("Failed to compile markup regex"));
static SPACES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]+").expect("Failed to compile spacing regex"));

/// Body of `POST /analyze`.
#[derive(Debug, Serialize)]
pub struct AnalyzeBody<'a> {
    pub job_text: &'a str,
    pub source: &'a str,
}

/// Body of `POST /check_job`; older servers read `text`.
#[derive(Debug, Serialize)]
pub struct CheckJobBody<'a> {
    pub text: &'a str,
    pub job_text: &'a str,
    pub source: &'a str,
}

/// Union of every reply shape the service has used.
#[derive(Debug, Default, Deserialize)]
struct WireReply {
    prediction: Option<String>,
    confidence: Option<f64>,
    reasoning: Option<String>,
    red_flags: Option<Vec<String>>,
    error: Option<String>,
    output: Option<String>,
}

/// Normalises an HTTP reply. Non-success statuses win over any body.
pub fn decode_reply(status: u16, body: &[u8]) -> AnalysisOutcome {
    if !(200..300).contains(&status) {
        jobguard_logging::guard_warn!(
            "analysis server answered {status}: {}",
            String::from_utf8_lossy(&body[..body.len().min(200)])
        );
        return Err(AnalysisError::new(
            FailureKind::HttpStatus(status),
            format!("Server error: {status}"),
        ));
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(value) => outcome_from_value(&value),
        Err(err) => {
            jobguard_logging::guard_warn!("analysis reply is not json: {err}");
            Err(malformed())
        }
    }
}

/// Interprets a decoded reply: `{error}`, the structured verdict, or legacy `{output}`.
pub fn outcome_from_value(value: &Value) -> AnalysisOutcome {
    if !value.is_object() {
        return Err(malformed());
    }
    let reply: WireReply = serde_json::from_value(value.clone()).map_err(|err| {
        jobguard_logging::guard_warn!("analysis reply has unexpected shape: {err}");
        malformed()
    })?;

    if let Some(message) = reply.error {
        return Err(AnalysisError::new(FailureKind::Service, message));
    }
    if let Some(prediction) = reply.prediction.as_deref() {
        let prediction = parse_prediction(prediction).ok_or_else(malformed)?;
        let confidence = reply
            .confidence
            .filter(|c| c.is_finite())
            .ok_or_else(malformed)?
            .clamp(0.0, 1.0);
        return Ok(AnalysisResult {
            prediction,
            confidence,
            reasoning: reply.reasoning.unwrap_or_default(),
            red_flags: reply.red_flags.unwrap_or_default(),
        });
    }
    if let Some(output) = reply.output.as_deref() {
        return Ok(parse_verdict_text(output));
    }
    Err(malformed())
}

fn parse_prediction(raw: &str) -> Option<Prediction> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "fake" => Some(Prediction::Fake),
        "real" => Some(Prediction::Real),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextVerdict {
    Real,
    Fake,
    Uncertain,
}

/// Reads `Verdict: Real|Fake|Uncertain` output with a `Reasons:` bullet list.
///
/// Tolerates bold/underline markers and simple HTML tags; without a verdict
/// line it falls back to whichever of "fake"/"real" appears alone.
pub fn parse_verdict_text(output: &str) -> AnalysisResult {
    let cleaned = MARKUP_RE.replace_all(output.trim(), "");
    let cleaned = SPACES_RE.replace_all(&cleaned, " ").into_owned();

    let verdict = match VERDICT_RE.captures(&cleaned) {
        Some(caps) => match caps[1].to_ascii_lowercase().as_str() {
            "real" => TextVerdict::Real,
            "fake" => TextVerdict::Fake,
            _ => TextVerdict::Uncertain,
        },
        None => {
            let lower = cleaned.to_lowercase();
            match (lower.contains("fake"), lower.contains("real")) {
                (true, false) => TextVerdict::Fake,
                (false, true) => TextVerdict::Real,
                _ => TextVerdict::Uncertain,
            }
        }
    };

    let (prediction, confidence) = match verdict {
        TextVerdict::Real => (Prediction::Real, TEXT_VERDICT_CONFIDENCE),
        TextVerdict::Fake => (Prediction::Fake, TEXT_VERDICT_CONFIDENCE),
        TextVerdict::Uncertain => (Prediction::Real, UNCERTAIN_CONFIDENCE),
    };

    AnalysisResult {
        prediction,
        confidence,
        reasoning: cleaned.trim().to_string(),
        red_flags: reasons(&cleaned),
    }
}

fn reasons(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .skip_while(|line| !line.to_ascii_lowercase().starts_with("reasons:"))
        .skip(1)
        .filter_map(|line| line.strip_prefix(&['-', '*', '•'][..]))
        .map(|reason| reason.trim().to_string())
        .filter(|reason| !reason.is_empty())
        .collect()
}

fn malformed() -> AnalysisError {
    AnalysisError::new(FailureKind::MalformedResponse, MALFORMED_MESSAGE)
}
