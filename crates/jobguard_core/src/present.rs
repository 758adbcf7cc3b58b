//! Pure rendering of analysis states into overlay panels.
//!
//! Nothing here decides anything beyond presentation: the verdict comes from
//! the service, the panel only picks wording and tone.

use crate::limits::{LEGITIMATE_CONFIDENCE, MIN_MANUAL_TEXT};
use crate::{AnalysisError, AnalysisResult, JobRecord, Prediction};

pub const LOADING_MESSAGE: &str =
    "Analyzing job posting... the analysis server can take 1-2 minutes to respond.";

pub const SERVER_GUIDANCE: &str =
    "Ensure the local analysis server is running, then try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Legitimate,
    Scam,
    Caution,
}

impl Tone {
    pub fn headline(self) -> &'static str {
        match self {
            Tone::Legitimate => "Likely legitimate",
            Tone::Scam => "Likely scam",
            Tone::Caution => "Suspicious - proceed with caution",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictPanel {
    pub tone: Tone,
    pub headline: String,
    /// Rounded `confidence * 100`.
    pub confidence_percent: u8,
    pub reasoning: String,
    pub red_flags: Vec<String>,
    /// `"<title> at <company>"` when the record has structured fields.
    pub job_line: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel {
    Loading {
        message: String,
    },
    Verdict(VerdictPanel),
    Error {
        message: String,
        guidance: Option<String>,
        offer_manual_entry: bool,
    },
    ManualEntry {
        hint: String,
        error: Option<String>,
    },
}

pub fn tone_for(result: &AnalysisResult) -> Tone {
    if result.prediction == Prediction::Fake {
        Tone::Scam
    } else if result.confidence > LEGITIMATE_CONFIDENCE {
        Tone::Legitimate
    } else {
        Tone::Caution
    }
}

pub fn loading_panel() -> Panel {
    Panel::Loading {
        message: LOADING_MESSAGE.to_string(),
    }
}

pub fn result_panel(result: &AnalysisResult, record: Option<&JobRecord>) -> Panel {
    let tone = tone_for(result);
    let confidence_percent = (result.confidence.clamp(0.0, 1.0) * 100.0).round() as u8;
    Panel::Verdict(VerdictPanel {
        tone,
        headline: tone.headline().to_string(),
        confidence_percent,
        reasoning: result.reasoning.trim().to_string(),
        red_flags: result.red_flags.clone(),
        job_line: record.and_then(job_line),
    })
}

pub fn error_panel(error: &AnalysisError) -> Panel {
    let guidance = error.is_transport().then(|| SERVER_GUIDANCE.to_string());
    Panel::Error {
        message: error.message.clone(),
        guidance,
        offer_manual_entry: matches!(error.kind, crate::FailureKind::InsufficientText),
    }
}

pub fn manual_entry_panel(error: Option<String>) -> Panel {
    Panel::ManualEntry {
        hint: format!(
            "Paste the job posting text (at least {MIN_MANUAL_TEXT} characters) to analyze it."
        ),
        error,
    }
}

fn job_line(record: &JobRecord) -> Option<String> {
    match (record.title().is_empty(), record.company().is_empty()) {
        (true, true) => None,
        (false, true) => Some(record.title().to_string()),
        (true, false) => Some(record.company().to_string()),
        (false, false) => Some(format!("{} at {}", record.title(), record.company())),
    }
}
