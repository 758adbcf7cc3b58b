use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prediction {
    Fake,
    Real,
}

impl Prediction {
    pub fn as_str(self) -> &'static str {
        match self {
            Prediction::Fake => "fake",
            Prediction::Real => "real",
        }
    }
}

/// Verdict returned by the analysis service. Never computed locally.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub prediction: Prediction,
    /// Always within `0.0..=1.0`.
    pub confidence: f64,
    pub reasoning: String,
    pub red_flags: Vec<String>,
}

pub type AnalysisOutcome = Result<AnalysisResult, AnalysisError>;

/// The `{error: message}` side of an analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisError {
    pub kind: FailureKind,
    pub message: String,
}

impl AnalysisError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Network or status failures, where the local server is the likely cause.
    pub fn is_transport(&self) -> bool {
        matches!(
            self.kind,
            FailureKind::Transport | FailureKind::HttpStatus(_) | FailureKind::MalformedResponse
        )
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl std::error::Error for AnalysisError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Connection refused, DNS, reset and similar.
    Transport,
    HttpStatus(u16),
    /// Reachable service, unexpected body.
    MalformedResponse,
    /// The service answered with an `error` field.
    Service,
    /// Not enough text could be extracted from the page.
    InsufficientText,
    /// Manual input rejected before any request.
    InvalidInput,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transport => write!(f, "transport failure"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::Service => write!(f, "service error"),
            FailureKind::InsufficientText => write!(f, "insufficient text"),
            FailureKind::InvalidInput => write!(f, "invalid input"),
        }
    }
}
