use std::fmt;

use jobguard_core::{AnalysisOutcome, RequestId};

/// Reported by [`crate::RelayHandle`] when an analysis finishes either way.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayEvent {
    Completed {
        request_id: RequestId,
        result: AnalysisOutcome,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    /// Where the page ended up after redirects.
    pub final_url: String,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FetchFailure,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FetchFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Network,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::InvalidUrl => write!(f, "invalid url"),
            FetchFailure::HttpStatus(code) => write!(f, "http status {code}"),
            FetchFailure::Timeout => write!(f, "timeout"),
            FetchFailure::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FetchFailure::TooLarge { max_bytes, actual } => {
                write!(f, "page too large (max {max_bytes}, actual {actual:?})")
            }
            FetchFailure::UnsupportedContentType { content_type } => {
                write!(f, "not an html page ({content_type})")
            }
            FetchFailure::Network => write!(f, "network error"),
        }
    }
}
