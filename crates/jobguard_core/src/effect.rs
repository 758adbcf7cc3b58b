use crate::{OverlayKind, Panel, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the page extractor on the current document.
    ExtractPage { url: String },
    /// Start feeding listing cards from the current document.
    WatchListing { url: String },
    SendAnalysis(AnalysisRequest),
    /// Insert `panel` at `kind`, replacing any previous instance.
    ShowOverlay { kind: OverlayKind, panel: Panel },
    RemoveOverlay(OverlayKind),
}

/// Payload of one relay call; mirrors the `analyzeJob` message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub request_id: RequestId,
    pub text: String,
    pub title: String,
    pub company: String,
    pub source: String,
}
