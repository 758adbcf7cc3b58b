use crate::{AnalysisOutcome, JobRecord, OverlayKind, PageKind, RequestId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The host finished loading (or soft-navigated to) a page.
    PageLoaded {
        url: String,
        kind: PageKind,
        /// Unknown pages with enough visible text get a manual-entry offer.
        offers_manual_entry: bool,
    },
    /// Extraction requested by `Effect::ExtractPage` finished.
    PageExtracted {
        url: String,
        source: String,
        record: JobRecord,
    },
    /// User asked to analyze one listing card.
    CardAnalyzeRequested {
        card_id: String,
        source: String,
        record: JobRecord,
    },
    /// User opened the manual-entry panel.
    ManualEntryRequested,
    /// User submitted free-form text from the manual-entry panel.
    ManualTextSubmitted { text: String, url: String },
    /// The relay answered a `SendAnalysis` effect.
    AnalysisCompleted {
        request_id: RequestId,
        result: AnalysisOutcome,
    },
    /// User closed an overlay.
    OverlayDismissed(OverlayKind),
    /// New tab context or extension reload.
    ContextReset,
    NoOp,
}
