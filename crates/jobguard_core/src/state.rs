use std::collections::BTreeMap;

use crate::dedup::{dedup_key, DedupTracker};
use crate::limits::MAX_ANALYSIS_CHARS;
use crate::overlay::OverlaySlots;
use crate::view_model::{OverlayView, SessionView};
use crate::{JobRecord, OverlayKind};

pub type RequestId = u64;

/// What the classifier made of the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageKind {
    Detail,
    Listing,
    #[default]
    Unknown,
}

/// Progress of the automatic (detail page) analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoPhase {
    #[default]
    Idle,
    Extracting,
    Waiting,
    ShowingResult,
}

/// Who asked for an analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Page { url: String },
    Card { card_id: String },
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingAnalysis {
    pub(crate) origin: Origin,
    /// Overlay the response is rendered into.
    pub(crate) anchor: OverlayKind,
    pub(crate) record: JobRecord,
}

/// Per-page-context state: dedup set, in-flight guard and overlays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSession {
    current_url: Option<String>,
    dedup: DedupTracker,
    is_analyzing: bool,
    phase: AutoPhase,
    pending: BTreeMap<RequestId, PendingAnalysis>,
    next_request_id: RequestId,
    pub(crate) overlays: OverlaySlots,
    /// Upper bound on characters of manually entered text sent for analysis.
    max_chars: usize,
}

impl Default for PageSession {
    fn default() -> Self {
        Self {
            current_url: None,
            dedup: DedupTracker::default(),
            is_analyzing: false,
            phase: AutoPhase::Idle,
            pending: BTreeMap::new(),
            next_request_id: 1,
            overlays: OverlaySlots::default(),
            max_chars: MAX_ANALYSIS_CHARS,
        }
    }
}

impl PageSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(max_chars: usize) -> Self {
        Self {
            max_chars,
            ..Self::default()
        }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            current_url: self.current_url.clone(),
            phase: self.phase,
            analyzing: self.is_analyzing,
            analyzed_count: self.dedup.len(),
            in_flight: self.pending.len(),
            overlays: self
                .overlays
                .kinds()
                .into_iter()
                .filter_map(|kind| {
                    self.overlays.get(kind).map(|overlay| OverlayView {
                        kind,
                        element_id: kind.element_id(),
                        panel: overlay.panel.clone(),
                    })
                })
                .collect(),
        }
    }

    pub fn dedup(&self) -> &DedupTracker {
        &self.dedup
    }

    pub fn is_analyzing(&self) -> bool {
        self.is_analyzing
    }

    pub fn phase(&self) -> AutoPhase {
        self.phase
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub(crate) fn is_current_url(&self, url: &str) -> bool {
        self.current_url
            .as_deref()
            .is_some_and(|current| dedup_key(current) == dedup_key(url))
    }

    pub(crate) fn set_current_url(&mut self, url: &str) {
        self.current_url = Some(url.trim().to_string());
    }

    pub(crate) fn dedup_mut(&mut self) -> &mut DedupTracker {
        &mut self.dedup
    }

    pub(crate) fn begin_auto(&mut self) {
        self.is_analyzing = true;
        self.phase = AutoPhase::Extracting;
    }

    pub(crate) fn set_phase(&mut self, phase: AutoPhase) {
        self.phase = phase;
    }

    pub(crate) fn finish_auto(&mut self, phase: AutoPhase) {
        self.is_analyzing = false;
        self.phase = phase;
    }

    pub(crate) fn register(&mut self, pending: PendingAnalysis) -> RequestId {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.pending.insert(request_id, pending);
        request_id
    }

    pub(crate) fn take_pending(&mut self, request_id: RequestId) -> Option<PendingAnalysis> {
        self.pending.remove(&request_id)
    }

    /// Drop everything except the request counter and the text limit, so
    /// late responses from the previous context can never match a new request.
    pub(crate) fn reset(&mut self) {
        *self = Self {
            next_request_id: self.next_request_id,
            max_chars: self.max_chars,
            ..Self::default()
        };
    }
}
