use crate::{AutoPhase, OverlayKind, Panel};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionView {
    pub current_url: Option<String>,
    pub phase: AutoPhase,
    pub analyzing: bool,
    pub analyzed_count: usize,
    pub in_flight: usize,
    pub overlays: Vec<OverlayView>,
}

impl SessionView {
    pub fn overlay(&self, kind: OverlayKind) -> Option<&OverlayView> {
        self.overlays.iter().find(|overlay| overlay.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayView {
    pub kind: OverlayKind,
    pub element_id: &'static str,
    pub panel: Panel,
}
