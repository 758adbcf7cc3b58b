use std::collections::BTreeMap;

use crate::present::Panel;
use crate::RequestId;

/// Injection points; at most one of each is present at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OverlayKind {
    Loading,
    Results,
    ManualInput,
    CardPanel,
}

impl OverlayKind {
    /// Stable element identifier of the overlay.
    pub fn element_id(self) -> &'static str {
        match self {
            OverlayKind::Loading => "jobguard-loading",
            OverlayKind::Results => "jobguard-results",
            OverlayKind::ManualInput => "jobguard-manual-input",
            OverlayKind::CardPanel => "jobguard-card-panel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub panel: Panel,
    /// Request whose response is expected to land in this overlay.
    pub owner: Option<RequestId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverlaySlots {
    slots: BTreeMap<OverlayKind, Overlay>,
}

impl OverlaySlots {
    /// Replace whatever occupies `kind`.
    pub fn show(&mut self, kind: OverlayKind, panel: Panel, owner: Option<RequestId>) {
        self.slots.insert(kind, Overlay { panel, owner });
    }

    pub fn remove(&mut self, kind: OverlayKind) -> Option<Overlay> {
        self.slots.remove(&kind)
    }

    pub fn get(&self, kind: OverlayKind) -> Option<&Overlay> {
        self.slots.get(&kind)
    }

    /// True when `kind` is present and still waiting for `request_id`.
    pub fn is_owned_by(&self, kind: OverlayKind, request_id: RequestId) -> bool {
        self.slots
            .get(&kind)
            .is_some_and(|overlay| overlay.owner == Some(request_id))
    }

    pub fn kinds(&self) -> Vec<OverlayKind> {
        self.slots.keys().copied().collect()
    }
}
