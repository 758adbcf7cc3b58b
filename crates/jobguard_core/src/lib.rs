//! jobguard core: job records, the per-page session state machine and the
//! presenter. Pure code; all IO lives in `jobguard_engine` and the host.
mod dedup;
mod effect;
pub mod limits;
mod msg;
mod overlay;
mod present;
mod record;
mod state;
mod update;
mod verdict;
mod view_model;

pub use dedup::{dedup_key, DedupTracker};
pub use effect::{AnalysisRequest, Effect};
pub use msg::Msg;
pub use overlay::{Overlay, OverlayKind, OverlaySlots};
pub use present::{
    error_panel, loading_panel, manual_entry_panel, result_panel, tone_for, Panel, Tone,
    VerdictPanel, LOADING_MESSAGE, SERVER_GUIDANCE,
};
pub use record::{JobFields, JobRecord};
pub use state::{AutoPhase, Origin, PageKind, PageSession, RequestId};
pub use update::{update, MANUAL_SOURCE};
pub use verdict::{AnalysisError, AnalysisOutcome, AnalysisResult, FailureKind, Prediction};
pub use view_model::{OverlayView, SessionView};
