use jobguard_logging::{guard_debug, guard_info, guard_warn};

use crate::limits::{MIN_CARD_TEXT, MIN_MANUAL_TEXT, MIN_PAGE_TEXT};
use crate::present::{error_panel, loading_panel, manual_entry_panel, result_panel};
use crate::state::PendingAnalysis;
use crate::{
    AnalysisError, AnalysisOutcome, AnalysisRequest, AutoPhase, Effect, FailureKind, JobRecord,
    Msg, Origin, OverlayKind, PageKind, PageSession, Panel, RequestId,
};

/// Source label sent with manual analyses.
pub const MANUAL_SOURCE: &str = "manual";

/// Overlays tied to the page that was showing when they were inserted.
const PAGE_BOUND_OVERLAYS: [OverlayKind; 3] = [
    OverlayKind::Loading,
    OverlayKind::Results,
    OverlayKind::CardPanel,
];

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: PageSession, msg: Msg) -> (PageSession, Vec<Effect>) {
    let effects = match msg {
        Msg::PageLoaded {
            url,
            kind,
            offers_manual_entry,
        } => page_loaded(&mut state, url, kind, offers_manual_entry),
        Msg::PageExtracted {
            url,
            source,
            record,
        } => page_extracted(&mut state, url, source, record),
        Msg::CardAnalyzeRequested {
            card_id,
            source,
            record,
        } => {
            if !record.is_sufficient(MIN_CARD_TEXT) {
                let error = AnalysisError::new(
                    FailureKind::InsufficientText,
                    "Not enough text in this listing to analyze.",
                );
                show(&mut state, OverlayKind::CardPanel, error_panel(&error), None)
            } else {
                start_request(
                    &mut state,
                    Origin::Card { card_id },
                    OverlayKind::CardPanel,
                    source,
                    record,
                )
            }
        }
        Msg::ManualEntryRequested => {
            show(&mut state, OverlayKind::ManualInput, manual_entry_panel(None), None)
        }
        Msg::ManualTextSubmitted { text, url } => {
            let len = text.trim().chars().count();
            if len < MIN_MANUAL_TEXT {
                guard_debug!("Manual input rejected: {} characters", len);
                let message = format!(
                    "Please enter at least {MIN_MANUAL_TEXT} characters of job text ({len} entered)."
                );
                show(
                    &mut state,
                    OverlayKind::ManualInput,
                    manual_entry_panel(Some(message)),
                    None,
                )
            } else {
                let record = JobRecord::manual_with_limit(&text, url, state.max_chars());
                start_request(
                    &mut state,
                    Origin::Manual,
                    OverlayKind::ManualInput,
                    MANUAL_SOURCE.to_string(),
                    record,
                )
            }
        }
        Msg::AnalysisCompleted { request_id, result } => {
            analysis_completed(&mut state, request_id, result)
        }
        Msg::OverlayDismissed(kind) => {
            state.overlays.remove(kind);
            if kind == OverlayKind::Results && state.phase() == AutoPhase::ShowingResult {
                state.set_phase(AutoPhase::Idle);
            }
            Vec::new()
        }
        Msg::ContextReset => {
            let effects = state
                .overlays
                .kinds()
                .into_iter()
                .map(Effect::RemoveOverlay)
                .collect();
            state.reset();
            effects
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn page_loaded(
    state: &mut PageSession,
    url: String,
    kind: PageKind,
    offers_manual_entry: bool,
) -> Vec<Effect> {
    let mut effects = Vec::new();
    if !state.is_current_url(&url) {
        for overlay in PAGE_BOUND_OVERLAYS {
            if state.overlays.remove(overlay).is_some() {
                effects.push(Effect::RemoveOverlay(overlay));
            }
        }
        if !state.is_analyzing() {
            state.set_phase(AutoPhase::Idle);
        }
        state.set_current_url(&url);
    }

    match kind {
        PageKind::Detail => {
            if state.is_analyzing() {
                guard_debug!("Automatic analysis already in flight; ignoring {}", url);
            } else if !state.dedup().should_analyze(&url) {
                guard_debug!("Already analyzed {}", url);
            } else {
                guard_info!("Detail page detected, extracting {}", url);
                state.begin_auto();
                effects.push(Effect::ExtractPage { url });
            }
        }
        PageKind::Listing => effects.push(Effect::WatchListing { url }),
        PageKind::Unknown => {
            if offers_manual_entry {
                effects.extend(show(
                    state,
                    OverlayKind::ManualInput,
                    manual_entry_panel(None),
                    None,
                ));
            }
        }
    }
    effects
}

fn page_extracted(
    state: &mut PageSession,
    url: String,
    source: String,
    record: JobRecord,
) -> Vec<Effect> {
    if !state.is_analyzing() || state.phase() != AutoPhase::Extracting {
        guard_warn!("Unexpected extraction result for {}", url);
        return Vec::new();
    }
    if !state.is_current_url(&url) {
        guard_debug!("Dropping extraction for {} after navigation", url);
        state.finish_auto(AutoPhase::Idle);
        return Vec::new();
    }

    if !record.is_sufficient(MIN_PAGE_TEXT) {
        guard_info!(
            "Only {} characters extracted from {}; offering manual entry",
            record.text_len(),
            url
        );
        state.finish_auto(AutoPhase::ShowingResult);
        let error = AnalysisError::new(
            FailureKind::InsufficientText,
            "Could not find enough job text on this page.",
        );
        let mut effects = show(state, OverlayKind::Results, error_panel(&error), None);
        effects.extend(show(
            state,
            OverlayKind::ManualInput,
            manual_entry_panel(None),
            None,
        ));
        return effects;
    }

    state.set_phase(AutoPhase::Waiting);
    start_request(
        state,
        Origin::Page { url },
        OverlayKind::Loading,
        source,
        record,
    )
}

fn start_request(
    state: &mut PageSession,
    origin: Origin,
    anchor: OverlayKind,
    source: String,
    record: JobRecord,
) -> Vec<Effect> {
    let request = |request_id: RequestId, record: &JobRecord| AnalysisRequest {
        request_id,
        text: record.text().to_string(),
        title: record.title().to_string(),
        company: record.company().to_string(),
        source: source.clone(),
    };
    let request_id = state.register(PendingAnalysis {
        origin,
        anchor,
        record: record.clone(),
    });
    let mut effects = show(state, anchor, loading_panel(), Some(request_id));
    effects.push(Effect::SendAnalysis(request(request_id, &record)));
    effects
}

fn analysis_completed(
    state: &mut PageSession,
    request_id: RequestId,
    result: AnalysisOutcome,
) -> Vec<Effect> {
    let Some(pending) = state.take_pending(request_id) else {
        guard_warn!("Response for unknown request {}", request_id);
        return Vec::new();
    };

    if let Err(error) = &result {
        guard_warn!("Analysis {} failed: {}", request_id, error);
    }

    let renderable = state.overlays.is_owned_by(pending.anchor, request_id);
    if let Origin::Page { url } = &pending.origin {
        if result.is_ok() {
            state.dedup_mut().mark_done(url);
        }
        let phase = if renderable {
            AutoPhase::ShowingResult
        } else {
            AutoPhase::Idle
        };
        state.finish_auto(phase);
    }

    if !renderable {
        guard_debug!("Insertion point for request {} is gone; not rendering", request_id);
        return Vec::new();
    }

    let panel = match &result {
        Ok(verdict) => {
            let record = match pending.origin {
                Origin::Manual => None,
                _ => Some(&pending.record),
            };
            result_panel(verdict, record)
        }
        Err(error) => error_panel(error),
    };

    match pending.anchor {
        OverlayKind::Loading => {
            state.overlays.remove(OverlayKind::Loading);
            let mut effects = vec![Effect::RemoveOverlay(OverlayKind::Loading)];
            effects.extend(show(state, OverlayKind::Results, panel, None));
            effects
        }
        anchor => show(state, anchor, panel, None),
    }
}

fn show(
    state: &mut PageSession,
    kind: OverlayKind,
    panel: Panel,
    owner: Option<RequestId>,
) -> Vec<Effect> {
    state.overlays.show(kind, panel.clone(), owner);
    vec![Effect::ShowOverlay { kind, panel }]
}
