//! Terminal rendering of overlay panels.

use jobguard_core::{OverlayKind, Panel, Tone, VerdictPanel};

const MANUAL_HINT: &str = "Run `jobguard manual` to paste the posting text instead.";

pub fn render_panel(kind: OverlayKind, panel: &Panel) -> String {
    let mut lines = Vec::new();
    match panel {
        Panel::Loading { message } => {
            lines.push(format!("[{}] {message}", kind.element_id()));
        }
        Panel::Verdict(verdict) => render_verdict(kind, verdict, &mut lines),
        Panel::Error {
            message,
            guidance,
            offer_manual_entry,
        } => {
            lines.push(format!("[{}] Analysis failed: {message}", kind.element_id()));
            if let Some(guidance) = guidance {
                lines.push(format!("  {guidance}"));
            }
            if *offer_manual_entry {
                lines.push(format!("  {MANUAL_HINT}"));
            }
        }
        Panel::ManualEntry { hint, error } => {
            lines.push(format!("[{}] {hint}", kind.element_id()));
            if let Some(error) = error {
                lines.push(format!("  {error}"));
            }
        }
    }
    lines.join("\n")
}

fn render_verdict(kind: OverlayKind, verdict: &VerdictPanel, lines: &mut Vec<String>) {
    lines.push(format!(
        "[{}] {} {} ({}% confidence)",
        kind.element_id(),
        marker(verdict.tone),
        verdict.headline,
        verdict.confidence_percent
    ));
    if let Some(job_line) = &verdict.job_line {
        lines.push(format!("  {job_line}"));
    }
    if !verdict.reasoning.is_empty() {
        lines.push(format!("  {}", verdict.reasoning));
    }
    if !verdict.red_flags.is_empty() {
        lines.push("  Red flags:".to_string());
        lines.extend(verdict.red_flags.iter().map(|flag| format!("    - {flag}")));
    }
}

fn marker(tone: Tone) -> &'static str {
    match tone {
        Tone::Legitimate => "[ok]",
        Tone::Scam => "[!!]",
        Tone::Caution => "[??]",
    }
}
