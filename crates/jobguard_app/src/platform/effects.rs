use std::io::{self, Write};
use std::time::Duration;

use jobguard_core::{Effect, Msg};
use jobguard_engine::{
    find_cards, source_label, CardCandidate, CardFeed, Extractor, Html, RelayEvent, RelayHandle,
    SiteAwareExtractor, CARD_SOURCE,
};
use jobguard_logging::{guard_debug, guard_info, guard_warn};

use super::render::render_panel;

/// Carries out core effects against the loaded document, the relay worker
/// and the terminal.
pub struct EffectRunner<W: Write> {
    relay: RelayHandle,
    extractor: SiteAwareExtractor,
    max_chars: usize,
    document: Option<Html>,
    feed: Option<CardFeed>,
    pick: Option<usize>,
    out: W,
}

impl<W: Write> EffectRunner<W> {
    pub fn new(relay: RelayHandle, max_chars: usize, out: W) -> Self {
        Self {
            relay,
            extractor: SiteAwareExtractor::new(max_chars),
            max_chars,
            document: None,
            feed: None,
            pick: None,
            out,
        }
    }

    pub fn load_document(&mut self, document: Html) {
        self.document = Some(document);
    }

    /// 1-based card index to analyze once the listing is scanned.
    pub fn pick_card(&mut self, pick: Option<usize>) {
        self.pick = pick;
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    /// Execute `effects`, returning the messages they produced.
    pub fn run(&mut self, effects: Vec<Effect>) -> io::Result<Vec<Msg>> {
        let mut msgs = Vec::new();
        for effect in effects {
            match effect {
                Effect::ExtractPage { url } => msgs.extend(self.extract_page(url)),
                Effect::WatchListing { url } => msgs.extend(self.watch_listing(&url)?),
                Effect::SendAnalysis(request) => {
                    guard_info!(
                        "SendAnalysis request_id={} chars={} source={}",
                        request.request_id,
                        request.text.chars().count(),
                        request.source
                    );
                    self.relay.submit(request);
                }
                Effect::ShowOverlay { kind, panel } => {
                    writeln!(self.out, "{}", render_panel(kind, &panel))?;
                }
                Effect::RemoveOverlay(kind) => {
                    guard_debug!("RemoveOverlay {}", kind.element_id());
                }
            }
        }
        Ok(msgs)
    }

    /// Wait up to `timeout` for the next relay completion.
    pub fn next_completion(&self, timeout: Duration) -> Option<Msg> {
        self.relay
            .recv_timeout(timeout)
            .map(|RelayEvent::Completed { request_id, result }| Msg::AnalysisCompleted {
                request_id,
                result,
            })
    }

    fn extract_page(&self, url: String) -> Option<Msg> {
        let Some(document) = &self.document else {
            guard_warn!("ExtractPage for {} without a loaded document", url);
            return None;
        };
        let record = self.extractor.extract(document, &url);
        guard_info!(
            "Extracted {} characters from {} ({:?} at {:?})",
            record.text_len(),
            url,
            record.title(),
            record.company()
        );
        Some(Msg::PageExtracted {
            source: source_label(&url),
            url,
            record,
        })
    }

    fn watch_listing(&mut self, url: &str) -> io::Result<Option<Msg>> {
        let Some(document) = &self.document else {
            guard_warn!("WatchListing for {} without a loaded document", url);
            return Ok(None);
        };
        let feed = match &mut self.feed {
            Some(feed) if feed.page_url() == url => feed,
            slot => slot.insert(CardFeed::with_limit(url, self.max_chars)),
        };
        let candidates = feed.feed(find_cards(document, url));
        guard_info!("Found {} new cards on {}", candidates.len(), url);

        if candidates.is_empty() {
            writeln!(self.out, "No job cards found on {url}")?;
            return Ok(None);
        }
        for (index, candidate) in candidates.iter().enumerate() {
            writeln!(self.out, "{}", card_line(index + 1, candidate))?;
        }

        let Some(pick) = self.pick.take() else {
            return Ok(None);
        };
        match pick.checked_sub(1).and_then(|index| candidates.into_iter().nth(index)) {
            Some(candidate) => Ok(Some(Msg::CardAnalyzeRequested {
                card_id: candidate.card_id,
                source: CARD_SOURCE.to_string(),
                record: candidate.record,
            })),
            None => {
                writeln!(self.out, "No card number {pick} on this page")?;
                Ok(None)
            }
        }
    }
}

fn card_line(number: usize, candidate: &CardCandidate) -> String {
    let record = &candidate.record;
    let mut line = format!("  {number:>2}. {}", or_unknown(record.title()));
    line.push_str(&format!(" | {}", or_unknown(record.company())));
    if let Some(location) = record.location() {
        line.push_str(&format!(" | {location}"));
    }
    if let Some(salary) = record.salary() {
        line.push_str(&format!(" | {salary}"));
    }
    line.push_str(&format!("  ({})", candidate.card_id));
    line
}

fn or_unknown(value: &str) -> &str {
    if value.is_empty() {
        "?"
    } else {
        value
    }
}
