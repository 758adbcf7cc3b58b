use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use jobguard_core::{update, Msg, PageKind, PageSession};
use jobguard_engine::{
    classify_page, find_cards, CardFeed, Extractor, Html, HttpAnalyzer, MessageRelay,
    PageClassification, RelayHandle, RelayedAnalyzer, SiteAwareExtractor,
};
use jobguard_logging::{guard_info, guard_warn};

use super::cli::{Cli, Command, SourceArgs};
use super::config::AppConfig;
use super::effects::EffectRunner;
use super::snapshot::{load_snapshot, PageSnapshot};

/// How long to wait for the server when no request timeout is configured.
const DEFAULT_WAIT: Duration = Duration::from_secs(600);
const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(&cli.config)?;
    config.apply_cli(&cli);
    jobguard_logging::initialize(config.log_destination, config.log_level.filter(), None);
    guard_info!(
        "jobguard {} using {}",
        env!("CARGO_PKG_VERSION"),
        config.relay_settings().endpoint()
    );

    match cli.command {
        Command::Config => {
            println!("{}", config.to_ron()?);
        }
        Command::Inspect(args) => {
            let snapshot = load_snapshot(&args.source, args.url.as_deref())?;
            inspect(&snapshot, config.max_chars, &mut io::stdout().lock())?;
        }
        Command::Page(args) => analyze_page(&config, &args, PageMode::Auto)?,
        Command::Cards { page, pick } => analyze_page(&config, &page, PageMode::Cards { pick })?,
        Command::Manual { text, url } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buffer = String::new();
                    io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };
            let mut runner = EffectRunner::new(relay_for(&config), config.max_chars, io::stdout());
            drive(
                &mut runner,
                vec![Msg::ManualTextSubmitted {
                    text,
                    url: url.unwrap_or_default(),
                }],
                completion_wait(&config),
            )?;
        }
    }
    Ok(())
}

enum PageMode {
    /// React to whatever the classifier decides.
    Auto,
    /// Scan for cards even when the page does not classify as a listing.
    Cards { pick: Option<usize> },
}

fn analyze_page(config: &AppConfig, args: &SourceArgs, mode: PageMode) -> anyhow::Result<()> {
    let snapshot = load_snapshot(&args.source, args.url.as_deref())?;
    let document = Html::parse_document(&snapshot.html);
    let classification = classify_page(&snapshot.url, &document);

    let mut runner = EffectRunner::new(relay_for(config), config.max_chars, io::stdout());
    runner.load_document(document);
    let mut msg = page_loaded(&snapshot.url, &classification);
    if let PageMode::Cards { pick } = mode {
        if classification.kind != PageKind::Listing {
            guard_warn!(
                "{} classified as {:?}; scanning for cards anyway",
                snapshot.url,
                classification.kind
            );
        }
        runner.pick_card(pick);
        msg = Msg::PageLoaded {
            url: snapshot.url.clone(),
            kind: PageKind::Listing,
            offers_manual_entry: false,
        };
    } else if classification.kind == PageKind::Unknown && !classification.offers_manual_entry() {
        writeln!(runner.out(), "{} does not look like a job page.", snapshot.url)?;
    }

    let session = drive(&mut runner, vec![msg], completion_wait(config))?;
    guard_info!("Session finished: {} page(s) analyzed", session.view().analyzed_count);
    Ok(())
}

fn page_loaded(url: &str, classification: &PageClassification) -> Msg {
    Msg::PageLoaded {
        url: url.to_string(),
        kind: classification.kind,
        offers_manual_entry: classification.offers_manual_entry(),
    }
}

fn relay_for(config: &AppConfig) -> RelayHandle {
    let analyzer = HttpAnalyzer::new(config.relay_settings());
    RelayHandle::new(Arc::new(RelayedAnalyzer::new(MessageRelay::new(analyzer))))
}

fn completion_wait(config: &AppConfig) -> Duration {
    match config.request_timeout_secs {
        Some(secs) => Duration::from_secs(config.connect_timeout_secs + secs + 5),
        None => DEFAULT_WAIT,
    }
}

/// Feed `initial` through `update`, run the resulting effects and keep going
/// until no analysis is outstanding.
fn drive<W: Write>(
    runner: &mut EffectRunner<W>,
    initial: Vec<Msg>,
    wait: Duration,
) -> anyhow::Result<PageSession> {
    let mut session = PageSession::with_limit(runner.max_chars());
    let mut queue: VecDeque<Msg> = initial.into();

    loop {
        while let Some(msg) = queue.pop_front() {
            let (next, effects) = update(session, msg);
            session = next;
            queue.extend(runner.run(effects)?);
        }
        if !session.has_pending() {
            break;
        }

        let deadline = Instant::now() + wait;
        loop {
            if let Some(msg) = runner.next_completion(POLL_INTERVAL) {
                queue.push_back(msg);
                break;
            }
            if Instant::now() >= deadline {
                anyhow::bail!("no answer from the analysis server after {wait:?}");
            }
        }
    }
    Ok(session)
}

fn inspect(snapshot: &PageSnapshot, max_chars: usize, out: &mut impl Write) -> io::Result<()> {
    let document = Html::parse_document(&snapshot.html);
    let classification = classify_page(&snapshot.url, &document);

    writeln!(out, "url:          {}", snapshot.url)?;
    writeln!(out, "kind:         {:?}", classification.kind)?;
    writeln!(out, "site:         {}", classification.site.unwrap_or("generic"))?;
    writeln!(out, "visible text: {} chars", classification.visible_text_len)?;
    writeln!(out, "manual entry: {}", classification.offers_manual_entry())?;

    match classification.kind {
        PageKind::Detail => {
            let record = SiteAwareExtractor::new(max_chars).extract(&document, &snapshot.url);
            writeln!(out, "--- {} characters ---", record.text_len())?;
            writeln!(out, "{}", record.text())?;
        }
        PageKind::Listing => {
            let candidates = CardFeed::with_limit(snapshot.url.as_str(), max_chars)
                .feed(find_cards(&document, &snapshot.url));
            writeln!(out, "--- {} cards ---", candidates.len())?;
            for candidate in candidates {
                writeln!(out, "[{}]\n{}", candidate.card_id, candidate.record.text())?;
            }
        }
        PageKind::Unknown => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use jobguard_core::limits::MAX_ANALYSIS_CHARS;
    use jobguard_core::{AnalysisOutcome, AnalysisResult, AutoPhase, OverlayKind, Panel, Prediction};
    use jobguard_engine::Analyzer;

    const INDEED_URL: &str = "https://www.indeed.com/viewjob?jk=77c1";

    struct CannedAnalyzer(AnalysisOutcome);

    #[async_trait::async_trait]
    impl Analyzer for CannedAnalyzer {
        async fn analyze(&self, _text: &str, _source: &str) -> AnalysisOutcome {
            self.0.clone()
        }
    }

    /// Remembers the length of every text it was asked about.
    #[derive(Default)]
    struct MeasuringAnalyzer(Mutex<Vec<usize>>);

    #[async_trait::async_trait]
    impl Analyzer for MeasuringAnalyzer {
        async fn analyze(&self, text: &str, _source: &str) -> AnalysisOutcome {
            self.0.lock().unwrap().push(text.chars().count());
            Ok(scam())
        }
    }

    fn scam() -> AnalysisResult {
        AnalysisResult {
            prediction: Prediction::Fake,
            confidence: 0.92,
            reasoning: "Asks for a starter kit payment.".to_string(),
            red_flags: vec!["Upfront payment".to_string()],
        }
    }

    fn runner(outcome: AnalysisOutcome) -> EffectRunner<Vec<u8>> {
        let relay = RelayHandle::new(Arc::new(CannedAnalyzer(outcome)));
        EffectRunner::new(relay, MAX_ANALYSIS_CHARS, Vec::new())
    }

    fn output(runner: &mut EffectRunner<Vec<u8>>) -> String {
        String::from_utf8(runner.out().clone()).unwrap()
    }

    fn detail_page() -> String {
        format!(
            r#"<html><body>
            <h1 class="jobsearch-JobInfoHeader-title">Data Entry Clerk</h1>
            <div data-testid="inlineHeader-companyName">Initech</div>
            <div id="jobDescriptionText"><p>{}</p></div>
            </body></html>"#,
            "Work from home entering data. Buy the starter kit to begin. ".repeat(6)
        )
    }

    #[test]
    fn detail_page_is_analyzed_and_rendered() {
        let html = detail_page();
        let document = Html::parse_document(&html);
        let classification = classify_page(INDEED_URL, &document);
        assert_eq!(classification.kind, PageKind::Detail);

        let mut runner = runner(Ok(scam()));
        runner.load_document(document);
        let session = drive(
            &mut runner,
            vec![page_loaded(INDEED_URL, &classification)],
            Duration::from_secs(10),
        )
        .unwrap();

        let text = output(&mut runner);
        assert!(text.starts_with("[jobguard-loading] Analyzing job posting"), "{text}");
        assert!(text.contains("[jobguard-results] [!!] Likely scam (92% confidence)"));
        assert!(text.contains("Data Entry Clerk at Initech"));

        let view = session.view();
        assert_eq!(view.analyzed_count, 1);
        assert_eq!(view.phase, AutoPhase::ShowingResult);
        assert!(view.overlay(OverlayKind::Loading).is_none());
    }

    #[test]
    fn picked_card_gets_its_own_panel() {
        let url = "https://careers.example.org/search?q=warehouse";
        let html = r#"<html><body><ul>
            <li class="job-card"><a href="/jobs/1">Forklift Operator</a><br>Globex<br>Springfield, IL<br>Operate forklifts on the night shift.</li>
            <li class="job-card"><a href="/jobs/2">Package Handler</a><br>Initech<br>Shelbyville, IL<br>$18 - $22/hr<br>Sort parcels for regional delivery routes.</li>
            </ul></body></html>"#;
        let mut runner = runner(Ok(scam()));
        runner.load_document(Html::parse_document(html));
        runner.pick_card(Some(2));

        let session = drive(
            &mut runner,
            vec![Msg::PageLoaded {
                url: url.to_string(),
                kind: PageKind::Listing,
                offers_manual_entry: false,
            }],
            Duration::from_secs(10),
        )
        .unwrap();

        let text = output(&mut runner);
        assert!(text.contains(" 1. Forklift Operator | Globex | Springfield, IL"), "{text}");
        assert!(text.contains(" 2. Package Handler | Initech | Shelbyville, IL | $18 - $22/hr"));
        assert!(text.contains("[jobguard-card-panel] [!!] Likely scam"));
        assert!(text.contains("Package Handler at Initech"));

        let view = session.view();
        assert_eq!(view.analyzed_count, 0);
        assert!(matches!(
            view.overlay(OverlayKind::CardPanel).map(|overlay| &overlay.panel),
            Some(Panel::Verdict(_))
        ));
    }

    #[test]
    fn short_manual_text_asks_again_without_a_request() {
        let mut runner = runner(Ok(scam()));
        let session = drive(
            &mut runner,
            vec![Msg::ManualTextSubmitted {
                text: "Send me $50".to_string(),
                url: String::new(),
            }],
            Duration::from_secs(1),
        )
        .unwrap();

        let text = output(&mut runner);
        assert!(text.starts_with("[jobguard-manual-input] Paste the job posting text"));
        assert!(text.contains("(11 entered)"));
        assert!(!session.has_pending());
    }

    #[test]
    fn manual_text_respects_configured_limit() {
        let analyzer = Arc::new(MeasuringAnalyzer::default());
        let relay = RelayHandle::new(analyzer.clone());
        let mut runner = EffectRunner::new(relay, 300, Vec::new());

        let session = drive(
            &mut runner,
            vec![Msg::ManualTextSubmitted {
                text: "a".repeat(1000),
                url: String::new(),
            }],
            Duration::from_secs(10),
        )
        .unwrap();

        assert_eq!(*analyzer.0.lock().unwrap(), vec![300]);
        assert_eq!(session.max_chars(), 300);
        assert!(!session.has_pending());
    }

    #[test]
    fn inspect_shows_extracted_text() {
        let snapshot = PageSnapshot {
            url: INDEED_URL.to_string(),
            html: detail_page(),
        };
        let mut out = Vec::new();
        inspect(&snapshot, MAX_ANALYSIS_CHARS, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("kind:         Detail"));
        assert!(text.contains("site:         indeed"));
        assert!(text.contains("JOB TITLE: Data Entry Clerk\nCOMPANY: Initech\nDESCRIPTION: Work from home"));
    }
}
