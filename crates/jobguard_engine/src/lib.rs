//! jobguard engine: page heuristics and IO (snapshot decode and fetch,
//! classification, extraction, the analysis relay).
mod card;
mod classify;
mod decode;
mod extract;
mod fetch;
mod message;
mod relay;
pub mod sites;
mod text;
mod types;
mod wire;
mod worker;

pub use card::{extract_from_card, find_cards, heuristic_fields, CardCandidate, CardFeed, CARD_SOURCE};
pub use classify::{classify_page, PageClassification};
pub use decode::{decode_snapshot, DecodedSnapshot};
pub use extract::{Extractor, SiteAwareExtractor};
pub use fetch::{FetchSettings, Fetcher, SnapshotFetcher, BROWSER_USER_AGENT};
pub use message::{json_to_outcome, outcome_to_json, MessageRelay, RelayMessage, RelayedAnalyzer};
pub use relay::{Analyzer, ApiFlavor, HttpAnalyzer, RelaySettings, DEFAULT_SERVER_URL};
pub use sites::source_label;
pub use text::{block_text, inline_text};
pub use types::{FetchError, FetchFailure, FetchMetadata, FetchOutput, RelayEvent};
pub use wire::{decode_reply, outcome_from_value, parse_verdict_text, MALFORMED_MESSAGE};
pub use worker::RelayHandle;

/// Re-exported so hosts can parse snapshots without naming `scraper` themselves.
pub use scraper::Html;
