//! Listing-card extraction.
//!
//! Card markup is sparse and differs per site, so structured card selectors
//! are tried first and line heuristics fill whatever they miss. The
//! heuristics are approximate: they aim for plausible text to classify, not
//! for exact fields.

use std::collections::HashSet;

use jobguard_core::limits::{truncate_chars, MAX_ANALYSIS_CHARS};
use jobguard_core::{JobFields, JobRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use sha2::{Digest, Sha256};
use url::Url;

use crate::sites::{field_text, profile_for_url, profiles_for};
use crate::text::{char_len, element_lines};

/// Source label sent with card analyses.
pub const CARD_SOURCE: &str = "listing_card";

const MAX_TITLE_LINE: usize = 100;
const MAX_COMPANY_LINE: usize = 50;
const DESCRIPTION_LINE_MIN: usize = 10;
const DESCRIPTION_LINE_MAX: usize = 200;
const DESCRIPTION_LINES: usize = 2;
const RAW_DESCRIPTION_CHARS: usize = 200;

const BULLETS: &[char] = &['•', '·', '|'];

static SALARY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\$\s?\d[\d,]*(?:\.\d+)?\s?k?(?:\s?(?:-|–|to)\s?\$?\s?\d[\d,]*(?:\.\d+)?\s?k?)?(?:\s?(?:/\s?|per\s|an?\s)(?:yr|year|hr|hour))?|\b\d+(?:\.\d+)?k\s?/\s?(?:yr|year)\b",
    )
    .expect("Failed to compile salary regex")
});

/// US state codes accepted after a bare space (`Austin TX`); with a comma any
/// two capitals or a capitalised region name is accepted.
const STATE_CODES: &str = "AL|AK|AZ|AR|CA|CO|CT|DC|DE|FL|GA|HI|ID|IL|IN|IA|KS|KY|LA|ME|MD|MA|MI|MN|MS|MO|MT|NE|NV|NH|NJ|NM|NY|NC|ND|OH|OK|OR|PA|RI|SC|SD|TN|TX|UT|VT|VA|WA|WV|WI|WY";

static LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    let place = r"\b[A-Z][A-Za-z.'-]+(?: [A-Z][A-Za-z.'-]+)*";
    Regex::new(&format!(
        r"{place}, ?(?:[A-Z]{{2}}\b|[A-Z][a-z]+(?: [A-Z][a-z]+)?)|{place} (?:{STATE_CODES})\b|{place} [•·] [A-Z][A-Za-z]+(?: [A-Z][A-Za-z]+)?"
    ))
    .expect("Failed to compile location regex")
});

/// A card not seen before by a [`CardFeed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardCandidate {
    /// Stable identity derived from the card's text.
    pub card_id: String,
    pub record: JobRecord,
}

/// Receives batches of card nodes as the host discovers them and yields
/// each distinct card once.
#[derive(Debug, Clone)]
pub struct CardFeed {
    page_url: String,
    max_chars: usize,
    seen: HashSet<String>,
}

impl CardFeed {
    pub fn new(page_url: impl Into<String>) -> Self {
        Self::with_limit(page_url, MAX_ANALYSIS_CHARS)
    }

    pub fn with_limit(page_url: impl Into<String>, max_chars: usize) -> Self {
        Self {
            page_url: page_url.into(),
            max_chars,
            seen: HashSet::new(),
        }
    }

    pub fn feed<'a, I>(&mut self, nodes: I) -> Vec<CardCandidate>
    where
        I: IntoIterator<Item = ElementRef<'a>>,
    {
        let mut fresh = Vec::new();
        for node in nodes {
            let lines = element_lines(node);
            if lines.is_empty() {
                continue;
            }
            let card_id = short_hash(&lines.join("\n"));
            if !self.seen.insert(card_id.clone()) {
                continue;
            }
            let record = extract_card_with_limit(node, &self.page_url, self.max_chars);
            fresh.push(CardCandidate { card_id, record });
        }
        if !fresh.is_empty() {
            jobguard_logging::guard_debug!(
                "{} new cards on {} ({} seen)",
                fresh.len(),
                self.page_url,
                self.seen.len()
            );
        }
        fresh
    }

    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

/// Card nodes in a listing snapshot, using the first card selector that matches.
pub fn find_cards<'a>(document: &'a Html, url: &str) -> Vec<ElementRef<'a>> {
    let site = profile_for_url(url);
    profiles_for(site)
        .flat_map(|profile| profile.cards.iter())
        .filter_map(|raw| Selector::parse(raw).ok())
        .map(|selector| document.select(&selector).collect::<Vec<_>>())
        .find(|cards| !cards.is_empty())
        .unwrap_or_default()
}

pub fn extract_from_card(card: ElementRef<'_>, page_url: &str) -> JobRecord {
    extract_card_with_limit(card, page_url, MAX_ANALYSIS_CHARS)
}

fn extract_card_with_limit(card: ElementRef<'_>, page_url: &str, max_chars: usize) -> JobRecord {
    let site = profile_for_url(page_url);
    let lines = element_lines(card);
    let guessed = heuristic_fields_from_lines(&lines);

    let fields = JobFields {
        title: field_text(card, site, |p| p.card_title, false).unwrap_or(guessed.title),
        company: field_text(card, site, |p| p.card_company, false).unwrap_or(guessed.company),
        location: field_text(card, site, |p| p.card_location, false).or(guessed.location),
        salary: field_text(card, site, |p| p.card_salary, false).or(guessed.salary),
        description: guessed.description,
    };
    JobRecord::from_fields_with_limit(fields, card_url(card, page_url), max_chars)
}

/// Best-effort fields from a card's plain text.
pub fn heuristic_fields(text: &str) -> JobFields {
    let lines: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    heuristic_fields_from_lines(&lines)
}

fn heuristic_fields_from_lines(lines: &[String]) -> JobFields {
    let raw = lines.join("\n");

    let title = guess_title(lines).unwrap_or_default();
    let company = guess_company(lines).unwrap_or_default();
    let location = LOCATION_RE.find(&raw).map(|m| m.as_str().to_string());
    let salary = SALARY_RE.find(&raw).map(|m| m.as_str().trim().to_string());

    let description_lines: Vec<&str> = lines
        .iter()
        .map(String::as_str)
        .filter(|line| {
            let len = char_len(line);
            (DESCRIPTION_LINE_MIN..=DESCRIPTION_LINE_MAX).contains(&len)
                && *line != title
                && *line != company
                && !SALARY_RE.is_match(line)
                && !LOCATION_RE.is_match(line)
                && !is_apply_line(line)
        })
        .take(DESCRIPTION_LINES)
        .collect();
    let description = if description_lines.is_empty() {
        truncate_chars(&raw, RAW_DESCRIPTION_CHARS).to_string()
    } else {
        description_lines.join(" ")
    };

    JobFields {
        title,
        company,
        location,
        salary,
        description,
    }
}

fn guess_title(lines: &[String]) -> Option<String> {
    let first = lines.first()?;
    if char_len(first) < MAX_TITLE_LINE {
        return Some(first.clone());
    }
    let apply = lines.iter().position(|line| line.contains("Apply"))?;
    apply
        .checked_sub(1)
        .and_then(|index| lines.get(index))
        .map(|line| truncate_chars(line, MAX_TITLE_LINE).to_string())
}

fn guess_company(lines: &[String]) -> Option<String> {
    if let Some(second) = lines.get(1) {
        if char_len(second) < MAX_COMPANY_LINE
            && !SALARY_RE.is_match(second)
            && !is_apply_line(second)
        {
            return Some(second.clone());
        }
    }
    lines.iter().find_map(|line| {
        let (_, after) = line.split_once(BULLETS)?;
        let after = after.trim();
        let company = after.split(BULLETS).next().unwrap_or(after).trim();
        (!company.is_empty() && char_len(company) < MAX_COMPANY_LINE).then(|| company.to_string())
    })
}

fn is_apply_line(line: &str) -> bool {
    line.starts_with("Apply") || line.eq_ignore_ascii_case("easy apply")
}

fn card_url(card: ElementRef<'_>, page_url: &str) -> String {
    let own_href = (card.value().name() == "a")
        .then(|| card.value().attr("href"))
        .flatten();
    let href = own_href.or_else(|| {
        let anchor = Selector::parse("a[href]").ok()?;
        card.select(&anchor).find_map(|a| a.value().attr("href"))
    });
    match (href, Url::parse(page_url)) {
        (Some(href), Ok(base)) => base
            .join(href.trim())
            .map(|joined| joined.to_string())
            .unwrap_or_else(|_| page_url.to_string()),
        (Some(href), Err(_)) => href.trim().to_string(),
        (None, _) => page_url.to_string(),
    }
}

fn short_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(12);
    for byte in digest.iter().take(6) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
