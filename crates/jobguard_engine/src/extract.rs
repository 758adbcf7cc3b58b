use jobguard_core::limits::{
    truncate_chars, MAX_ANALYSIS_CHARS, MAX_FALLBACK_DESCRIPTION, MIN_DESCRIPTION,
};
use jobguard_core::{JobFields, JobRecord};
use scraper::{Html, Selector};

use crate::sites::{field_text, profile_for_url, CONTENT_CONTAINERS};
use crate::text::{block_text, char_len};

/// Turns a document snapshot into a [`JobRecord`]. Never fails: fields that
/// cannot be found are left empty and sufficiency is judged by the caller.
pub trait Extractor: Send + Sync {
    fn extract(&self, document: &Html, url: &str) -> JobRecord;
}

/// Selector-table extractor:
/// - per field, the first non-empty match, host profile before generic profile
/// - short or missing descriptions fall back to the main content container
/// - `text` capped at `max_chars`
#[derive(Debug, Clone)]
pub struct SiteAwareExtractor {
    max_chars: usize,
}

impl SiteAwareExtractor {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl Default for SiteAwareExtractor {
    fn default() -> Self {
        Self::new(MAX_ANALYSIS_CHARS)
    }
}

impl Extractor for SiteAwareExtractor {
    fn extract(&self, document: &Html, url: &str) -> JobRecord {
        let site = profile_for_url(url);
        let root = document.root_element();

        let mut description = field_text(root, site, |p| p.description, true).unwrap_or_default();
        if char_len(&description) < MIN_DESCRIPTION {
            if let Some(fallback) = fallback_description(document) {
                if char_len(&fallback) > char_len(&description) {
                    jobguard_logging::guard_debug!(
                        "description for {url} too short ({} chars), using content container",
                        char_len(&description)
                    );
                    description = fallback;
                }
            }
        }

        let fields = JobFields {
            title: field_text(root, site, |p| p.title, false).unwrap_or_default(),
            company: field_text(root, site, |p| p.company, false).unwrap_or_default(),
            location: field_text(root, site, |p| p.location, false),
            salary: field_text(root, site, |p| p.salary, false),
            description,
        };
        JobRecord::from_fields_with_limit(fields, url, self.max_chars)
    }
}

/// First content container holding a usable description, else the whole body.
fn fallback_description(document: &Html) -> Option<String> {
    let container = CONTENT_CONTAINERS.iter().find_map(|raw| {
        let selector = Selector::parse(raw).ok()?;
        document
            .select(&selector)
            .map(block_text)
            .find(|text| char_len(text) >= MIN_DESCRIPTION)
    });
    let text = container.or_else(|| {
        let body = Selector::parse("body").ok()?;
        document.select(&body).next().map(block_text)
    })?;
    let text = truncate_chars(&text, MAX_FALLBACK_DESCRIPTION).trim_end();
    (!text.is_empty()).then(|| text.to_string())
}
