use std::collections::HashSet;

use url::Url;

/// Pages already analyzed automatically during this session.
///
/// Grows monotonically until [`DedupTracker::clear`]; there is no eviction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DedupTracker {
    analyzed: HashSet<String>,
}

impl DedupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_analyze(&self, url: &str) -> bool {
        !self.analyzed.contains(&dedup_key(url))
    }

    /// Record a successful automatic analysis of `url`.
    pub fn mark_done(&mut self, url: &str) {
        self.analyzed.insert(dedup_key(url));
    }

    pub fn clear(&mut self) {
        self.analyzed.clear();
    }

    pub fn len(&self) -> usize {
        self.analyzed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzed.is_empty()
    }
}

/// Trimmed URL without its `#fragment`; unparsable input is only trimmed.
pub fn dedup_key(url: &str) -> String {
    let trimmed = url.trim();
    match Url::parse(trimmed) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::dedup_key;

    #[test]
    fn fragment_is_dropped() {
        assert_eq!(
            dedup_key(" https://www.indeed.com/viewjob?jk=42#apply "),
            "https://www.indeed.com/viewjob?jk=42"
        );
    }

    #[test]
    fn query_is_significant() {
        assert_ne!(
            dedup_key("https://www.indeed.com/viewjob?jk=1"),
            dedup_key("https://www.indeed.com/viewjob?jk=2")
        );
    }

    #[test]
    fn relative_input_is_kept_verbatim() {
        assert_eq!(dedup_key("  /jobs/view/1  "), "/jobs/view/1");
    }
}
