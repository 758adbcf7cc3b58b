//! Length thresholds shared by extraction, the session and the presenter.

/// Largest `text` the analysis service accepts, in characters.
pub const MAX_ANALYSIS_CHARS: usize = 4000;

/// A full-page record is analyzable only when its text is longer than this.
pub const MIN_PAGE_TEXT: usize = 100;

/// Listing-card records are analyzable only when their text is longer than this.
pub const MIN_CARD_TEXT: usize = 50;

/// Manual input must have at least this many characters (after trimming).
pub const MIN_MANUAL_TEXT: usize = 50;

/// Site descriptions shorter than this trigger the generic container fallback.
pub const MIN_DESCRIPTION: usize = 200;

/// Text taken from a generic fallback container is cut to this length.
pub const MAX_FALLBACK_DESCRIPTION: usize = 2500;

/// A description container longer than this marks a page as a detail page.
pub const DETAIL_DESCRIPTION_MIN: usize = 300;

/// Unknown pages with more visible text than this offer manual extraction.
pub const MANUAL_OFFER_MIN_TEXT: usize = 500;

/// Confidence above which a non-fake prediction is shown as legitimate.
pub const LEGITIMATE_CONFIDENCE: f64 = 0.8;

/// Title and company are clipped to this many characters in `text`.
pub const MAX_HEADER_FIELD: usize = 200;

/// Returns the prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::truncate_chars;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 3), "abc");
    }

    #[test]
    fn cut_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語");
        assert_eq!(truncate_chars("abc", 0), "");
    }
}
