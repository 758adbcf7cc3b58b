use crate::limits::{truncate_chars, MAX_ANALYSIS_CHARS, MAX_HEADER_FIELD};

/// Structured fields scraped from a page or a listing card.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobFields {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub description: String,
}

/// One job posting, ready to be sent for analysis.
///
/// `text` is derived from the other fields by a fixed template and is never
/// edited on its own; manual records carry the user's text instead and leave
/// the structured fields empty. Records are rebuilt, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    title: String,
    company: String,
    location: Option<String>,
    salary: Option<String>,
    description: String,
    text: String,
    url: String,
}

impl JobRecord {
    /// Builds a record and composes `text`, capped at [`MAX_ANALYSIS_CHARS`].
    pub fn from_fields(fields: JobFields, url: impl Into<String>) -> Self {
        Self::from_fields_with_limit(fields, url, MAX_ANALYSIS_CHARS)
    }

    /// Builds a record whose `text` is capped at `max_chars` characters.
    pub fn from_fields_with_limit(
        fields: JobFields,
        url: impl Into<String>,
        max_chars: usize,
    ) -> Self {
        let fields = JobFields {
            title: fields.title.trim().to_string(),
            company: fields.company.trim().to_string(),
            location: non_empty(fields.location),
            salary: non_empty(fields.salary),
            description: fields.description.trim().to_string(),
        };
        let text = compose_text(&fields, max_chars);
        Self {
            title: fields.title,
            company: fields.company,
            location: fields.location,
            salary: fields.salary,
            description: fields.description,
            text,
            url: url.into(),
        }
    }

    /// Wraps free-form user input; no structured fields are set.
    pub fn manual(text: &str, url: impl Into<String>) -> Self {
        Self::manual_with_limit(text, url, MAX_ANALYSIS_CHARS)
    }

    pub fn manual_with_limit(text: &str, url: impl Into<String>, max_chars: usize) -> Self {
        Self {
            title: String::new(),
            company: String::new(),
            location: None,
            salary: None,
            description: String::new(),
            text: truncate_chars(text.trim(), max_chars).to_string(),
            url: url.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn salary(&self) -> Option<&str> {
        self.salary.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Length of `text` in characters.
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }

    /// True when `text` is strictly longer than `min_chars`.
    pub fn is_sufficient(&self, min_chars: usize) -> bool {
        self.text_len() > min_chars
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn compose_text(fields: &JobFields, max_chars: usize) -> String {
    let mut text = String::new();
    text.push_str("JOB TITLE: ");
    text.push_str(truncate_chars(&fields.title, MAX_HEADER_FIELD));
    text.push_str("\nCOMPANY: ");
    text.push_str(truncate_chars(&fields.company, MAX_HEADER_FIELD));
    if let Some(location) = &fields.location {
        text.push_str("\nLOCATION: ");
        text.push_str(truncate_chars(location, MAX_HEADER_FIELD));
    }
    if let Some(salary) = &fields.salary {
        text.push_str("\nSALARY: ");
        text.push_str(truncate_chars(salary, MAX_HEADER_FIELD));
    }
    text.push_str("\nDESCRIPTION: ");
    text.push_str(&fields.description);
    truncate_chars(&text, max_chars).to_string()
}
