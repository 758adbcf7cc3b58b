use jobguard_core::limits::{MAX_ANALYSIS_CHARS, MIN_PAGE_TEXT};
use jobguard_engine::{Extractor, Html, SiteAwareExtractor};
use pretty_assertions::assert_eq;

const INDEED_URL: &str = "https://www.indeed.com/viewjob?jk=5a1b";

fn long_description() -> String {
    "You will design, build and operate payment services used by small businesses. "
        .repeat(4)
        .trim_end()
        .to_string()
}

#[test]
fn known_selectors_round_trip() {
    let description = long_description();
    let html = format!(
        r#"<html><head><title>Ignored page title</title></head><body>
        <h1 class="jobsearch-JobInfoHeader-title">Backend Engineer</h1>
        <div data-testid="inlineHeader-companyName"><a>Acme Payments</a></div>
        <div data-testid="inlineHeader-companyLocation">Austin, TX</div>
        <div id="jobDescriptionText"><p>{description}</p></div>
        </body></html>"#
    );
    let document = Html::parse_document(&html);

    let record = SiteAwareExtractor::default().extract(&document, INDEED_URL);

    assert_eq!(record.title(), "Backend Engineer");
    assert_eq!(record.company(), "Acme Payments");
    assert_eq!(record.location(), Some("Austin, TX"));
    assert_eq!(record.salary(), None);
    assert_eq!(record.description(), description);
    assert_eq!(record.url(), INDEED_URL);
    assert_eq!(
        record.text(),
        format!(
            "JOB TITLE: Backend Engineer\nCOMPANY: Acme Payments\nLOCATION: Austin, TX\nDESCRIPTION: {description}"
        )
    );
    assert!(record.is_sufficient(MIN_PAGE_TEXT));
}

#[test]
fn short_site_description_falls_back_to_main_container() {
    let short = "x".repeat(199);
    let benefits = "Benefits include remote work, a learning budget and paid parental leave.";
    let html = format!(
        r#"<html><body>
        <h1 class="jobsearch-JobInfoHeader-title">Data Analyst</h1>
        <main>
            <div id="jobDescriptionText">{short}</div>
            <p>{benefits}</p>
        </main>
        </body></html>"#
    );
    let document = Html::parse_document(&html);

    let record = SiteAwareExtractor::default().extract(&document, INDEED_URL);

    assert_eq!(record.description(), format!("{short}\n{benefits}"));
    assert_eq!(record.title(), "Data Analyst");
}

#[test]
fn missing_description_uses_main_text() {
    let body = long_description();
    let html = format!(
        r#"<html><body><header>Site nav</header><main><p>{body}</p></main></body></html>"#
    );
    let document = Html::parse_document(&html);

    let record = SiteAwareExtractor::default().extract(&document, INDEED_URL);

    assert_eq!(record.description(), body);
    assert_eq!(record.title(), "");
}

#[test]
fn fallback_text_is_capped() {
    let body = "Lots of unrelated page text here. ".repeat(200);
    let html = format!("<html><body><p>{body}</p></body></html>");
    let document = Html::parse_document(&html);

    let record =
        SiteAwareExtractor::default().extract(&document, "https://careers.example.org/about");

    assert!(record.description().chars().count() <= 2500);
    assert!(record.description().starts_with("Lots of unrelated page text here."));
}

#[test]
fn text_never_exceeds_the_limit() {
    let huge = "word ".repeat(5000);
    let html = format!(
        r#"<html><body><h1>{}</h1><div id="job-description">{huge}</div></body></html>"#,
        "T".repeat(500)
    );
    let document = Html::parse_document(&html);

    let record = SiteAwareExtractor::default().extract(&document, "https://jobs.example.org/job/1");
    assert!(record.text_len() <= MAX_ANALYSIS_CHARS);

    let record = SiteAwareExtractor::new(300).extract(&document, "https://jobs.example.org/job/1");
    assert_eq!(record.text_len(), 300);
    assert!(record.text().starts_with(&format!("JOB TITLE: {}", "T".repeat(200))));
}

#[test]
fn empty_document_still_has_labels() {
    let document = Html::parse_document("");

    let record = SiteAwareExtractor::default().extract(&document, "https://example.org/");

    assert!(record.text().contains("JOB TITLE:"));
    assert!(record.text().contains("COMPANY:"));
    assert!(record.text().contains("DESCRIPTION:"));
    assert!(!record.is_sufficient(MIN_PAGE_TEXT));
}
