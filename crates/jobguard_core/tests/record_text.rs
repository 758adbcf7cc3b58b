use jobguard_core::limits::{MAX_ANALYSIS_CHARS, MIN_PAGE_TEXT};
use jobguard_core::{JobFields, JobRecord};
use pretty_assertions::assert_eq;

fn fields(title: &str, company: &str, description: &str) -> JobFields {
    JobFields {
        title: title.to_string(),
        company: company.to_string(),
        description: description.to_string(),
        ..JobFields::default()
    }
}

#[test]
fn text_follows_fixed_template() {
    let record = JobRecord::from_fields(
        JobFields {
            location: Some("Austin, TX".to_string()),
            salary: Some("$90K - $110K/yr".to_string()),
            ..fields("  Data Analyst ", "Acme Corp", "Crunch numbers.")
        },
        "https://www.indeed.com/viewjob?jk=1",
    );

    assert_eq!(
        record.text(),
        "JOB TITLE: Data Analyst\nCOMPANY: Acme Corp\nLOCATION: Austin, TX\nSALARY: $90K - $110K/yr\nDESCRIPTION: Crunch numbers."
    );
    assert_eq!(record.title(), "Data Analyst");
    assert_eq!(record.location(), Some("Austin, TX"));
    assert_eq!(record.url(), "https://www.indeed.com/viewjob?jk=1");
}

#[test]
fn empty_fields_still_carry_labels() {
    let record = JobRecord::from_fields(JobFields::default(), "");

    assert!(record.text().contains("JOB TITLE:"));
    assert!(record.text().contains("COMPANY:"));
    assert!(record.text().contains("DESCRIPTION:"));
    assert!(!record.text().contains("LOCATION:"));
    assert!(!record.is_sufficient(MIN_PAGE_TEXT));
}

#[test]
fn blank_optional_fields_are_dropped() {
    let record = JobRecord::from_fields(
        JobFields {
            location: Some("   ".to_string()),
            salary: Some(String::new()),
            ..fields("T", "C", "D")
        },
        "",
    );
    assert_eq!(record.location(), None);
    assert_eq!(record.salary(), None);
}

#[test]
fn text_never_exceeds_service_limit() {
    for description_len in [0, 10, 3_990, 4_000, 10_000] {
        let description = "é".repeat(description_len);
        let record = JobRecord::from_fields(fields("Title", "Company", &description), "");
        assert!(record.text_len() <= MAX_ANALYSIS_CHARS);
        assert!(record.text().starts_with("JOB TITLE: Title"));
    }

    let huge_title = "T".repeat(50_000);
    let record = JobRecord::from_fields(fields(&huge_title, "", ""), "");
    assert!(record.text_len() <= MAX_ANALYSIS_CHARS);
    assert!(record.text().contains("DESCRIPTION:"));
}

#[test]
fn custom_limit_trims_from_the_end() {
    let record = JobRecord::from_fields_with_limit(fields("Title", "Co", &"x".repeat(500)), "", 40);
    assert_eq!(record.text_len(), 40);
    assert!(record.text().starts_with("JOB TITLE: Title\nCOMPANY: Co\n"));
}

#[test]
fn manual_record_keeps_user_text_only() {
    let record = JobRecord::manual("  Earn $5000 a week from home, no experience needed!  ", "");
    assert_eq!(
        record.text(),
        "Earn $5000 a week from home, no experience needed!"
    );
    assert_eq!(record.title(), "");
    assert_eq!(record.description(), "");

    let long = JobRecord::manual(&"a".repeat(9_000), "");
    assert_eq!(long.text_len(), MAX_ANALYSIS_CHARS);
}
