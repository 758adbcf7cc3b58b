use jobguard_core::DedupTracker;

#[test]
fn marked_url_is_not_analyzed_again() {
    let mut tracker = DedupTracker::new();
    let url = "https://www.linkedin.com/jobs/view/3812345678/";

    assert!(tracker.should_analyze(url));
    tracker.mark_done(url);
    assert!(!tracker.should_analyze(url));
    assert!(tracker.should_analyze("https://www.linkedin.com/jobs/view/3899999999/"));
    assert!(tracker.should_analyze("https://www.indeed.com/viewjob?jk=abc"));
    assert_eq!(tracker.len(), 1);
}

#[test]
fn marking_twice_keeps_one_entry() {
    let mut tracker = DedupTracker::new();
    tracker.mark_done("https://example.com/job/1");
    tracker.mark_done("https://example.com/job/1#details");
    assert_eq!(tracker.len(), 1);
}

#[test]
fn clear_forgets_everything() {
    let mut tracker = DedupTracker::new();
    tracker.mark_done("https://example.com/job/1");
    tracker.clear();
    assert!(tracker.is_empty());
    assert!(tracker.should_analyze("https://example.com/job/1"));
}
