use std::sync::{Arc, Mutex};
use std::time::Duration;

use jobguard_core::{
    AnalysisError, AnalysisOutcome, AnalysisRequest, AnalysisResult, FailureKind, Prediction,
};
use jobguard_engine::{
    json_to_outcome, outcome_to_json, Analyzer, MessageRelay, RelayEvent, RelayHandle,
    RelayMessage, RelayedAnalyzer,
};
use pretty_assertions::assert_eq;
use serde_json::json;

/// `(text, title, company, source)` as seen by the analyzer.
type Call = (String, String, String, String);

struct ScriptedAnalyzer {
    reply: AnalysisOutcome,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedAnalyzer {
    fn new(reply: AnalysisOutcome) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

fn call(text: &str, title: &str, company: &str, source: &str) -> Call {
    (
        text.to_string(),
        title.to_string(),
        company.to_string(),
        source.to_string(),
    )
}

#[async_trait::async_trait]
impl Analyzer for ScriptedAnalyzer {
    async fn analyze(&self, text: &str, source: &str) -> AnalysisOutcome {
        self.analyze_job(text, "", "", source).await
    }

    async fn analyze_job(
        &self,
        text: &str,
        title: &str,
        company: &str,
        source: &str,
    ) -> AnalysisOutcome {
        self.calls
            .lock()
            .unwrap()
            .push(call(text, title, company, source));
        self.reply.clone()
    }
}

fn legit() -> AnalysisResult {
    AnalysisResult {
        prediction: Prediction::Real,
        confidence: 0.91,
        reasoning: "Established employer.".to_string(),
        red_flags: Vec::new(),
    }
}

#[tokio::test]
async fn analyze_job_message_is_answered_with_verdict_json() {
    let analyzer = Arc::new(ScriptedAnalyzer::new(Ok(legit())));
    let relay = MessageRelay::new(analyzer.clone());

    let reply = relay
        .handle(&json!({
            "action": "analyzeJob",
            "jobText": "JOB TITLE: Nurse",
            "jobTitle": "Nurse",
            "jobCompany": "General Hospital",
            "source": "indeed"
        }))
        .await;

    assert_eq!(
        reply,
        json!({
            "prediction": "real",
            "confidence": 0.91,
            "reasoning": "Established employer.",
            "red_flags": []
        })
    );
    assert_eq!(
        analyzer.calls(),
        vec![call("JOB TITLE: Nurse", "Nurse", "General Hospital", "indeed")]
    );
}

#[tokio::test]
async fn unknown_action_is_rejected_without_calling_the_service() {
    let analyzer = Arc::new(ScriptedAnalyzer::new(Ok(legit())));
    let relay = MessageRelay::new(analyzer.clone());

    let reply = relay.handle(&json!({"action": "ping"})).await;

    assert!(reply["error"].as_str().is_some());
    assert_eq!(reply["kind"], "invalid_input");
    assert!(analyzer.calls().is_empty());
}

#[tokio::test]
async fn blank_job_text_is_rejected() {
    let analyzer = Arc::new(ScriptedAnalyzer::new(Ok(legit())));
    let relay = MessageRelay::new(analyzer.clone());

    let reply = relay
        .handle(&json!({"action": "analyzeJob", "jobText": "   "}))
        .await;

    assert_eq!(reply["error"], "No job text provided");
    assert!(analyzer.calls().is_empty());
}

#[tokio::test]
async fn relayed_analyzer_is_transparent() {
    let failure = AnalysisError::new(FailureKind::HttpStatus(500), "Server error: 500");
    let analyzer = Arc::new(ScriptedAnalyzer::new(Err(failure.clone())));
    let relayed = RelayedAnalyzer::new(MessageRelay::new(analyzer.clone()));

    assert_eq!(relayed.analyze("text", "manual").await, Err(failure));

    let analyzer = Arc::new(ScriptedAnalyzer::new(Ok(legit())));
    let relayed = RelayedAnalyzer::new(MessageRelay::new(analyzer.clone()));

    assert_eq!(relayed.analyze("text", "").await, Ok(legit()));
    assert_eq!(analyzer.calls(), vec![call("text", "", "", "unknown")]);
}

#[tokio::test]
async fn relayed_message_carries_title_and_company() {
    let analyzer = Arc::new(ScriptedAnalyzer::new(Ok(legit())));
    let relayed = RelayedAnalyzer::new(MessageRelay::new(analyzer.clone()));

    let outcome = relayed
        .analyze_job("JOB TITLE: Nurse", "Nurse", "General Hospital", "indeed")
        .await;

    assert_eq!(outcome, Ok(legit()));
    assert_eq!(
        analyzer.calls(),
        vec![call("JOB TITLE: Nurse", "Nurse", "General Hospital", "indeed")]
    );
}

#[test]
fn worker_passes_request_fields_to_the_analyzer() {
    let analyzer = Arc::new(ScriptedAnalyzer::new(Ok(legit())));
    let handle = RelayHandle::new(Arc::new(RelayedAnalyzer::new(MessageRelay::new(
        analyzer.clone(),
    ))));

    handle.submit(AnalysisRequest {
        request_id: 3,
        text: "JOB TITLE: Courier".to_string(),
        title: "Courier".to_string(),
        company: "Speedy Parcels".to_string(),
        source: "listing_card".to_string(),
    });
    let event = handle
        .recv_timeout(Duration::from_secs(10))
        .expect("completion event");

    assert_eq!(
        event,
        RelayEvent::Completed {
            request_id: 3,
            result: Ok(legit()),
        }
    );
    assert_eq!(
        analyzer.calls(),
        vec![call("JOB TITLE: Courier", "Courier", "Speedy Parcels", "listing_card")]
    );
}

#[test]
fn message_uses_camel_case_fields() {
    let message = RelayMessage::AnalyzeJob {
        job_text: "t".to_string(),
        job_title: "Clerk".to_string(),
        job_company: "Initech".to_string(),
        source: "linkedin".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&message).unwrap(),
        json!({
            "action": "analyzeJob",
            "jobText": "t",
            "jobTitle": "Clerk",
            "jobCompany": "Initech",
            "source": "linkedin"
        })
    );
}

#[test]
fn error_replies_keep_their_kind() {
    let transport = AnalysisError::new(FailureKind::Transport, "Could not reach the analysis server");
    assert_eq!(json_to_outcome(&outcome_to_json(&Err(transport.clone()))), Err(transport));

    let bare = json_to_outcome(&json!({"error": "boom"}));
    assert_eq!(bare, Err(AnalysisError::new(FailureKind::Service, "boom")));
}
