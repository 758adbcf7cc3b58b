use std::sync::Arc;
use std::time::Duration;

use jobguard_core::{AnalysisError, AnalysisOutcome, FailureKind};
use serde::{Deserialize, Serialize};

use crate::wire::{decode_reply, AnalyzeBody, CheckJobBody};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Which generation of the analysis service to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ApiFlavor {
    /// `POST /analyze` answering with a structured verdict.
    #[default]
    Analyze,
    /// `POST /check_job` answering with `{output: "Verdict: ..."}`.
    CheckJob,
}

impl ApiFlavor {
    pub fn path(self) -> &'static str {
        match self {
            ApiFlavor::Analyze => "/analyze",
            ApiFlavor::CheckJob => "/check_job",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub base_url: String,
    pub flavor: ApiFlavor,
    pub connect_timeout: Duration,
    /// `None` waits as long as the service takes; analyses can run for minutes.
    pub request_timeout: Option<Duration>,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVER_URL.to_string(),
            flavor: ApiFlavor::default(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

impl RelaySettings {
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.flavor.path())
    }
}

/// Sends job text for classification. Every failure comes back as an
/// [`AnalysisError`] value; implementations never panic on bad replies.
#[async_trait::async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, text: &str, source: &str) -> AnalysisOutcome;

    /// Same as [`Analyzer::analyze`] but also hands over the posting's title
    /// and company, for implementations that forward them.
    async fn analyze_job(
        &self,
        text: &str,
        _title: &str,
        _company: &str,
        source: &str,
    ) -> AnalysisOutcome {
        self.analyze(text, source).await
    }
}

#[async_trait::async_trait]
impl<A: Analyzer + ?Sized> Analyzer for Arc<A> {
    async fn analyze(&self, text: &str, source: &str) -> AnalysisOutcome {
        (**self).analyze(text, source).await
    }

    async fn analyze_job(
        &self,
        text: &str,
        title: &str,
        company: &str,
        source: &str,
    ) -> AnalysisOutcome {
        (**self).analyze_job(text, title, company, source).await
    }
}

#[derive(Debug, Clone, Default)]
pub struct HttpAnalyzer {
    settings: RelaySettings,
}

impl HttpAnalyzer {
    pub fn new(settings: RelaySettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RelaySettings {
        &self.settings
    }

    fn build_client(&self) -> Result<reqwest::Client, AnalysisError> {
        let mut builder = reqwest::Client::builder().connect_timeout(self.settings.connect_timeout);
        if let Some(timeout) = self.settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|err| AnalysisError::new(FailureKind::Transport, err.to_string()))
    }

    fn request(&self, client: &reqwest::Client, text: &str, source: &str) -> reqwest::RequestBuilder {
        let post = client.post(self.settings.endpoint());
        match self.settings.flavor {
            ApiFlavor::Analyze => post.json(&AnalyzeBody {
                job_text: text,
                source,
            }),
            ApiFlavor::CheckJob => post.json(&CheckJobBody {
                text,
                job_text: text,
                source,
            }),
        }
    }
}

#[async_trait::async_trait]
impl Analyzer for HttpAnalyzer {
    async fn analyze(&self, text: &str, source: &str) -> AnalysisOutcome {
        let client = self.build_client()?;
        jobguard_logging::guard_info!(
            "sending {} chars from {source} to {}",
            text.chars().count(),
            self.settings.endpoint()
        );

        let response = self
            .request(&client, text, source)
            .send()
            .await
            .map_err(|err| transport_error(&self.settings.base_url, err))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|err| transport_error(&self.settings.base_url, err))?;

        let outcome = decode_reply(status, &body);
        match &outcome {
            Ok(result) => jobguard_logging::guard_info!(
                "analysis finished: {} ({:.2})",
                result.prediction.as_str(),
                result.confidence
            ),
            Err(err) => jobguard_logging::guard_warn!("analysis failed: {err}"),
        }
        outcome
    }
}

fn transport_error(base_url: &str, err: reqwest::Error) -> AnalysisError {
    jobguard_logging::guard_error!("analysis request to {base_url} failed: {err}");
    let message = if err.is_timeout() {
        "The analysis server took too long to answer.".to_string()
    } else {
        format!("Could not reach the analysis server at {base_url}. Make sure the local server is running.")
    };
    AnalysisError::new(FailureKind::Transport, message)
}
