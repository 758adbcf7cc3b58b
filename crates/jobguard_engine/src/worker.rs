use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use jobguard_core::{AnalysisError, AnalysisRequest, FailureKind};

use crate::relay::Analyzer;
use crate::RelayEvent;

enum RelayCommand {
    Analyze(AnalysisRequest),
}

/// Runs analyses on a background thread with its own tokio runtime.
///
/// Requests run concurrently and independently; completions arrive on the
/// event channel in whatever order the service answers.
pub struct RelayHandle {
    cmd_tx: mpsc::Sender<RelayCommand>,
    event_rx: mpsc::Receiver<RelayEvent>,
}

impl RelayHandle {
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    jobguard_logging::guard_error!("relay runtime failed to start: {err}");
                    fail_all(cmd_rx, event_tx, &err.to_string());
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let analyzer = analyzer.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(analyzer.as_ref(), command, event_tx).await;
                });
            }
            // Let in-flight analyses report before the runtime drops.
            runtime.shutdown_timeout(Duration::from_secs(1));
        });

        Self { cmd_tx, event_rx }
    }

    pub fn submit(&self, request: AnalysisRequest) {
        let request_id = request.request_id;
        if self.cmd_tx.send(RelayCommand::Analyze(request)).is_err() {
            jobguard_logging::guard_error!("relay worker is gone; request {request_id} dropped");
        }
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<RelayEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    analyzer: &dyn Analyzer,
    command: RelayCommand,
    event_tx: mpsc::Sender<RelayEvent>,
) {
    match command {
        RelayCommand::Analyze(request) => {
            jobguard_logging::guard_debug!(
                "request {} started ({} / {})",
                request.request_id,
                request.title,
                request.company
            );
            let result = analyzer
                .analyze_job(&request.text, &request.title, &request.company, &request.source)
                .await;
            let _ = event_tx.send(RelayEvent::Completed {
                request_id: request.request_id,
                result,
            });
        }
    }
}

/// Answers every request with a transport error when no runtime is available.
fn fail_all(
    cmd_rx: mpsc::Receiver<RelayCommand>,
    event_tx: mpsc::Sender<RelayEvent>,
    reason: &str,
) {
    while let Ok(RelayCommand::Analyze(request)) = cmd_rx.recv() {
        let _ = event_tx.send(RelayEvent::Completed {
            request_id: request.request_id,
            result: Err(AnalysisError::new(
                FailureKind::Transport,
                format!("Analysis unavailable: {reason}"),
            )),
        });
    }
}
