use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use redact_client::{ArtifactSink, RedactionService};
use redact_core::{ArtifactFormat, Command, Error, Event, Operation, Result, RunId, Workflow};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

struct DownloadReport {
    format: ArtifactFormat,
    result: Result<PathBuf>,
}

/// Drives a [`Workflow`] against a [`RedactionService`].
///
/// All state changes happen on the caller's task: network calls run in
/// spawned tasks that only send their result back over a channel, and the
/// caller applies those results with [`Coordinator::poll`] or
/// [`Coordinator::settle`].
pub struct Coordinator {
    workflow: Workflow,
    service: Arc<dyn RedactionService>,
    sink: Arc<dyn ArtifactSink>,
    timeout: Option<Duration>,
    completions_tx: mpsc::UnboundedSender<Event>,
    completions_rx: mpsc::UnboundedReceiver<Event>,
    downloads_tx: mpsc::UnboundedSender<DownloadReport>,
    downloads_rx: mpsc::UnboundedReceiver<DownloadReport>,
    in_flight: Option<AbortHandle>,
    pending_downloads: usize,
}

impl Coordinator {
    pub fn new(service: Arc<dyn RedactionService>, sink: Arc<dyn ArtifactSink>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (downloads_tx, downloads_rx) = mpsc::unbounded_channel();
        Self {
            workflow: Workflow::new(),
            service,
            sink,
            timeout: None,
            completions_tx,
            completions_rx,
            downloads_tx,
            downloads_rx,
            in_flight: None,
            pending_downloads: 0,
        }
    }

    /// Bound every network call; an expired call fails its own operation
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    /// Busy indicator: a run is extracting or redacting
    pub fn is_busy(&self) -> bool {
        self.workflow.is_busy()
    }

    /// Apply a user event and start whatever it requires
    pub fn dispatch(&mut self, event: Event) {
        if let Some(command) = self.workflow.handle(event) {
            self.execute(command);
        }
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Extract { run, file } => {
                let service = Arc::clone(&self.service);
                let timeout = self.timeout;
                self.spawn_step(run, Operation::Extract, async move {
                    let result =
                        bounded(timeout, Operation::Extract, service.extract(&file)).await;
                    Event::ExtractionFinished { run, result }
                });
            }
            Command::Redact { run, request } => {
                let service = Arc::clone(&self.service);
                let timeout = self.timeout;
                self.spawn_step(run, Operation::Redact, async move {
                    let result =
                        bounded(timeout, Operation::Redact, service.redact(&request)).await;
                    Event::RedactionFinished { run, result }
                });
            }
            Command::CancelInFlight => self.cancel_in_flight(),
        }
    }

    /// Only one run step is ever in flight; starting one supersedes the last.
    ///
    /// A step that panics still completes its run as a failure of
    /// `operation`. An aborted step reports nothing.
    fn spawn_step<F>(&mut self, run: RunId, operation: Operation, step: F)
    where
        F: Future<Output = Event> + Send + 'static,
    {
        self.cancel_in_flight();
        let step = tokio::spawn(step);
        self.in_flight = Some(step.abort_handle());

        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let event = match step.await {
                Ok(event) => event,
                Err(e) if e.is_panic() => {
                    warn!(run = %run, "{} task panicked", operation);
                    failed_step(run, operation, "service call panicked")
                }
                Err(_) => return,
            };
            // Receiver only goes away with the coordinator.
            let _ = tx.send(event);
        });
    }

    fn cancel_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take()
            && !handle.is_finished()
        {
            debug!("aborting in-flight request");
            handle.abort();
        }
    }

    /// Surface a front-end problem the same way network notices are shown
    pub fn notify(&mut self, message: impl Into<String>) {
        self.workflow.notify(message);
    }

    /// Apply every completion that has already arrived, without waiting
    pub fn poll(&mut self) {
        while let Ok(event) = self.completions_rx.try_recv() {
            self.dispatch(event);
        }
        while let Ok(report) = self.downloads_rx.try_recv() {
            self.finish_download(report);
        }
    }

    /// Wait until the current run and all started downloads have finished
    pub async fn settle(&mut self) {
        loop {
            self.poll();
            if !self.is_busy() && self.pending_downloads == 0 {
                return;
            }

            tokio::select! {
                Some(event) = self.completions_rx.recv() => self.dispatch(event),
                Some(report) = self.downloads_rx.recv() => self.finish_download(report),
            }
        }
    }

    /// Trigger a run and wait for it to finish
    pub async fn run(&mut self) -> &Workflow {
        self.dispatch(Event::RunRequested);
        self.settle().await;
        &self.workflow
    }

    /// Start a download in the background; the outcome shows up as a notice
    /// after the next [`Coordinator::poll`]
    pub fn start_download(&mut self, format: ArtifactFormat) {
        let redacted = match self.workflow.download_source(format) {
            Ok(redacted) => redacted,
            Err(e) => {
                self.workflow.record_download(format, &Err(e));
                return;
            }
        };

        let service = Arc::clone(&self.service);
        let sink = Arc::clone(&self.sink);
        let timeout = self.timeout;
        let tx = self.downloads_tx.clone();
        self.pending_downloads += 1;
        tokio::spawn(async move {
            let result = transfer(&*service, &*sink, timeout, format, &redacted).await;
            let _ = tx.send(DownloadReport { format, result });
        });
    }

    /// Download `format` and wait for it to be saved
    pub async fn download(&mut self, format: ArtifactFormat) -> Result<PathBuf> {
        let redacted = self.workflow.download_source(format)?;
        let result = transfer(&*self.service, &*self.sink, self.timeout, format, &redacted).await;
        self.workflow.record_download(format, &result);
        result
    }

    fn finish_download(&mut self, report: DownloadReport) {
        self.pending_downloads = self.pending_downloads.saturating_sub(1);
        self.workflow.record_download(report.format, &report.result);
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}

/// Completion event reporting `operation` as failed for `run`
fn failed_step(run: RunId, operation: Operation, message: &str) -> Event {
    let error = Error::rejected(operation, message);
    match operation {
        Operation::Extract => Event::ExtractionFinished {
            run,
            result: Err(error),
        },
        _ => Event::RedactionFinished {
            run,
            result: Err(error),
        },
    }
}

async fn transfer(
    service: &dyn RedactionService,
    sink: &dyn ArtifactSink,
    timeout: Option<Duration>,
    format: ArtifactFormat,
    redacted: &str,
) -> Result<PathBuf> {
    bounded(
        timeout,
        Operation::Export(format),
        redact_client::download(service, sink, format, redacted),
    )
    .await
}

async fn bounded<T>(
    timeout: Option<Duration>,
    operation: Operation,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    let Some(limit) = timeout else {
        return call.await;
    };

    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(Error::rejected(
            operation,
            format!("request timed out after {}s", limit.as_secs_f32()),
        )),
    }
}
