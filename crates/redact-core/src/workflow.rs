//! Workflow state machine
//!
//! `Workflow` is the only place the working document and run state change.
//! Front-ends turn user actions into [`Event`]s; the async shell executes the
//! [`Command`]s returned by [`Workflow::handle`] and feeds the results back in
//! as completion events tagged with the run that issued them.

use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::artifact::ArtifactFormat;
use crate::document::{DocumentSource, UploadedFile, WorkingDocument};
use crate::error::Error;
use crate::request::{RedactionOutcome, RedactionRequest};
use crate::settings::{PiiCategory, RedactionSettings};

pub const RESET_NOTICE: &str = "✓ Reset Complete!";
pub const BUSY_NOTICE: &str = "A run is already in progress";

/// Monotonic run identifier. Completions carrying an older id are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RunId(u64);

impl RunId {
    pub fn next(self) -> Self {
        RunId(self.0 + 1)
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Extracting,
    Redacting,
    Succeeded,
    Failed,
}

impl RunState {
    /// Busy indicator is shown for the whole extract + redact span
    pub fn is_busy(&self) -> bool {
        matches!(self, RunState::Extracting | RunState::Redacting)
    }
}

#[derive(Debug)]
pub enum Event {
    SourceTextChanged(String),
    FileSelected(UploadedFile),
    FileCleared,
    CategoryToggled(PiiCategory),
    RunRequested,
    ExtractionFinished {
        run: RunId,
        result: Result<String, Error>,
    },
    RedactionFinished {
        run: RunId,
        result: Result<RedactionOutcome, Error>,
    },
    ResetRequested,
}

/// Side effect the async shell must perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Extract { run: RunId, file: UploadedFile },
    Redact { run: RunId, request: RedactionRequest },
    /// Abort whatever request is in flight
    CancelInFlight,
}

#[derive(Debug, Default)]
pub struct Workflow {
    pub document: WorkingDocument,
    pub settings: RedactionSettings,
    pub file: Option<UploadedFile>,
    pub phase: RunState,
    pub current_run: RunId,
    pub downloads_enabled: bool,
    pub last_error: Option<Error>,
    pub notice: Option<String>,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    /// Apply one event and return the command it requires, if any
    pub fn handle(&mut self, event: Event) -> Option<Command> {
        match event {
            Event::SourceTextChanged(text) => {
                self.document.source_text = text;
                None
            }
            Event::FileSelected(file) => {
                self.notice = Some(format!("📎 {}", file.name));
                self.file = Some(file);
                None
            }
            Event::FileCleared => {
                self.file = None;
                None
            }
            Event::CategoryToggled(category) => {
                self.settings.toggle(category);
                None
            }
            Event::RunRequested => self.start_run(),
            Event::ExtractionFinished { run, result } => self.finish_extraction(run, result),
            Event::RedactionFinished { run, result } => {
                self.finish_redaction(run, result);
                None
            }
            Event::ResetRequested => Some(self.reset()),
        }
    }

    /// Text to export in `format`, if the latest run left something downloadable
    pub fn download_source(&self, format: ArtifactFormat) -> Result<String, Error> {
        if !self.downloads_enabled {
            return Err(Error::Download {
                format,
                message: "nothing to download yet".to_string(),
            });
        }
        Ok(self.document.redacted_text.clone())
    }

    /// Surface a finished download. Never touches the document or run state.
    pub fn record_download(&mut self, format: ArtifactFormat, result: &Result<PathBuf, Error>) {
        self.notice = Some(match result {
            Ok(path) => format!("Saved {} to {}", format.file_name(), path.display()),
            Err(e) => {
                warn!("{}", e);
                e.to_string()
            }
        });
    }

    /// Show a front-end message, such as a file that could not be read.
    /// Run state is untouched.
    pub fn notify(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.notice = Some(message);
    }

    fn start_run(&mut self) -> Option<Command> {
        if self.is_busy() {
            debug!(run = %self.current_run, "run requested while busy, ignoring");
            self.notice = Some(BUSY_NOTICE.to_string());
            return None;
        }

        self.current_run = self.current_run.next();
        self.last_error = None;
        self.notice = None;

        match DocumentSource::resolve(self.file.as_ref(), &self.document.source_text) {
            DocumentSource::Upload(file) => {
                info!(run = %self.current_run, file = %file.name, "extracting text");
                self.phase = RunState::Extracting;
                Some(Command::Extract {
                    run: self.current_run,
                    file,
                })
            }
            DocumentSource::Pasted(text) => Some(self.begin_redaction(text)),
        }
    }

    fn begin_redaction(&mut self, text: String) -> Command {
        info!(run = %self.current_run, chars = text.len(), "redacting text");
        let request = RedactionRequest::build(text.clone(), &self.settings);
        self.document.original_text = text;
        self.phase = RunState::Redacting;
        Command::Redact {
            run: self.current_run,
            request,
        }
    }

    fn finish_extraction(&mut self, run: RunId, result: Result<String, Error>) -> Option<Command> {
        if !self.accepts(run, RunState::Extracting) {
            return None;
        }

        match result {
            Ok(text) => Some(self.begin_redaction(text)),
            Err(e) => {
                self.fail(e);
                None
            }
        }
    }

    fn finish_redaction(&mut self, run: RunId, result: Result<RedactionOutcome, Error>) {
        if !self.accepts(run, RunState::Redacting) {
            return;
        }

        match result {
            Ok(outcome) => {
                info!(run = %run, entries = outcome.log.len(), "redaction succeeded");
                self.downloads_enabled = outcome.is_downloadable();
                self.document.apply_outcome(outcome);
                self.phase = RunState::Succeeded;
            }
            Err(e) => self.fail(e),
        }
    }

    fn accepts(&self, run: RunId, expected: RunState) -> bool {
        if run != self.current_run || self.phase != expected {
            debug!(
                run = %run,
                current = %self.current_run,
                phase = ?self.phase,
                "discarding stale completion"
            );
            return false;
        }
        true
    }

    fn fail(&mut self, error: Error) {
        warn!(run = %self.current_run, "run failed: {}", error);
        self.phase = RunState::Failed;
        self.last_error = Some(error);
    }

    fn reset(&mut self) -> Command {
        info!(run = %self.current_run, "resetting workflow");
        *self = Workflow {
            current_run: self.current_run.next(),
            notice: Some(RESET_NOTICE.to_string()),
            ..Workflow::default()
        };
        Command::CancelInFlight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(redacted: &str, log: &[&str]) -> RedactionOutcome {
        RedactionOutcome {
            redacted: redacted.to_string(),
            log: log.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn expect_redact(cmd: Option<Command>) -> (RunId, RedactionRequest) {
        match cmd {
            Some(Command::Redact { run, request }) => (run, request),
            other => panic!("expected redact command, got {:?}", other),
        }
    }

    #[test]
    fn test_pasted_text_goes_straight_to_redaction() {
        let mut wf = Workflow::new();
        let text = "Contact me at a@b.com or 555-123-4567";
        wf.handle(Event::SourceTextChanged(text.to_string()));

        let (run, request) = expect_redact(wf.handle(Event::RunRequested));
        assert_eq!(wf.phase, RunState::Redacting);
        assert!(wf.is_busy());
        assert_eq!(request.text, text);
        assert_eq!(request.settings, RedactionSettings::default());
        assert_eq!(wf.document.original_text, text);

        wf.handle(Event::RedactionFinished {
            run,
            result: Ok(outcome(
                "Contact me at [EMAIL] or [PHONE]",
                &["Redacted 1 email", "Redacted 1 phone number"],
            )),
        });

        assert_eq!(wf.phase, RunState::Succeeded);
        assert!(!wf.is_busy());
        assert_eq!(wf.document.original_text, text);
        assert_eq!(wf.document.redacted_text, "Contact me at [EMAIL] or [PHONE]");
        assert_eq!(
            wf.document.log_text(),
            "Redacted 1 email\nRedacted 1 phone number"
        );
        assert!(wf.downloads_enabled);
    }

    #[test]
    fn test_file_goes_through_extraction_first() {
        let mut wf = Workflow::new();
        wf.handle(Event::SourceTextChanged("pasted".to_string()));
        let file = UploadedFile::new("doc.pdf", vec![1, 2, 3]);
        wf.handle(Event::FileSelected(file.clone()));

        let run = match wf.handle(Event::RunRequested) {
            Some(Command::Extract { run, file: sent }) => {
                assert_eq!(sent, file);
                run
            }
            other => panic!("expected extract command, got {:?}", other),
        };
        assert_eq!(wf.phase, RunState::Extracting);

        let (redact_run, request) = expect_redact(wf.handle(Event::ExtractionFinished {
            run,
            result: Ok("extracted\n".to_string()),
        }));
        assert_eq!(redact_run, run);
        assert_eq!(request.text, "extracted\n");
        assert_eq!(wf.document.original_text, "extracted\n");
        assert_eq!(wf.phase, RunState::Redacting);
    }

    #[test]
    fn test_extraction_failure_never_redacts() {
        let mut wf = Workflow::new();
        wf.document.original_text = "previous".to_string();
        wf.handle(Event::FileSelected(UploadedFile::new("bad.pdf", vec![])));
        let run = match wf.handle(Event::RunRequested) {
            Some(Command::Extract { run, .. }) => run,
            other => panic!("unexpected {:?}", other),
        };

        let cmd = wf.handle(Event::ExtractionFinished {
            run,
            result: Err(Error::Extraction("Failed to parse PDF".to_string())),
        });

        assert!(cmd.is_none());
        assert_eq!(wf.phase, RunState::Failed);
        assert_eq!(wf.document.original_text, "previous");
        assert!(matches!(wf.last_error, Some(Error::Extraction(_))));
    }

    #[test]
    fn test_failed_rerun_keeps_previous_result() {
        let mut wf = Workflow::new();
        let (run, _) = expect_redact(wf.handle(Event::RunRequested));
        wf.handle(Event::RedactionFinished {
            run,
            result: Ok(outcome("[NAME_1]", &["names"])),
        });

        let (run, _) = expect_redact(wf.handle(Event::RunRequested));
        wf.handle(Event::RedactionFinished {
            run,
            result: Err(Error::Redaction("HTTP 500".to_string())),
        });

        assert_eq!(wf.phase, RunState::Failed);
        assert_eq!(wf.document.redacted_text, "[NAME_1]");
        assert_eq!(wf.document.audit_log, vec!["names"]);
        assert!(wf.downloads_enabled);
    }

    #[test]
    fn test_empty_output_keeps_downloads_disabled() {
        let mut wf = Workflow::new();
        let (run, _) = expect_redact(wf.handle(Event::RunRequested));
        wf.handle(Event::RedactionFinished {
            run,
            result: Ok(outcome("", &[])),
        });

        assert_eq!(wf.phase, RunState::Succeeded);
        assert!(!wf.downloads_enabled);
    }

    #[test]
    fn test_run_rejected_while_busy() {
        let mut wf = Workflow::new();
        let (run, _) = expect_redact(wf.handle(Event::RunRequested));

        assert!(wf.handle(Event::RunRequested).is_none());
        assert_eq!(wf.current_run, run);
        assert_eq!(wf.notice.as_deref(), Some(BUSY_NOTICE));
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut wf = Workflow::new();
        let (first, _) = expect_redact(wf.handle(Event::RunRequested));
        wf.handle(Event::ResetRequested);
        let (second, _) = expect_redact(wf.handle(Event::RunRequested));
        assert!(second > first);

        wf.handle(Event::RedactionFinished {
            run: first,
            result: Ok(outcome("stale", &[])),
        });
        assert_eq!(wf.phase, RunState::Redacting);
        assert_eq!(wf.document.redacted_text, "");

        wf.handle(Event::RedactionFinished {
            run: second,
            result: Ok(outcome("fresh", &[])),
        });
        assert_eq!(wf.document.redacted_text, "fresh");
    }

    #[test]
    fn test_reset_restores_defaults_from_any_state() {
        let mut wf = Workflow::new();
        wf.handle(Event::SourceTextChanged("text".to_string()));
        wf.handle(Event::CategoryToggled(PiiCategory::Emails));
        wf.handle(Event::CategoryToggled(PiiCategory::Addresses));
        let (run, _) = expect_redact(wf.handle(Event::RunRequested));
        wf.handle(Event::RedactionFinished {
            run,
            result: Ok(outcome("x", &["y"])),
        });
        wf.handle(Event::FileSelected(UploadedFile::new("a.pdf", vec![0])));
        wf.handle(Event::RunRequested);
        assert_eq!(wf.phase, RunState::Extracting);

        let cmd = wf.handle(Event::ResetRequested);

        assert_eq!(cmd, Some(Command::CancelInFlight));
        assert_eq!(wf.document, WorkingDocument::default());
        assert!(wf.file.is_none());
        assert_eq!(wf.settings, RedactionSettings::default());
        assert!(!wf.downloads_enabled);
        assert_eq!(wf.phase, RunState::Idle);
        assert_eq!(wf.notice.as_deref(), Some(RESET_NOTICE));
    }

    #[test]
    fn test_download_gated_on_successful_output() {
        let mut wf = Workflow::new();
        assert!(wf.download_source(ArtifactFormat::Text).is_err());

        let (run, _) = expect_redact(wf.handle(Event::RunRequested));
        wf.handle(Event::RedactionFinished {
            run,
            result: Ok(outcome("[EMAIL_1]", &["EMAILS"])),
        });
        assert_eq!(wf.download_source(ArtifactFormat::Pdf).unwrap(), "[EMAIL_1]");

        wf.record_download(
            ArtifactFormat::Pdf,
            &Err(Error::Download {
                format: ArtifactFormat::Pdf,
                message: "HTTP 500".to_string(),
            }),
        );
        assert_eq!(wf.notice.as_deref(), Some("PDF download failed: HTTP 500"));
        assert_eq!(wf.phase, RunState::Succeeded);
        assert!(wf.downloads_enabled);
    }

    #[test]
    fn test_all_disabled_settings_still_sent() {
        let mut wf = Workflow::new();
        for category in PiiCategory::ALL {
            wf.handle(Event::CategoryToggled(category));
        }
        let (_, request) = expect_redact(wf.handle(Event::RunRequested));
        assert_eq!(request.settings, RedactionSettings::none());
    }
}
