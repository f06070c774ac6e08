//! Core domain models and logic for redact
//!
//! This crate contains:
//! - Domain models (WorkingDocument, RedactionSettings, UploadedFile)
//! - Wire payloads exchanged with the redaction service
//! - The workflow state machine (pure transition function)

pub mod artifact;
pub mod document;
pub mod error;
pub mod request;
pub mod settings;
pub mod workflow;

pub use artifact::{ArtifactFormat, ExportRequest};
pub use document::{DocumentSource, UploadedFile, WorkingDocument};
pub use error::{Error, Operation, Result};
pub use request::{RedactionOutcome, RedactionRequest};
pub use settings::{PiiCategory, RedactionSettings};
pub use workflow::{Command, Event, RunId, RunState, Workflow};
