//! Working document and document source resolution

use std::path::Path;

use crate::request::RedactionOutcome;

/// Text state shown to the user for the current session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingDocument {
    /// Pasted text, used only when no file is selected
    pub source_text: String,
    /// Text the latest run resolved (pasted or extracted)
    pub original_text: String,
    pub redacted_text: String,
    pub audit_log: Vec<String>,
}

impl WorkingDocument {
    /// Replace the redacted text and audit log together from one response
    pub fn apply_outcome(&mut self, outcome: RedactionOutcome) {
        self.redacted_text = outcome.redacted;
        self.audit_log = outcome.log;
    }

    /// Audit log as displayed, one entry per line
    pub fn log_text(&self) -> String {
        self.audit_log.join("\n")
    }
}

/// A file chosen for extraction. Sent whole or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

/// Where the text for a run comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Text must be extracted from the file first
    Upload(UploadedFile),
    Pasted(String),
}

impl DocumentSource {
    /// A selected file always wins over the pasted text
    pub fn resolve(file: Option<&UploadedFile>, pasted: &str) -> Self {
        match file {
            Some(file) => DocumentSource::Upload(file.clone()),
            None => DocumentSource::Pasted(pasted.to_string()),
        }
    }
}
