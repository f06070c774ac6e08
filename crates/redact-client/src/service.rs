//! Redaction service trait

use async_trait::async_trait;
use redact_core::{ArtifactFormat, ExportRequest, RedactionOutcome, RedactionRequest, Result, UploadedFile};

/// The remote collaborators a run talks to.
///
/// Every method is a single request; nothing here retries.
#[async_trait]
pub trait RedactionService: Send + Sync {
    /// Extract plain text from a file, verbatim
    async fn extract(&self, file: &UploadedFile) -> Result<String>;

    /// Redact text according to the request's settings
    async fn redact(&self, request: &RedactionRequest) -> Result<RedactionOutcome>;

    /// Render the redacted text into a downloadable artifact
    async fn export(&self, format: ArtifactFormat, request: &ExportRequest) -> Result<Vec<u8>>;
}
