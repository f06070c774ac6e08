use std::fmt;

use serde::{Deserialize, Serialize};

/// Downloadable rendering of the redacted document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactFormat {
    Text,
    Pdf,
}

impl ArtifactFormat {
    /// Fixed filename the artifact is saved under
    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactFormat::Text => "redacted.txt",
            ArtifactFormat::Pdf => "redacted.pdf",
        }
    }

    /// Sent as `Accept` on export calls
    pub fn mime_type(&self) -> &'static str {
        match self {
            ArtifactFormat::Text => "text/plain",
            ArtifactFormat::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactFormat::Text => f.write_str("text"),
            ArtifactFormat::Pdf => f.write_str("PDF"),
        }
    }
}

/// Body sent to both export services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub redacted: String,
}

impl ExportRequest {
    pub fn new(redacted: impl Into<String>) -> Self {
        Self {
            redacted: redacted.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_file_names() {
        assert_eq!(ArtifactFormat::Text.file_name(), "redacted.txt");
        assert_eq!(ArtifactFormat::Pdf.file_name(), "redacted.pdf");
        assert_eq!(ArtifactFormat::Pdf.mime_type(), "application/pdf");
    }

    #[test]
    fn test_export_request_shape() {
        let body = serde_json::to_value(ExportRequest::new("[EMAIL_1]")).unwrap();
        assert_eq!(body, serde_json::json!({ "redacted": "[EMAIL_1]" }));
    }
}
