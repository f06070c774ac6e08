//! Artifact download: export, then save under the format's fixed filename

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use redact_core::{ArtifactFormat, Error, ExportRequest, Result};
use tracing::info;

use crate::service::RedactionService;

/// Destination for rendered artifacts
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Save the whole artifact, returning where it ended up
    async fn save(&self, format: ArtifactFormat, bytes: Vec<u8>) -> Result<PathBuf>;
}

/// Saves artifacts into a directory.
///
/// Bytes are staged in a temporary file next to the target and renamed into
/// place, so a failed save never leaves a partial `redacted.*` behind. The
/// staging file is removed on every exit path when it drops.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ArtifactSink for DirectorySink {
    async fn save(&self, format: ArtifactFormat, bytes: Vec<u8>) -> Result<PathBuf> {
        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || write_artifact(&dir, format, &bytes))
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))?
    }
}

fn write_artifact(dir: &Path, format: ArtifactFormat, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let target = dir.join(format.file_name());

    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.flush()?;
    staged.persist(&target).map_err(|e| Error::Io(e.error))?;

    Ok(target)
}

/// Export `redacted` in `format` and hand the bytes to `sink`.
///
/// Nothing is saved unless the export succeeded.
pub async fn download(
    service: &dyn RedactionService,
    sink: &dyn ArtifactSink,
    format: ArtifactFormat,
    redacted: &str,
) -> Result<PathBuf> {
    let bytes = service.export(format, &ExportRequest::new(redacted)).await?;
    let len = bytes.len();
    let path = sink.save(format, bytes).await?;
    info!(%format, bytes = len, path = %path.display(), "saved artifact");
    Ok(path)
}
