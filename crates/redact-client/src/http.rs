use std::time::Duration;

use async_trait::async_trait;
use redact_config::ServiceConfig;
use redact_core::{
    ArtifactFormat, Error, ExportRequest, Operation, RedactionOutcome, RedactionRequest, Result,
    UploadedFile,
};
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use tracing::debug;

use crate::service::RedactionService;

/// Paths of the four collaborator calls, relative to the base URL
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub extract: String,
    pub redact: String,
    pub export_text: String,
    pub export_pdf: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        let defaults = redact_config::EndpointConfig::default();
        Self {
            extract: defaults.extract,
            redact: defaults.redact,
            export_text: defaults.export_text,
            export_pdf: defaults.export_pdf,
        }
    }
}

/// `RedactionService` backed by the HTTP services
pub struct HttpService {
    client: Client,
    base_url: String,
    endpoints: Endpoints,
    timeout: Duration,
}

impl HttpService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent("redact/0.1 (redaction workflow)")
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            endpoints: Endpoints::default(),
            timeout,
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let endpoints = Endpoints {
            extract: config.endpoints.extract.clone(),
            redact: config.endpoints.redact.clone(),
            export_text: config.endpoints.export_text.clone(),
            export_pdf: config.endpoints.export_pdf.clone(),
        };
        Ok(Self::new(config.base_url.clone(), config.timeout())?.with_endpoints(endpoints))
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn export_path(&self, format: ArtifactFormat) -> &str {
        match format {
            ArtifactFormat::Text => &self.endpoints.export_text,
            ArtifactFormat::Pdf => &self.endpoints.export_pdf,
        }
    }

    /// Timeouts belong to the operation's own failure path; everything else
    /// reqwest reports is a transport failure
    fn request_error(&self, operation: Operation, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::rejected(
                operation,
                format!("request timed out after {}s", self.timeout.as_secs_f32()),
            )
        } else {
            Error::transport(operation, e.to_string())
        }
    }

    /// Turn a non-success response into the operation's error, carrying the
    /// service's own error text when it sent any
    async fn rejection(&self, operation: Operation, response: Response) -> Error {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = match (operation, body.trim().is_empty()) {
            (Operation::Extract, false) => body,
            (_, false) => format!("HTTP {}: {}", status, body.trim()),
            (_, true) => format!("HTTP {}", status),
        };
        Error::rejected(operation, message)
    }
}

#[async_trait]
impl RedactionService for HttpService {
    async fn extract(&self, file: &UploadedFile) -> Result<String> {
        let op = Operation::Extract;
        let part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        let form = Form::new().part("file", part);

        debug!(file = %file.name, bytes = file.bytes.len(), "POST {}", self.endpoints.extract);
        let response = self
            .client
            .post(self.url(&self.endpoints.extract))
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.request_error(op, e))?;

        if !response.status().is_success() {
            return Err(self.rejection(op, response).await);
        }

        response.text().await.map_err(|e| self.request_error(op, e))
    }

    async fn redact(&self, request: &RedactionRequest) -> Result<RedactionOutcome> {
        let op = Operation::Redact;

        debug!(chars = request.text.len(), "POST {}", self.endpoints.redact);
        let response = self
            .client
            .post(self.url(&self.endpoints.redact))
            .json(request)
            .send()
            .await
            .map_err(|e| self.request_error(op, e))?;

        if !response.status().is_success() {
            return Err(self.rejection(op, response).await);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.request_error(op, e))?;

        serde_json::from_slice(&body)
            .map_err(|e| Error::rejected(op, format!("malformed response: {}", e)))
    }

    async fn export(&self, format: ArtifactFormat, request: &ExportRequest) -> Result<Vec<u8>> {
        let op = Operation::Export(format);
        let path = self.export_path(format);

        debug!(%format, "POST {}", path);
        let response = self
            .client
            .post(self.url(path))
            .header(ACCEPT, format.mime_type())
            .json(request)
            .send()
            .await
            .map_err(|e| self.request_error(op, e))?;

        if !response.status().is_success() {
            return Err(self.rejection(op, response).await);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.request_error(op, e))?;
        Ok(body.to_vec())
    }
}
