//! Clients for the extraction, redaction and export services

pub mod download;
pub mod http;
pub mod service;

pub use download::{ArtifactSink, DirectorySink, download};
pub use http::{Endpoints, HttpService};
pub use service::RedactionService;
