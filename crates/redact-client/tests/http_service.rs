use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode, header::ACCEPT},
    response::{IntoResponse, Response},
    routing::post,
};
use redact_client::{DirectorySink, Endpoints, HttpService, RedactionService, download};
use redact_core::{
    ArtifactFormat, Error, ExportRequest, RedactionRequest, RedactionSettings, UploadedFile,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Stub {
    redact_bodies: Arc<Mutex<Vec<Value>>>,
    uploads: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

async fn extract(State(stub): State<Stub>, mut multipart: Multipart) -> impl IntoResponse {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.unwrap_or_default().to_vec();
        stub.uploads.lock().unwrap().push((name, bytes.clone()));

        if bytes.starts_with(b"%PDF") {
            return (StatusCode::OK, "  Name: Jane Doe\nEmail: jane@example.com\n".to_string());
        }
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to parse PDF: EOF marker not found".to_string(),
        );
    }
    (StatusCode::BAD_REQUEST, "No file part".to_string())
}

async fn redact(State(stub): State<Stub>, Json(body): Json<Value>) -> impl IntoResponse {
    stub.redact_bodies.lock().unwrap().push(body.clone());
    let text = body["text"].as_str().unwrap_or_default();
    if body["settings"]["emails"] == json!(true) {
        Json(json!({
            "redacted": text.replace("a@b.com", "[EMAIL]").replace("555-123-4567", "[PHONE]"),
            "log": ["Redacted 1 email", "Redacted 1 phone number"]
        }))
    } else {
        Json(json!({ "redacted": text, "log": [] }))
    }
}

async fn download_txt(Json(body): Json<ExportRequest>) -> Vec<u8> {
    body.redacted.into_bytes()
}

/// Only renders for clients that asked for a PDF
async fn download_pdf(headers: HeaderMap, Json(body): Json<ExportRequest>) -> Response {
    if headers.get(ACCEPT).and_then(|v| v.to_str().ok()) != Some("application/pdf") {
        return StatusCode::NOT_ACCEPTABLE.into_response();
    }
    let mut pdf = b"%PDF-1.4\n".to_vec();
    pdf.extend_from_slice(body.redacted.as_bytes());
    pdf.into_response()
}

async fn malformed() -> &'static str {
    "<html>not json</html>"
}

async fn failing() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "renderer crashed")
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(5)).await;
    "{}"
}

async fn spawn_stub() -> (String, Stub) {
    let stub = Stub::default();
    let app = Router::new()
        .route("/extract-pdf", post(extract))
        .route("/redact", post(redact))
        .route("/download-txt", post(download_txt))
        .route("/download-pdf", post(download_pdf))
        .route("/malformed", post(malformed))
        .route("/failing", post(failing))
        .route("/slow", post(slow))
        .with_state(stub.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), stub)
}

fn service(base_url: &str) -> HttpService {
    HttpService::new(base_url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_extract_returns_text_verbatim() {
    let (url, stub) = spawn_stub().await;
    let file = UploadedFile::new("form.pdf", b"%PDF-1.7 body".to_vec());

    let text = service(&url).extract(&file).await.unwrap();

    assert_eq!(text, "  Name: Jane Doe\nEmail: jane@example.com\n");
    let uploads = stub.uploads.lock().unwrap();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].0, "form.pdf");
    assert_eq!(uploads[0].1, b"%PDF-1.7 body");
}

#[tokio::test]
async fn test_extract_failure_carries_service_text() {
    let (url, _) = spawn_stub().await;
    let file = UploadedFile::new("notes.txt", b"plain".to_vec());

    let err = service(&url).extract(&file).await.unwrap_err();

    match err {
        Error::Extraction(message) => {
            assert_eq!(message, "Failed to parse PDF: EOF marker not found")
        }
        other => panic!("expected extraction error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_redact_sends_text_and_all_flags() {
    let (url, stub) = spawn_stub().await;
    let request = RedactionRequest::build(
        "Contact me at a@b.com or 555-123-4567",
        &RedactionSettings::default(),
    );

    let outcome = service(&url).redact(&request).await.unwrap();

    assert_eq!(outcome.redacted, "Contact me at [EMAIL] or [PHONE]");
    assert_eq!(outcome.log, vec!["Redacted 1 email", "Redacted 1 phone number"]);

    let bodies = stub.redact_bodies.lock().unwrap();
    assert_eq!(
        bodies[0],
        json!({
            "text": "Contact me at a@b.com or 555-123-4567",
            "settings": { "emails": true, "phones": true, "names": true, "addresses": true }
        })
    );
}

#[tokio::test]
async fn test_redact_with_everything_disabled() {
    let (url, stub) = spawn_stub().await;
    let request = RedactionRequest::build("a@b.com", &RedactionSettings::none());

    let outcome = service(&url).redact(&request).await.unwrap();

    assert_eq!(outcome.redacted, "a@b.com");
    assert!(outcome.log.is_empty());
    let bodies = stub.redact_bodies.lock().unwrap();
    assert_eq!(
        bodies[0]["settings"],
        json!({ "emails": false, "phones": false, "names": false, "addresses": false })
    );
}

#[tokio::test]
async fn test_redact_malformed_response_is_redaction_error() {
    let (url, _) = spawn_stub().await;
    let svc = service(&url).with_endpoints(Endpoints {
        redact: "/malformed".to_string(),
        ..Endpoints::default()
    });

    let err = svc
        .redact(&RedactionRequest::build("x", &RedactionSettings::default()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Redaction(m) if m.starts_with("malformed response")));
}

#[tokio::test]
async fn test_redact_timeout_is_redaction_error() {
    let (url, _) = spawn_stub().await;
    let svc = HttpService::new(&url, Duration::from_millis(200))
        .unwrap()
        .with_endpoints(Endpoints {
            redact: "/slow".to_string(),
            ..Endpoints::default()
        });

    let err = svc
        .redact(&RedactionRequest::build("x", &RedactionSettings::default()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Redaction(m) if m.contains("timed out")));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = service(&format!("http://{}", addr))
        .redact(&RedactionRequest::build("x", &RedactionSettings::default()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport { .. }));
}

#[tokio::test]
async fn test_export_failure_is_download_error() {
    let (url, _) = spawn_stub().await;
    let svc = service(&url).with_endpoints(Endpoints {
        export_pdf: "/failing".to_string(),
        ..Endpoints::default()
    });

    let err = svc
        .export(ArtifactFormat::Pdf, &ExportRequest::new("x"))
        .await
        .unwrap_err();

    match err {
        Error::Download { format, message } => {
            assert_eq!(format, ArtifactFormat::Pdf);
            assert_eq!(message, "HTTP 500: renderer crashed");
        }
        other => panic!("expected download error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_download_saves_both_formats() {
    let (url, _) = spawn_stub().await;
    let dir = tempfile::tempdir().unwrap();
    let svc = service(&url);
    let sink = DirectorySink::new(dir.path());

    let txt = download(&svc, &sink, ArtifactFormat::Text, "[NAME_1] called")
        .await
        .unwrap();
    let pdf = download(&svc, &sink, ArtifactFormat::Pdf, "[NAME_1] called")
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(txt).unwrap(), "[NAME_1] called");
    assert!(std::fs::read(pdf).unwrap().starts_with(b"%PDF-1.4"));
}

#[tokio::test]
async fn test_download_twice_is_idempotent() {
    let (url, _) = spawn_stub().await;
    let dir = tempfile::tempdir().unwrap();
    let svc = service(&url);
    let sink = DirectorySink::new(dir.path());

    let first = download(&svc, &sink, ArtifactFormat::Text, "same").await.unwrap();
    let first_bytes = std::fs::read(&first).unwrap();
    let second = download(&svc, &sink, ArtifactFormat::Text, "same").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(std::fs::read(&second).unwrap(), first_bytes);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_failed_download_saves_nothing() {
    let (url, _) = spawn_stub().await;
    let dir = tempfile::tempdir().unwrap();
    let svc = service(&url).with_endpoints(Endpoints {
        export_text: "/failing".to_string(),
        ..Endpoints::default()
    });
    let sink = DirectorySink::new(dir.path());

    let result = download(&svc, &sink, ArtifactFormat::Text, "x").await;

    assert!(result.is_err());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
