use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::config::IntakeConfig;
use crate::intake::domain::{
    DocumentId, DocumentRecord, DocumentSubmission, FileMetadata,
};
use crate::intake::memory::{
    InMemoryAuditLog, InMemoryDocumentRepository, InMemoryWorkflowRepository,
};
use crate::intake::progress::ManualClock;
use crate::intake::repository::{DocumentRepository, RepositoryError};
use crate::intake::{intake_router, IntakeService};

pub(super) type MemoryService =
    IntakeService<InMemoryDocumentRepository, InMemoryWorkflowRepository, InMemoryAuditLog>;

pub(super) struct Harness {
    pub(super) service: Arc<MemoryService>,
    pub(super) clock: Arc<ManualClock>,
    pub(super) documents: Arc<InMemoryDocumentRepository>,
    pub(super) workflows: Arc<InMemoryWorkflowRepository>,
    pub(super) audit: Arc<InMemoryAuditLog>,
}

impl Harness {
    /// Move the clock far enough for any document uploaded so far to complete.
    pub(super) fn finish_processing(&self) {
        self.clock.advance(Duration::minutes(5));
    }

    pub(super) fn router(&self) -> axum::Router {
        intake_router(self.service.clone())
    }
}

pub(super) fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 14, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn harness() -> Harness {
    harness_with_config(IntakeConfig::default())
}

pub(super) fn harness_with_config(config: IntakeConfig) -> Harness {
    let clock = Arc::new(ManualClock::new(start_time()));
    let documents = Arc::new(InMemoryDocumentRepository::default());
    let workflows = Arc::new(InMemoryWorkflowRepository::default());
    let audit = Arc::new(InMemoryAuditLog::default());
    let service = Arc::new(IntakeService::with_clock(
        documents.clone(),
        workflows.clone(),
        audit.clone(),
        config,
        clock.clone(),
    ));

    Harness {
        service,
        clock,
        documents,
        workflows,
        audit,
    }
}

pub(super) fn cam_file() -> FileMetadata {
    FileMetadata::new("northwind-cam.pdf", 48_213, Some("application/pdf"))
}

pub(super) fn submission() -> DocumentSubmission {
    DocumentSubmission {
        file: Some(cam_file()),
        loan_amount: None,
        uploaded_by: Some("maker@bank.test".to_string()),
    }
}

pub(super) fn submission_for(amount: u64) -> DocumentSubmission {
    DocumentSubmission {
        loan_amount: Some(amount),
        ..submission()
    }
}

pub(super) struct UnavailableDocuments;

impl DocumentRepository for UnavailableDocuments {
    fn insert(&self, _record: DocumentRecord) -> Result<DocumentRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &DocumentId) -> Result<Option<DocumentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<DocumentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn modify(
        &self,
        _id: &DocumentId,
        _apply: &mut dyn FnMut(&mut DocumentRecord),
    ) -> Result<Option<DocumentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) const BOUNDARY: &str = "intake-test-boundary";

/// Hand-built multipart body with one part per `(name, filename, value)` entry.
pub(super) fn multipart_body(parts: &[(&str, Option<&str>, &str)]) -> String {
    let mut body = String::new();
    for (name, filename, value) in parts {
        body.push_str(&format!("--{BOUNDARY}\r\n"));
        match filename {
            Some(filename) => {
                body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
                ));
                body.push_str("Content-Type: application/pdf\r\n\r\n");
            }
            None => {
                body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                ));
            }
        }
        body.push_str(value);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

pub(super) fn multipart_request(body: String) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post("/api/v1/documents")
        .header(
            axum::http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(axum::body::Body::from(body))
        .expect("request builds")
}

pub(super) fn json_request(
    method: &str,
    uri: &str,
    payload: Value,
) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(&payload).expect("payload serializes"),
        ))
        .expect("request builds")
}

pub(super) fn get_request(uri: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::get(uri)
        .body(axum::body::Body::empty())
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected status code");
}
