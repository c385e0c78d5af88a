use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::approval::WorkflowRequest;
use super::audit::{AuditLog, AuditQuery};
use super::domain::{DocumentId, DocumentSubmission, FileMetadata};
use super::repository::{DocumentRepository, WorkflowRepository};
use super::service::{IntakeError, IntakeService};
use super::workflow::WorkflowId;

type SharedService<D, W, L> = Arc<IntakeService<D, W, L>>;

/// Router builder exposing the document, workflow, and audit endpoints.
pub fn intake_router<D, W, L>(service: SharedService<D, W, L>) -> Router
where
    D: DocumentRepository + 'static,
    W: WorkflowRepository + 'static,
    L: AuditLog + 'static,
{
    Router::new()
        .route(
            "/api/v1/documents",
            post(upload_handler::<D, W, L>).get(list_handler::<D, W, L>),
        )
        .route(
            "/api/v1/documents/:document_id/status",
            get(status_handler::<D, W, L>),
        )
        .route("/api/v1/workflows", post(start_handler::<D, W, L>))
        .route(
            "/api/v1/workflows/:workflow_id",
            get(workflow_handler::<D, W, L>),
        )
        .route(
            "/api/v1/workflows/:workflow_id/decision",
            post(decision_handler::<D, W, L>),
        )
        .route("/api/v1/audit", get(audit_handler::<D, W, L>))
        .with_state(service)
}

/// JSON body for opening a maker-checker review.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartWorkflowBody {
    pub document_id: String,
    #[serde(default)]
    pub checker_email: Option<String>,
    #[serde(default)]
    pub maker_id: Option<String>,
}

/// JSON body for a checker decision. The verdict is validated by the tracker.
#[derive(Debug, Deserialize)]
pub struct DecisionBody {
    pub decision: String,
    #[serde(default)]
    pub comments: Option<String>,
}

pub(crate) fn error_response(error: IntakeError) -> Response {
    let status = error.status_code();
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(%error, "intake operation failed");
    }
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

/// Collect the multipart form into a submission. Only the `file` part is required.
async fn read_submission(mut multipart: Multipart) -> Result<DocumentSubmission, Response> {
    let mut submission = DocumentSubmission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| bad_request(format!("malformed multipart body: {error}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" | "document" => {
                let original_name = field.file_name().unwrap_or("upload.bin").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|error| bad_request(format!("failed to read file: {error}")))?;
                submission.file = Some(FileMetadata::new(
                    original_name,
                    bytes.len() as u64,
                    content_type.as_deref(),
                ));
            }
            "loanAmount" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|error| bad_request(format!("failed to read loanAmount: {error}")))?;
                let amount = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| bad_request(format!("loanAmount must be a whole number, got '{raw}'")))?;
                submission.loan_amount = Some(amount);
            }
            "uploadedBy" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|error| bad_request(format!("failed to read uploadedBy: {error}")))?;
                if !raw.trim().is_empty() {
                    submission.uploaded_by = Some(raw.trim().to_string());
                }
            }
            _ => {}
        }
    }

    Ok(submission)
}

pub(crate) async fn upload_handler<D, W, L>(
    State(service): State<SharedService<D, W, L>>,
    multipart: Multipart,
) -> Response
where
    D: DocumentRepository + 'static,
    W: WorkflowRepository + 'static,
    L: AuditLog + 'static,
{
    let submission = match read_submission(multipart).await {
        Ok(submission) => submission,
        Err(response) => return response,
    };

    match service.submit_document(submission) {
        Ok(record) => (StatusCode::CREATED, Json(record.status_view(0))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<D, W, L>(
    State(service): State<SharedService<D, W, L>>,
) -> Response
where
    D: DocumentRepository + 'static,
    W: WorkflowRepository + 'static,
    L: AuditLog + 'static,
{
    match service.list_documents() {
        Ok(documents) => (StatusCode::OK, Json(documents)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<D, W, L>(
    State(service): State<SharedService<D, W, L>>,
    Path(document_id): Path<String>,
) -> Response
where
    D: DocumentRepository + 'static,
    W: WorkflowRepository + 'static,
    L: AuditLog + 'static,
{
    match service.document_status(&DocumentId(document_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn start_handler<D, W, L>(
    State(service): State<SharedService<D, W, L>>,
    Json(body): Json<StartWorkflowBody>,
) -> Response
where
    D: DocumentRepository + 'static,
    W: WorkflowRepository + 'static,
    L: AuditLog + 'static,
{
    let request = WorkflowRequest {
        document_id: DocumentId(body.document_id),
        checker_email: body.checker_email,
        maker_id: body.maker_id,
    };

    match service.start_workflow(request) {
        Ok(workflow) => (StatusCode::CREATED, Json(workflow)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn workflow_handler<D, W, L>(
    State(service): State<SharedService<D, W, L>>,
    Path(workflow_id): Path<String>,
) -> Response
where
    D: DocumentRepository + 'static,
    W: WorkflowRepository + 'static,
    L: AuditLog + 'static,
{
    match service.workflow(&WorkflowId(workflow_id)) {
        Ok(workflow) => (StatusCode::OK, Json(workflow)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn decision_handler<D, W, L>(
    State(service): State<SharedService<D, W, L>>,
    Path(workflow_id): Path<String>,
    Json(body): Json<DecisionBody>,
) -> Response
where
    D: DocumentRepository + 'static,
    W: WorkflowRepository + 'static,
    L: AuditLog + 'static,
{
    match service.decide_workflow(&WorkflowId(workflow_id), &body.decision, body.comments) {
        Ok(workflow) => (StatusCode::OK, Json(workflow)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn audit_handler<D, W, L>(
    State(service): State<SharedService<D, W, L>>,
    Query(query): Query<AuditQuery>,
) -> Response
where
    D: DocumentRepository + 'static,
    W: WorkflowRepository + 'static,
    L: AuditLog + 'static,
{
    match service.query_audit(&query) {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(error) => error_response(error),
    }
}
