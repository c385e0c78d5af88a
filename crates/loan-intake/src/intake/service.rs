use std::fmt;
use std::sync::Arc;

use axum::http::StatusCode;

use super::approval::{ApprovalTracker, WorkflowRequest};
use super::audit::{AuditEntry, AuditError, AuditLog, AuditQuery};
use super::domain::{
    DocumentId, DocumentRecord, DocumentStatusView, DocumentSubmission, DocumentSummary,
};
use super::progress::{Clock, ElapsedTimeEstimator, SystemClock};
use super::repository::{DocumentRepository, RepositoryError, WorkflowRepository};
use super::registry::DocumentRegistry;
use super::workflow::{WorkflowId, WorkflowRecord, WorkflowStatus};
use crate::config::IntakeConfig;

/// Facade composing the document registry, approval tracker, and shared audit log.
pub struct IntakeService<D, W, L> {
    registry: DocumentRegistry<D, L>,
    tracker: ApprovalTracker<D, W, L>,
    audit: Arc<L>,
}

impl<D, W, L> IntakeService<D, W, L>
where
    D: DocumentRepository + 'static,
    W: WorkflowRepository + 'static,
    L: AuditLog + 'static,
{
    pub fn new(documents: Arc<D>, workflows: Arc<W>, audit: Arc<L>, config: IntakeConfig) -> Self {
        Self::with_clock(documents, workflows, audit, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        documents: Arc<D>,
        workflows: Arc<W>,
        audit: Arc<L>,
        config: IntakeConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let estimator = Arc::new(ElapsedTimeEstimator::new(config.progress_percent_per_minute));
        let registry =
            DocumentRegistry::new(documents.clone(), audit.clone(), estimator, clock.clone());
        let tracker = ApprovalTracker::new(
            documents,
            workflows,
            audit.clone(),
            clock,
            config.default_checker_email,
        );

        Self {
            registry,
            tracker,
            audit,
        }
    }

    pub fn submit_document(
        &self,
        submission: DocumentSubmission,
    ) -> Result<DocumentRecord, IntakeError> {
        self.registry.submit(submission)
    }

    pub fn document_status(&self, id: &DocumentId) -> Result<DocumentStatusView, IntakeError> {
        self.registry.status(id)
    }

    pub fn list_documents(&self) -> Result<Vec<DocumentSummary>, IntakeError> {
        self.registry.list()
    }

    pub fn start_workflow(&self, request: WorkflowRequest) -> Result<WorkflowRecord, IntakeError> {
        self.tracker.start(request)
    }

    pub fn decide_workflow(
        &self,
        id: &WorkflowId,
        decision: &str,
        comments: Option<String>,
    ) -> Result<WorkflowRecord, IntakeError> {
        self.tracker.decide(id, decision, comments)
    }

    pub fn workflow(&self, id: &WorkflowId) -> Result<WorkflowRecord, IntakeError> {
        self.tracker.get(id)
    }

    /// Audit entries matching every supplied filter, newest first.
    pub fn query_audit(&self, query: &AuditQuery) -> Result<Vec<AuditEntry>, IntakeError> {
        Ok(self.audit.query(query)?)
    }
}

/// Kind of record a lookup failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Document,
    Workflow,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Document => f.write_str("document"),
            EntityKind::Workflow => f.write_str("workflow"),
        }
    }
}

/// Error raised by intake operations.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("no file was provided")]
    MissingFile,
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },
    #[error("invalid decision '{0}': expected 'approve' or 'reject'")]
    InvalidDecision(String),
    #[error("workflow {workflow_id} is already {status}")]
    InvalidState {
        workflow_id: WorkflowId,
        status: WorkflowStatus,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Audit(#[from] AuditError),
}

impl IntakeError {
    pub(crate) fn not_found(kind: EntityKind, id: &impl fmt::Display) -> Self {
        IntakeError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            IntakeError::MissingFile | IntakeError::InvalidDecision(_) => StatusCode::BAD_REQUEST,
            IntakeError::NotFound { .. } => StatusCode::NOT_FOUND,
            IntakeError::InvalidState { .. } => StatusCode::CONFLICT,
            IntakeError::Repository(_) | IntakeError::Audit(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
