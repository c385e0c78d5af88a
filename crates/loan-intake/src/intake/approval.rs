use std::sync::Arc;

use tracing::{info, warn};

use super::audit::{AuditAction, AuditEvent, AuditLog};
use super::domain::DocumentId;
use super::progress::Clock;
use super::repository::{DocumentRepository, WorkflowRepository};
use super::service::{EntityKind, IntakeError};
use super::workflow::{Decision, WorkflowId, WorkflowRecord, WorkflowStatus};

/// Parameters for opening a maker-checker review on a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRequest {
    pub document_id: DocumentId,
    pub checker_email: Option<String>,
    pub maker_id: Option<String>,
}

impl WorkflowRequest {
    pub fn for_document(document_id: DocumentId) -> Self {
        Self {
            document_id,
            checker_email: None,
            maker_id: None,
        }
    }
}

/// Owns workflow records and drives them from `pending_review` to a terminal decision.
pub struct ApprovalTracker<D, W, L> {
    documents: Arc<D>,
    workflows: Arc<W>,
    audit: Arc<L>,
    clock: Arc<dyn Clock>,
    default_checker_email: String,
}

impl<D, W, L> ApprovalTracker<D, W, L>
where
    D: DocumentRepository + 'static,
    W: WorkflowRepository + 'static,
    L: AuditLog + 'static,
{
    pub fn new(
        documents: Arc<D>,
        workflows: Arc<W>,
        audit: Arc<L>,
        clock: Arc<dyn Clock>,
        default_checker_email: impl Into<String>,
    ) -> Self {
        Self {
            documents,
            workflows,
            audit,
            clock,
            default_checker_email: default_checker_email.into(),
        }
    }

    /// Open a workflow for an existing document. Unknown documents leave no trace.
    pub fn start(&self, request: WorkflowRequest) -> Result<WorkflowRecord, IntakeError> {
        let WorkflowRequest {
            document_id,
            checker_email,
            maker_id,
        } = request;

        let document = self
            .documents
            .fetch(&document_id)?
            .ok_or_else(|| IntakeError::not_found(EntityKind::Document, &document_id))?;

        let checker_email = checker_email
            .filter(|email| !email.trim().is_empty())
            .unwrap_or_else(|| self.default_checker_email.clone());
        let maker_id = maker_id.unwrap_or(document.uploaded_by);

        let record = WorkflowRecord::new(document_id, maker_id, checker_email, self.clock.now());
        let stored = self.workflows.insert(record)?;

        self.audit.append(
            AuditEvent::new(
                stored.created_at,
                AuditAction::WorkflowStart,
                stored.maker_id.as_str(),
                format!("Submitted for review by {}", stored.checker_email),
            )
            .document(&stored.document_id)
            .workflow(&stored.id),
        )?;

        info!(
            workflow_id = %stored.id,
            document_id = %stored.document_id,
            checker = %stored.checker_email,
            "approval workflow started"
        );
        Ok(stored)
    }

    /// Apply the checker's decision. Status and review step change in one critical section.
    pub fn decide(
        &self,
        id: &WorkflowId,
        decision: &str,
        comments: Option<String>,
    ) -> Result<WorkflowRecord, IntakeError> {
        let decision = Decision::parse(decision)
            .ok_or_else(|| IntakeError::InvalidDecision(decision.to_string()))?;
        let comments = comments.filter(|text| !text.trim().is_empty());
        let decided_at = self.clock.now();

        let mut refused: Option<WorkflowStatus> = None;
        let record = self
            .workflows
            .modify(id, &mut |workflow| {
                if let Err(status) = workflow.record_decision(decision, comments.clone(), decided_at)
                {
                    refused = Some(status);
                }
            })?
            .ok_or_else(|| IntakeError::not_found(EntityKind::Workflow, id))?;

        if let Some(status) = refused {
            warn!(workflow_id = %id, %status, "decision refused on terminal workflow");
            return Err(IntakeError::InvalidState {
                workflow_id: id.clone(),
                status,
            });
        }

        self.audit.append(
            AuditEvent::new(
                decided_at,
                AuditAction::WorkflowDecision,
                record.checker_email.as_str(),
                format!(
                    "Decision: {}. Comments: {}",
                    decision.label(),
                    record.comments.as_deref().unwrap_or("No comments")
                ),
            )
            .document(&record.document_id)
            .workflow(&record.id),
        )?;

        info!(
            workflow_id = %record.id,
            status = %record.status,
            "approval workflow decided"
        );
        Ok(record)
    }

    pub fn get(&self, id: &WorkflowId) -> Result<WorkflowRecord, IntakeError> {
        self.workflows
            .fetch(id)?
            .ok_or_else(|| IntakeError::not_found(EntityKind::Workflow, id))
    }
}
