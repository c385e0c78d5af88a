use std::sync::Arc;

use tracing::info;

use super::audit::{AuditAction, AuditEvent, AuditLog};
use super::domain::{
    DocumentId, DocumentRecord, DocumentStatus, DocumentStatusView, DocumentSubmission,
    DocumentSummary,
};
use super::forms::match_forms;
use super::progress::{Clock, ProgressEstimator};
use super::repository::DocumentRepository;
use super::service::{EntityKind, IntakeError};

/// Owns document records and derives their synthetic processing status.
pub struct DocumentRegistry<D, L> {
    documents: Arc<D>,
    audit: Arc<L>,
    estimator: Arc<dyn ProgressEstimator>,
    clock: Arc<dyn Clock>,
}

impl<D, L> DocumentRegistry<D, L>
where
    D: DocumentRepository + 'static,
    L: AuditLog + 'static,
{
    pub fn new(
        documents: Arc<D>,
        audit: Arc<L>,
        estimator: Arc<dyn ProgressEstimator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            documents,
            audit,
            estimator,
            clock,
        }
    }

    /// Store a newly uploaded document. Processing starts implicitly at upload time.
    pub fn submit(&self, submission: DocumentSubmission) -> Result<DocumentRecord, IntakeError> {
        let DocumentSubmission {
            file,
            loan_amount,
            uploaded_by,
        } = submission;
        let file = file.ok_or(IntakeError::MissingFile)?;
        let uploaded_by =
            uploaded_by.unwrap_or_else(|| DocumentSubmission::DEFAULT_UPLOADER.to_string());

        let record = DocumentRecord::new(file, loan_amount, uploaded_by, self.clock.now());
        let stored = self.documents.insert(record)?;

        self.audit.append(
            AuditEvent::new(
                stored.uploaded_at,
                AuditAction::DocumentUpload,
                stored.uploaded_by.as_str(),
                format!(
                    "Uploaded {} ({} bytes)",
                    stored.original_name, stored.size_bytes
                ),
            )
            .document(&stored.id),
        )?;

        info!(
            document_id = %stored.id,
            filename = %stored.original_name,
            size_bytes = stored.size_bytes,
            "document submitted"
        );
        Ok(stored)
    }

    /// Derive status and progress; the first completed observation attaches matched forms.
    pub fn status(&self, id: &DocumentId) -> Result<DocumentStatusView, IntakeError> {
        let record = self.require(id)?;
        if record.forms_matched() {
            return Ok(record.status_view(100));
        }

        let now = self.clock.now();
        let progress = self.estimator.progress(record.uploaded_at, now);
        if DocumentStatus::from_progress(progress) != DocumentStatus::Completed {
            return Ok(record.status_view(progress));
        }

        let mut matched_here = false;
        let record = self
            .documents
            .modify(id, &mut |document| {
                if document.forms_matched() {
                    return;
                }
                document.matched_forms = match_forms(document.extracted_fields.loan_amount);
                document.completed_at = Some(now);
                matched_here = true;
            })?
            .ok_or_else(|| IntakeError::not_found(EntityKind::Document, id))?;

        if matched_here {
            let form_ids: Vec<&str> = record
                .matched_forms
                .iter()
                .map(|form| form.form_id.as_str())
                .collect();
            self.audit.append(
                AuditEvent::new(
                    now,
                    AuditAction::FormsMatched,
                    "system",
                    format!(
                        "Loan amount {} matched forms: {}",
                        record.extracted_fields.loan_amount,
                        form_ids.join(", ")
                    ),
                )
                .document(&record.id),
            )?;
            info!(document_id = %record.id, forms = form_ids.len(), "document processing completed");
        }

        Ok(record.status_view(progress))
    }

    /// Summaries of every document, oldest upload first.
    pub fn list(&self) -> Result<Vec<DocumentSummary>, IntakeError> {
        let now = self.clock.now();
        let mut records = self.documents.all()?;
        records.sort_by(|a, b| {
            a.uploaded_at
                .cmp(&b.uploaded_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(records
            .iter()
            .map(|record| {
                let status = if record.forms_matched() {
                    DocumentStatus::Completed
                } else {
                    DocumentStatus::from_progress(self.estimator.progress(record.uploaded_at, now))
                };
                record.summary(status)
            })
            .collect())
    }

    fn require(&self, id: &DocumentId) -> Result<DocumentRecord, IntakeError> {
        self.documents
            .fetch(id)?
            .ok_or_else(|| IntakeError::not_found(EntityKind::Document, id))
    }
}
