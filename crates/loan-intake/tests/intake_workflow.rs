//! End-to-end scenarios for document intake and maker-checker approval, driven through the
//! public service facade with a manual clock.

mod common {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use loan_intake::config::IntakeConfig;
    use loan_intake::intake::{
        DocumentSubmission, FileMetadata, InMemoryAuditLog, InMemoryDocumentRepository,
        InMemoryWorkflowRepository, IntakeService, ManualClock,
    };

    pub(super) type Service =
        IntakeService<InMemoryDocumentRepository, InMemoryWorkflowRepository, InMemoryAuditLog>;

    pub(super) fn service() -> (Arc<Service>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 9, 16, 8, 0, 0)
                .single()
                .expect("valid timestamp"),
        ));
        let service = IntakeService::with_clock(
            Arc::new(InMemoryDocumentRepository::default()),
            Arc::new(InMemoryWorkflowRepository::default()),
            Arc::new(InMemoryAuditLog::default()),
            IntakeConfig::default(),
            clock.clone(),
        );
        (Arc::new(service), clock)
    }

    pub(super) fn upload(loan_amount: Option<u64>) -> DocumentSubmission {
        DocumentSubmission {
            file: Some(FileMetadata::new("cam-q3.pdf", 182_044, None)),
            loan_amount,
            uploaded_by: Some("relationship.manager@bank.test".to_string()),
        }
    }
}

use chrono::Duration;
use common::{service, upload};
use loan_intake::intake::{
    AuditAction, AuditQuery, DocumentStatus, IntakeError, StepName, StepStatus, WorkflowRequest,
    WorkflowStatus,
};

#[test]
fn rejected_cam_document_end_to_end() {
    let (service, clock) = service();

    let document = service.submit_document(upload(None)).expect("upload accepted");
    assert_eq!(document.content_type, "application/pdf");
    assert_eq!(
        service.document_status(&document.id).expect("status").status,
        DocumentStatus::Processing
    );

    clock.advance(Duration::minutes(5));
    let status = service.document_status(&document.id).expect("status");
    assert_eq!(status.status, DocumentStatus::Completed);
    let forms: Vec<&str> = status
        .document
        .matched_forms
        .iter()
        .map(|form| form.form_name.as_str())
        .collect();
    assert_eq!(forms, vec!["Standard Commercial Loan Agreement"]);

    let workflow = service
        .start_workflow(WorkflowRequest::for_document(document.id.clone()))
        .expect("workflow started");
    let decided = service
        .decide_workflow(
            &workflow.id,
            "reject",
            Some("insufficient collateral".to_string()),
        )
        .expect("decision recorded");

    assert_eq!(decided.status, WorkflowStatus::Rejected);
    assert_eq!(
        decided.step(StepName::CheckerReview).status,
        StepStatus::Completed
    );

    let trail = service
        .query_audit(&AuditQuery::default())
        .expect("audit query");
    let actions: Vec<AuditAction> = trail.iter().map(|entry| entry.action).collect();
    assert_eq!(
        actions,
        vec![
            AuditAction::WorkflowDecision,
            AuditAction::WorkflowStart,
            AuditAction::FormsMatched,
            AuditAction::DocumentUpload,
        ]
    );
    assert!(trail
        .iter()
        .all(|entry| entry.document_id.as_ref() == Some(&document.id)));
    assert_eq!(trail[0].workflow_id.as_ref(), Some(&workflow.id));
}

#[test]
fn small_business_loan_completes_with_single_form() {
    let (service, clock) = service();
    let document = service
        .submit_document(upload(Some(1_000_000)))
        .expect("upload accepted");

    clock.advance(Duration::minutes(10));
    let status = service.document_status(&document.id).expect("status");
    assert_eq!(status.document.matched_forms.len(), 1);
    assert_eq!(status.document.matched_forms[0].form_id, "SBL-001");
}

#[test]
fn concurrent_pollers_match_forms_once() {
    let (service, clock) = service();
    let document = service
        .submit_document(upload(Some(40_000_000)))
        .expect("upload accepted");
    clock.advance(Duration::minutes(6));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            let id = document.id.clone();
            std::thread::spawn(move || service.document_status(&id).expect("status"))
        })
        .collect();
    let views: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("poller completes"))
        .collect();

    for view in &views {
        assert_eq!(view.document.matched_forms, views[0].document.matched_forms);
        assert_eq!(view.document.completed_at, views[0].document.completed_at);
        assert_eq!(view.document.matched_forms.len(), 2);
    }

    let matched = service
        .query_audit(&AuditQuery {
            action: Some(AuditAction::FormsMatched),
            ..AuditQuery::default()
        })
        .expect("audit query");
    assert_eq!(matched.len(), 1);
}

#[test]
fn workflow_requires_existing_document() {
    let (service, _clock) = service();
    let result = service.start_workflow(WorkflowRequest::for_document(
        loan_intake::intake::DocumentId("doc-unknown".to_string()),
    ));

    assert!(matches!(result, Err(IntakeError::NotFound { .. })));
    assert!(service
        .query_audit(&AuditQuery::default())
        .expect("audit query")
        .is_empty());
}
