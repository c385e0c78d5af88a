use crate::infra::InMemoryStores;
use chrono::{Duration, Utc};
use clap::Args;
use loan_intake::config::IntakeConfig;
use loan_intake::error::AppError;
use loan_intake::intake::{
    AuditEntry, AuditQuery, DocumentStatus, DocumentSubmission, FileMetadata, FormReference,
    ManualClock, WorkflowRecord, WorkflowRequest,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Override the mocked loan amount to exercise a different form tier.
    #[arg(long)]
    pub(crate) loan_amount: Option<u64>,
    /// Checker verdict to record: approve or reject.
    #[arg(long, default_value = "reject")]
    pub(crate) decision: String,
    /// Reviewer comments attached to the decision.
    #[arg(long, default_value = "insufficient collateral")]
    pub(crate) comments: String,
    /// Checker assigned to the review (defaults to the configured placeholder).
    #[arg(long)]
    pub(crate) checker: Option<String>,
    /// Name of the simulated upload.
    #[arg(long, default_value = "sample-cam.pdf")]
    pub(crate) file_name: String,
    /// Print the final state as JSON instead of a narrated walkthrough.
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DemoSummary {
    pub(crate) document_id: String,
    pub(crate) loan_amount: u64,
    pub(crate) matched_forms: Vec<FormReference>,
    pub(crate) workflow: WorkflowRecord,
    pub(crate) audit_trail: Vec<AuditEntry>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let json = args.json;
    let summary = execute_demo(args, IntakeConfig::default())?;

    if json {
        let rendered = serde_json::to_string_pretty(&summary).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        render_summary(&summary);
    }
    Ok(())
}

/// Run the upload → processing → approval scenario against in-memory stores.
pub(crate) fn execute_demo(args: DemoArgs, config: IntakeConfig) -> Result<DemoSummary, AppError> {
    let DemoArgs {
        loan_amount,
        decision,
        comments,
        checker,
        file_name,
        json: _,
    } = args;

    let minutes_to_complete = i64::from(100 / config.progress_percent_per_minute.max(1)) + 1;
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let stores = InMemoryStores::default();
    let service = stores.service_with_clock(config, clock.clone());

    let document = service.submit_document(DocumentSubmission {
        file: Some(FileMetadata::new(file_name, 245_760, None)),
        loan_amount,
        uploaded_by: Some("demo-maker".to_string()),
    })?;

    let mut status = service.document_status(&document.id)?;
    for _ in 0..minutes_to_complete {
        if status.status == DocumentStatus::Completed {
            break;
        }
        clock.advance(Duration::minutes(1));
        status = service.document_status(&document.id)?;
    }

    let workflow = service.start_workflow(WorkflowRequest {
        document_id: document.id.clone(),
        checker_email: checker,
        maker_id: None,
    })?;
    clock.advance(Duration::minutes(15));
    let workflow = service.decide_workflow(&workflow.id, &decision, Some(comments))?;
    let audit_trail = service.query_audit(&AuditQuery::default())?;

    Ok(DemoSummary {
        document_id: document.id.0,
        loan_amount: status.document.extracted_fields.loan_amount,
        matched_forms: status.document.matched_forms,
        workflow,
        audit_trail,
    })
}

fn render_summary(summary: &DemoSummary) {
    println!("Loan document intake demo");
    println!(
        "- Document {} processed (loan amount {})",
        summary.document_id, summary.loan_amount
    );
    println!("- Matched forms:");
    for form in &summary.matched_forms {
        println!(
            "    [{}] {} ({}) approvals: {}",
            form.priority,
            form.form_name,
            form.form_id,
            form.required_approvals.join(", ")
        );
    }
    println!(
        "- Workflow {} reviewed by {}: {}",
        summary.workflow.id, summary.workflow.checker_email, summary.workflow.status
    );
    if let Some(comments) = &summary.workflow.comments {
        println!("    comments: {comments}");
    }
    println!("- Audit trail (newest first):");
    for entry in &summary.audit_trail {
        println!(
            "    {} {:<18} {:<32} {}",
            entry.timestamp.format("%H:%M:%S"),
            entry.action.label(),
            entry.user_id,
            entry.details
        );
    }
}
