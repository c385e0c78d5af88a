use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::DocumentId;

/// Identifier wrapper for maker-checker workflows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowId(pub String);

impl WorkflowId {
    pub(crate) fn generate() -> Self {
        Self(format!("wf-{}", uuid::Uuid::new_v4()))
    }
}

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Workflow lifecycle. `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    PendingReview,
    Approved,
    Rejected,
}

impl WorkflowStatus {
    pub const fn label(self) -> &'static str {
        match self {
            WorkflowStatus::PendingReview => "pending_review",
            WorkflowStatus::Approved => "approved",
            WorkflowStatus::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, WorkflowStatus::PendingReview)
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Checker verdict on a submitted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// Parse a client-supplied verdict; only `approve` and `reject` are accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "approve" => Some(Decision::Approve),
            "reject" => Some(Decision::Reject),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Reject => "reject",
        }
    }

    pub const fn outcome(self) -> WorkflowStatus {
        match self {
            Decision::Approve => WorkflowStatus::Approved,
            Decision::Reject => WorkflowStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepName {
    MakerSubmission,
    CheckerReview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub name: StepName,
    pub status: StepStatus,
    pub assignee: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// Two-step maker-checker approval attached to a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRecord {
    pub id: WorkflowId,
    pub document_id: DocumentId,
    pub maker_id: String,
    pub checker_email: String,
    pub status: WorkflowStatus,
    pub steps: [WorkflowStep; 2],
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
}

impl WorkflowRecord {
    const CHECKER_REVIEW: usize = 1;

    pub(crate) fn new(
        document_id: DocumentId,
        maker_id: String,
        checker_email: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        let submission = WorkflowStep {
            name: StepName::MakerSubmission,
            status: StepStatus::Completed,
            assignee: maker_id.clone(),
            completed_at: Some(created_at),
            decision: None,
            comments: None,
        };
        let review = WorkflowStep {
            name: StepName::CheckerReview,
            status: StepStatus::Pending,
            assignee: checker_email.clone(),
            completed_at: None,
            decision: None,
            comments: None,
        };

        Self {
            id: WorkflowId::generate(),
            document_id,
            maker_id,
            checker_email,
            status: WorkflowStatus::PendingReview,
            steps: [submission, review],
            created_at,
            decision: None,
            comments: None,
            decided_at: None,
        }
    }

    pub fn step(&self, name: StepName) -> &WorkflowStep {
        match name {
            StepName::MakerSubmission => &self.steps[0],
            StepName::CheckerReview => &self.steps[Self::CHECKER_REVIEW],
        }
    }

    /// Record the checker's verdict on the workflow and its review step together.
    ///
    /// Returns the current status without touching the record when it is already terminal.
    pub(crate) fn record_decision(
        &mut self,
        decision: Decision,
        comments: Option<String>,
        decided_at: DateTime<Utc>,
    ) -> Result<(), WorkflowStatus> {
        if self.status.is_terminal() {
            return Err(self.status);
        }

        let review = &mut self.steps[Self::CHECKER_REVIEW];
        review.status = StepStatus::Completed;
        review.completed_at = Some(decided_at);
        review.decision = Some(decision);
        review.comments = comments.clone();

        self.status = decision.outcome();
        self.decision = Some(decision);
        self.comments = comments;
        self.decided_at = Some(decided_at);
        Ok(())
    }
}
