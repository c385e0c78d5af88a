use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::DocumentId;
use super::workflow::WorkflowId;

/// Number of entries returned by an audit query without an explicit limit.
pub const DEFAULT_AUDIT_LIMIT: usize = 50;

/// Stable action tags recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    DocumentUpload,
    FormsMatched,
    WorkflowStart,
    WorkflowDecision,
}

impl AuditAction {
    pub const fn label(self) -> &'static str {
        match self {
            AuditAction::DocumentUpload => "DOCUMENT_UPLOAD",
            AuditAction::FormsMatched => "FORMS_MATCHED",
            AuditAction::WorkflowStart => "WORKFLOW_START",
            AuditAction::WorkflowDecision => "WORKFLOW_DECISION",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Audit payload emitted by the registry and tracker before it is sequenced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    pub timestamp: DateTime<Utc>,
    pub action: AuditAction,
    pub user_id: String,
    pub details: String,
    pub document_id: Option<DocumentId>,
    pub workflow_id: Option<WorkflowId>,
}

impl AuditEvent {
    pub fn new(
        timestamp: DateTime<Utc>,
        action: AuditAction,
        user_id: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            action,
            user_id: user_id.into(),
            details: details.into(),
            document_id: None,
            workflow_id: None,
        }
    }

    pub fn document(mut self, document_id: &DocumentId) -> Self {
        self.document_id = Some(document_id.clone());
        self
    }

    pub fn workflow(mut self, workflow_id: &WorkflowId) -> Self {
        self.workflow_id = Some(workflow_id.clone());
        self
    }
}

/// Immutable, sequenced audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Insertion order; breaks ties between equal timestamps.
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub action: AuditAction,
    pub user_id: String,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<DocumentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<WorkflowId>,
}

impl AuditEntry {
    pub fn from_event(sequence: u64, event: AuditEvent) -> Self {
        Self {
            sequence,
            timestamp: event.timestamp,
            action: event.action,
            user_id: event.user_id,
            details: event.details,
            document_id: event.document_id,
            workflow_id: event.workflow_id,
        }
    }
}

/// Conjunctive filter over the audit trail. Absent fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    pub action: Option<AuditAction>,
    pub user_id: Option<String>,
    pub limit: Option<usize>,
}

impl AuditQuery {
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        self.action.map_or(true, |action| entry.action == action)
            && self
                .user_id
                .as_deref()
                .map_or(true, |user_id| entry.user_id == user_id)
    }

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_AUDIT_LIMIT)
    }

    /// Filter, order newest first, and truncate a snapshot of entries.
    pub fn apply<'a, I>(&self, entries: I) -> Vec<AuditEntry>
    where
        I: IntoIterator<Item = &'a AuditEntry>,
    {
        let mut selected: Vec<AuditEntry> = entries
            .into_iter()
            .filter(|entry| self.matches(entry))
            .cloned()
            .collect();
        selected.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.sequence.cmp(&a.sequence))
        });
        selected.truncate(self.limit());
        selected
    }
}

/// Append-only audit store shared by the registry and the approval tracker.
pub trait AuditLog: Send + Sync {
    fn append(&self, event: AuditEvent) -> Result<AuditEntry, AuditError>;
    fn query(&self, query: &AuditQuery) -> Result<Vec<AuditEntry>, AuditError>;
}

/// Audit store failure.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit log unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn entry(sequence: u64, minute: i64, action: AuditAction, user: &str) -> AuditEntry {
        let base = Utc
            .with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
            .single()
            .expect("valid time");
        AuditEntry::from_event(
            sequence,
            AuditEvent::new(base + Duration::minutes(minute), action, user, "details"),
        )
    }

    #[test]
    fn default_query_matches_everything() {
        let query = AuditQuery::default();
        assert!(query.matches(&entry(1, 0, AuditAction::WorkflowStart, "maker")));
        assert_eq!(query.limit(), DEFAULT_AUDIT_LIMIT);
    }

    #[test]
    fn filters_are_conjunctive() {
        let entries = vec![
            entry(1, 0, AuditAction::DocumentUpload, "alice"),
            entry(2, 1, AuditAction::DocumentUpload, "bob"),
            entry(3, 2, AuditAction::WorkflowStart, "alice"),
        ];
        let query = AuditQuery {
            action: Some(AuditAction::DocumentUpload),
            user_id: Some("alice".to_string()),
            limit: None,
        };
        let selected = query.apply(&entries);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].sequence, 1);
    }

    #[test]
    fn equal_timestamps_fall_back_to_insertion_order() {
        let entries = vec![
            entry(1, 5, AuditAction::DocumentUpload, "alice"),
            entry(2, 5, AuditAction::WorkflowStart, "alice"),
            entry(3, 5, AuditAction::WorkflowDecision, "checker"),
        ];
        let query = AuditQuery {
            limit: Some(2),
            ..AuditQuery::default()
        };
        let sequences: Vec<u64> = query.apply(&entries).iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![3, 2]);
    }

    #[test]
    fn actions_serialize_as_screaming_snake_case() {
        let value = serde_json::to_value(AuditAction::WorkflowDecision).expect("serializes");
        assert_eq!(value, serde_json::json!("WORKFLOW_DECISION"));
        assert_eq!(AuditAction::DocumentUpload.to_string(), "DOCUMENT_UPLOAD");
    }
}
