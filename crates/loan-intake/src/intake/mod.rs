//! Document intake, legal form matching, and maker-checker approval.
//!
//! Uploaded CAM documents are registered with a fixed set of "extracted" loan fields and a
//! processing status that is simulated from elapsed time. Once a document is observed as
//! completed its loan amount is matched against the form catalog. A two-step approval
//! workflow can then be opened and decided, and every step lands in a shared audit log.

pub mod approval;
pub mod audit;
pub mod domain;
pub mod forms;
pub mod memory;
pub mod progress;
pub mod registry;
pub mod repository;
pub mod router;
pub mod service;
pub mod workflow;

#[cfg(test)]
mod tests;

pub use approval::{ApprovalTracker, WorkflowRequest};
pub use audit::{
    AuditAction, AuditEntry, AuditError, AuditEvent, AuditLog, AuditQuery, DEFAULT_AUDIT_LIMIT,
};
pub use domain::{
    DocumentId, DocumentRecord, DocumentStatus, DocumentStatusView, DocumentSubmission,
    DocumentSummary, ExtractedFields, FileMetadata,
};
pub use forms::{match_forms, FormReference};
pub use memory::{InMemoryAuditLog, InMemoryDocumentRepository, InMemoryWorkflowRepository};
pub use progress::{Clock, ElapsedTimeEstimator, ManualClock, ProgressEstimator, SystemClock};
pub use registry::DocumentRegistry;
pub use repository::{DocumentRepository, RepositoryError, WorkflowRepository};
pub use router::intake_router;
pub use service::{EntityKind, IntakeError, IntakeService};
pub use workflow::{
    Decision, StepName, StepStatus, WorkflowId, WorkflowRecord, WorkflowStatus, WorkflowStep,
};
