use super::domain::{DocumentId, DocumentRecord};
use super::workflow::{WorkflowId, WorkflowRecord};

/// Storage abstraction for uploaded documents.
///
/// `modify` runs the closure while the record is exclusively held, so a read-check-write
/// inside it is a critical section.
pub trait DocumentRepository: Send + Sync {
    fn insert(&self, record: DocumentRecord) -> Result<DocumentRecord, RepositoryError>;
    fn fetch(&self, id: &DocumentId) -> Result<Option<DocumentRecord>, RepositoryError>;
    fn all(&self) -> Result<Vec<DocumentRecord>, RepositoryError>;
    fn modify(
        &self,
        id: &DocumentId,
        apply: &mut dyn FnMut(&mut DocumentRecord),
    ) -> Result<Option<DocumentRecord>, RepositoryError>;
}

/// Storage abstraction for approval workflows, with the same `modify` contract.
pub trait WorkflowRepository: Send + Sync {
    fn insert(&self, record: WorkflowRecord) -> Result<WorkflowRecord, RepositoryError>;
    fn fetch(&self, id: &WorkflowId) -> Result<Option<WorkflowRecord>, RepositoryError>;
    fn modify(
        &self,
        id: &WorkflowId,
        apply: &mut dyn FnMut(&mut WorkflowRecord),
    ) -> Result<Option<WorkflowRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
