//! Mutex-guarded in-memory stores used by the HTTP service, the CLI demo, and tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::audit::{AuditEntry, AuditError, AuditEvent, AuditLog, AuditQuery};
use super::domain::{DocumentId, DocumentRecord};
use super::repository::{DocumentRepository, RepositoryError, WorkflowRepository};
use super::workflow::{WorkflowId, WorkflowRecord};

fn lock<'a, T>(mutex: &'a Mutex<T>, name: &str) -> Result<MutexGuard<'a, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable(format!("{name} lock poisoned")))
}

#[derive(Default, Clone)]
pub struct InMemoryDocumentRepository {
    records: Arc<Mutex<HashMap<DocumentId, DocumentRecord>>>,
}

impl DocumentRepository for InMemoryDocumentRepository {
    fn insert(&self, record: DocumentRecord) -> Result<DocumentRecord, RepositoryError> {
        let mut guard = lock(&self.records, "document")?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &DocumentId) -> Result<Option<DocumentRecord>, RepositoryError> {
        let guard = lock(&self.records, "document")?;
        Ok(guard.get(id).cloned())
    }

    fn all(&self) -> Result<Vec<DocumentRecord>, RepositoryError> {
        let guard = lock(&self.records, "document")?;
        Ok(guard.values().cloned().collect())
    }

    fn modify(
        &self,
        id: &DocumentId,
        apply: &mut dyn FnMut(&mut DocumentRecord),
    ) -> Result<Option<DocumentRecord>, RepositoryError> {
        let mut guard = lock(&self.records, "document")?;
        Ok(guard.get_mut(id).map(|record| {
            apply(record);
            record.clone()
        }))
    }
}

#[derive(Default, Clone)]
pub struct InMemoryWorkflowRepository {
    records: Arc<Mutex<HashMap<WorkflowId, WorkflowRecord>>>,
}

impl WorkflowRepository for InMemoryWorkflowRepository {
    fn insert(&self, record: WorkflowRecord) -> Result<WorkflowRecord, RepositoryError> {
        let mut guard = lock(&self.records, "workflow")?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &WorkflowId) -> Result<Option<WorkflowRecord>, RepositoryError> {
        let guard = lock(&self.records, "workflow")?;
        Ok(guard.get(id).cloned())
    }

    fn modify(
        &self,
        id: &WorkflowId,
        apply: &mut dyn FnMut(&mut WorkflowRecord),
    ) -> Result<Option<WorkflowRecord>, RepositoryError> {
        let mut guard = lock(&self.records, "workflow")?;
        Ok(guard.get_mut(id).map(|record| {
            apply(record);
            record.clone()
        }))
    }
}

#[derive(Default)]
struct AuditTrail {
    next_sequence: u64,
    entries: Vec<AuditEntry>,
}

#[derive(Default, Clone)]
pub struct InMemoryAuditLog {
    trail: Arc<Mutex<AuditTrail>>,
}

impl InMemoryAuditLog {
    fn guard(&self) -> Result<MutexGuard<'_, AuditTrail>, AuditError> {
        self.trail
            .lock()
            .map_err(|_| AuditError::Unavailable("audit lock poisoned".to_string()))
    }

    /// Every entry in insertion order.
    pub fn entries(&self) -> Result<Vec<AuditEntry>, AuditError> {
        Ok(self.guard()?.entries.clone())
    }
}

impl AuditLog for InMemoryAuditLog {
    fn append(&self, event: AuditEvent) -> Result<AuditEntry, AuditError> {
        let mut trail = self.guard()?;
        trail.next_sequence += 1;
        let entry = AuditEntry::from_event(trail.next_sequence, event);
        trail.entries.push(entry.clone());
        Ok(entry)
    }

    fn query(&self, query: &AuditQuery) -> Result<Vec<AuditEntry>, AuditError> {
        let trail = self.guard()?;
        Ok(query.apply(&trail.entries))
    }
}
