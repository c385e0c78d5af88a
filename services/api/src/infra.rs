use loan_intake::config::IntakeConfig;
use loan_intake::intake::{
    Clock, InMemoryAuditLog, InMemoryDocumentRepository, InMemoryWorkflowRepository,
    IntakeService,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type InMemoryIntakeService =
    IntakeService<InMemoryDocumentRepository, InMemoryWorkflowRepository, InMemoryAuditLog>;

/// Process-owned stores shared by every service built from them.
#[derive(Clone, Default)]
pub(crate) struct InMemoryStores {
    pub(crate) documents: Arc<InMemoryDocumentRepository>,
    pub(crate) workflows: Arc<InMemoryWorkflowRepository>,
    pub(crate) audit: Arc<InMemoryAuditLog>,
}

impl InMemoryStores {
    pub(crate) fn service(&self, config: IntakeConfig) -> InMemoryIntakeService {
        IntakeService::new(
            self.documents.clone(),
            self.workflows.clone(),
            self.audit.clone(),
            config,
        )
    }

    pub(crate) fn service_with_clock(
        &self,
        config: IntakeConfig,
        clock: Arc<dyn Clock>,
    ) -> InMemoryIntakeService {
        IntakeService::with_clock(
            self.documents.clone(),
            self.workflows.clone(),
            self.audit.clone(),
            config,
            clock,
        )
    }
}
