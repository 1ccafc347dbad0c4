use arcadia_core::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Identifiers recorded after a successful persistence hand-off.
#[derive(Debug, Clone)]
pub struct PersistedRun {
    pub project_id: String,
    pub session_id: String,
}

/// Persistence collaborator boundary. The orchestrator hands the assembled
/// result over and records the returned opaque identifiers; storage details
/// stay outside the core.
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn persist(
        &self,
        project_name: &str,
        proposal: &str,
        result: &Value,
    ) -> Result<PersistedRun>;
}
