use super::cross_phase::CrossPhaseAnalysis;
use super::logical::LogicalArchitecture;
use super::operational::OperationalAnalysis;
use super::physical::PhysicalArchitecture;
use super::system::SystemAnalysis;
use crate::types::ArcadiaPhase;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Run-level metadata attached to a structured analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub analysis_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub target_phases: Vec<ArcadiaPhase>,
    pub source_documents: Vec<String>,
    pub processing_seconds: f64,
    pub phases_completed: Vec<ArcadiaPhase>,
}

impl GenerationMetadata {
    pub fn new(
        analysis_id: String,
        started_at: DateTime<Utc>,
        target_phases: Vec<ArcadiaPhase>,
        source_documents: Vec<String>,
    ) -> Self {
        Self {
            analysis_id,
            started_at,
            finished_at: None,
            target_phases,
            source_documents,
            processing_seconds: 0.0,
            phases_completed: Vec::new(),
        }
    }
}

/// The composite structured output of one run. Phase outputs are produced in
/// order and never mutated once set; absent phases stay `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArcadiaStructuredOutput {
    pub operational: Option<OperationalAnalysis>,
    pub system: Option<SystemAnalysis>,
    pub logical: Option<LogicalArchitecture>,
    pub physical: Option<PhysicalArchitecture>,
    pub cross_phase: Option<CrossPhaseAnalysis>,
    pub generation: GenerationMetadata,
}

impl ArcadiaStructuredOutput {
    pub fn new(generation: GenerationMetadata) -> Self {
        Self {
            operational: None,
            system: None,
            logical: None,
            physical: None,
            cross_phase: None,
            generation,
        }
    }

    /// Number of phase outputs present.
    pub fn completed_phase_count(&self) -> usize {
        [
            self.operational.is_some(),
            self.system.is_some(),
            self.logical.is_some(),
            self.physical.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}
