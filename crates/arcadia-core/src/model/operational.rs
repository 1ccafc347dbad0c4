use super::metadata::ExtractionMetadata;
use serde::{Deserialize, Serialize};

/// A stakeholder, user or organisational entity interacting with the system
/// at the operational level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationalActor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub role_definition: String,
    pub responsibilities: Vec<String>,
    pub capabilities: Vec<String>,
    /// Chunk ids the actor was extracted from.
    pub source_references: Vec<String>,
}

/// Kind of an operational entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    #[default]
    System,
    Organization,
    Resource,
    Other,
}

/// An organisational or geographical node in the operational context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationalEntity {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: EntityKind,
}

/// A named operational ability linked to mission objectives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationalCapability {
    pub id: String,
    pub name: String,
    pub description: String,
    pub mission_statement: String,
    /// Ids of the actors involved in delivering the capability.
    pub involved_actors: Vec<String>,
    pub performance_constraints: Vec<String>,
}

/// One step in an operational scenario's activity sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityStep {
    pub step: usize,
    pub activity: String,
    pub actor: String,
}

/// An operational use case or workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationalScenario {
    pub id: String,
    pub name: String,
    pub description: String,
    pub scenario_kind: String,
    pub involved_actors: Vec<String>,
    pub activity_sequence: Vec<ActivityStep>,
    pub environmental_conditions: Vec<String>,
    pub performance_constraints: Vec<String>,
}

/// An activity within an operational process chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessActivity {
    pub name: String,
    pub description: String,
    pub triggers: Vec<String>,
}

/// A sequence of operational activities supporting a capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationalProcess {
    pub id: String,
    pub name: String,
    pub description: String,
    pub activity_chain: Vec<ProcessActivity>,
    pub reusable_patterns: Vec<String>,
}

/// Complete output of the operational analysis phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationalAnalysis {
    pub actors: Vec<OperationalActor>,
    pub entities: Vec<OperationalEntity>,
    pub capabilities: Vec<OperationalCapability>,
    pub scenarios: Vec<OperationalScenario>,
    pub processes: Vec<OperationalProcess>,
    pub metadata: ExtractionMetadata,
}
