use super::metadata::ExtractionMetadata;
use crate::types::ArcadiaPhase;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Typed relationship carried by a traceability link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Realizes,
    Implements,
    DecomposesTo,
    AllocatedTo,
    ImplementedBy,
    RealizedBy,
    ImplementedThrough,
    Enables,
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RelationshipKind::Realizes => "realizes",
            RelationshipKind::Implements => "implements",
            RelationshipKind::DecomposesTo => "decomposes_to",
            RelationshipKind::AllocatedTo => "allocated_to",
            RelationshipKind::ImplementedBy => "implemented_by",
            RelationshipKind::RealizedBy => "realized_by",
            RelationshipKind::ImplementedThrough => "implemented_through",
            RelationshipKind::Enables => "enables",
        };
        write!(f, "{}", s)
    }
}

/// Validation state of a generated link. End-to-end operational→physical
/// links always start as `RequiresValidation`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    #[default]
    Unverified,
    RequiresValidation,
    Verified,
}

/// A directed, typed relationship between two elements in different phases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceabilityLink {
    pub id: String,
    pub source_element: String,
    pub target_element: String,
    pub source_phase: ArcadiaPhase,
    pub target_phase: ArcadiaPhase,
    pub relationship: RelationshipKind,
    /// Similarity-derived confidence, in [0, 1].
    pub confidence: f64,
    pub validation_status: ValidationStatus,
}

/// Kind of an identified gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapKind {
    Missing,
    Inconsistent,
    Redundant,
}

/// Severity of an identified gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapSeverity {
    Minor,
    Medium,
    Major,
    Critical,
}

/// An identified absence, inconsistency or redundancy in the analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapAnalysisItem {
    pub id: String,
    pub kind: GapKind,
    pub phase: ArcadiaPhase,
    pub description: String,
    pub severity: GapSeverity,
    pub recommendations: Vec<String>,
}

/// Outcome of an architecture consistency check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Passed,
    Warning,
    Failed,
}

/// A consistency check over one or more phases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchitectureConsistencyCheck {
    pub id: String,
    pub check_kind: String,
    pub phases_involved: Vec<ArcadiaPhase>,
    pub status: CheckStatus,
    pub description: String,
    pub issues_found: Vec<String>,
    pub recommendations: Vec<String>,
}

/// A scored quality metric over one phase's output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityMetric {
    pub id: String,
    pub name: String,
    pub metric_kind: String,
    pub phase: ArcadiaPhase,
    pub score: f64,
    pub max_score: f64,
    pub criteria: Vec<String>,
    pub assessment_details: BTreeMap<String, u64>,
}

/// Coverage of one ordered phase pair.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CoverageScores {
    pub actor_coverage: f64,
    pub capability_coverage: f64,
}

/// High-impact element lists derived from the phase outputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImpactAnalysis {
    pub high_impact_operational_capabilities: Vec<String>,
    pub critical_system_functions: Vec<String>,
}

/// Output of the cross-phase analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossPhaseAnalysis {
    pub traceability_links: Vec<TraceabilityLink>,
    pub gap_analysis: Vec<GapAnalysisItem>,
    pub consistency_checks: Vec<ArchitectureConsistencyCheck>,
    pub quality_metrics: Vec<QualityMetric>,
    pub coverage_matrix: BTreeMap<String, CoverageScores>,
    pub impact_analysis: ImpactAnalysis,
    pub metadata: ExtractionMetadata,
}
