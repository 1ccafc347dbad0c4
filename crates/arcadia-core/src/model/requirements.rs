use crate::types::{ArcadiaPhase, NfrCategory, Priority, RequirementKind};
use serde::{Deserialize, Serialize};

/// Fields carried only by non-functional requirements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NfrDetails {
    pub category: NfrCategory,
    pub metric: String,
    pub target_value: String,
    pub measurement_method: String,
}

/// A generated "shall" statement with priority, verification method and
/// traceability links. NFR-specific fields are present iff the kind is
/// `NonFunctional`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requirement {
    pub id: String,
    pub kind: RequirementKind,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    /// Confidence of the derived priority, in [0, 1].
    pub priority_confidence: f64,
    pub rationale: String,
    pub phase: ArcadiaPhase,
    pub verification_method: String,
    pub dependencies: Vec<String>,
    pub capability_links: Vec<String>,
    pub scenario_links: Vec<String>,
    pub stakeholder_links: Vec<String>,
    /// Set when the priority balancer moved the requirement off its derived
    /// priority.
    pub rebalanced: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nfr: Option<NfrDetails>,
}

impl Requirement {
    /// NFR details must be present exactly when the kind is non-functional.
    pub fn is_well_formed(&self) -> bool {
        matches!(self.kind, RequirementKind::NonFunctional) == self.nfr.is_some()
    }
}

/// A stakeholder record mined from the proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stakeholder {
    pub id: String,
    pub description: String,
    pub kind: String,
    pub phase: ArcadiaPhase,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_requirement() -> Requirement {
        Requirement {
            id: "FR-SYS-001".to_string(),
            kind: RequirementKind::Functional,
            title: "Process telemetry".to_string(),
            description: "The system shall process incoming telemetry".to_string(),
            priority: Priority::Must,
            priority_confidence: 0.8,
            rationale: String::new(),
            phase: ArcadiaPhase::System,
            verification_method: "Functional testing".to_string(),
            dependencies: vec![],
            capability_links: vec![],
            scenario_links: vec![],
            stakeholder_links: vec![],
            rebalanced: false,
            nfr: None,
        }
    }

    #[test]
    fn functional_requirement_without_nfr_fields_is_well_formed() {
        assert!(base_requirement().is_well_formed());
    }

    #[test]
    fn nfr_requires_details() {
        let mut req = base_requirement();
        req.kind = RequirementKind::NonFunctional;
        assert!(!req.is_well_formed());

        req.nfr = Some(NfrDetails {
            category: NfrCategory::Performance,
            metric: "100 milliseconds".to_string(),
            target_value: "100".to_string(),
            measurement_method: "Performance monitoring and benchmarking".to_string(),
        });
        assert!(req.is_well_formed());
    }
}
