use super::logical::InteractionStep;
use super::metadata::ExtractionMetadata;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of a physical component. Defaults to `Software`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicalComponentKind {
    Hardware,
    #[default]
    Software,
    Hybrid,
}

impl FromStr for PhysicalComponentKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hardware" => Ok(PhysicalComponentKind::Hardware),
            "hybrid" => Ok(PhysicalComponentKind::Hybrid),
            _ => Ok(PhysicalComponentKind::Software),
        }
    }
}

/// A deployable implementation element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicalComponent {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: PhysicalComponentKind,
    pub technology_platform: String,
    pub implemented_logical_components: Vec<String>,
    /// Interface names exposed by the component.
    pub interfaces: Vec<String>,
    pub deployment_configuration: Vec<String>,
    pub resource_requirements: Vec<String>,
}

/// Kind of an implementation constraint. Defaults to `Technology`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    #[default]
    Technology,
    Performance,
    Environmental,
    Safety,
    Security,
    Regulatory,
}

impl FromStr for ConstraintKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "performance" => Ok(ConstraintKind::Performance),
            "environmental" => Ok(ConstraintKind::Environmental),
            "safety" => Ok(ConstraintKind::Safety),
            "security" => Ok(ConstraintKind::Security),
            "regulatory" => Ok(ConstraintKind::Regulatory),
            _ => Ok(ConstraintKind::Technology),
        }
    }
}

/// A constraint on implementation or deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImplementationConstraint {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: ConstraintKind,
    pub affected_components: Vec<String>,
    pub specifications: Vec<String>,
    pub validation_criteria: Vec<String>,
}

/// A function realised with concrete technology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicalFunction {
    pub id: String,
    pub name: String,
    pub description: String,
    pub implemented_logical_functions: Vec<String>,
    pub technology_specifics: Vec<String>,
    pub input_interfaces: Vec<String>,
    pub output_interfaces: Vec<String>,
    pub allocated_components: Vec<String>,
}

/// A deployment-level scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicalScenario {
    pub id: String,
    pub name: String,
    pub description: String,
    pub scenario_kind: String,
    pub involved_components: Vec<String>,
    pub interaction_sequence: Vec<InteractionStep>,
    pub technology_constraints: Vec<String>,
    pub realized_logical_scenarios: Vec<String>,
}

/// Complete output of the physical architecture phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicalArchitecture {
    pub components: Vec<PhysicalComponent>,
    pub constraints: Vec<ImplementationConstraint>,
    pub functions: Vec<PhysicalFunction>,
    pub scenarios: Vec<PhysicalScenario>,
    pub metadata: ExtractionMetadata,
}
