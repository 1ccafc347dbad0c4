use super::metadata::ExtractionMetadata;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of a logical component. Defaults to `Subsystem`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalComponentKind {
    #[default]
    Subsystem,
    Module,
    Service,
}

impl FromStr for LogicalComponentKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "module" => Ok(LogicalComponentKind::Module),
            "service" => Ok(LogicalComponentKind::Service),
            _ => Ok(LogicalComponentKind::Subsystem),
        }
    }
}

/// A coarse-grained breakdown element of the solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogicalComponent {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: LogicalComponentKind,
    pub responsibilities: Vec<String>,
    pub parent: Option<String>,
    pub sub_components: Vec<String>,
    /// Logical interface ids provided or consumed by the component.
    pub interfaces: Vec<String>,
    pub allocated_functions: Vec<String>,
}

/// A function allocated to logical components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogicalFunction {
    pub id: String,
    pub name: String,
    pub description: String,
    pub parent_system_function: Option<String>,
    pub sub_functions: Vec<String>,
    pub input_interfaces: Vec<String>,
    pub output_interfaces: Vec<String>,
    pub behavioral_specifications: Vec<String>,
    pub allocated_components: Vec<String>,
}

/// Kind of a logical interface. Defaults to `Data`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceKind {
    #[default]
    Data,
    Control,
    User,
    External,
    Service,
    Api,
}

impl FromStr for InterfaceKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "control" => Ok(InterfaceKind::Control),
            "user" => Ok(InterfaceKind::User),
            "external" => Ok(InterfaceKind::External),
            "service" => Ok(InterfaceKind::Service),
            "api" => Ok(InterfaceKind::Api),
            _ => Ok(InterfaceKind::Data),
        }
    }
}

/// An interface between logical components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogicalInterface {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: InterfaceKind,
    pub provider_component: String,
    pub consumer_components: Vec<String>,
    pub data_specifications: Vec<String>,
    pub protocol_specifications: Vec<String>,
    pub quality_attributes: Vec<String>,
    pub supported_system_interfaces: Vec<String>,
}

/// One ordered step of a logical interaction sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionStep {
    pub order: usize,
    pub from_element: String,
    pub to_element: String,
    pub interaction: String,
    pub data: Vec<String>,
}

/// A component-level scenario realising operational scenarios.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogicalScenario {
    pub id: String,
    pub name: String,
    pub description: String,
    pub scenario_kind: String,
    pub involved_components: Vec<String>,
    pub involved_functions: Vec<String>,
    pub interaction_sequence: Vec<InteractionStep>,
    pub data_flows: Vec<String>,
    pub performance_characteristics: Vec<String>,
    pub realized_operational_scenarios: Vec<String>,
}

/// Complete output of the logical architecture phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogicalArchitecture {
    pub components: Vec<LogicalComponent>,
    pub functions: Vec<LogicalFunction>,
    pub interfaces: Vec<LogicalInterface>,
    pub scenarios: Vec<LogicalScenario>,
    pub metadata: ExtractionMetadata,
}
