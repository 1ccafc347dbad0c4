use super::metadata::ExtractionMetadata;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Scope of the system under analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemBoundary {
    pub scope_definition: String,
    pub included_elements: Vec<String>,
    pub excluded_elements: Vec<String>,
    pub external_dependencies: Vec<String>,
    pub environmental_factors: Vec<String>,
}

/// Kind of a system actor. Raw LLM strings outside the enumeration default
/// to `External`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemActorKind {
    #[default]
    External,
    Internal,
    Interface,
}

impl FromStr for SystemActorKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "internal" => Ok(SystemActorKind::Internal),
            "interface" => Ok(SystemActorKind::Interface),
            _ => Ok(SystemActorKind::External),
        }
    }
}

/// Interface carried by a system actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorInterface {
    pub name: String,
    pub interface_type: String,
    pub description: String,
}

/// An entity interacting with the system at the system level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemActor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: SystemActorKind,
    pub interfaces: Vec<ActorInterface>,
    pub dependencies: Vec<String>,
}

/// Kind of a system function. Defaults to `Primary`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    #[default]
    Primary,
    Secondary,
    Support,
}

impl FromStr for FunctionKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "secondary" => Ok(FunctionKind::Secondary),
            "support" => Ok(FunctionKind::Support),
            _ => Ok(FunctionKind::Primary),
        }
    }
}

/// Kind of a functional exchange between functions. Defaults to `Data`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeKind {
    #[default]
    Data,
    Energy,
    Material,
}

impl FromStr for ExchangeKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "energy" => Ok(ExchangeKind::Energy),
            "material" => Ok(ExchangeKind::Material),
            _ => Ok(ExchangeKind::Data),
        }
    }
}

/// A directed exchange between two system functions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionalExchange {
    pub from_function: String,
    pub to_function: String,
    pub kind: ExchangeKind,
    pub description: String,
}

/// A function directly driven by operational need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemFunction {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: FunctionKind,
    pub parent_function: Option<String>,
    pub sub_functions: Vec<String>,
    /// System actor ids the function is allocated to.
    pub allocated_actors: Vec<String>,
    pub functional_exchanges: Vec<FunctionalExchange>,
    pub performance_requirements: Vec<String>,
}

/// The system's contribution to operational capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemCapability {
    pub id: String,
    pub name: String,
    pub description: String,
    pub realized_operational_capabilities: Vec<String>,
    pub implementing_functions: Vec<String>,
    pub performance_requirements: Vec<String>,
}

/// One ordered step of a functional chain; `function_id` references a
/// function declared in the same analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainStep {
    pub order: usize,
    pub function_id: String,
    pub description: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

/// An ordered sequence of system functions realising an end-to-end scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionalChain {
    pub id: String,
    pub name: String,
    pub description: String,
    pub scenario_context: String,
    pub sequence: Vec<ChainStep>,
    pub alternative_paths: Vec<String>,
    pub validation_criteria: Vec<String>,
}

/// Complete output of the system analysis phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemAnalysis {
    pub boundary: Option<SystemBoundary>,
    pub actors: Vec<SystemActor>,
    pub functions: Vec<SystemFunction>,
    pub capabilities: Vec<SystemCapability>,
    pub functional_chains: Vec<FunctionalChain>,
    pub metadata: ExtractionMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_actor_kind_defaults_to_external() {
        assert_eq!(
            "robotic".parse::<SystemActorKind>().unwrap(),
            SystemActorKind::External
        );
    }

    #[test]
    fn unknown_function_kind_defaults_to_primary() {
        assert_eq!("".parse::<FunctionKind>().unwrap(), FunctionKind::Primary);
        assert_eq!(
            "Support".parse::<FunctionKind>().unwrap(),
            FunctionKind::Support
        );
    }
}
