use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The ARCADIA engineering phases, in methodology order. The derived
/// ordering follows that order.
///
/// `BuildingStrategy` participates in chunk classification only; the
/// extraction pipeline covers the first four phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcadiaPhase {
    Operational,
    System,
    Logical,
    Physical,
    BuildingStrategy,
}

impl ArcadiaPhase {
    /// The four phases the extraction pipeline runs over, in order.
    pub const EXTRACTION_PHASES: [ArcadiaPhase; 4] = [
        ArcadiaPhase::Operational,
        ArcadiaPhase::System,
        ArcadiaPhase::Logical,
        ArcadiaPhase::Physical,
    ];

    /// All phases considered during chunk classification, in tie-break order.
    pub const ALL: [ArcadiaPhase; 5] = [
        ArcadiaPhase::Operational,
        ArcadiaPhase::System,
        ArcadiaPhase::Logical,
        ArcadiaPhase::Physical,
        ArcadiaPhase::BuildingStrategy,
    ];

    /// Two-letter element id prefix (`OA-ACTOR-001`).
    pub fn code(&self) -> &'static str {
        match self {
            ArcadiaPhase::Operational => "OA",
            ArcadiaPhase::System => "SA",
            ArcadiaPhase::Logical => "LA",
            ArcadiaPhase::Physical => "PA",
            ArcadiaPhase::BuildingStrategy => "BS",
        }
    }

    /// Three-letter requirement id segment (`FR-OPE-001`).
    pub fn requirement_code(&self) -> &'static str {
        match self {
            ArcadiaPhase::Operational => "OPE",
            ArcadiaPhase::System => "SYS",
            ArcadiaPhase::Logical => "LOG",
            ArcadiaPhase::Physical => "PHY",
            ArcadiaPhase::BuildingStrategy => "BUI",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            ArcadiaPhase::Operational => "operational",
            ArcadiaPhase::System => "system",
            ArcadiaPhase::Logical => "logical",
            ArcadiaPhase::Physical => "physical",
            ArcadiaPhase::BuildingStrategy => "building_strategy",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ArcadiaPhase::Operational => "Operational Analysis",
            ArcadiaPhase::System => "System Analysis",
            ArcadiaPhase::Logical => "Logical Architecture",
            ArcadiaPhase::Physical => "Physical Architecture",
            ArcadiaPhase::BuildingStrategy => "Building Strategy",
        }
    }

    /// Position in the methodology order, for precedence checks on
    /// traceability links.
    pub fn order(&self) -> u8 {
        match self {
            ArcadiaPhase::Operational => 0,
            ArcadiaPhase::System => 1,
            ArcadiaPhase::Logical => 2,
            ArcadiaPhase::Physical => 3,
            ArcadiaPhase::BuildingStrategy => 4,
        }
    }

    /// Whether a link from `self` to `target` respects the phase order.
    pub fn precedes_or_equals(&self, target: ArcadiaPhase) -> bool {
        self.order() <= target.order()
    }
}

impl fmt::Display for ArcadiaPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for ArcadiaPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "operational" => Ok(ArcadiaPhase::Operational),
            "system" => Ok(ArcadiaPhase::System),
            "logical" => Ok(ArcadiaPhase::Logical),
            "physical" => Ok(ArcadiaPhase::Physical),
            "building_strategy" => Ok(ArcadiaPhase::BuildingStrategy),
            other => Err(format!("unknown ARCADIA phase: {other}")),
        }
    }
}

/// MoSCoW requirement priorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "MUST")]
    Must,
    #[serde(rename = "SHOULD")]
    Should,
    #[serde(rename = "COULD")]
    Could,
    #[serde(rename = "WONT")]
    Wont,
}

impl Priority {
    /// Relative weight used when an explicit LLM hint competes with the
    /// derived priority: the hint only wins when at least as strong.
    pub fn strength(&self) -> u8 {
        match self {
            Priority::Must => 3,
            Priority::Should => 2,
            Priority::Could => 1,
            Priority::Wont => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Must => "MUST",
            Priority::Should => "SHOULD",
            Priority::Could => "COULD",
            Priority::Wont => "WONT",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MUST" => Ok(Priority::Must),
            "SHOULD" => Ok(Priority::Should),
            "COULD" => Ok(Priority::Could),
            "WONT" | "WON'T" => Ok(Priority::Wont),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

/// The requirement families produced by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    Functional,
    NonFunctional,
    Stakeholder,
}

impl RequirementKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            RequirementKind::Functional => "Functional",
            RequirementKind::NonFunctional => "Non-Functional",
            RequirementKind::Stakeholder => "Stakeholder",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            RequirementKind::Functional => "functional",
            RequirementKind::NonFunctional => "non_functional",
            RequirementKind::Stakeholder => "stakeholder",
        }
    }
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for RequirementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "functional" => Ok(RequirementKind::Functional),
            "non_functional" | "non-functional" => Ok(RequirementKind::NonFunctional),
            "stakeholder" => Ok(RequirementKind::Stakeholder),
            other => Err(format!("unknown requirement type: {other}")),
        }
    }
}

/// Non-functional requirement categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NfrCategory {
    Performance,
    Security,
    Usability,
    Reliability,
    Scalability,
    Maintainability,
}

impl NfrCategory {
    pub const ALL: [NfrCategory; 6] = [
        NfrCategory::Performance,
        NfrCategory::Security,
        NfrCategory::Usability,
        NfrCategory::Reliability,
        NfrCategory::Scalability,
        NfrCategory::Maintainability,
    ];

    /// Categories always retained regardless of keyword relevance.
    pub const CORE: [NfrCategory; 3] = [
        NfrCategory::Performance,
        NfrCategory::Security,
        NfrCategory::Reliability,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            NfrCategory::Performance => "performance",
            NfrCategory::Security => "security",
            NfrCategory::Usability => "usability",
            NfrCategory::Reliability => "reliability",
            NfrCategory::Scalability => "scalability",
            NfrCategory::Maintainability => "maintainability",
        }
    }

    /// Four-letter id segment (`NFR-PERF-001`).
    pub fn code(&self) -> &'static str {
        match self {
            NfrCategory::Performance => "PERF",
            NfrCategory::Security => "SECU",
            NfrCategory::Usability => "USAB",
            NfrCategory::Reliability => "RELI",
            NfrCategory::Scalability => "SCAL",
            NfrCategory::Maintainability => "MAIN",
        }
    }
}

impl fmt::Display for NfrCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A chunk of proposal text with its provenance and phase tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: String,
    pub content: String,
    pub source: String,
    pub ordinal: usize,
    pub phase: ArcadiaPhase,
    pub metadata: BTreeMap<String, String>,
}

impl DocumentChunk {
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        source: impl Into<String>,
        ordinal: usize,
        phase: ArcadiaPhase,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            source: source.into(),
            ordinal,
            phase,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_order_matches_methodology() {
        assert!(ArcadiaPhase::Operational.precedes_or_equals(ArcadiaPhase::Physical));
        assert!(ArcadiaPhase::System.precedes_or_equals(ArcadiaPhase::System));
        assert!(!ArcadiaPhase::Physical.precedes_or_equals(ArcadiaPhase::Operational));
    }

    #[test]
    fn phase_round_trips_through_str() {
        for phase in ArcadiaPhase::ALL {
            assert_eq!(phase.key().parse::<ArcadiaPhase>().unwrap(), phase);
        }
    }

    #[test]
    fn priority_parses_apostrophe_variant() {
        assert_eq!("WON'T".parse::<Priority>().unwrap(), Priority::Wont);
        assert_eq!("should".parse::<Priority>().unwrap(), Priority::Should);
    }

    #[test]
    fn nfr_codes_are_four_letters() {
        for category in NfrCategory::ALL {
            assert_eq!(category.code().len(), 4);
        }
    }
}
