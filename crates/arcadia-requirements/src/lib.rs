pub mod export;
pub mod generator;
pub mod patterns;
pub mod priority;
pub mod validation;

pub use generator::{GeneratedRequirements, PhaseRequirements, RequirementsGenerator};
pub use priority::{balance_priorities, PriorityAnalysis};
pub use validation::{
    IssueCategory, IssueLevel, ValidationIssue, ValidationPipeline, ValidationReport,
};
