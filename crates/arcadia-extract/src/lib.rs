pub mod analyzer;
pub mod context;
pub mod document;
pub mod enricher;
pub mod json;
pub mod logical;
pub mod operational;
pub mod physical;
pub mod similarity;
pub mod system;

pub use analyzer::CrossPhaseAnalyzer;
pub use document::{DocumentProcessor, ProposalAnalysis};
pub use enricher::ContextEnricher;
pub use logical::LogicalExtractor;
pub use operational::OperationalExtractor;
pub use physical::PhysicalExtractor;
pub use system::SystemExtractor;
