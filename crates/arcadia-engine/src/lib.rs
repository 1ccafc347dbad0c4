pub mod chat;
pub mod orchestrator;
pub mod output;
pub mod sink;

pub use chat::DocumentChat;
pub use orchestrator::{
    EnrichmentSummary, GenerationStatistics, TemplateCompliance, UnifiedPipeline, UnifiedResult,
};
pub use output::to_structured_json;
pub use sink::{PersistedRun, ResultSink};

pub use arcadia_vector::{RetrievalAnswer, RetrievalConfig, RetrievalEngine};
