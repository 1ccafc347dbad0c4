pub mod config;
pub mod error;
pub mod ids;
pub mod model;
pub mod store;
pub mod types;
pub mod vocabulary;

pub use config::{DocumentConfig, LlmConfig, PipelineConfig, VectorStoreConfig};
pub use error::{ArcadiaError, Result};
pub use store::{ChunkMetadata, EmbeddingStore, ScoredChunk, StoreStats};
pub use types::{ArcadiaPhase, DocumentChunk, NfrCategory, Priority, RequirementKind};
