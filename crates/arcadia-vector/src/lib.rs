pub mod embedder;
pub mod retrieval;
pub mod store;

pub use embedder::TextEmbedder;
pub use retrieval::{RetrievalAnswer, RetrievalConfig, RetrievalEngine};
pub use store::PersistentVectorStore;
