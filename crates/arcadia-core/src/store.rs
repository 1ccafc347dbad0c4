use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// String-keyed metadata attached to a stored chunk.
pub type ChunkMetadata = BTreeMap<String, String>;

/// A chunk returned from a nearest-neighbour query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub id: String,
    pub text: String,
    pub metadata: ChunkMetadata,
    pub similarity: f32,
}

/// Collection statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_chunks: usize,
    pub by_source: BTreeMap<String, usize>,
}

/// Append-only embedding store over text chunks.
///
/// Writes are serialised by implementations; queries return results in
/// strict non-increasing similarity order. Re-upserting an id replaces its
/// text and metadata.
#[async_trait]
pub trait EmbeddingStore: Send + Sync {
    async fn upsert(&self, chunk_id: &str, text: &str, metadata: ChunkMetadata) -> Result<()>;

    async fn query(&self, text: &str, k: usize) -> Result<Vec<ScoredChunk>>;

    async fn delete_collection(&self) -> Result<()>;

    async fn stats(&self) -> Result<StoreStats>;
}
