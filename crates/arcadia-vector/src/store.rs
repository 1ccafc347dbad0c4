use crate::embedder::TextEmbedder;
use arcadia_core::{
    ArcadiaError, ChunkMetadata, EmbeddingStore, Result, ScoredChunk, StoreStats,
    VectorStoreConfig,
};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredChunk {
    id: String,
    text: String,
    metadata: ChunkMetadata,
    embedding: Vec<f32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    collection: String,
    chunks: Vec<StoredChunk>,
}

/// Embedding store persisted as a JSON snapshot on disk.
///
/// Reads run concurrently against the in-memory map; writes are serialised
/// behind the snapshot mutex so the on-disk state always reflects a single
/// write order.
pub struct PersistentVectorStore {
    config: VectorStoreConfig,
    embedder: TextEmbedder,
    chunks: DashMap<String, StoredChunk>,
    write_lock: Mutex<()>,
}

impl PersistentVectorStore {
    /// Open the collection at the configured path, loading any existing
    /// snapshot.
    pub fn open(config: VectorStoreConfig) -> Result<Self> {
        let embedder = TextEmbedder::new(config.dimension);
        let store = Self {
            config,
            embedder,
            chunks: DashMap::new(),
            write_lock: Mutex::new(()),
        };
        store.load_snapshot()?;
        info!(
            collection = %store.config.collection,
            chunks = store.chunks.len(),
            "vector store opened"
        );
        Ok(store)
    }

    fn snapshot_path(&self) -> PathBuf {
        self.config
            .path
            .join(format!("{}.json", self.config.collection))
    }

    fn load_snapshot(&self) -> Result<()> {
        let path = self.snapshot_path();
        if !path.exists() {
            return Ok(());
        }
        let raw = fs::read_to_string(&path)?;
        let snapshot: Snapshot = serde_json::from_str(&raw)?;
        for chunk in snapshot.chunks {
            self.chunks.insert(chunk.id.clone(), chunk);
        }
        Ok(())
    }

    fn write_snapshot(&self) -> Result<()> {
        fs::create_dir_all(&self.config.path)?;
        let mut chunks: Vec<StoredChunk> =
            self.chunks.iter().map(|entry| entry.value().clone()).collect();
        chunks.sort_by(|a, b| a.id.cmp(&b.id));
        let snapshot = Snapshot {
            collection: self.config.collection.clone(),
            chunks,
        };
        let raw = serde_json::to_string(&snapshot)?;
        fs::write(self.snapshot_path(), raw)?;
        Ok(())
    }
}

#[async_trait]
impl EmbeddingStore for PersistentVectorStore {
    async fn upsert(&self, chunk_id: &str, text: &str, metadata: ChunkMetadata) -> Result<()> {
        let embedding = self.embedder.embed(text);
        let chunk = StoredChunk {
            id: chunk_id.to_string(),
            text: text.to_string(),
            metadata,
            embedding,
        };

        let _guard = self.write_lock.lock();
        self.chunks.insert(chunk_id.to_string(), chunk);
        self.write_snapshot()?;
        debug!(chunk_id, "chunk upserted");
        Ok(())
    }

    async fn query(&self, text: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        let query_embedding = self.embedder.embed(text);
        let mut scored: Vec<ScoredChunk> = self
            .chunks
            .iter()
            .map(|entry| {
                let chunk = entry.value();
                ScoredChunk {
                    id: chunk.id.clone(),
                    text: chunk.text.clone(),
                    metadata: chunk.metadata.clone(),
                    similarity: TextEmbedder::similarity(&query_embedding, &chunk.embedding),
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        scored.truncate(k);
        Ok(scored)
    }

    async fn delete_collection(&self) -> Result<()> {
        let _guard = self.write_lock.lock();
        self.chunks.clear();
        let path = self.snapshot_path();
        if path.exists() {
            fs::remove_file(&path).map_err(|e| ArcadiaError::Store(e.to_string()))?;
        }
        info!(collection = %self.config.collection, "collection deleted");
        Ok(())
    }

    async fn stats(&self) -> Result<StoreStats> {
        let mut by_source: BTreeMap<String, usize> = BTreeMap::new();
        for entry in self.chunks.iter() {
            let source = entry
                .value()
                .metadata
                .get("source")
                .cloned()
                .unwrap_or_else(|| "unknown".to_string());
            *by_source.entry(source).or_insert(0) += 1;
        }
        Ok(StoreStats {
            total_chunks: self.chunks.len(),
            by_source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store(dir: &TempDir) -> PersistentVectorStore {
        PersistentVectorStore::open(VectorStoreConfig {
            path: dir.path().to_path_buf(),
            collection: "test_collection".to_string(),
            dimension: 64,
        })
        .unwrap()
    }

    fn metadata(source: &str) -> ChunkMetadata {
        let mut m = ChunkMetadata::new();
        m.insert("source".to_string(), source.to_string());
        m
    }

    #[tokio::test]
    async fn upsert_is_idempotent_on_id() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        store
            .upsert("c1", "mission planning", metadata("a.txt"))
            .await
            .unwrap();
        store
            .upsert("c1", "mission planning", metadata("b.txt"))
            .await
            .unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_chunks, 1);
        assert_eq!(stats.by_source.get("b.txt"), Some(&1));
    }

    #[tokio::test]
    async fn query_returns_non_increasing_similarity() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        store
            .upsert("c1", "monitor system performance", metadata("doc"))
            .await
            .unwrap();
        store
            .upsert("c2", "hardware deployment nodes", metadata("doc"))
            .await
            .unwrap();
        store
            .upsert("c3", "monitor performance metrics in real time", metadata("doc"))
            .await
            .unwrap();

        let results = store.query("monitor performance", 3).await.unwrap();
        assert_eq!(results.len(), 3);
        for pair in results.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
    }

    #[tokio::test]
    async fn snapshot_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = test_store(&dir);
            store
                .upsert("c1", "operational capability", metadata("doc"))
                .await
                .unwrap();
        }
        let reopened = test_store(&dir);
        let stats = reopened.stats().await.unwrap();
        assert_eq!(stats.total_chunks, 1);
    }

    #[tokio::test]
    async fn delete_collection_drops_everything() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        store
            .upsert("c1", "anything", metadata("doc"))
            .await
            .unwrap();
        store.delete_collection().await.unwrap();
        assert_eq!(store.stats().await.unwrap().total_chunks, 0);

        let reopened = test_store(&dir);
        assert_eq!(reopened.stats().await.unwrap().total_chunks, 0);
    }
}
