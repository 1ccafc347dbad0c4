//! Document chat surface: chunk documents into the embedding store, answer
//! questions grounded in the ingested corpus.

use arcadia_core::{ChunkMetadata, DocumentConfig, EmbeddingStore, Result, StoreStats};
use arcadia_extract::DocumentProcessor;
use arcadia_vector::{RetrievalAnswer, RetrievalConfig, RetrievalEngine};
use arcadia_ai::LlmProvider;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

/// Wires the document processor, the embedding store and the retrieval
/// engine into the chat surface. Ingestion persists chunks across runs;
/// questions are answered from the nearest chunks only.
pub struct DocumentChat {
    processor: DocumentProcessor,
    store: Arc<dyn EmbeddingStore>,
    retrieval: RetrievalEngine,
}

impl DocumentChat {
    pub fn new(
        store: Arc<dyn EmbeddingStore>,
        llm: Arc<dyn LlmProvider>,
        document_config: DocumentConfig,
        retrieval_config: RetrievalConfig,
    ) -> Self {
        Self {
            processor: DocumentProcessor::new(document_config),
            store: store.clone(),
            retrieval: RetrievalEngine::new(store, llm, retrieval_config),
        }
    }

    /// Chunk a document and upsert every chunk into the store. Returns the
    /// number of chunks written.
    #[instrument(skip(self, text))]
    pub async fn ingest_document(&self, text: &str, source: &str) -> Result<usize> {
        let chunks = self.processor.chunk(text, source);
        for chunk in &chunks {
            let mut metadata = ChunkMetadata::new();
            metadata.insert("source".to_string(), chunk.source.clone());
            metadata.insert("ordinal".to_string(), chunk.ordinal.to_string());
            metadata.insert("phase".to_string(), chunk.phase.key().to_string());
            self.store.upsert(&chunk.id, &chunk.content, metadata).await?;
        }
        info!(source, chunks = chunks.len(), "document ingested");
        Ok(chunks.len())
    }

    /// Answer a question grounded in the ingested corpus.
    pub async fn ask(&self, question: &str, cancel: &CancellationToken) -> Result<RetrievalAnswer> {
        self.retrieval.ask(question, cancel).await
    }

    pub async fn stats(&self) -> Result<StoreStats> {
        self.store.stats().await
    }

    /// Drop every ingested chunk.
    pub async fn clear(&self) -> Result<()> {
        self.store.delete_collection().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcadia_ai::StubProvider;
    use arcadia_core::VectorStoreConfig;
    use arcadia_vector::PersistentVectorStore;
    use tempfile::TempDir;

    fn chat(dir: &TempDir, llm: Arc<StubProvider>) -> DocumentChat {
        let store = Arc::new(
            PersistentVectorStore::open(VectorStoreConfig {
                path: dir.path().to_path_buf(),
                collection: "chat_test".to_string(),
                dimension: 64,
            })
            .unwrap(),
        );
        DocumentChat::new(
            store,
            llm,
            DocumentConfig::default(),
            RetrievalConfig::default(),
        )
    }

    #[tokio::test]
    async fn ingested_chunks_are_tagged_and_queryable() {
        let dir = TempDir::new().unwrap();
        let llm = Arc::new(StubProvider::with_fallback(
            "Mission planning is covered in the proposal.",
        ));
        let chat = chat(&dir, llm);

        let written = chat
            .ingest_document(
                "The mission planning capability requires stakeholder coordination.",
                "proposal.md",
            )
            .await
            .unwrap();
        assert_eq!(written, 1);

        let stats = chat.stats().await.unwrap();
        assert_eq!(stats.total_chunks, 1);
        assert_eq!(stats.by_source.get("proposal.md"), Some(&1));

        let cancel = CancellationToken::new();
        let answer = chat.ask("what about mission planning?", &cancel).await.unwrap();
        assert!(!answer.retrieved.is_empty());

        chat.clear().await.unwrap();
        assert_eq!(chat.stats().await.unwrap().total_chunks, 0);
    }
}
