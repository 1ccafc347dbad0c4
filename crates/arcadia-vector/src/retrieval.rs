use arcadia_core::{ChunkMetadata, EmbeddingStore, Result, ScoredChunk};
use arcadia_ai::{GenerationOptions, LlmProvider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Configuration for the retrieval-augmented chat surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks retrieved per question.
    pub top_k: usize,
    /// Per-chunk context truncation for the prompt.
    pub max_chunk_chars: usize,
    pub temperature: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            max_chunk_chars: 800,
            temperature: 0.2,
        }
    }
}

/// An answer grounded in retrieved chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalAnswer {
    pub question: String,
    pub answer: String,
    pub sources: Vec<String>,
    pub retrieved: Vec<ScoredChunk>,
    pub processing_ms: u64,
}

/// Thin composition over the store and the gateway: retrieve nearest chunks,
/// assemble a grounded prompt, ask the model.
pub struct RetrievalEngine {
    store: Arc<dyn EmbeddingStore>,
    llm: Arc<dyn LlmProvider>,
    config: RetrievalConfig,
}

impl RetrievalEngine {
    pub fn new(
        store: Arc<dyn EmbeddingStore>,
        llm: Arc<dyn LlmProvider>,
        config: RetrievalConfig,
    ) -> Self {
        Self { store, llm, config }
    }

    /// Ingest pre-chunked text into the store.
    pub async fn ingest(&self, chunks: &[(String, String, ChunkMetadata)]) -> Result<usize> {
        for (id, text, metadata) in chunks {
            self.store.upsert(id, text, metadata.clone()).await?;
        }
        info!(count = chunks.len(), "chunks ingested");
        Ok(chunks.len())
    }

    #[instrument(skip(self, cancel))]
    pub async fn ask(&self, question: &str, cancel: &CancellationToken) -> Result<RetrievalAnswer> {
        let start = Instant::now();
        let retrieved = self.store.query(question, self.config.top_k).await?;
        debug!(retrieved = retrieved.len(), "context retrieved");

        let context = retrieved
            .iter()
            .map(|chunk| {
                let mut text = chunk.text.clone();
                if text.len() > self.config.max_chunk_chars {
                    let mut cut = self.config.max_chunk_chars;
                    while !text.is_char_boundary(cut) {
                        cut -= 1;
                    }
                    text.truncate(cut);
                    text.push_str("...");
                }
                text
            })
            .collect::<Vec<_>>()
            .join("\n\n---\n\n");

        let prompt = format!(
            "Answer the question using only the provided document context.\n\n\
             CONTEXT:\n{context}\n\nQUESTION: {question}\n\n\
             Give a concise, grounded answer. If the context does not contain \
             the answer, say so."
        );

        let options = GenerationOptions::default().with_temperature(self.config.temperature);
        let answer = self
            .llm
            .generate(&prompt, &options, cancel)
            .await
            .map_err(|e| arcadia_core::ArcadiaError::Llm(e.to_string()))?;

        let mut sources: Vec<String> = retrieved
            .iter()
            .filter_map(|chunk| chunk.metadata.get("source").cloned())
            .collect();
        sources.dedup();

        Ok(RetrievalAnswer {
            question: question.to_string(),
            answer,
            sources,
            retrieved,
            processing_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PersistentVectorStore;
    use arcadia_ai::StubProvider;
    use arcadia_core::VectorStoreConfig;
    use tempfile::TempDir;

    #[tokio::test]
    async fn ask_grounds_answer_in_retrieved_chunks() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(
            PersistentVectorStore::open(VectorStoreConfig {
                path: dir.path().to_path_buf(),
                collection: "chat".to_string(),
                dimension: 64,
            })
            .unwrap(),
        );
        let llm = Arc::new(StubProvider::with_fallback(
            "The system monitors performance in real time.",
        ));
        let engine = RetrievalEngine::new(store.clone(), llm.clone(), RetrievalConfig::default());

        let mut metadata = ChunkMetadata::new();
        metadata.insert("source".to_string(), "proposal.md".to_string());
        engine
            .ingest(&[(
                "c1".to_string(),
                "The monitoring subsystem tracks performance metrics.".to_string(),
                metadata,
            )])
            .await
            .unwrap();

        let cancel = CancellationToken::new();
        let answer = engine.ask("what does monitoring do?", &cancel).await.unwrap();
        assert!(!answer.retrieved.is_empty());
        assert_eq!(answer.sources, vec!["proposal.md".to_string()]);

        let prompts = llm.recorded_prompts();
        assert!(prompts[0].contains("monitoring subsystem"));
    }
}
