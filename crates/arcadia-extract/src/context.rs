//! Prompt context assembly shared by the phase extractors: context is always
//! truncated (top-3 chunks, ~400 characters each) so no prompt grows without
//! bound.

use crate::json;
use arcadia_ai::{GenerationOptions, LlmError, LlmProvider};
use arcadia_core::model::ExtractionStatus;
use arcadia_core::DocumentChunk;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Chunks included in a sub-extraction prompt.
pub const CONTEXT_CHUNKS: usize = 3;
/// Per-chunk truncation inside a prompt.
pub const CONTEXT_CHUNK_CHARS: usize = 400;
/// Prior-phase references included per element kind.
pub const PRIOR_REFERENCES: usize = 3;
/// Proposal text truncation inside a prompt.
pub const PROPOSAL_CHARS: usize = 1500;

/// Truncate at a char boundary, appending an ellipsis when cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// Join the top chunks into a prompt context block.
pub fn prepare_context(chunks: &[DocumentChunk]) -> String {
    chunks
        .iter()
        .take(CONTEXT_CHUNKS)
        .map(|chunk| truncate(&chunk.content, CONTEXT_CHUNK_CHARS))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

/// Chunk ids referenced as provenance for extracted elements.
pub fn chunk_references(chunks: &[DocumentChunk]) -> Vec<String> {
    chunks
        .iter()
        .take(CONTEXT_CHUNKS)
        .map(|chunk| chunk.id.clone())
        .collect()
}

/// Summarise prior-phase elements as `name: description` lines, capped.
pub fn summarize_prior<'a, I>(label: &str, items: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let lines: Vec<String> = items
        .into_iter()
        .take(PRIOR_REFERENCES)
        .map(|(name, description)| format!("- {}: {}", name, truncate(description, 120)))
        .collect();
    if lines.is_empty() {
        String::new()
    } else {
        format!("{label}:\n{}\n", lines.join("\n"))
    }
}

/// Confidence for one sub-extraction:
/// `0.7 * min(1, extracted/5) + 0.3 * min(1, context_chars/1000)`.
pub fn extraction_confidence(extracted: usize, context_chars: usize) -> f64 {
    0.7 * (extracted as f64 / 5.0).min(1.0) + 0.3 * (context_chars as f64 / 1000.0).min(1.0)
}

/// Resolve raw names against `(id, name)` candidates, case-insensitively.
/// Unknown names are dropped.
pub fn resolve_names(requested: &[String], candidates: &[(String, String)]) -> Vec<String> {
    requested
        .iter()
        .filter_map(|raw| {
            let needle = raw.trim().to_lowercase();
            candidates
                .iter()
                .find(|(_, name)| name.to_lowercase() == needle)
                .map(|(id, _)| id.clone())
        })
        .collect()
}

/// Result of one prompted sub-extraction: the parsed element objects and the
/// status recorded in the phase metadata.
pub struct SubExtraction {
    pub elements: Vec<Map<String, Value>>,
    pub status: ExtractionStatus,
}

/// Run one sub-extraction: prompt → LLM → balanced-brace JSON → element
/// array. Transport-class failures and malformed output both yield an empty
/// element list; the extractor carries on with the next sub-extraction.
pub async fn request_elements(
    llm: &dyn LlmProvider,
    prompt: &str,
    key: &str,
    cancel: &CancellationToken,
) -> SubExtraction {
    let options = GenerationOptions::default().with_temperature(0.3);
    let response = match llm.generate(prompt, &options, cancel).await {
        Ok(text) => text,
        Err(e) if e.is_transport_class() => {
            warn!(key, error = %e, "sub-extraction transport failure");
            return SubExtraction {
                elements: Vec::new(),
                status: ExtractionStatus::TransportFailed,
            };
        }
        Err(LlmError::RateLimited(message)) => {
            warn!(key, %message, "sub-extraction rate limited");
            return SubExtraction {
                elements: Vec::new(),
                status: ExtractionStatus::TransportFailed,
            };
        }
        Err(e) => {
            warn!(key, error = %e, "sub-extraction failed");
            return SubExtraction {
                elements: Vec::new(),
                status: ExtractionStatus::MalformedOutput,
            };
        }
    };

    match json::parse_object(&response) {
        Some(value) => {
            let elements = json::object_array(&value, key);
            let status = if elements.is_empty() {
                ExtractionStatus::Empty
            } else {
                ExtractionStatus::Ok
            };
            SubExtraction { elements, status }
        }
        None => {
            warn!(key, "no parseable JSON object in response");
            SubExtraction {
                elements: Vec::new(),
                status: ExtractionStatus::MalformedOutput,
            }
        }
    }
}

/// Like [`request_elements`] but for prompts answered with a single object.
pub async fn request_object(
    llm: &dyn LlmProvider,
    prompt: &str,
    cancel: &CancellationToken,
) -> (Option<Map<String, Value>>, ExtractionStatus) {
    let options = GenerationOptions::default().with_temperature(0.3);
    let response = match llm.generate(prompt, &options, cancel).await {
        Ok(text) => text,
        Err(e) if e.is_transport_class() => {
            warn!(error = %e, "single-object extraction transport failure");
            return (None, ExtractionStatus::TransportFailed);
        }
        Err(e) => {
            warn!(error = %e, "single-object extraction failed");
            return (None, ExtractionStatus::MalformedOutput);
        }
    };

    match json::parse_object(&response).and_then(|v| v.as_object().cloned()) {
        Some(obj) => (Some(obj), ExtractionStatus::Ok),
        None => (None, ExtractionStatus::MalformedOutput),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcadia_core::ArcadiaPhase;

    fn chunk(id: &str, content: &str) -> DocumentChunk {
        DocumentChunk::new(id, content, "test", 0, ArcadiaPhase::System)
    }

    #[test]
    fn context_uses_top_three_chunks_only() {
        let chunks = vec![
            chunk("c0", "alpha"),
            chunk("c1", "beta"),
            chunk("c2", "gamma"),
            chunk("c3", "delta"),
        ];
        let context = prepare_context(&chunks);
        assert!(context.contains("gamma"));
        assert!(!context.contains("delta"));
        assert_eq!(chunk_references(&chunks), vec!["c0", "c1", "c2"]);
    }

    #[test]
    fn long_chunks_are_truncated() {
        let long = "x".repeat(1000);
        let context = prepare_context(&[chunk("c0", &long)]);
        assert!(context.chars().count() <= CONTEXT_CHUNK_CHARS + 3);
    }

    #[test]
    fn confidence_saturates_at_one() {
        assert!(extraction_confidence(10, 5000) <= 1.0);
        assert_eq!(extraction_confidence(0, 0), 0.0);
        let mid = extraction_confidence(5, 1000);
        assert!((mid - 1.0).abs() < 1e-9);
    }

    #[test]
    fn name_resolution_is_case_insensitive() {
        let candidates = vec![
            ("OA-ACTOR-001".to_string(), "Mission Commander".to_string()),
            ("OA-ACTOR-002".to_string(), "Operations Center".to_string()),
        ];
        let resolved = resolve_names(
            &["mission commander".to_string(), "Unknown".to_string()],
            &candidates,
        );
        assert_eq!(resolved, vec!["OA-ACTOR-001"]);
    }

    #[tokio::test]
    async fn malformed_response_yields_empty_with_status() {
        let stub = arcadia_ai::StubProvider::with_fallback("definitely not json");
        let cancel = CancellationToken::new();
        let result = request_elements(&stub, "prompt", "actors", &cancel).await;
        assert!(result.elements.is_empty());
        assert_eq!(result.status, ExtractionStatus::MalformedOutput);
    }

    #[tokio::test]
    async fn transport_failure_yields_empty_with_status() {
        let stub = arcadia_ai::StubProvider::new();
        stub.push_error(arcadia_ai::LlmError::Transport("down".to_string()));
        let cancel = CancellationToken::new();
        let result = request_elements(&stub, "prompt", "actors", &cancel).await;
        assert_eq!(result.status, ExtractionStatus::TransportFailed);
    }
}
