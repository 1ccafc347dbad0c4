//! Deterministic feature-hashing embedder backing the store's built-in
//! similarity. Token unigrams and bigrams are hashed into a fixed-dimension
//! vector which is then L2-normalised, so cosine similarity reduces to a dot
//! product and identical texts always embed identically.

use std::hash::{Hash, Hasher};

/// Built-in text embedder with a fixed output dimension.
#[derive(Debug, Clone)]
pub struct TextEmbedder {
    dimension: usize,
}

impl TextEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(8),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Embed a text into a unit-length vector.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        let tokens: Vec<String> = tokenize(text);

        for token in &tokens {
            bump(&mut vector, token, 1.0);
        }
        for pair in tokens.windows(2) {
            bump(&mut vector, &format!("{} {}", pair[0], pair[1]), 0.5);
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }

    /// Cosine similarity of two unit vectors.
    pub fn similarity(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

fn bump(vector: &mut [f32], token: &str, weight: f32) {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    token.hash(&mut hasher);
    let h = hasher.finish();
    let index = (h % vector.len() as u64) as usize;
    // Sign bit from a higher hash bit keeps buckets from only accumulating.
    let sign = if (h >> 32) & 1 == 0 { 1.0 } else { -1.0 };
    vector[index] += sign * weight;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_texts_embed_identically() {
        let embedder = TextEmbedder::new(64);
        let a = embedder.embed("mission planning capability");
        let b = embedder.embed("mission planning capability");
        assert_eq!(a, b);
        assert!((TextEmbedder::similarity(&a, &b) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn related_text_scores_above_unrelated() {
        let embedder = TextEmbedder::new(256);
        let query = embedder.embed("monitor system performance in real time");
        let related = embedder.embed("the system shall monitor performance metrics in real time");
        let unrelated = embedder.embed("sandwich recipes with pickled onions");
        assert!(
            TextEmbedder::similarity(&query, &related)
                > TextEmbedder::similarity(&query, &unrelated)
        );
    }

    #[test]
    fn embeddings_are_unit_length() {
        let embedder = TextEmbedder::new(128);
        let v = embedder.embed("deployment configuration for hardware nodes");
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }
}
