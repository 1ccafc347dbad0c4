use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of a single sub-extraction, recorded so downstream components can
/// detect partial failure instead of inferring it from empty lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    Ok,
    Empty,
    TransportFailed,
    MalformedOutput,
}

/// Per-phase extraction metadata: provenance, timing, confidence and status
/// per sub-extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    pub source_documents: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub processing_seconds: f64,
    /// Confidence per sub-extraction, in [0, 1].
    pub confidence_scores: BTreeMap<String, f64>,
    pub statuses: BTreeMap<String, ExtractionStatus>,
    pub statistics: BTreeMap<String, u64>,
}

impl ExtractionMetadata {
    pub fn new(source_documents: Vec<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            source_documents,
            started_at,
            processing_seconds: 0.0,
            confidence_scores: BTreeMap::new(),
            statuses: BTreeMap::new(),
            statistics: BTreeMap::new(),
        }
    }

    pub fn record(
        &mut self,
        step: &str,
        status: ExtractionStatus,
        confidence: f64,
        extracted: u64,
    ) {
        self.statuses.insert(step.to_string(), status);
        self.confidence_scores
            .insert(step.to_string(), confidence.clamp(0.0, 1.0));
        self.statistics.insert(format!("{step}_extracted"), extracted);
    }
}
