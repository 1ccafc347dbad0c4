use crate::error::{ArcadiaError, Result};
use crate::types::{ArcadiaPhase, RequirementKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Configuration for the LLM gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the text-generation endpoint.
    pub base_url: String,
    /// Model used for extraction and generation calls.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum retries for transport failures.
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("ARCADIA_LLM_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            model: std::env::var("ARCADIA_LLM_MODEL")
                .unwrap_or_else(|_| "llama3:instruct".to_string()),
            timeout_secs: 60,
            max_retries: 3,
        }
    }
}

/// Configuration for the persistent vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    /// On-disk location of the collection snapshot.
    pub path: PathBuf,
    /// Fixed collection name.
    pub collection: String,
    /// Embedding dimension of the built-in embedder.
    pub dimension: usize,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/vectordb"),
            collection: "arcadia_requirements".to_string(),
            dimension: 256,
        }
    }
}

/// Configuration for document chunking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DocumentConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Feature-flag configuration driving an orchestrated run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub enable_enhanced_generation: bool,
    pub enable_structured_analysis: bool,
    pub enable_persistence: bool,
    pub enable_validation: bool,
    pub enable_enrichment: bool,
    pub enable_cross_phase_analysis: bool,
    pub quality_threshold: f64,
    pub target_phases: Vec<ArcadiaPhase>,
    pub requirement_types: Vec<RequirementKind>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            enable_enhanced_generation: true,
            enable_structured_analysis: true,
            enable_persistence: true,
            enable_validation: true,
            enable_enrichment: true,
            enable_cross_phase_analysis: true,
            quality_threshold: 0.7,
            target_phases: ArcadiaPhase::EXTRACTION_PHASES.to_vec(),
            requirement_types: vec![
                RequirementKind::Functional,
                RequirementKind::NonFunctional,
                RequirementKind::Stakeholder,
            ],
        }
    }
}

impl PipelineConfig {
    /// Derive the working configuration for one request. `"all"` expands to
    /// the four extraction phases; an unknown phase name or an empty
    /// requirement-type list is rejected before any LLM call.
    pub fn working_config(
        &self,
        target_phase: &str,
        requirement_types: Option<Vec<RequirementKind>>,
    ) -> Result<PipelineConfig> {
        let mut config = self.clone();

        if target_phase == "all" {
            config.target_phases = ArcadiaPhase::EXTRACTION_PHASES.to_vec();
        } else {
            let phase = ArcadiaPhase::from_str(target_phase)
                .map_err(ArcadiaError::InvalidConfiguration)?;
            if !ArcadiaPhase::EXTRACTION_PHASES.contains(&phase) {
                return Err(ArcadiaError::InvalidConfiguration(format!(
                    "phase {phase} is not an extraction phase"
                )));
            }
            config.target_phases = vec![phase];
        }

        if let Some(types) = requirement_types {
            if types.is_empty() {
                return Err(ArcadiaError::InvalidConfiguration(
                    "requirement types must not be empty".to_string(),
                ));
            }
            config.requirement_types = types;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn working_config_expands_all() {
        let config = PipelineConfig::default()
            .working_config("all", None)
            .unwrap();
        assert_eq!(config.target_phases.len(), 4);
    }

    #[test]
    fn working_config_rejects_unknown_phase() {
        let err = PipelineConfig::default().working_config("cosmic", None);
        assert!(matches!(err, Err(ArcadiaError::InvalidConfiguration(_))));
    }

    #[test]
    fn working_config_rejects_empty_types() {
        let err = PipelineConfig::default().working_config("system", Some(vec![]));
        assert!(matches!(err, Err(ArcadiaError::InvalidConfiguration(_))));
    }

    #[test]
    fn working_config_rejects_building_strategy() {
        let err = PipelineConfig::default().working_config("building_strategy", None);
        assert!(matches!(err, Err(ArcadiaError::InvalidConfiguration(_))));
    }
}
