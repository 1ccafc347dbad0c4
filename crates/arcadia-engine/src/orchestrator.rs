//! End-to-end orchestration of a single run: chunking, traditional and
//! enhanced generation, structured extraction, cross-phase analysis,
//! validation and persistence, driven by the feature-flag configuration.
//!
//! A run is deterministic given identical inputs, identical LLM responses
//! and identical configuration. Phase outputs are produced in order and
//! never mutated once set; an extractor failure leaves its phase empty and
//! the run continues.

use crate::sink::ResultSink;
use arcadia_ai::LlmProvider;
use arcadia_core::model::{
    ArcadiaStructuredOutput, GenerationMetadata, Stakeholder,
};
use arcadia_core::{ArcadiaPhase, DocumentChunk, PipelineConfig, RequirementKind, Result};
use arcadia_extract::{
    ContextEnricher, CrossPhaseAnalyzer, DocumentProcessor, LogicalExtractor,
    OperationalExtractor, PhysicalExtractor, SystemExtractor,
};
use arcadia_requirements::export::RequirementsByPhase;
use arcadia_requirements::{
    PhaseRequirements, RequirementsGenerator, ValidationPipeline, ValidationReport,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Counts over the generated requirements.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationStatistics {
    pub total_requirements: usize,
    pub by_phase: BTreeMap<String, BTreeMap<String, usize>>,
    pub by_type: BTreeMap<String, usize>,
    pub by_priority: BTreeMap<String, usize>,
}

/// Effect of knowledge-base enrichment on the generation context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrichmentSummary {
    pub original_chunks: usize,
    pub enriched_chunks: usize,
    pub added_chunks: usize,
    pub enrichment_effectiveness: f64,
}

/// Share of requirements following the phase template skeleton, as a
/// percentage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateCompliance {
    pub overall_compliance: f64,
    pub template_matches: usize,
    pub total_requirements: usize,
    pub phase: String,
}

/// Assembled output of one orchestrated run.
#[derive(Debug, Clone)]
pub struct UnifiedResult {
    pub requirements: RequirementsByPhase,
    pub stakeholders: Vec<Stakeholder>,
    pub statistics: GenerationStatistics,
    pub structured: Option<ArcadiaStructuredOutput>,
    pub validation: Option<ValidationReport>,
    pub enrichment: Option<EnrichmentSummary>,
    pub template_compliance: Option<TemplateCompliance>,
    pub quality_score: f64,
    pub recommendations: Vec<String>,
    pub project_id: Option<String>,
    pub session_id: Option<String>,
    pub generation_seconds: f64,
}

/// Drives a request end-to-end through the configured components.
pub struct UnifiedPipeline {
    config: PipelineConfig,
    llm: Arc<dyn LlmProvider>,
    processor: DocumentProcessor,
    enricher: ContextEnricher,
    analyzer: CrossPhaseAnalyzer,
    validator: ValidationPipeline,
    sink: Option<Arc<dyn ResultSink>>,
}

impl UnifiedPipeline {
    pub fn new(config: PipelineConfig, llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            config,
            llm,
            processor: DocumentProcessor::default(),
            enricher: ContextEnricher::new(),
            analyzer: CrossPhaseAnalyzer::new(),
            validator: ValidationPipeline::default(),
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ResultSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Run a full generation request. An invalid phase name or empty
    /// requirement-type list is rejected before any LLM call; everything
    /// else degrades to partial output instead of failing.
    #[instrument(skip_all, fields(target_phase))]
    pub async fn run(
        &self,
        proposal: &str,
        target_phase: &str,
        requirement_types: Option<Vec<RequirementKind>>,
        project_name: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<UnifiedResult> {
        let working = self.config.working_config(target_phase, requirement_types)?;
        let start = std::time::Instant::now();

        let mut result = UnifiedResult {
            requirements: RequirementsByPhase::new(),
            stakeholders: Vec::new(),
            statistics: GenerationStatistics::default(),
            structured: None,
            validation: None,
            enrichment: None,
            template_compliance: None,
            quality_score: 0.0,
            recommendations: Vec::new(),
            project_id: None,
            session_id: None,
            generation_seconds: 0.0,
        };

        if proposal.trim().is_empty() {
            info!("empty proposal; returning empty result without LLM calls");
            for phase in &working.target_phases {
                result.requirements.insert(*phase, PhaseRequirements::default());
            }
            result.statistics = compute_statistics(&result.requirements);
            result.generation_seconds = start.elapsed().as_secs_f64();
            return Ok(result);
        }

        let chunks = self.processor.chunk(proposal, "proposal");
        info!(chunks = chunks.len(), "proposal processed");

        // Step 1: traditional generation, no enrichment, no balancing.
        let mut generator = RequirementsGenerator::new(self.llm.clone());
        for phase in &working.target_phases {
            let phase_chunks = owned_phase_chunks(&self.processor, &chunks, *phase);
            let kinds = kinds_for_phase(&working.requirement_types, *phase);
            let generated = generator
                .generate(&phase_chunks, *phase, proposal, &kinds, false, cancel)
                .await;
            result.stakeholders.extend(generated.stakeholders);
            result.requirements.insert(*phase, generated.requirements);
        }

        // Step 2: enhanced generation over enriched context, with balancing.
        if working.enable_enhanced_generation {
            let primary_phase = working.target_phases[0];
            let enriched = if working.enable_enrichment {
                let enriched =
                    self.enricher
                        .enrich(primary_phase, &chunks, &working.requirement_types);
                result.enrichment = Some(EnrichmentSummary {
                    original_chunks: chunks.len(),
                    enriched_chunks: enriched.len(),
                    added_chunks: enriched.len() - chunks.len(),
                    enrichment_effectiveness: ((enriched.len() - chunks.len()) as f64
                        / chunks.len().max(1) as f64)
                        .min(1.0),
                });
                enriched
            } else {
                chunks.clone()
            };

            let mut enhanced_generator = RequirementsGenerator::new(self.llm.clone());
            for phase in &working.target_phases {
                let kinds = kinds_for_phase(&working.requirement_types, *phase);
                let generated = enhanced_generator
                    .generate(&enriched, *phase, proposal, &kinds, true, cancel)
                    .await;

                let entry = result.requirements.entry(*phase).or_default();
                if kinds.contains(&RequirementKind::Functional) {
                    entry.functional = generated.requirements.functional;
                }
                if kinds.contains(&RequirementKind::NonFunctional) {
                    entry.non_functional = generated.requirements.non_functional;
                }
                if kinds.contains(&RequirementKind::Stakeholder)
                    && !generated.requirements.stakeholder.is_empty()
                {
                    entry.stakeholder = generated.requirements.stakeholder;
                }
            }
        }

        // Step 3: structured ARCADIA extraction in phase order.
        if working.enable_structured_analysis {
            result.structured = Some(
                self.extract_structured(&chunks, proposal, &working, cancel)
                    .await,
            );
        }

        // Step 4: validation and template compliance.
        if working.enable_validation {
            let all: Vec<_> = result
                .requirements
                .values()
                .flat_map(|phase_requirements| phase_requirements.iter().cloned())
                .collect();
            let primary_phase = working.target_phases[0];
            let report = self.validator.validate(&all, primary_phase);
            result.recommendations = report.recommendations.clone();
            result.template_compliance = Some(template_compliance(
                &all,
                primary_phase,
                self.enricher.phase_template(primary_phase),
            ));
            result.validation = Some(report);
        }

        result.statistics = compute_statistics(&result.requirements);

        // Step 5: persistence hand-off.
        if working.enable_persistence {
            if let (Some(project_name), Some(sink)) = (project_name, &self.sink) {
                let payload = serde_json::json!({
                    "requirements": result.requirements,
                    "stakeholders": result.stakeholders,
                    "statistics": result.statistics,
                });
                match sink.persist(project_name, proposal, &payload).await {
                    Ok(persisted) => {
                        result.project_id = Some(persisted.project_id);
                        result.session_id = Some(persisted.session_id);
                    }
                    Err(e) => warn!(error = %e, "persistence failed; continuing"),
                }
            }
        }

        result.quality_score = overall_quality_score(&result);
        result.generation_seconds = start.elapsed().as_secs_f64();

        info!(
            total = result.statistics.total_requirements,
            quality = result.quality_score,
            seconds = result.generation_seconds,
            "requirements generation completed"
        );
        Ok(result)
    }

    async fn extract_structured(
        &self,
        chunks: &[DocumentChunk],
        proposal: &str,
        working: &PipelineConfig,
        cancel: &CancellationToken,
    ) -> ArcadiaStructuredOutput {
        let analysis_id = Uuid::new_v4().to_string();
        let started = Utc::now();
        let source_documents = vec!["proposal".to_string()];
        let mut output = ArcadiaStructuredOutput::new(GenerationMetadata::new(
            analysis_id,
            started,
            working.target_phases.clone(),
            source_documents.clone(),
        ));

        if working.target_phases.contains(&ArcadiaPhase::Operational) {
            let extractor = OperationalExtractor::new(self.llm.clone());
            let operational = extractor
                .extract(chunks, proposal, &source_documents, cancel)
                .await;
            output.generation.phases_completed.push(ArcadiaPhase::Operational);
            output.operational = Some(operational);
        }

        if working.target_phases.contains(&ArcadiaPhase::System) {
            let extractor = SystemExtractor::new(self.llm.clone());
            let system = extractor
                .extract(
                    chunks,
                    proposal,
                    output.operational.as_ref(),
                    &source_documents,
                    cancel,
                )
                .await;
            output.generation.phases_completed.push(ArcadiaPhase::System);
            output.system = Some(system);
        }

        if working.target_phases.contains(&ArcadiaPhase::Logical) {
            let extractor = LogicalExtractor::new(self.llm.clone());
            let logical = extractor
                .extract(
                    chunks,
                    proposal,
                    output.operational.as_ref(),
                    output.system.as_ref(),
                    &source_documents,
                    cancel,
                )
                .await;
            output.generation.phases_completed.push(ArcadiaPhase::Logical);
            output.logical = Some(logical);
        }

        if working.target_phases.contains(&ArcadiaPhase::Physical) {
            let extractor = PhysicalExtractor::new(self.llm.clone());
            let physical = extractor
                .extract(
                    chunks,
                    proposal,
                    output.operational.as_ref(),
                    output.system.as_ref(),
                    output.logical.as_ref(),
                    &source_documents,
                    cancel,
                )
                .await;
            output.generation.phases_completed.push(ArcadiaPhase::Physical);
            output.physical = Some(physical);
        }

        if working.enable_cross_phase_analysis && working.target_phases.len() > 1 {
            output.cross_phase = Some(self.analyzer.analyze(&output));
        }

        let finished = Utc::now();
        output.generation.finished_at = Some(finished);
        output.generation.processing_seconds =
            (finished - started).num_milliseconds() as f64 / 1000.0;
        output
    }
}

fn owned_phase_chunks(
    processor: &DocumentProcessor,
    chunks: &[DocumentChunk],
    phase: ArcadiaPhase,
) -> Vec<DocumentChunk> {
    processor
        .filter_by_phase(chunks, phase)
        .into_iter()
        .cloned()
        .collect()
}

/// Stakeholder requirements are generated on the operational phase only.
fn kinds_for_phase(requested: &[RequirementKind], phase: ArcadiaPhase) -> Vec<RequirementKind> {
    requested
        .iter()
        .copied()
        .filter(|kind| {
            *kind != RequirementKind::Stakeholder || phase == ArcadiaPhase::Operational
        })
        .collect()
}

fn compute_statistics(requirements: &RequirementsByPhase) -> GenerationStatistics {
    let mut statistics = GenerationStatistics::default();

    for (phase, phase_requirements) in requirements {
        let mut per_phase: BTreeMap<String, usize> = BTreeMap::new();
        let mut phase_total = 0usize;

        for (kind_key, list) in [
            ("functional", &phase_requirements.functional),
            ("non_functional", &phase_requirements.non_functional),
            ("stakeholder", &phase_requirements.stakeholder),
        ] {
            per_phase.insert(kind_key.to_string(), list.len());
            phase_total += list.len();
            *statistics.by_type.entry(kind_key.to_string()).or_insert(0) += list.len();
            for requirement in list {
                *statistics
                    .by_priority
                    .entry(requirement.priority.to_string())
                    .or_insert(0) += 1;
            }
        }

        per_phase.insert("total".to_string(), phase_total);
        statistics.total_requirements += phase_total;
        statistics.by_phase.insert(phase.key().to_string(), per_phase);
    }

    statistics
}

/// Share of requirements whose description follows one of the phase's
/// requirement pattern skeletons from the knowledge base.
fn template_compliance(
    requirements: &[arcadia_core::model::Requirement],
    phase: ArcadiaPhase,
    template: Option<&arcadia_extract::enricher::PhaseTemplate>,
) -> TemplateCompliance {
    let patterns: &[&str] = template.map(|t| t.requirement_patterns).unwrap_or(&[]);
    let matches = requirements
        .iter()
        .filter(|requirement| {
            patterns
                .iter()
                .any(|pattern| matches_pattern_skeleton(&requirement.description, pattern))
        })
        .count();

    TemplateCompliance {
        overall_compliance: if requirements.is_empty() {
            0.0
        } else {
            matches as f64 / requirements.len() as f64 * 100.0
        },
        template_matches: matches,
        total_requirements: requirements.len(),
        phase: phase.key().to_string(),
    }
}

/// Whether a description follows a template pattern's skeleton: the
/// pattern's literal segments (everything outside `{placeholder}` slots)
/// must appear in order, case-insensitively, anchored at the start when the
/// pattern opens with a literal.
fn matches_pattern_skeleton(description: &str, pattern: &str) -> bool {
    let description = description.to_lowercase();
    let pattern = pattern.to_lowercase();

    let anchored = !pattern.starts_with('{');
    let mut segments = Vec::new();
    let mut rest = pattern.as_str();
    while let Some(open) = rest.find('{') {
        if open > 0 {
            segments.push(&rest[..open]);
        }
        match rest[open..].find('}') {
            Some(close) => rest = &rest[open + close + 1..],
            None => {
                rest = "";
                break;
            }
        }
    }
    if !rest.is_empty() {
        segments.push(rest);
    }
    if segments.is_empty() {
        return false;
    }

    let mut position = 0usize;
    for (index, segment) in segments.iter().enumerate() {
        match description[position..].find(segment) {
            Some(found) => {
                if index == 0 && anchored && found != 0 {
                    return false;
                }
                position += found + segment.len();
            }
            None => return false,
        }
    }
    true
}

/// Mean of the available quality terms: requirement presence, validation
/// score, template compliance and cross-phase metric quality.
fn overall_quality_score(result: &UnifiedResult) -> f64 {
    let mut scores = Vec::new();

    if result.statistics.total_requirements > 0 {
        scores.push(0.7);
    }
    if let Some(validation) = &result.validation {
        scores.push(validation.overall_score);
    }
    if let Some(compliance) = &result.template_compliance {
        scores.push(compliance.overall_compliance / 100.0);
    }
    if let Some(cross) = result
        .structured
        .as_ref()
        .and_then(|structured| structured.cross_phase.as_ref())
    {
        if !cross.quality_metrics.is_empty() {
            let mean = cross
                .quality_metrics
                .iter()
                .map(|metric| metric.score / metric.max_score.max(f64::EPSILON))
                .sum::<f64>()
                / cross.quality_metrics.len() as f64;
            scores.push(mean);
        }
    }

    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_filtering_keeps_stakeholder_for_operational_only() {
        let requested = vec![
            RequirementKind::Functional,
            RequirementKind::Stakeholder,
        ];
        let operational = kinds_for_phase(&requested, ArcadiaPhase::Operational);
        assert!(operational.contains(&RequirementKind::Stakeholder));
        let system = kinds_for_phase(&requested, ArcadiaPhase::System);
        assert!(!system.contains(&RequirementKind::Stakeholder));
    }

    #[test]
    fn statistics_count_by_phase_type_and_priority() {
        let mut requirements = RequirementsByPhase::new();
        requirements.insert(ArcadiaPhase::System, PhaseRequirements::default());
        let statistics = compute_statistics(&requirements);
        assert_eq!(statistics.total_requirements, 0);
        assert_eq!(statistics.by_phase["system"]["total"], 0);
    }

    #[test]
    fn skeleton_matching_accepts_phase_pattern_shapes() {
        assert!(matches_pattern_skeleton(
            "During startup, the system shall initialize all sensors within 5 seconds",
            "During {scenario}, the system shall {action} within {constraint}",
        ));
        assert!(matches_pattern_skeleton(
            "Component Data Manager shall communicate with Alert Engine via Storage API",
            "Component {component} shall communicate with {other_component} via {interface}",
        ));
        // Literal opening segments are anchored at the start.
        assert!(!matches_pattern_skeleton(
            "Sometimes, during startup, the system shall recover within 5 seconds",
            "During {scenario}, the system shall {action} within {constraint}",
        ));
        assert!(!matches_pattern_skeleton(
            "The system shall archive telemetry readings for later review",
            "During {scenario}, the system shall {action} within {constraint}",
        ));
    }

    #[test]
    fn template_compliance_checks_against_phase_patterns() {
        use arcadia_core::model::Requirement;
        use arcadia_core::{Priority, RequirementKind};

        let requirement = |description: &str| Requirement {
            id: "FR-SYS-001".to_string(),
            kind: RequirementKind::Functional,
            title: "Test".to_string(),
            description: description.to_string(),
            priority: Priority::Should,
            priority_confidence: 0.5,
            rationale: String::new(),
            phase: ArcadiaPhase::System,
            verification_method: "Requirements traceability check".to_string(),
            dependencies: vec![],
            capability_links: vec![],
            scenario_links: vec![],
            stakeholder_links: vec![],
            rebalanced: false,
            nfr: None,
        };

        let enricher = ContextEnricher::new();
        let template = enricher.phase_template(ArcadiaPhase::System);
        let requirements = vec![
            requirement(
                "The system shall correlate sensor streams to support the Real-time \
                 Monitoring capability",
            ),
            requirement("The system shall archive telemetry readings for later review"),
        ];

        let compliance = template_compliance(&requirements, ArcadiaPhase::System, template);
        assert_eq!(compliance.template_matches, 1);
        assert_eq!(compliance.total_requirements, 2);
        assert!((compliance.overall_compliance - 50.0).abs() < 1e-9);

        // Without a template there is nothing to comply with.
        let none = template_compliance(&requirements, ArcadiaPhase::System, None);
        assert_eq!(none.template_matches, 0);
    }
}
