//! Cross-phase analysis: traceability links, gap analysis, consistency
//! checks, quality metrics, coverage and impact lists over the four phase
//! outputs.
//!
//! Links always go from the earlier phase to the later one; for each source
//! element a single link is emitted to the highest-scoring target above the
//! pair's threshold. End-to-end operational→physical links are marked
//! `requires_validation`.

use crate::similarity::{
    name_similarity, semantic_similarity, ElementFacets, SimilarityMode,
};
use arcadia_core::ids::{consistency_id, gap_id, quality_id, trace_id};
use arcadia_core::model::{
    ArcadiaStructuredOutput, ArchitectureConsistencyCheck, CheckStatus, CoverageScores,
    CrossPhaseAnalysis, ExtractionMetadata, GapAnalysisItem, GapKind, GapSeverity, ImpactAnalysis,
    LogicalArchitecture, LogicalComponent, LogicalFunction, OperationalActor, OperationalAnalysis,
    OperationalCapability, PhysicalArchitecture, PhysicalComponent, PhysicalFunction,
    QualityMetric, RelationshipKind, SystemActor, SystemAnalysis, SystemCapability,
    SystemFunction, TraceabilityLink, ValidationStatus,
};
use arcadia_core::ArcadiaPhase;
use chrono::Utc;
use std::collections::BTreeMap;
use tracing::{info, instrument};

const CAPABILITY_THRESHOLD: f64 = 0.5;
const ACTOR_THRESHOLD: f64 = 0.6;
const END_TO_END_THRESHOLD: f64 = 0.6;
const INTERFACE_THRESHOLD: f64 = 0.7;

/// Expected operational capability themes checked during gap analysis.
const EXPECTED_CAPABILITY_THEMES: [&str; 4] =
    ["security", "monitoring", "data_processing", "user_interface"];

#[derive(Debug, Clone, Default)]
pub struct CrossPhaseAnalyzer;

impl CrossPhaseAnalyzer {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip_all)]
    pub fn analyze(&self, output: &ArcadiaStructuredOutput) -> CrossPhaseAnalysis {
        let traceability_links = self.generate_traceability_links(output);
        let gap_analysis = self.perform_gap_analysis(output);
        let consistency_checks = self.check_consistency(output);
        let quality_metrics = self.quality_metrics(output);
        let coverage_matrix = self.coverage_matrix(output);
        let impact_analysis = self.impact_analysis(output);

        let mut metadata =
            ExtractionMetadata::new(vec!["cross_phase_analysis".to_string()], Utc::now());
        metadata
            .confidence_scores
            .insert("traceability".to_string(), 0.8);
        metadata
            .confidence_scores
            .insert("gap_analysis".to_string(), 0.7);
        metadata
            .statistics
            .insert("links_generated".to_string(), traceability_links.len() as u64);
        metadata
            .statistics
            .insert("gaps_identified".to_string(), gap_analysis.len() as u64);

        info!(
            links = traceability_links.len(),
            gaps = gap_analysis.len(),
            checks = consistency_checks.len(),
            "cross-phase analysis completed"
        );

        CrossPhaseAnalysis {
            traceability_links,
            gap_analysis,
            consistency_checks,
            quality_metrics,
            coverage_matrix,
            impact_analysis,
            metadata,
        }
    }

    fn generate_traceability_links(
        &self,
        output: &ArcadiaStructuredOutput,
    ) -> Vec<TraceabilityLink> {
        let mut links = Vec::new();

        if let (Some(op), Some(sys)) = (&output.operational, &output.system) {
            self.link_best_matches(
                &mut links,
                op.capabilities.iter().map(op_capability_facets).collect(),
                op.capabilities.iter().map(|c| c.id.clone()).collect(),
                sys.capabilities.iter().map(sys_capability_facets).collect(),
                sys.capabilities.iter().map(|c| c.id.clone()).collect(),
                SimilarityMode::Comprehensive,
                CAPABILITY_THRESHOLD,
                ArcadiaPhase::Operational,
                ArcadiaPhase::System,
                RelationshipKind::Realizes,
                ValidationStatus::Unverified,
            );
            self.link_best_matches(
                &mut links,
                op.actors.iter().map(op_actor_facets).collect(),
                op.actors.iter().map(|a| a.id.clone()).collect(),
                sys.actors.iter().map(sys_actor_facets).collect(),
                sys.actors.iter().map(|a| a.id.clone()).collect(),
                SimilarityMode::Contextual,
                ACTOR_THRESHOLD,
                ArcadiaPhase::Operational,
                ArcadiaPhase::System,
                RelationshipKind::Implements,
                ValidationStatus::Unverified,
            );
        }

        if let (Some(sys), Some(log)) = (&output.system, &output.logical) {
            self.link_best_matches(
                &mut links,
                sys.functions.iter().map(sys_function_facets).collect(),
                sys.functions.iter().map(|f| f.id.clone()).collect(),
                log.functions.iter().map(log_function_facets).collect(),
                log.functions.iter().map(|f| f.id.clone()).collect(),
                SimilarityMode::Functional,
                CAPABILITY_THRESHOLD,
                ArcadiaPhase::System,
                ArcadiaPhase::Logical,
                RelationshipKind::DecomposesTo,
                ValidationStatus::Unverified,
            );
            self.link_best_matches(
                &mut links,
                sys.capabilities.iter().map(sys_capability_facets).collect(),
                sys.capabilities.iter().map(|c| c.id.clone()).collect(),
                log.components.iter().map(log_component_facets).collect(),
                log.components.iter().map(|c| c.id.clone()).collect(),
                SimilarityMode::Comprehensive,
                CAPABILITY_THRESHOLD,
                ArcadiaPhase::System,
                ArcadiaPhase::Logical,
                RelationshipKind::AllocatedTo,
                ValidationStatus::Unverified,
            );
        }

        if let (Some(log), Some(phys)) = (&output.logical, &output.physical) {
            self.link_best_matches(
                &mut links,
                log.components.iter().map(log_component_facets).collect(),
                log.components.iter().map(|c| c.id.clone()).collect(),
                phys.components.iter().map(phys_component_facets).collect(),
                phys.components.iter().map(|c| c.id.clone()).collect(),
                SimilarityMode::Comprehensive,
                CAPABILITY_THRESHOLD,
                ArcadiaPhase::Logical,
                ArcadiaPhase::Physical,
                RelationshipKind::ImplementedBy,
                ValidationStatus::Unverified,
            );
            self.link_best_matches(
                &mut links,
                log.functions.iter().map(log_function_facets).collect(),
                log.functions.iter().map(|f| f.id.clone()).collect(),
                phys.functions.iter().map(phys_function_facets).collect(),
                phys.functions.iter().map(|f| f.id.clone()).collect(),
                SimilarityMode::Functional,
                CAPABILITY_THRESHOLD,
                ArcadiaPhase::Logical,
                ArcadiaPhase::Physical,
                RelationshipKind::RealizedBy,
                ValidationStatus::Unverified,
            );
            self.link_interfaces(&mut links, log, phys);
        }

        if let (Some(op), Some(phys)) = (&output.operational, &output.physical) {
            self.link_end_to_end(&mut links, op, phys);
        }

        links
    }

    /// For each source, emit one link to the single best target above the
    /// threshold.
    #[allow(clippy::too_many_arguments)]
    fn link_best_matches(
        &self,
        links: &mut Vec<TraceabilityLink>,
        sources: Vec<ElementFacets>,
        source_ids: Vec<String>,
        targets: Vec<ElementFacets>,
        target_ids: Vec<String>,
        mode: SimilarityMode,
        threshold: f64,
        source_phase: ArcadiaPhase,
        target_phase: ArcadiaPhase,
        relationship: RelationshipKind,
        validation_status: ValidationStatus,
    ) {
        for (source, source_id) in sources.iter().zip(&source_ids) {
            let mut best: Option<(usize, f64)> = None;
            for (index, target) in targets.iter().enumerate() {
                let score = semantic_similarity(source, target, mode);
                if score > threshold && best.map_or(true, |(_, b)| score > b) {
                    best = Some((index, score));
                }
            }
            if let Some((index, score)) = best {
                links.push(TraceabilityLink {
                    id: trace_id(links.len() + 1),
                    source_element: source_id.clone(),
                    target_element: target_ids[index].clone(),
                    source_phase,
                    target_phase,
                    relationship,
                    confidence: score,
                    validation_status,
                });
            }
        }
    }

    /// Logical interfaces matched to physical component interface names.
    fn link_interfaces(
        &self,
        links: &mut Vec<TraceabilityLink>,
        logical: &LogicalArchitecture,
        physical: &PhysicalArchitecture,
    ) {
        for interface in &logical.interfaces {
            for component in &physical.components {
                for interface_name in &component.interfaces {
                    let score = name_similarity(&interface.name, interface_name);
                    if score > INTERFACE_THRESHOLD {
                        links.push(TraceabilityLink {
                            id: trace_id(links.len() + 1),
                            source_element: interface.id.clone(),
                            target_element: format!("{}:{}", component.id, interface_name),
                            source_phase: ArcadiaPhase::Logical,
                            target_phase: ArcadiaPhase::Physical,
                            relationship: RelationshipKind::ImplementedThrough,
                            confidence: score,
                            validation_status: ValidationStatus::Unverified,
                        });
                    }
                }
            }
        }
    }

    /// End-to-end capability→component links, limited to the first three
    /// capabilities and always flagged for validation.
    fn link_end_to_end(
        &self,
        links: &mut Vec<TraceabilityLink>,
        operational: &OperationalAnalysis,
        physical: &PhysicalArchitecture,
    ) {
        for capability in operational.capabilities.iter().take(3) {
            for component in &physical.components {
                let score = crate::similarity::description_similarity(
                    &capability.mission_statement,
                    &component.description,
                );
                if score > END_TO_END_THRESHOLD {
                    links.push(TraceabilityLink {
                        id: trace_id(links.len() + 1),
                        source_element: capability.id.clone(),
                        target_element: component.id.clone(),
                        source_phase: ArcadiaPhase::Operational,
                        target_phase: ArcadiaPhase::Physical,
                        relationship: RelationshipKind::Enables,
                        confidence: score,
                        validation_status: ValidationStatus::RequiresValidation,
                    });
                }
            }
        }
    }

    fn perform_gap_analysis(&self, output: &ArcadiaStructuredOutput) -> Vec<GapAnalysisItem> {
        let mut gaps = Vec::new();

        if let Some(op) = &output.operational {
            let found: Vec<String> = op
                .capabilities
                .iter()
                .map(|c| c.name.to_lowercase())
                .collect();
            for theme in EXPECTED_CAPABILITY_THEMES {
                if !found.iter().any(|name| name.contains(theme)) {
                    gaps.push(GapAnalysisItem {
                        id: gap_id(gaps.len() + 1),
                        kind: GapKind::Missing,
                        phase: ArcadiaPhase::Operational,
                        description: format!(
                            "Missing {theme} capability in operational analysis"
                        ),
                        severity: GapSeverity::Medium,
                        recommendations: vec![format!(
                            "Consider adding {theme} capability requirements"
                        )],
                    });
                }
            }
        }

        if let (Some(op), Some(sys)) = (&output.operational, &output.system) {
            let op_count = op.actors.len();
            let sys_count = sys.actors.len();
            let imbalance = op_count.abs_diff(sys_count) as f64;
            if imbalance > (op_count as f64 * 0.5).max(3.0) {
                gaps.push(GapAnalysisItem {
                    id: gap_id(gaps.len() + 1),
                    kind: GapKind::Inconsistent,
                    phase: ArcadiaPhase::System,
                    description: format!(
                        "Significant mismatch in actor count: {op_count} operational vs {sys_count} system"
                    ),
                    severity: GapSeverity::Major,
                    recommendations: vec![
                        "Review actor mappings between operational and system phases".to_string(),
                    ],
                });
            }
        }

        gaps
    }

    fn check_consistency(
        &self,
        output: &ArcadiaStructuredOutput,
    ) -> Vec<ArchitectureConsistencyCheck> {
        let mut checks = Vec::new();

        let mut coherence = ArchitectureConsistencyCheck {
            id: consistency_id(1),
            check_kind: "model_coherence".to_string(),
            phases_involved: vec![ArcadiaPhase::Operational, ArcadiaPhase::System],
            status: CheckStatus::Passed,
            description: "Model coherence across operational and system phases".to_string(),
            issues_found: Vec::new(),
            recommendations: Vec::new(),
        };
        if let (Some(op), Some(sys)) = (&output.operational, &output.system) {
            if (sys.capabilities.len() as f64) < op.capabilities.len() as f64 * 0.5 {
                coherence.status = CheckStatus::Warning;
                coherence.issues_found.push(
                    "System capabilities significantly fewer than operational capabilities"
                        .to_string(),
                );
                coherence
                    .recommendations
                    .push("Review system capability coverage".to_string());
            }
        }
        checks.push(coherence);

        // Interface compatibility within the system phase: reserved, always
        // passes for now.
        checks.push(ArchitectureConsistencyCheck {
            id: consistency_id(2),
            check_kind: "interface_compatibility".to_string(),
            phases_involved: vec![ArcadiaPhase::System],
            status: CheckStatus::Passed,
            description: "Interface compatibility within system phase".to_string(),
            issues_found: Vec::new(),
            recommendations: Vec::new(),
        });

        checks
    }

    fn quality_metrics(&self, output: &ArcadiaStructuredOutput) -> Vec<QualityMetric> {
        let mut metrics = Vec::new();

        if let Some(op) = &output.operational {
            let actors = op.actors.len() as f64;
            let capabilities = op.capabilities.len() as f64;
            let scenarios = op.scenarios.len() as f64;
            let score = ((actors * 0.3 + capabilities * 0.4 + scenarios * 0.3) / 5.0).min(1.0);

            let mut details = BTreeMap::new();
            details.insert("actors_count".to_string(), op.actors.len() as u64);
            details.insert("capabilities_count".to_string(), op.capabilities.len() as u64);
            details.insert("scenarios_count".to_string(), op.scenarios.len() as u64);

            metrics.push(QualityMetric {
                id: quality_id(metrics.len() + 1),
                name: "Operational Analysis Completeness".to_string(),
                metric_kind: "requirement_quality".to_string(),
                phase: ArcadiaPhase::Operational,
                score,
                max_score: 1.0,
                criteria: vec![
                    "Actor coverage".to_string(),
                    "Capability completeness".to_string(),
                    "Scenario coverage".to_string(),
                ],
                assessment_details: details,
            });
        }

        if let Some(sys) = &output.system {
            let actors = sys.actors.len() as f64;
            let functions = sys.functions.len() as f64;
            let capabilities = sys.capabilities.len() as f64;
            let score = ((actors * 0.2 + functions * 0.5 + capabilities * 0.3) / 8.0).min(1.0);

            let mut details = BTreeMap::new();
            details.insert("actors_count".to_string(), sys.actors.len() as u64);
            details.insert("functions_count".to_string(), sys.functions.len() as u64);
            details.insert("capabilities_count".to_string(), sys.capabilities.len() as u64);

            metrics.push(QualityMetric {
                id: quality_id(metrics.len() + 1),
                name: "System Architecture Quality".to_string(),
                metric_kind: "architecture_quality".to_string(),
                phase: ArcadiaPhase::System,
                score,
                max_score: 1.0,
                criteria: vec![
                    "Actor definition".to_string(),
                    "Function decomposition".to_string(),
                    "Capability realization".to_string(),
                ],
                assessment_details: details,
            });
        }

        metrics
    }

    fn coverage_matrix(
        &self,
        output: &ArcadiaStructuredOutput,
    ) -> BTreeMap<String, CoverageScores> {
        let mut matrix = BTreeMap::new();

        if let (Some(op), Some(sys)) = (&output.operational, &output.system) {
            matrix.insert(
                "operational_to_system".to_string(),
                CoverageScores {
                    actor_coverage: name_coverage(
                        op.actors.iter().map(|a| a.name.as_str()),
                        &sys.actors.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(),
                    ),
                    capability_coverage: name_coverage(
                        op.capabilities.iter().map(|c| c.name.as_str()),
                        &sys
                            .capabilities
                            .iter()
                            .map(|c| c.name.as_str())
                            .collect::<Vec<_>>(),
                    ),
                },
            );
        }

        matrix
    }

    fn impact_analysis(&self, output: &ArcadiaStructuredOutput) -> ImpactAnalysis {
        let mut impact = ImpactAnalysis::default();

        if let Some(op) = &output.operational {
            impact.high_impact_operational_capabilities = op
                .capabilities
                .iter()
                .filter(|c| c.involved_actors.len() > 2)
                .map(|c| c.id.clone())
                .collect();
        }

        if let Some(sys) = &output.system {
            impact.critical_system_functions = sys
                .functions
                .iter()
                .filter(|f| {
                    f.kind == arcadia_core::model::FunctionKind::Primary
                        && f.allocated_actors.len() > 1
                })
                .map(|f| f.id.clone())
                .collect();
        }

        impact
    }
}

/// Fraction of source names with at least one target above 0.6 name
/// similarity; vacuously 1.0 with no sources.
fn name_coverage<'a, I>(sources: I, targets: &[&str]) -> f64
where
    I: IntoIterator<Item = &'a str>,
{
    let sources: Vec<&str> = sources.into_iter().collect();
    if sources.is_empty() {
        return 1.0;
    }
    let covered = sources
        .iter()
        .filter(|source| {
            targets
                .iter()
                .any(|target| name_similarity(source, target) > 0.6)
        })
        .count();
    covered as f64 / sources.len() as f64
}

fn op_capability_facets(capability: &OperationalCapability) -> ElementFacets {
    let mut facets = ElementFacets::named("capability", &capability.name, &capability.description);
    facets.mission_statement = Some(capability.mission_statement.clone());
    facets.actor_refs = capability.involved_actors.clone();
    facets
}

fn sys_capability_facets(capability: &SystemCapability) -> ElementFacets {
    let mut facets = ElementFacets::named("capability", &capability.name, &capability.description);
    facets.capabilities = capability.realized_operational_capabilities.clone();
    facets
}

fn op_actor_facets(actor: &OperationalActor) -> ElementFacets {
    let mut facets = ElementFacets::named("actor", &actor.name, &actor.description);
    facets.responsibilities = actor.responsibilities.clone();
    facets.capabilities = actor.capabilities.clone();
    facets
}

fn sys_actor_facets(actor: &SystemActor) -> ElementFacets {
    ElementFacets::named("actor", &actor.name, &actor.description)
}

fn sys_function_facets(function: &SystemFunction) -> ElementFacets {
    let mut facets = ElementFacets::named("function", &function.name, &function.description);
    facets.parent_name = function.parent_function.clone();
    facets.sub_elements = function.sub_functions.clone();
    facets.actor_refs = function.allocated_actors.clone();
    // Exchange descriptions stand in for IO specs at the system level.
    let inputs: Vec<String> = function
        .functional_exchanges
        .iter()
        .filter(|e| e.to_function.eq_ignore_ascii_case(&function.name))
        .map(|e| e.description.clone())
        .collect();
    let outputs: Vec<String> = function
        .functional_exchanges
        .iter()
        .filter(|e| e.from_function.eq_ignore_ascii_case(&function.name))
        .map(|e| e.description.clone())
        .collect();
    facets.io = Some((inputs, outputs));
    facets
}

fn log_function_facets(function: &LogicalFunction) -> ElementFacets {
    let mut facets = ElementFacets::named("function", &function.name, &function.description);
    facets.parent_name = function.parent_system_function.clone();
    facets.sub_elements = function.sub_functions.clone();
    facets.io = Some((
        function.input_interfaces.clone(),
        function.output_interfaces.clone(),
    ));
    facets
}

fn log_component_facets(component: &LogicalComponent) -> ElementFacets {
    let mut facets = ElementFacets::named("component", &component.name, &component.description);
    facets.responsibilities = component.responsibilities.clone();
    facets.parent_name = component.parent.clone();
    facets.sub_elements = component.sub_components.clone();
    facets
}

fn phys_component_facets(component: &PhysicalComponent) -> ElementFacets {
    ElementFacets::named("component", &component.name, &component.description)
}

fn phys_function_facets(function: &PhysicalFunction) -> ElementFacets {
    let mut facets = ElementFacets::named("function", &function.name, &function.description);
    facets.io = Some((
        function.input_interfaces.clone(),
        function.output_interfaces.clone(),
    ));
    facets
}
