//! Requirements generation with enforced priority distribution, NFR
//! category selection and traceability links.
//!
//! Functional requirements come from "shall" statements in a prompted LLM
//! response; non-functional requirements are generated per relevant
//! category; stakeholder requirements are mined from the proposal without
//! an LLM call.

use crate::patterns::{
    self, CAPABILITY_MINERS, METRIC_PATTERNS, NEED_MINERS, PRIORITY_HINT, SCENARIO_MINERS,
    SHALL_CLAUSE, TARGET_EXACT, TARGET_LOWER, TARGET_RANGE, TARGET_UPPER, VERIFICATION_HINT,
};
use crate::priority::{analyze_priority, balance_priorities};
use arcadia_ai::{GenerationOptions, LlmProvider};
use arcadia_core::ids::{functional_requirement_id, nfr_requirement_id, stakeholder_requirement_id};
use arcadia_core::model::{NfrDetails, Requirement, Stakeholder};
use arcadia_core::vocabulary::{nfr_domain_indicators, nfr_keywords};
use arcadia_core::{ArcadiaPhase, DocumentChunk, NfrCategory, Priority, RequirementKind};
use arcadia_extract::context::prepare_context;
use arcadia_extract::DocumentProcessor;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

const MAX_CAPABILITY_LINKS: usize = 5;
const MAX_SCENARIO_LINKS: usize = 3;
const MAX_STAKEHOLDER_LINKS: usize = 5;
const MAX_STAKEHOLDER_REQUIREMENTS: usize = 8;
const MIN_CLAUSE_WORDS: usize = 8;

/// Requirements of one phase, grouped by kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhaseRequirements {
    pub functional: Vec<Requirement>,
    pub non_functional: Vec<Requirement>,
    pub stakeholder: Vec<Requirement>,
}

impl PhaseRequirements {
    pub fn total(&self) -> usize {
        self.functional.len() + self.non_functional.len() + self.stakeholder.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Requirement> {
        self.functional
            .iter()
            .chain(self.non_functional.iter())
            .chain(self.stakeholder.iter())
    }
}

/// Output of one generation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratedRequirements {
    pub requirements: PhaseRequirements,
    pub stakeholders: Vec<Stakeholder>,
}

/// Generates balanced, traceable requirements from context and proposal.
pub struct RequirementsGenerator {
    llm: Arc<dyn LlmProvider>,
    functional_counter: usize,
    nfr_counter: usize,
    stakeholder_counter: usize,
}

impl RequirementsGenerator {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            llm,
            functional_counter: 0,
            nfr_counter: 0,
            stakeholder_counter: 0,
        }
    }

    /// Generate the requested requirement kinds for one phase. With
    /// `balance` set, functional and non-functional priorities are
    /// rebalanced toward 30/50/20 after generation.
    #[instrument(skip_all, fields(phase = %phase))]
    pub async fn generate(
        &mut self,
        chunks: &[DocumentChunk],
        phase: ArcadiaPhase,
        proposal: &str,
        kinds: &[RequirementKind],
        balance: bool,
        cancel: &CancellationToken,
    ) -> GeneratedRequirements {
        let combined = combined_text(chunks, proposal);
        let capabilities = patterns::mine(&CAPABILITY_MINERS, &combined, 5, 10);
        let scenarios = patterns::mine(&SCENARIO_MINERS, &combined, 8, 8);
        let needs = patterns::mine(&NEED_MINERS, &combined, 5, 12);

        let mut output = GeneratedRequirements::default();

        if kinds.contains(&RequirementKind::Stakeholder) {
            let (stakeholders, requirements) = self.generate_stakeholders(proposal, phase);
            output.stakeholders = stakeholders;
            output.requirements.stakeholder = requirements;
        }

        if kinds.contains(&RequirementKind::Functional) {
            output.requirements.functional = self
                .generate_functional(
                    chunks,
                    phase,
                    &combined,
                    &capabilities,
                    &scenarios,
                    &needs,
                    cancel,
                )
                .await;
        }

        if kinds.contains(&RequirementKind::NonFunctional) {
            output.requirements.non_functional = self
                .generate_non_functional(chunks, phase, &combined, cancel)
                .await;
        }

        if balance {
            let mut pool: Vec<Requirement> = Vec::new();
            pool.append(&mut output.requirements.functional);
            pool.append(&mut output.requirements.non_functional);
            balance_priorities(&mut pool);
            for requirement in pool {
                match requirement.kind {
                    RequirementKind::NonFunctional => {
                        output.requirements.non_functional.push(requirement)
                    }
                    _ => output.requirements.functional.push(requirement),
                }
            }
        }

        info!(
            functional = output.requirements.functional.len(),
            non_functional = output.requirements.non_functional.len(),
            stakeholder = output.requirements.stakeholder.len(),
            "requirements generated"
        );
        output
    }

    async fn generate_functional(
        &mut self,
        chunks: &[DocumentChunk],
        phase: ArcadiaPhase,
        combined: &str,
        capabilities: &[String],
        scenarios: &[String],
        needs: &[String],
        cancel: &CancellationToken,
    ) -> Vec<Requirement> {
        let prompt = self.functional_prompt(chunks, phase, capabilities, scenarios, needs);
        let options = GenerationOptions::default().with_temperature(0.3);
        let response = match self.llm.generate(&prompt, &options, cancel).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "functional generation failed");
                return Vec::new();
            }
        };

        self.parse_requirements(
            &response,
            RequirementKind::Functional,
            phase,
            None,
            combined,
            capabilities,
            scenarios,
            needs,
        )
    }

    async fn generate_non_functional(
        &mut self,
        chunks: &[DocumentChunk],
        phase: ArcadiaPhase,
        combined: &str,
        cancel: &CancellationToken,
    ) -> Vec<Requirement> {
        let categories = nfr_category_relevance(combined);
        debug!(
            categories = categories.len(),
            "NFR categories selected from context"
        );

        let mut requirements = Vec::new();
        for (category, score) in categories {
            let max_requirements = ((score * 4.0).round() as usize).clamp(1, 3);
            let prompt = self.nfr_prompt(chunks, phase, category, score);
            let options = GenerationOptions::default().with_temperature(0.3);
            let response = match self.llm.generate(&prompt, &options, cancel).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(category = %category, error = %e, "NFR generation failed");
                    continue;
                }
            };

            let mut parsed = self.parse_requirements(
                &response,
                RequirementKind::NonFunctional,
                phase,
                Some(category),
                combined,
                &[],
                &[],
                &[],
            );
            parsed.truncate(max_requirements);
            requirements.extend(parsed);
        }
        requirements
    }

    /// Stakeholder records and the requirements derived from them are mined
    /// from the proposal directly; no LLM call is involved.
    fn generate_stakeholders(
        &mut self,
        proposal: &str,
        phase: ArcadiaPhase,
    ) -> (Vec<Stakeholder>, Vec<Requirement>) {
        let analysis = DocumentProcessor::default().extract_proposal_analysis(proposal);
        let stakeholders = analysis.stakeholders;

        let requirements = stakeholders
            .iter()
            .take(MAX_STAKEHOLDER_REQUIREMENTS)
            .map(|stakeholder| {
                self.stakeholder_counter += 1;
                let description = format!(
                    "The system shall support the {} stakeholder group ({}) with the \
                     information, tools and feedback required for their operational activities.",
                    stakeholder.kind.replace('_', " "),
                    truncate_chars(&stakeholder.description, 60),
                );
                let analysis = analyze_priority(&description, proposal, &[]);
                let rationale = analysis.rationale();
                Requirement {
                    id: stakeholder_requirement_id(phase, self.stakeholder_counter),
                    kind: RequirementKind::Stakeholder,
                    title: truncate_chars(&stakeholder.description, 65),
                    description,
                    priority: analysis.priority,
                    priority_confidence: analysis.confidence,
                    rationale,
                    phase,
                    verification_method: "Stakeholder review and approval".to_string(),
                    dependencies: Vec::new(),
                    capability_links: Vec::new(),
                    scenario_links: Vec::new(),
                    stakeholder_links: vec![stakeholder.id.clone()],
                    rebalanced: false,
                    nfr: None,
                }
            })
            .collect();

        (stakeholders, requirements)
    }

    fn functional_prompt(
        &self,
        chunks: &[DocumentChunk],
        phase: ArcadiaPhase,
        capabilities: &[String],
        scenarios: &[String],
        needs: &[String],
    ) -> String {
        format!(
            r#"Generate functional requirements for ARCADIA {phase} phase with enhanced context awareness.

CONTEXT ANALYSIS:
- Phase: {phase} ({description})
- Document Context: {context}
- Operational Capabilities: {capabilities}
- Operational Scenarios: {scenarios}
- Key Stakeholder Needs: {needs}

GENERATION REQUIREMENTS:

1. PRIORITY DISTRIBUTION TARGET:
   - Generate exactly 30% MUST, 50% SHOULD, 20% COULD requirements
   - MUST: Safety-critical, regulatory compliance, core operational capabilities
   - SHOULD: Important operational features, significant stakeholder needs
   - COULD: Enhancement features, convenience functions

2. REQUIREMENT COMPLETENESS:
   - Minimum 25 words per requirement description
   - Include specific operational context and components
   - Ensure measurable acceptance criteria

3. TRACEABILITY:
   - Link each requirement to specific operational capabilities
   - Reference relevant operational scenarios
   - Trace to stakeholder needs where applicable

4. VERIFICATION SPECIFICITY:
   - Select a verification method matched to the requirement content and phase
   - Avoid generic "Review and testing"

Generate 5-7 well-balanced functional requirements following this structure:
- The system shall [detailed requirement with operational context]
- Priority: MUST/SHOULD/COULD
- Verification: [specific method appropriate to requirement and phase]"#,
            phase = phase,
            description = phase_description(phase),
            context = prepare_context(chunks),
            capabilities = capabilities
                .iter()
                .take(5)
                .cloned()
                .collect::<Vec<_>>()
                .join(", "),
            scenarios = scenarios
                .iter()
                .take(3)
                .cloned()
                .collect::<Vec<_>>()
                .join(", "),
            needs = needs.iter().take(5).cloned().collect::<Vec<_>>().join(", "),
        )
    }

    fn nfr_prompt(
        &self,
        chunks: &[DocumentChunk],
        phase: ArcadiaPhase,
        category: NfrCategory,
        relevance: f64,
    ) -> String {
        format!(
            r#"Generate non-functional requirements for category: {category} (relevance: {relevance:.2})

CONTEXT:
- Phase: {phase}
- Document Context: {context}
- Category Focus: {category}

GENERATION GUIDELINES:
1. Generate 1-2 high-quality requirements (avoid overgeneration)
2. Ensure measurable criteria and specific metrics
3. Include operational context and scenarios
4. Base priority on operational criticality

Generate requirements in format:
- The system shall [measurable requirement with metrics]
- Metric: [how to measure]
- Target Value: [specific target]
- Priority: MUST/SHOULD/COULD
- Verification: [specific testing method for {category}]"#,
            category = category,
            relevance = relevance,
            phase = phase,
            context = prepare_context(chunks),
        )
    }

    /// Parse each "shall" statement in the response into a requirement.
    /// Clauses shorter than eight words are rejected.
    #[allow(clippy::too_many_arguments)]
    fn parse_requirements(
        &mut self,
        response: &str,
        kind: RequirementKind,
        phase: ArcadiaPhase,
        category: Option<NfrCategory>,
        combined: &str,
        capabilities: &[String],
        scenarios: &[String],
        needs: &[String],
    ) -> Vec<Requirement> {
        let mut requirements = Vec::new();

        for line in response.lines() {
            let line = line.trim();
            let Some(captures) = SHALL_CLAUSE.captures(line) else {
                continue;
            };
            let clause = captures.get(1).map_or("", |m| m.as_str()).trim();
            if clause.split_whitespace().count() < MIN_CLAUSE_WORDS {
                continue;
            }

            let id = match (kind, category) {
                (RequirementKind::NonFunctional, Some(category)) => {
                    self.nfr_counter += 1;
                    nfr_requirement_id(category, self.nfr_counter)
                }
                _ => {
                    self.functional_counter += 1;
                    functional_requirement_id(phase, self.functional_counter)
                }
            };

            let analysis = analyze_priority(clause, combined, needs);
            let mut priority = analysis.priority;
            // An explicit priority hint wins only when at least as strong as
            // the derived one.
            if let Some(hint) = PRIORITY_HINT
                .captures(line)
                .and_then(|c| Priority::from_str(c.get(1).map_or("", |m| m.as_str())).ok())
            {
                if hint.strength() >= priority.strength() {
                    priority = hint;
                }
            }

            let mut verification = select_verification_method(kind, phase, category, clause);
            if let Some(custom) = VERIFICATION_HINT
                .captures(line)
                .map(|c| c.get(1).map_or("", |m| m.as_str()).trim().to_string())
            {
                if custom.len() > 15 {
                    verification = custom;
                }
            }

            let mut description = format!("The system shall {clause}");
            if description.len() < 60 {
                description.push_str(&format!(
                    " This requirement supports {phase} phase objectives and operational effectiveness."
                ));
            }

            let rationale = analysis.rationale();
            let nfr = category.map(|category| NfrDetails {
                category,
                metric: extract_metric(clause),
                target_value: extract_target_value(clause),
                measurement_method: measurement_method(category).to_string(),
            });

            requirements.push(Requirement {
                id,
                kind,
                title: truncate_chars(clause, 65),
                description,
                priority,
                priority_confidence: analysis.confidence,
                rationale,
                phase,
                verification_method: verification,
                dependencies: Vec::new(),
                capability_links: overlap_links(
                    clause,
                    capabilities,
                    MAX_CAPABILITY_LINKS,
                    "Supports capability",
                ),
                scenario_links: overlap_links(
                    clause,
                    scenarios,
                    MAX_SCENARIO_LINKS,
                    "Addresses scenario",
                ),
                stakeholder_links: overlap_links(
                    clause,
                    needs,
                    MAX_STAKEHOLDER_LINKS,
                    "Addresses need",
                ),
                rebalanced: false,
                nfr,
            });
        }

        requirements
    }
}

/// Score each NFR category by keyword density plus a capped domain boost;
/// retain scoring or core categories, keeping the top four.
pub fn nfr_category_relevance(text: &str) -> Vec<(NfrCategory, f64)> {
    let lower = text.to_lowercase();
    let mut scored: Vec<(NfrCategory, f64)> = NfrCategory::ALL
        .iter()
        .filter_map(|&category| {
            let keywords = nfr_keywords(category);
            let hits = keywords
                .iter()
                .filter(|keyword| lower.contains(&keyword.to_lowercase()))
                .count();
            let base = hits as f64 / keywords.len().max(1) as f64;

            let boost = nfr_domain_indicators(category)
                .iter()
                .filter(|indicator| lower.contains(*indicator))
                .count() as f64
                * 0.1;
            let score = (base + boost.min(0.3)).min(1.0);

            if score > 0.15 || NfrCategory::CORE.contains(&category) {
                Some((category, score))
            } else {
                None
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    scored.truncate(4);
    scored
}

/// Verification methods by phase and category; content keywords refine the
/// functional choice.
fn select_verification_method(
    kind: RequirementKind,
    phase: ArcadiaPhase,
    category: Option<NfrCategory>,
    clause: &str,
) -> String {
    match kind {
        RequirementKind::NonFunctional => {
            let method = match category {
                Some(NfrCategory::Performance) => "Performance testing and benchmarking",
                Some(NfrCategory::Security) => "Security audit and penetration testing",
                Some(NfrCategory::Usability) => "User experience testing",
                Some(NfrCategory::Reliability) => "Reliability testing and MTBF analysis",
                Some(NfrCategory::Scalability) => "Scalability testing and capacity planning",
                Some(NfrCategory::Maintainability) => "Code quality metrics assessment",
                None => "Testing and analysis",
            };
            method.to_string()
        }
        RequirementKind::Stakeholder => "Stakeholder review and approval".to_string(),
        RequirementKind::Functional => {
            let lower = clause.to_lowercase();
            if lower.contains("interface") || lower.contains("communication") {
                "Interface testing and integration verification".to_string()
            } else if lower.contains("user") || lower.contains("operator") {
                "User acceptance testing and operational validation".to_string()
            } else if lower.contains("scenario") || lower.contains("operational") {
                "Operational scenario validation and testing".to_string()
            } else if lower.contains("performance") || lower.contains("response") {
                "Performance testing and system validation".to_string()
            } else {
                functional_phase_method(phase).to_string()
            }
        }
    }
}

fn functional_phase_method(phase: ArcadiaPhase) -> &'static str {
    match phase {
        ArcadiaPhase::Operational => "Stakeholder review and approval",
        ArcadiaPhase::System => "Requirements traceability check",
        ArcadiaPhase::Logical => "Component allocation verification",
        ArcadiaPhase::Physical => "Implementation feasibility assessment",
        ArcadiaPhase::BuildingStrategy => "Integration contract review",
    }
}

fn measurement_method(category: NfrCategory) -> &'static str {
    match category {
        NfrCategory::Performance => "Performance monitoring and benchmarking",
        NfrCategory::Security => "Security assessment and audit",
        NfrCategory::Usability => "User testing and evaluation",
        NfrCategory::Reliability => "Reliability testing and analysis",
        NfrCategory::Scalability => "Load testing and capacity analysis",
        NfrCategory::Maintainability => "Code quality metrics and assessment",
    }
}

/// First matching metric family as `value unit`.
fn extract_metric(clause: &str) -> String {
    for pattern in METRIC_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(clause) {
            return format!(
                "{} {}",
                captures.get(1).map_or("", |m| m.as_str()),
                captures.get(2).map_or("", |m| m.as_str()),
            );
        }
    }
    "Quantitative measure to be defined".to_string()
}

fn extract_target_value(clause: &str) -> String {
    if let Some(captures) = TARGET_RANGE.captures(clause) {
        return format!(
            "{}-{}",
            captures.get(1).map_or("", |m| m.as_str()),
            captures.get(2).map_or("", |m| m.as_str()),
        );
    }
    for pattern in [&*TARGET_UPPER, &*TARGET_LOWER, &*TARGET_EXACT] {
        if let Some(captures) = pattern.captures(clause) {
            return captures.get(1).map_or("", |m| m.as_str()).to_string();
        }
    }
    "Target value to be defined".to_string()
}

/// Link a requirement to context statements sharing at least one word
/// longer than three characters.
fn overlap_links(clause: &str, candidates: &[String], cap: usize, label: &str) -> Vec<String> {
    let clause_lower = clause.to_lowercase();
    candidates
        .iter()
        .take(cap)
        .filter(|candidate| {
            candidate
                .to_lowercase()
                .split_whitespace()
                .any(|word| word.len() > 3 && clause_lower.contains(word))
        })
        .map(|candidate| format!("{label}: {}", truncate_chars(candidate, 60)))
        .collect()
}

fn combined_text(chunks: &[DocumentChunk], proposal: &str) -> String {
    let mut combined = chunks
        .iter()
        .map(|chunk| chunk.content.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    combined.push(' ');
    combined.push_str(proposal);
    combined
}

fn phase_description(phase: ArcadiaPhase) -> &'static str {
    match phase {
        ArcadiaPhase::Operational => "Understanding stakeholder needs and operational context",
        ArcadiaPhase::System => "Defining system requirements and functions",
        ArcadiaPhase::Logical => "Designing solution components and interfaces",
        ArcadiaPhase::Physical => "Implementing and deploying the solution",
        ArcadiaPhase::BuildingStrategy => "Contracts for development and IVVQ",
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcadia_ai::StubProvider;

    fn chunk(content: &str) -> DocumentChunk {
        DocumentChunk::new("c0", content, "proposal", 0, ArcadiaPhase::System)
    }

    #[tokio::test]
    async fn parses_shall_statements_into_requirements() {
        let stub = StubProvider::new();
        stub.push_response(
            "- The system shall process incoming sensor data streams and archive validated \
             readings for operator review. Priority: MUST. Verification: System scenario simulation with recorded data\n\
             - The system shall notify the operator when anomalous readings exceed configured \
             thresholds during active monitoring sessions.\n\
             - The system shall blink.\n",
        );

        let mut generator = RequirementsGenerator::new(Arc::new(stub));
        let cancel = CancellationToken::new();
        let output = generator
            .generate(
                &[chunk("sensor monitoring with operator oversight")],
                ArcadiaPhase::System,
                "The operators need a capability to monitor sensors.",
                &[RequirementKind::Functional],
                false,
                &cancel,
            )
            .await;

        // The too-short clause is rejected.
        let functional = &output.requirements.functional;
        assert_eq!(functional.len(), 2);
        assert_eq!(functional[0].id, "FR-SYS-001");
        assert!(functional[0].description.contains("shall"));
        assert_eq!(functional[0].priority, Priority::Must);
        assert_eq!(
            functional[0].verification_method,
            "System scenario simulation with recorded data"
        );
        assert!(functional.iter().all(|r| r.is_well_formed()));
    }

    #[tokio::test]
    async fn nfr_generation_attaches_category_details() {
        let stub = StubProvider::with_fallback(
            "The system shall process 1000 sensor readings within 100 milliseconds with 99.9% accuracy.",
        );
        let mut generator = RequirementsGenerator::new(Arc::new(stub));
        let cancel = CancellationToken::new();
        let output = generator
            .generate(
                &[chunk("real-time performance with fast response time and low latency")],
                ArcadiaPhase::System,
                "performance is critical for throughput",
                &[RequirementKind::NonFunctional],
                false,
                &cancel,
            )
            .await;

        let nfrs = &output.requirements.non_functional;
        assert!(!nfrs.is_empty());
        let performance = nfrs
            .iter()
            .find(|r| {
                r.nfr.as_ref().map(|n| n.category) == Some(NfrCategory::Performance)
            })
            .expect("expected a performance NFR");
        let details = performance.nfr.as_ref().unwrap();
        assert_eq!(details.metric, "100 milliseconds");
        assert_eq!(details.target_value, "100");
        assert!(performance.id.starts_with("NFR-PERF-"));
        assert!(performance
            .verification_method
            .to_lowercase()
            .contains("performance"));
    }

    #[test]
    fn security_only_text_keeps_core_categories() {
        let categories = nfr_category_relevance(
            "security encryption authentication access protection secure threat",
        );
        assert!(categories.len() <= 4);
        assert_eq!(categories[0].0, NfrCategory::Security);
        let retained: Vec<NfrCategory> = categories.iter().map(|(c, _)| *c).collect();
        assert!(retained.contains(&NfrCategory::Performance));
        assert!(retained.contains(&NfrCategory::Reliability));
        let security_score = categories[0].1;
        assert!(categories.iter().all(|(_, s)| *s <= security_score));
    }

    #[tokio::test]
    async fn stakeholder_requirements_are_mined_without_llm() {
        let stub = Arc::new(StubProvider::new());
        let mut generator = RequirementsGenerator::new(stub.clone());
        let cancel = CancellationToken::new();
        let output = generator
            .generate(
                &[],
                ArcadiaPhase::Operational,
                "The stakeholders: mission planners and field operators of the deployed system.",
                &[RequirementKind::Stakeholder],
                false,
                &cancel,
            )
            .await;

        assert!(!output.stakeholders.is_empty());
        assert!(!output.requirements.stakeholder.is_empty());
        assert!(output.requirements.stakeholder[0].id.starts_with("STK-OPE-"));
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn balancing_flags_moved_requirements() {
        let stub = StubProvider::new();
        let lines: String = (0..12)
            .map(|i| {
                format!(
                    "- The system shall guarantee safety critical interlock number {i} engages \
                     before any physical actuator movement begins.\n"
                )
            })
            .collect();
        stub.push_response(lines);

        let mut generator = RequirementsGenerator::new(Arc::new(stub));
        let cancel = CancellationToken::new();
        let output = generator
            .generate(
                &[chunk("safety interlocks")],
                ArcadiaPhase::System,
                "safety",
                &[RequirementKind::Functional],
                true,
                &cancel,
            )
            .await;

        let functional = &output.requirements.functional;
        assert_eq!(functional.len(), 12);
        let must = functional
            .iter()
            .filter(|r| r.priority == Priority::Must)
            .count();
        // 30% of 12, rounded.
        assert_eq!(must, 4);
        assert!(functional.iter().any(|r| r.rebalanced));
    }
}
