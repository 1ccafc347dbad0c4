//! Five-pass validation of generated requirements: syntactic, semantic,
//! coverage, quality and traceability. Issues are never fatal; they
//! accumulate in the report together with per-category scores and
//! deterministic recommendations.

use crate::patterns::{
    ACTION_VERBS, ACTOR_REFERENCE, MEASURABLE_CRITERIA, REQUIREMENT_STATEMENT, SHORT_ID_FORMAT,
    VAGUE_TERMS,
};
use arcadia_core::model::Requirement;
use arcadia_core::{ArcadiaPhase, RequirementKind};
use arcadia_extract::ContextEnricher;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, instrument};

const MIN_DESCRIPTION_WORDS: usize = 15;
const MAX_DESCRIPTION_WORDS: usize = 200;
const QUALITY_THRESHOLD: f64 = 0.7;
const GENERIC_VERIFICATION_METHODS: [&str; 3] = ["review and testing", "testing", "validation"];

/// Validation categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    Syntactic,
    Semantic,
    Coverage,
    Quality,
    Traceability,
}

/// Severity levels for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueLevel {
    Critical,
    Major,
    Minor,
    Info,
}

/// A single validation finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub id: String,
    pub category: IssueCategory,
    pub level: IssueLevel,
    pub title: String,
    pub description: String,
    pub requirement_id: Option<String>,
    pub suggestion: Option<String>,
    pub auto_fixable: bool,
    pub confidence: f64,
}

/// Coverage analysis details stored on the report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoverageAnalysis {
    pub capability_coverage: f64,
    pub actor_coverage: f64,
    pub requirement_type_distribution: BTreeMap<String, usize>,
    pub covered_capabilities: Vec<String>,
    pub uncovered_capabilities: Vec<String>,
    pub covered_actors: Vec<String>,
    pub uncovered_actors: Vec<String>,
}

/// Aggregated quality metrics stored on the report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityBreakdown {
    pub average_quality: f64,
    pub clarity_average: f64,
    pub completeness_average: f64,
    pub consistency_average: f64,
    pub high_quality_count: usize,
    pub medium_quality_count: usize,
    pub low_quality_count: usize,
}

/// Full validation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Unweighted mean of the five category scores, in [0, 1].
    pub overall_score: f64,
    pub total_requirements: usize,
    pub issues: Vec<ValidationIssue>,
    pub scores_by_category: BTreeMap<String, f64>,
    pub coverage_analysis: CoverageAnalysis,
    pub quality_metrics: QualityBreakdown,
    pub recommendations: Vec<String>,
    pub gaps_identified: Vec<String>,
}

impl ValidationReport {
    /// Letter grade for the overall score.
    pub fn grade(&self) -> char {
        match self.overall_score {
            s if s >= 0.9 => 'A',
            s if s >= 0.8 => 'B',
            s if s >= 0.7 => 'C',
            s if s >= 0.6 => 'D',
            _ => 'F',
        }
    }

    pub fn issues_at(&self, level: IssueLevel) -> usize {
        self.issues.iter().filter(|i| i.level == level).count()
    }
}

/// Runs the validation passes against the enricher's knowledge base.
pub struct ValidationPipeline {
    enricher: ContextEnricher,
}

impl Default for ValidationPipeline {
    fn default() -> Self {
        Self::new(ContextEnricher::new())
    }
}

impl ValidationPipeline {
    pub fn new(enricher: ContextEnricher) -> Self {
        Self { enricher }
    }

    #[instrument(skip_all, fields(phase = %phase))]
    pub fn validate(&self, requirements: &[Requirement], phase: ArcadiaPhase) -> ValidationReport {
        let mut report = ValidationReport {
            overall_score: 0.0,
            total_requirements: requirements.len(),
            issues: Vec::new(),
            scores_by_category: BTreeMap::new(),
            coverage_analysis: CoverageAnalysis::default(),
            quality_metrics: QualityBreakdown::default(),
            recommendations: Vec::new(),
            gaps_identified: Vec::new(),
        };

        if requirements.is_empty() {
            report.issues.push(ValidationIssue {
                id: "VAL-001".to_string(),
                category: IssueCategory::Syntactic,
                level: IssueLevel::Critical,
                title: "No Requirements Found".to_string(),
                description: "No requirements were found in the provided data".to_string(),
                requirement_id: None,
                suggestion: None,
                auto_fixable: false,
                confidence: 1.0,
            });
            self.generate_recommendations(&mut report);
            return report;
        }

        let syntactic = self.validate_syntactic(requirements, &mut report);
        let semantic = self.validate_semantic(requirements, phase, &mut report);
        let coverage = self.analyze_coverage(requirements, phase, &mut report);
        let quality = self.score_quality(requirements, &mut report);
        let traceability = self.validate_traceability(requirements, phase, &mut report);

        report.overall_score = (syntactic + semantic + coverage + quality + traceability) / 5.0;
        report.scores_by_category = BTreeMap::from([
            ("syntactic".to_string(), syntactic),
            ("semantic".to_string(), semantic),
            ("coverage".to_string(), coverage),
            ("quality".to_string(), quality),
            ("traceability".to_string(), traceability),
        ]);

        self.generate_recommendations(&mut report);

        info!(
            overall = report.overall_score,
            issues = report.issues.len(),
            "validation pipeline completed"
        );
        report
    }

    fn validate_syntactic(
        &self,
        requirements: &[Requirement],
        report: &mut ValidationReport,
    ) -> f64 {
        let mut valid = 0usize;
        let mut issue_counter = 0usize;

        for requirement in requirements {
            let mut missing = Vec::new();
            if requirement.id.is_empty() {
                missing.push("id");
            }
            if requirement.description.is_empty() {
                missing.push("description");
            }
            if requirement.verification_method.is_empty() {
                missing.push("verification_method");
            }
            if !missing.is_empty() {
                issue_counter += 1;
                report.issues.push(ValidationIssue {
                    id: format!("SYN-{issue_counter:03}"),
                    category: IssueCategory::Syntactic,
                    level: IssueLevel::Major,
                    title: "Missing Required Fields".to_string(),
                    description: format!("Missing required fields: {}", missing.join(", ")),
                    requirement_id: Some(requirement.id.clone()),
                    suggestion: Some(format!("Add missing fields: {}", missing.join(", "))),
                    auto_fixable: true,
                    confidence: 1.0,
                });
            }

            let word_count = requirement.description.split_whitespace().count();
            if word_count < MIN_DESCRIPTION_WORDS {
                issue_counter += 1;
                report.issues.push(ValidationIssue {
                    id: format!("SYN-{issue_counter:03}"),
                    category: IssueCategory::Syntactic,
                    level: IssueLevel::Major,
                    title: "Description Too Short".to_string(),
                    description: format!(
                        "Description has only {word_count} words (minimum: {MIN_DESCRIPTION_WORDS})"
                    ),
                    requirement_id: Some(requirement.id.clone()),
                    suggestion: Some(
                        "Expand description with more specific details and context".to_string(),
                    ),
                    auto_fixable: false,
                    confidence: 1.0,
                });
            } else if word_count > MAX_DESCRIPTION_WORDS {
                issue_counter += 1;
                report.issues.push(ValidationIssue {
                    id: format!("SYN-{issue_counter:03}"),
                    category: IssueCategory::Syntactic,
                    level: IssueLevel::Minor,
                    title: "Description Too Long".to_string(),
                    description: format!(
                        "Description has {word_count} words (maximum: {MAX_DESCRIPTION_WORDS})"
                    ),
                    requirement_id: Some(requirement.id.clone()),
                    suggestion: Some("Consider breaking down into multiple requirements".to_string()),
                    auto_fixable: false,
                    confidence: 1.0,
                });
            }

            if !REQUIREMENT_STATEMENT.is_match(&requirement.description) {
                issue_counter += 1;
                report.issues.push(ValidationIssue {
                    id: format!("SYN-{issue_counter:03}"),
                    category: IssueCategory::Syntactic,
                    level: IssueLevel::Major,
                    title: "Invalid Requirement Statement".to_string(),
                    description: "Requirement does not follow 'shall' statement pattern"
                        .to_string(),
                    requirement_id: Some(requirement.id.clone()),
                    suggestion: Some("Rewrite using 'The system/actor shall...' format".to_string()),
                    auto_fixable: false,
                    confidence: 1.0,
                });
            } else {
                valid += 1;
            }
        }

        valid as f64 / requirements.len() as f64
    }

    fn validate_semantic(
        &self,
        requirements: &[Requirement],
        phase: ArcadiaPhase,
        report: &mut ValidationReport,
    ) -> f64 {
        let key_aspects: Vec<&str> = self
            .enricher
            .phase_template(phase)
            .map(|t| t.key_aspects.to_vec())
            .unwrap_or_default();
        let mut compliant = 0usize;
        let mut issue_counter = 0usize;

        for requirement in requirements {
            let description = requirement.description.to_lowercase();

            if !key_aspects.is_empty() {
                let mentions = key_aspects
                    .iter()
                    .filter(|aspect| description.contains(&aspect.to_lowercase()))
                    .count();
                if mentions == 0 {
                    issue_counter += 1;
                    report.issues.push(ValidationIssue {
                        id: format!("SEM-{issue_counter:03}"),
                        category: IssueCategory::Semantic,
                        level: IssueLevel::Major,
                        title: "Missing Phase-Specific Content".to_string(),
                        description: format!("Requirement lacks {phase} phase-specific aspects"),
                        requirement_id: Some(requirement.id.clone()),
                        suggestion: Some(format!(
                            "Include references to: {}",
                            key_aspects.iter().take(3).copied().collect::<Vec<_>>().join(", ")
                        )),
                        auto_fixable: false,
                        confidence: 0.9,
                    });
                }
            }

            if requirement.kind == RequirementKind::NonFunctional
                && !MEASURABLE_CRITERIA.is_match(&description)
            {
                issue_counter += 1;
                report.issues.push(ValidationIssue {
                    id: format!("SEM-{issue_counter:03}"),
                    category: IssueCategory::Semantic,
                    level: IssueLevel::Major,
                    title: "Non-Measurable NFR".to_string(),
                    description: "Non-functional requirement lacks measurable criteria"
                        .to_string(),
                    requirement_id: Some(requirement.id.clone()),
                    suggestion: Some(
                        "Add specific metrics, thresholds, or quantifiable criteria".to_string(),
                    ),
                    auto_fixable: false,
                    confidence: 0.9,
                });
            }

            if !ACTOR_REFERENCE.is_match(&description) {
                issue_counter += 1;
                report.issues.push(ValidationIssue {
                    id: format!("SEM-{issue_counter:03}"),
                    category: IssueCategory::Semantic,
                    level: IssueLevel::Minor,
                    title: "Missing Actor Reference".to_string(),
                    description: "Requirement does not specify responsible actor".to_string(),
                    requirement_id: Some(requirement.id.clone()),
                    suggestion: Some(
                        "Specify which actor (user, system, operator) is responsible".to_string(),
                    ),
                    auto_fixable: false,
                    confidence: 0.8,
                });
            }

            let verification = requirement.verification_method.to_lowercase();
            if GENERIC_VERIFICATION_METHODS.contains(&verification.as_str()) {
                issue_counter += 1;
                report.issues.push(ValidationIssue {
                    id: format!("SEM-{issue_counter:03}"),
                    category: IssueCategory::Semantic,
                    level: IssueLevel::Minor,
                    title: "Generic Verification Method".to_string(),
                    description: "Verification method is too generic".to_string(),
                    requirement_id: Some(requirement.id.clone()),
                    suggestion: Some(
                        "Use more specific verification methods appropriate to requirement type"
                            .to_string(),
                    ),
                    auto_fixable: false,
                    confidence: 0.8,
                });
            } else {
                compliant += 1;
            }
        }

        compliant as f64 / requirements.len() as f64
    }

    fn analyze_coverage(
        &self,
        requirements: &[Requirement],
        phase: ArcadiaPhase,
        report: &mut ValidationReport,
    ) -> f64 {
        let mut issue_counter = 0usize;
        let relevant_capabilities = self.enricher.capabilities_for_phase(phase);
        let relevant_actors = self.enricher.actors_for_phase(phase);

        let mut covered_capabilities = Vec::new();
        let mut uncovered_capabilities = Vec::new();
        for capability in &relevant_capabilities {
            let covered = requirements.iter().any(|requirement| {
                let description = requirement.description.to_lowercase();
                capability
                    .functions
                    .iter()
                    .any(|function| description.contains(&function.to_lowercase()))
            });
            if covered {
                covered_capabilities.push(capability.name.to_string());
            } else {
                uncovered_capabilities.push(capability.name.to_string());
            }
        }

        if !uncovered_capabilities.is_empty() {
            report
                .gaps_identified
                .extend(uncovered_capabilities.iter().map(|c| format!("Uncovered capability: {c}")));
            issue_counter += 1;
            report.issues.push(ValidationIssue {
                id: format!("COV-{issue_counter:03}"),
                category: IssueCategory::Coverage,
                level: IssueLevel::Major,
                title: "Incomplete Capability Coverage".to_string(),
                description: format!(
                    "Missing requirements for capabilities: {}{}",
                    uncovered_capabilities
                        .iter()
                        .take(3)
                        .cloned()
                        .collect::<Vec<_>>()
                        .join(", "),
                    if uncovered_capabilities.len() > 3 { "..." } else { "" },
                ),
                requirement_id: None,
                suggestion: Some(
                    "Add requirements to cover missing operational capabilities".to_string(),
                ),
                auto_fixable: false,
                confidence: 0.9,
            });
        }

        let mut covered_actors = Vec::new();
        let mut uncovered_actors = Vec::new();
        for actor in &relevant_actors {
            let name_lower = actor.name.to_lowercase();
            let covered = requirements
                .iter()
                .any(|requirement| requirement.description.to_lowercase().contains(&name_lower));
            if covered {
                covered_actors.push(actor.name.to_string());
            } else {
                uncovered_actors.push(actor.name.to_string());
            }
        }

        if !uncovered_actors.is_empty() {
            report
                .gaps_identified
                .extend(uncovered_actors.iter().map(|a| format!("Uncovered actor: {a}")));
            issue_counter += 1;
            report.issues.push(ValidationIssue {
                id: format!("COV-{issue_counter:03}"),
                category: IssueCategory::Coverage,
                level: IssueLevel::Minor,
                title: "Incomplete Actor Coverage".to_string(),
                description: format!(
                    "Missing actor references: {}",
                    uncovered_actors
                        .iter()
                        .take(3)
                        .cloned()
                        .collect::<Vec<_>>()
                        .join(", "),
                ),
                requirement_id: None,
                suggestion: Some(
                    "Consider adding requirements that involve missing actors".to_string(),
                ),
                auto_fixable: false,
                confidence: 0.8,
            });
        }

        let mut distribution: BTreeMap<String, usize> = BTreeMap::new();
        for requirement in requirements {
            *distribution
                .entry(requirement.kind.key().to_string())
                .or_insert(0) += 1;
        }
        let total = requirements.len();
        let functional_ratio =
            *distribution.get("functional").unwrap_or(&0) as f64 / total as f64;
        let nfr_ratio = *distribution.get("non_functional").unwrap_or(&0) as f64 / total as f64;

        if functional_ratio < 0.3 {
            issue_counter += 1;
            report.issues.push(ValidationIssue {
                id: format!("COV-{issue_counter:03}"),
                category: IssueCategory::Coverage,
                level: IssueLevel::Minor,
                title: "Low Functional Requirements Ratio".to_string(),
                description: format!(
                    "Only {:.0}% functional requirements (recommended: >30%)",
                    functional_ratio * 100.0
                ),
                requirement_id: None,
                suggestion: Some("Consider adding more functional requirements".to_string()),
                auto_fixable: false,
                confidence: 0.9,
            });
        }
        if nfr_ratio > 0.6 {
            issue_counter += 1;
            report.issues.push(ValidationIssue {
                id: format!("COV-{issue_counter:03}"),
                category: IssueCategory::Coverage,
                level: IssueLevel::Minor,
                title: "High NFR Ratio".to_string(),
                description: format!(
                    "NFR ratio is {:.0}% (recommended: <60%)",
                    nfr_ratio * 100.0
                ),
                requirement_id: None,
                suggestion: Some("Balance with more functional requirements".to_string()),
                auto_fixable: false,
                confidence: 0.9,
            });
        }

        let capability_coverage = if relevant_capabilities.is_empty() {
            1.0
        } else {
            covered_capabilities.len() as f64 / relevant_capabilities.len() as f64
        };
        let actor_coverage = if relevant_actors.is_empty() {
            1.0
        } else {
            covered_actors.len() as f64 / relevant_actors.len() as f64
        };

        report.coverage_analysis = CoverageAnalysis {
            capability_coverage,
            actor_coverage,
            requirement_type_distribution: distribution,
            covered_capabilities,
            uncovered_capabilities,
            covered_actors,
            uncovered_actors,
        };

        (capability_coverage + actor_coverage) / 2.0
    }

    fn score_quality(&self, requirements: &[Requirement], report: &mut ValidationReport) -> f64 {
        let mut issue_counter = 0usize;
        let mut clarity_sum = 0.0;
        let mut completeness_sum = 0.0;
        let mut consistency_sum = 0.0;
        let mut scores = Vec::new();

        for requirement in requirements {
            let clarity = clarity_score(&requirement.description);
            let completeness = completeness_score(requirement);
            let consistency = consistency_score(requirement);
            let quality = (clarity + completeness + consistency) / 3.0;

            clarity_sum += clarity;
            completeness_sum += completeness;
            consistency_sum += consistency;
            scores.push(quality);

            if quality < QUALITY_THRESHOLD {
                issue_counter += 1;
                report.issues.push(ValidationIssue {
                    id: format!("QUA-{issue_counter:03}"),
                    category: IssueCategory::Quality,
                    level: if quality < 0.5 {
                        IssueLevel::Major
                    } else {
                        IssueLevel::Minor
                    },
                    title: "Low Quality Score".to_string(),
                    description: format!(
                        "Requirement quality score: {quality:.2} (threshold: {QUALITY_THRESHOLD})"
                    ),
                    requirement_id: Some(requirement.id.clone()),
                    suggestion: Some("Improve clarity, completeness, and consistency".to_string()),
                    auto_fixable: false,
                    confidence: 0.8,
                });
            }
        }

        let total = requirements.len() as f64;
        let average = scores.iter().sum::<f64>() / total;
        report.quality_metrics = QualityBreakdown {
            average_quality: average,
            clarity_average: clarity_sum / total,
            completeness_average: completeness_sum / total,
            consistency_average: consistency_sum / total,
            high_quality_count: scores.iter().filter(|s| **s >= 0.8).count(),
            medium_quality_count: scores.iter().filter(|s| (0.6..0.8).contains(*s)).count(),
            low_quality_count: scores.iter().filter(|s| **s < 0.6).count(),
        };

        average
    }

    fn validate_traceability(
        &self,
        requirements: &[Requirement],
        phase: ArcadiaPhase,
        report: &mut ValidationReport,
    ) -> f64 {
        let mut issue_counter = 0usize;
        let mut scores = Vec::new();

        for requirement in requirements {
            let result = self
                .enricher
                .validate_traceability(&requirement.description, phase);
            scores.push(result.traceability_score);

            if !result.is_valid {
                for issue in &result.issues {
                    issue_counter += 1;
                    report.issues.push(ValidationIssue {
                        id: format!("TRA-{issue_counter:03}"),
                        category: IssueCategory::Traceability,
                        level: IssueLevel::Major,
                        title: "Traceability Issue".to_string(),
                        description: issue.clone(),
                        requirement_id: Some(requirement.id.clone()),
                        suggestion: Some(result.suggestions.join("; ")),
                        auto_fixable: false,
                        confidence: 0.8,
                    });
                }
            }
        }

        scores.iter().sum::<f64>() / scores.len().max(1) as f64
    }

    fn generate_recommendations(&self, report: &mut ValidationReport) {
        let mut recommendations = Vec::new();

        let critical = report.issues_at(IssueLevel::Critical);
        if critical > 0 {
            recommendations.push(format!("Address {critical} critical issues immediately"));
        }
        let major = report.issues_at(IssueLevel::Major);
        if major > 0 {
            recommendations.push(format!("Resolve {major} major issues to improve quality"));
        }
        if !report.gaps_identified.is_empty() {
            recommendations.push(format!(
                "Fill {} coverage gaps identified",
                report.gaps_identified.len()
            ));
        }
        if report.quality_metrics.average_quality < 0.7 && report.total_requirements > 0 {
            recommendations.push(
                "Improve overall requirement quality (clarity, completeness, consistency)"
                    .to_string(),
            );
        }
        let auto_fixable = report.issues.iter().filter(|i| i.auto_fixable).count();
        if auto_fixable > 0 {
            recommendations.push(format!("{auto_fixable} issues can be automatically fixed"));
        }
        for (category, score) in &report.scores_by_category {
            if *score < 0.6 {
                recommendations.push(format!(
                    "Focus on improving {category} validation (score: {score:.2})"
                ));
            }
        }

        report.recommendations = recommendations;
    }
}

/// Clarity: action verbs, absence of vague terms, short sentence structure
/// and specificity.
fn clarity_score(description: &str) -> f64 {
    if description.is_empty() {
        return 0.0;
    }
    let lower = description.to_lowercase();
    let mut score: f64 = 0.0;

    if ACTION_VERBS.iter().any(|verb| lower.contains(verb)) {
        score += 0.3;
    }
    if !VAGUE_TERMS.iter().any(|term| lower.contains(term)) {
        score += 0.2;
    }
    if description.split('.').count() <= 3 {
        score += 0.2;
    }
    if REQUIREMENT_STATEMENT.is_match(description)
        || MEASURABLE_CRITERIA.is_match(description)
        || ACTOR_REFERENCE.is_match(description)
        || crate::patterns::CAPABILITY_REFERENCE.is_match(description)
    {
        score += 0.3;
    }

    score.min(1.0)
}

/// Completeness: field presence, description length, verification
/// specificity.
fn completeness_score(requirement: &Requirement) -> f64 {
    let mut score = 0.0;

    let fields_present = [
        !requirement.id.is_empty(),
        !requirement.description.is_empty(),
        !requirement.verification_method.is_empty(),
        true, // priority is always typed
    ]
    .iter()
    .filter(|present| **present)
    .count();
    score += fields_present as f64 / 4.0 * 0.4;

    if requirement.description.split_whitespace().count() >= MIN_DESCRIPTION_WORDS {
        score += 0.3;
    }
    if requirement.verification_method.len() > 20 {
        score += 0.3;
    }

    score.min(1.0)
}

/// Consistency: 0.8 base with deductions for unusual id shapes and
/// descriptions not opening with "The " or "System ".
fn consistency_score(requirement: &Requirement) -> f64 {
    let mut score: f64 = 0.8;

    if !SHORT_ID_FORMAT.is_match(&requirement.id) {
        score -= 0.2;
    }
    if !requirement.description.starts_with("The ")
        && !requirement.description.starts_with("System ")
    {
        score -= 0.1;
    }

    score.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcadia_core::model::NfrDetails;
    use arcadia_core::{NfrCategory, Priority};

    fn requirement(description: &str) -> Requirement {
        Requirement {
            id: "FR-OPE-001".to_string(),
            kind: RequirementKind::Functional,
            title: "Test".to_string(),
            description: description.to_string(),
            priority: Priority::Should,
            priority_confidence: 0.5,
            rationale: String::new(),
            phase: ArcadiaPhase::Operational,
            verification_method: "Operational scenario validation and testing".to_string(),
            dependencies: vec![],
            capability_links: vec![],
            scenario_links: vec![],
            stakeholder_links: vec![],
            rebalanced: false,
            nfr: None,
        }
    }

    #[test]
    fn empty_set_reports_critical_issue() {
        let report = ValidationPipeline::default().validate(&[], ArcadiaPhase::Operational);
        assert_eq!(report.total_requirements, 0);
        assert_eq!(report.issues_at(IssueLevel::Critical), 1);
        assert_eq!(report.grade(), 'F');
    }

    #[test]
    fn well_formed_requirement_passes_syntactic_checks() {
        let req = requirement(
            "The system shall enable the Mission Commander to exercise the mission \
             objectives capability during operational scenarios with measurable stakeholder \
             needs coverage across all monitored assets",
        );
        let report = ValidationPipeline::default().validate(&[req], ArcadiaPhase::Operational);
        assert!((report.scores_by_category["syntactic"] - 1.0).abs() < 1e-9);
        assert!(!report
            .issues
            .iter()
            .any(|i| i.title == "Invalid Requirement Statement"));
    }

    #[test]
    fn missing_shall_statement_is_flagged() {
        let req = requirement("A description without the magic word in statement form at all, \
                               though it is long enough to pass the word count check easily");
        let report = ValidationPipeline::default().validate(&[req], ArcadiaPhase::Operational);
        assert!(report
            .issues
            .iter()
            .any(|i| i.title == "Invalid Requirement Statement"));
        assert_eq!(report.scores_by_category["syntactic"], 0.0);
    }

    #[test]
    fn non_measurable_nfr_is_flagged() {
        let mut req = requirement(
            "The system shall be responsive to the operator at all times during active \
             monitoring sessions and mission objectives work",
        );
        req.kind = RequirementKind::NonFunctional;
        req.nfr = Some(NfrDetails {
            category: NfrCategory::Performance,
            metric: "Quantitative measure to be defined".to_string(),
            target_value: "Target value to be defined".to_string(),
            measurement_method: "Performance monitoring and benchmarking".to_string(),
        });
        let report = ValidationPipeline::default().validate(&[req], ArcadiaPhase::Operational);
        assert!(report.issues.iter().any(|i| i.title == "Non-Measurable NFR"));
    }

    #[test]
    fn uncovered_actors_produce_missing_actor_references_warning() {
        let req = requirement(
            "The system shall archive telemetry readings for later analysis by the operator \
             within the mission objectives and stakeholder needs scope",
        );
        let report = ValidationPipeline::default().validate(&[req], ArcadiaPhase::Operational);
        let issue = report
            .issues
            .iter()
            .find(|i| i.title == "Incomplete Actor Coverage")
            .expect("expected an actor coverage warning");
        assert!(issue.description.starts_with("Missing actor references"));
    }

    #[test]
    fn nfr_heavy_set_triggers_distribution_warnings() {
        let mut reqs = Vec::new();
        for i in 0..4 {
            let mut req = requirement(
                "The system shall maintain 99.9% availability measured monthly for the \
                 monitoring service used by the operator across mission objectives",
            );
            req.id = format!("NFR-RELI-{:03}", i + 1);
            req.kind = RequirementKind::NonFunctional;
            req.nfr = Some(NfrDetails {
                category: NfrCategory::Reliability,
                metric: "99.9 percent".to_string(),
                target_value: "99.9".to_string(),
                measurement_method: "Reliability testing and analysis".to_string(),
            });
            reqs.push(req);
        }
        let report = ValidationPipeline::default().validate(&reqs, ArcadiaPhase::Operational);
        assert!(report
            .issues
            .iter()
            .any(|i| i.title == "Low Functional Requirements Ratio"));
        assert!(report.issues.iter().any(|i| i.title == "High NFR Ratio"));
    }

    #[test]
    fn overall_score_is_mean_of_categories() {
        let req = requirement(
            "The system shall enable the Mission Commander to exercise mission objectives \
             with the Real-time Monitoring capability and measurable 99.9% stakeholder needs \
             coverage within 100 milliseconds",
        );
        let report = ValidationPipeline::default().validate(&[req], ArcadiaPhase::Operational);
        let mean: f64 = report.scores_by_category.values().sum::<f64>() / 5.0;
        assert!((report.overall_score - mean).abs() < 1e-9);
        assert!(report.overall_score > 0.0);
    }
}
