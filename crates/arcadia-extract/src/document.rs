//! Proposal parsing and chunking.
//!
//! Chunking uses a fixed window with overlap; window ends prefer to land on
//! paragraph, line, sentence or word boundaries, in that order. Phase
//! classification is keyword scoring over the fixed ARCADIA vocabulary.

use arcadia_core::model::Stakeholder;
use arcadia_core::vocabulary::phase_keywords;
use arcadia_core::{ArcadiaPhase, DocumentChunk, DocumentConfig};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

static OBJECTIVE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?im)(?:Objective|Goal|Aim)\s*(\d+)[:.]?\s*([^.\n]+)").unwrap(),
        Regex::new(r"(?m)(\d+)\.\s*([A-Z][^.\n]+)").unwrap(),
        Regex::new(r"(?m)[•\-]\s*([A-Z][^.\n]+)").unwrap(),
    ]
});

static STAKEHOLDER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)(?:stakeholder|actor|user|team|organization)s?[:\s]+([^.\n]+)").unwrap(),
        Regex::new(r"(?i)(?:analyst|engineer|manager|operator)s?\s+([^.\n]+)").unwrap(),
        Regex::new(r"(?i)(?:consortium|partner)s?\s*[:\s]+([^.\n]+)").unwrap(),
    ]
});

static WORK_PACKAGE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:WP|Work Package)\s*(\d+)[:.]?\s*([^.\n]+)").unwrap());

static COMPONENT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)(?:component|module|system|platform|service)\s*[:\-]?\s*([^.\n]+)")
            .unwrap(),
        Regex::new(r"(?i)(?:AI|ML|algorithm|model)\s+([^.\n]+)").unwrap(),
        Regex::new(r"(?i)(?:interface|API|protocol)\s+([^.\n]+)").unwrap(),
    ]
});

static REQUIREMENT_INDICATOR_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)(?:shall|must|will|should|needs?\s+to)\s+([^.\n]+)").unwrap(),
        Regex::new(r"(?i)(?:requirement|constraint|specification)s?\s*[:\-]?\s*([^.\n]+)")
            .unwrap(),
        Regex::new(r"(?i)(?:performance|security|usability|reliability)\s+([^.\n]+)").unwrap(),
    ]
});

/// Word-bounded matchers for every phase keyword, compiled once.
static PHASE_KEYWORD_PATTERNS: Lazy<Vec<(ArcadiaPhase, Vec<(&'static str, Regex)>)>> =
    Lazy::new(|| {
        ArcadiaPhase::ALL
            .iter()
            .map(|&phase| {
                let patterns = phase_keywords(phase)
                    .iter()
                    .map(|&keyword| {
                        let pattern =
                            Regex::new(&format!(r"(?i)\b{}\b", regex::escape(keyword))).unwrap();
                        (keyword, pattern)
                    })
                    .collect();
                (phase, patterns)
            })
            .collect()
    });

/// An objective mined from the proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Objective {
    pub id: String,
    pub number: String,
    pub description: String,
    pub phase: ArcadiaPhase,
}

/// A work package reference with its phase mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkPackage {
    pub id: String,
    pub number: String,
    pub description: String,
    pub phase: ArcadiaPhase,
    pub requirements_potential: String,
}

/// A technical component mention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalComponent {
    pub id: String,
    pub description: String,
    pub kind: String,
    pub phase: ArcadiaPhase,
}

/// A potential requirement indicator ("shall", "must", ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementIndicator {
    pub id: String,
    pub text: String,
    pub description: String,
    pub kind: String,
    pub priority: String,
}

/// Keyword relevance of one phase over the whole proposal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhaseRelevance {
    pub score: usize,
    pub found_keywords: Vec<String>,
    pub percentage: f64,
}

/// Advisory analysis of a proposal; not part of the ARCADIA output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalAnalysis {
    pub objectives: Vec<Objective>,
    pub stakeholders: Vec<Stakeholder>,
    pub work_packages: Vec<WorkPackage>,
    pub technical_components: Vec<TechnicalComponent>,
    pub requirement_indicators: Vec<RequirementIndicator>,
    pub phase_relevance: BTreeMap<String, PhaseRelevance>,
}

/// Parses and chunks raw proposal text.
#[derive(Debug, Clone, Default)]
pub struct DocumentProcessor {
    config: DocumentConfig,
}

impl DocumentProcessor {
    pub fn new(config: DocumentConfig) -> Self {
        Self { config }
    }

    /// Chunk text with the configured window and overlap, tagging each chunk
    /// with its classified phase. The concatenation of chunks covers the
    /// whole input; no chunk exceeds the window size.
    pub fn chunk(&self, text: &str, source: &str) -> Vec<DocumentChunk> {
        let pieces = self.split_text(text);
        let total = pieces.len();
        let chunks: Vec<DocumentChunk> = pieces
            .into_iter()
            .enumerate()
            .map(|(ordinal, content)| {
                let phase = self.classify_phase(&content);
                DocumentChunk::new(
                    format!("{source}-{ordinal}"),
                    content,
                    source,
                    ordinal,
                    phase,
                )
                .with_metadata("source", source)
                .with_metadata("total_chunks", total.to_string())
            })
            .collect();
        debug!(source, chunks = chunks.len(), "proposal chunked");
        chunks
    }

    fn split_text(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }
        let size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap.min(size.saturating_sub(1));

        let mut pieces = Vec::new();
        let mut start = 0usize;
        loop {
            let hard_end = (start + size).min(chars.len());
            let end = if hard_end < chars.len() {
                self.preferred_boundary(&chars, start, hard_end)
            } else {
                hard_end
            };

            pieces.push(chars[start..end].iter().collect::<String>());
            if end >= chars.len() {
                break;
            }
            start = end.saturating_sub(overlap).max(start + 1);
        }
        pieces
    }

    /// Pull the window end back to the best split boundary in its second
    /// half: paragraph, then line, then sentence, then word.
    fn preferred_boundary(&self, chars: &[char], start: usize, hard_end: usize) -> usize {
        let floor = start + (hard_end - start) / 2;
        let window: String = chars[floor..hard_end].iter().collect();

        for separator in ["\n\n", "\n", ". ", " "] {
            if let Some(pos) = window.rfind(separator) {
                let char_offset = window[..pos + separator.len()].chars().count();
                return floor + char_offset;
            }
        }
        hard_end
    }

    /// Score each phase by keyword hits; ties break in methodology order and
    /// no hit at all defaults to System.
    pub fn classify_phase(&self, text: &str) -> ArcadiaPhase {
        let lower = text.to_lowercase();
        let mut best = ArcadiaPhase::System;
        let mut best_score = 0usize;

        for phase in ArcadiaPhase::ALL {
            let score = phase_keywords(phase)
                .iter()
                .filter(|keyword| lower.contains(&keyword.to_lowercase()))
                .count();
            if score > best_score {
                best = phase;
                best_score = score;
            }
        }
        best
    }

    /// Chunks whose text contains any keyword for the phase; falls back to
    /// the first three chunks when nothing matches.
    pub fn filter_by_phase<'a>(
        &self,
        chunks: &'a [DocumentChunk],
        phase: ArcadiaPhase,
    ) -> Vec<&'a DocumentChunk> {
        let keywords = phase_keywords(phase);
        let matching: Vec<&DocumentChunk> = chunks
            .iter()
            .filter(|chunk| {
                let lower = chunk.content.to_lowercase();
                keywords
                    .iter()
                    .any(|keyword| lower.contains(&keyword.to_lowercase()))
            })
            .collect();

        if matching.is_empty() {
            chunks.iter().take(3).collect()
        } else {
            matching
        }
    }

    /// Regex-mine the advisory proposal analysis record.
    pub fn extract_proposal_analysis(&self, text: &str) -> ProposalAnalysis {
        ProposalAnalysis {
            objectives: self.extract_objectives(text),
            stakeholders: self.extract_stakeholders(text),
            work_packages: self.extract_work_packages(text),
            technical_components: self.extract_technical_components(text),
            requirement_indicators: self.extract_requirement_indicators(text),
            phase_relevance: self.phase_relevance(text),
        }
    }

    fn extract_objectives(&self, text: &str) -> Vec<Objective> {
        let mut objectives = Vec::new();
        for pattern in OBJECTIVE_PATTERNS.iter() {
            for captures in pattern.captures_iter(text) {
                let (number, description) = if captures.len() == 3 {
                    (
                        captures.get(1).map(|m| m.as_str().to_string()),
                        captures.get(2).map_or("", |m| m.as_str()).trim(),
                    )
                } else {
                    (None, captures.get(1).map_or("", |m| m.as_str()).trim())
                };
                if description.is_empty() {
                    continue;
                }
                let index = objectives.len() + 1;
                objectives.push(Objective {
                    id: format!("OBJ-{index:02}"),
                    number: number.unwrap_or_else(|| index.to_string()),
                    description: description.to_string(),
                    phase: classify_description_phase(description),
                });
            }
        }
        objectives
    }

    fn extract_stakeholders(&self, text: &str) -> Vec<Stakeholder> {
        let mut stakeholders = Vec::new();
        for pattern in STAKEHOLDER_PATTERNS.iter() {
            for captures in pattern.captures_iter(text) {
                let description = captures.get(1).map_or("", |m| m.as_str()).trim();
                if description.len() <= 5 {
                    continue;
                }
                stakeholders.push(Stakeholder {
                    id: format!("STK-{:03}", stakeholders.len() + 1),
                    description: description.to_string(),
                    kind: classify_stakeholder_kind(description),
                    phase: ArcadiaPhase::Operational,
                });
            }
        }
        stakeholders
    }

    fn extract_work_packages(&self, text: &str) -> Vec<WorkPackage> {
        WORK_PACKAGE_PATTERN
            .captures_iter(text)
            .map(|captures| {
                let number = captures.get(1).map_or("", |m| m.as_str());
                let description = captures.get(2).map_or("", |m| m.as_str()).trim();
                WorkPackage {
                    id: format!("WP{number}"),
                    number: number.to_string(),
                    description: description.to_string(),
                    phase: classify_work_package_phase(description),
                    requirements_potential: assess_requirements_potential(description),
                }
            })
            .collect()
    }

    fn extract_technical_components(&self, text: &str) -> Vec<TechnicalComponent> {
        let mut components = Vec::new();
        for pattern in COMPONENT_PATTERNS.iter() {
            for captures in pattern.captures_iter(text) {
                let description = captures.get(1).map_or("", |m| m.as_str()).trim();
                if description.len() <= 10 {
                    continue;
                }
                components.push(TechnicalComponent {
                    id: format!("COMP-{:02}", components.len() + 1),
                    description: description.to_string(),
                    kind: classify_component_kind(description),
                    phase: classify_description_phase(description),
                });
            }
        }
        components
    }

    fn extract_requirement_indicators(&self, text: &str) -> Vec<RequirementIndicator> {
        let mut indicators = Vec::new();
        for pattern in REQUIREMENT_INDICATOR_PATTERNS.iter() {
            for captures in pattern.captures_iter(text) {
                let full = captures.get(0).map_or("", |m| m.as_str());
                let description = captures.get(1).map_or("", |m| m.as_str()).trim();
                if description.len() <= 5 {
                    continue;
                }
                indicators.push(RequirementIndicator {
                    id: format!("REQ-IND-{:02}", indicators.len() + 1),
                    text: full.to_string(),
                    description: description.to_string(),
                    kind: classify_indicator_kind(full),
                    priority: estimate_priority(full),
                });
            }
        }
        indicators
    }

    fn phase_relevance(&self, text: &str) -> BTreeMap<String, PhaseRelevance> {
        let mut relevance = BTreeMap::new();
        for (phase, patterns) in PHASE_KEYWORD_PATTERNS.iter() {
            let mut score = 0usize;
            let mut found = Vec::new();
            for (keyword, pattern) in patterns {
                let hits = pattern.find_iter(text).count();
                if hits > 0 {
                    score += hits;
                    found.push(keyword.to_string());
                }
            }
            relevance.insert(
                phase.key().to_string(),
                PhaseRelevance {
                    score,
                    found_keywords: found,
                    percentage: if patterns.is_empty() {
                        0.0
                    } else {
                        score as f64 / patterns.len() as f64 * 100.0
                    },
                },
            );
        }
        relevance
    }
}

fn classify_description_phase(description: &str) -> ArcadiaPhase {
    let lower = description.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if has(&["stakeholder", "user", "actor", "mission", "goal"]) {
        ArcadiaPhase::Operational
    } else if has(&["function", "requirement", "interface", "system"]) {
        ArcadiaPhase::System
    } else if has(&["component", "logical", "behavior", "interaction"]) {
        ArcadiaPhase::Logical
    } else if has(&["implementation", "deployment", "physical", "hardware"]) {
        ArcadiaPhase::Physical
    } else {
        ArcadiaPhase::System
    }
}

fn classify_stakeholder_kind(description: &str) -> String {
    let lower = description.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if has(&["analyst", "security"]) {
        "technical_user"
    } else if has(&["manager", "director", "admin"]) {
        "management"
    } else if has(&["developer", "engineer", "team"]) {
        "technical_team"
    } else {
        "general_user"
    }
    .to_string()
}

fn classify_work_package_phase(description: &str) -> ArcadiaPhase {
    let lower = description.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if has(&["stakeholder", "analysis", "requirement", "elicitation"]) {
        ArcadiaPhase::Operational
    } else if has(&["architecture", "design", "component"]) {
        ArcadiaPhase::Logical
    } else if has(&["implementation", "deployment", "pilot"]) {
        ArcadiaPhase::Physical
    } else {
        ArcadiaPhase::System
    }
}

fn assess_requirements_potential(description: &str) -> String {
    let lower = description.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if has(&["requirement", "specification", "analysis"]) {
        "high"
    } else if has(&["design", "architecture", "component"]) {
        "medium"
    } else {
        "low"
    }
    .to_string()
}

fn classify_component_kind(description: &str) -> String {
    let lower = description.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if has(&["ai", "ml", "algorithm", "model"]) {
        "ai_component"
    } else if has(&["interface", "api", "protocol"]) {
        "interface"
    } else if has(&["data", "database", "storage"]) {
        "data_component"
    } else {
        "system_component"
    }
    .to_string()
}

fn classify_indicator_kind(text: &str) -> String {
    let lower = text.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if has(&["shall", "must", "will"]) {
        "functional"
    } else if has(&["performance", "security", "usability", "reliability"]) {
        "non_functional"
    } else {
        "general"
    }
    .to_string()
}

fn estimate_priority(text: &str) -> String {
    let lower = text.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if has(&["must", "critical", "essential"]) {
        "MUST"
    } else if has(&["should", "important"]) {
        "SHOULD"
    } else {
        "COULD"
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_cover_text_and_respect_window() {
        let processor = DocumentProcessor::default();
        let text = "The operational mission involves stakeholders. ".repeat(100);
        let chunks = processor.chunk(&text, "proposal");

        assert!(!chunks.is_empty());
        let covered: usize = chunks.iter().map(|c| c.content.chars().count()).sum();
        assert!(covered >= text.chars().count());
        for chunk in &chunks {
            assert!(chunk.content.chars().count() <= 1000);
        }
    }

    #[test]
    fn short_text_is_one_chunk() {
        let processor = DocumentProcessor::default();
        let chunks = processor.chunk("A short proposal.", "proposal");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].ordinal, 0);
    }

    #[test]
    fn classification_defaults_to_system() {
        let processor = DocumentProcessor::default();
        assert_eq!(
            processor.classify_phase("zzz qqq completely unrelated"),
            ArcadiaPhase::System
        );
    }

    #[test]
    fn classification_picks_dominant_phase() {
        let processor = DocumentProcessor::default();
        assert_eq!(
            processor.classify_phase("hardware deployment on physical nodes with hosting"),
            ArcadiaPhase::Physical
        );
        assert_eq!(
            processor.classify_phase("stakeholder mission capability and operational scenario"),
            ArcadiaPhase::Operational
        );
    }

    #[test]
    fn phase_filter_falls_back_to_first_three() {
        let processor = DocumentProcessor::default();
        let chunks: Vec<DocumentChunk> = (0..5)
            .map(|i| {
                DocumentChunk::new(
                    format!("c{i}"),
                    "nothing relevant here",
                    "doc",
                    i,
                    ArcadiaPhase::System,
                )
            })
            .collect();
        let filtered = processor.filter_by_phase(&chunks, ArcadiaPhase::Physical);
        assert_eq!(filtered.len(), 3);
        assert_eq!(filtered[0].id, "c0");
    }

    #[test]
    fn proposal_analysis_mines_indicators() {
        let processor = DocumentProcessor::default();
        let text = "Objective 1: Provide mission planning for stakeholders.\n\
                    The system shall process sensor data within strict limits.\n\
                    WP1: Requirements analysis and elicitation.\n";
        let analysis = processor.extract_proposal_analysis(text);

        assert!(!analysis.objectives.is_empty());
        assert!(!analysis.requirement_indicators.is_empty());
        assert_eq!(analysis.work_packages.len(), 1);
        assert_eq!(analysis.work_packages[0].phase, ArcadiaPhase::Operational);
        assert!(analysis.phase_relevance.contains_key("operational"));
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let processor = DocumentProcessor::default();
        assert!(processor.chunk("", "proposal").is_empty());
    }
}
