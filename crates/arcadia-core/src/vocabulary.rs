//! Fixed ARCADIA vocabulary shared across the pipeline: phase keyword sets
//! for chunk classification, domain terms for key-term extraction, synonym
//! clusters for name matching, and the NFR category keyword tables.
//!
//! Everything here is initialised once and read-only thereafter.

use crate::types::{ArcadiaPhase, NfrCategory};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Per-phase keyword sets used by the chunk classifier and the phase filter.
pub fn phase_keywords(phase: ArcadiaPhase) -> &'static [&'static str] {
    match phase {
        ArcadiaPhase::Operational => &[
            "stakeholder",
            "actor",
            "mission",
            "capability",
            "operational",
            "use case",
            "scenario",
            "need",
            "goal",
            "activity",
            "process",
            "capability gap",
            "operational context",
        ],
        ArcadiaPhase::System => &[
            "function",
            "requirement",
            "interface",
            "system",
            "constraint",
            "mode",
            "service",
            "capability",
            "trade-off",
            "feasibility",
            "functional chain",
            "system need",
            "performance",
        ],
        ArcadiaPhase::Logical => &[
            "component",
            "logical",
            "behavior",
            "interaction",
            "scenario",
            "exchange",
            "protocol",
            "breakdown",
            "viewpoint",
            "compromise",
            "architecture driver",
            "functional allocation",
            "interface",
        ],
        ArcadiaPhase::Physical => &[
            "physical",
            "implementation",
            "deployment",
            "node",
            "configuration",
            "hardware",
            "software",
            "reuse",
            "pattern",
            "hosting",
            "behavioral component",
            "resource allocation",
            "technology",
        ],
        ArcadiaPhase::BuildingStrategy => &[
            "integration contract",
            "configuration item",
            "component contract",
            "test strategy",
            "verification",
            "validation",
        ],
    }
}

/// Domain terms favoured during key-term extraction for description
/// similarity.
pub static DOMAIN_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "system",
        "component",
        "function",
        "capability",
        "actor",
        "interface",
        "requirement",
        "specification",
        "architecture",
        "design",
        "model",
        "operational",
        "logical",
        "physical",
        "performance",
        "security",
        "data",
        "process",
        "workflow",
        "scenario",
        "constraint",
        "validation",
    ]
    .into_iter()
    .collect()
});

/// Stop words removed before word-set comparisons on element names.
pub static NAME_STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    ]
    .into_iter()
    .collect()
});

/// Stop words removed during key-term extraction from descriptions.
pub static TERM_STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
        "from", "up", "about", "into", "through", "during", "before", "after", "above", "below",
        "is", "are", "was", "were", "be", "have", "has", "had", "do", "does", "did", "will",
        "would", "could", "should", "may", "might", "must", "can", "this", "that", "these",
        "those",
    ]
    .into_iter()
    .collect()
});

/// ARCADIA-specific synonym clusters; words in the same cluster score 0.8 in
/// name similarity.
pub static SYNONYM_GROUPS: Lazy<Vec<HashSet<&'static str>>> = Lazy::new(|| {
    let groups: [&[&str]; 10] = [
        &["monitor", "observe", "watch", "track", "surveillance"],
        &["process", "handle", "manage", "execute", "perform"],
        &["user", "operator", "actor", "stakeholder", "participant"],
        &["system", "platform", "infrastructure", "framework"],
        &["security", "protection", "safety", "defense"],
        &["data", "information", "content", "payload"],
        &["interface", "connection", "link", "communication"],
        &["control", "command", "manage", "govern", "regulate"],
        &["analyze", "evaluate", "assess", "examine", "review"],
        &["network", "communication", "connectivity", "transmission"],
    ];
    groups
        .into_iter()
        .map(|g| g.iter().copied().collect())
        .collect()
});

/// Keywords scoring an NFR category's relevance over the combined text.
pub fn nfr_keywords(category: NfrCategory) -> &'static [&'static str] {
    match category {
        NfrCategory::Performance => &[
            "performance",
            "speed",
            "throughput",
            "latency",
            "response time",
        ],
        NfrCategory::Security => &[
            "security",
            "access",
            "authentication",
            "encryption",
            "protection",
        ],
        NfrCategory::Usability => &[
            "usability",
            "user interface",
            "human factors",
            "ergonomics",
        ],
        NfrCategory::Reliability => &[
            "reliability",
            "availability",
            "fault tolerance",
            "mtbf",
            "mttr",
        ],
        NfrCategory::Scalability => &["scalability", "capacity", "growth", "expansion"],
        NfrCategory::Maintainability => &[
            "maintainability",
            "maintenance",
            "serviceability",
            "support",
        ],
    }
}

/// Domain indicators granting a fixed relevance boost (0.1 each, capped at
/// 0.3 by the caller).
pub fn nfr_domain_indicators(category: NfrCategory) -> &'static [&'static str] {
    match category {
        NfrCategory::Performance => &["real-time", "speed", "fast", "efficient", "optimization"],
        NfrCategory::Security => &[
            "secure",
            "protection",
            "authentication",
            "encryption",
            "access",
        ],
        NfrCategory::Reliability => &["reliable", "fault", "failure", "robust", "resilient"],
        NfrCategory::Usability => &["user", "interface", "experience", "ergonomic", "intuitive"],
        NfrCategory::Scalability => &["scale", "growth", "capacity", "expansion", "volume"],
        NfrCategory::Maintainability => &["maintain", "support", "update", "modify", "evolve"],
    }
}

/// Whether two words fall in the same synonym cluster.
pub fn in_same_synonym_group(a: &str, b: &str) -> bool {
    SYNONYM_GROUPS
        .iter()
        .any(|group| group.contains(a) && group.contains(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_phase_has_keywords() {
        for phase in ArcadiaPhase::ALL {
            assert!(!phase_keywords(phase).is_empty());
        }
    }

    #[test]
    fn synonym_lookup_is_symmetric() {
        assert!(in_same_synonym_group("monitor", "track"));
        assert!(in_same_synonym_group("track", "monitor"));
        assert!(!in_same_synonym_group("monitor", "encryption"));
    }

    #[test]
    fn core_nfr_categories_have_indicators() {
        for category in NfrCategory::CORE {
            assert!(!nfr_domain_indicators(category).is_empty());
        }
    }
}
