//! Semantic similarity between ARCADIA elements.
//!
//! Name similarity is reflexive and symmetric. Scores combine exact and
//! substring matching, stop-word-filtered word overlap, a fixed synonym
//! clustering, and character overlap as the last resort.

use arcadia_core::vocabulary::{
    in_same_synonym_group, DOMAIN_KEYWORDS, NAME_STOP_WORDS, TERM_STOP_WORDS,
};
use std::collections::HashSet;

/// How two elements are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimilarityMode {
    NameOnly,
    /// `0.4·name + 0.3·description + 0.3·attribute overlap`
    Comprehensive,
    /// `0.3·name + 0.4·description + 0.3·relationship`
    Contextual,
    /// Interface-IO similarity for functions, mission-to-description for
    /// capabilities, else 0.
    Functional,
}

/// Comparable facets of a model element, built once per element by the
/// analyzer.
#[derive(Debug, Clone, Default)]
pub struct ElementFacets {
    /// Runtime type marker; attribute similarity requires equal types.
    pub type_key: &'static str,
    pub name: String,
    pub description: String,
    pub mission_statement: Option<String>,
    pub responsibilities: Vec<String>,
    pub capabilities: Vec<String>,
    pub actor_refs: Vec<String>,
    pub parent_name: Option<String>,
    pub sub_elements: Vec<String>,
    /// Input/output interface specs, for functional comparison.
    pub io: Option<(Vec<String>, Vec<String>)>,
}

impl ElementFacets {
    pub fn named(type_key: &'static str, name: &str, description: &str) -> Self {
        Self {
            type_key,
            name: name.to_string(),
            description: description.to_string(),
            ..Default::default()
        }
    }
}

/// Mode-parameterised similarity between two elements, in [0, 1].
pub fn semantic_similarity(a: &ElementFacets, b: &ElementFacets, mode: SimilarityMode) -> f64 {
    match mode {
        SimilarityMode::NameOnly => name_similarity(&a.name, &b.name),
        SimilarityMode::Comprehensive => {
            name_similarity(&a.name, &b.name) * 0.4
                + description_similarity(&a.description, &b.description) * 0.3
                + attribute_similarity(a, b) * 0.3
        }
        SimilarityMode::Contextual => {
            name_similarity(&a.name, &b.name) * 0.3
                + description_similarity(&a.description, &b.description) * 0.4
                + relationship_similarity(a, b) * 0.3
        }
        SimilarityMode::Functional => functional_similarity(a, b),
    }
}

/// Name similarity: exact match, containment, word overlap, synonyms, then
/// weighted character overlap.
pub fn name_similarity(name1: &str, name2: &str) -> f64 {
    if name1.is_empty() || name2.is_empty() {
        return 0.0;
    }

    let a = name1.to_lowercase().trim().to_string();
    let b = name2.to_lowercase().trim().to_string();

    if a == b {
        return 1.0;
    }

    if a.contains(&b) || b.contains(&a) {
        let shorter = a.chars().count().min(b.chars().count()) as f64;
        let longer = a.chars().count().max(b.chars().count()) as f64;
        return 0.7 + (shorter / longer) * 0.2;
    }

    let words1: HashSet<&str> = a
        .split_whitespace()
        .filter(|w| !NAME_STOP_WORDS.contains(w))
        .collect();
    let words2: HashSet<&str> = b
        .split_whitespace()
        .filter(|w| !NAME_STOP_WORDS.contains(w))
        .collect();

    if words1.is_empty() || words2.is_empty() {
        return 0.0;
    }

    let common = words1.intersection(&words2).count();
    if common > 0 {
        let union = words1.union(&words2).count();
        let jaccard = common as f64 / union as f64;
        return (jaccard * 1.2).min(1.0);
    }

    let synonym = synonym_similarity(&words1, &words2);
    if synonym > 0.0 {
        return synonym;
    }

    character_similarity(&a, &b) * 0.6
}

/// Description similarity: Jaccard over extracted key terms with a pairwise
/// character-overlap fallback.
pub fn description_similarity(desc1: &str, desc2: &str) -> f64 {
    if desc1.is_empty() || desc2.is_empty() {
        return 0.0;
    }

    let terms1 = extract_key_terms(&desc1.to_lowercase());
    let terms2 = extract_key_terms(&desc2.to_lowercase());

    if terms1.is_empty() || terms2.is_empty() {
        return 0.0;
    }

    let common = terms1.intersection(&terms2).count();
    if common > 0 {
        let union = terms1.union(&terms2).count();
        return common as f64 / union as f64;
    }

    semantic_term_similarity(&terms1, &terms2)
}

/// Attribute-set overlap between same-type elements, averaged over the
/// attributes populated on either side.
pub fn attribute_similarity(a: &ElementFacets, b: &ElementFacets) -> f64 {
    if a.type_key != b.type_key {
        return 0.0;
    }

    let mut score = 0.0;
    let mut attributes = 0usize;
    let pairs: [(&[String], &[String]); 3] = [
        (&a.responsibilities, &b.responsibilities),
        (&a.capabilities, &b.capabilities),
        (&a.actor_refs, &b.actor_refs),
    ];
    for (xs, ys) in pairs {
        if !xs.is_empty() || !ys.is_empty() {
            score += set_jaccard(xs, ys);
            attributes += 1;
        }
    }
    score / attributes.max(1) as f64
}

/// Relationship similarity: matching parents dominate, then sub-element
/// overlap.
pub fn relationship_similarity(a: &ElementFacets, b: &ElementFacets) -> f64 {
    if let (Some(parent1), Some(parent2)) = (&a.parent_name, &b.parent_name) {
        if name_similarity(parent1, parent2) > 0.6 {
            return 0.8;
        }
    }

    if !a.sub_elements.is_empty() && !b.sub_elements.is_empty() {
        let subs1: HashSet<&String> = a.sub_elements.iter().collect();
        let subs2: HashSet<&String> = b.sub_elements.iter().collect();
        let overlap = subs1.intersection(&subs2).count();
        if overlap > 0 {
            let max_len = a.sub_elements.len().max(b.sub_elements.len());
            return (overlap as f64 / max_len as f64).min(0.7);
        }
    }

    0.0
}

fn functional_similarity(a: &ElementFacets, b: &ElementFacets) -> f64 {
    if let (Some((inputs1, outputs1)), Some((inputs2, outputs2))) = (&a.io, &b.io) {
        return (interface_similarity(inputs1, inputs2) + interface_similarity(outputs1, outputs2))
            / 2.0;
    }

    if let Some(mission) = &a.mission_statement {
        return description_similarity(mission, &b.description);
    }

    0.0
}

/// Pairwise interface-spec similarity over the cross product.
pub fn interface_similarity(interfaces1: &[String], interfaces2: &[String]) -> f64 {
    if interfaces1.is_empty() || interfaces2.is_empty() {
        return 0.0;
    }

    let mut total = 0.0;
    let mut comparisons = 0usize;
    for spec1 in interfaces1 {
        for spec2 in interfaces2 {
            comparisons += 1;
            if spec1 == spec2 {
                total += 1.0;
            } else if name_similarity(spec1, spec2) > 0.6 {
                total += 0.7;
            }
        }
    }
    total / comparisons.max(1) as f64
}

fn synonym_similarity(words1: &HashSet<&str>, words2: &HashSet<&str>) -> f64 {
    let mut score = 0.0;
    let mut comparisons = 0usize;

    for word1 in words1 {
        for word2 in words2 {
            comparisons += 1;
            if in_same_synonym_group(word1, word2) {
                score += 0.8;
            } else if word1.chars().count() > 3
                && word2.chars().count() > 3
                && shares_affix(word1, word2, 3)
            {
                score += 0.4;
            }
        }
    }

    score / comparisons.max(1) as f64
}

/// Whether two words share an `n`-character prefix or suffix.
fn shares_affix(word1: &str, word2: &str, n: usize) -> bool {
    let prefix = |w: &str| w.chars().take(n).collect::<String>();
    let suffix = |w: &str| {
        let count = w.chars().count();
        w.chars().skip(count.saturating_sub(n)).collect::<String>()
    };
    prefix(word1) == prefix(word2) || suffix(word1) == suffix(word2)
}

/// Character-set overlap weighted by the length ratio.
pub fn character_similarity(str1: &str, str2: &str) -> f64 {
    if str1.is_empty() || str2.is_empty() {
        return 0.0;
    }
    if str1 == str2 {
        return 1.0;
    }

    let chars1: HashSet<char> = str1.chars().collect();
    let chars2: HashSet<char> = str2.chars().collect();
    let common = chars1.intersection(&chars2).count();
    if common == 0 {
        return 0.0;
    }

    let union = chars1.union(&chars2).count();
    let char_overlap = common as f64 / union as f64;
    let len1 = str1.chars().count() as f64;
    let len2 = str2.chars().count() as f64;
    let length_factor = len1.min(len2) / len1.max(len2);

    char_overlap * length_factor
}

/// Extract key terms: stop-word-filtered words of at least three characters,
/// preferring domain vocabulary and words of length five or more.
pub fn extract_key_terms(text: &str) -> HashSet<String> {
    let words: HashSet<String> = text
        .to_lowercase()
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|w| !w.is_empty() && !TERM_STOP_WORDS.contains(w.as_str()))
        .collect();

    let weighted: HashSet<String> = words
        .iter()
        .filter(|term| {
            term.len() >= 3 && (DOMAIN_KEYWORDS.contains(term.as_str()) || term.len() >= 5)
        })
        .cloned()
        .collect();

    if weighted.is_empty() {
        words
    } else {
        weighted
    }
}

fn semantic_term_similarity(terms1: &HashSet<String>, terms2: &HashSet<String>) -> f64 {
    if terms1.is_empty() || terms2.is_empty() {
        return 0.0;
    }

    let mut total = 0.0;
    let mut comparisons = 0usize;

    for term1 in terms1 {
        for term2 in terms2 {
            comparisons += 1;
            let char_sim = character_similarity(term1, term2);
            if char_sim > 0.6 {
                total += char_sim * 0.7;
            }
            if term1.chars().count() > 4
                && term2.chars().count() > 4
                && shares_affix(term1, term2, 4)
            {
                total += 0.5;
            }
        }
    }

    total / comparisons.max(1) as f64
}

fn set_jaccard(xs: &[String], ys: &[String]) -> f64 {
    let set1: HashSet<&String> = xs.iter().collect();
    let set2: HashSet<&String> = ys.iter().collect();
    let union = set1.union(&set2).count();
    set1.intersection(&set2).count() as f64 / union.max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_similarity_is_reflexive() {
        for name in ["Mission Commander", "monitor", "Data Processing System"] {
            assert_eq!(name_similarity(name, name), 1.0);
        }
    }

    #[test]
    fn name_similarity_is_symmetric() {
        let pairs = [
            ("Mission Commander", "Commander"),
            ("monitor status", "track status"),
            ("Data Manager", "Information Handler"),
        ];
        for (a, b) in pairs {
            let forward = name_similarity(a, b);
            let backward = name_similarity(b, a);
            assert!((forward - backward).abs() < 1e-9, "{a} vs {b}");
        }
    }

    #[test]
    fn containment_scores_in_expected_band() {
        let score = name_similarity("Mission Commander", "Commander");
        assert!((0.7..=0.9).contains(&score));
    }

    #[test]
    fn synonyms_score_without_shared_words() {
        // "monitor" and "track" share a synonym cluster.
        let score = name_similarity("monitor", "track");
        assert!(score > 0.0);
    }

    #[test]
    fn word_overlap_beats_character_noise() {
        let related = name_similarity("mission planning system", "mission execution system");
        let unrelated = name_similarity("mission planning", "zqxwv kjh");
        assert!(related > unrelated);
    }

    #[test]
    fn description_similarity_uses_key_terms() {
        let score = description_similarity(
            "Capability to monitor system performance and generate alerts",
            "Monitors performance of the system and raises alerts",
        );
        assert!(score > 0.0);
        assert_eq!(description_similarity("", "anything"), 0.0);
    }

    #[test]
    fn attribute_similarity_requires_same_type() {
        let mut a = ElementFacets::named("actor", "Operator", "");
        a.responsibilities = vec!["monitor".to_string()];
        let mut b = ElementFacets::named("capability", "Operator", "");
        b.responsibilities = vec!["monitor".to_string()];
        assert_eq!(attribute_similarity(&a, &b), 0.0);

        let mut c = ElementFacets::named("actor", "Operator", "");
        c.responsibilities = vec!["monitor".to_string()];
        assert!(attribute_similarity(&a, &c) > 0.9);
    }

    #[test]
    fn relationship_similarity_prefers_matching_parents() {
        let mut a = ElementFacets::named("function", "Route Messages", "");
        a.parent_name = Some("Communication Manager".to_string());
        let mut b = ElementFacets::named("function", "Forward Messages", "");
        b.parent_name = Some("Communication Manager".to_string());
        assert_eq!(relationship_similarity(&a, &b), 0.8);
    }

    #[test]
    fn functional_mode_compares_io() {
        let mut a = ElementFacets::named("function", "Process Data", "");
        a.io = Some((vec!["sensor data".to_string()], vec!["report".to_string()]));
        let mut b = ElementFacets::named("function", "Handle Data", "");
        b.io = Some((vec!["sensor data".to_string()], vec!["report".to_string()]));
        let score = semantic_similarity(&a, &b, SimilarityMode::Functional);
        assert!(score > 0.9);
    }

    #[test]
    fn functional_mode_falls_back_to_mission() {
        let mut a = ElementFacets::named("capability", "Monitoring", "");
        a.mission_statement = Some("monitor system performance continuously".to_string());
        let b = ElementFacets::named(
            "component",
            "Monitor",
            "component that monitors performance of the system",
        );
        assert!(semantic_similarity(&a, &b, SimilarityMode::Functional) > 0.0);
    }

    #[test]
    fn scores_stay_in_unit_interval() {
        let mut a = ElementFacets::named("actor", "Mission Commander", "plans missions");
        a.responsibilities = vec!["planning".to_string()];
        let mut b = ElementFacets::named("actor", "Mission Commander", "plans missions");
        b.responsibilities = vec!["planning".to_string()];
        for mode in [
            SimilarityMode::NameOnly,
            SimilarityMode::Comprehensive,
            SimilarityMode::Contextual,
            SimilarityMode::Functional,
        ] {
            let score = semantic_similarity(&a, &b, mode);
            assert!((0.0..=1.0).contains(&score), "{mode:?} => {score}");
        }
    }
}
