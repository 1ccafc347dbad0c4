//! Regex families used by requirement generation and validation. All
//! patterns compile once and are shared.

use once_cell::sync::Lazy;
use regex::Regex;

/// A "shall" clause with up to three continuation sentences.
pub static SHALL_CLAUSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[Tt]he system shall ([^.]+(?:\.[^.]*){0,3})").unwrap());

/// Loose "shall" statement used by syntactic validation.
pub static REQUIREMENT_STATEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i).*shall\s+([^.]+)").unwrap());

/// Explicit priority hint in a generated line.
pub static PRIORITY_HINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Priority:\s*(MUST|SHOULD|COULD)").unwrap());

/// Explicit verification hint in a generated line.
pub static VERIFICATION_HINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Verification:\s*([^.\n]+)").unwrap());

/// Metric families: value + unit over time, percentage, bytes, counts and
/// occurrences, in preference order.
pub static METRIC_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(seconds?|minutes?|hours?|ms|milliseconds?)").unwrap(),
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(%|percent|percentage)").unwrap(),
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(MB|GB|TB|KB|bytes?)").unwrap(),
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(users?|requests?|transactions?|operations?)").unwrap(),
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(times?|instances?|occurrences?)").unwrap(),
    ]
});

/// Target-value families: upper bounds, lower bounds, equalities, ranges.
pub static TARGET_UPPER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:less than|<|under|below|within|maximum|max)\s*(\d+(?:\.\d+)?)").unwrap()
});
pub static TARGET_LOWER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:greater than|>|above|over|minimum|min|at least)\s*(\d+(?:\.\d+)?)").unwrap()
});
pub static TARGET_EXACT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:exactly|equal to|=)\s*(\d+(?:\.\d+)?)").unwrap());
pub static TARGET_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)between\s*(\d+(?:\.\d+)?)\s*and\s*(\d+(?:\.\d+)?)").unwrap()
});

/// Capability statements mined from the combined context.
pub static CAPABILITY_MINERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)capability to ([^.]+)").unwrap(),
        Regex::new(r"(?i)able to ([^.]+)").unwrap(),
        Regex::new(r"(?i)capacity for ([^.]+)").unwrap(),
        Regex::new(r"(?i)operational capability ([^.]+)").unwrap(),
    ]
});

/// Scenario statements mined from the combined context.
pub static SCENARIO_MINERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)scenario ([^.]+)").unwrap(),
        Regex::new(r"(?i)use case ([^.]+)").unwrap(),
        Regex::new(r"(?i)operational situation ([^.]+)").unwrap(),
        Regex::new(r"(?i)when ([^.]+)").unwrap(),
    ]
});

/// Stakeholder-need statements mined from the combined context.
pub static NEED_MINERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)needs? ([^.]+)").unwrap(),
        Regex::new(r"(?i)requires? ([^.]+)").unwrap(),
        Regex::new(r"(?i)expects? ([^.]+)").unwrap(),
        Regex::new(r"(?i)demands? ([^.]+)").unwrap(),
    ]
});

/// Measurable-criteria check used by semantic validation of NFRs.
pub static MEASURABLE_CRITERIA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(seconds?|minutes?|hours?|%|percent|MB|GB|TB|ms|milliseconds?)")
        .unwrap()
});

/// Actor-like reference in a description.
pub static ACTOR_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(user|operator|system|administrator|manager)").unwrap());

/// Capability-like reference in a description.
pub static CAPABILITY_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(capability|function|feature|service)").unwrap());

/// Consistency check for short requirement id formats.
pub static SHORT_ID_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2,3}-\d{3}$").unwrap());

/// Canonical generated requirement id shape.
pub static REQUIREMENT_ID_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(FR|NFR|STK)-[A-Z]{2,4}-\d{3}$").unwrap());

/// Vague terms penalised by the clarity score.
pub const VAGUE_TERMS: [&str; 6] = [
    "appropriate",
    "suitable",
    "adequate",
    "reasonable",
    "good",
    "bad",
];

/// Action verbs rewarded by the clarity score.
pub const ACTION_VERBS: [&str; 7] = [
    "shall", "must", "will", "should", "provide", "support", "enable",
];

/// Criticality keywords biasing a requirement toward MUST.
pub const MUST_KEYWORDS: [&str; 8] = [
    "safety",
    "regulatory",
    "essential",
    "core",
    "critical",
    "mandatory",
    "compliance",
    "security",
];

/// Keywords biasing a requirement toward COULD.
pub const COULD_KEYWORDS: [&str; 5] = [
    "optional",
    "enhancement",
    "convenience",
    "nice",
    "cosmetic",
];

/// Mine the first `limit` matches of a pattern family, keeping captures
/// longer than `min_len`.
pub fn mine(patterns: &[Regex], text: &str, min_len: usize, limit: usize) -> Vec<String> {
    let mut found = Vec::new();
    for pattern in patterns {
        for captures in pattern.captures_iter(text) {
            let value = captures.get(1).map_or("", |m| m.as_str()).trim();
            if value.len() > min_len {
                found.push(value.to_string());
            }
            if found.len() >= limit {
                return found;
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shall_clause_captures_continuation_sentences() {
        let text = "The system shall process 1000 sensor readings within 100 milliseconds with 99.9% accuracy.";
        let captures = SHALL_CLAUSE.captures(text).unwrap();
        let clause = captures.get(1).unwrap().as_str();
        assert!(clause.contains("99.9% accuracy"));
    }

    #[test]
    fn metric_patterns_prefer_time_units() {
        let text = "respond within 100 milliseconds and handle 1000 requests";
        let hit = METRIC_PATTERNS
            .iter()
            .find_map(|p| p.captures(text))
            .unwrap();
        assert_eq!(hit.get(1).unwrap().as_str(), "100");
        assert_eq!(hit.get(2).unwrap().as_str(), "milliseconds");
    }

    #[test]
    fn within_counts_as_upper_bound() {
        let captures = TARGET_UPPER.captures("within 100 milliseconds").unwrap();
        assert_eq!(captures.get(1).unwrap().as_str(), "100");
    }

    #[test]
    fn requirement_id_format_accepts_generated_shapes() {
        for id in ["FR-SYS-001", "NFR-PERF-012", "STK-OPE-003", "FR-OPE-123"] {
            assert!(REQUIREMENT_ID_FORMAT.is_match(id), "{id}");
        }
        assert!(!REQUIREMENT_ID_FORMAT.is_match("REQ-001"));
    }

    #[test]
    fn mine_caps_results() {
        let text = "capability to monitor the fleet. capability to plan routes. capability to report status.";
        let mined = mine(&CAPABILITY_MINERS, text, 5, 2);
        assert_eq!(mined.len(), 2);
    }
}
