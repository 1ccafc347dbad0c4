//! MoSCoW priority derivation and distribution balancing.
//!
//! Derivation weighs criticality keywords in the requirement and its
//! context. Balancing enforces the 30% MUST / 50% SHOULD / 20% COULD
//! target over a confidence-sorted list, flagging moved requirements.

use crate::patterns::{COULD_KEYWORDS, MUST_KEYWORDS};
use arcadia_core::model::Requirement;
use arcadia_core::Priority;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outcome of priority derivation for one requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityAnalysis {
    pub priority: Priority,
    pub confidence: f64,
    pub must_signals: Vec<String>,
    pub could_signals: Vec<String>,
    pub stakeholder_aligned: bool,
}

impl PriorityAnalysis {
    /// Human-readable rationale attached to the requirement.
    pub fn rationale(&self) -> String {
        match self.priority {
            Priority::Must if !self.must_signals.is_empty() => format!(
                "Critical requirement: {} indicate operational necessity",
                self.must_signals.join(", ")
            ),
            Priority::Must => "Essential for operational capability achievement".to_string(),
            Priority::Should if self.stakeholder_aligned => {
                "Significant contribution to stakeholder needs".to_string()
            }
            Priority::Should => {
                "Significant contribution to operational effectiveness".to_string()
            }
            Priority::Could => "Enhancement to operational capability".to_string(),
            Priority::Wont => "Deferred beyond the current scope".to_string(),
        }
    }
}

/// Derive a priority and a confidence from criticality keywords in the
/// requirement text and its context, with stakeholder-need alignment as a
/// small confidence boost.
pub fn analyze_priority(
    requirement_text: &str,
    context: &str,
    stakeholder_needs: &[String],
) -> PriorityAnalysis {
    let text = requirement_text.to_lowercase();
    let context_lower = context.to_lowercase();

    let must_signals: Vec<String> = MUST_KEYWORDS
        .iter()
        .filter(|keyword| text.contains(*keyword))
        .map(|keyword| keyword.to_string())
        .collect();
    let could_signals: Vec<String> = COULD_KEYWORDS
        .iter()
        .filter(|keyword| text.contains(*keyword))
        .map(|keyword| keyword.to_string())
        .collect();

    // Context mentions count at half weight: the keyword appears near the
    // requirement but not in it.
    let context_must_hits = MUST_KEYWORDS
        .iter()
        .filter(|keyword| !text.contains(*keyword) && context_lower.contains(*keyword))
        .count();

    let stakeholder_aligned = stakeholder_needs.iter().any(|need| {
        need.to_lowercase()
            .split_whitespace()
            .any(|word| word.len() > 3 && text.contains(word))
    });

    let (priority, mut confidence) = if !must_signals.is_empty() {
        (
            Priority::Must,
            (0.6 + 0.1 * must_signals.len() as f64).min(0.9),
        )
    } else if !could_signals.is_empty() {
        (
            Priority::Could,
            (0.55 + 0.1 * could_signals.len() as f64).min(0.85),
        )
    } else if context_must_hits > 0 {
        (Priority::Should, 0.6)
    } else {
        (Priority::Should, 0.5)
    };

    if stakeholder_aligned {
        confidence = (confidence + 0.05).min(1.0);
    }

    PriorityAnalysis {
        priority,
        confidence,
        must_signals,
        could_signals,
        stakeholder_aligned,
    }
}

/// Rebalance the priorities of a generated batch toward 30/50/20.
///
/// Target counts are rounded with the residual assigned to SHOULD. The list
/// is walked in descending confidence order; each requirement keeps its
/// derived priority while a slot remains, otherwise takes the next priority
/// with an open slot and is flagged as rebalanced.
pub fn balance_priorities(requirements: &mut [Requirement]) {
    let total = requirements.len();
    if total == 0 {
        return;
    }

    let mut must_target = (total as f64 * 0.30).round() as isize;
    let mut should_target = (total as f64 * 0.50).round() as isize;
    let mut could_target = (total as f64 * 0.20).round() as isize;
    should_target += total as isize - (must_target + should_target + could_target);
    if should_target < 0 {
        // Rounding overshoot on tiny batches; shrink the larger buckets.
        must_target += should_target;
        should_target = 0;
        if must_target < 0 {
            could_target += must_target;
            must_target = 0;
        }
    }

    requirements.sort_by(|a, b| {
        b.priority_confidence
            .partial_cmp(&a.priority_confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut open = [
        (Priority::Must, must_target),
        (Priority::Should, should_target),
        (Priority::Could, could_target),
    ];

    for requirement in requirements.iter_mut() {
        let derived = requirement.priority;
        let slot = open
            .iter()
            .position(|(priority, remaining)| *priority == derived && *remaining > 0)
            .or_else(|| open.iter().position(|(_, remaining)| *remaining > 0));

        let assigned = match slot {
            Some(index) => {
                open[index].1 -= 1;
                open[index].0
            }
            None => Priority::Should,
        };

        requirement.rebalanced = assigned != derived;
        requirement.priority = assigned;
    }

    debug!(total, "priority rebalancing completed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcadia_core::model::Requirement;
    use arcadia_core::{ArcadiaPhase, RequirementKind};

    fn requirement(id: usize, priority: Priority, confidence: f64) -> Requirement {
        Requirement {
            id: format!("FR-SYS-{id:03}"),
            kind: RequirementKind::Functional,
            title: format!("Requirement {id}"),
            description: "The system shall do something specific and measurable".to_string(),
            priority,
            priority_confidence: confidence,
            rationale: String::new(),
            phase: ArcadiaPhase::System,
            verification_method: "Functional testing".to_string(),
            dependencies: vec![],
            capability_links: vec![],
            scenario_links: vec![],
            stakeholder_links: vec![],
            rebalanced: false,
            nfr: None,
        }
    }

    #[test]
    fn safety_keywords_bias_toward_must() {
        let analysis = analyze_priority(
            "ensure safety interlocks are engaged before motion",
            "",
            &[],
        );
        assert_eq!(analysis.priority, Priority::Must);
        assert!(analysis.confidence >= 0.6);
        assert!(analysis.must_signals.contains(&"safety".to_string()));
    }

    #[test]
    fn enhancement_keywords_bias_toward_could() {
        let analysis = analyze_priority("provide an optional convenience shortcut", "", &[]);
        assert_eq!(analysis.priority, Priority::Could);
    }

    #[test]
    fn neutral_text_defaults_to_should() {
        let analysis = analyze_priority("display the current telemetry values", "", &[]);
        assert_eq!(analysis.priority, Priority::Should);
        assert!((analysis.confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn balanced_counts_stay_within_one_of_targets() {
        for total in [10usize, 11, 13, 17, 20, 50] {
            let mut requirements: Vec<Requirement> = (0..total)
                .map(|i| requirement(i, Priority::Must, 1.0 - i as f64 / total as f64))
                .collect();
            balance_priorities(&mut requirements);

            let count = |p: Priority| requirements.iter().filter(|r| r.priority == p).count();
            let must = count(Priority::Must) as isize;
            let should = count(Priority::Should) as isize;
            let could = count(Priority::Could) as isize;

            let floor = |f: f64| (f * total as f64).floor() as isize;
            assert!((must - floor(0.3)).abs() <= 1, "MUST off for N={total}");
            assert!((should - floor(0.5)).abs() <= 1, "SHOULD off for N={total}");
            assert!((could - floor(0.2)).abs() <= 1, "COULD off for N={total}");
            assert_eq!(must + should + could, total as isize);
        }
    }

    #[test]
    fn high_confidence_requirements_keep_their_priority_first() {
        let mut requirements = vec![
            requirement(1, Priority::Must, 0.9),
            requirement(2, Priority::Must, 0.8),
            requirement(3, Priority::Must, 0.7),
            requirement(4, Priority::Must, 0.6),
            requirement(5, Priority::Must, 0.5),
            requirement(6, Priority::Must, 0.4),
            requirement(7, Priority::Must, 0.3),
            requirement(8, Priority::Must, 0.2),
            requirement(9, Priority::Must, 0.1),
            requirement(10, Priority::Must, 0.05),
        ];
        balance_priorities(&mut requirements);

        // The three most confident requirements keep MUST.
        assert_eq!(requirements[0].priority, Priority::Must);
        assert!(!requirements[0].rebalanced);
        assert_eq!(requirements[1].priority, Priority::Must);
        assert_eq!(requirements[2].priority, Priority::Must);
        // The rest were moved and flagged.
        assert!(requirements[3].rebalanced);
        assert_ne!(requirements[3].priority, Priority::Must);
    }

    #[test]
    fn empty_and_single_batches_are_safe() {
        let mut empty: Vec<Requirement> = vec![];
        balance_priorities(&mut empty);

        let mut single = vec![requirement(1, Priority::Must, 0.9)];
        balance_priorities(&mut single);
        assert_eq!(single.len(), 1);
    }
}
