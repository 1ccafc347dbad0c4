//! Identifier formats are load-bearing across exports and traceability:
//! `<PHASE>-<KIND>-<NNN>` for model elements, `FR-<PHASE3>-<NNN>` and
//! `NFR-<CAT4>-<NNN>` for requirements.

use crate::types::{ArcadiaPhase, NfrCategory};

/// Format a phase element id, e.g. `OA-ACTOR-001`, `LA-COMP-003`.
pub fn element_id(phase: ArcadiaPhase, kind: &str, index: usize) -> String {
    format!("{}-{}-{:03}", phase.code(), kind, index)
}

/// Format a functional requirement id, e.g. `FR-SYS-002`.
pub fn functional_requirement_id(phase: ArcadiaPhase, counter: usize) -> String {
    format!("FR-{}-{:03}", phase.requirement_code(), counter)
}

/// Format a non-functional requirement id, e.g. `NFR-PERF-001`.
pub fn nfr_requirement_id(category: NfrCategory, counter: usize) -> String {
    format!("NFR-{}-{:03}", category.code(), counter)
}

/// Format a stakeholder requirement id, e.g. `STK-OPE-001`.
pub fn stakeholder_requirement_id(phase: ArcadiaPhase, counter: usize) -> String {
    format!("STK-{}-{:03}", phase.requirement_code(), counter)
}

/// Format a traceability link id.
pub fn trace_id(counter: usize) -> String {
    format!("TRACE-{:03}", counter)
}

/// Format a gap analysis item id.
pub fn gap_id(counter: usize) -> String {
    format!("GAP-{:03}", counter)
}

/// Format a consistency check id.
pub fn consistency_id(counter: usize) -> String {
    format!("CONSIST-{:03}", counter)
}

/// Format a quality metric id.
pub fn quality_id(counter: usize) -> String {
    format!("QUALITY-{:03}", counter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_ids_are_zero_padded() {
        assert_eq!(element_id(ArcadiaPhase::Operational, "ACTOR", 1), "OA-ACTOR-001");
        assert_eq!(element_id(ArcadiaPhase::Logical, "COMP", 42), "LA-COMP-042");
    }

    #[test]
    fn requirement_ids_use_phase_and_category_codes() {
        assert_eq!(functional_requirement_id(ArcadiaPhase::System, 7), "FR-SYS-007");
        assert_eq!(nfr_requirement_id(NfrCategory::Performance, 1), "NFR-PERF-001");
        assert_eq!(
            stakeholder_requirement_id(ArcadiaPhase::Operational, 3),
            "STK-OPE-003"
        );
    }
}
