//! Requirement export surfaces: Markdown, CSV, DOORS block format and
//! OMG ReqIF XML.

use crate::generator::PhaseRequirements;
use arcadia_core::model::Requirement;
use arcadia_core::{ArcadiaPhase, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Requirements grouped by phase, as assembled by the orchestrator.
pub type RequirementsByPhase = BTreeMap<ArcadiaPhase, PhaseRequirements>;

fn kinds(phase_requirements: &PhaseRequirements) -> [(&'static str, &[Requirement]); 3] {
    [
        ("Functional", phase_requirements.functional.as_slice()),
        ("Non-Functional", phase_requirements.non_functional.as_slice()),
        ("Stakeholder", phase_requirements.stakeholder.as_slice()),
    ]
}

/// Markdown: one H1 per phase, H2 per category, one H3 per requirement id.
pub fn to_markdown(requirements: &RequirementsByPhase) -> String {
    let mut out = String::new();

    for (phase, phase_requirements) in requirements {
        out.push_str(&format!("# {} Phase\n\n", phase.title()));
        for (label, list) in kinds(phase_requirements) {
            if list.is_empty() {
                continue;
            }
            out.push_str(&format!("## {label} Requirements\n\n"));
            for requirement in list {
                out.push_str(&format!("### {}\n\n", requirement.id));
                out.push_str(&format!("{}\n\n", requirement.description));
                out.push_str(&format!("- Priority: {}\n", requirement.priority));
                out.push_str(&format!(
                    "- Verification Method: {}\n\n",
                    requirement.verification_method
                ));
            }
        }
    }

    out
}

/// CSV with the spreadsheet-facing column set.
pub fn to_csv(requirements: &RequirementsByPhase) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "ID",
            "Phase",
            "Type",
            "Title",
            "Description",
            "Priority",
            "Verification Method",
        ])
        .map_err(|e| arcadia_core::ArcadiaError::Export(e.to_string()))?;

    for (phase, phase_requirements) in requirements {
        for (label, list) in kinds(phase_requirements) {
            for requirement in list {
                writer
                    .write_record([
                        requirement.id.as_str(),
                        phase.title(),
                        label,
                        requirement.title.as_str(),
                        requirement.description.as_str(),
                        requirement.priority.as_str(),
                        requirement.verification_method.as_str(),
                    ])
                    .map_err(|e| arcadia_core::ArcadiaError::Export(e.to_string()))?;
            }
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| arcadia_core::ArcadiaError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| arcadia_core::ArcadiaError::Export(e.to_string()))
}

/// DOORS plain-text block format.
pub fn to_doors(requirements: &RequirementsByPhase) -> String {
    let mut out = String::from("// DOORS Import File\n// Generated by the Arcadia requirements system\n\n");
    out.push_str("module main\n\n");

    for (phase, phase_requirements) in requirements {
        out.push_str(&format!("// {} Phase Requirements\n", phase.title()));
        for (label, list) in kinds(phase_requirements) {
            if list.is_empty() {
                continue;
            }
            out.push_str(&format!("folder \"{label}\"\n"));
            for requirement in list {
                let title = requirement.title.replace('"', "\"\"");
                let description = requirement.description.replace('"', "\"\"");
                out.push_str(&format!("requirement \"{}\" = \"{}\"\n", requirement.id, title));
                out.push_str(&format!("text = \"{description}\"\n"));
                out.push_str(&format!("priority = \"{}\"\n", requirement.priority));
                out.push_str(&format!(
                    "verification = \"{}\"\n\n",
                    requirement.verification_method
                ));
            }
            out.push_str("end folder\n\n");
        }
    }

    out.push_str("end module\n");
    out
}

/// OMG ReqIF XML with one SPEC-OBJECT per requirement.
pub fn to_reqif(requirements: &RequirementsByPhase, created_at: DateTime<Utc>) -> String {
    let mut out = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<REQ-IF xmlns="http://www.omg.org/ReqIF" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <THE-HEADER>
        <REQ-IF-HEADER IDENTIFIER="ARCADIA_RAG_EXPORT">
            <COMMENT>Generated by the Arcadia requirements system</COMMENT>
            <CREATION-TIME>{}</CREATION-TIME>
            <REPOSITORY-ID>ARCADIA_RAG</REPOSITORY-ID>
            <REQ-IF-TOOL-ID>ARCADIA_RAG_SYSTEM</REQ-IF-TOOL-ID>
            <REQ-IF-VERSION>1.0</REQ-IF-VERSION>
            <SOURCE-TOOL-ID>ARCADIA_RAG</SOURCE-TOOL-ID>
            <TITLE>Arcadia Requirements Export</TITLE>
        </REQ-IF-HEADER>
    </THE-HEADER>
    <CORE-CONTENT>
        <REQ-IF-CONTENT>
            <SPEC-OBJECTS>"#,
        created_at.timestamp()
    );

    let mut spec_id = 1usize;
    for (phase, phase_requirements) in requirements {
        for (label, list) in kinds(phase_requirements) {
            for requirement in list {
                let values: [(&str, String); 7] = [
                    ("REQ_ID", requirement.id.clone()),
                    ("REQ_TITLE", requirement.title.clone()),
                    ("REQ_DESCRIPTION", requirement.description.clone()),
                    ("REQ_PHASE", phase.key().to_string()),
                    ("REQ_TYPE", label.to_string()),
                    ("REQ_PRIORITY", requirement.priority.to_string()),
                    ("REQ_VERIFICATION", requirement.verification_method.clone()),
                ];

                out.push_str(&format!(
                    "\n                <SPEC-OBJECT IDENTIFIER=\"SPEC_OBJ_{spec_id}\">\n                    <VALUES>"
                ));
                for (definition, value) in values {
                    out.push_str(&format!(
                        r#"
                        <ATTRIBUTE-VALUE-STRING THE-VALUE="{}">
                            <DEFINITION>
                                <ATTRIBUTE-DEFINITION-STRING-REF>{definition}</ATTRIBUTE-DEFINITION-STRING-REF>
                            </DEFINITION>
                        </ATTRIBUTE-VALUE-STRING>"#,
                        escape_xml(&value),
                    ));
                }
                out.push_str("\n                    </VALUES>\n                </SPEC-OBJECT>");
                spec_id += 1;
            }
        }
    }

    out.push_str(
        "\n            </SPEC-OBJECTS>\n        </REQ-IF-CONTENT>\n    </CORE-CONTENT>\n</REQ-IF>",
    );
    out
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcadia_core::{Priority, RequirementKind};

    fn sample() -> RequirementsByPhase {
        let requirement = Requirement {
            id: "FR-SYS-001".to_string(),
            kind: RequirementKind::Functional,
            title: "Process <sensor> data".to_string(),
            description: "The system shall process \"raw\" sensor data & archive it".to_string(),
            priority: Priority::Must,
            priority_confidence: 0.8,
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
        let mut by_phase = RequirementsByPhase::new();
        by_phase.insert(
            ArcadiaPhase::System,
            PhaseRequirements {
                functional: vec![requirement],
                non_functional: vec![],
                stakeholder: vec![],
            },
        );
        by_phase
    }

    #[test]
    fn markdown_uses_heading_hierarchy() {
        let markdown = to_markdown(&sample());
        assert!(markdown.contains("# System Analysis Phase"));
        assert!(markdown.contains("## Functional Requirements"));
        assert!(markdown.contains("### FR-SYS-001"));
        assert!(markdown.contains("- Priority: MUST"));
    }

    #[test]
    fn csv_has_expected_columns_and_rows() {
        let csv = to_csv(&sample()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "ID,Phase,Type,Title,Description,Priority,Verification Method"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("FR-SYS-001,System Analysis,Functional"));
    }

    #[test]
    fn doors_block_structure_is_complete() {
        let doors = to_doors(&sample());
        assert!(doors.contains("module main"));
        assert!(doors.contains("folder \"Functional\""));
        assert!(doors.contains("requirement \"FR-SYS-001\""));
        assert!(doors.contains("priority = \"MUST\""));
        assert!(doors.contains("end folder"));
        assert!(doors.trim_end().ends_with("end module"));
    }

    #[test]
    fn reqif_escapes_xml_special_characters() {
        let reqif = to_reqif(&sample(), Utc::now());
        assert!(reqif.contains("SPEC-OBJECT IDENTIFIER=\"SPEC_OBJ_1\""));
        assert!(reqif.contains("&lt;sensor&gt;"));
        assert!(reqif.contains("&quot;raw&quot;"));
        assert!(reqif.contains("&amp;"));
        assert!(reqif.contains("REQ_VERIFICATION"));
        assert!(!reqif.contains("<sensor>"));
    }
}
