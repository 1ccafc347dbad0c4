//! Fixed ARCADIA knowledge base injected into generation context: a
//! capability catalogue, an actor dictionary, a traceability matrix template
//! and per-phase requirement templates.
//!
//! The knowledge base is built once at startup and read-only thereafter.
//! Template links (`OC-001 -> SF-001`) are schema hints rendered into
//! enrichment text; they are never emitted as live traceability links.

use arcadia_core::{ArcadiaPhase, DocumentChunk, RequirementKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A catalogued operational capability.
#[derive(Debug, Clone, Serialize)]
pub struct KnownCapability {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub phase: ArcadiaPhase,
    pub actors: &'static [&'static str],
    pub scenarios: &'static [&'static str],
    pub functions: &'static [&'static str],
    pub requirements_impact: &'static [&'static str],
    pub criticality: &'static str,
}

/// A catalogued actor with phase involvement.
#[derive(Debug, Clone, Serialize)]
pub struct KnownActor {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: &'static str,
    pub description: &'static str,
    pub responsibilities: &'static [&'static str],
    pub interactions: &'static [&'static str],
    pub capabilities: &'static [&'static str],
    pub phases: &'static [ArcadiaPhase],
}

/// An abstract source-type to target-type traceability relation with its
/// canonical confidence.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateLink {
    pub source_id: &'static str,
    pub source_kind: &'static str,
    pub target_id: &'static str,
    pub target_kind: &'static str,
    pub relationship: &'static str,
    pub phase_pair: &'static str,
    pub confidence: f64,
}

/// Per-phase requirement template.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseTemplate {
    pub phase: ArcadiaPhase,
    pub requirement_patterns: &'static [&'static str],
    pub verification_methods: &'static [&'static str],
    pub key_aspects: &'static [&'static str],
}

const CAPABILITIES: &[KnownCapability] = &[
    KnownCapability {
        id: "OC-001",
        name: "Mission Planning",
        description: "Capability to plan and coordinate operational missions",
        phase: ArcadiaPhase::Operational,
        actors: &["Mission Commander", "Operations Center", "Planning System"],
        scenarios: &["Mission Preparation", "Resource Allocation", "Timeline Planning"],
        functions: &["Plan Mission", "Allocate Resources", "Schedule Activities"],
        requirements_impact: &["Planning accuracy", "Resource optimization", "Timeline compliance"],
        criticality: "HIGH",
    },
    KnownCapability {
        id: "OC-002",
        name: "Real-time Monitoring",
        description: "Capability to monitor system status and performance in real-time",
        phase: ArcadiaPhase::Operational,
        actors: &["Operator", "Monitoring System", "Alert Manager"],
        scenarios: &["Status Monitoring", "Anomaly Detection", "Performance Tracking"],
        functions: &["Monitor Status", "Detect Anomalies", "Generate Alerts"],
        requirements_impact: &["Response time", "Detection accuracy", "Alert reliability"],
        criticality: "HIGH",
    },
    KnownCapability {
        id: "OC-003",
        name: "Data Processing",
        description: "Capability to process and analyze operational data",
        phase: ArcadiaPhase::System,
        actors: &["Data Processor", "Analytics Engine", "Data Manager"],
        scenarios: &["Data Ingestion", "Real-time Analysis", "Report Generation"],
        functions: &["Ingest Data", "Process Information", "Generate Reports"],
        requirements_impact: &["Processing speed", "Data accuracy", "Storage capacity"],
        criticality: "MEDIUM",
    },
    KnownCapability {
        id: "OC-004",
        name: "Communication Management",
        description: "Capability to manage communications between system components",
        phase: ArcadiaPhase::Logical,
        actors: &["Communication Manager", "Network Controller", "Protocol Handler"],
        scenarios: &["Message Routing", "Protocol Management", "Network Optimization"],
        functions: &["Route Messages", "Manage Protocols", "Optimize Network"],
        requirements_impact: &["Communication reliability", "Latency", "Bandwidth utilization"],
        criticality: "HIGH",
    },
    KnownCapability {
        id: "OC-005",
        name: "Resource Management",
        description: "Capability to manage and allocate system resources",
        phase: ArcadiaPhase::Physical,
        actors: &["Resource Manager", "Allocation Engine", "Performance Monitor"],
        scenarios: &["Resource Allocation", "Load Balancing", "Capacity Planning"],
        functions: &["Allocate Resources", "Balance Load", "Plan Capacity"],
        requirements_impact: &["Resource efficiency", "System performance", "Scalability"],
        criticality: "MEDIUM",
    },
];

const ACTORS: &[KnownActor] = &[
    KnownActor {
        id: "ACT-001",
        name: "Mission Commander",
        kind: "HUMAN",
        description: "Human operator responsible for mission planning and execution oversight",
        responsibilities: &[
            "Define mission objectives",
            "Approve operational plans",
            "Monitor mission execution",
            "Make critical decisions",
        ],
        interactions: &["Operations Center", "Planning System", "Field Operators"],
        capabilities: &["Mission Planning", "Decision Making", "Risk Assessment"],
        phases: &[ArcadiaPhase::Operational, ArcadiaPhase::System],
    },
    KnownActor {
        id: "ACT-002",
        name: "Operations Center",
        kind: "SYSTEM",
        description: "Central system for coordinating and monitoring operations",
        responsibilities: &[
            "Coordinate operational activities",
            "Monitor system status",
            "Manage communications",
            "Generate operational reports",
        ],
        interactions: &["Mission Commander", "Field Systems", "Monitoring Systems"],
        capabilities: &["Real-time Monitoring", "Communication Management", "Data Processing"],
        phases: &[
            ArcadiaPhase::Operational,
            ArcadiaPhase::System,
            ArcadiaPhase::Logical,
        ],
    },
    KnownActor {
        id: "ACT-003",
        name: "Field Operator",
        kind: "HUMAN",
        description: "Human operator working in the field environment",
        responsibilities: &[
            "Execute field operations",
            "Report status updates",
            "Handle local incidents",
            "Maintain equipment",
        ],
        interactions: &["Operations Center", "Field Equipment", "Local Systems"],
        capabilities: &["Equipment Operation", "Status Reporting", "Incident Response"],
        phases: &[ArcadiaPhase::Operational, ArcadiaPhase::Physical],
    },
    KnownActor {
        id: "ACT-004",
        name: "Data Processing System",
        kind: "SYSTEM",
        description: "Automated system for processing and analyzing operational data",
        responsibilities: &[
            "Process incoming data",
            "Perform data analysis",
            "Generate insights",
            "Store processed information",
        ],
        interactions: &["Data Sources", "Analytics Engine", "Storage Systems"],
        capabilities: &["Data Processing", "Analytics", "Information Management"],
        phases: &[
            ArcadiaPhase::System,
            ArcadiaPhase::Logical,
            ArcadiaPhase::Physical,
        ],
    },
    KnownActor {
        id: "ACT-005",
        name: "External System",
        kind: "EXTERNAL",
        description: "External system that interfaces with the main system",
        responsibilities: &[
            "Provide external data",
            "Accept system outputs",
            "Maintain interface protocols",
            "Ensure data quality",
        ],
        interactions: &["Interface Manager", "Data Exchange System", "Protocol Handler"],
        capabilities: &["Data Exchange", "Protocol Compliance", "Interface Management"],
        phases: &[ArcadiaPhase::Logical, ArcadiaPhase::Physical],
    },
];

const TEMPLATE_LINKS: &[TemplateLink] = &[
    TemplateLink {
        source_id: "OC-001",
        source_kind: "OPERATIONAL_CAPABILITY",
        target_id: "SF-001",
        target_kind: "SYSTEM_FUNCTION",
        relationship: "IMPLEMENTS",
        phase_pair: "operational_to_system",
        confidence: 0.95,
    },
    TemplateLink {
        source_id: "SF-001",
        source_kind: "SYSTEM_FUNCTION",
        target_id: "LC-001",
        target_kind: "LOGICAL_COMPONENT",
        relationship: "ALLOCATED_TO",
        phase_pair: "system_to_logical",
        confidence: 0.90,
    },
    TemplateLink {
        source_id: "LC-001",
        source_kind: "LOGICAL_COMPONENT",
        target_id: "PC-001",
        target_kind: "PHYSICAL_COMPONENT",
        relationship: "REALIZED_BY",
        phase_pair: "logical_to_physical",
        confidence: 0.85,
    },
    TemplateLink {
        source_id: "ACT-001",
        source_kind: "ACTOR",
        target_id: "OC-001",
        target_kind: "OPERATIONAL_CAPABILITY",
        relationship: "RESPONSIBLE_FOR",
        phase_pair: "operational",
        confidence: 1.0,
    },
    TemplateLink {
        source_id: "OC-002",
        source_kind: "OPERATIONAL_CAPABILITY",
        target_id: "NFR-001",
        target_kind: "NON_FUNCTIONAL_REQUIREMENT",
        relationship: "CONSTRAINS",
        phase_pair: "operational",
        confidence: 0.88,
    },
];

const PHASE_TEMPLATES: &[PhaseTemplate] = &[
    PhaseTemplate {
        phase: ArcadiaPhase::Operational,
        requirement_patterns: &[
            "The {actor} shall be able to {capability} in order to {purpose}",
            "During {scenario}, the system shall {action} within {constraint}",
            "The operational capability {capability} requires {resource} to achieve {outcome}",
        ],
        verification_methods: &[
            "Stakeholder review and approval",
            "Operational scenario walkthrough",
            "Mission effectiveness assessment",
            "Capability demonstration",
        ],
        key_aspects: &[
            "Mission objectives",
            "Operational scenarios",
            "Stakeholder needs",
            "Capability requirements",
            "Performance expectations",
        ],
    },
    PhaseTemplate {
        phase: ArcadiaPhase::System,
        requirement_patterns: &[
            "The system shall {function} to support {operational_capability}",
            "When {condition}, the system shall {response} within {timeframe}",
            "The system function {function} shall interface with {external_system}",
        ],
        verification_methods: &[
            "System functional testing",
            "Interface verification",
            "Performance testing",
            "Trade-off analysis validation",
        ],
        key_aspects: &[
            "System functions",
            "Functional chains",
            "System interfaces",
            "Performance requirements",
            "System boundaries",
        ],
    },
    PhaseTemplate {
        phase: ArcadiaPhase::Logical,
        requirement_patterns: &[
            "The {component} shall implement {function} with {quality_attributes}",
            "Component {component} shall communicate with {other_component} via {interface}",
            "The logical architecture shall support {system_function} through {component_allocation}",
        ],
        verification_methods: &[
            "Component allocation verification",
            "Interface consistency check",
            "Architecture review",
            "Design pattern validation",
        ],
        key_aspects: &[
            "Component allocation",
            "Logical interfaces",
            "Data flows",
            "Component interactions",
            "Architecture patterns",
        ],
    },
    PhaseTemplate {
        phase: ArcadiaPhase::Physical,
        requirement_patterns: &[
            "The {physical_component} shall realize {logical_component} using {technology}",
            "Physical component {component} shall operate in {environment} with {constraints}",
            "The implementation shall meet {performance_criteria} under {operational_conditions}",
        ],
        verification_methods: &[
            "Physical implementation testing",
            "Environmental testing",
            "Performance benchmarking",
            "Integration testing",
        ],
        key_aspects: &[
            "Physical components",
            "Technology choices",
            "Environmental constraints",
            "Implementation details",
            "Deployment scenarios",
        ],
    },
];

/// Per-requirement traceability validation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceabilityValidation {
    pub is_valid: bool,
    pub traceability_score: f64,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Read-only handle over the ARCADIA knowledge base.
#[derive(Debug, Clone, Default)]
pub struct ContextEnricher;

impl ContextEnricher {
    pub fn new() -> Self {
        Self
    }

    pub fn capabilities(&self) -> &'static [KnownCapability] {
        CAPABILITIES
    }

    pub fn actors(&self) -> &'static [KnownActor] {
        ACTORS
    }

    pub fn template_links(&self) -> &'static [TemplateLink] {
        TEMPLATE_LINKS
    }

    pub fn phase_template(&self, phase: ArcadiaPhase) -> Option<&'static PhaseTemplate> {
        PHASE_TEMPLATES.iter().find(|t| t.phase == phase)
    }

    pub fn capabilities_for_phase(&self, phase: ArcadiaPhase) -> Vec<&'static KnownCapability> {
        CAPABILITIES.iter().filter(|c| c.phase == phase).collect()
    }

    pub fn actors_for_phase(&self, phase: ArcadiaPhase) -> Vec<&'static KnownActor> {
        ACTORS.iter().filter(|a| a.phases.contains(&phase)).collect()
    }

    /// Append synthesised knowledge chunks to the retrieval context. Each
    /// block carries an `enrichment_type` tag so downstream components can
    /// count enrichment effectiveness.
    pub fn enrich(
        &self,
        phase: ArcadiaPhase,
        chunks: &[DocumentChunk],
        requirement_types: &[RequirementKind],
    ) -> Vec<DocumentChunk> {
        let mut enriched: Vec<DocumentChunk> = chunks.to_vec();
        let mut ordinal = chunks.len();

        if requirement_types.contains(&RequirementKind::Functional) {
            if let Some(block) = self.capabilities_block(phase) {
                enriched.push(enrichment_chunk(
                    "arcadia_capabilities",
                    "capabilities_catalog",
                    block,
                    phase,
                    &mut ordinal,
                ));
            }
        }
        if let Some(block) = self.actors_block(phase) {
            enriched.push(enrichment_chunk(
                "arcadia_actors",
                "actors_dictionary",
                block,
                phase,
                &mut ordinal,
            ));
        }
        if let Some(block) = self.traceability_block(phase) {
            enriched.push(enrichment_chunk(
                "arcadia_traceability",
                "traceability_matrix",
                block,
                phase,
                &mut ordinal,
            ));
        }
        if let Some(block) = self.templates_block(phase) {
            enriched.push(enrichment_chunk(
                "arcadia_templates",
                "phase_templates",
                block,
                phase,
                &mut ordinal,
            ));
        }

        debug!(
            phase = %phase,
            added = enriched.len() - chunks.len(),
            "context enriched"
        );
        enriched
    }

    fn capabilities_block(&self, phase: ArcadiaPhase) -> Option<String> {
        let relevant = self.capabilities_for_phase(phase);
        if relevant.is_empty() {
            return None;
        }
        let mut text = String::from("OPERATIONAL CAPABILITIES CATALOG:\n\n");
        for capability in relevant {
            text.push_str(&format!(
                "• {} ({}):\n  Description: {}\n  Criticality: {}\n  Actors: {}\n  Key Functions: {}\n  Requirements Impact: {}\n\n",
                capability.name,
                capability.id,
                capability.description,
                capability.criticality,
                capability.actors.join(", "),
                capability.functions.join(", "),
                capability.requirements_impact.join(", "),
            ));
        }
        Some(text)
    }

    fn actors_block(&self, phase: ArcadiaPhase) -> Option<String> {
        let relevant = self.actors_for_phase(phase);
        if relevant.is_empty() {
            return None;
        }
        let mut text = String::from("ARCADIA ACTORS DICTIONARY:\n\n");
        for actor in relevant {
            text.push_str(&format!(
                "• {} ({}) - {}:\n  Description: {}\n  Responsibilities: {}\n  Key Interactions: {}\n  Capabilities: {}\n\n",
                actor.name,
                actor.id,
                actor.kind,
                actor.description,
                actor.responsibilities.join(", "),
                actor.interactions.join(", "),
                actor.capabilities.join(", "),
            ));
        }
        Some(text)
    }

    fn traceability_block(&self, phase: ArcadiaPhase) -> Option<String> {
        let phase_key = phase.key();
        let relevant: Vec<&TemplateLink> = TEMPLATE_LINKS
            .iter()
            .filter(|link| link.phase_pair == phase_key || link.phase_pair.contains(phase_key))
            .collect();
        if relevant.is_empty() {
            return None;
        }
        let mut text = String::from(
            "ARCADIA TRACEABILITY MATRIX:\n\nPhase-relevant traceability relationships:\n",
        );
        for link in relevant {
            text.push_str(&format!(
                "• {} '{}' {} {} '{}' (confidence: {:.2})\n",
                link.source_kind,
                link.source_id,
                link.relationship,
                link.target_kind,
                link.target_id,
                link.confidence,
            ));
        }
        text.push_str(
            "\nTraceability Guidelines:\n\
             - Requirements should trace to operational capabilities\n\
             - System functions should implement operational capabilities\n\
             - Components should be allocated to realize functions\n\
             - Actors should be responsible for relevant capabilities\n",
        );
        Some(text)
    }

    fn templates_block(&self, phase: ArcadiaPhase) -> Option<String> {
        let template = self.phase_template(phase)?;
        let mut text = format!(
            "ARCADIA {} PHASE TEMPLATES:\n\nRequirement Patterns:\n",
            phase.key().to_uppercase()
        );
        for pattern in template.requirement_patterns {
            text.push_str(&format!("• {pattern}\n"));
        }
        text.push_str("\nPhase-Specific Verification Methods:\n");
        for method in template.verification_methods {
            text.push_str(&format!("• {method}\n"));
        }
        text.push_str("\nKey Aspects to Address:\n");
        for aspect in template.key_aspects {
            text.push_str(&format!("• {aspect}\n"));
        }
        Some(text)
    }

    /// Score a requirement's traceability against the knowledge base:
    /// `min(1, capability_mentions*0.4 + actor_mentions*0.3 + 0.3)`, invalid
    /// below 0.5.
    pub fn validate_traceability(
        &self,
        description: &str,
        _phase: ArcadiaPhase,
    ) -> TraceabilityValidation {
        let text = description.to_lowercase();

        let capability_mentions = CAPABILITIES
            .iter()
            .filter(|c| text.contains(&c.name.to_lowercase()))
            .count();
        let actor_mentions = ACTORS
            .iter()
            .filter(|a| text.contains(&a.name.to_lowercase()))
            .count();

        let score =
            (capability_mentions as f64 * 0.4 + actor_mentions as f64 * 0.3 + 0.3).min(1.0);

        let mut suggestions = Vec::new();
        if capability_mentions == 0 {
            suggestions
                .push("Consider linking requirement to relevant operational capabilities".into());
        }
        if actor_mentions == 0 {
            suggestions.push("Consider specifying responsible actors for this requirement".into());
        }

        let mut issues = Vec::new();
        let is_valid = score >= 0.5;
        if !is_valid {
            issues.push(format!(
                "Low traceability score ({score:.2}). Requirement may lack ARCADIA context."
            ));
        }

        TraceabilityValidation {
            is_valid,
            traceability_score: score,
            issues,
            suggestions,
        }
    }
}

fn enrichment_chunk(
    source: &str,
    enrichment_type: &str,
    content: String,
    phase: ArcadiaPhase,
    ordinal: &mut usize,
) -> DocumentChunk {
    let chunk = DocumentChunk::new(
        format!("{source}-{phase}"),
        content,
        source,
        *ordinal,
        phase,
    )
    .with_metadata("enrichment_type", enrichment_type)
    .with_metadata("phase", phase.key());
    *ordinal += 1;
    chunk
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enrichment_appends_tagged_chunks() {
        let enricher = ContextEnricher::new();
        let base = vec![DocumentChunk::new(
            "c0",
            "proposal text",
            "proposal",
            0,
            ArcadiaPhase::Operational,
        )];
        let enriched = enricher.enrich(
            ArcadiaPhase::Operational,
            &base,
            &[RequirementKind::Functional],
        );

        assert!(enriched.len() > base.len());
        let tagged = enriched
            .iter()
            .filter(|c| c.metadata.contains_key("enrichment_type"))
            .count();
        assert_eq!(tagged, enriched.len() - base.len());
        assert!(enriched
            .iter()
            .any(|c| c.content.contains("OPERATIONAL CAPABILITIES CATALOG")));
    }

    #[test]
    fn capabilities_block_skipped_without_functional_types() {
        let enricher = ContextEnricher::new();
        let enriched = enricher.enrich(
            ArcadiaPhase::Operational,
            &[],
            &[RequirementKind::Stakeholder],
        );
        assert!(!enriched
            .iter()
            .any(|c| c.content.contains("CAPABILITIES CATALOG")));
    }

    #[test]
    fn traceability_score_rewards_known_names() {
        let enricher = ContextEnricher::new();
        let strong = enricher.validate_traceability(
            "The Mission Commander shall exercise the Mission Planning capability",
            ArcadiaPhase::Operational,
        );
        assert!(strong.is_valid);
        assert!(strong.traceability_score > 0.5);

        let weak = enricher.validate_traceability(
            "The widget shall frobnicate quickly",
            ArcadiaPhase::Operational,
        );
        assert!(!weak.is_valid);
        assert_eq!(weak.suggestions.len(), 2);
    }

    #[test]
    fn knowledge_base_is_complete() {
        let enricher = ContextEnricher::new();
        assert_eq!(enricher.capabilities().len(), 5);
        assert_eq!(enricher.actors().len(), 5);
        assert_eq!(enricher.template_links().len(), 5);
        for phase in ArcadiaPhase::EXTRACTION_PHASES {
            assert!(enricher.phase_template(phase).is_some());
        }
    }
}
