//! Operational analysis extractor: actors, entities, capabilities, scenarios
//! and processes, in that order. Later sub-extractions receive the extracted
//! actors so involved-actor names resolve to ids.

use crate::context::{
    chunk_references, extraction_confidence, prepare_context, request_elements, resolve_names,
    truncate, PROPOSAL_CHARS,
};
use crate::json;
use arcadia_ai::LlmProvider;
use arcadia_core::ids::element_id;
use arcadia_core::model::{
    ActivityStep, EntityKind, ExtractionMetadata, OperationalActor, OperationalAnalysis,
    OperationalCapability, OperationalEntity, OperationalProcess, OperationalScenario,
    ProcessActivity,
};
use arcadia_core::{ArcadiaPhase, DocumentChunk};
use chrono::Utc;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

pub struct OperationalExtractor {
    llm: Arc<dyn LlmProvider>,
}

impl OperationalExtractor {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    #[instrument(skip_all)]
    pub async fn extract(
        &self,
        chunks: &[DocumentChunk],
        proposal: &str,
        source_documents: &[String],
        cancel: &CancellationToken,
    ) -> OperationalAnalysis {
        let started = Utc::now();
        let start_instant = std::time::Instant::now();
        let mut metadata = ExtractionMetadata::new(source_documents.to_vec(), started);

        let context = prepare_context(chunks);
        let context_chars = context.chars().count();
        let references = chunk_references(chunks);

        let actors = self
            .extract_actors(&context, proposal, &references, cancel, &mut metadata)
            .await;
        let entities = self
            .extract_entities(&context, proposal, cancel, &mut metadata)
            .await;
        let capabilities = self
            .extract_capabilities(&context, &actors, cancel, &mut metadata)
            .await;
        let scenarios = self
            .extract_scenarios(&context, &actors, cancel, &mut metadata)
            .await;
        let processes = self
            .extract_processes(&context, &actors, cancel, &mut metadata)
            .await;

        for (step, count) in [
            ("actors", actors.len()),
            ("entities", entities.len()),
            ("capabilities", capabilities.len()),
            ("scenarios", scenarios.len()),
            ("processes", processes.len()),
        ] {
            let confidence = extraction_confidence(count, context_chars);
            metadata
                .confidence_scores
                .insert(step.to_string(), confidence);
        }
        metadata.processing_seconds = start_instant.elapsed().as_secs_f64();

        info!(
            actors = actors.len(),
            capabilities = capabilities.len(),
            scenarios = scenarios.len(),
            processes = processes.len(),
            "operational analysis extraction completed"
        );

        OperationalAnalysis {
            actors,
            entities,
            capabilities,
            scenarios,
            processes,
            metadata,
        }
    }

    async fn extract_actors(
        &self,
        context: &str,
        proposal: &str,
        references: &[String],
        cancel: &CancellationToken,
        metadata: &mut ExtractionMetadata,
    ) -> Vec<OperationalActor> {
        let prompt = format!(
            r#"OPERATIONAL ACTOR EXTRACTION - ARCADIA Methodology

Extract operational actors and stakeholders from this technical documentation.

CONTEXT: {context}

PROPOSAL: {proposal}

TASK: Identify all operational actors, stakeholders, users, and organizational entities.

OUTPUT FORMAT (JSON):
{{
  "actors": [
    {{
      "name": "Actor Name",
      "description": "Actor description",
      "role_definition": "Primary role",
      "responsibilities": ["responsibility 1", "responsibility 2"],
      "capabilities": ["capability 1", "capability 2"]
    }}
  ]
}}

Focus on operational-level actors who interact with the system."#,
            context = context,
            proposal = truncate(proposal, PROPOSAL_CHARS),
        );

        let result = request_elements(self.llm.as_ref(), &prompt, "actors", cancel).await;
        let actors: Vec<OperationalActor> = result
            .elements
            .iter()
            .filter_map(|obj| {
                let name = json::opt_str_field(obj, "name")?;
                Some((name, obj))
            })
            .enumerate()
            .map(|(i, (name, obj))| OperationalActor {
                id: element_id(ArcadiaPhase::Operational, "ACTOR", i + 1),
                name,
                description: json::str_field(obj, "description"),
                role_definition: json::str_field(obj, "role_definition"),
                responsibilities: json::str_list(obj, "responsibilities"),
                capabilities: json::str_list(obj, "capabilities"),
                source_references: references.to_vec(),
            })
            .collect();

        metadata.record("actors", result.status, 0.0, actors.len() as u64);
        actors
    }

    async fn extract_entities(
        &self,
        context: &str,
        proposal: &str,
        cancel: &CancellationToken,
        metadata: &mut ExtractionMetadata,
    ) -> Vec<OperationalEntity> {
        let prompt = format!(
            r#"OPERATIONAL ENTITY EXTRACTION - ARCADIA Methodology

CONTEXT: {context}

PROPOSAL: {proposal}

TASK: Extract operational entities (systems, organizations, resources) and their roles.

OUTPUT FORMAT (JSON):
{{
  "entities": [
    {{
      "name": "Entity Name",
      "description": "Detailed description",
      "type": "system|organization|resource|other"
    }}
  ]
}}

Focus on operational-level entities that support mission objectives."#,
            context = context,
            proposal = truncate(proposal, PROPOSAL_CHARS),
        );

        let result = request_elements(self.llm.as_ref(), &prompt, "entities", cancel).await;
        let entities: Vec<OperationalEntity> = result
            .elements
            .iter()
            .filter_map(|obj| {
                let name = json::opt_str_field(obj, "name")?;
                Some((name, obj))
            })
            .enumerate()
            .map(|(i, (name, obj))| OperationalEntity {
                id: element_id(ArcadiaPhase::Operational, "ENTITY", i + 1),
                name,
                description: json::str_field(obj, "description"),
                kind: parse_entity_kind(&json::str_field(obj, "type")),
            })
            .collect();

        metadata.record("entities", result.status, 0.0, entities.len() as u64);
        entities
    }

    async fn extract_capabilities(
        &self,
        context: &str,
        actors: &[OperationalActor],
        cancel: &CancellationToken,
        metadata: &mut ExtractionMetadata,
    ) -> Vec<OperationalCapability> {
        let actor_names: Vec<&str> = actors.iter().take(5).map(|a| a.name.as_str()).collect();
        let prompt = format!(
            r#"OPERATIONAL CAPABILITY EXTRACTION - ARCADIA Methodology

Extract operational capabilities from this documentation.

CONTEXT: {context}

KNOWN ACTORS: {actors}

TASK: Extract operational capabilities, mission objectives, and capability-actor relationships.

OUTPUT FORMAT (JSON):
{{
  "capabilities": [
    {{
      "name": "Capability Name",
      "description": "Capability description",
      "mission_statement": "Mission objective this supports",
      "involved_actors": ["actor names"],
      "performance_constraints": ["constraint 1", "constraint 2"]
    }}
  ]
}}

Focus on high-level operational capabilities."#,
            context = context,
            actors = actor_names.join(", "),
        );

        let candidates: Vec<(String, String)> = actors
            .iter()
            .map(|a| (a.id.clone(), a.name.clone()))
            .collect();

        let result = request_elements(self.llm.as_ref(), &prompt, "capabilities", cancel).await;
        let capabilities: Vec<OperationalCapability> = result
            .elements
            .iter()
            .filter_map(|obj| {
                let name = json::opt_str_field(obj, "name")?;
                Some((name, obj))
            })
            .enumerate()
            .map(|(i, (name, obj))| OperationalCapability {
                id: element_id(ArcadiaPhase::Operational, "CAPABILITY", i + 1),
                name,
                description: json::str_field(obj, "description"),
                mission_statement: json::str_field(obj, "mission_statement"),
                involved_actors: resolve_names(&json::str_list(obj, "involved_actors"), &candidates),
                performance_constraints: json::str_list(obj, "performance_constraints"),
            })
            .collect();

        metadata.record("capabilities", result.status, 0.0, capabilities.len() as u64);
        capabilities
    }

    async fn extract_scenarios(
        &self,
        context: &str,
        actors: &[OperationalActor],
        cancel: &CancellationToken,
        metadata: &mut ExtractionMetadata,
    ) -> Vec<OperationalScenario> {
        let actor_names: Vec<&str> = actors.iter().take(5).map(|a| a.name.as_str()).collect();
        let prompt = format!(
            r#"OPERATIONAL SCENARIO EXTRACTION - ARCADIA Methodology

CONTEXT: {context}

KNOWN ACTORS: {actors}

TASK: Extract operational scenarios, use cases, and workflows with their activity sequences.

OUTPUT FORMAT (JSON):
{{
  "scenarios": [
    {{
      "name": "Scenario Name",
      "description": "Detailed scenario description",
      "type": "use_case|mission_scenario|workflow",
      "involved_actors": ["actor names"],
      "activity_sequence": [
        {{"step": 1, "activity": "activity description", "actor": "responsible actor"}}
      ],
      "environmental_conditions": ["condition 1"],
      "performance_constraints": ["constraint 1"]
    }}
  ]
}}

Focus on end-to-end operational scenarios."#,
            context = context,
            actors = actor_names.join(", "),
        );

        let candidates: Vec<(String, String)> = actors
            .iter()
            .map(|a| (a.id.clone(), a.name.clone()))
            .collect();

        let result = request_elements(self.llm.as_ref(), &prompt, "scenarios", cancel).await;
        let scenarios: Vec<OperationalScenario> = result
            .elements
            .iter()
            .filter_map(|obj| {
                let name = json::opt_str_field(obj, "name")?;
                Some((name, obj))
            })
            .enumerate()
            .map(|(i, (name, obj))| {
                let activity_sequence = json::nested_objects(obj, "activity_sequence")
                    .iter()
                    .enumerate()
                    .map(|(step_index, step)| ActivityStep {
                        step: json::usize_field(step, "step", step_index + 1),
                        activity: json::str_field(step, "activity"),
                        actor: json::str_field(step, "actor"),
                    })
                    .collect();

                let kind = json::str_field(obj, "type");
                OperationalScenario {
                    id: element_id(ArcadiaPhase::Operational, "SCENARIO", i + 1),
                    name,
                    description: json::str_field(obj, "description"),
                    scenario_kind: if kind.is_empty() {
                        "use_case".to_string()
                    } else {
                        kind
                    },
                    involved_actors: resolve_names(
                        &json::str_list(obj, "involved_actors"),
                        &candidates,
                    ),
                    activity_sequence,
                    environmental_conditions: json::str_list(obj, "environmental_conditions"),
                    performance_constraints: json::str_list(obj, "performance_constraints"),
                }
            })
            .collect();

        metadata.record("scenarios", result.status, 0.0, scenarios.len() as u64);
        scenarios
    }

    async fn extract_processes(
        &self,
        context: &str,
        actors: &[OperationalActor],
        cancel: &CancellationToken,
        metadata: &mut ExtractionMetadata,
    ) -> Vec<OperationalProcess> {
        let actor_names: Vec<&str> = actors.iter().take(5).map(|a| a.name.as_str()).collect();
        let prompt = format!(
            r#"OPERATIONAL PROCESS EXTRACTION - ARCADIA Methodology

CONTEXT: {context}

KNOWN ACTORS: {actors}

TASK: Extract operational processes and activity chains.

OUTPUT FORMAT (JSON):
{{
  "processes": [
    {{
      "name": "Process Name",
      "description": "Detailed process description",
      "activity_chain": [
        {{"activity": "activity name", "description": "what happens", "triggers": ["trigger conditions"]}}
      ],
      "reusable_patterns": ["pattern names"]
    }}
  ]
}}

Focus on operational processes that support capabilities."#,
            context = context,
            actors = actor_names.join(", "),
        );

        let result = request_elements(self.llm.as_ref(), &prompt, "processes", cancel).await;
        let processes: Vec<OperationalProcess> = result
            .elements
            .iter()
            .filter_map(|obj| {
                let name = json::opt_str_field(obj, "name")?;
                Some((name, obj))
            })
            .enumerate()
            .map(|(i, (name, obj))| {
                let activity_chain = json::nested_objects(obj, "activity_chain")
                    .iter()
                    .map(|step| ProcessActivity {
                        name: json::str_field(step, "activity"),
                        description: json::str_field(step, "description"),
                        triggers: json::str_list(step, "triggers"),
                    })
                    .collect();

                OperationalProcess {
                    id: element_id(ArcadiaPhase::Operational, "PROCESS", i + 1),
                    name,
                    description: json::str_field(obj, "description"),
                    activity_chain,
                    reusable_patterns: json::str_list(obj, "reusable_patterns"),
                }
            })
            .collect();

        metadata.record("processes", result.status, 0.0, processes.len() as u64);
        processes
    }
}

fn parse_entity_kind(raw: &str) -> EntityKind {
    match raw.trim().to_lowercase().as_str() {
        "organization" => EntityKind::Organization,
        "resource" => EntityKind::Resource,
        "other" => EntityKind::Other,
        _ => EntityKind::System,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcadia_core::model::ExtractionStatus;
    use arcadia_ai::StubProvider;

    fn chunks() -> Vec<DocumentChunk> {
        vec![DocumentChunk::new(
            "chunk-0",
            "The Mission Commander coordinates with the Operations Center.",
            "proposal",
            0,
            ArcadiaPhase::Operational,
        )]
    }

    #[tokio::test]
    async fn extracts_actors_and_resolves_capability_references() {
        let stub = StubProvider::new();
        stub.push_response(
            r#"{"actors": [
                {"name": "Mission Commander", "description": "Oversees missions",
                 "role_definition": "Command", "responsibilities": ["planning"],
                 "capabilities": ["decision making"]},
                {"name": "Operations Center", "description": "Coordinates activities",
                 "role_definition": "Coordination", "responsibilities": [], "capabilities": []}
            ]}"#,
        );
        stub.push_response(r#"{"entities": []}"#);
        stub.push_response(
            r#"{"capabilities": [
                {"name": "Mission Planning", "description": "Plan missions",
                 "mission_statement": "Plan and execute missions",
                 "involved_actors": ["Mission Commander", "Nobody Known"],
                 "performance_constraints": ["within 4 hours"]}
            ]}"#,
        );
        stub.push_response(r#"{"scenarios": []}"#);
        stub.push_response(r#"{"processes": []}"#);

        let extractor = OperationalExtractor::new(Arc::new(stub));
        let cancel = CancellationToken::new();
        let output = extractor
            .extract(&chunks(), "proposal text", &["proposal".to_string()], &cancel)
            .await;

        assert_eq!(output.actors.len(), 2);
        assert_eq!(output.actors[0].id, "OA-ACTOR-001");
        assert_eq!(output.actors[0].source_references, vec!["chunk-0"]);

        assert_eq!(output.capabilities.len(), 1);
        assert_eq!(output.capabilities[0].id, "OA-CAPABILITY-001");
        // Unknown actor names are dropped during resolution.
        assert_eq!(output.capabilities[0].involved_actors, vec!["OA-ACTOR-001"]);

        assert_eq!(
            output.metadata.statuses.get("actors"),
            Some(&ExtractionStatus::Ok)
        );
    }

    #[tokio::test]
    async fn malformed_response_yields_empty_step_not_failure() {
        let stub = StubProvider::with_fallback("not json at all");
        let extractor = OperationalExtractor::new(Arc::new(stub));
        let cancel = CancellationToken::new();
        let output = extractor
            .extract(&chunks(), "proposal", &["proposal".to_string()], &cancel)
            .await;

        assert!(output.actors.is_empty());
        assert!(output.capabilities.is_empty());
        assert_eq!(
            output.metadata.statuses.get("actors"),
            Some(&ExtractionStatus::MalformedOutput)
        );
        // Confidence reflects the empty extraction.
        assert!(output.metadata.confidence_scores["actors"] < 0.5);
    }

    #[tokio::test]
    async fn elements_without_names_are_skipped() {
        let stub = StubProvider::new();
        stub.push_response(
            r#"{"actors": [{"description": "nameless"}, {"name": "Operator"}]}"#,
        );
        let extractor = OperationalExtractor::new(Arc::new(stub));
        let cancel = CancellationToken::new();
        let output = extractor
            .extract(&chunks(), "proposal", &["proposal".to_string()], &cancel)
            .await;

        assert_eq!(output.actors.len(), 1);
        assert_eq!(output.actors[0].name, "Operator");
    }
}
