//! Physical architecture extractor: components, implementation constraints,
//! functions and scenarios. Prior-phase context summarises operational
//! capabilities, system functions and logical components and functions.

use crate::context::{
    extraction_confidence, prepare_context, request_elements, resolve_names, summarize_prior,
};
use crate::json;
use arcadia_ai::LlmProvider;
use arcadia_core::ids::element_id;
use arcadia_core::model::{
    ExtractionMetadata, ImplementationConstraint, InteractionStep, LogicalArchitecture,
    OperationalAnalysis, PhysicalArchitecture, PhysicalComponent, PhysicalFunction,
    PhysicalScenario, SystemAnalysis,
};
use arcadia_core::{ArcadiaPhase, DocumentChunk};
use chrono::Utc;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

pub struct PhysicalExtractor {
    llm: Arc<dyn LlmProvider>,
}

impl PhysicalExtractor {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    #[instrument(skip_all)]
    pub async fn extract(
        &self,
        chunks: &[DocumentChunk],
        _proposal: &str,
        operational: Option<&OperationalAnalysis>,
        system: Option<&SystemAnalysis>,
        logical: Option<&LogicalArchitecture>,
        source_documents: &[String],
        cancel: &CancellationToken,
    ) -> PhysicalArchitecture {
        let started = Utc::now();
        let start_instant = std::time::Instant::now();
        let mut metadata = ExtractionMetadata::new(source_documents.to_vec(), started);

        let context = prepare_context(chunks);
        let context_chars = context.chars().count();
        let prior = self.prior_context(operational, system, logical);

        let components = self
            .extract_components(&context, &prior, logical, cancel, &mut metadata)
            .await;
        let constraints = self
            .extract_constraints(&context, &components, cancel, &mut metadata)
            .await;
        let functions = self
            .extract_functions(&context, &components, logical, cancel, &mut metadata)
            .await;
        let scenarios = self
            .extract_scenarios(&context, &components, cancel, &mut metadata)
            .await;

        for (step, count) in [
            ("components", components.len()),
            ("constraints", constraints.len()),
            ("functions", functions.len()),
            ("scenarios", scenarios.len()),
        ] {
            metadata
                .confidence_scores
                .insert(step.to_string(), extraction_confidence(count, context_chars));
        }
        metadata.processing_seconds = start_instant.elapsed().as_secs_f64();

        info!(
            components = components.len(),
            constraints = constraints.len(),
            functions = functions.len(),
            scenarios = scenarios.len(),
            "physical architecture extraction completed"
        );

        PhysicalArchitecture {
            components,
            constraints,
            functions,
            scenarios,
            metadata,
        }
    }

    fn prior_context(
        &self,
        operational: Option<&OperationalAnalysis>,
        system: Option<&SystemAnalysis>,
        logical: Option<&LogicalArchitecture>,
    ) -> String {
        let mut prior = String::new();
        if let Some(op) = operational {
            prior.push_str(&summarize_prior(
                "OPERATIONAL CAPABILITIES",
                op.capabilities
                    .iter()
                    .map(|c| (c.name.as_str(), c.description.as_str())),
            ));
        }
        if let Some(sys) = system {
            prior.push_str(&summarize_prior(
                "SYSTEM FUNCTIONS",
                sys.functions
                    .iter()
                    .map(|f| (f.name.as_str(), f.description.as_str())),
            ));
        }
        if let Some(log) = logical {
            prior.push_str(&summarize_prior(
                "LOGICAL COMPONENTS",
                log.components
                    .iter()
                    .map(|c| (c.name.as_str(), c.description.as_str())),
            ));
            prior.push_str(&summarize_prior(
                "LOGICAL FUNCTIONS",
                log.functions
                    .iter()
                    .map(|f| (f.name.as_str(), f.description.as_str())),
            ));
        }
        prior
    }

    async fn extract_components(
        &self,
        context: &str,
        prior: &str,
        logical: Option<&LogicalArchitecture>,
        cancel: &CancellationToken,
        metadata: &mut ExtractionMetadata,
    ) -> Vec<PhysicalComponent> {
        let prompt = format!(
            r#"PHYSICAL COMPONENT EXTRACTION - ARCADIA Methodology

CONTEXT: {context}

{prior}
TASK: Extract physical components, their technology platforms and deployment configuration.

OUTPUT FORMAT (JSON):
{{
  "components": [
    {{
      "name": "Component Name",
      "description": "Component description",
      "type": "hardware|software|hybrid",
      "technology_platform": "technology or platform",
      "implemented_logical_components": ["logical component names"],
      "interfaces": ["interface names"],
      "deployment_configuration": ["deployment detail"],
      "resource_requirements": ["resource requirement"]
    }}
  ]
}}

Focus on deployable implementation elements."#,
            context = context,
            prior = prior,
        );

        let logical_candidates: Vec<(String, String)> = logical
            .map(|log| {
                log.components
                    .iter()
                    .map(|c| (c.id.clone(), c.name.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let result = request_elements(self.llm.as_ref(), &prompt, "components", cancel).await;
        let components: Vec<PhysicalComponent> = result
            .elements
            .iter()
            .filter_map(|obj| {
                let name = json::opt_str_field(obj, "name")?;
                Some((name, obj))
            })
            .enumerate()
            .map(|(i, (name, obj))| PhysicalComponent {
                id: element_id(ArcadiaPhase::Physical, "COMP", i + 1),
                name,
                description: json::str_field(obj, "description"),
                kind: json::str_field(obj, "type").parse().unwrap_or_default(),
                technology_platform: json::str_field(obj, "technology_platform"),
                implemented_logical_components: resolve_names(
                    &json::str_list(obj, "implemented_logical_components"),
                    &logical_candidates,
                ),
                interfaces: json::str_list(obj, "interfaces"),
                deployment_configuration: json::str_list(obj, "deployment_configuration"),
                resource_requirements: json::str_list(obj, "resource_requirements"),
            })
            .collect();

        metadata.record("components", result.status, 0.0, components.len() as u64);
        components
    }

    async fn extract_constraints(
        &self,
        context: &str,
        components: &[PhysicalComponent],
        cancel: &CancellationToken,
        metadata: &mut ExtractionMetadata,
    ) -> Vec<ImplementationConstraint> {
        let component_names: Vec<&str> =
            components.iter().take(5).map(|c| c.name.as_str()).collect();
        let prompt = format!(
            r#"IMPLEMENTATION CONSTRAINT EXTRACTION - ARCADIA Methodology

CONTEXT: {context}

KNOWN PHYSICAL COMPONENTS: {components}

TASK: Extract implementation constraints affecting the physical architecture.

OUTPUT FORMAT (JSON):
{{
  "constraints": [
    {{
      "name": "Constraint Name",
      "description": "Constraint description",
      "type": "technology|performance|environmental|safety|security|regulatory",
      "affected_components": ["component names"],
      "specifications": ["specification"],
      "validation_criteria": ["criterion"]
    }}
  ]
}}

Focus on constraints that shape technology and deployment choices."#,
            context = context,
            components = component_names.join(", "),
        );

        let candidates: Vec<(String, String)> = components
            .iter()
            .map(|c| (c.id.clone(), c.name.clone()))
            .collect();

        let result = request_elements(self.llm.as_ref(), &prompt, "constraints", cancel).await;
        let constraints: Vec<ImplementationConstraint> = result
            .elements
            .iter()
            .filter_map(|obj| {
                let name = json::opt_str_field(obj, "name")?;
                Some((name, obj))
            })
            .enumerate()
            .map(|(i, (name, obj))| ImplementationConstraint {
                id: element_id(ArcadiaPhase::Physical, "CONST", i + 1),
                name,
                description: json::str_field(obj, "description"),
                kind: json::str_field(obj, "type").parse().unwrap_or_default(),
                affected_components: resolve_names(
                    &json::str_list(obj, "affected_components"),
                    &candidates,
                ),
                specifications: json::str_list(obj, "specifications"),
                validation_criteria: json::str_list(obj, "validation_criteria"),
            })
            .collect();

        metadata.record("constraints", result.status, 0.0, constraints.len() as u64);
        constraints
    }

    async fn extract_functions(
        &self,
        context: &str,
        components: &[PhysicalComponent],
        logical: Option<&LogicalArchitecture>,
        cancel: &CancellationToken,
        metadata: &mut ExtractionMetadata,
    ) -> Vec<PhysicalFunction> {
        let component_names: Vec<&str> =
            components.iter().take(5).map(|c| c.name.as_str()).collect();
        let prompt = format!(
            r#"PHYSICAL FUNCTION EXTRACTION - ARCADIA Methodology

CONTEXT: {context}

KNOWN PHYSICAL COMPONENTS: {components}

TASK: Extract physical functions with their technology specifics.

OUTPUT FORMAT (JSON):
{{
  "functions": [
    {{
      "name": "Function Name",
      "description": "Function description",
      "implemented_logical_functions": ["logical function names"],
      "technology_specifics": ["technology detail"],
      "input_interfaces": ["input spec"],
      "output_interfaces": ["output spec"],
      "allocated_components": ["component names"]
    }}
  ]
}}

Focus on functions realised with concrete technology."#,
            context = context,
            components = component_names.join(", "),
        );

        let component_candidates: Vec<(String, String)> = components
            .iter()
            .map(|c| (c.id.clone(), c.name.clone()))
            .collect();
        let logical_function_candidates: Vec<(String, String)> = logical
            .map(|log| {
                log.functions
                    .iter()
                    .map(|f| (f.id.clone(), f.name.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let result = request_elements(self.llm.as_ref(), &prompt, "functions", cancel).await;
        let functions: Vec<PhysicalFunction> = result
            .elements
            .iter()
            .filter_map(|obj| {
                let name = json::opt_str_field(obj, "name")?;
                Some((name, obj))
            })
            .enumerate()
            .map(|(i, (name, obj))| PhysicalFunction {
                id: element_id(ArcadiaPhase::Physical, "FUNC", i + 1),
                name,
                description: json::str_field(obj, "description"),
                implemented_logical_functions: resolve_names(
                    &json::str_list(obj, "implemented_logical_functions"),
                    &logical_function_candidates,
                ),
                technology_specifics: json::str_list(obj, "technology_specifics"),
                input_interfaces: json::str_list(obj, "input_interfaces"),
                output_interfaces: json::str_list(obj, "output_interfaces"),
                allocated_components: resolve_names(
                    &json::str_list(obj, "allocated_components"),
                    &component_candidates,
                ),
            })
            .collect();

        metadata.record("functions", result.status, 0.0, functions.len() as u64);
        functions
    }

    async fn extract_scenarios(
        &self,
        context: &str,
        components: &[PhysicalComponent],
        cancel: &CancellationToken,
        metadata: &mut ExtractionMetadata,
    ) -> Vec<PhysicalScenario> {
        let component_names: Vec<&str> =
            components.iter().take(5).map(|c| c.name.as_str()).collect();
        let prompt = format!(
            r#"PHYSICAL SCENARIO EXTRACTION - ARCADIA Methodology

CONTEXT: {context}

KNOWN PHYSICAL COMPONENTS: {components}

TASK: Extract deployment-level scenarios with interaction sequences.

OUTPUT FORMAT (JSON):
{{
  "scenarios": [
    {{
      "name": "Scenario Name",
      "description": "Scenario description",
      "type": "deployment|operation|failover",
      "involved_components": ["component names"],
      "interaction_sequence": [
        {{"step": 1, "from": "source component", "to": "target component", "interaction": "what happens", "data": ["data item"]}}
      ],
      "technology_constraints": ["constraint"],
      "realized_logical_scenarios": ["logical scenario names"]
    }}
  ]
}}

Focus on how the deployed system behaves."#,
            context = context,
            components = component_names.join(", "),
        );

        let candidates: Vec<(String, String)> = components
            .iter()
            .map(|c| (c.id.clone(), c.name.clone()))
            .collect();

        let result = request_elements(self.llm.as_ref(), &prompt, "scenarios", cancel).await;
        let scenarios: Vec<PhysicalScenario> = result
            .elements
            .iter()
            .filter_map(|obj| {
                let name = json::opt_str_field(obj, "name")?;
                Some((name, obj))
            })
            .enumerate()
            .map(|(i, (name, obj))| {
                let interaction_sequence = json::nested_objects(obj, "interaction_sequence")
                    .iter()
                    .enumerate()
                    .map(|(step_index, step)| InteractionStep {
                        order: json::usize_field(step, "step", step_index + 1),
                        from_element: json::str_field(step, "from"),
                        to_element: json::str_field(step, "to"),
                        interaction: json::str_field(step, "interaction"),
                        data: json::str_list(step, "data"),
                    })
                    .collect();

                let kind = json::str_field(obj, "type");
                PhysicalScenario {
                    id: element_id(ArcadiaPhase::Physical, "SCEN", i + 1),
                    name,
                    description: json::str_field(obj, "description"),
                    scenario_kind: if kind.is_empty() {
                        "deployment".to_string()
                    } else {
                        kind
                    },
                    involved_components: resolve_names(
                        &json::str_list(obj, "involved_components"),
                        &candidates,
                    ),
                    interaction_sequence,
                    technology_constraints: json::str_list(obj, "technology_constraints"),
                    realized_logical_scenarios: json::str_list(obj, "realized_logical_scenarios"),
                }
            })
            .collect();

        metadata.record("scenarios", result.status, 0.0, scenarios.len() as u64);
        scenarios
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcadia_ai::StubProvider;

    #[tokio::test]
    async fn components_resolve_logical_implementations() {
        let stub = StubProvider::new();
        stub.push_response(
            r#"{"components": [
                {"name": "Edge Node", "type": "hardware", "technology_platform": "ARM",
                 "implemented_logical_components": ["Data Manager"]}
            ]}"#,
        );
        stub.push_response(
            r#"{"constraints": [
                {"name": "Power Budget", "type": "environmental",
                 "affected_components": ["Edge Node"]}
            ]}"#,
        );
        stub.push_response(r#"{"functions": []}"#);
        stub.push_response(r#"{"scenarios": []}"#);

        let logical = LogicalArchitecture {
            components: vec![arcadia_core::model::LogicalComponent {
                id: "LA-COMP-001".to_string(),
                name: "Data Manager".to_string(),
                description: String::new(),
                kind: Default::default(),
                responsibilities: vec![],
                parent: None,
                sub_components: vec![],
                interfaces: vec![],
                allocated_functions: vec![],
            }],
            functions: vec![],
            interfaces: vec![],
            scenarios: vec![],
            metadata: ExtractionMetadata::new(vec![], Utc::now()),
        };

        let extractor = PhysicalExtractor::new(Arc::new(stub));
        let cancel = CancellationToken::new();
        let chunks = vec![DocumentChunk::new(
            "chunk-0",
            "hardware deployment",
            "proposal",
            0,
            ArcadiaPhase::Physical,
        )];
        let output = extractor
            .extract(
                &chunks,
                "proposal",
                None,
                None,
                Some(&logical),
                &["proposal".to_string()],
                &cancel,
            )
            .await;

        assert_eq!(output.components.len(), 1);
        assert_eq!(output.components[0].id, "PA-COMP-001");
        assert_eq!(
            output.components[0].implemented_logical_components,
            vec!["LA-COMP-001"]
        );
        assert_eq!(output.constraints[0].id, "PA-CONST-001");
        assert_eq!(output.constraints[0].affected_components, vec!["PA-COMP-001"]);
    }
}
