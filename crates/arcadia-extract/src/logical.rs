//! Logical architecture extractor: components, functions, interfaces and
//! scenarios. Prior-phase context summarises operational actors and
//! capabilities plus system functions and capabilities.

use crate::context::{
    extraction_confidence, prepare_context, request_elements, resolve_names, summarize_prior,
};
use crate::json;
use arcadia_ai::LlmProvider;
use arcadia_core::ids::element_id;
use arcadia_core::model::{
    ExtractionMetadata, InteractionStep, LogicalArchitecture, LogicalComponent, LogicalFunction,
    LogicalInterface, LogicalScenario, OperationalAnalysis, SystemAnalysis,
};
use arcadia_core::{ArcadiaPhase, DocumentChunk};
use chrono::Utc;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

pub struct LogicalExtractor {
    llm: Arc<dyn LlmProvider>,
}

impl LogicalExtractor {
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
        source_documents: &[String],
        cancel: &CancellationToken,
    ) -> LogicalArchitecture {
        let started = Utc::now();
        let start_instant = std::time::Instant::now();
        let mut metadata = ExtractionMetadata::new(source_documents.to_vec(), started);

        let context = prepare_context(chunks);
        let context_chars = context.chars().count();
        let prior = self.prior_context(operational, system);

        let components = self
            .extract_components(&context, &prior, cancel, &mut metadata)
            .await;
        let functions = self
            .extract_functions(&context, &components, system, cancel, &mut metadata)
            .await;
        let interfaces = self
            .extract_interfaces(&context, &components, cancel, &mut metadata)
            .await;
        let scenarios = self
            .extract_scenarios(&context, &components, &functions, cancel, &mut metadata)
            .await;

        for (step, count) in [
            ("components", components.len()),
            ("functions", functions.len()),
            ("interfaces", interfaces.len()),
            ("scenarios", scenarios.len()),
        ] {
            metadata
                .confidence_scores
                .insert(step.to_string(), extraction_confidence(count, context_chars));
        }
        metadata.processing_seconds = start_instant.elapsed().as_secs_f64();

        info!(
            components = components.len(),
            functions = functions.len(),
            interfaces = interfaces.len(),
            scenarios = scenarios.len(),
            "logical architecture extraction completed"
        );

        LogicalArchitecture {
            components,
            functions,
            interfaces,
            scenarios,
            metadata,
        }
    }

    fn prior_context(
        &self,
        operational: Option<&OperationalAnalysis>,
        system: Option<&SystemAnalysis>,
    ) -> String {
        let mut prior = String::new();
        if let Some(op) = operational {
            prior.push_str(&summarize_prior(
                "OPERATIONAL ACTORS",
                op.actors
                    .iter()
                    .map(|a| (a.name.as_str(), a.description.as_str())),
            ));
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
            prior.push_str(&summarize_prior(
                "SYSTEM CAPABILITIES",
                sys.capabilities
                    .iter()
                    .map(|c| (c.name.as_str(), c.description.as_str())),
            ));
        }
        prior
    }

    async fn extract_components(
        &self,
        context: &str,
        prior: &str,
        cancel: &CancellationToken,
        metadata: &mut ExtractionMetadata,
    ) -> Vec<LogicalComponent> {
        let prompt = format!(
            r#"LOGICAL COMPONENT EXTRACTION - ARCADIA Methodology

CONTEXT: {context}

{prior}
TASK: Extract logical components forming the solution breakdown.

OUTPUT FORMAT (JSON):
{{
  "components": [
    {{
      "name": "Component Name",
      "description": "Component description",
      "type": "subsystem|module|service",
      "responsibilities": ["responsibility 1"],
      "parent": "parent component name if any",
      "sub_components": ["sub-component names"],
      "allocated_functions": ["function names"]
    }}
  ]
}}

Focus on a coarse-grained breakdown suitable for development structuring."#,
            context = context,
            prior = prior,
        );

        let result = request_elements(self.llm.as_ref(), &prompt, "components", cancel).await;
        let components: Vec<LogicalComponent> = result
            .elements
            .iter()
            .filter_map(|obj| {
                let name = json::opt_str_field(obj, "name")?;
                Some((name, obj))
            })
            .enumerate()
            .map(|(i, (name, obj))| LogicalComponent {
                id: element_id(ArcadiaPhase::Logical, "COMP", i + 1),
                name,
                description: json::str_field(obj, "description"),
                kind: json::str_field(obj, "type").parse().unwrap_or_default(),
                responsibilities: json::str_list(obj, "responsibilities"),
                parent: json::opt_str_field(obj, "parent"),
                sub_components: json::str_list(obj, "sub_components"),
                interfaces: Vec::new(),
                allocated_functions: json::str_list(obj, "allocated_functions"),
            })
            .collect();

        metadata.record("components", result.status, 0.0, components.len() as u64);
        components
    }

    async fn extract_functions(
        &self,
        context: &str,
        components: &[LogicalComponent],
        system: Option<&SystemAnalysis>,
        cancel: &CancellationToken,
        metadata: &mut ExtractionMetadata,
    ) -> Vec<LogicalFunction> {
        let component_names: Vec<&str> =
            components.iter().take(5).map(|c| c.name.as_str()).collect();
        let prompt = format!(
            r#"LOGICAL FUNCTION EXTRACTION - ARCADIA Methodology

CONTEXT: {context}

KNOWN LOGICAL COMPONENTS: {components}

TASK: Extract logical functions, their component allocations and interface specifications.

OUTPUT FORMAT (JSON):
{{
  "functions": [
    {{
      "name": "Function Name",
      "description": "Function description",
      "parent_system_function": "system function name if refined from one",
      "sub_functions": ["sub-function names"],
      "input_interfaces": ["input spec"],
      "output_interfaces": ["output spec"],
      "behavioral_specifications": ["behaviour description"],
      "allocated_components": ["component names"]
    }}
  ]
}}

Focus on functions allocated to logical components."#,
            context = context,
            components = component_names.join(", "),
        );

        let component_candidates: Vec<(String, String)> = components
            .iter()
            .map(|c| (c.id.clone(), c.name.clone()))
            .collect();
        let system_function_candidates: Vec<(String, String)> = system
            .map(|sys| {
                sys.functions
                    .iter()
                    .map(|f| (f.id.clone(), f.name.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let result = request_elements(self.llm.as_ref(), &prompt, "functions", cancel).await;
        let functions: Vec<LogicalFunction> = result
            .elements
            .iter()
            .filter_map(|obj| {
                let name = json::opt_str_field(obj, "name")?;
                Some((name, obj))
            })
            .enumerate()
            .map(|(i, (name, obj))| {
                let parent_system_function =
                    json::opt_str_field(obj, "parent_system_function").and_then(|raw| {
                        resolve_names(std::slice::from_ref(&raw), &system_function_candidates)
                            .into_iter()
                            .next()
                    });
                LogicalFunction {
                    id: element_id(ArcadiaPhase::Logical, "FUNC", i + 1),
                    name,
                    description: json::str_field(obj, "description"),
                    parent_system_function,
                    sub_functions: json::str_list(obj, "sub_functions"),
                    input_interfaces: json::str_list(obj, "input_interfaces"),
                    output_interfaces: json::str_list(obj, "output_interfaces"),
                    behavioral_specifications: json::str_list(obj, "behavioral_specifications"),
                    allocated_components: resolve_names(
                        &json::str_list(obj, "allocated_components"),
                        &component_candidates,
                    ),
                }
            })
            .collect();

        metadata.record("functions", result.status, 0.0, functions.len() as u64);
        functions
    }

    async fn extract_interfaces(
        &self,
        context: &str,
        components: &[LogicalComponent],
        cancel: &CancellationToken,
        metadata: &mut ExtractionMetadata,
    ) -> Vec<LogicalInterface> {
        let component_names: Vec<&str> =
            components.iter().take(5).map(|c| c.name.as_str()).collect();
        let prompt = format!(
            r#"LOGICAL INTERFACE EXTRACTION - ARCADIA Methodology

CONTEXT: {context}

KNOWN LOGICAL COMPONENTS: {components}

TASK: Extract interfaces between logical components.

OUTPUT FORMAT (JSON):
{{
  "interfaces": [
    {{
      "name": "Interface Name",
      "description": "Interface description",
      "type": "data|control|user|external|service|api",
      "provider_component": "component providing the interface",
      "consumer_components": ["component names"],
      "data_specifications": ["data spec"],
      "protocol_specifications": ["protocol spec"],
      "quality_attributes": ["quality attribute"],
      "supported_system_interfaces": ["system interface names"]
    }}
  ]
}}

Focus on exchanges between the known components."#,
            context = context,
            components = component_names.join(", "),
        );

        let candidates: Vec<(String, String)> = components
            .iter()
            .map(|c| (c.id.clone(), c.name.clone()))
            .collect();

        let result = request_elements(self.llm.as_ref(), &prompt, "interfaces", cancel).await;
        let interfaces: Vec<LogicalInterface> = result
            .elements
            .iter()
            .filter_map(|obj| {
                let name = json::opt_str_field(obj, "name")?;
                Some((name, obj))
            })
            .enumerate()
            .map(|(i, (name, obj))| {
                let provider_raw = json::str_field(obj, "provider_component");
                let provider_component =
                    resolve_names(std::slice::from_ref(&provider_raw), &candidates)
                        .into_iter()
                        .next()
                        .unwrap_or(provider_raw);
                LogicalInterface {
                    id: element_id(ArcadiaPhase::Logical, "INTF", i + 1),
                    name,
                    description: json::str_field(obj, "description"),
                    kind: json::str_field(obj, "type").parse().unwrap_or_default(),
                    provider_component,
                    consumer_components: resolve_names(
                        &json::str_list(obj, "consumer_components"),
                        &candidates,
                    ),
                    data_specifications: json::str_list(obj, "data_specifications"),
                    protocol_specifications: json::str_list(obj, "protocol_specifications"),
                    quality_attributes: json::str_list(obj, "quality_attributes"),
                    supported_system_interfaces: json::str_list(obj, "supported_system_interfaces"),
                }
            })
            .collect();

        metadata.record("interfaces", result.status, 0.0, interfaces.len() as u64);
        interfaces
    }

    async fn extract_scenarios(
        &self,
        context: &str,
        components: &[LogicalComponent],
        functions: &[LogicalFunction],
        cancel: &CancellationToken,
        metadata: &mut ExtractionMetadata,
    ) -> Vec<LogicalScenario> {
        let component_names: Vec<&str> =
            components.iter().take(5).map(|c| c.name.as_str()).collect();
        let function_names: Vec<&str> =
            functions.iter().take(5).map(|f| f.name.as_str()).collect();
        let prompt = format!(
            r#"LOGICAL SCENARIO EXTRACTION - ARCADIA Methodology

CONTEXT: {context}

KNOWN COMPONENTS: {components}
KNOWN FUNCTIONS: {functions}

TASK: Extract component-level scenarios with interaction sequences and data flows.

OUTPUT FORMAT (JSON):
{{
  "scenarios": [
    {{
      "name": "Scenario Name",
      "description": "Scenario description",
      "type": "functional|interaction|error_handling",
      "involved_components": ["component names"],
      "involved_functions": ["function names"],
      "interaction_sequence": [
        {{"step": 1, "from": "source component", "to": "target component", "interaction": "what is exchanged", "data": ["data item"]}}
      ],
      "data_flows": ["flow description"],
      "performance_characteristics": ["characteristic"],
      "realized_operational_scenarios": ["operational scenario names"]
    }}
  ]
}}

Focus on end-to-end interactions between the known components."#,
            context = context,
            components = component_names.join(", "),
            functions = function_names.join(", "),
        );

        let component_candidates: Vec<(String, String)> = components
            .iter()
            .map(|c| (c.id.clone(), c.name.clone()))
            .collect();
        let function_candidates: Vec<(String, String)> = functions
            .iter()
            .map(|f| (f.id.clone(), f.name.clone()))
            .collect();

        let result = request_elements(self.llm.as_ref(), &prompt, "scenarios", cancel).await;
        let scenarios: Vec<LogicalScenario> = result
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
                LogicalScenario {
                    id: element_id(ArcadiaPhase::Logical, "SCEN", i + 1),
                    name,
                    description: json::str_field(obj, "description"),
                    scenario_kind: if kind.is_empty() {
                        "functional".to_string()
                    } else {
                        kind
                    },
                    involved_components: resolve_names(
                        &json::str_list(obj, "involved_components"),
                        &component_candidates,
                    ),
                    involved_functions: resolve_names(
                        &json::str_list(obj, "involved_functions"),
                        &function_candidates,
                    ),
                    interaction_sequence,
                    data_flows: json::str_list(obj, "data_flows"),
                    performance_characteristics: json::str_list(obj, "performance_characteristics"),
                    realized_operational_scenarios: json::str_list(
                        obj,
                        "realized_operational_scenarios",
                    ),
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
    async fn components_then_functions_resolve_allocations() {
        let stub = StubProvider::new();
        stub.push_response(
            r#"{"components": [
                {"name": "Data Manager", "type": "service", "responsibilities": ["store data"]},
                {"name": "Alert Engine", "type": "module"}
            ]}"#,
        );
        stub.push_response(
            r#"{"functions": [
                {"name": "Persist Records", "allocated_components": ["Data Manager"],
                 "input_interfaces": ["record stream"], "output_interfaces": ["ack"]}
            ]}"#,
        );
        stub.push_response(
            r#"{"interfaces": [
                {"name": "Storage API", "type": "api", "provider_component": "Data Manager",
                 "consumer_components": ["Alert Engine"]}
            ]}"#,
        );
        stub.push_response(r#"{"scenarios": []}"#);

        let extractor = LogicalExtractor::new(Arc::new(stub));
        let cancel = CancellationToken::new();
        let chunks = vec![DocumentChunk::new(
            "chunk-0",
            "logical component breakdown",
            "proposal",
            0,
            ArcadiaPhase::Logical,
        )];
        let output = extractor
            .extract(&chunks, "proposal", None, None, &["proposal".to_string()], &cancel)
            .await;

        assert_eq!(output.components.len(), 2);
        assert_eq!(output.components[0].id, "LA-COMP-001");
        assert_eq!(output.functions[0].allocated_components, vec!["LA-COMP-001"]);
        assert_eq!(output.interfaces[0].provider_component, "LA-COMP-001");
        assert_eq!(output.interfaces[0].consumer_components, vec!["LA-COMP-002"]);
    }
}
