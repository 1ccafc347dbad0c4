//! System analysis extractor: system actors, functions, capabilities, the
//! system boundary and functional chains. Functional chain steps only keep
//! references that resolve to functions declared in the same analysis.

use crate::context::{
    extraction_confidence, prepare_context, request_elements, request_object, resolve_names,
    summarize_prior, truncate, PROPOSAL_CHARS,
};
use crate::json;
use arcadia_ai::LlmProvider;
use arcadia_core::ids::element_id;
use arcadia_core::model::{
    ActorInterface, ChainStep, ExtractionMetadata, FunctionalChain, FunctionalExchange,
    OperationalAnalysis, SystemActor, SystemAnalysis, SystemBoundary, SystemCapability,
    SystemFunction,
};
use arcadia_core::{ArcadiaPhase, DocumentChunk};
use chrono::Utc;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

pub struct SystemExtractor {
    llm: Arc<dyn LlmProvider>,
}

impl SystemExtractor {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    #[instrument(skip_all)]
    pub async fn extract(
        &self,
        chunks: &[DocumentChunk],
        proposal: &str,
        operational: Option<&OperationalAnalysis>,
        source_documents: &[String],
        cancel: &CancellationToken,
    ) -> SystemAnalysis {
        let started = Utc::now();
        let start_instant = std::time::Instant::now();
        let mut metadata = ExtractionMetadata::new(source_documents.to_vec(), started);

        let context = prepare_context(chunks);
        let context_chars = context.chars().count();

        let prior_actors = summarize_prior(
            "OPERATIONAL ACTORS",
            operational
                .map(|op| {
                    op.actors
                        .iter()
                        .map(|a| (a.name.as_str(), a.description.as_str()))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default(),
        );

        let actors = self
            .extract_actors(&context, proposal, &prior_actors, cancel, &mut metadata)
            .await;
        let functions = self
            .extract_functions(&context, &actors, cancel, &mut metadata)
            .await;
        let capabilities = self
            .extract_capabilities(&context, &functions, operational, cancel, &mut metadata)
            .await;
        let boundary = self
            .extract_boundary(&context, proposal, cancel, &mut metadata)
            .await;
        let functional_chains = self
            .extract_functional_chains(&context, &functions, cancel, &mut metadata)
            .await;

        for (step, count) in [
            ("actors", actors.len()),
            ("functions", functions.len()),
            ("capabilities", capabilities.len()),
            ("boundary", usize::from(boundary.is_some())),
            ("functional_chains", functional_chains.len()),
        ] {
            metadata
                .confidence_scores
                .insert(step.to_string(), extraction_confidence(count, context_chars));
        }
        metadata.processing_seconds = start_instant.elapsed().as_secs_f64();

        info!(
            actors = actors.len(),
            functions = functions.len(),
            capabilities = capabilities.len(),
            chains = functional_chains.len(),
            "system analysis extraction completed"
        );

        SystemAnalysis {
            boundary,
            actors,
            functions,
            capabilities,
            functional_chains,
            metadata,
        }
    }

    async fn extract_actors(
        &self,
        context: &str,
        proposal: &str,
        prior_actors: &str,
        cancel: &CancellationToken,
        metadata: &mut ExtractionMetadata,
    ) -> Vec<SystemActor> {
        let prompt = format!(
            r#"SYSTEM ACTOR EXTRACTION - ARCADIA Methodology

CONTEXT: {context}

PROPOSAL: {proposal}

{prior_actors}
TASK: Identify system-level actors and their interfaces to the system.

OUTPUT FORMAT (JSON):
{{
  "actors": [
    {{
      "name": "Actor Name",
      "description": "Actor description",
      "type": "external|internal|interface",
      "interfaces": [
        {{"name": "interface name", "type": "data|control|user", "description": "interface description"}}
      ],
      "dependencies": ["dependency 1"]
    }}
  ]
}}

Focus on actors that exchange information or services with the system."#,
            context = context,
            proposal = truncate(proposal, PROPOSAL_CHARS),
            prior_actors = prior_actors,
        );

        let result = request_elements(self.llm.as_ref(), &prompt, "actors", cancel).await;
        let actors: Vec<SystemActor> = result
            .elements
            .iter()
            .filter_map(|obj| {
                let name = json::opt_str_field(obj, "name")?;
                Some((name, obj))
            })
            .enumerate()
            .map(|(i, (name, obj))| SystemActor {
                id: element_id(ArcadiaPhase::System, "ACTOR", i + 1),
                name,
                description: json::str_field(obj, "description"),
                kind: json::str_field(obj, "type").parse().unwrap_or_default(),
                interfaces: json::nested_objects(obj, "interfaces")
                    .iter()
                    .map(|intf| ActorInterface {
                        name: json::str_field(intf, "name"),
                        interface_type: json::str_field(intf, "type"),
                        description: json::str_field(intf, "description"),
                    })
                    .collect(),
                dependencies: json::str_list(obj, "dependencies"),
            })
            .collect();

        metadata.record("actors", result.status, 0.0, actors.len() as u64);
        actors
    }

    async fn extract_functions(
        &self,
        context: &str,
        actors: &[SystemActor],
        cancel: &CancellationToken,
        metadata: &mut ExtractionMetadata,
    ) -> Vec<SystemFunction> {
        let actor_names: Vec<&str> = actors.iter().take(5).map(|a| a.name.as_str()).collect();
        let prompt = format!(
            r#"SYSTEM FUNCTION EXTRACTION - ARCADIA Methodology

CONTEXT: {context}

KNOWN SYSTEM ACTORS: {actors}

TASK: Extract system functions, their hierarchy, actor allocations and functional exchanges.

OUTPUT FORMAT (JSON):
{{
  "functions": [
    {{
      "name": "Function Name",
      "description": "Function description",
      "type": "primary|secondary|support",
      "parent_function": "parent function name if any",
      "sub_functions": ["sub-function names"],
      "allocated_actors": ["actor names"],
      "functional_exchanges": [
        {{"from": "source function", "to": "target function", "type": "data|energy|material", "description": "exchange description"}}
      ],
      "performance_requirements": ["requirement 1"]
    }}
  ]
}}

Focus on functions directly driven by operational need."#,
            context = context,
            actors = actor_names.join(", "),
        );

        let candidates: Vec<(String, String)> = actors
            .iter()
            .map(|a| (a.id.clone(), a.name.clone()))
            .collect();

        let result = request_elements(self.llm.as_ref(), &prompt, "functions", cancel).await;
        let functions: Vec<SystemFunction> = result
            .elements
            .iter()
            .filter_map(|obj| {
                let name = json::opt_str_field(obj, "name")?;
                Some((name, obj))
            })
            .enumerate()
            .map(|(i, (name, obj))| SystemFunction {
                id: element_id(ArcadiaPhase::System, "FUNCTION", i + 1),
                name,
                description: json::str_field(obj, "description"),
                kind: json::str_field(obj, "type").parse().unwrap_or_default(),
                parent_function: json::opt_str_field(obj, "parent_function"),
                sub_functions: json::str_list(obj, "sub_functions"),
                allocated_actors: resolve_names(&json::str_list(obj, "allocated_actors"), &candidates),
                functional_exchanges: json::nested_objects(obj, "functional_exchanges")
                    .iter()
                    .map(|exchange| FunctionalExchange {
                        from_function: json::str_field(exchange, "from"),
                        to_function: json::str_field(exchange, "to"),
                        kind: json::str_field(exchange, "type").parse().unwrap_or_default(),
                        description: json::str_field(exchange, "description"),
                    })
                    .collect(),
                performance_requirements: json::str_list(obj, "performance_requirements"),
            })
            .collect();

        metadata.record("functions", result.status, 0.0, functions.len() as u64);
        functions
    }

    async fn extract_capabilities(
        &self,
        context: &str,
        functions: &[SystemFunction],
        operational: Option<&OperationalAnalysis>,
        cancel: &CancellationToken,
        metadata: &mut ExtractionMetadata,
    ) -> Vec<SystemCapability> {
        let function_names: Vec<&str> =
            functions.iter().take(5).map(|f| f.name.as_str()).collect();
        let prior_capabilities = summarize_prior(
            "OPERATIONAL CAPABILITIES",
            operational
                .map(|op| {
                    op.capabilities
                        .iter()
                        .map(|c| (c.name.as_str(), c.description.as_str()))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default(),
        );

        let prompt = format!(
            r#"SYSTEM CAPABILITY EXTRACTION - ARCADIA Methodology

CONTEXT: {context}

KNOWN SYSTEM FUNCTIONS: {functions}

{prior_capabilities}
TASK: Extract system capabilities and map them to operational capabilities and implementing functions.

OUTPUT FORMAT (JSON):
{{
  "capabilities": [
    {{
      "name": "Capability Name",
      "description": "Capability description",
      "realized_operational_capabilities": ["operational capability names"],
      "implementing_functions": ["function names"],
      "performance_requirements": ["requirement 1"]
    }}
  ]
}}

Focus on the system's contribution to operational capabilities."#,
            context = context,
            functions = function_names.join(", "),
            prior_capabilities = prior_capabilities,
        );

        let function_candidates: Vec<(String, String)> = functions
            .iter()
            .map(|f| (f.id.clone(), f.name.clone()))
            .collect();
        let operational_candidates: Vec<(String, String)> = operational
            .map(|op| {
                op.capabilities
                    .iter()
                    .map(|c| (c.id.clone(), c.name.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let result = request_elements(self.llm.as_ref(), &prompt, "capabilities", cancel).await;
        let capabilities: Vec<SystemCapability> = result
            .elements
            .iter()
            .filter_map(|obj| {
                let name = json::opt_str_field(obj, "name")?;
                Some((name, obj))
            })
            .enumerate()
            .map(|(i, (name, obj))| {
                let raw_realized = json::str_list(obj, "realized_operational_capabilities");
                let realized = if operational_candidates.is_empty() {
                    raw_realized
                } else {
                    resolve_names(&raw_realized, &operational_candidates)
                };
                SystemCapability {
                    id: element_id(ArcadiaPhase::System, "CAPABILITY", i + 1),
                    name,
                    description: json::str_field(obj, "description"),
                    realized_operational_capabilities: realized,
                    implementing_functions: resolve_names(
                        &json::str_list(obj, "implementing_functions"),
                        &function_candidates,
                    ),
                    performance_requirements: json::str_list(obj, "performance_requirements"),
                }
            })
            .collect();

        metadata.record("capabilities", result.status, 0.0, capabilities.len() as u64);
        capabilities
    }

    async fn extract_boundary(
        &self,
        context: &str,
        proposal: &str,
        cancel: &CancellationToken,
        metadata: &mut ExtractionMetadata,
    ) -> Option<SystemBoundary> {
        let prompt = format!(
            r#"SYSTEM BOUNDARY DEFINITION - ARCADIA Methodology

CONTEXT: {context}

PROPOSAL: {proposal}

TASK: Define the system boundary: what is inside, what is outside, external dependencies and environmental factors.

OUTPUT FORMAT (JSON):
{{
  "scope_definition": "Concise scope statement",
  "included_elements": ["element 1"],
  "excluded_elements": ["element 1"],
  "external_dependencies": ["dependency 1"],
  "environmental_factors": ["factor 1"]
}}"#,
            context = context,
            proposal = truncate(proposal, PROPOSAL_CHARS),
        );

        let (object, status) = request_object(self.llm.as_ref(), &prompt, cancel).await;
        let boundary = object.map(|obj| SystemBoundary {
            scope_definition: json::str_field(&obj, "scope_definition"),
            included_elements: json::str_list(&obj, "included_elements"),
            excluded_elements: json::str_list(&obj, "excluded_elements"),
            external_dependencies: json::str_list(&obj, "external_dependencies"),
            environmental_factors: json::str_list(&obj, "environmental_factors"),
        });

        metadata.record("boundary", status, 0.0, u64::from(boundary.is_some()));
        boundary
    }

    async fn extract_functional_chains(
        &self,
        context: &str,
        functions: &[SystemFunction],
        cancel: &CancellationToken,
        metadata: &mut ExtractionMetadata,
    ) -> Vec<FunctionalChain> {
        let function_names: Vec<&str> =
            functions.iter().take(5).map(|f| f.name.as_str()).collect();
        let prompt = format!(
            r#"FUNCTIONAL CHAIN EXTRACTION - ARCADIA Methodology

CONTEXT: {context}

KNOWN SYSTEM FUNCTIONS: {functions}

TASK: Extract functional chains: ordered sequences of system functions realising end-to-end scenarios.

OUTPUT FORMAT (JSON):
{{
  "chains": [
    {{
      "name": "Chain Name",
      "description": "Chain description",
      "scenario_context": "scenario this chain supports",
      "sequence": [
        {{"step": 1, "function": "function name", "description": "what happens", "inputs": ["input"], "outputs": ["output"]}}
      ],
      "alternative_paths": ["alternative description"],
      "validation_criteria": ["criterion 1"]
    }}
  ]
}}

Only reference functions from the known list."#,
            context = context,
            functions = function_names.join(", "),
        );

        let candidates: Vec<(String, String)> = functions
            .iter()
            .map(|f| (f.id.clone(), f.name.clone()))
            .collect();

        let result = request_elements(self.llm.as_ref(), &prompt, "chains", cancel).await;
        let chains: Vec<FunctionalChain> = result
            .elements
            .iter()
            .filter_map(|obj| {
                let name = json::opt_str_field(obj, "name")?;
                Some((name, obj))
            })
            .enumerate()
            .map(|(i, (name, obj))| {
                // Steps whose function name does not resolve are dropped so
                // every kept step references a declared function id.
                let sequence: Vec<ChainStep> = json::nested_objects(obj, "sequence")
                    .iter()
                    .enumerate()
                    .filter_map(|(step_index, step)| {
                        let function_name = json::str_field(step, "function");
                        let resolved =
                            resolve_names(std::slice::from_ref(&function_name), &candidates);
                        let function_id = resolved.into_iter().next()?;
                        Some(ChainStep {
                            order: json::usize_field(step, "step", step_index + 1),
                            function_id,
                            description: json::str_field(step, "description"),
                            inputs: json::str_list(step, "inputs"),
                            outputs: json::str_list(step, "outputs"),
                        })
                    })
                    .collect();

                FunctionalChain {
                    id: element_id(ArcadiaPhase::System, "CHAIN", i + 1),
                    name,
                    description: json::str_field(obj, "description"),
                    scenario_context: json::str_field(obj, "scenario_context"),
                    sequence,
                    alternative_paths: json::str_list(obj, "alternative_paths"),
                    validation_criteria: json::str_list(obj, "validation_criteria"),
                }
            })
            .collect();

        metadata.record(
            "functional_chains",
            result.status,
            0.0,
            chains.len() as u64,
        );
        chains
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
            "The system shall provide monitoring functions with data interfaces.",
            "proposal",
            0,
            ArcadiaPhase::System,
        )]
    }

    #[tokio::test]
    async fn chain_steps_only_keep_resolvable_function_references() {
        let stub = StubProvider::new();
        stub.push_response(r#"{"actors": [{"name": "Operator", "type": "external"}]}"#);
        stub.push_response(
            r#"{"functions": [
                {"name": "Monitor Status", "type": "primary", "allocated_actors": ["Operator"]},
                {"name": "Generate Alerts", "type": "secondary"}
            ]}"#,
        );
        stub.push_response(r#"{"capabilities": []}"#);
        stub.push_response(r#"{"scope_definition": "Monitoring system boundary"}"#);
        stub.push_response(
            r#"{"chains": [
                {"name": "Alerting Chain", "description": "From status to alert",
                 "scenario_context": "anomaly detected",
                 "sequence": [
                    {"step": 1, "function": "Monitor Status", "description": "watch"},
                    {"step": 2, "function": "Unknown Function", "description": "dropped"},
                    {"step": 3, "function": "generate alerts", "description": "notify"}
                 ]}
            ]}"#,
        );

        let extractor = SystemExtractor::new(Arc::new(stub));
        let cancel = CancellationToken::new();
        let output = extractor
            .extract(&chunks(), "proposal", None, &["proposal".to_string()], &cancel)
            .await;

        assert_eq!(output.functions.len(), 2);
        assert_eq!(output.functions[0].id, "SA-FUNCTION-001");
        assert_eq!(output.functions[0].allocated_actors, vec!["SA-ACTOR-001"]);

        assert_eq!(output.functional_chains.len(), 1);
        let chain = &output.functional_chains[0];
        assert_eq!(chain.sequence.len(), 2);
        assert_eq!(chain.sequence[0].function_id, "SA-FUNCTION-001");
        assert_eq!(chain.sequence[1].function_id, "SA-FUNCTION-002");

        assert!(output.boundary.is_some());
    }

    #[tokio::test]
    async fn transport_failure_in_one_step_does_not_abort_the_rest() {
        let stub = StubProvider::new();
        stub.push_error(arcadia_ai::LlmError::Transport("unreachable".to_string()));
        stub.push_response(r#"{"functions": [{"name": "Process Data"}]}"#);
        stub.push_response(r#"{"capabilities": []}"#);
        stub.push_response(r#"{"scope_definition": "scope"}"#);
        stub.push_response(r#"{"chains": []}"#);

        let extractor = SystemExtractor::new(Arc::new(stub));
        let cancel = CancellationToken::new();
        let output = extractor
            .extract(&chunks(), "proposal", None, &["proposal".to_string()], &cancel)
            .await;

        assert!(output.actors.is_empty());
        assert_eq!(
            output.metadata.statuses.get("actors"),
            Some(&ExtractionStatus::TransportFailed)
        );
        assert_eq!(output.functions.len(), 1);
    }
}
