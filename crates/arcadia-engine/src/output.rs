//! Structured JSON assembly for the composite run output.

use crate::orchestrator::UnifiedResult;
use serde_json::{json, Map, Value};

/// Assemble the top-level JSON document for a run:
/// phase analyses (when present), cross-phase analysis, the traditional
/// requirements block, the validation report and the quality metrics.
pub fn to_structured_json(result: &UnifiedResult) -> Value {
    let mut root = Map::new();

    if let Some(structured) = &result.structured {
        if let Some(operational) = &structured.operational {
            root.insert(
                "operational_analysis".to_string(),
                serde_json::to_value(operational).unwrap_or(Value::Null),
            );
        }
        if let Some(system) = &structured.system {
            root.insert(
                "system_analysis".to_string(),
                serde_json::to_value(system).unwrap_or(Value::Null),
            );
        }
        if let Some(logical) = &structured.logical {
            root.insert(
                "logical_architecture".to_string(),
                serde_json::to_value(logical).unwrap_or(Value::Null),
            );
        }
        if let Some(physical) = &structured.physical {
            root.insert(
                "physical_architecture".to_string(),
                serde_json::to_value(physical).unwrap_or(Value::Null),
            );
        }
        if let Some(cross_phase) = &structured.cross_phase {
            root.insert(
                "cross_phase_analysis".to_string(),
                serde_json::to_value(cross_phase).unwrap_or(Value::Null),
            );
        }
        root.insert(
            "generation_metadata".to_string(),
            serde_json::to_value(&structured.generation).unwrap_or(Value::Null),
        );
    }

    root.insert(
        "traditional_requirements".to_string(),
        json!({
            "requirements": result.requirements,
            "stakeholders": result.stakeholders,
            "statistics": result.statistics,
        }),
    );

    if let Some(validation) = &result.validation {
        root.insert(
            "validation_report".to_string(),
            serde_json::to_value(validation).unwrap_or(Value::Null),
        );
    }

    let mut quality = Map::new();
    quality.insert("overall_score".to_string(), json!(result.quality_score));
    quality.insert(
        "generation_time_seconds".to_string(),
        json!(result.generation_seconds),
    );
    if let Some(compliance) = &result.template_compliance {
        quality.insert(
            "template_compliance".to_string(),
            serde_json::to_value(compliance).unwrap_or(Value::Null),
        );
    }
    if let Some(enrichment) = &result.enrichment {
        quality.insert(
            "enrichment_summary".to_string(),
            serde_json::to_value(enrichment).unwrap_or(Value::Null),
        );
    }
    if let Some(project_id) = &result.project_id {
        quality.insert("project_id".to_string(), json!(project_id));
    }
    if let Some(session_id) = &result.session_id {
        quality.insert("session_id".to_string(), json!(session_id));
    }
    quality.insert(
        "recommendations".to_string(),
        json!(result.recommendations),
    );
    root.insert("quality_metrics".to_string(), Value::Object(quality));

    Value::Object(root)
}
