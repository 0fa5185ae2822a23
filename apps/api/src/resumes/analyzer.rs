//! Résumé Analyzer — five-section advisory analysis of a résumé.
//!
//! Lenient by contract: sections the model omits are filled with a placeholder
//! mapping instead of failing the request.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::error;

use crate::errors::AiError;
use crate::llm_client::prompts::with_json_rules;
use crate::llm_client::{invoke_json_mode, ModelGateway};
use crate::resumes::prompts::RESUME_ANALYSIS_SYSTEM;

pub const PLACEHOLDER_NOTE: &str = "insufficient information extracted";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub technical_analysis: Value,
    pub experience_analysis: Value,
    pub education_analysis: Value,
    pub core_competencies: Value,
    pub career_analysis: Value,
    /// Anything else the model returned, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The value substituted for an omitted section.
pub fn placeholder_section() -> Value {
    json!({ "note": PLACEHOLDER_NOTE })
}

/// Analyzes résumé text via the model gateway.
///
/// Empty input fails before any remote call.
pub async fn analyze_resume(
    gateway: &dyn ModelGateway,
    resume_text: &str,
) -> Result<ResumeAnalysis, AiError> {
    if resume_text.is_empty() {
        return Err(AiError::Precondition(
            "Resume text cannot be empty".to_string(),
        ));
    }

    let system = with_json_rules(RESUME_ANALYSIS_SYSTEM);
    invoke_json_mode(gateway, &system, resume_text)
        .await
        .map(|text| parse_analysis(&text))
        .map_err(|e| {
            error!("Error parsing resume: {e}");
            AiError::from(e).context("parse resume")
        })
}

/// Reads model output leniently: unparseable or non-object bodies count as `{}`.
pub(crate) fn parse_analysis(text: &str) -> ResumeAnalysis {
    let mut sections = match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };

    let mut take = |key: &str| sections.remove(key).unwrap_or_else(placeholder_section);
    let technical_analysis = take("technical_analysis");
    let experience_analysis = take("experience_analysis");
    let education_analysis = take("education_analysis");
    let core_competencies = take("core_competencies");
    let career_analysis = take("career_analysis");

    ResumeAnalysis {
        technical_analysis,
        experience_analysis,
        education_analysis,
        core_competencies,
        career_analysis,
        extra: sections,
    }
}
