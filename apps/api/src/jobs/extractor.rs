//! JD Extractor — turns a raw job description into the fixed five-field job record.
//!
//! Strict by contract: any missing field is a hard failure, never defaulted.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use crate::errors::AiError;
use crate::jobs::prompts::JD_EXTRACT_SYSTEM;
use crate::llm_client::prompts::with_json_rules;
use crate::llm_client::{invoke_json_mode, ModelGateway};

/// Checked in this order; the first absent one is reported.
pub const REQUIRED_FIELDS: [&str; 5] = [
    "job_title",
    "company_name",
    "location",
    "responsibilities",
    "requirements",
];

/// Structured job posting as extracted by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobExtraction {
    pub job_title: String,
    pub company_name: String,
    pub location: String,
    pub responsibilities: Vec<String>,
    pub requirements: Vec<String>,
}

/// Extracts a `JobExtraction` from raw job-description text via the model gateway.
pub async fn extract_job(
    gateway: &dyn ModelGateway,
    raw_text: &str,
) -> Result<JobExtraction, AiError> {
    let system = with_json_rules(JD_EXTRACT_SYSTEM);

    let result = match invoke_json_mode(gateway, &system, raw_text).await {
        Ok(text) => parse_extraction(&text),
        Err(e) => Err(e.into()),
    };

    result.map_err(|e| {
        error!("Error parsing job description: {e}");
        e.context("parse job description")
    })
}

/// Validates model output against the five-field contract.
pub(crate) fn parse_extraction(text: &str) -> Result<JobExtraction, AiError> {
    let body = if text.trim().is_empty() { "{}" } else { text };
    let value: Value = serde_json::from_str(body)?;

    for field in REQUIRED_FIELDS {
        let present = value
            .as_object()
            .is_some_and(|fields| fields.contains_key(field));
        if !present {
            return Err(AiError::Shape(format!("Missing required field: {field}")));
        }
    }

    Ok(serde_json::from_value(value)?)
}
