//! Axum route handlers for résumé intake.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::resumes::analyzer::analyze_resume;
use crate::resumes::store::save_resume_analysis;
use crate::state::AppState;

pub const MAX_RESUME_CHARS: usize = 50_000;

#[derive(Debug, Deserialize)]
pub struct UpdateResumeRequest {
    pub resume_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ParsedResumeResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub parsed_data: Value,
}

/// Rejects a missing or oversized résumé before any model call.
pub fn validate_resume_text(resume_text: Option<String>) -> Result<String, AppError> {
    let text = resume_text
        .ok_or_else(|| AppError::Validation("Resume text is required".to_string()))?;
    if text.chars().count() > MAX_RESUME_CHARS {
        return Err(AppError::Validation(
            "Resume text exceeds maximum length".to_string(),
        ));
    }
    Ok(text)
}

/// PUT /api/user/update_resume
///
/// Analyzes the submitted résumé and stores text + analysis together. Nothing is
/// stored when analysis fails.
pub async fn handle_update_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<UpdateResumeRequest>,
) -> Result<Json<ParsedResumeResponse>, AppError> {
    let resume_text = validate_resume_text(request.resume_text)?;

    let analysis = analyze_resume(state.gateway.as_ref(), &resume_text).await?;
    let parsed_data =
        save_resume_analysis(&state.db, user.id, Some(&resume_text), &analysis).await?;
    info!("Stored resume analysis for user {}", user.id);

    Ok(Json(ParsedResumeResponse {
        status: "ok",
        message: Some("Resume updated and parsed successfully"),
        parsed_data,
    }))
}

/// POST /api/user/parse_resume
///
/// Re-runs analysis on the stored résumé.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ParsedResumeResponse>, AppError> {
    let resume_text = user
        .resume_text
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("No resume text found".to_string()))?;

    let analysis = analyze_resume(state.gateway.as_ref(), resume_text).await?;
    let parsed_data = save_resume_analysis(&state.db, user.id, None, &analysis).await?;

    Ok(Json(ParsedResumeResponse {
        status: "ok",
        message: None,
        parsed_data,
    }))
}
