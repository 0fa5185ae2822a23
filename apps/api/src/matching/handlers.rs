//! Axum route handler for job matching.

use std::collections::HashMap;

use anyhow::Context;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::jobs::store::find_match_candidates;
use crate::matching::recommender::{recommend_jobs, MatchRecommendation};
use crate::models::job::JobRow;
use crate::resumes::analyzer::analyze_resume;
use crate::resumes::store::save_resume_analysis;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchJobsQuery {
    pub desired_position: Option<String>,
    pub desired_location: Option<String>,
}

/// A recommendation with the stored job attached when the model's `job_id` is known.
#[derive(Debug, Serialize)]
pub struct RecommendationView {
    #[serde(flatten)]
    pub recommendation: MatchRecommendation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_details: Option<JobRow>,
}

#[derive(Debug, Serialize)]
pub struct MatchJobsResponse {
    pub status: &'static str,
    pub recommendations: Vec<RecommendationView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// Joins recommendations back to the candidate rows by id.
pub fn attach_job_details(
    recommendations: Vec<MatchRecommendation>,
    candidates: Vec<JobRow>,
) -> Vec<RecommendationView> {
    let by_id: HashMap<i64, JobRow> = candidates.into_iter().map(|j| (j.id, j)).collect();
    recommendations
        .into_iter()
        .map(|recommendation| RecommendationView {
            job_details: recommendation
                .job_key()
                .and_then(|id| by_id.get(&id))
                .cloned(),
            recommendation,
        })
        .collect()
}

/// Both filters, trimmed; blank counts as missing.
pub fn required_filters(params: MatchJobsQuery) -> Result<(String, String), AppError> {
    let trimmed = |v: Option<String>| {
        v.map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    match (trimmed(params.desired_position), trimmed(params.desired_location)) {
        (Some(position), Some(location)) => Ok((position, location)),
        _ => Err(AppError::Validation(
            "Both desired_position and desired_location are required".to_string(),
        )),
    }
}

/// GET /api/user/match_jobs?desired_position=..&desired_location=..
pub async fn handle_match_jobs(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<MatchJobsQuery>,
) -> Result<Json<MatchJobsResponse>, AppError> {
    let (desired_position, desired_location) = required_filters(params)?;

    let resume_text = user
        .resume_text
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("Please upload your resume first".to_string()))?;

    let resume_analysis = match user.resume_parsed_data.clone() {
        Some(parsed) if !parsed.is_null() => parsed,
        _ => {
            let analysis = analyze_resume(state.gateway.as_ref(), resume_text).await?;
            save_resume_analysis(&state.db, user.id, None, &analysis).await?
        }
    };

    let candidates =
        find_match_candidates(&state.db, &desired_position, &desired_location).await?;
    if candidates.is_empty() {
        return Ok(Json(MatchJobsResponse {
            status: "ok",
            recommendations: Vec::new(),
            message: Some("No matching jobs found"),
        }));
    }

    let candidate_values = candidates
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<Value>, _>>()
        .context("failed to serialize candidate jobs")?;

    let recommendations = recommend_jobs(
        state.gateway.as_ref(),
        &resume_analysis,
        &desired_position,
        &desired_location,
        &candidate_values,
    )
    .await?;

    info!(
        "User {} matched against {} jobs: {} recommendations",
        user.id,
        candidates.len(),
        recommendations.len()
    );

    Ok(Json(MatchJobsResponse {
        status: "ok",
        recommendations: attach_job_details(recommendations, candidates),
        message: None,
    }))
}
