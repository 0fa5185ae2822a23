//! Axum route handlers for the Job API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::auth::AdminUser;
use crate::errors::AppError;
use crate::jobs::extractor::extract_job;
use crate::jobs::store::{self, JobFilter, Pagination};
use crate::models::job::{JobRow, JobSummary};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub raw_jd_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateJobResponse {
    pub status: &'static str,
    pub job_id: i64,
    pub message: &'static str,
    pub job: JobRow,
}

#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    pub job_title: Option<String>,
    pub location: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ListJobsResponse {
    pub status: &'static str,
    pub jobs: Vec<JobSummary>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct JobDetailResponse {
    pub status: &'static str,
    pub job: JobRow,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/job/admin/create_job
///
/// Extracts a structured posting from raw JD text and stores it.
pub async fn handle_create_job(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<CreateJobResponse>), AppError> {
    let raw_jd_text = request
        .raw_jd_text
        .ok_or_else(|| AppError::Validation("Missing raw_jd_text".to_string()))?;

    let extraction = extract_job(state.gateway.as_ref(), &raw_jd_text)
        .await
        .map_err(|e| {
            error!("Error in create_job: {e}");
            AppError::from(e)
        })?;

    let job = store::insert_job(&state.db, &extraction, &raw_jd_text).await?;
    info!("Admin {} created job {}", admin.id, job.id);

    Ok((
        StatusCode::CREATED,
        Json(CreateJobResponse {
            status: "ok",
            job_id: job.id,
            message: "Job created successfully",
            job,
        }),
    ))
}

/// GET /api/job/
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<ListJobsQuery>,
) -> Result<Json<ListJobsResponse>, AppError> {
    let (page, per_page) = store::page_bounds(params.page, params.per_page);
    let filter = JobFilter {
        job_title: params.job_title,
        location: params.location,
    };

    let (rows, pagination) = store::list_jobs(&state.db, &filter, page, per_page).await?;

    Ok(Json(ListJobsResponse {
        status: "ok",
        jobs: rows.into_iter().map(JobSummary::from).collect(),
        pagination,
    }))
}

/// GET /api/job/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
) -> Result<Json<JobDetailResponse>, AppError> {
    let job = store::get_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    Ok(Json(JobDetailResponse { status: "ok", job }))
}
