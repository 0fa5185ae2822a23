pub mod health;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::state::AppState;
use crate::{admin, auth, jobs, matching, resumes, users};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/auth/register", post(auth::handlers::handle_register))
        .route("/api/auth/login", post(auth::handlers::handle_login))
        // User
        .route(
            "/api/user/profile",
            get(users::handlers::handle_get_profile).put(users::handlers::handle_update_profile),
        )
        .route(
            "/api/user/update_resume",
            put(resumes::handlers::handle_update_resume),
        )
        .route(
            "/api/user/parse_resume",
            post(resumes::handlers::handle_parse_resume),
        )
        .route(
            "/api/user/match_jobs",
            get(matching::handlers::handle_match_jobs),
        )
        // Admin
        .route("/api/admin/users", get(admin::handlers::handle_list_users))
        .route("/api/admin/users/:id", get(admin::handlers::handle_get_user))
        .route(
            "/api/admin/users/:id/toggle-admin",
            post(admin::handlers::handle_toggle_admin),
        )
        // Jobs
        .route(
            "/api/job/admin/create_job",
            post(jobs::handlers::handle_create_job),
        )
        .route("/api/job/", get(jobs::handlers::handle_list_jobs))
        .route("/api/job/:id", get(jobs::handlers::handle_get_job))
        .with_state(state)
}

/// CORS policy for the single configured front-end origin.
pub fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let origin: HeaderValue = origin
        .parse()
        .with_context(|| format!("CORS_ORIGIN '{origin}' is not a valid header value"))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true))
}
