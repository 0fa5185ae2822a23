//! Admin-only user management.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::auth::AdminUser;
use crate::errors::AppError;
use crate::models::user::{UserProfile, UserRow};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub status: &'static str,
    pub users: Vec<UserProfile>,
}

#[derive(Debug, Serialize)]
pub struct UserDetailResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: UserProfile,
}

async fn fetch_user(state: &AppState, user_id: i64) -> Result<UserRow, AppError> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
}

/// GET /api/admin/users
pub async fn handle_list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<UserListResponse>, AppError> {
    let users = sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY id")
        .fetch_all(&state.db)
        .await?;

    Ok(Json(UserListResponse {
        status: "ok",
        users: users.iter().map(UserProfile::from).collect(),
    }))
}

/// GET /api/admin/users/:id
pub async fn handle_get_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(user_id): Path<i64>,
) -> Result<Json<UserDetailResponse>, AppError> {
    let user = fetch_user(&state, user_id).await?;
    Ok(Json(UserDetailResponse {
        status: "ok",
        message: None,
        user: UserProfile::from(&user),
    }))
}

/// POST /api/admin/users/:id/toggle-admin
pub async fn handle_toggle_admin(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<i64>,
) -> Result<Json<UserDetailResponse>, AppError> {
    if user_id == admin.id {
        return Err(AppError::Validation(
            "Cannot modify your own admin status".to_string(),
        ));
    }

    let existing = fetch_user(&state, user_id).await?;
    let user = sqlx::query_as::<_, UserRow>(
        "UPDATE users SET is_admin = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(!existing.is_admin)
    .bind(user_id)
    .fetch_one(&state.db)
    .await?;

    let verb = if user.is_admin { "enabled" } else { "disabled" };
    info!("Admin {} {verb} admin status for user {}", admin.id, user.id);

    Ok(Json(UserDetailResponse {
        status: "ok",
        message: Some(format!("Admin status {verb} for user {}", user.email)),
        user: UserProfile::from(&user),
    }))
}
