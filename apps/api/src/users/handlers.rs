use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::user::UserProfile;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub status: &'static str,
    pub user: UserProfile,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
}

/// GET /api/user/profile
pub async fn handle_get_profile(AuthUser(user): AuthUser) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        status: "ok",
        user: UserProfile::from(&user),
    })
}

/// PUT /api/user/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Value>, AppError> {
    if let Some(name) = request.name {
        sqlx::query("UPDATE users SET name = $1, updated_at = NOW() WHERE id = $2")
            .bind(name)
            .bind(user.id)
            .execute(&state.db)
            .await?;
    }

    Ok(Json(json!({
        "status": "ok",
        "message": "Profile updated"
    })))
}
