use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::issue_token;
use crate::auth::password::{hash_password, is_valid_email, is_valid_password, verify_password};
use crate::errors::AppError;
use crate::models::user::{UserProfile, UserRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
    pub token: String,
    pub user: UserProfile,
}

fn email_in_use() -> AppError {
    AppError::Validation("Email already in use".to_string())
}

/// A concurrent registration can pass the lookup and still lose on the unique index.
fn insert_error(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => email_in_use(),
        other => AppError::Database(other),
    }
}

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }
    if !is_valid_email(&req.email) {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }
    if !is_valid_password(&req.password) {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    let taken: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?;
    if taken.is_some() {
        return Err(email_in_use());
    }

    let password_hash = hash_password(req.password).await?;
    let user_id: i64 = sqlx::query_scalar(
        "INSERT INTO users (email, password_hash, name) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&req.email)
    .bind(&password_hash)
    .bind(&req.name)
    .fetch_one(&state.db)
    .await
    .map_err(insert_error)?;

    info!("Registered user {user_id}");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "ok",
            "message": "User registered successfully"
        })),
    ))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let user = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?;

    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());
    let user = user.ok_or_else(invalid)?;
    if !verify_password(req.password, user.password_hash.clone()).await? {
        return Err(invalid());
    }

    let token = issue_token(
        user.id,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok(Json(LoginResponse {
        status: "ok",
        token,
        user: UserProfile::from(&user),
    }))
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::fmt;

    use axum::response::IntoResponse;
    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    #[derive(Debug)]
    struct FakeDbError {
        unique: bool,
    }

    impl fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("fake database error")
        }
    }

    impl std::error::Error for FakeDbError {}

    impl DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "fake"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            None
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            if self.unique {
                ErrorKind::UniqueViolation
            } else {
                ErrorKind::Other
            }
        }
    }

    #[test]
    fn test_unique_violation_on_insert_is_email_in_use() {
        let err = insert_error(sqlx::Error::Database(Box::new(FakeDbError {
            unique: true,
        })));
        assert!(matches!(err, AppError::Validation(ref m) if m == "Email already in use"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_other_insert_failures_stay_database_errors() {
        let err = insert_error(sqlx::Error::Database(Box::new(FakeDbError { unique: false })));
        assert!(matches!(err, AppError::Database(_)));

        let err = insert_error(sqlx::Error::RowNotFound);
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
