//! Bearer-token authentication: HS256 JWTs carrying the user id, plus Axum extractors
//! that resolve the token to a stored user.

pub mod handlers;
pub mod password;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub exp: usize,
}

/// Signs a token for `user_id` that expires after `expiration_hours`.
pub fn issue_token(user_id: i64, secret: &str, expiration_hours: f64) -> Result<String, AppError> {
    let lifetime = Duration::seconds((expiration_hours * 3600.0) as i64);
    let claims = Claims {
        user_id,
        exp: (Utc::now() + lifetime).timestamp().max(0) as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign token: {e}")))
}

/// Verifies signature and expiry, returning the claims.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => {
            error!("Token has expired");
            AppError::Unauthorized("Token has expired".to_string())
        }
        _ => {
            error!("Invalid token error: {e}");
            AppError::Unauthorized("Invalid token".to_string())
        }
    })
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The authenticated caller, loaded from the database on every request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserRow);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            error!("Missing token in request");
            AppError::Unauthorized("Missing token".to_string())
        })?;

        let claims = verify_token(token, &state.config.jwt_secret)?;

        let user = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(claims.user_id)
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| {
                error!("User not found for token user_id={}", claims.user_id);
                AppError::Unauthorized("User not found".to_string())
            })?;

        Ok(AuthUser(user))
    }
}

/// An authenticated caller with the admin flag set.
#[derive(Debug, Clone)]
pub struct AdminUser(pub UserRow);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            error!(
                "Non-admin user attempted to access admin endpoint: {}",
                user.email
            );
            return Err(AppError::Forbidden("Admin privileges required".to_string()));
        }
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    const SECRET: &str = "test-secret";

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_token_round_trip() {
        let token = issue_token(42, SECRET, 2.0).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.user_id, 42);
        assert!(claims.exp > Utc::now().timestamp() as usize);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = issue_token(1, SECRET, 2.0).unwrap();
        let err = verify_token(&token, "other").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == "Invalid token"));
    }

    #[test]
    fn test_expired_token_is_reported() {
        let token = issue_token(1, SECRET, -1.0).unwrap();
        let err = verify_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == "Token has expired"));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        assert!(verify_token("not.a.jwt", SECRET).is_err());
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&parts_with(Some("Bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&parts_with(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&parts_with(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts_with(None)), None);
    }
}
