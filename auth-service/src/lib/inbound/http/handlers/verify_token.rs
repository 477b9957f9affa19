use auth::SessionClaims;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn verify_token<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<VerifyTokenRequest>,
) -> Result<ApiSuccess<ClaimsData>, ApiError> {
    let claims = state.auth_service.validate_token(&body.token).await?;

    Ok(ApiSuccess::new(StatusCode::OK, (&claims).into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyTokenRequest {
    token: String,
}

/// Decoded session claims as exposed over HTTP
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimsData {
    pub account_id: String,
    pub email: String,
    pub token_type: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl From<&SessionClaims> for ClaimsData {
    fn from(claims: &SessionClaims) -> Self {
        Self {
            account_id: claims.sub.clone(),
            email: claims.email.clone(),
            token_type: claims.kind().to_string(),
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }
}
