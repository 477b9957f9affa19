use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn resend_verification<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<ResendVerificationRequest>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    state
        .auth_service
        .resend_verification(&body.email, &state.verify_email_url)
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData::new("Verification email sent"),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResendVerificationRequest {
    email: String,
}
