use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::account::models::PasswordResetCommand;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn password_reset<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<PasswordResetRequest>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    state
        .auth_service
        .password_reset(PasswordResetCommand {
            email: body.email,
            username: body.username,
        })
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData::new("Password reset email sent"),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PasswordResetRequest {
    email: String,
    username: String,
}
