use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::account::errors::AuthError;
use crate::domain::account::models::Password;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn password_reset_confirm<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    Query(params): Query<PasswordResetConfirmParams>,
    Json(body): Json<PasswordResetConfirmRequest>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    if body.new_password != body.new_password_confirm {
        return Err(ApiError::BadRequest(
            "Password confirmation does not match".to_string(),
        ));
    }

    let new_password = Password::new(body.new_password).map_err(AuthError::from)?;

    state
        .auth_service
        .password_reset_confirm(&params.token, new_password)
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData::new("Password has been reset"),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PasswordResetConfirmParams {
    token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PasswordResetConfirmRequest {
    new_password: String,
    new_password_confirm: String,
}
