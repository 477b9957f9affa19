use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn verify_email<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    Query(params): Query<VerifyEmailParams>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    state
        .auth_service
        .verify_email(&params.token, params.send_email)
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData::new("Email verified"),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyEmailParams {
    token: String,
    #[serde(rename = "sendEmail", default = "super::default_true")]
    send_email: bool,
}
