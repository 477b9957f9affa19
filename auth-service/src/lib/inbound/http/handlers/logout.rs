use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;

use super::bearer_token;
use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

/// Revoke the presented token, access or refresh.
pub async fn logout<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let token = bearer_token(&headers)?;
    state.auth_service.logout(token).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData::new("Logged out"),
    ))
}
