use axum::http::StatusCode;
use axum::Extension;

use super::verify_token::ClaimsData;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedAccount;

/// Echo the caller's session, for clients checking a token against a protected route.
pub async fn me(
    Extension(caller): Extension<AuthenticatedAccount>,
) -> Result<ApiSuccess<ClaimsData>, ApiError> {
    Ok(ApiSuccess::new(StatusCode::OK, (&caller.claims).into()))
}
