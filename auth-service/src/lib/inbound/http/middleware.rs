use auth::SessionClaims;
use auth::TokenKind;
use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::account::models::AccountId;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::handlers::bearer_token;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type holding the caller's verified session
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub account_id: AccountId,
    pub claims: SessionClaims,
}

/// Middleware that admits only unrevoked access tokens and stores the caller in request extensions
pub async fn authenticate<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = bearer_token(req.headers())
        .map_err(IntoResponse::into_response)?
        .to_string();

    let claims = state
        .auth_service
        .validate_token(&token)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Session token validation failed");
            ApiError::from(e).into_response()
        })?;

    if claims.kind() != TokenKind::Access {
        return Err(
            ApiError::Unauthorized("Access token required".to_string()).into_response(),
        );
    }

    let account_id = AccountId::from_string(&claims.sub).map_err(|e| {
        tracing::error!(error = %e, "Failed to parse account ID from token");
        ApiError::Unauthorized("Invalid token format".to_string()).into_response()
    })?;

    req.extensions_mut()
        .insert(AuthenticatedAccount { account_id, claims });

    Ok(next.run(req).await)
}
