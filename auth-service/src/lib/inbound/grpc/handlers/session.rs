use tonic::Status;

use super::message;
use super::seconds;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::ports::AuthServicePort;
use crate::proto::LoginRequest;
use crate::proto::LoginResponse;
use crate::proto::MessageResponse;
use crate::proto::RefreshRequest;
use crate::proto::RefreshResponse;
use crate::proto::ValidateTokenRequest;
use crate::proto::ValidateTokenResponse;

pub async fn login<S: AuthServicePort>(
    service: &S,
    request: LoginRequest,
) -> Result<LoginResponse, Status> {
    let tokens = service
        .login(LoginCommand {
            email: request.email,
            password: request.password,
        })
        .await?;

    Ok(LoginResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        access_expires_in: seconds(tokens.access_expires_in),
        refresh_expires_in: seconds(tokens.refresh_expires_in),
    })
}

pub async fn refresh<S: AuthServicePort>(
    service: &S,
    request: RefreshRequest,
) -> Result<RefreshResponse, Status> {
    let grant = service.refresh(&request.refresh_token).await?;

    Ok(RefreshResponse {
        access_token: grant.access_token,
        expires_in: seconds(grant.expires_in),
    })
}

pub async fn validate_token<S: AuthServicePort>(
    service: &S,
    request: ValidateTokenRequest,
) -> Result<ValidateTokenResponse, Status> {
    let claims = service.validate_token(&request.token).await?;

    Ok(ValidateTokenResponse {
        claims: Some((&claims).into()),
    })
}

pub async fn logout<S: AuthServicePort>(service: &S, token: &str) -> Result<MessageResponse, Status> {
    service.logout(token).await?;
    Ok(message("Logged out"))
}
