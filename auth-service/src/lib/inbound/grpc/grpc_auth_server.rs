use std::sync::Arc;

use tonic::metadata::MetadataMap;
use tonic::Request;
use tonic::Response;
use tonic::Status;

use super::handlers::account;
use super::handlers::session;
use crate::domain::account::ports::AuthServicePort;
use crate::proto::auth_service_server::AuthService as AuthServiceProto;
use crate::proto::HealthCheckRequest;
use crate::proto::HealthCheckResponse;
use crate::proto::LoginRequest;
use crate::proto::LoginResponse;
use crate::proto::LogoutRequest;
use crate::proto::MessageResponse;
use crate::proto::PasswordResetConfirmRequest;
use crate::proto::PasswordResetRequest;
use crate::proto::RefreshRequest;
use crate::proto::RefreshResponse;
use crate::proto::RegisterRequest;
use crate::proto::RegisterResponse;
use crate::proto::ResendVerificationRequest;
use crate::proto::ValidateTokenRequest;
use crate::proto::ValidateTokenResponse;
use crate::proto::VerifyEmailRequest;

pub struct AuthGrpcService<S: AuthServicePort> {
    service: Arc<S>,
    verify_email_url: String,
}

impl<S: AuthServicePort> AuthGrpcService<S> {
    pub fn new(service: Arc<S>, verify_email_url: String) -> Self {
        Self {
            service,
            verify_email_url,
        }
    }
}

fn bearer_token(metadata: &MetadataMap) -> Result<String, Status> {
    let value = metadata
        .get("authorization")
        .ok_or_else(|| Status::unauthenticated("Missing authorization metadata"))?
        .to_str()
        .map_err(|_| Status::unauthenticated("Invalid authorization metadata"))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Status::unauthenticated("Expected: Bearer <token>"))
}

#[tonic::async_trait]
impl<S: AuthServicePort> AuthServiceProto for AuthGrpcService<S> {
    async fn register(
        &self,
        request: Request<RegisterRequest>,
    ) -> Result<Response<RegisterResponse>, Status> {
        let response =
            account::register(&*self.service, &self.verify_email_url, request.into_inner())
                .await?;
        Ok(Response::new(response))
    }

    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        let response = session::login(&*self.service, request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn refresh(
        &self,
        request: Request<RefreshRequest>,
    ) -> Result<Response<RefreshResponse>, Status> {
        let response = session::refresh(&*self.service, request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn validate_token(
        &self,
        request: Request<ValidateTokenRequest>,
    ) -> Result<Response<ValidateTokenResponse>, Status> {
        let response = session::validate_token(&*self.service, request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn logout(
        &self,
        request: Request<LogoutRequest>,
    ) -> Result<Response<MessageResponse>, Status> {
        let token = bearer_token(request.metadata())?;
        let response = session::logout(&*self.service, &token).await?;
        Ok(Response::new(response))
    }

    async fn verify_email(
        &self,
        request: Request<VerifyEmailRequest>,
    ) -> Result<Response<MessageResponse>, Status> {
        let response = account::verify_email(&*self.service, request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn resend_verification(
        &self,
        request: Request<ResendVerificationRequest>,
    ) -> Result<Response<MessageResponse>, Status> {
        let response = account::resend_verification(
            &*self.service,
            &self.verify_email_url,
            request.into_inner(),
        )
        .await?;
        Ok(Response::new(response))
    }

    async fn password_reset(
        &self,
        request: Request<PasswordResetRequest>,
    ) -> Result<Response<MessageResponse>, Status> {
        let response = account::password_reset(&*self.service, request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn password_reset_confirm(
        &self,
        request: Request<PasswordResetConfirmRequest>,
    ) -> Result<Response<MessageResponse>, Status> {
        let response =
            account::password_reset_confirm(&*self.service, request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn health_check(
        &self,
        _request: Request<HealthCheckRequest>,
    ) -> Result<Response<HealthCheckResponse>, Status> {
        Ok(Response::new(HealthCheckResponse {
            status: "SERVING".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use tonic::metadata::MetadataValue;

    use super::*;

    #[test]
    fn test_bearer_token_from_metadata() {
        let mut metadata = MetadataMap::new();
        assert_eq!(
            bearer_token(&metadata).unwrap_err().code(),
            tonic::Code::Unauthenticated
        );

        metadata.insert("authorization", MetadataValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&metadata).unwrap(), "abc");
    }
}
