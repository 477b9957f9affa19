use tonic::Status;

use super::message;
use crate::domain::account::errors::AuthError;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::Password;
use crate::domain::account::models::PasswordResetCommand;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::Username;
use crate::domain::account::ports::AuthServicePort;
use crate::proto::MessageResponse;
use crate::proto::PasswordResetConfirmRequest;
use crate::proto::PasswordResetRequest;
use crate::proto::RegisterRequest;
use crate::proto::RegisterResponse;
use crate::proto::ResendVerificationRequest;
use crate::proto::VerifyEmailRequest;

pub async fn register<S: AuthServicePort>(
    service: &S,
    verify_email_url: &str,
    request: RegisterRequest,
) -> Result<RegisterResponse, Status> {
    let command = RegisterCommand::new(
        EmailAddress::new(request.email).map_err(AuthError::from)?,
        Username::new(request.username).map_err(AuthError::from)?,
        Password::new(request.password).map_err(AuthError::from)?,
        request.send_email,
        verify_email_url,
    );

    let registration = service.register(command).await?;

    Ok(RegisterResponse {
        account: Some((&registration.account).into()),
        verify_token: registration.verify_token.into_string(),
    })
}

pub async fn verify_email<S: AuthServicePort>(
    service: &S,
    request: VerifyEmailRequest,
) -> Result<MessageResponse, Status> {
    service
        .verify_email(&request.token, request.send_email)
        .await?;
    Ok(message("Email verified"))
}

pub async fn resend_verification<S: AuthServicePort>(
    service: &S,
    verify_email_url: &str,
    request: ResendVerificationRequest,
) -> Result<MessageResponse, Status> {
    service
        .resend_verification(&request.email, verify_email_url)
        .await?;
    Ok(message("Verification email sent"))
}

pub async fn password_reset<S: AuthServicePort>(
    service: &S,
    request: PasswordResetRequest,
) -> Result<MessageResponse, Status> {
    service
        .password_reset(PasswordResetCommand {
            email: request.email,
            username: request.username,
        })
        .await?;
    Ok(message("Password reset email sent"))
}

pub async fn password_reset_confirm<S: AuthServicePort>(
    service: &S,
    request: PasswordResetConfirmRequest,
) -> Result<MessageResponse, Status> {
    if request.new_password != request.new_password_confirm {
        return Err(Status::invalid_argument(
            "Password confirmation does not match",
        ));
    }

    let new_password = Password::new(request.new_password).map_err(AuthError::from)?;
    service
        .password_reset_confirm(&request.token, new_password)
        .await?;
    Ok(message("Password has been reset"))
}
