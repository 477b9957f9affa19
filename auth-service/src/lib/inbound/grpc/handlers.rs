use auth::SessionClaims;
use tonic::Status;

use crate::domain::account::errors::AuthError;
use crate::domain::account::models::Account;

pub mod account;
pub mod session;

impl From<AuthError> for Status {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateAccount(_) | AuthError::AlreadyVerified => {
                Status::already_exists(err.to_string())
            }
            AuthError::AccountNotFound(_) => Status::not_found(err.to_string()),
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::UnknownTokenType => Status::unauthenticated(err.to_string()),
            AuthError::EmailNotVerified => Status::permission_denied(err.to_string()),
            AuthError::InvalidVerifyToken
            | AuthError::InvalidResetToken
            | AuthError::TokenExpired
            | AuthError::UsernameMismatch
            | AuthError::InvalidAccountId(_)
            | AuthError::InvalidUsername(_)
            | AuthError::InvalidEmail(_)
            | AuthError::InvalidPassword(_) => Status::invalid_argument(err.to_string()),
            AuthError::Repository(_)
            | AuthError::Cache(_)
            | AuthError::Notification(_)
            | AuthError::Internal(_) => {
                tracing::error!(error = %err, "gRPC request failed");
                Status::internal("Internal server error")
            }
        }
    }
}

impl From<&Account> for crate::proto::Account {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            email: account.email.as_str().to_string(),
            username: account.username.as_str().to_string(),
            email_verified: account.email_verified,
            created_at: account.created_at.to_rfc3339(),
        }
    }
}

impl From<&SessionClaims> for crate::proto::Claims {
    fn from(claims: &SessionClaims) -> Self {
        Self {
            account_id: claims.sub.clone(),
            email: claims.email.clone(),
            token_type: claims.kind().to_string(),
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }
}

fn message(text: &str) -> crate::proto::MessageResponse {
    crate::proto::MessageResponse {
        message: text.to_string(),
    }
}

fn seconds(duration: std::time::Duration) -> i64 {
    i64::try_from(duration.as_secs()).unwrap_or(i64::MAX)
}
