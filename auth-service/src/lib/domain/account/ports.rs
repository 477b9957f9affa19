use std::time::Duration;

use async_trait::async_trait;
use auth::SessionClaims;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::account::errors::AuthError;
use crate::domain::account::errors::CacheError;
use crate::domain::account::errors::NotificationError;
use crate::domain::account::models::AccessGrant;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::NewAccount;
use crate::domain::account::models::Notification;
use crate::domain::account::models::Password;
use crate::domain::account::models::PasswordResetCommand;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::Registration;
use crate::domain::account::models::SessionTokens;

/// Port for authentication operations consumed by transport adapters.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account and issue its verification token.
    ///
    /// The account and token are persisted before any notification is sent;
    /// a failed send is reported but not rolled back.
    ///
    /// # Errors
    /// * `DuplicateAccount` - Email is already registered
    /// * `Notification` - Verification message could not be sent
    /// * `Repository` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<Registration, AuthError>;

    /// Authenticate with email and password and open a session.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `EmailNotVerified` - Credentials are correct but email is unverified
    /// * `Cache` - Refresh token could not be recorded
    async fn login(&self, command: LoginCommand) -> Result<SessionTokens, AuthError>;

    /// Exchange the current refresh token for a new access token.
    ///
    /// # Errors
    /// * `InvalidToken` - Not a valid refresh token, or superseded/revoked
    async fn refresh(&self, refresh_token: &str) -> Result<AccessGrant, AuthError>;

    /// Decode a correctly signed, unexpired, unrevoked token of any kind.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature, expiry or revocation check failed
    async fn validate_token(&self, token: &str) -> Result<SessionClaims, AuthError>;

    /// Revoke an access token, or end the refresh session a refresh token belongs to.
    ///
    /// # Errors
    /// * `InvalidToken` - Token does not parse
    /// * `UnknownTokenType` - Token kind is neither access nor refresh
    async fn logout(&self, token: &str) -> Result<(), AuthError>;

    /// Consume a verification token and mark the email verified.
    ///
    /// # Errors
    /// * `InvalidVerifyToken` - No account holds this token
    /// * `Notification` - Welcome message failed (verification still applied)
    async fn verify_email(&self, verify_token: &str, notify: bool) -> Result<(), AuthError>;

    /// Issue a fresh verification token for an unverified account and send it.
    ///
    /// # Errors
    /// * `AccountNotFound` - No account with this email
    /// * `AlreadyVerified` - Nothing to verify
    /// * `Notification` - Message failed (new token still stored)
    async fn resend_verification(&self, email: &str, verify_link: &str) -> Result<(), AuthError>;

    /// Start a password reset and send the reset link.
    ///
    /// # Errors
    /// * `AccountNotFound` - No account with this email
    /// * `UsernameMismatch` - Username does not match the account
    /// * `Notification` - Message failed (reset token still stored)
    async fn password_reset(&self, command: PasswordResetCommand) -> Result<(), AuthError>;

    /// Complete a password reset.
    ///
    /// # Errors
    /// * `InvalidResetToken` - No account holds this token
    /// * `TokenExpired` - Reset window has passed
    async fn password_reset_confirm(
        &self,
        reset_token: &str,
        new_password: Password,
    ) -> Result<(), AuthError>;
}

/// Credential store for account records.
///
/// Implementations must make "check email then insert" atomic per email.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist a new account; the store assigns its ID.
    ///
    /// # Errors
    /// * `DuplicateAccount` - Email is already registered
    /// * `Repository` - Store operation failed
    async fn create(&self, account: NewAccount) -> Result<Account, AuthError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError>;

    async fn find_by_verify_token(&self, token: &str) -> Result<Option<Account>, AuthError>;

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<Account>, AuthError>;

    /// Replace the active verification token.
    async fn set_verify_token(&self, id: &AccountId, token: &str) -> Result<(), AuthError>;

    /// Mark the email verified and clear the verification token.
    async fn set_email_verified(&self, id: &AccountId) -> Result<(), AuthError>;

    /// Replace the active reset token and its expiry.
    async fn save_reset_token(
        &self,
        id: &AccountId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError>;

    /// Clear both reset token fields.
    async fn clear_reset_token(&self, id: &AccountId) -> Result<(), AuthError>;

    async fn update_password_hash(
        &self,
        id: &AccountId,
        password_hash: &str,
    ) -> Result<(), AuthError>;
}

/// Volatile key-value store with per-key expiry.
///
/// `set` overwrites atomically; concurrent writers converge on the last one.
#[async_trait]
pub trait SessionCache: Send + Sync + 'static {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Side channel for account messages (email, SMS, ...).
#[async_trait]
pub trait NotificationSender: Send + Sync + 'static {
    /// Deliver a message. Failures are reported synchronously, never retried here.
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError>;
}
