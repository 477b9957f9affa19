use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::JwtError;
use auth::PasswordHasher;
use auth::SecretToken;
use auth::SessionClaims;
use auth::TokenCodec;
use auth::TokenKind;
use chrono::Utc;

use crate::domain::account::errors::AuthError;
use crate::domain::account::messages;
use crate::domain::account::models::AccessGrant;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountStatus;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::NewAccount;
use crate::domain::account::models::Notification;
use crate::domain::account::models::Password;
use crate::domain::account::models::PasswordResetCommand;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::Registration;
use crate::domain::account::models::ResetStatus;
use crate::domain::account::models::SessionTokens;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::AuthServicePort;
use crate::domain::account::ports::NotificationSender;
use crate::domain::account::ports::SessionCache;

/// Lifetimes and addresses the engine needs at runtime.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub reset_token_ttl: Duration,
    /// `from` address of every notification
    pub sender_address: String,
    /// Base link the reset token is appended to
    pub reset_password_url: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            access_ttl: Duration::from_secs(60 * 60),
            refresh_ttl: Duration::from_secs(72 * 60 * 60),
            reset_token_ttl: Duration::from_secs(60 * 60),
            sender_address: "no-reply@localhost".to_string(),
            reset_password_url: "http://localhost:8080/api/v1/password-reset-confirm".to_string(),
        }
    }
}

/// Authentication engine.
///
/// Stateless apart from the injected ports and the signing secret held by the
/// codec; every consistency guarantee is delegated to the store and cache.
pub struct AuthService<AR, SC, NS>
where
    AR: AccountRepository,
    SC: SessionCache,
    NS: NotificationSender,
{
    repository: Arc<AR>,
    cache: Arc<SC>,
    notifier: Arc<NS>,
    codec: TokenCodec,
    password_hasher: PasswordHasher,
    settings: AuthSettings,
}

fn refresh_token_key(account_id: &str) -> String {
    format!("refresh_token:{}", account_id)
}

fn blacklist_key(access_token: &str) -> String {
    format!("blacklist:{}", access_token)
}

impl<AR, SC, NS> AuthService<AR, SC, NS>
where
    AR: AccountRepository,
    SC: SessionCache,
    NS: NotificationSender,
{
    /// Create a new engine with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store
    /// * `cache` - Session cache for refresh tokens and revocations
    /// * `notifier` - Outbound message channel
    /// * `codec` - Session token codec owning the signing secret
    /// * `settings` - Token lifetimes and message addresses
    pub fn new(
        repository: Arc<AR>,
        cache: Arc<SC>,
        notifier: Arc<NS>,
        codec: TokenCodec,
        settings: AuthSettings,
    ) -> Self {
        Self {
            repository,
            cache,
            notifier,
            codec,
            password_hasher: PasswordHasher::new(),
            settings,
        }
    }

    fn parse(&self, token: &str) -> Result<SessionClaims, AuthError> {
        self.codec.parse(token).map_err(|e| {
            tracing::debug!(error = %e, "Session token rejected");
            AuthError::InvalidToken
        })
    }

    fn mint(
        &self,
        subject: &str,
        email: &str,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<auth::MintedToken, AuthError> {
        self.codec
            .mint(subject, email, kind, ttl)
            .map_err(|e: JwtError| AuthError::Internal(format!("Token signing failed: {}", e)))
    }

    async fn notify(&self, account: &Account, notification: Notification) -> Result<(), AuthError> {
        self.notifier.send(&notification).await.map_err(|e| {
            tracing::error!(
                account_id = %account.id,
                subject = %notification.subject,
                error = %e,
                "Failed to send notification"
            );
            AuthError::from(e)
        })
    }
}

#[async_trait]
impl<AR, SC, NS> AuthServicePort for AuthService<AR, SC, NS>
where
    AR: AccountRepository,
    SC: SessionCache,
    NS: NotificationSender,
{
    async fn register(&self, command: RegisterCommand) -> Result<Registration, AuthError> {
        let password_hash = self.password_hasher.hash(command.password.expose())?;

        let account = self
            .repository
            .create(NewAccount {
                email: command.email,
                username: command.username,
                password_hash,
            })
            .await?;

        let verify_token = SecretToken::generate();
        self.repository
            .set_verify_token(&account.id, verify_token.as_str())
            .await?;

        let mut account = account;
        account.verify_token = Some(verify_token.as_str().to_string());
        tracing::info!(account_id = %account.id, "Account registered");

        if command.notify {
            let notification = messages::verification(
                &self.settings.sender_address,
                &account,
                &command.verify_link,
                verify_token.as_str(),
            );
            self.notify(&account, notification).await?;
        }

        Ok(Registration {
            account,
            verify_token,
        })
    }

    async fn login(&self, command: LoginCommand) -> Result<SessionTokens, AuthError> {
        let Some(account) = self.repository.find_by_email(&command.email).await? else {
            // Same hashing cost as a wrong password, so timing does not reveal the email.
            self.password_hasher.verify_absent(&command.password);
            return Err(AuthError::InvalidCredentials);
        };

        if !self
            .password_hasher
            .verify(&command.password, &account.password_hash)?
        {
            tracing::debug!(account_id = %account.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        if account.status() == AccountStatus::PendingVerification {
            return Err(AuthError::EmailNotVerified);
        }

        let subject = account.id.to_string();
        let access = self.mint(
            &subject,
            account.email.as_str(),
            TokenKind::Access,
            self.settings.access_ttl,
        )?;
        let refresh = self.mint(
            &subject,
            account.email.as_str(),
            TokenKind::Refresh,
            self.settings.refresh_ttl,
        )?;

        // Overwrites any previous session's refresh token.
        self.cache
            .set(&refresh_token_key(&subject), &refresh.token, refresh.expires_in)
            .await?;

        tracing::info!(account_id = %account.id, "Session opened");

        Ok(SessionTokens {
            access_token: access.token,
            refresh_token: refresh.token,
            access_expires_in: access.expires_in,
            refresh_expires_in: refresh.expires_in,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AccessGrant, AuthError> {
        let claims = self.parse(refresh_token)?;
        if claims.kind() != TokenKind::Refresh {
            return Err(AuthError::InvalidToken);
        }

        let stored = self.cache.get(&refresh_token_key(&claims.sub)).await?;
        if stored.as_deref() != Some(refresh_token) {
            tracing::debug!(account_id = %claims.sub, "Refresh token superseded or revoked");
            return Err(AuthError::InvalidToken);
        }

        let access = self.mint(
            &claims.sub,
            &claims.email,
            TokenKind::Access,
            self.settings.access_ttl,
        )?;

        Ok(AccessGrant {
            access_token: access.token,
            expires_in: access.expires_in,
        })
    }

    async fn validate_token(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let claims = self.parse(token)?;

        if claims.kind() == TokenKind::Access && self.cache.get(&blacklist_key(token)).await?.is_some()
        {
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }

    async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let claims = self.parse(token)?;

        match claims.kind() {
            TokenKind::Access => {
                // The marker lives exactly as long as the token would have.
                let ttl = claims
                    .remaining(Utc::now().timestamp())
                    .max(Duration::from_secs(1));
                self.cache.set(&blacklist_key(token), "1", ttl).await?;
                tracing::info!(account_id = %claims.sub, "Access token revoked");
            }
            TokenKind::Refresh => {
                self.cache.delete(&refresh_token_key(&claims.sub)).await?;
                tracing::info!(account_id = %claims.sub, "Refresh session ended");
            }
            TokenKind::Unknown => return Err(AuthError::UnknownTokenType),
        }

        Ok(())
    }

    async fn verify_email(&self, verify_token: &str, notify: bool) -> Result<(), AuthError> {
        let account = self
            .repository
            .find_by_verify_token(verify_token)
            .await?
            .ok_or(AuthError::InvalidVerifyToken)?;

        self.repository.set_email_verified(&account.id).await?;
        tracing::info!(account_id = %account.id, "Email verified");

        if notify {
            let notification = messages::welcome(&self.settings.sender_address, &account);
            self.notify(&account, notification).await?;
        }

        Ok(())
    }

    async fn resend_verification(&self, email: &str, verify_link: &str) -> Result<(), AuthError> {
        let account = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| AuthError::AccountNotFound(email.to_string()))?;

        if account.status() == AccountStatus::Verified {
            return Err(AuthError::AlreadyVerified);
        }

        let verify_token = SecretToken::generate();
        self.repository
            .set_verify_token(&account.id, verify_token.as_str())
            .await?;
        tracing::info!(account_id = %account.id, "Verification token reissued");

        let notification = messages::verification(
            &self.settings.sender_address,
            &account,
            verify_link,
            verify_token.as_str(),
        );
        self.notify(&account, notification).await
    }

    async fn password_reset(&self, command: PasswordResetCommand) -> Result<(), AuthError> {
        let account = self
            .repository
            .find_by_email(&command.email)
            .await?
            .ok_or_else(|| AuthError::AccountNotFound(command.email.clone()))?;

        if account.username.as_str() != command.username {
            return Err(AuthError::UsernameMismatch);
        }

        let reset_token = SecretToken::generate();
        let expires_at = Utc::now()
            + chrono::Duration::from_std(self.settings.reset_token_ttl)
                .map_err(|e| AuthError::Internal(e.to_string()))?;

        self.repository
            .save_reset_token(&account.id, reset_token.as_str(), expires_at)
            .await?;
        tracing::info!(account_id = %account.id, %expires_at, "Password reset requested");

        let notification = messages::password_reset(
            &self.settings.sender_address,
            &account,
            &self.settings.reset_password_url,
            reset_token.as_str(),
        );
        self.notify(&account, notification).await
    }

    async fn password_reset_confirm(
        &self,
        reset_token: &str,
        new_password: Password,
    ) -> Result<(), AuthError> {
        let account = self
            .repository
            .find_by_reset_token(reset_token)
            .await?
            .ok_or(AuthError::InvalidResetToken)?;

        match account.reset_status(Utc::now()) {
            ResetStatus::Requested => {}
            ResetStatus::Expired => return Err(AuthError::TokenExpired),
            ResetStatus::None => return Err(AuthError::InvalidResetToken),
        }

        let password_hash = self.password_hasher.hash(new_password.expose())?;
        self.repository
            .update_password_hash(&account.id, &password_hash)
            .await?;
        self.repository.clear_reset_token(&account.id).await?;

        // Sessions opened before the reset stay valid until they expire.
        tracing::info!(account_id = %account.id, "Password reset completed");

        Ok(())
    }
}
