use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use auth::SecretToken;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::account::errors::AccountIdError;
use crate::domain::account::errors::EmailError;
use crate::domain::account::errors::PasswordPolicyError;
use crate::domain::account::errors::UsernameError;

/// Account aggregate entity.
///
/// One registered user, including its verification and password reset state.
/// The password is only ever held as a one-way hash.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub email: EmailAddress,
    pub username: Username,
    pub password_hash: String,
    pub email_verified: bool,
    pub verify_token: Option<String>,
    pub reset_token: Option<String>,
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Verification lifecycle of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    PendingVerification,
    Verified,
}

/// Password reset lifecycle of an account at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStatus {
    None,
    Requested,
    Expired,
}

impl Account {
    pub fn status(&self) -> AccountStatus {
        if self.email_verified {
            AccountStatus::Verified
        } else {
            AccountStatus::PendingVerification
        }
    }

    /// Reset state as seen at `now`.
    ///
    /// A request is expired once `now` is strictly past its expiry.
    pub fn reset_status(&self, now: DateTime<Utc>) -> ResetStatus {
        match (&self.reset_token, self.reset_token_expires_at) {
            (Some(_), Some(expires_at)) if now > expires_at => ResetStatus::Expired,
            (Some(_), Some(_)) => ResetStatus::Requested,
            // A token without an expiry cannot be honoured.
            (Some(_), None) => ResetStatus::Expired,
            (None, _) => ResetStatus::None,
        }
    }
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an account ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        Uuid::parse_str(s)
            .map(AccountId)
            .map_err(|e| AccountIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Display name, not unique. 3-32 characters: alphanumeric, underscore, and hyphen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 32;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 32 characters
    /// * `InvalidCharacters` - Contains non-alphanumeric characters (except _ and -)
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = Self::with_valid_length(username)?;
        let username = Self::with_valid_chars(username)?;
        Ok(Self(username))
    }

    fn with_valid_length(username: String) -> Result<String, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(username)
        }
    }

    fn with_valid_chars(username: String) -> Result<String, UsernameError> {
        if username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            Ok(username)
        } else {
            Err(UsernameError::InvalidCharacters)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validated with an RFC 5322 parser. Stored exactly as given; case policy
/// belongs to the credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted from a caller, before hashing.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 6;

    /// # Errors
    /// * `TooShort` - Fewer than 6 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Fields the credential store needs to create an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: EmailAddress,
    pub username: Username,
    pub password_hash: String,
}

/// Command to register a new account
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub username: Username,
    pub password: Password,
    /// Send the verification message after the account is stored
    pub notify: bool,
    /// Base link the verification token is appended to
    pub verify_link: String,
}

impl RegisterCommand {
    pub fn new(
        email: EmailAddress,
        username: Username,
        password: Password,
        notify: bool,
        verify_link: impl Into<String>,
    ) -> Self {
        Self {
            email,
            username,
            password,
            notify,
            verify_link: verify_link.into(),
        }
    }
}

/// Command to log in with email and password.
///
/// Fields are raw: a malformed email is just another failed login.
#[derive(Debug)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// Command to request a password reset link
#[derive(Debug)]
pub struct PasswordResetCommand {
    pub email: String,
    pub username: String,
}

/// Outcome of a registration.
#[derive(Debug, Clone)]
pub struct Registration {
    pub account: Account,
    pub verify_token: SecretToken,
}

/// Access and refresh tokens issued by a login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_in: Duration,
    pub refresh_expires_in: Duration,
}

/// A new access token issued from a refresh token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    pub access_token: String,
    pub expires_in: Duration,
}

/// A rendered message for the notification channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub from: String,
    pub to: String,
    pub subject: String,
    /// Pre-rendered HTML
    pub html_body: String,
}
