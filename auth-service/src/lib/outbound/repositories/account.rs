use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::account::errors::AuthError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::NewAccount;
use crate::domain::account::models::Username;
use crate::domain::account::ports::AccountRepository;

const EMAIL_UNIQUE_CONSTRAINT: &str = "accounts_email_key";

const ACCOUNT_COLUMNS: &str = "id, email, username, password_hash, email_verified, \
     verify_token, reset_token, reset_token_expires_at, created_at";

/// Credential store backed by the `accounts` table.
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_by_column(&self, column: &str, value: &str) -> Result<Option<Account>, AuthError> {
        let query = format!("SELECT {} FROM accounts WHERE {} = $1", ACCOUNT_COLUMNS, column);

        sqlx::query_as::<_, AccountRow>(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?
            .map(Account::try_from)
            .transpose()
    }

    fn expect_updated(
        id: &AccountId,
        result: Result<sqlx::postgres::PgQueryResult, sqlx::Error>,
    ) -> Result<(), AuthError> {
        let result = result.map_err(database_error)?;
        if result.rows_affected() == 0 {
            return Err(AuthError::AccountNotFound(id.to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    username: String,
    password_hash: String,
    email_verified: bool,
    verify_token: Option<String>,
    reset_token: Option<String>,
    reset_token_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = AuthError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: AccountId(row.id),
            email: EmailAddress::new(row.email)?,
            username: Username::new(row.username)?,
            password_hash: row.password_hash,
            email_verified: row.email_verified,
            verify_token: row.verify_token,
            reset_token: row.reset_token,
            reset_token_expires_at: row.reset_token_expires_at,
            created_at: row.created_at,
        })
    }
}

fn database_error(e: sqlx::Error) -> AuthError {
    AuthError::Repository(e.to_string())
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create(&self, account: NewAccount) -> Result<Account, AuthError> {
        let query = format!(
            "INSERT INTO accounts (id, email, username, password_hash, email_verified, created_at) \
             VALUES ($1, $2, $3, $4, FALSE, $5) \
             RETURNING {}",
            ACCOUNT_COLUMNS
        );

        // The unique constraint makes check-then-insert atomic per email.
        let row = sqlx::query_as::<_, AccountRow>(&query)
            .bind(Uuid::new_v4())
            .bind(account.email.as_str())
            .bind(account.username.as_str())
            .bind(&account.password_hash)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation()
                        && db_err.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT)
                    {
                        return AuthError::DuplicateAccount(account.email.to_string());
                    }
                }
                database_error(e)
            })?;

        Account::try_from(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        self.find_by_column("email", email).await
    }

    async fn find_by_verify_token(&self, token: &str) -> Result<Option<Account>, AuthError> {
        self.find_by_column("verify_token", token).await
    }

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<Account>, AuthError> {
        self.find_by_column("reset_token", token).await
    }

    async fn set_verify_token(&self, id: &AccountId, token: &str) -> Result<(), AuthError> {
        let result = sqlx::query("UPDATE accounts SET verify_token = $2 WHERE id = $1")
            .bind(id.0)
            .bind(token)
            .execute(&self.pool)
            .await;

        Self::expect_updated(id, result)
    }

    async fn set_email_verified(&self, id: &AccountId) -> Result<(), AuthError> {
        let result = sqlx::query(
            "UPDATE accounts SET email_verified = TRUE, verify_token = NULL WHERE id = $1",
        )
        .bind(id.0)
        .execute(&self.pool)
        .await;

        Self::expect_updated(id, result)
    }

    async fn save_reset_token(
        &self,
        id: &AccountId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let result = sqlx::query(
            "UPDATE accounts SET reset_token = $2, reset_token_expires_at = $3 WHERE id = $1",
        )
        .bind(id.0)
        .bind(token)
        .bind(expires_at)
        .execute(&self.pool)
        .await;

        Self::expect_updated(id, result)
    }

    async fn clear_reset_token(&self, id: &AccountId) -> Result<(), AuthError> {
        let result = sqlx::query(
            "UPDATE accounts SET reset_token = NULL, reset_token_expires_at = NULL WHERE id = $1",
        )
        .bind(id.0)
        .execute(&self.pool)
        .await;

        Self::expect_updated(id, result)
    }

    async fn update_password_hash(
        &self,
        id: &AccountId,
        password_hash: &str,
    ) -> Result<(), AuthError> {
        let result = sqlx::query("UPDATE accounts SET password_hash = $2 WHERE id = $1")
            .bind(id.0)
            .bind(password_hash)
            .execute(&self.pool)
            .await;

        Self::expect_updated(id, result)
    }
}
