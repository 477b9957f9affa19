#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

use async_trait::async_trait;
use auth::TokenCodec;
use auth_service::domain::account::errors::AuthError;
use auth_service::domain::account::errors::CacheError;
use auth_service::domain::account::errors::NotificationError;
use auth_service::domain::account::models::Account;
use auth_service::domain::account::models::AccountId;
use auth_service::domain::account::models::NewAccount;
use auth_service::domain::account::models::Notification;
use auth_service::domain::account::ports::AccountRepository;
use auth_service::domain::account::ports::NotificationSender;
use auth_service::domain::account::ports::SessionCache;
use auth_service::domain::account::service::AuthService;
use auth_service::domain::account::service::AuthSettings;
use auth_service::inbound::http::router::create_router;
use chrono::DateTime;
use chrono::Utc;

pub const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const VERIFY_URL: &str = "http://localhost/api/v1/verify";

pub type TestAuthService =
    AuthService<InMemoryAccountRepository, InMemorySessionCache, RecordingNotifier>;

/// Credential store keyed by account ID; the lock makes email uniqueness atomic.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: Mutex<HashMap<AccountId, Account>>,
}

impl InMemoryAccountRepository {
    pub fn count(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    pub fn get_by_email(&self, email: &str) -> Option<Account> {
        self.accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.email.as_str() == email)
            .cloned()
    }

    /// Move the reset expiry of the account with `email` by `offset`.
    pub fn shift_reset_expiry(&self, email: &str, offset: chrono::Duration) {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .values_mut()
            .find(|a| a.email.as_str() == email)
            .expect("account not found");
        account.reset_token_expires_at = account.reset_token_expires_at.map(|at| at + offset);
    }

    fn find(&self, predicate: impl Fn(&Account) -> bool) -> Option<Account> {
        self.accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| predicate(a))
            .cloned()
    }

    fn update(&self, id: &AccountId, change: impl FnOnce(&mut Account)) -> Result<(), AuthError> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(id)
            .ok_or_else(|| AuthError::AccountNotFound(id.to_string()))?;
        change(account);
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: NewAccount) -> Result<Account, AuthError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.values().any(|a| a.email == account.email) {
            return Err(AuthError::DuplicateAccount(account.email.to_string()));
        }

        let created = Account {
            id: AccountId::new(),
            email: account.email,
            username: account.username,
            password_hash: account.password_hash,
            email_verified: false,
            verify_token: None,
            reset_token: None,
            reset_token_expires_at: None,
            created_at: Utc::now(),
        };
        accounts.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        Ok(self.find(|a| a.email.as_str() == email))
    }

    async fn find_by_verify_token(&self, token: &str) -> Result<Option<Account>, AuthError> {
        Ok(self.find(|a| a.verify_token.as_deref() == Some(token)))
    }

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<Account>, AuthError> {
        Ok(self.find(|a| a.reset_token.as_deref() == Some(token)))
    }

    async fn set_verify_token(&self, id: &AccountId, token: &str) -> Result<(), AuthError> {
        self.update(id, |a| a.verify_token = Some(token.to_string()))
    }

    async fn set_email_verified(&self, id: &AccountId) -> Result<(), AuthError> {
        self.update(id, |a| {
            a.email_verified = true;
            a.verify_token = None;
        })
    }

    async fn save_reset_token(
        &self,
        id: &AccountId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        self.update(id, |a| {
            a.reset_token = Some(token.to_string());
            a.reset_token_expires_at = Some(expires_at);
        })
    }

    async fn clear_reset_token(&self, id: &AccountId) -> Result<(), AuthError> {
        self.update(id, |a| {
            a.reset_token = None;
            a.reset_token_expires_at = None;
        })
    }

    async fn update_password_hash(
        &self,
        id: &AccountId,
        password_hash: &str,
    ) -> Result<(), AuthError> {
        self.update(id, |a| a.password_hash = password_hash.to_string())
    }
}

/// Session cache honouring per-key expiry.
#[derive(Default)]
pub struct InMemorySessionCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl InMemorySessionCache {
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .is_some_and(|(_, expires_at)| *expires_at > Instant::now())
    }

    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .map(|(_, expires_at)| expires_at.saturating_duration_since(Instant::now()))
    }
}

#[async_trait]
impl SessionCache for InMemorySessionCache {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Notification channel that records every message and can be told to fail.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    /// Token carried by the most recent message's link.
    pub fn last_token(&self) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        let body = &sent.last()?.html_body;
        let start = body.find("token=")? + "token=".len();
        Some(body[start..start + 64].to_string())
    }
}

#[async_trait]
impl NotificationSender for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotificationError::DeliveryFailed("relay unavailable".to_string()));
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Engine wired to in-memory ports, with handles kept for inspection.
pub struct TestContext {
    pub service: Arc<TestAuthService>,
    pub repository: Arc<InMemoryAccountRepository>,
    pub cache: Arc<InMemorySessionCache>,
    pub notifier: Arc<RecordingNotifier>,
    pub codec: TokenCodec,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_settings(AuthSettings::default())
    }

    pub fn with_settings(settings: AuthSettings) -> Self {
        let repository = Arc::new(InMemoryAccountRepository::default());
        let cache = Arc::new(InMemorySessionCache::default());
        let notifier = Arc::new(RecordingNotifier::default());

        let service = Arc::new(AuthService::new(
            Arc::clone(&repository),
            Arc::clone(&cache),
            Arc::clone(&notifier),
            TokenCodec::new(SECRET),
            settings,
        ));

        Self {
            service,
            repository,
            cache,
            notifier,
            codec: TokenCodec::new(SECRET),
        }
    }
}

/// Test application that spawns a real HTTP server over in-memory ports
pub struct TestApp {
    pub address: String,
    pub context: TestContext,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let context = TestContext::new();

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let router = create_router(
            Arc::clone(&context.service),
            VERIFY_URL.to_string(),
            Duration::from_secs(5),
        );

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            context,
            api_client: reqwest::Client::new(),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Register and verify an account, returning nothing but a usable login.
    pub async fn verified_account(&self, email: &str, username: &str, password: &str) {
        let response = self
            .post("/api/v1/register")
            .json(&serde_json::json!({
                "email": email,
                "username": username,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let token = self
            .context
            .notifier
            .last_token()
            .expect("verification message not sent");
        let response = self
            .get(&format!("/api/v1/verify?token={}&sendEmail=false", token))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);
    }

    /// Log in and return `(access_token, refresh_token)`.
    pub async fn login(&self, email: &str, password: &str) -> (String, String) {
        let response = self
            .post("/api/v1/login")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        (
            body["data"]["access_token"].as_str().unwrap().to_string(),
            body["data"]["refresh_token"].as_str().unwrap().to_string(),
        )
    }
}
