use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use redis::RedisError;

use crate::domain::account::errors::CacheError;
use crate::domain::account::ports::SessionCache;

/// Session cache backed by Redis.
///
/// The connection manager reconnects on its own and is cheap to clone, so
/// each command works on a clone of the shared handle.
#[derive(Clone)]
pub struct RedisSessionCache {
    connection: ConnectionManager,
}

impl RedisSessionCache {
    /// Connect to Redis at `url` (`redis://host:port/db`).
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url).map_err(connection_error)?;
        let connection = ConnectionManager::new(client)
            .await
            .map_err(connection_error)?;

        tracing::info!(cache = "redis", "Session cache connected");

        Ok(Self { connection })
    }
}

fn connection_error(e: RedisError) -> CacheError {
    CacheError::ConnectionFailed(e.to_string())
}

fn command_error(e: RedisError) -> CacheError {
    if e.is_connection_refusal() || e.is_connection_dropped() || e.is_timeout() {
        CacheError::ConnectionFailed(e.to_string())
    } else {
        CacheError::CommandFailed(e.to_string())
    }
}

/// `SET EX` takes whole seconds; round up so an entry never dies early.
fn ttl_seconds(ttl: Duration) -> u64 {
    let seconds = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    seconds.max(1)
}

#[async_trait]
impl SessionCache for RedisSessionCache {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut connection = self.connection.clone();
        connection
            .set_ex::<_, _, ()>(key, value, ttl_seconds(ttl))
            .await
            .map_err(command_error)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut connection = self.connection.clone();
        connection
            .get::<_, Option<String>>(key)
            .await
            .map_err(command_error)
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut connection = self.connection.clone();
        connection.del::<_, ()>(key).await.map_err(command_error)
    }
}
