//! PostgreSQL connection pool shared by the Diesel repositories.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use tracing::debug;

/// Pool failure, carrying the underlying cause as text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection became free before the acquire timeout.
    #[error("no database connection available: {0}")]
    Checkout(String),
    /// The pool could not be created, usually a bad URL.
    #[error("database pool could not be built: {0}")]
    Build(String),
}

impl PoolError {
    pub fn checkout(cause: impl Into<String>) -> Self {
        Self::Checkout(cause.into())
    }

    pub fn build(cause: impl Into<String>) -> Self {
        Self::Build(cause.into())
    }

    /// The underlying cause without the prefix.
    pub fn cause(&self) -> &str {
        match self {
            Self::Checkout(cause) | Self::Build(cause) => cause,
        }
    }
}

/// Sizing for [`DbPool`].
///
/// A dispatch run holds a connection only while flagging one recipient, so
/// the pool can stay smaller than the dispatch concurrency limit.
///
/// ```
/// use std::time::Duration;
/// use backend::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://localhost/conference")
///     .with_max_size(4)
///     .with_acquire_timeout(Duration::from_secs(5));
/// assert_eq!(config.max_size(), 4);
/// assert_eq!(config.min_idle(), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    url: String,
    max_size: u32,
    min_idle: Option<u32>,
    acquire_timeout: Duration,
}

impl PoolConfig {
    const DEFAULT_MAX_SIZE: u32 = 10;
    const DEFAULT_MIN_IDLE: u32 = 2;
    const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_size: Self::DEFAULT_MAX_SIZE,
            min_idle: Some(Self::DEFAULT_MIN_IDLE),
            acquire_timeout: Self::DEFAULT_ACQUIRE_TIMEOUT,
        }
    }

    /// Cap the pool at `max_size` connections (at least one). The idle floor
    /// never exceeds the cap.
    #[must_use]
    pub fn with_max_size(self, max_size: u32) -> Self {
        let max_size = max_size.max(1);
        Self {
            max_size,
            min_idle: self.min_idle.map(|idle| idle.min(max_size)),
            ..self
        }
    }

    #[must_use]
    pub fn with_acquire_timeout(self, acquire_timeout: Duration) -> Self {
        Self {
            acquire_timeout,
            ..self
        }
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    pub fn min_idle(&self) -> Option<u32> {
        self.min_idle
    }
}

/// Cloneable handle over a bb8 pool of async Diesel connections.
#[derive(Clone)]
pub struct DbPool(Pool<AsyncPgConnection>);

impl DbPool {
    /// # Errors
    ///
    /// [`PoolError::Build`] when bb8 refuses the configuration or the first
    /// idle connections cannot be opened.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let PoolConfig {
            url,
            max_size,
            min_idle,
            acquire_timeout,
        } = config;
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(url);
        let pool = Pool::builder()
            .max_size(max_size)
            .min_idle(min_idle)
            .connection_timeout(acquire_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;
        debug!(max_size, ?min_idle, "database pool ready");
        Ok(Self(pool))
    }

    /// # Errors
    ///
    /// [`PoolError::Checkout`] once the acquire timeout passes.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.0
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}
