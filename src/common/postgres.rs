//! Blocking and column-mapping helpers shared by the Diesel adapters.
//!
//! Diesel connections are synchronous; each repository call is moved onto
//! the blocking pool so async executors are never stalled.

use super::{AbnormalInfo, PersistedAbnormalInfo};
use chrono::{DateTime, Utc};
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use thiserror::Error;
use tokio::task::JoinError;

/// `PostgreSQL` connection pool type used by every adapter.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Failure to obtain a connection or join the blocking task.
#[derive(Debug, Error)]
pub enum BlockingError {
    /// The pool could not hand out a connection.
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),
    /// The blocking task panicked or was cancelled.
    #[error("blocking task join error: {0}")]
    Join(#[from] JoinError),
}

/// Builds a pool for `database_url` with at most `max_size` connections.
///
/// # Errors
///
/// Returns [`PoolError`] when the initial connections cannot be opened.
pub fn build_pool(database_url: &str, max_size: u32) -> Result<PgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder().max_size(max_size).build(manager)
}

/// Runs `f` with a pooled connection on the blocking thread pool.
pub(crate) async fn run_blocking<F, T, E>(pool: &PgPool, f: F) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: From<BlockingError> + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(BlockingError::from)?;
        f(&mut connection)
    })
    .await
    .map_err(BlockingError::from)?
}

/// Flattened nullable columns holding an embedded [`AbnormalInfo`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct AbnormalColumns {
    pub(crate) abnormal_type: Option<String>,
    pub(crate) reason: Option<String>,
    pub(crate) handler: Option<String>,
    pub(crate) reported_at: Option<DateTime<Utc>>,
    pub(crate) handle_result: Option<String>,
}

impl AbnormalColumns {
    /// Flattens an optional abnormality into its columns.
    pub(crate) fn from_info(info: Option<&AbnormalInfo>) -> Self {
        info.map_or_else(Self::default, |present| Self {
            abnormal_type: Some(present.abnormal_type().to_owned()),
            reason: Some(present.reason().to_owned()),
            handler: Some(present.handler().to_owned()),
            reported_at: Some(present.reported_at()),
            handle_result: present.handle_result().map(str::to_owned),
        })
    }

    /// Rebuilds the abnormality; a row without a report timestamp has none.
    pub(crate) fn into_info(self) -> Option<AbnormalInfo> {
        let reported_at = self.reported_at?;
        Some(AbnormalInfo::from_persisted(PersistedAbnormalInfo {
            abnormal_type: self.abnormal_type.unwrap_or_default(),
            reason: self.reason.unwrap_or_default(),
            handler: self.handler.unwrap_or_default(),
            reported_at,
            handle_result: self.handle_result,
        }))
    }
}
