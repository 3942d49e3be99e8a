use std::ops::{Deref, DerefMut};

use axum::{extract::FromRequestParts, http::request::Parts};
use diesel::{
    SqliteConnection,
    r2d2::{ConnectionManager, Pool, PooledConnection},
};

use crate::util_resp::ApiError;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// A pooled database connection, checked out once per request.
///
/// Checkout goes through the blocking pool so that a saturated connection
/// pool does not stall the async executor.
pub struct Conn {
    inner: PooledConnection<ConnectionManager<SqliteConnection>>,
}

impl Deref for Conn {
    type Target = PooledConnection<ConnectionManager<SqliteConnection>>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for Conn {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

#[axum::async_trait]
impl FromRequestParts<DbPool> for Conn {
    type Rejection = ApiError;

    async fn from_request_parts(
        _parts: &mut Parts,
        pool: &DbPool,
    ) -> Result<Self, Self::Rejection> {
        let pool = pool.clone();
        let inner = tokio::task::spawn_blocking(move || pool.get())
            .await
            .unwrap()
            .map_err(|e| ApiError::Persistence(e.to_string()))?;

        Ok(Conn { inner })
    }
}
