//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::cache::PageCache;
use crate::config::AdminConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pool: PgPool,
    page_cache: PageCache,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: &AdminConfig, pool: PgPool) -> Self {
        let page_cache = PageCache::new(config.page_cache_ttl);

        Self {
            inner: Arc::new(AppStateInner {
                pool,
                page_cache,
            }),
        }
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the rendered page cache.
    #[must_use]
    pub fn page_cache(&self) -> &PageCache {
        &self.inner.page_cache
    }
}
