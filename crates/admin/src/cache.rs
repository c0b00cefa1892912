//! Rendered page cache.
//!
//! List pages are cached by path and query string. Mutations call
//! [`PageCache::revalidate_path`] so the next request re-renders from the
//! database.
//!
//! Every revalidation bumps a generation counter. A page rendered from reads
//! that started before the bump is never stored, so a slow render cannot
//! resurrect a view a mutation already invalidated.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;

const MAX_ENTRIES: u64 = 1_000;

/// Cache of rendered HTML pages keyed by request path and query.
#[derive(Clone)]
pub struct PageCache {
    pages: Cache<String, String>,
    generation: Arc<AtomicU64>,
}

impl PageCache {
    /// Create a cache whose entries expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let pages = Cache::builder()
            .max_capacity(MAX_ENTRIES)
            .time_to_live(ttl)
            .support_invalidation_closures()
            .build();

        Self {
            pages,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Cache key for a path and its query parameters.
    #[must_use]
    pub fn key(path: &str, query: &str, page: u32) -> String {
        format!("{path}?query={query}&page={page}")
    }

    /// Look up a rendered page.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.pages.get(key).await
    }

    /// Current revalidation generation. Capture it before reading the data
    /// a page is rendered from and hand it back to [`insert`](Self::insert).
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Store a page rendered at `generation`.
    ///
    /// The page is dropped when a revalidation happened since `generation`
    /// was captured. Returns whether the page was kept.
    pub async fn insert(&self, key: String, html: String, generation: u64) -> bool {
        if self.generation() != generation {
            tracing::debug!(key = %key, "Discarding page rendered before revalidation");
            return false;
        }

        self.pages.insert(key.clone(), html).await;

        // A revalidation may have landed between the check and the insert.
        if self.generation() != generation {
            self.pages.invalidate(&key).await;
            return false;
        }

        true
    }

    /// Evict every cached page under `path`.
    ///
    /// Entries are hidden from [`get`](Self::get) as soon as this returns,
    /// even though moka removes them in the background.
    pub fn revalidate_path(&self, path: &str) {
        self.generation.fetch_add(1, Ordering::AcqRel);

        let prefix = path.to_owned();
        match self
            .pages
            .invalidate_entries_if(move |key, _| is_under(key, &prefix))
        {
            Ok(_) => tracing::debug!(path, "Revalidated cached pages"),
            Err(e) => {
                // Should not happen: the builder enables invalidation closures.
                tracing::error!(path, error = %e, "Failed to revalidate cached pages");
                self.pages.invalidate_all();
            }
        }
    }
}

impl std::fmt::Debug for PageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageCache")
            .field("entries", &self.pages.entry_count())
            .field("generation", &self.generation())
            .finish()
    }
}

fn is_under(key: &str, path: &str) -> bool {
    key.strip_prefix(path)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '?']))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_under() {
        assert!(is_under("/dashboard/invoices?query=&page=1", "/dashboard/invoices"));
        assert!(is_under("/dashboard/invoices/create", "/dashboard/invoices"));
        assert!(is_under("/dashboard/invoices", "/dashboard/invoices"));
        assert!(!is_under("/dashboard/invoices-archive", "/dashboard/invoices"));
        assert!(!is_under("/dashboard/customers", "/dashboard/invoices"));
    }

    #[tokio::test]
    async fn test_revalidate_evicts_only_matching_paths() {
        let cache = PageCache::new(Duration::from_secs(60));
        let invoices = PageCache::key("/dashboard/invoices", "", 1);
        let customers = PageCache::key("/dashboard/customers", "", 1);

        let generation = cache.generation();
        cache.insert(invoices.clone(), "<table>".to_string(), generation).await;
        cache.insert(customers.clone(), "<ul>".to_string(), generation).await;
        assert_eq!(cache.get(&invoices).await.as_deref(), Some("<table>"));

        cache.revalidate_path("/dashboard/invoices");

        assert_eq!(cache.get(&invoices).await, None);
        assert_eq!(cache.get(&customers).await.as_deref(), Some("<ul>"));
    }

    #[tokio::test]
    async fn test_entries_inserted_after_revalidation_are_served() {
        let cache = PageCache::new(Duration::from_secs(60));
        let key = PageCache::key("/dashboard/invoices", "lee", 2);

        cache.revalidate_path("/dashboard/invoices");
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(cache.insert(key.clone(), "fresh".to_string(), cache.generation()).await);

        assert_eq!(cache.get(&key).await.as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_page_rendered_before_revalidation_is_not_served() {
        let cache = PageCache::new(Duration::from_secs(60));
        let key = PageCache::key("/dashboard/invoices", "", 1);

        // Render starts, then a mutation revalidates before it is stored.
        let generation = cache.generation();
        cache.revalidate_path("/dashboard/invoices");

        assert!(!cache.insert(key.clone(), "<old table>".to_string(), generation).await);
        assert_eq!(cache.get(&key).await, None);
    }

    #[test]
    fn test_clones_share_generation() {
        let cache = PageCache::new(Duration::from_secs(60));
        let clone = cache.clone();

        cache.revalidate_path("/dashboard/invoices");

        assert_eq!(clone.generation(), 1);
    }
}
