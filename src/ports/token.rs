//! Shared API token cache with single-flight refresh.
//!
//! Channel-manager APIs hand out short-lived tokens. The cache is an
//! injected collaborator with an explicit `get_valid_token()` contract
//! instead of module-level mutable state. Concurrent callers that find
//! the token expired collapse into a single in-flight refresh: the async
//! mutex is held across the refresh await, so waiters observe the fresh
//! token instead of issuing their own refresh.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::error::EngineError;

/// A token with its expiry instant.
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The bearer token value.
    pub value: String,
    /// Instant after which the token must not be used.
    pub expires_at: DateTime<Utc>,
}

/// Performs the actual refresh round-trip (HTTP, credential exchange).
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Obtains a fresh token from the upstream API.
    async fn refresh(&self) -> Result<CachedToken, EngineError>;
}

/// Cache for one token kind, refreshed on demand.
pub struct TokenCache {
    refresher: Arc<dyn TokenRefresher>,
    slot: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache").finish_non_exhaustive()
    }
}

impl TokenCache {
    /// Creates an empty cache backed by the given refresher.
    #[must_use]
    pub fn new(refresher: Arc<dyn TokenRefresher>) -> Self {
        Self {
            refresher,
            slot: Mutex::new(None),
        }
    }

    /// Returns a token valid at `now`, refreshing if needed.
    ///
    /// # Errors
    ///
    /// Propagates the refresher's error when a refresh is required and
    /// fails; the slot is left as-is so the next caller retries.
    pub async fn get_valid_token(&self, now: DateTime<Utc>) -> Result<String, EngineError> {
        let mut slot = self.slot.lock().await;
        if let Some(token) = slot.as_ref()
            && token.expires_at > now
        {
            return Ok(token.value.clone());
        }
        // Lock held across the await: concurrent expiries wait here and
        // then hit the freshly-cached token above.
        let fresh = self.refresher.refresh().await?;
        let value = fresh.value.clone();
        *slot = Some(fresh);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingRefresher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TokenRefresher for CountingRefresher {
        async fn refresh(&self) -> Result<CachedToken, EngineError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(CachedToken {
                value: format!("token-{n}"),
                expires_at: Utc::now() + chrono::Duration::hours(1),
            })
        }
    }

    #[tokio::test]
    async fn cached_token_is_reused_until_expiry() {
        let refresher = Arc::new(CountingRefresher {
            calls: AtomicUsize::new(0),
        });
        let cache = TokenCache::new(Arc::<CountingRefresher>::clone(&refresher));

        let first = cache.get_valid_token(Utc::now()).await;
        let second = cache.get_valid_token(Utc::now()).await;
        assert_eq!(first.ok(), second.ok());
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_expiries_collapse_into_one_refresh() {
        let refresher = Arc::new(CountingRefresher {
            calls: AtomicUsize::new(0),
        });
        let cache = Arc::new(TokenCache::new(Arc::<CountingRefresher>::clone(&refresher)));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(
                async move { cache.get_valid_token(Utc::now()).await },
            ));
        }
        for handle in handles {
            let result = handle.await;
            assert!(matches!(result, Ok(Ok(_))));
        }
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_token_triggers_refresh() {
        let refresher = Arc::new(CountingRefresher {
            calls: AtomicUsize::new(0),
        });
        let cache = TokenCache::new(Arc::<CountingRefresher>::clone(&refresher));

        let _ = cache.get_valid_token(Utc::now()).await;
        // Ask for a token valid two hours from now: the cached one expired.
        let later = Utc::now() + chrono::Duration::hours(2);
        let refreshed = cache.get_valid_token(later).await;
        assert!(refreshed.is_ok());
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 2);
    }
}
