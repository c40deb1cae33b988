//! Short-lived platform session cache
//!
//! One authentication exchange serves all components until the freshness
//! window lapses. The window (25 minutes by default) is deliberately
//! shorter than the platform's token lifetime.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::config::PlatformConfig;
use crate::error::AppResult;
use crate::external::platform::{PlatformApi, Session};

/// Process-wide cache of the platform session, shared across concurrent
/// requests.
///
/// The cached value is an immutable snapshot behind a lock that guards
/// only the pointer swap. Refresh is not serialized: concurrent stale
/// callers may each authenticate, and the cache keeps whichever result
/// lands last. Any valid session is equally usable.
pub struct SessionCache {
    platform: Arc<dyn PlatformApi>,
    ttl: Duration,
    current: RwLock<Option<Arc<Session>>>,
}

impl SessionCache {
    pub fn new(platform: Arc<dyn PlatformApi>, ttl: Duration) -> Self {
        Self {
            platform,
            ttl,
            current: RwLock::new(None),
        }
    }

    pub fn from_config(platform: Arc<dyn PlatformApi>, config: &PlatformConfig) -> Self {
        Self::new(platform, Duration::from_secs(config.session_ttl_minutes * 60))
    }

    /// Return the cached session while it is inside the freshness window,
    /// authenticating only when it is stale or absent.
    pub async fn acquire(&self) -> AppResult<Arc<Session>> {
        if let Some(session) = self.cached_fresh().await {
            return Ok(session);
        }
        self.refresh().await
    }

    /// Unconditionally authenticate and replace the cached session. Used
    /// when the platform rejects a bearer token before the window lapses.
    pub async fn force_refresh(&self) -> AppResult<Arc<Session>> {
        self.refresh().await
    }

    /// Whether a usable session is currently cached
    pub async fn has_fresh_session(&self) -> bool {
        self.cached_fresh().await.is_some()
    }

    async fn cached_fresh(&self) -> Option<Arc<Session>> {
        let guard = self.current.read().await;
        guard
            .as_ref()
            .filter(|session| session.fetched_at.elapsed() < self.ttl)
            .cloned()
    }

    async fn refresh(&self) -> AppResult<Arc<Session>> {
        // The exchange runs outside the lock; a failed exchange propagates
        // without touching the cache.
        let grant = self.platform.authenticate().await?;
        let session = Arc::new(Session {
            token: grant.token,
            base_url: normalize_base_url(&grant.server_host),
            fetched_at: Instant::now(),
        });
        *self.current.write().await = Some(session.clone());
        tracing::debug!(base_url = %session.base_url, "platform session refreshed");
        Ok(session)
    }
}

/// Normalize a bare hostname or fully qualified URL to a URL with an
/// explicit scheme and no trailing slash, so downstream path concatenation
/// is unambiguous.
pub fn normalize_base_url(host: &str) -> String {
    let trimmed = host.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}
