use {
    crate::domain::{
        credentials::Credentials, error::GatewayError, mode::Mode, token::AccessToken,
    },
    chrono::{DateTime, Utc},
    std::{
        collections::HashMap,
        future::Future,
        sync::{Arc, Mutex},
    },
    tokio::sync::Mutex as AsyncMutex,
};

const DEFAULT_SKEW_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    credentials: Credentials,
    mode: Mode,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: AccessToken,
    expires_at: DateTime<Utc>,
}

type Slot = Arc<AsyncMutex<Option<CachedToken>>>;

/// Process-wide bearer token cache keyed by (credentials, mode).
///
/// Each key owns an async mutex that is held across the token exchange, so
/// concurrent requests for the same key wait on one exchange instead of each
/// starting their own. Tokens are dropped `skew` before the provider's
/// `expires_in` runs out; tokens without `expires_in` are never stored.
#[derive(Debug)]
pub struct TokenCache {
    slots: Mutex<HashMap<CacheKey, Slot>>,
    skew: chrono::Duration,
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCache {
    pub fn new() -> Self {
        Self::with_skew(chrono::Duration::seconds(DEFAULT_SKEW_SECS))
    }

    pub fn with_skew(skew: chrono::Duration) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            skew,
        }
    }

    /// Return a live cached token, or run `acquire` (at most once across
    /// concurrent callers for the same key) and keep its result.
    pub async fn get_or_acquire<F, Fut>(
        &self,
        credentials: &Credentials,
        mode: Mode,
        acquire: F,
    ) -> Result<AccessToken, GatewayError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<AccessToken, GatewayError>>,
    {
        let slot = self.slot(credentials, mode);
        let mut cached = slot.lock().await;

        if let Some(entry) = cached.as_ref()
            && entry.expires_at > Utc::now()
        {
            tracing::debug!(%mode, "using cached access token");
            return Ok(entry.token.clone());
        }
        *cached = None;

        let token = acquire().await?;
        if let Some(expires_at) = self.expiry_for(&token) {
            *cached = Some(CachedToken {
                token: token.clone(),
                expires_at,
            });
        }
        Ok(token)
    }

    /// Forget the token for this key, e.g. after the provider rejected it.
    pub fn invalidate(&self, credentials: &Credentials, mode: Mode) {
        let key = CacheKey {
            credentials: credentials.clone(),
            mode,
        };
        let removed = self
            .slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&key)
            .is_some();
        if removed {
            tracing::info!(%mode, "access token invalidated");
        }
    }

    fn slot(&self, credentials: &Credentials, mode: Mode) -> Slot {
        let key = CacheKey {
            credentials: credentials.clone(),
            mode,
        };
        let mut slots = self
            .slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(slots.entry(key).or_default())
    }

    fn expiry_for(&self, token: &AccessToken) -> Option<DateTime<Utc>> {
        let lifetime = chrono::Duration::try_seconds(i64::try_from(token.expires_in()?).ok()?)?;
        let usable = lifetime - self.skew;
        (usable > chrono::Duration::zero()).then(|| Utc::now() + usable)
    }
}
