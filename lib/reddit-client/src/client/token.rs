//! Access token and its single-flight cache.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::sync::Mutex;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// An access token together with the time it stops being used.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AccessToken {
    /// `"{token_type} {access_token}"`, sent as is in the `authorization` header.
    value: String,
    #[zeroize(skip)]
    expires_at: SystemTime,
}

impl AccessToken {
    /// Creates a token obtained at `obtained_at`.
    ///
    /// Only half of the reported lifetime is kept so a token is never sent
    /// close to its real expiry. Without `expires_in` the token is already
    /// expired on the next check.
    pub fn new(
        token_type: &str,
        access_token: &str,
        expires_in: Option<u64>,
        obtained_at: SystemTime,
    ) -> Self {
        let lifetime = expires_in.map_or(Duration::ZERO, |secs| Duration::from_secs(secs) / 2);
        Self {
            value: format!("{token_type} {access_token}"),
            expires_at: obtained_at + lifetime,
        }
    }

    /// The `authorization` header value.
    pub fn header_value(&self) -> &str {
        &self.value
    }

    /// When the token stops being reused.
    pub fn expires_at(&self) -> SystemTime {
        self.expires_at
    }

    /// Checks whether the token can still be used at `now`.
    pub fn is_valid_at(&self, now: SystemTime) -> bool {
        now < self.expires_at
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Thread-safe cache for the access token.
///
/// The lock is held while a new token is fetched, so concurrent callers
/// wait for the in-flight exchange instead of starting their own.
#[derive(Debug, Clone, Default)]
pub(crate) struct TokenCache {
    inner: Arc<Mutex<Option<AccessToken>>>,
}

impl TokenCache {
    /// Returns the cached token if still valid, otherwise stores and returns
    /// the result of `fetch`.
    pub(crate) async fn get_valid<F, Fut, E>(&self, fetch: F) -> Result<AccessToken, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<AccessToken, E>>,
    {
        let mut guard = self.inner.lock().await;
        if let Some(token) = guard.as_ref().filter(|it| it.is_valid_at(SystemTime::now())) {
            debug!(expires_at = ?token.expires_at, "reusing cached token");
            return Ok(token.clone());
        }

        debug!("token absent or expired, refreshing");
        let token = fetch().await?;
        *guard = Some(token.clone());
        Ok(token)
    }

    pub(crate) async fn clear(&self) {
        let mut guard = self.inner.lock().await;
        *guard = None;
    }
}
