use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Auth-token cache owned by a gateway adapter instance. Tokens are handed
/// out only while they have at least `safety_margin` of lifetime left, so a
/// request never goes out with a token about to expire mid-flight.
#[derive(Clone)]
pub struct TokenCache<T: Clone + Send + Sync> {
    inner: Arc<RwLock<Option<(Instant, T)>>>,
    safety_margin: Duration,
}

impl<T: Clone + Send + Sync> TokenCache<T> {
    pub fn new(safety_margin: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
            safety_margin,
        }
    }

    pub async fn get(&self) -> Option<T> {
        let read = self.inner.read().await;
        if let Some((expires_at, token)) = &*read {
            if Instant::now() + self.safety_margin < *expires_at {
                return Some(token.clone());
            }
        }
        None
    }

    pub async fn put(&self, token: T, ttl: Duration) {
        let mut write = self.inner.write().await;
        *write = Some((Instant::now() + ttl, token));
    }

    pub async fn invalidate(&self) {
        let mut write = self.inner.write().await;
        *write = None;
    }
}
