use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

use super::{CardResolver, ResolveError};
use crate::model::Card;

/// Minimum spacing between two requests to the card database.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Wraps a resolver so that calls start at least `min_interval` apart.
///
/// Calls are serialized: the gate is held for the whole request, so a slow
/// lookup also delays the next one.
pub struct RateLimited<R> {
    inner: R,
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl<R> RateLimited<R> {
    pub fn new(inner: R) -> Self {
        Self::with_interval(inner, DEFAULT_MIN_INTERVAL)
    }

    pub fn with_interval(inner: R, min_interval: Duration) -> Self {
        RateLimited {
            inner,
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    async fn gated<T, F>(&self, call: F) -> T
    where
        F: std::future::Future<Output = T>,
    {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            sleep_until(previous + self.min_interval).await;
        }
        *last = Some(Instant::now());
        call.await
    }
}

#[async_trait]
impl<R: CardResolver> CardResolver for RateLimited<R> {
    async fn card(&self, id: &str) -> Result<Option<Card>, ResolveError> {
        self.gated(self.inner.card(id)).await
    }

    async fn cards(&self, ids: &[String]) -> Result<Vec<Card>, ResolveError> {
        self.gated(self.inner.cards(ids)).await
    }

    async fn card_named(&self, name: &str) -> Result<Option<Card>, ResolveError> {
        self.gated(self.inner.card_named(name)).await
    }
}
