use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::cache::{ChannelCache, SubscriberCount};
use crate::config::SiftConfig;
use crate::constants::{
    BACKOFF_MULTIPLIER, DEFAULT_INITIAL_BACKOFF_SECS, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_MAX_BACKOFF_SECS, DEFAULT_MAX_JITTER_MS,
};
use crate::youtube::ChannelLookup;

/// Exponential backoff for quota and rate-limit responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub max_jitter: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: Duration::from_secs(DEFAULT_INITIAL_BACKOFF_SECS),
            max_delay: Duration::from_secs(DEFAULT_MAX_BACKOFF_SECS),
            max_jitter: Duration::from_millis(DEFAULT_MAX_JITTER_MS),
        }
    }
}

impl BackoffPolicy {
    pub fn from_config(config: &SiftConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_delay: config.initial_backoff(),
            max_delay: config.max_backoff(),
            max_jitter: config.max_jitter(),
        }
    }

    pub fn next_delay(&self, current: Duration) -> Duration {
        current
            .checked_mul(BACKOFF_MULTIPLIER)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Base delays before jitter: initial, doubled each step, capped.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        std::iter::successors(Some(self.initial_delay.min(self.max_delay)), move |d| {
            Some(self.next_delay(*d))
        })
    }

    /// Uniform in `[0, max_jitter)`.
    pub fn jitter(&self) -> Duration {
        if self.max_jitter.is_zero() {
            return Duration::ZERO;
        }
        self.max_jitter.mul_f64(rand::random::<f64>())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ResolverStats {
    pub cache_hits: usize,
    pub network_calls: usize,
    pub backoff_waits: usize,
    pub total_backoff: Duration,
    pub resolved: usize,
    pub not_found: usize,
    pub errors: usize,
}

/// Memoizing subscriber lookup with retry.
///
/// Every terminal outcome, errors included, is written to the cache, so a
/// channel id is queried at most once per cache lifetime.
pub struct SubscriberResolver<L> {
    lookup: L,
    policy: BackoffPolicy,
    stats: ResolverStats,
}

impl<L: ChannelLookup> SubscriberResolver<L> {
    pub fn new(lookup: L, policy: BackoffPolicy) -> Self {
        Self {
            lookup,
            policy,
            stats: ResolverStats::default(),
        }
    }

    pub async fn resolve(&mut self, cache: &mut ChannelCache, channel_id: &str) -> SubscriberCount {
        if let Some(value) = cache.get(channel_id) {
            self.stats.cache_hits += 1;
            return *value;
        }

        let value = self.fetch(channel_id).await;
        if value.count().is_some() {
            self.stats.resolved += 1;
        } else if value.is_error() {
            self.stats.errors += 1;
        } else {
            self.stats.not_found += 1;
        }

        cache.put(channel_id, value);
        value
    }

    async fn fetch(&mut self, channel_id: &str) -> SubscriberCount {
        let mut delay = self.policy.initial_delay.min(self.policy.max_delay);

        for _ in 0..self.policy.max_attempts {
            self.stats.network_calls += 1;

            match self.lookup.lookup_subscribers(channel_id).await {
                Ok(Some(count)) => return SubscriberCount::Count(count),
                Ok(None) => {
                    debug!("Channel ID {} not found", channel_id);
                    return SubscriberCount::NotFound;
                }
                Err(e) if e.is_transient() => {
                    let wait = delay + self.policy.jitter();
                    warn!(
                        "Encountered {} error for channel ID: {}. Retrying in {:.2} seconds...",
                        e.status().unwrap_or_default(),
                        channel_id,
                        wait.as_secs_f64()
                    );
                    self.stats.backoff_waits += 1;
                    self.stats.total_backoff += wait;
                    tokio::time::sleep(wait).await;
                    delay = self.policy.next_delay(delay);
                }
                Err(e) => {
                    warn!("Lookup failed for channel ID {}: {}", channel_id, e);
                    return SubscriberCount::PermanentError(e.status());
                }
            }
        }

        warn!("Max retries reached for channel ID: {}", channel_id);
        SubscriberCount::TransientErrorExhausted
    }

    pub fn stats(&self) -> &ResolverStats {
        &self.stats
    }
}
