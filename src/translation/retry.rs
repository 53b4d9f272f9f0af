/*!
 * Retry waves for failed chunks.
 *
 * After the first dispatch drains, chunks whose latest result is retryable
 * are re-submitted through the same [`BatchTranslator`], one wave at a time,
 * with an exponential backoff before every wave. Successful chunks are never
 * translated again.
 */

use log::{info, warn};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use super::batch::{BatchTranslator, ChunkResult};
use super::chunker::Chunk;

/// Explicit retry policy: how many extra waves and how long to wait before each
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Additional attempts per chunk after the first one
    pub max_attempts: u32,

    /// Delay before the first retry wave
    pub base_delay: Duration,

    /// Growth factor applied for every further wave
    pub multiplier: f64,

    /// Upper bound for any single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            multiplier: 2.0,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Policy with the given number of extra attempts and default backoff
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    /// Policy that never retries
    pub fn none() -> Self {
        Self::new(0)
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Delay before retry wave `wave` (1-based), capped at `max_delay`
    pub fn delay_for(&self, wave: u32) -> Duration {
        if wave == 0 {
            return Duration::ZERO;
        }

        let factor = self.multiplier.powi(wave.saturating_sub(1).min(i32::MAX as u32) as i32);
        let secs = self.base_delay.as_secs_f64() * factor;
        if !secs.is_finite() || secs >= self.max_delay.as_secs_f64() {
            self.max_delay
        } else {
            Duration::from_secs_f64(secs.max(0.0))
        }
    }
}

/// Re-dispatches retryable failures until they succeed or the policy runs out
pub struct RetryCoordinator<'a> {
    batch: &'a BatchTranslator,
    policy: RetryPolicy,
}

impl<'a> RetryCoordinator<'a> {
    pub fn new(batch: &'a BatchTranslator, policy: RetryPolicy) -> Self {
        Self { batch, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run retry waves over `results` and return the latest result per index.
    ///
    /// `on_wave` is called with `(wave, failed_chunks)` before each wave.
    /// Chunks still failing afterwards are marked as exhausted. With a policy
    /// of zero attempts the first-attempt results are returned unchanged.
    pub async fn retry(
        &self,
        results: Vec<ChunkResult>,
        chunks: &[Chunk],
        on_wave: &(dyn Fn(u32, usize) + Send + Sync),
    ) -> Vec<ChunkResult> {
        let chunks_by_index: HashMap<usize, &Chunk> = chunks.iter().map(|c| (c.index, c)).collect();
        let mut latest: BTreeMap<usize, ChunkResult> =
            results.into_iter().map(|r| (r.index(), r)).collect();

        for wave in 1..=self.policy.max_attempts {
            let pending: Vec<&Chunk> = latest
                .values()
                .filter(|result| result.needs_retry())
                .filter_map(|result| chunks_by_index.get(&result.index()).copied())
                .collect();

            if pending.is_empty() {
                break;
            }

            on_wave(wave, pending.len());

            let delay = self.policy.delay_for(wave);
            info!(
                "Retry wave {}/{}: {} chunk(s) after {:?}",
                wave,
                self.policy.max_attempts,
                pending.len(),
                delay
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let retried = self.batch.dispatch(pending, wave + 1, &|_, _| {}).await;
            for result in retried {
                latest.insert(result.index(), result);
            }
        }

        latest
            .into_values()
            .map(|result| {
                // Without any wave allowed, nothing was retried and nothing is exhausted
                if result.needs_retry() && self.policy.max_attempts > 0 {
                    warn!(
                        "Giving up on chunk {} after {} attempt(s)",
                        result.index(),
                        result.attempts()
                    );
                    result.into_exhausted()
                } else {
                    result
                }
            })
            .collect()
    }
}
