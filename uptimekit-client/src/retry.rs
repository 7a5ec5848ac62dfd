//! Backoff policy and jitter sources for retried requests.
//!
//! The delay for attempt `n` (0-indexed) is `base_delay << min(n, 6)`,
//! offset by a uniform sample in `[-delay/4, +delay/4]` so many clients
//! retrying against the same upstream do not resynchronize.

use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Highest shift applied to the base delay.
const MAX_BACKOFF_SHIFT: u32 = 6;

// ============================================================================
// Jitter Sources
// ============================================================================

/// Source of the random offset applied to backoff delays.
///
/// Held by the executor and shared by concurrent calls, so implementations
/// must be safe to call from many tasks at once.
pub trait JitterSource: Send + Sync + fmt::Debug {
    /// Returns a uniform sample in `[-spread, +spread]` milliseconds.
    fn offset_millis(&self, spread: u64) -> i64;
}

/// Thread-local `rand` generator. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadJitter;

impl JitterSource for ThreadJitter {
    fn offset_millis(&self, spread: u64) -> i64 {
        let spread = i64::try_from(spread).unwrap_or(i64::MAX);
        if spread == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(-spread..=spread)
    }
}

/// Seeded generator for reproducible delays in tests.
#[derive(Debug)]
pub struct SeededJitter {
    rng: Mutex<StdRng>,
}

impl SeededJitter {
    /// Creates a generator from a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl JitterSource for SeededJitter {
    fn offset_millis(&self, spread: u64) -> i64 {
        let spread = i64::try_from(spread).unwrap_or(i64::MAX);
        if spread == 0 {
            return 0;
        }
        // A poisoned lock still holds a usable generator
        let mut rng = self.rng.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        rng.gen_range(-spread..=spread)
    }
}

/// No jitter: delays are exactly the nominal backoff.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn offset_millis(&self, _spread: u64) -> i64 {
        0
    }
}

// ============================================================================
// Backoff Policy
// ============================================================================

/// Attempt cap and base delay for a single logical call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Total attempts including the first (at least 1).
    pub max_attempts: u32,
    /// Delay before the first retry, before jitter.
    pub base_delay: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl BackoffPolicy {
    /// Creates a policy with the given attempt cap and base delay.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Delay for `attempt` before jitter.
    pub fn nominal_delay(&self, attempt: u32) -> Duration {
        let shift = attempt.min(MAX_BACKOFF_SHIFT);
        self.base_delay.saturating_mul(1 << shift)
    }

    /// Delay for `attempt` with jitter from `jitter` applied.
    pub fn delay_for_attempt(&self, attempt: u32, jitter: &dyn JitterSource) -> Duration {
        let nominal = u64::try_from(self.nominal_delay(attempt).as_millis()).unwrap_or(u64::MAX);
        let offset = jitter.offset_millis(nominal / 4);

        let jittered = if offset.is_negative() {
            nominal.saturating_sub(offset.unsigned_abs())
        } else {
            nominal.saturating_add(offset.unsigned_abs())
        };
        Duration::from_millis(jittered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_backoff() {
        let policy = BackoffPolicy::new(4, Duration::from_millis(100));

        assert_eq!(policy.nominal_delay(0), Duration::from_millis(100));
        assert_eq!(policy.nominal_delay(1), Duration::from_millis(200));
        assert_eq!(policy.nominal_delay(2), Duration::from_millis(400));
        assert_eq!(policy.nominal_delay(3), Duration::from_millis(800));
    }

    #[test]
    fn test_shift_capped_at_six() {
        let policy = BackoffPolicy::new(20, Duration::from_millis(10));

        assert_eq!(policy.nominal_delay(6), Duration::from_millis(640));
        assert_eq!(policy.nominal_delay(7), Duration::from_millis(640));
        assert_eq!(policy.nominal_delay(u32::MAX), Duration::from_millis(640));
    }

    #[test]
    fn test_jitter_stays_within_quarter() {
        let policy = BackoffPolicy::new(4, Duration::from_millis(1000));
        let jitter = SeededJitter::new(7);

        for attempt in 0..8 {
            let nominal = policy.nominal_delay(attempt);
            let spread = nominal / 4;
            for _ in 0..50 {
                let delay = policy.delay_for_attempt(attempt, &jitter);
                assert!(delay >= nominal - spread, "{delay:?} below window");
                assert!(delay <= nominal + spread, "{delay:?} above window");
            }
        }
    }

    #[test]
    fn test_seeded_jitter_is_reproducible() {
        let policy = BackoffPolicy::default();
        let a = SeededJitter::new(42);
        let b = SeededJitter::new(42);

        let left: Vec<_> = (0..5).map(|n| policy.delay_for_attempt(n, &a)).collect();
        let right: Vec<_> = (0..5).map(|n| policy.delay_for_attempt(n, &b)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_no_jitter_is_nominal() {
        let policy = BackoffPolicy::default();
        assert_eq!(
            policy.delay_for_attempt(2, &NoJitter),
            Duration::from_millis(2000)
        );
    }

    #[test]
    fn test_min_one_attempt() {
        assert_eq!(BackoffPolicy::new(0, Duration::ZERO).max_attempts, 1);
        assert_eq!(BackoffPolicy::no_retry().max_attempts, 1);
    }
}
