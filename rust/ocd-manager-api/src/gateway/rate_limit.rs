//! Throttling of the credential endpoints using governor.
//!
//! Attempts are keyed by normalized email so that hammering one account does
//! not lock out others.

use std::num::NonZeroU32;

use governor::{
    clock::{Clock, DefaultClock},
    state::keyed::DefaultKeyedStateStore,
    Quota, RateLimiter,
};

use crate::error::ApiError;

/// Keyed rate limiter type alias.
pub type KeyedRateLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// Forget idle keys once this many are tracked.
const MAX_TRACKED_KEYS: usize = 10_000;

/// Per-email limiter for login and registration attempts.
pub struct CredentialLimiter {
    limiter: KeyedRateLimiter,
    clock: DefaultClock,
}

impl std::fmt::Debug for CredentialLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialLimiter")
            .field("tracked_keys", &self.limiter.len())
            .finish()
    }
}

impl CredentialLimiter {
    /// Allow `attempts_per_minute` attempts per key, with a burst of the same
    /// size. Zero is treated as one.
    pub fn new(attempts_per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(attempts_per_minute).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_minute(per_minute).allow_burst(per_minute);

        Self {
            limiter: RateLimiter::keyed(quota),
            clock: DefaultClock::default(),
        }
    }

    /// Record an attempt for `key`, failing with [`ApiError::RateLimited`]
    /// when the key is over quota.
    pub fn check(&self, key: &str) -> Result<(), ApiError> {
        if self.limiter.len() > MAX_TRACKED_KEYS {
            self.limiter.retain_recent();
        }

        match self.limiter.check_key(&key.to_string()) {
            Ok(()) => Ok(()),
            Err(not_until) => {
                let wait = not_until.wait_time_from(self.clock.now());
                tracing::warn!(wait_ms = wait.as_millis(), "⚠️  Credential attempts throttled");
                Err(ApiError::RateLimited {
                    retry_after_secs: wait.as_secs().max(1),
                })
            }
        }
    }
}
