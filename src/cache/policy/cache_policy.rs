use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::cache::clock::ClockType;

/// CachePolicy is the small record stored next to every cache entry, typically describing its expiration.
///
/// `Invalid` is returned whenever no usable policy exists for a key: the policy file is missing,
/// can not be read, or can not be parsed. It is a value, never an error.
///
/// This crate only stores and retrieves the policy, acting on it (evicting expired entries) is up to the caller.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum CachePolicy {
    #[default]
    Invalid,
    NeverExpires,
    ExpiresAt(SystemTime),
    SlidingExpiration(Duration),
}

impl CachePolicy {
    /// Creates a policy that expires `time_to_live` after the current time of the clock.
    pub fn expiring_after(time_to_live: Duration, clock: &ClockType) -> Self {
        CachePolicy::ExpiresAt(clock.now() + time_to_live)
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, CachePolicy::Invalid)
    }

    /// Returns true if the policy carries an absolute expiration that the clock has passed.
    pub fn has_expired_at(&self, clock: &ClockType) -> bool {
        match self {
            CachePolicy::ExpiresAt(expire_after) => clock.has_passed(expire_after),
            _ => false
        }
    }
}
