//! Environment abstraction for deterministic testing.
//!
//! Decouples the reducer from system resources (wall-clock time, randomness).
//! Action log entries carry a formatted timestamp and a unique id; routing
//! both through [`Environment`] keeps the reducer a pure function of its
//! inputs under test.

use chrono::{DateTime, Utc};

/// Abstract environment providing wall-clock time and randomness.
///
/// # Invariants
///
/// - `now()` never goes backwards within a single execution context.
/// - `random_bytes()` uses OS entropy in production; simulation environments
///   may use a seeded generator for reproducibility.
pub trait Environment: Clone {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;

    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a random `u64`.
    ///
    /// Convenience for common use cases like generating log entry ids.
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }
}

/// Production environment using system time and OS randomness.
///
/// # Panics
///
/// Panics if the OS RNG fails. This is intentional - log entry ids must stay
/// unique, and RNG failure indicates OS-level issues no client can recover
/// from.
#[derive(Clone, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer).expect("invariant: OS RNG failure is unrecoverable");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_u64_consumes_all_eight_bytes() {
        #[derive(Clone)]
        struct CountingEnv;

        impl Environment for CountingEnv {
            fn now(&self) -> DateTime<Utc> {
                DateTime::UNIX_EPOCH
            }

            fn random_bytes(&self, buffer: &mut [u8]) {
                for (i, byte) in buffer.iter_mut().enumerate() {
                    *byte = i as u8 + 1;
                }
            }
        }

        assert_eq!(CountingEnv.random_u64(), u64::from_be_bytes([1, 2, 3, 4, 5, 6, 7, 8]));
    }
}
