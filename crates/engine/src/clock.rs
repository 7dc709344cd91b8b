//! Monotonic timestamp source for `created`/`updated`.
//!
//! Wall-clock time alone is not fine-grained enough to guarantee two writes
//! issued back-to-back within the same test scenario get distinguishable
//! timestamps (§3: "sub-millisecond resolution sufficient to distinguish
//! sequential writes"). [`Clock`] wraps the system clock with a
//! compare-and-swap ratchet so every call returns a value strictly greater
//! than the last one it handed out, regardless of how fast the underlying
//! clock actually advances.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Issues strictly increasing nanosecond timestamps.
#[derive(Debug, Default)]
pub struct Clock {
    last: AtomicI64,
}

impl Clock {
    pub fn new() -> Self {
        Clock {
            last: AtomicI64::new(0),
        }
    }

    /// The next timestamp, guaranteed strictly greater than every value
    /// this clock has previously returned.
    pub fn now(&self) -> i64 {
        let wall = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as i64)
            .unwrap_or(0);

        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = if wall > prev { wall } else { prev + 1 };
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successive_calls_strictly_increase() {
        let clock = Clock::new();
        let a = clock.now();
        let b = clock.now();
        let c = clock.now();
        assert!(a < b);
        assert!(b < c);
    }
}
