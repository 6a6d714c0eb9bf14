//! Poll-with-deadline readiness waits.
//!
//! Service starts are asynchronous: `systemctl start` returns before the
//! daemon is actually serving. Instead of a fixed sleep, actions poll a
//! readiness probe at an interval until it passes or the attempt budget is
//! exhausted. A service that never becomes ready fails the wait, and the
//! module reports that as its failure reason.

use std::time::Duration;

/// Bounded retry policy for a readiness probe.
#[derive(Debug, Clone, Copy)]
pub struct Readiness {
    /// Maximum number of probe attempts.
    pub attempts: u32,

    /// Pause between attempts.
    pub interval: Duration,
}

impl Default for Readiness {
    fn default() -> Self {
        // 30 x 2s covers FreeIPA's directory-server restart, the slowest
        // start in the stack.
        Self {
            attempts: 30,
            interval: Duration::from_secs(2),
        }
    }
}

impl Readiness {
    /// Policy with no pauses. Test seam: probes run back-to-back so tests
    /// never wait on real elapsed time.
    pub fn immediate(attempts: u32) -> Self {
        Self {
            attempts,
            interval: Duration::ZERO,
        }
    }

    /// Poll `probe` until it returns true or attempts run out.
    pub fn wait(&self, mut probe: impl FnMut() -> bool) -> bool {
        for attempt in 0..self.attempts {
            if probe() {
                return true;
            }
            if attempt + 1 < self.attempts && !self.interval.is_zero() {
                std::thread::sleep(self.interval);
            }
        }
        false
    }
}
