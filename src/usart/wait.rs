//! Pluggable busy-wait strategy for the blocking transmit/receive paths.
//!
//! The firmware polls hardware-ready flags in a tight loop with nothing else
//! to do; hosts and tests want the same call shape but with a bound, so a
//! stalled line surfaces as an error instead of hanging the suite.

/// The bounded strategy gave up before the predicate became true.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitExpired;

/// Polls a readiness predicate until it holds.
pub trait WaitStrategy {
    /// Block until `ready` returns true, or give up with [`WaitExpired`].
    fn wait_until<F: FnMut() -> bool>(&mut self, ready: F) -> Result<(), WaitExpired>;
}

/// Unbounded spin. This is the firmware behavior: a byte that never arrives
/// blocks forever.
#[derive(Clone, Copy, Debug, Default)]
pub struct Spin;

impl WaitStrategy for Spin {
    fn wait_until<F: FnMut() -> bool>(&mut self, mut ready: F) -> Result<(), WaitExpired> {
        while !ready() {
            core::hint::spin_loop();
        }
        Ok(())
    }
}

/// Spin with an iteration cap, for hosts where hanging is unacceptable.
#[derive(Clone, Copy, Debug)]
pub struct BoundedSpin {
    max_polls: u32,
}

impl BoundedSpin {
    /// Create a bounded spinner that polls at most `max_polls` times.
    #[must_use]
    pub const fn new(max_polls: u32) -> Self {
        Self { max_polls }
    }
}

impl WaitStrategy for BoundedSpin {
    fn wait_until<F: FnMut() -> bool>(&mut self, mut ready: F) -> Result<(), WaitExpired> {
        for _ in 0..self.max_polls {
            if ready() {
                return Ok(());
            }
            core::hint::spin_loop();
        }
        Err(WaitExpired)
    }
}
