//! Host time primitive
//!
//! The client runs on the host's discrete clock. A tick is whatever the
//! host says it is (50ms on the reference host); the client only ever
//! compares ticks and measures ages, it never converts them to wall time.

use std::ops::Add;

/// Host tick counter - monotonic, host-driven
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    #[inline]
    pub fn new(tick: u64) -> Self {
        Tick(tick)
    }

    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Whole ticks elapsed since `earlier`; zero if `earlier` is ahead
    #[inline]
    pub fn age_since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl Add<u64> for Tick {
    type Output = Tick;

    #[inline]
    fn add(self, rhs: u64) -> Self::Output {
        Tick(self.0.saturating_add(rhs))
    }
}

impl std::fmt::Debug for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tick({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_since() {
        let early = Tick::new(100);
        let late = Tick::new(141);
        assert_eq!(late.age_since(early), 41);
        assert_eq!(early.age_since(late), 0);
    }

    #[test]
    fn test_add_saturates() {
        let t = Tick::new(u64::MAX - 1);
        assert_eq!((t + 10).as_u64(), u64::MAX);
    }
}
