// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Compare times on a free-running, wrapping microsecond counter.
//!
//! Each delay returned by [`super::PulseScheduler::on_compare`] is added to the previous compare
//! time rather than to the time the event was handled, so interrupt latency shifts individual
//! edges but never accumulates into the period.

/// The current compare time and the one before it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CompareDeadline {
    previous: u32,
    at: u32,
}

impl CompareDeadline {
    /// Start counting from counter value `now`.
    pub const fn starting_at(now: u32) -> Self {
        Self {
            previous: now,
            at: now,
        }
    }

    /// Counter value of the pending compare.
    #[inline]
    pub const fn at(&self) -> u32 {
        self.at
    }

    /// Move the compare `delay_us` past the current one. Returns the new compare value.
    pub fn advance(&mut self, delay_us: u32) -> u32 {
        self.previous = self.at;
        self.at = self.at.wrapping_add(delay_us);
        self.at
    }

    /// Whether counter value `now` is at or past the pending compare.
    ///
    /// A compare register only matches on equality, so a deadline that has already slipped by
    /// must be fired by hand. Valid while `now` is less than a full counter wrap past `previous`.
    pub fn has_passed(&self, now: u32) -> bool {
        now.wrapping_sub(self.previous) >= self.at.wrapping_sub(self.previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_from_previous_compare() {
        let mut deadline = CompareDeadline::starting_at(100);
        assert_eq!(deadline.advance(1_500), 1_600);
        assert_eq!(deadline.advance(18_500), 20_100);
        assert_eq!(deadline.at(), 20_100);
    }

    #[test]
    fn wraps_with_the_counter() {
        let mut deadline = CompareDeadline::starting_at(u32::MAX - 9);
        assert_eq!(deadline.advance(20), 10);
        assert!(!deadline.has_passed(u32::MAX));
        assert!(!deadline.has_passed(9));
        assert!(deadline.has_passed(10));
        assert!(deadline.has_passed(11));
    }

    #[test]
    fn zero_delay_has_already_passed() {
        let mut deadline = CompareDeadline::starting_at(5_000);
        deadline.advance(0);
        assert!(deadline.has_passed(5_000));
        assert!(deadline.has_passed(5_003));
    }
}
