// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pulse widths and the mapping from an 8-bit ADC reading to a pulse width.
//!
//! With the default [`Mapping::Offset`] a reading `r` commands `MIN_US + r`:
//!
//! | reading | width |
//! | ------- | ----- |
//! | 0       | 1200 us |
//! | 75      | 1275 us |
//! | 255     | 1455 us |
//!
//! The upper half of the calibrated swing (1500..1800 us) is never reached by this mapping. See
//! [`Mapping::Symmetric`] for the alternative.

use derive_more::Display;

use crate::config::{DATASHEET_MAX_US, DATASHEET_MIN_US};

/// High time of one servo pulse, in microseconds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display("{_0} us")]
pub struct PulseWidth(u16);

impl PulseWidth {
    #[inline]
    pub const fn from_us(us: u16) -> Self {
        Self(us)
    }

    #[inline]
    pub const fn as_us(self) -> u16 {
        self.0
    }

    /// Split one `period_us` frame into `(high_us, low_us)`.
    ///
    /// The low time saturates at zero when the width is longer than the period, so the frame is
    /// stretched rather than wrapped.
    #[inline]
    pub const fn split(self, period_us: u16) -> (u16, u16) {
        (self.0, period_us.saturating_sub(self.0))
    }

    /// Whether the width lies inside the servo datasheet range (900..=2100 us).
    #[inline]
    pub const fn within_datasheet(self) -> bool {
        self.0 >= DATASHEET_MIN_US && self.0 <= DATASHEET_MAX_US
    }
}

/// How an ADC reading is turned into a pulse width.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Mapping {
    /// `min + reading`. One microsecond per count, anchored at the bottom of the swing.
    #[default]
    Offset,

    /// Reading scaled across the full `[neutral - magnitude, neutral + magnitude]` swing.
    Symmetric,
}

impl Mapping {
    /// Width commanded by `reading` for a swing starting at `min_us` and spanning
    /// `2 * magnitude_us`.
    pub fn width(self, reading: u8, min_us: u16, magnitude_us: u16) -> PulseWidth {
        match self {
            Mapping::Offset => PulseWidth(min_us.saturating_add(u16::from(reading))),
            Mapping::Symmetric => {
                let span = 2 * u32::from(magnitude_us);
                let scaled = span * u32::from(reading) / u32::from(u8::MAX);
                let us = u32::from(min_us) + scaled;
                PulseWidth(u16::try_from(us).unwrap_or(u16::MAX))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MAGNITUDE_US, MIN_US, NEUTRAL_US, PERIOD_US};

    #[test]
    fn offset_covers_every_reading() {
        for reading in 0..=u8::MAX {
            let width = Mapping::Offset.width(reading, MIN_US, MAGNITUDE_US);
            assert_eq!(width.as_us(), 1200 + u16::from(reading));
        }
    }

    #[test]
    fn offset_never_reaches_upper_swing() {
        let top = Mapping::Offset.width(u8::MAX, MIN_US, MAGNITUDE_US);
        assert_eq!(top.as_us(), 1455);
        assert!(top.as_us() < NEUTRAL_US + MAGNITUDE_US);
    }

    #[test]
    fn symmetric_spans_full_swing() {
        assert_eq!(Mapping::Symmetric.width(0, MIN_US, MAGNITUDE_US).as_us(), 1200);
        assert_eq!(Mapping::Symmetric.width(255, MIN_US, MAGNITUDE_US).as_us(), 1800);
        // 128 * 600 / 255 = 301
        assert_eq!(Mapping::Symmetric.width(128, MIN_US, MAGNITUDE_US).as_us(), 1501);
    }

    #[test]
    fn split_fills_the_period() {
        for us in [0, 1, 1200, 1455, 1500, 19_999, PERIOD_US] {
            let (high, low) = PulseWidth::from_us(us).split(PERIOD_US);
            assert_eq!(high, us);
            assert_eq!(high + low, PERIOD_US);
        }
    }

    #[test]
    fn split_saturates_low_time() {
        assert_eq!(PulseWidth::from_us(25_000).split(PERIOD_US), (25_000, 0));
    }

    #[test]
    fn datasheet_window() {
        assert!(PulseWidth::from_us(900).within_datasheet());
        assert!(PulseWidth::from_us(2100).within_datasheet());
        assert!(!PulseWidth::from_us(899).within_datasheet());
        assert!(!PulseWidth::from_us(2101).within_datasheet());
    }
}
