// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Servo timing constants and the runtime configuration built from them.

use crate::pulse::{Mapping, PulseWidth};
use crate::{Error, Result};

// ** SERVO TIMING ** //

/// Servo frame period (us). 50 Hz.
pub const PERIOD_US: u16 = 20_000;

/// Pulse width commanding no motion (us).
pub const NEUTRAL_US: u16 = 1_500;

/// Practical swing either side of neutral for a 5 V driver (us).
pub const MAGNITUDE_US: u16 = 300;

/// Width commanded by a zero reading.
pub const MIN_US: u16 = NEUTRAL_US - MAGNITUDE_US;

/// Width emitted until the first conversion has been read.
pub const INITIAL_US: u16 = NEUTRAL_US;

/// Pulses emitted with the same width between ADC updates: 50 Hz / 5 = 10 Hz.
pub const HOLD_PULSES: u8 = 5;

/// Servo datasheet limits (us). Informational; nothing clamps to them.
pub const DATASHEET_MIN_US: u16 = 900;
pub const DATASHEET_MAX_US: u16 = 2_100;

// ** ADC ** //

/// ADC channel wired to the potentiometer wiper.
pub const POT_ADC_CHANNEL: u8 = 3;

/// Consecutive late group boundaries after which the scheduler requests a fresh conversion.
pub const RESTART_AFTER_LATE_GROUPS: u8 = 3;

/// Complete servo configuration. [`ServoConfig::default`] reproduces the constants above.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ServoConfig {
    pub period_us: u16,
    pub neutral_us: u16,
    pub magnitude_us: u16,
    pub hold_pulses: u8,
    pub initial_us: u16,
    pub mapping: Mapping,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ServoConfig {
    pub const fn new() -> Self {
        Self {
            period_us: PERIOD_US,
            neutral_us: NEUTRAL_US,
            magnitude_us: MAGNITUDE_US,
            hold_pulses: HOLD_PULSES,
            initial_us: INITIAL_US,
            mapping: Mapping::Offset,
        }
    }

    pub const fn with_mapping(mut self, mapping: Mapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub const fn with_hold_pulses(mut self, hold_pulses: u8) -> Self {
        self.hold_pulses = hold_pulses;
        self
    }

    pub const fn with_initial_us(mut self, initial_us: u16) -> Self {
        self.initial_us = initial_us;
        self
    }

    /// Bottom of the swing: `neutral - magnitude`.
    #[inline]
    pub const fn min_us(&self) -> u16 {
        self.neutral_us.saturating_sub(self.magnitude_us)
    }

    #[inline]
    pub const fn initial_width(&self) -> PulseWidth {
        PulseWidth::from_us(self.initial_us)
    }

    /// Width commanded by an 8-bit reading.
    #[inline]
    pub fn width_for(&self, reading: u8) -> PulseWidth {
        self.mapping.width(reading, self.min_us(), self.magnitude_us)
    }

    /// Check that every width this configuration can produce fits inside one period.
    pub fn validate(&self) -> Result<()> {
        if self.hold_pulses == 0 {
            return Err(Error::EmptyHoldGroup);
        }

        if self.magnitude_us > self.neutral_us {
            return Err(Error::MagnitudeExceedsNeutral {
                neutral_us: self.neutral_us,
                magnitude_us: self.magnitude_us,
            });
        }

        for width in [self.initial_width(), self.width_for(u8::MAX)] {
            if width.as_us() > self.period_us {
                return Err(Error::PulseExceedsPeriod {
                    width_us: width.as_us(),
                    period_us: self.period_us,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_constants() {
        let cfg = ServoConfig::default();
        assert_eq!(cfg.min_us(), 1200);
        assert_eq!(cfg.initial_width().as_us(), 1500);
        assert_eq!(cfg.hold_pulses, 5);
        assert_eq!(cfg.mapping, Mapping::Offset);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn width_for_scenarios() {
        let cfg = ServoConfig::default();
        assert_eq!(cfg.width_for(0).as_us(), 1200);
        assert_eq!(cfg.width_for(75).as_us(), 1275);
        assert_eq!(cfg.width_for(255).as_us(), 1455);
    }

    #[test]
    fn rejects_empty_hold_group() {
        let cfg = ServoConfig::default().with_hold_pulses(0);
        assert_eq!(cfg.validate(), Err(Error::EmptyHoldGroup));
    }

    #[test]
    fn rejects_initial_width_longer_than_period() {
        let cfg = ServoConfig::default().with_initial_us(PERIOD_US + 1);
        assert_eq!(
            cfg.validate(),
            Err(Error::PulseExceedsPeriod {
                width_us: PERIOD_US + 1,
                period_us: PERIOD_US,
            })
        );
    }

    #[test]
    fn rejects_mapping_past_period() {
        let cfg = ServoConfig {
            period_us: 1_400,
            ..ServoConfig::default()
        }
        .with_initial_us(1_300);
        assert_eq!(
            cfg.validate(),
            Err(Error::PulseExceedsPeriod {
                width_us: 1455,
                period_us: 1_400,
            })
        );
    }

    #[test]
    fn rejects_swing_below_zero() {
        let cfg = ServoConfig {
            magnitude_us: 2_000,
            ..ServoConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(Error::MagnitudeExceedsNeutral { .. })
        ));
    }
}
