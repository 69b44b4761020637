// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Timer-driven servo pulse scheduler.
//!
//! The pulse train is produced by a state machine advanced once per timer-compare event. Each call
//! to [`PulseScheduler::on_compare`] drives the pin and returns how long to wait, in microseconds,
//! before the next event, counted from the previous event's compare time (see
//! [`super::CompareDeadline`]).
//!
//! ```text
//!            start conversion
//!   Idle ───────────────────────► PulseHigh(0) ──► PulseLow(0) ──► PulseHigh(1) ──► ...
//!                                      ▲                                              │
//!                                      │ collect result (if complete),                ▼
//!                                      │ start next conversion           PulseHigh(last)
//!                                      │                                              │
//!                                      └──────────────── Converting ◄─────────────────┘
//! ```
//!
//! `Converting` is the low time of the last pulse in a hold group. At its end the conversion is
//! read only if the ADC reports it complete. Otherwise the width is held for another group and
//! the same conversion is collected at the next boundary. After
//! [`RESTART_AFTER_LATE_GROUPS`] late boundaries in a row the conversion is presumed lost and a
//! new one is requested.

use embedded_hal::digital::OutputPin;

use crate::config::{ServoConfig, RESTART_AFTER_LATE_GROUPS};
use crate::hw::AnalogInput;
use crate::pulse::PulseWidth;
use crate::{Error, Result};

/// Scheduler state. The pulse index counts from 0 within a hold group.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Not started. The first compare event starts the first conversion.
    Idle,
    /// Pin high.
    PulseHigh(u8),
    /// Pin low, between pulses of a hold group.
    PulseLow(u8),
    /// Pin low after the last pulse of a hold group; the conversion is collected when this ends.
    Converting,
}

/// Counters sampled by the firmware for its debug log.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Completed hold groups.
    pub groups: u32,
    /// Conversions started.
    pub conversions: u32,
    /// Group boundaries at which the conversion had not finished.
    pub late_conversions: u32,
    /// Conversions requested again after too many late boundaries in a row.
    pub restarts: u32,
    /// Last reading collected.
    pub last_reading: Option<u8>,
}

pub struct PulseScheduler<PIN, ADC> {
    pin: PIN,
    adc: ADC,
    config: ServoConfig,
    phase: Phase,
    width: PulseWidth,
    late_streak: u8,
    stats: SchedulerStats,
}

impl<PIN, ADC> PulseScheduler<PIN, ADC>
where
    PIN: OutputPin,
    ADC: AnalogInput,
{
    /// Create an idle scheduler. Hardware must already be initialized.
    pub fn new(pin: PIN, adc: ADC, config: ServoConfig) -> Self {
        Self {
            pin,
            adc,
            width: config.initial_width(),
            config,
            phase: Phase::Idle,
            late_streak: 0,
            stats: SchedulerStats::default(),
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn width(&self) -> PulseWidth {
        self.width
    }

    #[inline]
    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    #[inline]
    pub fn config(&self) -> &ServoConfig {
        &self.config
    }

    fn last_pulse(&self) -> u8 {
        self.config.hold_pulses.saturating_sub(1)
    }

    fn start_conversion(&mut self) {
        self.adc.start_conversion();
        self.stats.conversions = self.stats.conversions.wrapping_add(1);
    }

    /// Enter `PulseHigh(pulse)` once the pin is high. Returns the high time.
    fn enter_high(&mut self, pulse: u8) -> u32 {
        self.phase = Phase::PulseHigh(pulse);
        u32::from(self.width.split(self.config.period_us).0)
    }

    /// Handle one compare event. Returns the delay until the next one (us).
    ///
    /// The pin is driven before anything else happens, so a pin error leaves the scheduler
    /// untouched and the next call retries the same edge.
    pub fn on_compare(&mut self) -> Result<u32> {
        match self.phase {
            Phase::Idle => {
                self.pin.set_high().map_err(Error::pin)?;
                self.start_conversion();
                Ok(self.enter_high(0))
            }

            Phase::PulseHigh(pulse) => {
                self.pin.set_low().map_err(Error::pin)?;
                self.phase = if pulse >= self.last_pulse() {
                    Phase::Converting
                } else {
                    Phase::PulseLow(pulse)
                };
                Ok(u32::from(self.width.split(self.config.period_us).1))
            }

            Phase::PulseLow(pulse) => {
                self.pin.set_high().map_err(Error::pin)?;
                Ok(self.enter_high(pulse.saturating_add(1)))
            }

            // The new width applies from this rising edge.
            Phase::Converting => {
                self.pin.set_high().map_err(Error::pin)?;
                self.collect();
                Ok(self.enter_high(0))
            }
        }
    }

    /// Group boundary: take the result if it is ready and start the next conversion.
    fn collect(&mut self) {
        self.stats.groups = self.stats.groups.wrapping_add(1);

        if !self.adc.conversion_complete() {
            self.stats.late_conversions = self.stats.late_conversions.wrapping_add(1);
            self.late_streak = self.late_streak.saturating_add(1);
            if self.late_streak >= RESTART_AFTER_LATE_GROUPS {
                self.late_streak = 0;
                self.stats.restarts = self.stats.restarts.wrapping_add(1);
                self.start_conversion();
            }
            return;
        }

        self.late_streak = 0;
        let reading = self.adc.read_high_byte();
        self.width = self.config.width_for(reading);
        self.stats.last_reading = Some(reading);
        self.start_conversion();
    }

    pub fn free(self) -> (PIN, ADC) {
        (self.pin, self.adc)
    }
}
