// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Busy-wait servo loop.
//!
//! Each iteration starts an ADC conversion, emits one hold group of pulses with blocking delays and
//! then reads the result register. The conversion runs while the pulses are generated and is
//! assumed to have finished by the time the group ends (5 x 20 ms against a conversion time in the
//! tens of microseconds). If it has not, the previous result is used for one more group.
//!
//! Typical usage pattern:
//!
//! ```ignore
//! hw::init(&mut board, &AdcConfig::potentiometer(POT_ADC_CHANNEL));
//! HeldPulseLoop::new(pin, adc, delay, ServoConfig::default()).run()
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::ServoConfig;
use crate::hw::AnalogInput;
use crate::pulse::PulseWidth;
use crate::{Error, Result};

/// Outcome of one hold group.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GroupReport {
    /// Reading taken at the end of the group.
    pub reading: u8,
    /// Width emitted during the group.
    pub held: PulseWidth,
    /// Width the next group will emit.
    pub next: PulseWidth,
}

pub struct HeldPulseLoop<PIN, ADC, DELAY> {
    pin: PIN,
    adc: ADC,
    delay: DELAY,
    config: ServoConfig,
    width: PulseWidth,
}

impl<PIN, ADC, DELAY> HeldPulseLoop<PIN, ADC, DELAY>
where
    PIN: OutputPin,
    ADC: AnalogInput,
    DELAY: DelayNs,
{
    /// Create the loop. Hardware must already be initialized.
    pub fn new(pin: PIN, adc: ADC, delay: DELAY, config: ServoConfig) -> Self {
        Self {
            pin,
            adc,
            delay,
            width: config.initial_width(),
            config,
        }
    }

    /// Width emitted by the next pulse.
    #[inline]
    pub fn width(&self) -> PulseWidth {
        self.width
    }

    #[inline]
    pub fn config(&self) -> &ServoConfig {
        &self.config
    }

    /// Emit one pulse frame at the current width.
    pub fn emit_pulse(&mut self) -> Result<()> {
        let (high_us, low_us) = self.width.split(self.config.period_us);

        self.pin.set_high().map_err(Error::pin)?;
        self.delay.delay_us(u32::from(high_us));

        self.pin.set_low().map_err(Error::pin)?;
        self.delay.delay_us(u32::from(low_us));

        Ok(())
    }

    /// Run one iteration: start a conversion, emit the hold group, then read and remap.
    pub fn run_group(&mut self) -> Result<GroupReport> {
        self.adc.start_conversion();

        let held = self.width;
        for _ in 0..self.config.hold_pulses {
            self.emit_pulse()?;
        }

        // No completion check: a late conversion leaves the previous result in the register.
        let reading = self.adc.read_high_byte();
        self.width = self.config.width_for(reading);

        Ok(GroupReport {
            reading,
            held,
            next: self.width,
        })
    }

    /// Run until reset or power loss.
    pub fn run(self) -> ! {
        self.run_with(|_| {})
    }

    /// Run until reset or power loss, handing every group result to `on_group`.
    ///
    /// A pin error skips the rest of that group; the next group starts normally.
    pub fn run_with<F>(mut self, mut on_group: F) -> !
    where
        F: FnMut(&Result<GroupReport>),
    {
        loop {
            let report = self.run_group();
            on_group(&report);
        }
    }

    pub fn free(self) -> (PIN, ADC, DELAY) {
        (self.pin, self.adc, self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{pulses, SimAdc, SimClock, SimDelay, SimPin};

    #[test]
    fn first_group_holds_initial_width() {
        let clock = SimClock::new();
        let mut pin = SimPin::<16>::new(&clock);
        let mut adc = SimAdc::new(&clock, 13);
        let mut delay = SimDelay::new(&clock);
        adc.set_input(75);

        let mut servo = HeldPulseLoop::new(&mut pin, &mut adc, &mut delay, ServoConfig::default());
        let report = servo.run_group().unwrap();

        assert_eq!(report.held.as_us(), 1500);
        assert_eq!(report.reading, 75);
        assert_eq!(report.next.as_us(), 1275);
        assert_eq!(servo.width().as_us(), 1275);

        let frames = pulses::<16>(pin.edges(), clock.now_us());
        assert_eq!(frames.len(), 5);
        assert!(frames.iter().all(|p| p.high_us == 1500 && p.low_us == 18_500));
    }

    #[test]
    fn group_takes_five_periods() {
        let clock = SimClock::new();
        let mut pin = SimPin::<16>::new(&clock);
        let mut adc = SimAdc::new(&clock, 13);
        let mut delay = SimDelay::new(&clock);

        let mut servo = HeldPulseLoop::new(&mut pin, &mut adc, &mut delay, ServoConfig::default());
        servo.run_group().unwrap();

        assert_eq!(clock.now_us(), 100_000);
    }
}
