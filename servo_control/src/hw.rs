// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Hardware seams between the control logic and a concrete board.
//!
//! A board provides two things:
//!
//! - [`ServoHardware`]: the register writes that put the pulse pin and the ADC into the
//!   configuration the control loop relies on. [`init`] runs them once, in order, at startup.
//! - [`AnalogInput`]: a one-shot ADC whose result register holds the 8 most significant bits of
//!   the last completed conversion.
//!
//! The servo pulse pin itself is any [`embedded_hal::digital::OutputPin`].

/// ADC voltage reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reference {
    /// Supply rail (Vcc / VDDA). No external reference.
    Supply,
}

/// Conversion result alignment in the data register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Alignment {
    Right,
    /// Most significant 8 bits land in one directly readable byte.
    Left,
}

/// Analog front-end configuration applied by [`init`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AdcConfig {
    pub reference: Reference,
    pub alignment: Alignment,
    pub channel: u8,
}

impl AdcConfig {
    /// Supply-referenced, left-adjusted conversions on `channel`.
    pub const fn potentiometer(channel: u8) -> Self {
        Self {
            reference: Reference::Supply,
            alignment: Alignment::Left,
            channel,
        }
    }
}

/// One-time configuration steps of the servo module hardware.
///
/// Every method is a plain register write: calling it again with the same argument leaves the
/// hardware in the same state.
pub trait ServoHardware {
    /// Servo pulse pin as a push-pull output, driven low.
    fn configure_pulse_output(&mut self);

    /// Potentiometer pin as a high-impedance input routed to the ADC.
    fn configure_analog_input(&mut self);

    fn select_reference(&mut self, reference: Reference);

    fn select_alignment(&mut self, alignment: Alignment);

    fn select_channel(&mut self, channel: u8);

    fn enable_adc(&mut self);
}

/// Bring the servo hardware into its running configuration.
///
/// Must complete before the control loop starts. There is nothing to report on failure: a
/// misconfigured board only shows up as a wrong pulse train.
pub fn init<H: ServoHardware>(hw: &mut H, config: &AdcConfig) {
    hw.configure_pulse_output();
    hw.configure_analog_input();
    hw.select_reference(config.reference);
    hw.select_alignment(config.alignment);
    hw.select_channel(config.channel);
    hw.enable_adc();
}

/// Single-channel ADC with a software conversion trigger.
pub trait AnalogInput {
    /// Start a conversion and return immediately.
    fn start_conversion(&mut self);

    /// `true` once the most recently started conversion has finished.
    fn conversion_complete(&self) -> bool;

    /// Upper 8 bits of the result register.
    ///
    /// Does not wait. If the current conversion is still running this is the previous result.
    fn read_high_byte(&mut self) -> u8;
}

impl<T: AnalogInput + ?Sized> AnalogInput for &mut T {
    #[inline]
    fn start_conversion(&mut self) {
        T::start_conversion(self);
    }

    #[inline]
    fn conversion_complete(&self) -> bool {
        T::conversion_complete(self)
    }

    #[inline]
    fn read_high_byte(&mut self) -> u8 {
        T::read_high_byte(self)
    }
}
