// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Servo module hardware bring-up.
//!
//! Implements the configuration steps of [`ServoHardware`] as read-modify-write register updates
//! that set fields to fixed values, so running [`servo_control::hw::init`] twice leaves the board
//! in the same state.

use servo_control::hw::{Alignment, Reference, ServoHardware};
use stm32f7xx_hal::pac;

use super::adc::Adc;
use super::pins::{PulsePin, POT_PIN, PULSE_PIN};

const MODE_MASK: u32 = 0b11;
const MODE_OUTPUT: u32 = 0b01;
const MODE_ANALOG: u32 = 0b11;

pub struct ServoBoard {
    adc: Adc<pac::ADC1>,
}

impl ServoBoard {
    pub fn new(adc1: pac::ADC1) -> Self {
        Self {
            adc: Adc::adc1(adc1),
        }
    }

    /// Split into the pulse pin and the ADC for the control loop.
    pub fn into_parts(self) -> (PulsePin, Adc<pac::ADC1>) {
        (PulsePin::new(), self.adc)
    }
}

fn set_mode(moder: u32, pin: u8, mode: u32) -> u32 {
    let shift = 2 * u32::from(pin);
    (moder & !(MODE_MASK << shift)) | (mode << shift)
}

impl ServoHardware for ServoBoard {
    fn configure_pulse_output(&mut self) {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.ahb1enr.modify(|_, w| w.gpioden().set_bit());

        let gpiod = unsafe { &*pac::GPIOD::ptr() };

        // Drive low before switching to output so the servo never sees a spurious pulse
        gpiod
            .bsrr
            .write(|w| unsafe { w.bits(1 << (PULSE_PIN + 16)) });
        gpiod
            .otyper
            .modify(|r, w| unsafe { w.bits(r.bits() & !(1 << PULSE_PIN)) });
        gpiod
            .moder
            .modify(|r, w| unsafe { w.bits(set_mode(r.bits(), PULSE_PIN, MODE_OUTPUT)) });
    }

    fn configure_analog_input(&mut self) {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.ahb1enr.modify(|_, w| w.gpioaen().set_bit());

        let gpioa = unsafe { &*pac::GPIOA::ptr() };

        // No pull resistors on the divider
        gpioa
            .pupdr
            .modify(|r, w| unsafe { w.bits(r.bits() & !(MODE_MASK << (2 * u32::from(POT_PIN)))) });
        gpioa
            .moder
            .modify(|r, w| unsafe { w.bits(set_mode(r.bits(), POT_PIN, MODE_ANALOG)) });
    }

    /// The STM32F7 ADC always converts against VDDA/VREF+; there is no reference mux.
    fn select_reference(&mut self, _reference: Reference) {}

    fn select_alignment(&mut self, alignment: Alignment) {
        self.adc.set_alignment(alignment);
    }

    fn select_channel(&mut self, channel: u8) {
        self.adc.select_channel(channel);
    }

    fn enable_adc(&mut self) {
        self.adc.enable();
    }
}
