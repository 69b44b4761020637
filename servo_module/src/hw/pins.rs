// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the NUCLEO-F767ZI servo module.
//!
//! | Signal        | Pin  | Header     |
//! |---------------|------|------------|
//! | Servo pulse   | PD14 | D10        |
//! | Potentiometer | PA3  | A0 (IN3)   |
//! | USART3 TX/RX  | PD8/PD9 | ST-LINK VCP |
//!
//! The pulse and potentiometer pins are set up by [`super::ServoBoard`] with raw register writes
//! so that every configuration step can be repeated safely; only the debug UART goes through the
//! HAL.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use stm32f7xx_hal::{
    gpio::{gpiod, Alternate},
    pac,
    prelude::*,
};

/// Servo pulse output pin number on GPIOD.
pub const PULSE_PIN: u8 = 14;

/// Potentiometer input pin number on GPIOA.
pub const POT_PIN: u8 = 3;

pub struct BoardPins {
    pub usart3: Usart3Pins,
}

pub struct Usart3Pins {
    pub tx: gpiod::PD8<Alternate<7>>,
    pub rx: gpiod::PD9<Alternate<7>>,
}

impl BoardPins {
    /// Create the HAL-managed pins.
    ///
    /// ```rust
    /// let pins = BoardPins::new(dp.GPIOD);
    /// ```
    pub fn new(gpiod: pac::GPIOD) -> Self {
        let gpiod = gpiod.split();

        Self {
            usart3: Usart3Pins {
                tx: gpiod.pd8.into_alternate::<7>(),
                rx: gpiod.pd9.into_alternate::<7>(),
            },
        }
    }
}

/// Servo pulse output on PD14, driven through the atomic set/reset register.
pub struct PulsePin {
    _private: (),
}

impl PulsePin {
    /// Only [`super::ServoBoard`] hands these out, after the pin has been made an output.
    pub(super) const fn new() -> Self {
        Self { _private: () }
    }
}

impl ErrorType for PulsePin {
    type Error = Infallible;
}

impl OutputPin for PulsePin {
    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        let gpiod = unsafe { &*pac::GPIOD::ptr() };
        gpiod.bsrr.write(|w| unsafe { w.bits(1 << PULSE_PIN) });
        Ok(())
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let gpiod = unsafe { &*pac::GPIOD::ptr() };
        gpiod.bsrr.write(|w| unsafe { w.bits(1 << (PULSE_PIN + 16)) });
        Ok(())
    }
}
