// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Servo Control Module
//!
//! Board-independent logic for the potentiometer-to-servo control module: a potentiometer is sampled
//! through the ADC and a 50 Hz servo pulse is generated whose on-time follows the reading.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`config`] | Timing constants and [`ServoConfig`] |
//! | [`pulse`] | Pulse widths and reading-to-width mappings |
//! | [`hw`] | Traits a board implements, and the one-time hardware bring-up sequence |
//! | [`control`] | The busy-wait loop and the timer-driven pulse scheduler |
//! | [`sim`] | Host simulation of the pin, ADC and clock, with VCD trace output |
//!
//! The firmware for the STM32F767 lives in the `servo_module` crate. This crate has no hardware
//! dependencies and its tests run on the host:
//!
//! ```bash
//! cargo test
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![no_std]

pub mod config;
pub mod control;
mod error;
pub mod hw;
pub mod pulse;
pub mod sim;

pub use config::ServoConfig;
pub use control::{HeldPulseLoop, Phase, PulseScheduler};
pub use error::{Error, Result};
pub use pulse::{Mapping, PulseWidth};
