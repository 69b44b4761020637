// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Algorithms
//!
//! Two ways to turn the potentiometer reading into a servo pulse train.
//!
//! ## Modules
//!
//! - [`held_loop`] - Busy-wait loop: start a conversion, emit a hold group of pulses with delays,
//!   read the result without checking for completion.
//! - [`scheduler`] - Timer-driven state machine producing the same pulse train from compare
//!   events, reading a conversion only once it has completed.
//! - [`deadline`] - Compare-time bookkeeping for driving the scheduler from a free-running timer.

pub mod deadline;
pub mod held_loop;
pub mod scheduler;

pub use deadline::CompareDeadline;
pub use held_loop::{GroupReport, HeldPulseLoop};
pub use scheduler::{Phase, PulseScheduler, SchedulerStats};
