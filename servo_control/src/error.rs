// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Error type shared by the control loop and configuration checks.

use derive_more::{Display, Error};
use embedded_hal::digital::ErrorKind;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, Error)]
pub enum Error {
    /// The servo output pin rejected a level change.
    #[display("servo pin error: {kind:?}")]
    Pin {
        #[error(not(source))]
        kind: ErrorKind,
    },

    /// A pulse would not fit inside the servo frame.
    #[display("pulse of {width_us} us does not fit a {period_us} us period")]
    PulseExceedsPeriod { width_us: u16, period_us: u16 },

    /// The swing around neutral reaches below zero.
    #[display("magnitude {magnitude_us} us exceeds neutral {neutral_us} us")]
    MagnitudeExceedsNeutral { neutral_us: u16, magnitude_us: u16 },

    /// A hold group must contain at least one pulse.
    #[display("hold group is empty")]
    EmptyHoldGroup,
}

impl Error {
    pub(crate) fn pin<E: embedded_hal::digital::Error>(err: E) -> Self {
        Self::Pin { kind: err.kind() }
    }
}
