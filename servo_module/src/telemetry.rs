//! Debug log lines printed over the USART.

use core::fmt::Write;

#[cfg(not(feature = "busy-wait"))]
use servo_control::control::SchedulerStats;
#[cfg(feature = "busy-wait")]
use servo_control::{control::GroupReport, Result};
use servo_control::ServoConfig;
use stm32f7xx_hal::serial::Instance;

use crate::hw::Usart;

/// Hold groups between group reports (one second of output at 5 x 20 ms).
#[cfg(feature = "busy-wait")]
pub const LOG_EVERY_GROUPS: u32 = 10;

pub fn banner<U: Instance>(usart: &mut Usart<U>, config: &ServoConfig, mode: &str) {
    usart.println("");
    usart.println("servo_module");
    let _ = writeln!(
        usart,
        "mode={mode} period={}us neutral={}us magnitude={}us hold={} mapping={:?}\r",
        config.period_us, config.neutral_us, config.magnitude_us, config.hold_pulses, config.mapping
    );
    let top = config.width_for(u8::MAX);
    if !top.within_datasheet() || !config.initial_width().within_datasheet() {
        usart.println("warning: pulse range leaves the 900-2100 us servo range");
    }
}

/// Prints every [`LOG_EVERY_GROUPS`]th report and every error.
#[cfg(feature = "busy-wait")]
pub struct GroupLog {
    groups: u32,
}

#[cfg(feature = "busy-wait")]
impl GroupLog {
    pub const fn new() -> Self {
        Self { groups: 0 }
    }

    pub fn record<U: Instance>(&mut self, usart: &mut Usart<U>, report: &Result<GroupReport>) {
        self.groups = self.groups.wrapping_add(1);

        match report {
            Ok(report) if self.groups % LOG_EVERY_GROUPS == 0 => {
                usart.print_field("group", self.groups);
                usart.print_field("reading", u32::from(report.reading));
                usart.print_field("width", u32::from(report.next.as_us()));
                usart.println("");
            }
            Ok(_) => {}
            Err(e) => {
                let _ = writeln!(usart, "group {}: {e}\r", self.groups);
            }
        }
    }
}

#[cfg(not(feature = "busy-wait"))]
pub fn scheduler_stats<U: Instance>(usart: &mut Usart<U>, stats: &SchedulerStats, width_us: u16) {
    usart.print_field("groups", stats.groups);
    usart.print_field("conversions", stats.conversions);
    usart.print_field("late", stats.late_conversions);
    usart.print_field("restarts", stats.restarts);
    match stats.last_reading {
        Some(reading) => usart.print_field("reading", u32::from(reading)),
        None => usart.write_str("reading=- "),
    }
    usart.print_field("width", u32::from(width_us));
    usart.println("");
}
