//! `embedded-hal` 1.0 delay over the SysTick busy-wait delay.

use cortex_m::delay::Delay;
use embedded_hal::delay::DelayNs;

pub struct SysTickDelay(Delay);

impl SysTickDelay {
    pub fn new(delay: Delay) -> Self {
        Self(delay)
    }
}

impl DelayNs for SysTickDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.delay_us(ns.div_ceil(1_000));
    }

    #[inline]
    fn delay_us(&mut self, us: u32) {
        self.0.delay_us(us);
    }

    #[inline]
    fn delay_ms(&mut self, ms: u32) {
        self.0.delay_ms(ms);
    }
}
