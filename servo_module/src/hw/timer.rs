//! Compare-driven microsecond timer on TIM2.
//!
//! TIM2 free-runs at 1 MHz over its full 32-bit range. Each compare event moves CCR1 forward by
//! the delay the scheduler asks for, counted from the previous compare rather than from the
//! interrupt, so handler latency never stretches the servo period.

use servo_control::control::CompareDeadline;
use stm32f7xx_hal::pac;

const TICK_HZ: u32 = 1_000_000;

pub struct PulseTimer<TIM> {
    tim: TIM,
    deadline: CompareDeadline,
}

impl PulseTimer<pac::TIM2> {
    /// Start TIM2 free-running at 1 us per tick. `timer_clk_hz` is the APB1 timer clock.
    pub fn tim2(tim2: pac::TIM2, timer_clk_hz: u32) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim2en().set_bit());

        let tim = tim2;

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        let psc = (timer_clk_hz / TICK_HZ).saturating_sub(1);
        tim.psc.write(|w| unsafe { w.bits(psc) });

        // Auto-reload: max 32-bit
        tim.arr.write(|w| w.bits(0xFFFF_FFFF));

        // Load PSC and reset the counter
        tim.egr.write(|w| w.ug().set_bit());
        tim.sr.modify(|_, w| w.uif().clear_bit().cc1if().clear_bit());

        tim.dier.modify(|_, w| w.cc1ie().set_bit());
        tim.cr1.modify(|_, w| w.cen().set_bit());

        let now = tim.cnt.read().bits();
        Self {
            tim,
            deadline: CompareDeadline::starting_at(now),
        }
    }

    /// Count the next delay from now. Call right before the first event.
    pub fn start(&mut self) {
        self.deadline = CompareDeadline::starting_at(self.tim.cnt.read().bits());
    }

    /// Schedule the next compare interrupt `us` microseconds after the previous one.
    pub fn schedule(&mut self, us: u32) {
        let at = self.deadline.advance(us);
        self.tim.ccr1().write(|w| unsafe { w.bits(at) });

        // Already behind: the counter will not match again until it wraps
        if self.deadline.has_passed(self.tim.cnt.read().bits()) {
            self.tim.egr.write(|w| w.cc1g().set_bit());
        }
    }

    #[inline]
    pub fn clear_interrupt(&mut self) {
        self.tim.sr.modify(|_, w| w.cc1if().clear_bit());
    }
}
