// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Potentiometer-controlled servo firmware for the NUCLEO-F767ZI.
//!
//! The potentiometer wiper on A0 (PA3) sets the pulse width on D10 (PD14). By default the pulse
//! train is generated from the TIM2 interrupt; build with `--features busy-wait` for the blocking
//! loop.

#![no_main]
#![no_std]

use cortex_m_rt::entry;
use panic_halt as _;

use hal::{
    pac,
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use servo_control::config::POT_ADC_CHANNEL;
use servo_control::hw::AdcConfig;
use servo_control::pulse::Mapping;
use servo_control::ServoConfig;

mod hw;
mod telemetry;

use hw::{ServoBoard, SysTickDelay, Usart};

const fn servo_config() -> ServoConfig {
    let config = ServoConfig::new();
    if cfg!(feature = "symmetric-mapping") {
        config.with_mapping(Mapping::Symmetric)
    } else {
        config
    }
}

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();

    // USART3 (ST-LINK VCP)
    let pins = hw::BoardPins::new(dp.GPIOD);
    let usart_cfg = Config {
        baud_rate: 115_200.bps(),
        ..Default::default()
    };
    let serial = Serial::new(
        dp.USART3,
        (pins.usart3.tx, pins.usart3.rx),
        &clocks,
        usart_cfg,
    );
    let mut usart = Usart::new(serial);

    let config = servo_config();
    let mode = if cfg!(feature = "busy-wait") {
        "busy-wait"
    } else {
        "interrupt"
    };
    telemetry::banner(&mut usart, &config, mode);

    if let Err(e) = config.validate() {
        use core::fmt::Write;
        let _ = writeln!(usart, "invalid configuration: {e}\r");
        loop {
            cortex_m::asm::wfi();
        }
    }

    let mut board = ServoBoard::new(dp.ADC1);
    servo_control::hw::init(&mut board, &AdcConfig::potentiometer(POT_ADC_CHANNEL));
    let (pin, adc) = board.into_parts();

    let delay = SysTickDelay::new(cortex_m::delay::Delay::new(cp.SYST, clocks.sysclk().raw()));

    #[cfg(feature = "busy-wait")]
    {
        let mut log = telemetry::GroupLog::new();
        servo_control::HeldPulseLoop::new(pin, adc, delay, config)
            .run_with(|report| log.record(&mut usart, report))
    }

    #[cfg(not(feature = "busy-wait"))]
    {
        let timer = hw::PulseTimer::tim2(dp.TIM2, clocks.timclk1().raw());
        scheduled::run(pin, adc, timer, delay, config, usart)
    }
}

/// Interrupt-driven pulse generation.
#[cfg(not(feature = "busy-wait"))]
mod scheduled {
    use core::cell::RefCell;

    use cortex_m::interrupt::Mutex;
    use embedded_hal::delay::DelayNs;
    use stm32f7xx_hal::pac::{self, interrupt};

    use servo_control::{PulseScheduler, ServoConfig};

    use crate::hw::{Adc, PulsePin, PulseTimer, SysTickDelay, Usart};
    use crate::telemetry;

    type Scheduler = PulseScheduler<PulsePin, Adc<pac::ADC1>>;

    /// Retry delay after a failed compare event (us).
    const RETRY_US: u32 = 1;

    const LOG_PERIOD_MS: u32 = 1_000;

    static SCHEDULER: Mutex<RefCell<Option<(Scheduler, PulseTimer<pac::TIM2>)>>> =
        Mutex::new(RefCell::new(None));

    pub fn run(
        pin: PulsePin,
        adc: Adc<pac::ADC1>,
        mut timer: PulseTimer<pac::TIM2>,
        mut delay: SysTickDelay,
        config: ServoConfig,
        mut usart: Usart<pac::USART3>,
    ) -> ! {
        let mut scheduler = PulseScheduler::new(pin, adc, config);

        // First event: start the conversion and raise the first pulse
        timer.start();
        let wait = scheduler.on_compare().unwrap_or(RETRY_US);
        timer.schedule(wait);

        cortex_m::interrupt::free(|cs| {
            SCHEDULER.borrow(cs).replace(Some((scheduler, timer)));
        });
        unsafe { cortex_m::peripheral::NVIC::unmask(pac::Interrupt::TIM2) };

        loop {
            delay.delay_ms(LOG_PERIOD_MS);

            let snapshot = cortex_m::interrupt::free(|cs| {
                SCHEDULER
                    .borrow(cs)
                    .borrow()
                    .as_ref()
                    .map(|(s, _)| (s.stats(), s.width().as_us()))
            });
            if let Some((stats, width_us)) = snapshot {
                telemetry::scheduler_stats(&mut usart, &stats, width_us);
            }
        }
    }

    #[interrupt]
    fn TIM2() {
        cortex_m::interrupt::free(|cs| {
            if let Some((scheduler, timer)) = SCHEDULER.borrow(cs).borrow_mut().as_mut() {
                timer.clear_interrupt();
                let wait = scheduler.on_compare().unwrap_or(RETRY_US);
                timer.schedule(wait);
            }
        });
    }
}
