//! ADC1 support for the potentiometer input using direct PAC register access.
//!
//! The converter runs single conversions on a software trigger. Results are 12-bit and
//! left-aligned, so the upper byte of the data register is the 8-bit reading.
//!
//! Example:
//! ```no_run
//! let mut adc = Adc::adc1(dp.ADC1);
//! adc.select_channel(3);
//! adc.enable();
//! adc.start_conversion();
//! ```

use servo_control::hw::{Alignment, AnalogInput};
use stm32f7xx_hal::pac;

/// Generic ADC wrapper over a PAC ADCx peripheral.
pub struct Adc<ADC> {
    adc: ADC,
}

fn configure_common() {
    let common = unsafe { &*pac::ADC_COMMON::ptr() };

    // ADC prescaler: PCLK2 / 4
    common.ccr.modify(|_, w| w.adcpre().div4());
}

impl Adc<pac::ADC1> {
    /// Clock ADC1 and put it in single-conversion, software-trigger mode. The converter is left
    /// powered down until [`Adc::enable`].
    pub fn adc1(adc1: pac::ADC1) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.adc1en().set_bit());

        configure_common();

        adc1.cr1.modify(|_, w| w.res().bits(0b00));
        adc1.cr2.modify(|_, w| {
            w.cont().clear_bit();
            w.exten().disabled();
            w
        });

        // Sequence length = 1 conversion
        adc1.sqr1.modify(|_, w| w.l().bits(0));

        Self { adc: adc1 }
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.adc.cr2.modify(|_, w| match alignment {
            Alignment::Right => w.align().right(),
            Alignment::Left => w.align().left(),
        });
    }

    /// Route `channel` to the first (only) conversion slot with the longest sample time.
    pub fn select_channel(&mut self, channel: u8) {
        if channel <= 9 {
            self.adc.smpr2.modify(|_, w| match channel {
                0 => w.smp0().bits(0b111),
                1 => w.smp1().bits(0b111),
                2 => w.smp2().bits(0b111),
                3 => w.smp3().bits(0b111),
                4 => w.smp4().bits(0b111),
                5 => w.smp5().bits(0b111),
                6 => w.smp6().bits(0b111),
                7 => w.smp7().bits(0b111),
                8 => w.smp8().bits(0b111),
                9 => w.smp9().bits(0b111),
                _ => unreachable!(),
            });
        }

        self.adc
            .sqr3
            .modify(|_, w| unsafe { w.sq1().bits(channel & 0x1F) });
    }

    #[inline]
    pub fn enable(&mut self) {
        self.adc.cr2.modify(|_, w| w.adon().set_bit());
    }
}

impl AnalogInput for Adc<pac::ADC1> {
    #[inline]
    fn start_conversion(&mut self) {
        self.adc.cr2.modify(|_, w| w.swstart().set_bit());
    }

    #[inline]
    fn conversion_complete(&self) -> bool {
        self.adc.sr.read().eoc().bit_is_set()
    }

    /// Reading the data register also clears EOC.
    #[inline]
    fn read_high_byte(&mut self) -> u8 {
        (self.adc.dr.read().data().bits() >> 8) as u8
    }
}
