// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Host simulation of the servo module hardware.
//!
//! Everything shares one [`SimClock`]. [`SimDelay`] advances it, [`SimPin`] timestamps its edges
//! with it and [`SimAdc`] uses it to decide whether a conversion has finished. Nothing here
//! allocates, so the same models can run on the target for self-tests.
//!
//! ```
//! use servo_control::sim::{pulses, SimAdc, SimClock, SimDelay, SimPin};
//! use servo_control::{HeldPulseLoop, ServoConfig};
//!
//! let clock = SimClock::new();
//! let mut pin = SimPin::<32>::new(&clock);
//! let mut adc = SimAdc::new(&clock, 13);
//! let mut delay = SimDelay::new(&clock);
//! adc.set_input(255);
//!
//! let mut servo = HeldPulseLoop::new(&mut pin, &mut adc, &mut delay, ServoConfig::default());
//! servo.run_group().unwrap();
//! servo.run_group().unwrap();
//!
//! let frames = pulses::<16>(pin.edges(), clock.now_us());
//! assert_eq!(frames[4].high_us, 1500);
//! assert_eq!(frames[5].high_us, 1455);
//! ```

pub mod vcd;

use core::cell::Cell;
use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use heapless::Vec;

use crate::hw::{Alignment, AnalogInput, Reference, ServoHardware};

/// Simulated time in nanoseconds since start.
#[derive(Debug, Default)]
pub struct SimClock {
    now_ns: Cell<u64>,
}

impl SimClock {
    pub const fn new() -> Self {
        Self {
            now_ns: Cell::new(0),
        }
    }

    #[inline]
    pub fn now_ns(&self) -> u64 {
        self.now_ns.get()
    }

    #[inline]
    pub fn now_us(&self) -> u64 {
        self.now_ns.get() / 1_000
    }

    #[inline]
    pub fn advance_ns(&self, ns: u64) {
        self.now_ns.set(self.now_ns.get().saturating_add(ns));
    }

    #[inline]
    pub fn advance_us(&self, us: u32) {
        self.advance_ns(u64::from(us) * 1_000);
    }
}

/// One level change on a simulated pin.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub at_ns: u64,
    pub high: bool,
}

impl Edge {
    #[inline]
    pub fn at_us(&self) -> u64 {
        self.at_ns / 1_000
    }
}

/// Output pin recording up to `N` level changes.
///
/// Writing the level the pin already has is not an edge and is not recorded. Edges past the
/// capacity are dropped and flagged through [`SimPin::overflowed`].
pub struct SimPin<'a, const N: usize> {
    clock: &'a SimClock,
    high: bool,
    edges: Vec<Edge, N>,
    overflowed: bool,
}

impl<'a, const N: usize> SimPin<'a, N> {
    /// New pin, starting low.
    pub fn new(clock: &'a SimClock) -> Self {
        Self {
            clock,
            high: false,
            edges: Vec::new(),
            overflowed: false,
        }
    }

    #[inline]
    pub fn is_high(&self) -> bool {
        self.high
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    pub fn clear(&mut self) {
        self.edges.clear();
        self.overflowed = false;
    }

    fn drive(&mut self, high: bool) {
        if self.high == high {
            return;
        }
        self.high = high;
        let edge = Edge {
            at_ns: self.clock.now_ns(),
            high,
        };
        if self.edges.push(edge).is_err() {
            self.overflowed = true;
        }
    }
}

impl<const N: usize> ErrorType for SimPin<'_, N> {
    type Error = Infallible;
}

impl<const N: usize> OutputPin for SimPin<'_, N> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true);
        Ok(())
    }
}

/// One-shot ADC with a fixed conversion time.
///
/// The input is sampled when a conversion starts and lands in the result register once the
/// conversion time has elapsed; until then the register keeps the previous value. A start request
/// while a conversion is running is ignored, like the hardware start bit.
///
/// State lives in cells so a test can keep a shared reference (to change the input or inspect
/// counters) while the control loop owns `&SimAdc`.
pub struct SimAdc<'a> {
    clock: &'a SimClock,
    conversion_ns: Cell<u64>,
    input: Cell<u8>,
    sample: Cell<u8>,
    result: Cell<u8>,
    started_at_ns: Cell<Option<u64>>,
    requests: Cell<u32>,
    starts: Cell<u32>,
}

impl<'a> SimAdc<'a> {
    pub fn new(clock: &'a SimClock, conversion_us: u32) -> Self {
        Self {
            clock,
            conversion_ns: Cell::new(u64::from(conversion_us) * 1_000),
            input: Cell::new(0),
            sample: Cell::new(0),
            result: Cell::new(0),
            started_at_ns: Cell::new(None),
            requests: Cell::new(0),
            starts: Cell::new(0),
        }
    }

    /// Set the voltage seen by the next conversion, as an 8-bit reading.
    #[inline]
    pub fn set_input(&self, reading: u8) {
        self.input.set(reading);
    }

    #[inline]
    pub fn set_conversion_us(&self, conversion_us: u32) {
        self.conversion_ns.set(u64::from(conversion_us) * 1_000);
    }

    /// Start requests, including ignored ones.
    #[inline]
    pub fn requests(&self) -> u32 {
        self.requests.get()
    }

    /// Conversions actually started.
    #[inline]
    pub fn starts(&self) -> u32 {
        self.starts.get()
    }

    fn finished(&self) -> bool {
        match self.started_at_ns.get() {
            Some(t) => self.clock.now_ns().saturating_sub(t) >= self.conversion_ns.get(),
            None => true,
        }
    }

    fn latch(&self) {
        if self.started_at_ns.get().is_some() && self.finished() {
            self.result.set(self.sample.get());
            self.started_at_ns.set(None);
        }
    }

    fn start(&self) {
        self.latch();
        self.requests.set(self.requests.get().wrapping_add(1));
        if self.started_at_ns.get().is_none() {
            self.started_at_ns.set(Some(self.clock.now_ns()));
            self.sample.set(self.input.get());
            self.starts.set(self.starts.get().wrapping_add(1));
        }
    }

    fn read(&self) -> u8 {
        self.latch();
        self.result.get()
    }
}

impl AnalogInput for SimAdc<'_> {
    fn start_conversion(&mut self) {
        self.start();
    }

    fn conversion_complete(&self) -> bool {
        self.finished()
    }

    fn read_high_byte(&mut self) -> u8 {
        self.read()
    }
}

impl AnalogInput for &SimAdc<'_> {
    fn start_conversion(&mut self) {
        self.start();
    }

    fn conversion_complete(&self) -> bool {
        self.finished()
    }

    fn read_high_byte(&mut self) -> u8 {
        self.read()
    }
}

/// Busy-wait replacement that advances the shared clock.
pub struct SimDelay<'a> {
    clock: &'a SimClock,
}

impl<'a> SimDelay<'a> {
    pub fn new(clock: &'a SimClock) -> Self {
        Self { clock }
    }
}

impl DelayNs for SimDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.advance_ns(u64::from(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.clock.advance_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.clock.advance_ns(u64::from(ms) * 1_000_000);
    }
}

/// Register state touched by hardware initialization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimHardware {
    pub pulse_pin_output: bool,
    pub pulse_pin_high: bool,
    pub pot_pin_analog: bool,
    pub reference: Option<Reference>,
    pub alignment: Option<Alignment>,
    pub channel: Option<u8>,
    pub adc_enabled: bool,
}

impl ServoHardware for SimHardware {
    fn configure_pulse_output(&mut self) {
        self.pulse_pin_output = true;
        self.pulse_pin_high = false;
    }

    fn configure_analog_input(&mut self) {
        self.pot_pin_analog = true;
    }

    fn select_reference(&mut self, reference: Reference) {
        self.reference = Some(reference);
    }

    fn select_alignment(&mut self, alignment: Alignment) {
        self.alignment = Some(alignment);
    }

    fn select_channel(&mut self, channel: u8) {
        self.channel = Some(channel);
    }

    fn enable_adc(&mut self) {
        self.adc_enabled = true;
    }
}

/// One decoded pulse frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pulse {
    pub start_us: u64,
    pub high_us: u32,
    pub low_us: u32,
}

impl Pulse {
    #[inline]
    pub fn period_us(&self) -> u32 {
        self.high_us + self.low_us
    }
}

/// Decode recorded edges into pulse frames.
///
/// A frame runs from a rising edge to the next rising edge. The last frame ends at `end_us`.
/// Edges before the first rising edge and a trailing rise without a fall are ignored.
pub fn pulses<const N: usize>(edges: &[Edge], end_us: u64) -> Vec<Pulse, N> {
    let mut out = Vec::new();
    let mut iter = edges.iter().skip_while(|e| !e.high).peekable();

    while let Some(rise) = iter.next() {
        let Some(fall) = iter.next() else {
            break;
        };
        let next = iter.peek().map_or(end_us, |e| e.at_us());

        let pulse = Pulse {
            start_us: rise.at_us(),
            high_us: (fall.at_us() - rise.at_us()) as u32,
            low_us: next.saturating_sub(fall.at_us()) as u32,
        };
        if out.push(pulse).is_err() {
            break;
        }
    }

    out
}
