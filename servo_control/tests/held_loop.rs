//! Host-level tests for the busy-wait servo loop, run against the simulated pin, ADC and clock.

use servo_control::config::{HOLD_PULSES, PERIOD_US};
use servo_control::sim::{pulses, Pulse, SimAdc, SimClock, SimDelay, SimPin};
use servo_control::{HeldPulseLoop, ServoConfig};

/// Typical conversion time of a single 12-bit conversion plus sampling (us).
const FAST_CONVERSION_US: u32 = 13;

fn high_times(frames: &[Pulse]) -> Vec<u32> {
    frames.iter().map(|p| p.high_us).collect()
}

#[test]
fn reading_maps_to_offset_width_for_every_value() {
    let clock = SimClock::new();
    let mut pin = SimPin::<16>::new(&clock);
    let adc = SimAdc::new(&clock, FAST_CONVERSION_US);
    let mut delay = SimDelay::new(&clock);
    let mut servo = HeldPulseLoop::new(&mut pin, &adc, &mut delay, ServoConfig::default());

    for reading in 0..=u8::MAX {
        adc.set_input(reading);
        let report = servo.run_group().unwrap();
        assert_eq!(report.reading, reading);
        assert_eq!(report.next.as_us(), 1200 + u16::from(reading));
        assert!(report.next.as_us() <= 1455);
    }
}

#[test]
fn scenario_readings() {
    for (reading, expected_us) in [(0, 1200), (255, 1455), (75, 1275)] {
        let clock = SimClock::new();
        let mut pin = SimPin::<32>::new(&clock);
        let adc = SimAdc::new(&clock, FAST_CONVERSION_US);
        let mut delay = SimDelay::new(&clock);
        adc.set_input(reading);

        let mut servo = HeldPulseLoop::new(&mut pin, &adc, &mut delay, ServoConfig::default());
        servo.run_group().unwrap();
        assert_eq!(servo.width().as_us(), expected_us);
        servo.run_group().unwrap();
        drop(servo);

        let frames = pulses::<16>(pin.edges(), clock.now_us());
        assert_eq!(frames.len(), 10);
        assert!(high_times(&frames[..5]).iter().all(|&h| h == 1500));
        assert!(high_times(&frames[5..])
            .iter()
            .all(|&h| h == u32::from(expected_us)));
        assert_eq!(ServoConfig::default().width_for(reading).as_us(), expected_us);
    }
}

#[test]
fn never_reaches_symmetric_upper_bound() {
    let top = ServoConfig::default().width_for(u8::MAX);
    assert!(top.as_us() < 1800, "offset mapping tops out at {top}");
}

#[test]
fn every_pulse_fills_the_period() {
    for width_us in [0, 1, 1200, 1455, 1500, 10_000, 19_999, PERIOD_US] {
        let clock = SimClock::new();
        let mut pin = SimPin::<16>::new(&clock);
        let adc = SimAdc::new(&clock, FAST_CONVERSION_US);
        let mut delay = SimDelay::new(&clock);
        let config = ServoConfig::default().with_initial_us(width_us);

        let mut servo = HeldPulseLoop::new(&mut pin, &adc, &mut delay, config);
        servo.run_group().unwrap();
        drop(servo);

        let frames = pulses::<16>(pin.edges(), clock.now_us());
        assert_eq!(frames.len(), usize::from(HOLD_PULSES), "width {width_us}");
        for frame in &frames {
            assert_eq!(frame.high_us, u32::from(width_us));
            assert_eq!(frame.low_us, u32::from(PERIOD_US - width_us));
            assert_eq!(frame.period_us(), u32::from(PERIOD_US));
        }
    }
}

#[test]
fn one_conversion_per_group() {
    let clock = SimClock::new();
    let mut pin = SimPin::<256>::new(&clock);
    let adc = SimAdc::new(&clock, FAST_CONVERSION_US);
    let mut delay = SimDelay::new(&clock);
    let mut servo = HeldPulseLoop::new(&mut pin, &adc, &mut delay, ServoConfig::default());

    for group in 1..=20 {
        servo.run_group().unwrap();
        assert_eq!(adc.requests(), group);
        assert_eq!(adc.starts(), group);
    }
    drop(servo);

    let frames = pulses::<128>(pin.edges(), clock.now_us());
    assert_eq!(frames.len(), 20 * usize::from(HOLD_PULSES));
    assert!(!pin.overflowed());
}

#[test]
fn slow_conversion_reads_stale_value_for_one_group() {
    let clock = SimClock::new();
    let mut pin = SimPin::<64>::new(&clock);
    let adc = SimAdc::new(&clock, FAST_CONVERSION_US);
    let mut delay = SimDelay::new(&clock);
    let mut servo = HeldPulseLoop::new(&mut pin, &adc, &mut delay, ServoConfig::default());

    adc.set_input(75);
    assert_eq!(servo.run_group().unwrap().next.as_us(), 1275);

    // Conversion outlasts a whole group (100 ms).
    adc.set_conversion_us(150_000);
    adc.set_input(200);
    let stale = servo.run_group().unwrap();
    assert_eq!(stale.reading, 75);
    assert_eq!(stale.next.as_us(), 1275);

    // The late conversion lands during this group; its start request is ignored.
    let caught_up = servo.run_group().unwrap();
    assert_eq!(caught_up.reading, 200);
    assert_eq!(caught_up.next.as_us(), 1400);
    assert_eq!(adc.requests(), 3);
    assert_eq!(adc.starts(), 2);

    servo.run_group().unwrap();
    drop(servo);

    let frames = pulses::<32>(pin.edges(), clock.now_us());
    assert_eq!(frames.len(), 20);
    assert!(frames.iter().all(|p| p.period_us() == u32::from(PERIOD_US)));

    let expected: Vec<u32> = [1500, 1275, 1275, 1400]
        .iter()
        .flat_map(|&w| [w; HOLD_PULSES as usize])
        .collect();
    assert_eq!(high_times(&frames), expected);
}

#[test]
fn free_returns_peripherals() {
    let clock = SimClock::new();
    let pin = SimPin::<4>::new(&clock);
    let adc = SimAdc::new(&clock, FAST_CONVERSION_US);
    let delay = SimDelay::new(&clock);

    let servo = HeldPulseLoop::new(pin, &adc, delay, ServoConfig::default());
    let (pin, _adc, _delay) = servo.free();
    assert!(!pin.is_high());
    assert!(pin.edges().is_empty());
}
