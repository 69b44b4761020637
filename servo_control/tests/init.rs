//! Host-level tests for the one-time hardware bring-up sequence.

use servo_control::config::POT_ADC_CHANNEL;
use servo_control::hw::{self, AdcConfig, Alignment, Reference, ServoHardware};
use servo_control::sim::SimHardware;

#[test]
fn init_applies_full_configuration() {
    let mut board = SimHardware::default();
    hw::init(&mut board, &AdcConfig::potentiometer(POT_ADC_CHANNEL));

    assert_eq!(
        board,
        SimHardware {
            pulse_pin_output: true,
            pulse_pin_high: false,
            pot_pin_analog: true,
            reference: Some(Reference::Supply),
            alignment: Some(Alignment::Left),
            channel: Some(POT_ADC_CHANNEL),
            adc_enabled: true,
        }
    );
}

#[test]
fn init_is_idempotent() {
    let config = AdcConfig::potentiometer(POT_ADC_CHANNEL);

    let mut once = SimHardware::default();
    hw::init(&mut once, &config);

    let mut twice = SimHardware::default();
    hw::init(&mut twice, &config);
    hw::init(&mut twice, &config);

    assert_eq!(once, twice);
}

/// Records the order of the bring-up steps.
#[derive(Default)]
struct StepLog {
    steps: Vec<&'static str>,
}

impl ServoHardware for StepLog {
    fn configure_pulse_output(&mut self) {
        self.steps.push("output");
    }

    fn configure_analog_input(&mut self) {
        self.steps.push("input");
    }

    fn select_reference(&mut self, _reference: Reference) {
        self.steps.push("reference");
    }

    fn select_alignment(&mut self, _alignment: Alignment) {
        self.steps.push("alignment");
    }

    fn select_channel(&mut self, _channel: u8) {
        self.steps.push("channel");
    }

    fn enable_adc(&mut self) {
        self.steps.push("enable");
    }
}

#[test]
fn adc_is_enabled_last() {
    let mut log = StepLog::default();
    hw::init(&mut log, &AdcConfig::potentiometer(1));

    assert_eq!(
        log.steps,
        ["output", "input", "reference", "alignment", "channel", "enable"]
    );
}
