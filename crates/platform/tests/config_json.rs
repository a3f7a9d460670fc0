//! Configuration loading from JSON and validation of the result.

use platform::config::{DEFAULT_OUTPUT_PIN, GPIO_PIN_MAX, GPIO_PIN_MIN};
use platform::{ConfigError, ModulatorConfig, PinNumber};

#[test]
fn empty_object_is_the_default_config() {
    let config: ModulatorConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, ModulatorConfig::default());
}

#[test]
fn default_round_trips_through_json() {
    let json = serde_json::to_string(&ModulatorConfig::default()).unwrap();
    let back: ModulatorConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ModulatorConfig::default());
}

#[test]
fn default_pin_is_inside_default_range() {
    let config = ModulatorConfig::default();
    let range = config.pin_range().unwrap();
    assert_eq!((range.min(), range.max()), (GPIO_PIN_MIN, GPIO_PIN_MAX));
    assert!(range.contains(PinNumber::new(DEFAULT_OUTPUT_PIN)));
    assert_eq!(config.default_pin(), PinNumber::new(17));
}

#[test]
fn narrowed_range_must_still_hold_default_pin() {
    let config: ModulatorConfig =
        serde_json::from_str(r#"{ "pin_min": 20, "pin_max": 26 }"#).unwrap();
    assert_eq!(
        config.validate(),
        Err(ConfigError::DefaultPin {
            pin: 17,
            min: 20,
            max: 26
        })
    );

    let config: ModulatorConfig =
        serde_json::from_str(r#"{ "pin_min": 20, "pin_max": 26, "default_pin": 21 }"#).unwrap();
    assert!(config.validate().is_ok());
}

#[test]
fn negative_samples_per_bit_is_accepted_and_clamped() {
    let config: ModulatorConfig = serde_json::from_str(r#"{ "samples_per_bit": -5 }"#).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.effective_samples_per_bit(), 1);
    assert_eq!(config.sample_duration(), std::time::Duration::from_millis(100));
}

#[test]
fn wrong_field_type_is_a_parse_error() {
    assert!(serde_json::from_str::<ModulatorConfig>(r#"{ "pin_min": "two" }"#).is_err());
}
