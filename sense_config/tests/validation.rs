use rstest::rstest;
use sense_config::load_toml;

#[test]
fn empty_document_yields_runnable_defaults() {
    let cfg = load_toml("").expect("parse");
    cfg.validate().expect("defaults validate");
    assert_eq!(cfg.faucet.threshold_cm, 10.0);
    assert_eq!(cfg.faucet.valve_open_ms, 5000);
    assert_eq!(cfg.gas.low_ppm, 200.0);
    assert_eq!(cfg.gas.high_ppm, 500.0);
    assert_eq!(cfg.calibration.samples, 10);
    assert!(cfg.calibration.r0.is_none());
    assert_eq!(cfg.poll.rate_hz, 20);
    assert_eq!(cfg.pins.trig, 5);
}

#[test]
fn full_document_overrides_every_section() {
    let cfg = load_toml(
        r#"
[pins]
trig = 7
echo = 8
valve = 9
status_led = 10
gas_adc = 11
green_led = 12
yellow_led = 13
red_led = 14

[faucet]
threshold_cm = 15.5
valve_open_ms = 8000
status_interval_ms = 500
echo_timeout_ms = 25

[gas]
low_ppm = 100.0
high_ppm = 300.0
log_interval_ms = 2000
adc_full_scale = 1023.0

[calibration]
samples = 20
clean_air_ratio = 9.83
curve_a = 574.25
curve_b = -2.222
r0 = 42.5

[poll]
rate_hz = 50

[logging]
file = "/var/log/sense.log"
level = "debug"
rotation = "daily"
"#,
    )
    .expect("parse");
    cfg.validate().expect("validate");
    assert_eq!(cfg.pins.echo, 8);
    assert_eq!(cfg.faucet.threshold_cm, 15.5);
    assert_eq!(cfg.gas.high_ppm, 300.0);
    assert_eq!(cfg.calibration.r0, Some(42.5));
    assert_eq!(cfg.poll.rate_hz, 50);
    assert_eq!(cfg.logging.rotation.as_deref(), Some("daily"));
}

#[rstest]
#[case("[faucet]\nthreshold_cm = 0.0", "faucet.threshold_cm")]
#[case("[faucet]\nthreshold_cm = -3.0", "faucet.threshold_cm")]
#[case("[faucet]\nvalve_open_ms = 0", "faucet.valve_open_ms")]
#[case("[faucet]\nstatus_interval_ms = 0", "faucet.status_interval_ms")]
#[case("[faucet]\necho_timeout_ms = 0", "faucet.echo_timeout_ms")]
#[case("[gas]\nlow_ppm = 0.0", "gas.low_ppm")]
#[case("[gas]\nlow_ppm = 500.0\nhigh_ppm = 200.0", "gas.low_ppm")]
#[case("[gas]\nlow_ppm = 200.0\nhigh_ppm = 200.0", "gas.low_ppm")]
#[case("[gas]\nlog_interval_ms = 0", "gas.log_interval_ms")]
#[case("[gas]\nadc_full_scale = 0.0", "gas.adc_full_scale")]
#[case("[calibration]\nsamples = 0", "calibration.samples")]
#[case("[calibration]\nclean_air_ratio = 0.0", "calibration.clean_air_ratio")]
#[case("[calibration]\ncurve_a = 0.0", "calibration.curve_a")]
#[case("[calibration]\nr0 = 0.0", "calibration.r0")]
#[case("[calibration]\nr0 = -5.0", "calibration.r0")]
#[case("[poll]\nrate_hz = 0", "poll.rate_hz")]
fn invalid_fields_are_named_in_the_error(#[case] doc: &str, #[case] field: &str) {
    let cfg = load_toml(doc).expect("parse");
    let err = cfg.validate().expect_err("must fail");
    assert!(
        format!("{err}").contains(field),
        "error `{err}` does not name `{field}`"
    );
}

#[test]
fn malformed_toml_is_a_parse_error() {
    assert!(load_toml("[faucet\nthreshold_cm = ").is_err());
    assert!(load_toml("[faucet]\nthreshold_cm = \"wide\"").is_err());
}
