use std::time::Duration;

use sense_hardware::{SimulatedGasSensor, SimulatedOutput, SimulatedProbe};
use sense_traits::{AnalogSensor, DigitalOutput, EchoProbe};

#[test]
fn probe_tracks_shared_distance() {
    let mut probe = SimulatedProbe::new(100.0);
    let hand = probe.distance();

    let far = probe
        .measure_echo(Duration::from_millis(30))
        .unwrap()
        .unwrap();
    hand.set(10.0);
    let near = probe
        .measure_echo(Duration::from_millis(30))
        .unwrap()
        .unwrap();
    assert!(near < far);
}

#[test]
fn gas_sensor_reports_shared_resistance() {
    let mut sensor = SimulatedGasSensor::new(983.0);
    let rs = sensor.value();

    assert_eq!(sensor.read_raw().unwrap(), 983.0);
    rs.set(120.0);
    assert_eq!(sensor.read_raw().unwrap(), 120.0);
}

#[test]
fn output_level_is_observable_after_move() {
    let out = SimulatedOutput::new("relay");
    let level = out.level();

    // Simulate the device taking ownership of the line.
    let mut owned = out;
    owned.write(true).unwrap();
    assert!(level.get());
}
