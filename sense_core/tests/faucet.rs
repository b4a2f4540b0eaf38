use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use sense_core::mocks::{ScriptedProbe, SharedOutput, TestClock};
use sense_core::{Command, Event, FaucetCfg, FaucetController, Observer, ValveState};

struct RecordingObserver {
    events: Rc<RefCell<Vec<Event>>>,
}

impl Observer for RecordingObserver {
    fn on_event(&mut self, event: &Event) {
        self.events.borrow_mut().push(*event);
    }
}

fn cfg() -> FaucetCfg {
    FaucetCfg {
        threshold_cm: 10.0,
        valve_open: Duration::from_millis(5000),
        status_interval: Duration::from_millis(1),
        echo_timeout: Duration::from_millis(30),
    }
}

#[test]
fn detection_opens_a_timed_pour_that_self_closes() {
    let clock = TestClock::new();
    let probe = ScriptedProbe::from_distances_cm([
        Some(25.0),
        Some(25.0),
        Some(5.0),
        Some(5.0),
        None,
        Some(25.0),
    ]);
    let valve_out = SharedOutput::new();
    let valve_line = valve_out.level_handle();
    let led_out = SharedOutput::new();
    let led_line = led_out.level_handle();

    let mut faucet =
        FaucetController::new(probe, valve_out, led_out, cfg(), Arc::new(clock.clone()))
            .expect("faucet");
    let events = Rc::new(RefCell::new(Vec::new()));
    faucet.register_observer(Box::new(RecordingObserver {
        events: events.clone(),
    }));
    faucet.activate().expect("activate");
    assert!(led_line.get(), "status lamp lights on activation");

    // Two far readings: nothing happens.
    clock.advance_ms(100);
    faucet.poll().expect("poll");
    clock.advance_ms(100);
    faucet.poll().expect("poll");
    assert_eq!(faucet.valve_state(), ValveState::Closed);
    assert!(events.borrow().is_empty());

    // Hand arrives at 5 cm: timed pour starts.
    clock.advance_ms(100);
    faucet.poll().expect("poll");
    assert_eq!(faucet.valve_state(), ValveState::OpenTimed);
    assert!(valve_line.get());
    assert_eq!(*events.borrow(), vec![Event::ProximityEntered]);

    // Hand stays: no duplicate event, pour continues.
    clock.advance_ms(100);
    faucet.poll().expect("poll");
    assert_eq!(faucet.valve_state(), ValveState::OpenTimed);
    assert_eq!(events.borrow().len(), 1);

    // A timeout cycle after the window elapses: timer closes the valve,
    // and the invalid reading leaves the detector untouched.
    clock.advance_ms(5000);
    faucet.poll().expect("poll");
    assert_eq!(faucet.valve_state(), ValveState::Closed);
    assert!(!valve_line.get());
    assert_eq!(events.borrow().len(), 1);

    // Hand leaves: exit event, valve stays closed.
    clock.advance_ms(100);
    faucet.poll().expect("poll");
    assert_eq!(
        *events.borrow(),
        vec![Event::ProximityEntered, Event::ProximityExited]
    );
    assert_eq!(faucet.valve_state(), ValveState::Closed);
    assert!(led_line.get(), "status lamp stays on after the hand leaves");
}

#[test]
fn re_detection_restarts_the_pour_window() {
    let clock = TestClock::new();
    let probe = ScriptedProbe::from_distances_cm([
        Some(5.0),  // enter: open timed
        Some(25.0), // exit
        Some(5.0),  // enter again: fresh window
    ]);
    let valve_out = SharedOutput::new();
    let mut faucet = FaucetController::new(
        probe,
        valve_out,
        SharedOutput::new(),
        cfg(),
        Arc::new(clock.clone()),
    )
    .expect("faucet");

    faucet.poll().expect("poll");
    assert_eq!(faucet.valve_state(), ValveState::OpenTimed);

    clock.advance_ms(3000);
    faucet.poll().expect("poll");
    assert_eq!(faucet.valve_state(), ValveState::OpenTimed);

    clock.advance_ms(3000);
    faucet.poll().expect("poll");
    // 6000 ms after the first open, but only 3000 after the second: the
    // restarted window keeps the water flowing.
    assert_eq!(faucet.valve_state(), ValveState::OpenTimed);

    clock.advance_ms(5000);
    let status = faucet.status();
    assert!(status.in_range);
    faucet.poll().expect("poll");
    assert_eq!(faucet.valve_state(), ValveState::Closed);
}

#[test]
fn external_commands_route_by_capability() {
    let clock = TestClock::new();
    let probe = ScriptedProbe::from_distances_cm([Some(25.0)]);
    let valve_out = SharedOutput::new();
    let valve_line = valve_out.level_handle();
    let led_out = SharedOutput::new();
    let led_line = led_out.level_handle();
    let mut faucet =
        FaucetController::new(probe, valve_out, led_out, cfg(), Arc::new(clock)).expect("faucet");

    faucet.handle(&Command::OpenValve).expect("handle");
    assert!(valve_line.get());
    assert!(!led_line.get());

    faucet.handle(&Command::LedOn).expect("handle");
    assert!(led_line.get());

    faucet.handle(&Command::CloseValve).expect("handle");
    assert!(!valve_line.get());
    assert!(led_line.get());

    faucet.handle(&Command::LedToggle).expect("handle");
    assert!(!led_line.get());
}

#[test]
fn status_snapshots_are_throttled() {
    let clock = TestClock::new();
    let probe = ScriptedProbe::from_distances_cm([Some(25.0)]);
    let cfg = FaucetCfg {
        status_interval: Duration::from_millis(2500),
        ..cfg()
    };
    let mut faucet = FaucetController::new(
        probe,
        SharedOutput::new(),
        SharedOutput::new(),
        cfg,
        Arc::new(clock.clone()),
    )
    .expect("faucet");

    let first = faucet.poll().expect("poll");
    assert!(first.is_some(), "first snapshot is immediate");
    let second = faucet.poll().expect("poll");
    assert!(second.is_none(), "throttled before the interval elapses");

    clock.advance_ms(2500);
    let third = faucet.poll().expect("poll");
    let status = third.expect("due after the interval");
    assert_eq!(status.valve, ValveState::Closed);
    assert_eq!(status.distance_cm.map(f32::round), Some(25.0));
}

#[test]
fn zero_durations_are_rejected_at_construction() {
    let clock: Arc<sense_core::mocks::TestClock> = Arc::new(TestClock::new());
    let bad = FaucetCfg {
        valve_open: Duration::ZERO,
        ..cfg()
    };
    assert!(
        FaucetController::new(
            ScriptedProbe::from_distances_cm([Some(25.0)]),
            SharedOutput::new(),
            SharedOutput::new(),
            bad,
            clock,
        )
        .is_err()
    );
}
