//! Closed event/command vocabulary and synchronous dispatch.

use crate::error::Result;
use crate::level::GasLevel;
use std::time::Duration;

/// Events produced by the sensing side of the core. Closed set, matched
/// exhaustively; new kinds require touching every consumer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    ProximityEntered,
    ProximityExited,
    LevelChanged(GasLevel),
}

/// Commands consumed by the actuation side of the core. Closed set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    OpenValve,
    CloseValve,
    OpenValveTimed(Duration),
    LedOn,
    LedOff,
    LedToggle,
}

/// Passive consumer of core events. Observers must not fail; anything
/// fallible behind one is its own problem.
pub trait Observer {
    fn on_event(&mut self, event: &Event);
}

/// A component that declares capability for a subset of commands.
pub trait Actuator {
    fn accepts(&self, command: &Command) -> bool;
    fn apply(&mut self, command: &Command) -> Result<()>;
}

/// Synchronous, ordered fan-out of events plus capability-based command
/// routing. Handlers run to completion before the poll cycle proceeds;
/// there is no queue and no concurrency.
#[derive(Default)]
pub struct Dispatcher {
    observers: Vec<Box<dyn Observer>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Deliver `event` to every observer, in registration order.
    pub fn publish(&mut self, event: &Event) {
        for observer in &mut self.observers {
            observer.on_event(event);
        }
    }

    /// Route `command` to the first actuator declaring capability for it.
    ///
    /// Core components only produce known kinds, so an unroutable command
    /// is an invariant violation: it trips an assertion in debug builds
    /// and is dropped with a warning in release.
    pub fn dispatch<'a, I>(&self, actuators: I, command: &Command) -> Result<()>
    where
        I: IntoIterator<Item = &'a mut dyn Actuator>,
    {
        for actuator in actuators {
            if actuator.accepts(command) {
                return actuator.apply(command);
            }
        }
        debug_assert!(false, "no actuator accepts {command:?}");
        tracing::warn!(?command, "dropping unroutable command");
        Ok(())
    }
}
