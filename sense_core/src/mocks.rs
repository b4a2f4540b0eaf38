//! Test and helper mocks for sense_core.

use crate::range::SOUND_CM_PER_US;
use sense_traits::{AnalogSensor, Clock, DigitalOutput, EchoProbe};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Deterministic clock advanced manually (or by its own `sleep`).
#[derive(Clone)]
pub struct TestClock {
    origin: Instant,
    offset_ms: Arc<AtomicU64>,
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn advance(&self, d: Duration) {
        let ms = d.as_millis().min(u128::from(u64::MAX)) as u64;
        self.offset_ms.fetch_add(ms, Ordering::Relaxed);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.offset_ms.fetch_add(ms, Ordering::Relaxed);
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_millis(self.offset_ms.load(Ordering::Relaxed))
    }

    fn sleep(&self, d: Duration) {
        self.advance(d);
    }
}

/// Probe replaying a scripted sequence of distances (repeats the last
/// entry once exhausted). Distances are synthesized back into the echo
/// round trips a real probe would report; `None` scripts a timeout.
pub struct ScriptedProbe {
    echoes: Vec<Option<Duration>>,
    idx: usize,
}

impl ScriptedProbe {
    pub fn from_distances_cm(distances: impl IntoIterator<Item = Option<f32>>) -> Self {
        let echoes = distances
            .into_iter()
            .map(|d| d.map(round_trip_for_cm))
            .collect();
        Self { echoes, idx: 0 }
    }
}

/// Echo round trip that converts back to `cm` under the speed-of-sound model.
pub fn round_trip_for_cm(cm: f32) -> Duration {
    let micros = (cm * 2.0 / SOUND_CM_PER_US).round().max(0.0) as u64;
    Duration::from_micros(micros)
}

impl EchoProbe for ScriptedProbe {
    fn measure_echo(
        &mut self,
        _timeout: Duration,
    ) -> Result<Option<Duration>, Box<dyn std::error::Error + Send + Sync>> {
        let v = if self.idx < self.echoes.len() {
            let x = self.echoes[self.idx];
            self.idx += 1;
            x
        } else {
            self.echoes.last().copied().flatten()
        };
        Ok(v)
    }
}

/// Analog sensor replaying a scripted sequence (repeats the last entry),
/// counting reads through a shared handle.
pub struct ScriptedAnalog {
    seq: Vec<f32>,
    idx: usize,
    reads: Rc<Cell<usize>>,
}

impl ScriptedAnalog {
    pub fn new(seq: impl Into<Vec<f32>>) -> Self {
        Self {
            seq: seq.into(),
            idx: 0,
            reads: Rc::new(Cell::new(0)),
        }
    }

    pub fn reads_handle(&self) -> Rc<Cell<usize>> {
        self.reads.clone()
    }
}

impl AnalogSensor for ScriptedAnalog {
    fn read_raw(&mut self) -> Result<f32, Box<dyn std::error::Error + Send + Sync>> {
        self.reads.set(self.reads.get() + 1);
        let v = if self.idx < self.seq.len() {
            let x = self.seq[self.idx];
            self.idx += 1;
            x
        } else {
            self.seq.last().copied().unwrap_or(0.0)
        };
        Ok(v)
    }
}

/// Analog sensor that always errors; for exercising read-failure paths.
pub struct FailingAnalog;

impl AnalogSensor for FailingAnalog {
    fn read_raw(&mut self) -> Result<f32, Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("analog sensor offline")))
    }
}

/// Output backed by shared cells so tests can observe the line level and
/// write history after the owning component moves it.
pub struct SharedOutput {
    level: Rc<Cell<bool>>,
    writes: Rc<RefCell<Vec<bool>>>,
}

impl Default for SharedOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedOutput {
    pub fn new() -> Self {
        Self {
            level: Rc::new(Cell::new(false)),
            writes: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn level_handle(&self) -> Rc<Cell<bool>> {
        self.level.clone()
    }

    pub fn writes_handle(&self) -> Rc<RefCell<Vec<bool>>> {
        self.writes.clone()
    }
}

impl DigitalOutput for SharedOutput {
    fn write(&mut self, high: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.level.set(high);
        self.writes.borrow_mut().push(high);
        Ok(())
    }
}
