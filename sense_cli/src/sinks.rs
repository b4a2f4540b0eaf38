//! Console/JSON sinks for status snapshots and core events.

use sense_core::{Event, FaucetStatus, GasReading, Observer, ValveState};
use sense_traits::Display;

/// Observer that mirrors core events into the tracing stream.
pub struct LogObserver;

impl Observer for LogObserver {
    fn on_event(&mut self, event: &Event) {
        match event {
            Event::ProximityEntered => tracing::info!("proximity entered"),
            Event::ProximityExited => tracing::info!("proximity exited"),
            Event::LevelChanged(level) => {
                tracing::warn!(level = level.as_str(), "gas level changed");
            }
        }
    }
}

/// Line display printing to stdout.
pub struct ConsoleDisplay;

impl Display for ConsoleDisplay {
    fn render(
        &mut self,
        lines: &[String],
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        for line in lines {
            println!("{line}");
        }
        Ok(())
    }
}

fn valve_text(status: &FaucetStatus) -> String {
    let state = match status.valve {
        ValveState::Closed => "closed",
        ValveState::Open | ValveState::OpenTimed => "open",
    };
    if status.timer_active {
        format!("{state} [TIMED]")
    } else {
        state.to_string()
    }
}

pub fn faucet_lines(status: &FaucetStatus) -> Vec<String> {
    let proximity = match status.distance_cm {
        Some(d) if status.in_range => format!("Proximity: {d:.1} cm [DETECTED]"),
        Some(d) => format!("Proximity: {d:.1} cm"),
        None => "Proximity: no reading".to_string(),
    };
    vec![proximity, format!("Water valve: {}", valve_text(status))]
}

pub fn faucet_json(status: &FaucetStatus) -> String {
    serde_json::json!({
        "distance_cm": status.distance_cm,
        "in_range": status.in_range,
        "valve": match status.valve {
            ValveState::Closed => "closed",
            ValveState::Open => "open",
            ValveState::OpenTimed => "open_timed",
        },
        "timer_active": status.timer_active,
    })
    .to_string()
}

pub fn reading_lines(reading: &GasReading) -> Vec<String> {
    vec![
        format!("LPG concentration: {:.1} ppm ({}%)", reading.ppm, reading.percent),
        format!("Safety level: {}", reading.level.as_str()),
    ]
}

pub fn reading_json(reading: &GasReading) -> String {
    serde_json::json!({
        "raw": reading.raw,
        "ppm": reading.ppm,
        "percent": reading.percent,
        "level": reading.level.as_str(),
    })
    .to_string()
}
