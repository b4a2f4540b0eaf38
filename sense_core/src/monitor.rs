//! Gas-leak monitor device: calibrate once, then poll, classify, indicate.

use crate::calib::{self, Baseline, CalibrationCfg, GasCurve};
use crate::error::{CoreError, FatalFault, Result, map_hw_error};
use crate::events::{Dispatcher, Event, Observer};
use crate::led::LedBank;
use crate::level::{GasLevel, LevelBands};
use crate::util::percent_of_scale;
use eyre::WrapErr;
use sense_traits::{AnalogSensor, Clock, DigitalOutput};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monitor knobs that are not part of the classification bands.
#[derive(Debug, Clone, Copy)]
pub struct MonitorCfg {
    /// Throttle between reading snapshots handed to the caller.
    pub log_interval: Duration,
    /// ADC full-scale raw value used for the percentage figure.
    pub adc_full_scale: f32,
    /// Per-lamp duration of the startup self-test.
    pub lamp_test_step: Duration,
}

impl Default for MonitorCfg {
    fn default() -> Self {
        Self {
            log_interval: Duration::from_secs(1),
            adc_full_scale: 4095.0,
            lamp_test_step: Duration::from_millis(500),
        }
    }
}

/// One normalized observation.
#[derive(Debug, Clone, Copy)]
pub struct GasReading {
    pub raw: f32,
    pub ppm: f32,
    pub percent: u8,
    pub level: GasLevel,
}

/// Whether the control loop may continue. `Halted` is terminal: once
/// entered, no further reads or actuation occur.
#[derive(Debug, Clone)]
pub enum MonitorStatus {
    /// Keep polling; carries the throttled snapshot when one is due.
    Running(Option<GasReading>),
    Halted(FatalFault),
}

pub struct GasMonitor<S: AnalogSensor, O: DigitalOutput> {
    sensor: S,
    leds: LedBank<O>,
    bands: LevelBands,
    cal: CalibrationCfg,
    cfg: MonitorCfg,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    epoch: Instant,
    dispatcher: Dispatcher,
    curve: Option<GasCurve>,
    last_level: Option<GasLevel>,
    last_reading: Option<GasReading>,
    last_snapshot_ms: Option<u64>,
    fault: Option<FatalFault>,
}

impl<S: AnalogSensor, O: DigitalOutput> GasMonitor<S, O> {
    pub fn new(
        sensor: S,
        leds: LedBank<O>,
        bands: LevelBands,
        cal: CalibrationCfg,
        cfg: MonitorCfg,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        let epoch = clock.now();
        Self {
            sensor,
            leds,
            bands,
            cal,
            cfg,
            clock,
            epoch,
            dispatcher: Dispatcher::new(),
            curve: None,
            last_level: None,
            last_reading: None,
            last_snapshot_ms: None,
            fault: None,
        }
    }

    pub fn register_observer(&mut self, observer: Box<dyn Observer>) {
        self.dispatcher.register(observer);
    }

    /// Lamp test plus the one-shot calibration gate. A fatal fault drives
    /// the lamps dark and permanently halts the monitor.
    pub fn start(&mut self) -> Result<MonitorStatus> {
        self.leds
            .self_test(&*self.clock, self.cfg.lamp_test_step)
            .wrap_err("lamp test")?;
        match calib::calibrate(&mut self.sensor, &self.cal) {
            Ok(baseline) => self.adopt(baseline),
            Err(fault) => self.halt(fault),
        }
    }

    /// Adopt a persisted baseline instead of sampling. The validity gate
    /// still applies; a bad persisted value halts exactly like a bad
    /// calibration run.
    pub fn start_persisted(&mut self, r0: f32) -> Result<MonitorStatus> {
        self.leds
            .self_test(&*self.clock, self.cfg.lamp_test_step)
            .wrap_err("lamp test")?;
        match Baseline::from_persisted(r0) {
            Ok(baseline) => self.adopt(baseline),
            Err(fault) => self.halt(fault),
        }
    }

    fn adopt(&mut self, baseline: Baseline) -> Result<MonitorStatus> {
        self.curve = Some(GasCurve::new(self.cal.curve_a, self.cal.curve_b, baseline));
        Ok(MonitorStatus::Running(None))
    }

    fn halt(&mut self, fault: FatalFault) -> Result<MonitorStatus> {
        tracing::error!(error = %fault, "fatal fault, monitor halted");
        // Safe defaults before the crash-stop.
        if let Err(e) = self.leds.all_off() {
            tracing::warn!(error = %e, "failed to dark lamps on halt");
        }
        self.fault = Some(fault.clone());
        Ok(MonitorStatus::Halted(fault))
    }

    /// One control cycle: read, normalize, classify, indicate.
    pub fn poll(&mut self) -> Result<MonitorStatus> {
        if let Some(fault) = &self.fault {
            return Ok(MonitorStatus::Halted(fault.clone()));
        }
        let Some(curve) = self.curve else {
            return Err(eyre::Report::new(CoreError::State(
                "poll before calibration".into(),
            )));
        };
        let raw = self
            .sensor
            .read_raw()
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("gas sensor read")?;
        let ppm = curve.ppm(raw);
        let level = self.bands.classify(ppm);
        if self.last_level != Some(level) {
            self.leds.show_level(level).wrap_err("led update")?;
            self.dispatcher.publish(&Event::LevelChanged(level));
            tracing::info!(ppm, level = level.as_str(), "gas level changed");
            self.last_level = Some(level);
        }
        let reading = GasReading {
            raw,
            ppm,
            percent: percent_of_scale(raw, self.cfg.adc_full_scale),
            level,
        };
        self.last_reading = Some(reading);
        Ok(MonitorStatus::Running(self.due_snapshot(reading)))
    }

    fn due_snapshot(&mut self, reading: GasReading) -> Option<GasReading> {
        let now = self.clock.ms_since(self.epoch);
        let interval_ms = self.cfg.log_interval.as_millis().min(u128::from(u64::MAX)) as u64;
        let due = match self.last_snapshot_ms {
            None => true,
            Some(at) => now.saturating_sub(at) >= interval_ms,
        };
        if due {
            self.last_snapshot_ms = Some(now);
            tracing::debug!(
                raw = reading.raw,
                ppm = reading.ppm,
                percent = reading.percent,
                level = reading.level.as_str(),
                "gas reading"
            );
            Some(reading)
        } else {
            None
        }
    }

    pub fn last_reading(&self) -> Option<GasReading> {
        self.last_reading
    }

    pub fn lit_level(&self) -> Option<GasLevel> {
        self.leds.lit()
    }

    pub fn fault(&self) -> Option<&FatalFault> {
        self.fault.as_ref()
    }
}
