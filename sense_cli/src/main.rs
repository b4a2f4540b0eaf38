//! Entry point: config and logging bring-up, hardware selection, run loops.

mod cli;
mod error_fmt;
mod sinks;

use crate::cli::{Cli, Commands, FILE_GUARD};
use clap::Parser;
use eyre::WrapErr;
use sense_core::runner::{self, RunOpts};
use sense_core::{
    CalibrationCfg, FaucetCfg, FaucetController, GasMonitor, LedBank, LevelBands, MonitorCfg,
};
use sense_traits::{AnalogSensor, Clock, DigitalOutput, Display, EchoProbe, MonotonicClock};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

fn main() {
    let code = match run() {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            eprintln!("{}", error_fmt::humanize(&e));
            error_fmt::exit_code(&e)
        }
    };
    std::process::exit(code);
}

fn run() -> eyre::Result<()> {
    let cli = Cli::parse();
    if let Err(e) = color_eyre::install() {
        eprintln!("color-eyre install failed: {e}");
    }
    let cfg = load_config(&cli.config)?;
    init_tracing(&cli, &cfg.logging);
    cfg.validate()?;

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            shutdown.store(true, Ordering::Relaxed);
        })
        .wrap_err("install ctrl-c handler")?;
    }
    let clock: Arc<dyn Clock + Send + Sync> = Arc::new(MonotonicClock::new());

    match cli.cmd {
        Commands::Faucet {
            cycles,
            threshold_cm,
            valve_open_ms,
            sim_distance_cm,
        } => faucet_cmd(
            &cfg,
            clock,
            shutdown,
            cli.json,
            cycles,
            threshold_cm,
            valve_open_ms,
            sim_distance_cm,
        ),
        Commands::Monitor {
            cycles,
            low_ppm,
            high_ppm,
            sim_rs,
        } => monitor_cmd(&cfg, clock, shutdown, cli.json, cycles, low_ppm, high_ppm, sim_rs),
    }
}

fn load_config(path: &Path) -> eyre::Result<sense_config::Config> {
    if path.exists() {
        let text =
            std::fs::read_to_string(path).wrap_err_with(|| format!("read config {path:?}"))?;
        sense_config::load_toml(&text).wrap_err_with(|| format!("parse config {path:?}"))
    } else {
        Ok(sense_config::Config::default())
    }
}

// Optional JSON-lines file sink with rotation. Generic over the subscriber
// type so each branch of `init_tracing` can monomorphize its own layer.
fn file_log_layer<S>(
    logging: &sense_config::Logging,
) -> Option<impl tracing_subscriber::Layer<S>>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    use tracing_subscriber::fmt;

    logging.file.as_ref().map(|path| {
        let p = Path::new(path);
        let dir = p
            .parent()
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = p
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_else(|| "sense.log".into());
        let appender = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        fmt::layer().json().with_writer(writer)
    })
}

fn init_tracing(cli: &Cli, logging: &sense_config::Logging) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let level = logging
        .level
        .clone()
        .unwrap_or_else(|| cli.log_level.clone());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    // Console logs go to stderr so data lines on stdout stay machine-readable.
    if cli.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(file_log_layer(logging))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(file_log_layer(logging))
            .init();
    }
}

#[allow(clippy::too_many_arguments)]
fn faucet_cmd(
    cfg: &sense_config::Config,
    clock: Arc<dyn Clock + Send + Sync>,
    shutdown: Arc<AtomicBool>,
    json: bool,
    cycles: Option<u64>,
    threshold_cm: Option<f32>,
    valve_open_ms: Option<u64>,
    sim_distance_cm: Option<f32>,
) -> eyre::Result<()> {
    let mut fcfg: FaucetCfg = (&cfg.faucet).into();
    if let Some(t) = threshold_cm {
        fcfg.threshold_cm = t;
    }
    if let Some(ms) = valve_open_ms {
        fcfg.valve_open = Duration::from_millis(ms);
    }
    let opts = RunOpts {
        rate_hz: cfg.poll.rate_hz,
        max_cycles: cycles,
    };

    #[cfg(not(feature = "hardware"))]
    {
        let probe = sense_hardware::SimulatedProbe::new(sim_distance_cm.unwrap_or(25.0));
        let valve_out = sense_hardware::SimulatedOutput::new("water-valve");
        let led_out = sense_hardware::SimulatedOutput::new("status-led");
        drive_faucet(probe, valve_out, led_out, fcfg, opts, clock, &shutdown, json)
    }
    #[cfg(feature = "hardware")]
    {
        let _ = sim_distance_cm;
        let probe = sense_hardware::Hcsr04::open(cfg.pins.trig, cfg.pins.echo)
            .map_err(eyre::Report::new)?;
        let valve_out =
            sense_hardware::GpioOutput::new(cfg.pins.valve).map_err(eyre::Report::new)?;
        let led_out =
            sense_hardware::GpioOutput::new(cfg.pins.status_led).map_err(eyre::Report::new)?;
        drive_faucet(probe, valve_out, led_out, fcfg, opts, clock, &shutdown, json)
    }
}

#[allow(clippy::too_many_arguments)]
fn drive_faucet<P, V, L>(
    probe: P,
    valve_out: V,
    led_out: L,
    fcfg: FaucetCfg,
    opts: RunOpts,
    clock: Arc<dyn Clock + Send + Sync>,
    shutdown: &AtomicBool,
    json: bool,
) -> eyre::Result<()>
where
    P: EchoProbe,
    V: DigitalOutput,
    L: DigitalOutput,
{
    let mut faucet = FaucetController::new(probe, valve_out, led_out, fcfg, clock)?;
    faucet.register_observer(Box::new(sinks::LogObserver));
    let mut display = sinks::ConsoleDisplay;
    runner::run_faucet(&mut faucet, &opts, shutdown, |status| {
        if json {
            println!("{}", sinks::faucet_json(status));
        } else if let Err(e) = display.render(&sinks::faucet_lines(status)) {
            tracing::warn!(error = %e, "display render failed");
        }
    })
}

#[allow(clippy::too_many_arguments)]
fn monitor_cmd(
    cfg: &sense_config::Config,
    clock: Arc<dyn Clock + Send + Sync>,
    shutdown: Arc<AtomicBool>,
    json: bool,
    cycles: Option<u64>,
    low_ppm: Option<f32>,
    high_ppm: Option<f32>,
    sim_rs: Option<f32>,
) -> eyre::Result<()> {
    let bands = LevelBands::new(
        low_ppm.unwrap_or(cfg.gas.low_ppm),
        high_ppm.unwrap_or(cfg.gas.high_ppm),
    )?;
    let cal: CalibrationCfg = (&cfg.calibration).into();
    let mcfg: MonitorCfg = (&cfg.gas).into();
    let opts = RunOpts {
        rate_hz: cfg.poll.rate_hz,
        max_cycles: cycles,
    };

    #[cfg(not(feature = "hardware"))]
    {
        let sensor = sense_hardware::SimulatedGasSensor::new(sim_rs.unwrap_or(983.0));
        let leds = LedBank::new(
            sense_hardware::SimulatedOutput::new("green-led"),
            sense_hardware::SimulatedOutput::new("yellow-led"),
            sense_hardware::SimulatedOutput::new("red-led"),
        )?;
        drive_monitor(
            sensor,
            leds,
            bands,
            cal,
            mcfg,
            opts,
            clock,
            &shutdown,
            json,
            cfg.calibration.r0,
        )
    }
    #[cfg(feature = "hardware")]
    {
        // No ADC backend is wired on this platform; the probe-side devices
        // are real, the concentration input stays simulated.
        tracing::warn!("no ADC backend available; gas sensor runs simulated");
        let sensor = sense_hardware::SimulatedGasSensor::new(sim_rs.unwrap_or(983.0));
        let leds = LedBank::new(
            sense_hardware::GpioOutput::new(cfg.pins.green_led).map_err(eyre::Report::new)?,
            sense_hardware::GpioOutput::new(cfg.pins.yellow_led).map_err(eyre::Report::new)?,
            sense_hardware::GpioOutput::new(cfg.pins.red_led).map_err(eyre::Report::new)?,
        )?;
        drive_monitor(
            sensor,
            leds,
            bands,
            cal,
            mcfg,
            opts,
            clock,
            &shutdown,
            json,
            cfg.calibration.r0,
        )
    }
}

#[allow(clippy::too_many_arguments)]
fn drive_monitor<S, O>(
    sensor: S,
    leds: LedBank<O>,
    bands: LevelBands,
    cal: CalibrationCfg,
    mcfg: MonitorCfg,
    opts: RunOpts,
    clock: Arc<dyn Clock + Send + Sync>,
    shutdown: &AtomicBool,
    json: bool,
    persisted_r0: Option<f32>,
) -> eyre::Result<()>
where
    S: AnalogSensor,
    O: DigitalOutput,
{
    let mut monitor = GasMonitor::new(sensor, leds, bands, cal, mcfg, clock);
    monitor.register_observer(Box::new(sinks::LogObserver));
    let mut display = sinks::ConsoleDisplay;
    runner::run_monitor(&mut monitor, &opts, shutdown, persisted_r0, |reading| {
        if json {
            println!("{}", sinks::reading_json(reading));
        } else if let Err(e) = display.render(&sinks::reading_lines(reading)) {
            tracing::warn!(error = %e, "display render failed");
        }
    })
}
