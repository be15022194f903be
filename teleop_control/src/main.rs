//! # Teleop Control Core
//!
//! Runs the control core against simulated hardware with a scripted
//! match-like drill: drive, a vision-assist lock, a hatch pickup at the
//! loading station and an elevator move. Telemetry goes to `tracing`
//! at TRACE level.

use std::path::PathBuf;
use std::process;
use std::sync::atomic::Ordering;

use clap::Parser;
use teleop_common::config::TeleopConfig;
use teleop_common::consts::DEFAULT_CONFIG_PATH;
use teleop_common::input::{Axis, Button, ControllerSnapshot, RawInputFrame};
use teleop_control::config::load_config;
use teleop_control::cycle::{ControlCore, CycleRunner, rt_setup};
use teleop_control::sim::{ScriptedInputHandle, SimRobot};
use teleop_control::telemetry::TracingTelemetry;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Teleop control core: input mapping, arbitration and subsystem FSMs
#[derive(Parser, Debug)]
#[command(name = "teleop_control")]
#[command(version)]
#[command(about = "Fixed-period teleop control loop on simulated hardware")]
struct Args {
    /// Path to the TOML configuration.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Stop after this many cycles (default: length of the drill).
    #[arg(long)]
    cycles: Option<u64>,

    /// CPU core to pin the loop thread to.
    #[arg(long, default_value_t = 1)]
    cpu_core: usize,

    /// SCHED_FIFO priority.
    #[arg(long, default_value_t = 80)]
    rt_priority: i32,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!("Teleop control v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Teleop control shutdown complete");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = if args.config.exists() {
        load_config(&args.config)?
    } else {
        warn!(
            "{} not found, using built-in defaults",
            args.config.display()
        );
        TeleopConfig::default()
    };
    info!(
        "Config OK: cycle_period={}ms, telemetry_interval={}",
        config.cycle_period_ms, config.telemetry_interval
    );

    let (mut hw, handles) = SimRobot::new()
        .with_plant()
        .with_assist_completion(1.5)
        .build();
    hw.telemetry = Box::new(TracingTelemetry::new());
    let drill_len = script_drill(&handles.input);

    rt_setup(args.cpu_core, args.rt_priority)?;
    info!(
        "RT setup complete (cpu_core={}, priority={})",
        args.cpu_core, args.rt_priority
    );

    let period_ms = config.cycle_period_ms;
    let core = ControlCore::new(config, hw);
    let mut runner =
        CycleRunner::new(core, period_ms).with_max_cycles(args.cycles.unwrap_or(drill_len));

    let running = runner.running();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        running.store(false, Ordering::SeqCst);
    })?;

    runner.run()?;

    let stats = runner.stats();
    info!(
        "Ran {} cycles, {} overruns, avg {}ns, max {}ns",
        stats.cycle_count,
        stats.overruns,
        stats.avg_cycle_ns(),
        stats.max_cycle_ns
    );
    info!(
        "Elevator at {:.2} rot, hatch held: {}, assist commands started: {}",
        handles.elevator.position(),
        runner.core().subsystems().hatch_flower.has_hatch(),
        handles.assist.started()
    );
    Ok(())
}

/// Queue the drill and return its length in cycles.
fn script_drill(input: &ScriptedInputHandle) -> u64 {
    let idle = ControllerSnapshot::neutral();
    let mut queued = 0u64;
    let mut hold = |driver: ControllerSnapshot, operator: ControllerSnapshot, cycles: u64| {
        for _ in 0..cycles {
            input.push(RawInputFrame::new(driver, operator));
        }
        queued += cycles;
    };

    // Drive forward with a slight turn.
    let drive = idle.with_axis(Axis::LeftY, -0.6).with_axis(Axis::RightX, 0.2);
    hold(drive, idle, 50);
    // Lock onto the target, then let go.
    hold(idle.with_button(Button::A), idle, 100);
    hold(idle, idle, 10);
    // Hatch mode, loading station, acquire.
    let select = idle
        .with_button(Button::LeftBumper)
        .with_button(Button::DpadUp);
    hold(idle, select, 5);
    hold(idle, idle.with_axis(Axis::RightTrigger, 1.0), 25);
    // Elevator to the top hatch position.
    hold(idle, idle.with_button(Button::Y), 100);
    hold(idle, idle, 10);
    queued
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
