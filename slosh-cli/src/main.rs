//! slosh - ASCII fluid sloshing in the terminal.
//!
//! Integrates a damped 2D wave equation over the terminal-sized grid and
//! redraws the surface every frame.
//!
//! ```bash
//! # Default parameters, run until q/Esc
//! slosh
//!
//! # Flat start with a central drop, stiffer waves
//! slosh --tilt 0 --speed_sq 1.0 --dt 0.1
//!
//! # Headless statistics for 500 frames
//! slosh --stats --frames 500 --sleep 0 --width 80 --height 24
//! ```

mod config;
mod error;
mod stats;
mod term;

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use clap::error::ErrorKind;
use crossterm::style::Stylize;
use slosh_core::{Driver, Flow, SimParams, Simulation, STABILITY_LIMIT};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use config::{pick_domain, resolve_params, Args};
use error::CliResult;
use stats::StatsSink;
use term::{terminal_size, TerminalSink};

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Parameter summary shown before the animation starts.
fn banner_lines(sim: &Simulation) -> Vec<String> {
    let p: &SimParams = sim.params();
    let mut lines = vec![
        format!(
            "Terminal: {}x{}. Starting fluid sloshing simulation...",
            sim.width(),
            sim.height()
        ),
        format!(
            "Parameters: DT={:.3}, SpeedSq={:.2}, Damping={:.3}, Level={:.2}, Tilt={:.2}, Sleep={}ms",
            p.dt, p.wave_speed_sq, p.damping, p.initial_level, p.initial_tilt, p.frame_delay_ms
        ),
    ];
    if !p.is_stable() {
        lines.push(format!(
            "WARNING: POTENTIAL INSTABILITY (speed_sq * dt^2 = {:.3} > {})",
            p.stability_metric(),
            STABILITY_LIMIT
        ));
    }
    lines.push("Press q or Esc to quit.".to_string());
    lines
}

fn run(args: Args) -> CliResult<()> {
    let params = resolve_params(&args)?;
    let domain = pick_domain(terminal_size(), args.width, args.height);
    let sim = Simulation::new(domain, params)?;

    let mut driver = Driver::new(sim);
    if let Some(n) = args.frames {
        driver = driver.with_frame_limit(n);
    }

    let frames = if args.stats {
        info!(
            width = domain.width(),
            height = domain.height(),
            dt = params.dt,
            speed_sq = params.wave_speed_sq,
            damping = params.damping,
            "headless run"
        );
        let mut sink = StatsSink::new(io::stdout().lock());
        driver.run(&mut sink)?
    } else {
        let mut sink = TerminalSink::new()?;
        let banner = banner_lines(driver.simulation());
        match sink.intro(&banner, Duration::from_millis(args.intro_ms))? {
            Flow::Stop => 0,
            Flow::Continue => driver.run(&mut sink)?,
        }
    };

    // Terminal is restored by now, so the warning stays visible.
    if let Some(d) = driver.divergence() {
        warn!(
            step = d.step,
            cells = d.cells,
            metric = params.stability_metric(),
            "simulation diverged: non-finite values in the field"
        );
    }

    let cells = driver.into_simulation().release();
    debug!(frames, cells, "shutdown");
    Ok(())
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    setup_logging(args.verbose, args.quiet);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
