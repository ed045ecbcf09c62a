use clap::Parser;
use slosh_core::{Domain, MIN_COLS, MIN_ROWS, SimParams, STABILITY_LIMIT};
use tracing::{debug, warn};

use crate::error::CliResult;

#[derive(Parser, Debug)]
#[command(name = "slosh", author, version)]
#[command(about = "ASCII fluid sloshing simulation (heightfield wave method)")]
pub struct Args {
    /// Simulation time step. Stability often requires (speed_sq * dt^2) <= 0.5
    #[arg(long, default_value_t = 0.2, allow_negative_numbers = true)]
    pub dt: f32,

    /// Wave speed squared factor (stiffness)
    #[arg(long = "speed-sq", alias = "speed_sq", default_value_t = 0.5, allow_negative_numbers = true)]
    pub speed_sq: f32,

    /// Damping factor (0.0-1.0 for effective damping)
    #[arg(long, default_value_t = 0.01, allow_negative_numbers = true)]
    pub damping: f32,

    /// Initial water level (0.0-1.0)
    #[arg(long, default_value_t = 0.5, allow_negative_numbers = true)]
    pub level: f32,

    /// Initial surface tilt (0.0-1.0)
    #[arg(long, default_value_t = 0.1, allow_negative_numbers = true)]
    pub tilt: f32,

    /// Sleep time per frame in ms
    #[arg(long, default_value_t = 50, allow_negative_numbers = true)]
    pub sleep: i64,

    /// Grid width in cells (default: terminal columns)
    #[arg(long)]
    pub width: Option<usize>,

    /// Grid height in cells (default: terminal rows minus one)
    #[arg(long)]
    pub height: Option<usize>,

    /// Stop after this many frames (default: run until q/Esc/Ctrl-C)
    #[arg(long)]
    pub frames: Option<u64>,

    /// Headless: print one JSON line of field statistics per frame instead of drawing
    #[arg(long)]
    pub stats: bool,

    /// How long to show the parameter summary before the animation starts (ms)
    #[arg(long = "intro-ms", default_value_t = 3000)]
    pub intro_ms: u64,

    /// Refuse to start when (speed_sq * dt^2) exceeds 0.5
    #[arg(long)]
    pub strict_stability: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    pub fn sim_params(&self) -> SimParams {
        SimParams {
            dt: self.dt,
            wave_speed_sq: self.speed_sq,
            damping: self.damping,
            initial_level: self.level,
            initial_tilt: self.tilt,
            frame_delay_ms: self.sleep,
        }
    }
}

/// Validates the flags and reports the stability advisory.
pub fn resolve_params(args: &Args) -> CliResult<SimParams> {
    let params = args.sim_params();
    params.validate()?;

    if args.strict_stability {
        params.check_stability()?;
    } else if let Some(advice) = stability_advisory(&params) {
        warn!("{advice}");
    }
    Ok(params)
}

/// Warning text for parameters past the stability limit, `None` when stable.
pub fn stability_advisory(params: &SimParams) -> Option<String> {
    if params.is_stable() {
        return None;
    }
    Some(format!(
        "simulation might be unstable: (speed_sq * dt^2) = {:.3}; for stability this should be <= {}. Consider reducing dt or speed_sq",
        params.stability_metric(),
        STABILITY_LIMIT
    ))
}

/// Warning text for an explicit grid size below the minimum, `None` when it fits.
pub fn undersize_notice(width: usize, height: usize) -> Option<String> {
    if width >= MIN_COLS && height >= MIN_ROWS {
        return None;
    }
    let fitted = Domain::with_minimums(width, height);
    Some(format!(
        "requested grid {}x{} is below the minimum {}x{}; using {}x{}",
        width,
        height,
        MIN_COLS,
        MIN_ROWS,
        fitted.width(),
        fitted.height()
    ))
}

/// Picks the grid size from explicit flags, falling back to the terminal.
pub fn pick_domain(
    terminal: Option<(u16, u16)>,
    width: Option<usize>,
    height: Option<usize>,
) -> Domain {
    let detected = match terminal {
        Some((cols, rows)) => Domain::fit_terminal(cols as usize, rows as usize),
        None => {
            debug!("terminal size unavailable, assuming 80x24");
            Domain::unknown_terminal()
        }
    };
    if width.is_none() && height.is_none() {
        return detected;
    }
    let (width, height) = (
        width.unwrap_or(detected.width()),
        height.unwrap_or(detected.height()),
    );
    if let Some(notice) = undersize_notice(width, height) {
        warn!("{notice}");
    }
    Domain::with_minimums(width, height)
}
