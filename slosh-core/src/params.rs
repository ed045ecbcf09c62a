use std::time::Duration;

use tracing::warn;

use crate::error::{ParamError, SimError, SimResult};

/// Upper bound on `wave_speed_sq * dt^2` for the 5-point scheme at unit spacing.
pub const STABILITY_LIMIT: f32 = 0.5;

/// Immutable simulation parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimParams {
    /// Time step.
    pub dt: f32,
    /// Square of the wave propagation speed (stiffness).
    pub wave_speed_sq: f32,
    /// Velocity damping factor, applied as `1 - damping * dt` per step.
    pub damping: f32,
    /// Base water level in `[0, 1]`.
    pub initial_level: f32,
    /// Initial surface tilt in `[0, 1]`.
    pub initial_tilt: f32,
    /// Pause between frames.
    pub frame_delay_ms: i64,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            dt: 0.2,
            wave_speed_sq: 0.5,
            damping: 0.01,
            initial_level: 0.5,
            initial_tilt: 0.1,
            frame_delay_ms: 50,
        }
    }
}

impl SimParams {
    /// Checks every range constraint, reporting the first violation.
    pub fn validate(&self) -> Result<(), ParamError> {
        let floats = [
            ("dt", self.dt),
            ("speed_sq", self.wave_speed_sq),
            ("damping", self.damping),
            ("level", self.initial_level),
            ("tilt", self.initial_tilt),
        ];
        for (name, value) in floats {
            if !value.is_finite() {
                return Err(ParamError::NonFinite { name });
            }
        }

        if self.dt <= 0.0 {
            return Err(ParamError::TimeStep(self.dt));
        }
        if self.wave_speed_sq <= 0.0 {
            return Err(ParamError::WaveSpeed(self.wave_speed_sq));
        }
        if self.damping < 0.0 {
            return Err(ParamError::Damping(self.damping));
        }
        if !(0.0..=1.0).contains(&self.initial_level) {
            return Err(ParamError::Level(self.initial_level));
        }
        if !(0.0..=1.0).contains(&self.initial_tilt) {
            return Err(ParamError::Tilt(self.initial_tilt));
        }
        if self.frame_delay_ms < 0 {
            return Err(ParamError::FrameDelay(self.frame_delay_ms));
        }
        Ok(())
    }

    /// Courant-type metric `wave_speed_sq * dt^2`.
    pub fn stability_metric(&self) -> f32 {
        self.wave_speed_sq * self.dt * self.dt
    }

    pub fn is_stable(&self) -> bool {
        self.stability_metric() <= STABILITY_LIMIT
    }

    /// Strict variant of the stability advisory.
    pub fn check_stability(&self) -> Result<(), ParamError> {
        if self.is_stable() {
            Ok(())
        } else {
            Err(ParamError::Unstable {
                metric: self.stability_metric(),
                limit: STABILITY_LIMIT,
            })
        }
    }

    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms.max(0) as u64)
    }
}

// ---- Domain sizing ----

/// Below this many columns the fallback width is used.
pub const MIN_COLS: usize = 10;
/// Below this many rows the fallback height is used.
pub const MIN_ROWS: usize = 5;
pub const SMALL_FALLBACK_COLS: usize = 20;
pub const SMALL_FALLBACK_ROWS: usize = 10;
/// Size assumed when the display cannot report one.
pub const UNKNOWN_COLS: usize = 80;
pub const UNKNOWN_ROWS: usize = 24;
/// Rows kept free under the grid for the shell prompt.
pub const STATUS_ROWS: usize = 1;

/// Fixed width x height of the simulated lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Domain {
    width: usize,
    height: usize,
}

impl Domain {
    pub fn new(width: usize, height: usize) -> SimResult<Domain> {
        if width == 0 || height == 0 {
            return Err(SimError::InvalidDomain { width, height });
        }
        Ok(Domain { width, height })
    }

    /// Domain for a terminal of `cols` x `rows`, leaving room for status text.
    pub fn fit_terminal(cols: usize, rows: usize) -> Domain {
        let width = if cols == 0 { UNKNOWN_COLS } else { cols };
        let height = match rows.saturating_sub(STATUS_ROWS) {
            0 => UNKNOWN_ROWS,
            h => h,
        };
        if width < MIN_COLS || height < MIN_ROWS {
            warn!(
                cols,
                rows,
                "terminal too small, minimum {}x{} required; using fallback",
                MIN_COLS,
                MIN_ROWS + STATUS_ROWS
            );
        }
        Domain::with_minimums(width, height)
    }

    /// Domain used when the terminal size cannot be queried.
    pub fn unknown_terminal() -> Domain {
        Domain::with_minimums(UNKNOWN_COLS, UNKNOWN_ROWS)
    }

    /// Replaces each undersized dimension with its fallback. Silent; callers
    /// know where the size came from and word the warning accordingly.
    pub fn with_minimums(width: usize, height: usize) -> Domain {
        Domain {
            width: if width < MIN_COLS { SMALL_FALLBACK_COLS } else { width },
            height: if height < MIN_ROWS { SMALL_FALLBACK_ROWS } else { height },
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total cell count, `None` on overflow.
    pub fn cells(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(SimParams::default().validate(), Ok(()));
        assert!(SimParams::default().is_stable());
    }

    #[test]
    fn each_constraint_is_reported() {
        let base = SimParams::default();
        let cases = [
            (SimParams { dt: 0.0, ..base }, ParamError::TimeStep(0.0)),
            (SimParams { wave_speed_sq: -1.0, ..base }, ParamError::WaveSpeed(-1.0)),
            (SimParams { damping: -0.1, ..base }, ParamError::Damping(-0.1)),
            (SimParams { initial_level: 1.5, ..base }, ParamError::Level(1.5)),
            (SimParams { initial_tilt: -0.2, ..base }, ParamError::Tilt(-0.2)),
            (SimParams { frame_delay_ms: -5, ..base }, ParamError::FrameDelay(-5)),
            (
                SimParams { dt: f32::NAN, ..base },
                ParamError::NonFinite { name: "dt" },
            ),
        ];
        for (params, expected) in cases {
            assert_eq!(params.validate(), Err(expected));
        }
    }

    #[test]
    fn boundary_values_are_accepted() {
        let params = SimParams {
            damping: 0.0,
            initial_level: 1.0,
            initial_tilt: 0.0,
            frame_delay_ms: 0,
            ..SimParams::default()
        };
        assert_eq!(params.validate(), Ok(()));
    }

    #[test]
    fn unit_speed_and_step_exceed_stability_limit() {
        let params = SimParams {
            dt: 1.0,
            wave_speed_sq: 1.0,
            ..SimParams::default()
        };
        assert_eq!(params.validate(), Ok(()));
        assert_eq!(params.stability_metric(), 1.0);
        assert!(!params.is_stable());
        assert!(matches!(
            params.check_stability(),
            Err(ParamError::Unstable { metric, .. }) if metric == 1.0
        ));
    }

    #[test]
    fn terminal_fit_reserves_status_row() {
        let d = Domain::fit_terminal(120, 40);
        assert_eq!((d.width(), d.height()), (120, 39));
    }

    #[test]
    fn small_terminal_falls_back_per_dimension() {
        let d = Domain::fit_terminal(8, 40);
        assert_eq!((d.width(), d.height()), (20, 39));

        let d = Domain::fit_terminal(50, 4);
        assert_eq!((d.width(), d.height()), (50, 10));
    }

    #[test]
    fn zero_sized_terminal_uses_unknown_size() {
        let d = Domain::fit_terminal(0, 0);
        assert_eq!((d.width(), d.height()), (80, 24));
    }

    #[test]
    fn zero_domain_is_rejected() {
        assert!(matches!(
            Domain::new(0, 4),
            Err(SimError::InvalidDomain { width: 0, height: 4 })
        ));
    }
}
