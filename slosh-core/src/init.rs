use tracing::debug;

use crate::grid::{clamp01, Grid};
use crate::params::SimParams;

/// Tilt below this magnitude counts as a flat start.
pub const FLAT_TILT_EPSILON: f32 = 0.001;
/// Height added at the centre of a flat start.
pub const CENTRAL_BUMP: f32 = 0.4;

/// Linear ramp from `-tilt` at column 0 to `+tilt` at the last column.
pub fn tilt_effect(width: usize, col: usize, tilt: f32) -> f32 {
    tilt * ((col as f32 / (width as f32 - 1.0)) - 0.5) * 2.0
}

/// Seeds walls and the starting surface.
///
/// Border cells become dry obstacles; interior cells are water at
/// `initial_level` plus the tilt ramp, at rest. A flat start gets a single
/// bump at the centre so the surface has something to do.
pub fn initialize(grid: &mut Grid, params: &SimParams) {
    let (width, height) = (grid.width(), grid.height());

    for r in 0..height {
        for c in 0..width {
            let i = grid.index(r, c);
            grid.v[i] = 0.0;
            if grid.is_border(r, c) {
                grid.obstacle[i] = true;
                grid.h[i] = 0.0;
            } else {
                grid.obstacle[i] = false;
                let tilt = tilt_effect(width, c, params.initial_tilt);
                grid.h[i] = clamp01(params.initial_level + tilt);
            }
        }
    }

    if params.initial_tilt.abs() < FLAT_TILT_EPSILON && width > 2 && height > 2 {
        let (r, c) = (height / 2, width / 2);
        let i = grid.index(r, c);
        if !grid.obstacle[i] {
            grid.h[i] = (params.initial_level + CENTRAL_BUMP).min(1.0);
            debug!(row = r, col = c, height = grid.h[i], "central disturbance");
        }
    }
}
