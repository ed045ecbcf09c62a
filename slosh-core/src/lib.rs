//! Damped 2D wave-equation heightfield with ASCII rendering.
//!
//! A [`Simulation`] owns a [`Grid`] and its immutable [`SimParams`]. Each
//! [`Simulation::step`] applies an explicit 5-point Laplacian update with
//! reflective walls; [`Simulation::render`] turns the current surface into a
//! text frame. [`Driver`] ties the two to a [`FrameSink`].

mod driver;
mod error;
mod grid;
mod init;
mod integrator;
mod params;
mod render;
mod stats;

use tracing::debug;

pub use driver::{Divergence, Driver, Flow, Frame, FrameSink};
pub use error::{ParamError, SimError, SimResult};
pub use grid::Grid;
pub use init::{initialize, tilt_effect};
pub use integrator::{laplacian, step};
pub use params::{Domain, SimParams, MIN_COLS, MIN_ROWS, STABILITY_LIMIT};
pub use render::{height_to_glyph, render, render_into, WALL_GLYPH};
pub use stats::FieldStats;

pub struct Simulation {
    params: SimParams,
    grid: Grid,
    steps: u64,
}

impl Simulation {
    /// Validates `params`, allocates the grid and seeds the initial surface.
    pub fn new(domain: Domain, params: SimParams) -> SimResult<Simulation> {
        params.validate()?;
        let mut grid = Grid::allocate(domain)?;
        initialize(&mut grid, &params);
        debug!(
            width = domain.width(),
            height = domain.height(),
            metric = params.stability_metric(),
            "simulation initialized"
        );
        Ok(Simulation {
            params,
            grid,
            steps: 0,
        })
    }

    // ---- Accessors ----

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Simulated time since the last (re)initialization.
    pub fn elapsed(&self) -> f32 {
        self.steps as f32 * self.params.dt
    }

    // ---- Core ----

    pub fn step(&mut self) {
        step(&mut self.grid, &self.params);
        self.steps += 1;
    }

    pub fn render(&self) -> String {
        render(&self.grid)
    }

    pub fn render_into(&self, out: &mut String) {
        render_into(&self.grid, out);
    }

    pub fn stats(&self) -> FieldStats {
        FieldStats::measure(&self.grid)
    }

    /// Water cells whose height or velocity is NaN or infinite.
    pub fn non_finite_cells(&self) -> usize {
        self.grid
            .heights()
            .iter()
            .zip(self.grid.velocities())
            .zip(self.grid.obstacles())
            .filter(|&((h, v), &wall)| !wall && !(h.is_finite() && v.is_finite()))
            .count()
    }

    /// Drops water into (or scoops it from) a single cell.
    pub fn add_disturbance(&mut self, row: usize, col: usize, amount: f32) {
        self.grid.add_disturbance(row, col, amount);
    }

    /// Restores the initial surface without reallocating.
    pub fn reset(&mut self) {
        initialize(&mut self.grid, &self.params);
        self.steps = 0;
    }

    /// Tears the simulation down, returning the number of cells freed.
    pub fn release(self) -> usize {
        self.grid.release()
    }
}
