use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::params::Domain;

/// Height, velocity and obstacle fields over a fixed lattice.
///
/// Every field is one contiguous buffer indexed by `row * width + col`.
/// `h`/`v` hold the current state; `next_h`/`next_v` are scratch space
/// written during a step and promoted by [`Grid::swap`].
#[derive(Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    pub(crate) h: Vec<f32>,
    pub(crate) v: Vec<f32>,
    pub(crate) next_h: Vec<f32>,
    pub(crate) next_v: Vec<f32>,
    pub(crate) obstacle: Vec<bool>,
}

impl Grid {
    /// Allocates five zeroed fields for `domain`.
    pub fn allocate(domain: Domain) -> SimResult<Grid> {
        let (width, height) = (domain.width(), domain.height());
        let cells = domain
            .cells()
            .ok_or(SimError::Allocation { width, height })?;

        let grid = Grid {
            width,
            height,
            h: zeroed(cells, domain)?,
            v: zeroed(cells, domain)?,
            next_h: zeroed(cells, domain)?,
            next_v: zeroed(cells, domain)?,
            obstacle: zeroed(cells, domain)?,
        };
        debug!(width, height, cells, "grid allocated");
        Ok(grid)
    }

    // ---- Accessors ----

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width
    }

    pub fn height_at(&self, row: usize, col: usize) -> f32 {
        self.h[self.index(row, col)]
    }

    pub fn velocity_at(&self, row: usize, col: usize) -> f32 {
        self.v[self.index(row, col)]
    }

    pub fn is_obstacle(&self, row: usize, col: usize) -> bool {
        self.obstacle[self.index(row, col)]
    }

    pub fn is_border(&self, row: usize, col: usize) -> bool {
        row == 0 || col == 0 || row + 1 == self.height || col + 1 == self.width
    }

    pub fn heights(&self) -> &[f32] {
        &self.h
    }

    pub fn velocities(&self) -> &[f32] {
        &self.v
    }

    pub fn obstacles(&self) -> &[bool] {
        &self.obstacle
    }

    // ---- Mutation ----

    /// Sets the height of a water cell and brings it to rest.
    ///
    /// Out-of-range and obstacle cells are left untouched.
    pub fn set_cell(&mut self, row: usize, col: usize, height: f32) {
        if !self.in_bounds(row, col) {
            return;
        }
        let i = self.index(row, col);
        if self.obstacle[i] {
            return;
        }
        self.h[i] = clamp01(height);
        self.v[i] = 0.0;
    }

    /// Raises (or lowers, for negative `amount`) a water cell in place.
    pub fn add_disturbance(&mut self, row: usize, col: usize, amount: f32) {
        if !self.in_bounds(row, col) {
            return;
        }
        let i = self.index(row, col);
        if !self.obstacle[i] {
            self.h[i] = clamp01(self.h[i] + amount);
        }
    }

    /// Promotes the scratch buffers to current state.
    ///
    /// Exchanges buffer ownership only; no element is copied.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.h, &mut self.next_h);
        std::mem::swap(&mut self.v, &mut self.next_v);
    }

    /// Frees all five fields, returning the number of cells released.
    pub fn release(self) -> usize {
        let cells = self.h.len();
        debug!(width = self.width, height = self.height, "grid released");
        drop(self);
        cells
    }
}

/// Clamps to `[0, 1]`; NaN collapses to `0`.
#[inline]
pub(crate) fn clamp01(x: f32) -> f32 {
    x.max(0.0).min(1.0)
}

fn zeroed<T: Clone + Default>(len: usize, domain: Domain) -> SimResult<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| SimError::Allocation {
            width: domain.width(),
            height: domain.height(),
        })?;
    buf.resize(len, T::default());
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: usize, height: usize) -> Grid {
        Grid::allocate(Domain::new(width, height).unwrap()).unwrap()
    }

    #[test]
    fn allocation_is_zeroed_and_shaped() {
        let g = grid(7, 4);
        assert_eq!((g.width(), g.height()), (7, 4));
        for field in [g.heights(), g.velocities(), &g.next_h[..], &g.next_v[..]] {
            assert_eq!(field.len(), 28);
            assert!(field.iter().all(|&x| x == 0.0));
        }
        assert!(g.obstacles().iter().all(|&o| !o));
    }

    #[test]
    fn overflowing_domain_fails_allocation() {
        let d = Domain::new(usize::MAX, 2).unwrap();
        assert!(matches!(
            Grid::allocate(d),
            Err(SimError::Allocation { height: 2, .. })
        ));
    }

    #[test]
    fn swap_exchanges_buffers_without_copying() {
        let mut g = grid(5, 5);
        g.next_h[6] = 0.75;
        g.next_v[6] = -0.25;
        let h_ptr = g.h.as_ptr();
        let next_h_ptr = g.next_h.as_ptr();
        let v_ptr = g.v.as_ptr();

        g.swap();

        assert_eq!(g.heights().as_ptr(), next_h_ptr);
        assert_eq!(g.next_h.as_ptr(), h_ptr);
        assert_eq!(g.next_v.as_ptr(), v_ptr);
        assert_eq!(g.height_at(1, 1), 0.75);
        assert_eq!(g.velocity_at(1, 1), -0.25);
    }

    #[test]
    fn set_cell_clamps_and_skips_obstacles() {
        let mut g = grid(4, 4);
        g.obstacle[0] = true;
        g.set_cell(0, 0, 0.5);
        g.set_cell(1, 1, 1.7);
        g.set_cell(9, 9, 0.5);
        assert_eq!(g.height_at(0, 0), 0.0);
        assert_eq!(g.height_at(1, 1), 1.0);
    }

    #[test]
    fn disturbance_accumulates_within_range() {
        let mut g = grid(4, 4);
        g.set_cell(2, 2, 0.5);
        g.add_disturbance(2, 2, 0.3);
        assert!((g.height_at(2, 2) - 0.8).abs() < 1e-6);
        g.add_disturbance(2, 2, -2.0);
        assert_eq!(g.height_at(2, 2), 0.0);
    }

    #[test]
    fn clamp01_collapses_nan() {
        assert_eq!(clamp01(f32::NAN), 0.0);
        assert_eq!(clamp01(f32::INFINITY), 1.0);
        assert_eq!(clamp01(-3.0), 0.0);
        assert_eq!(clamp01(0.3), 0.3);
    }

    #[test]
    fn release_reports_cell_count() {
        assert_eq!(grid(6, 3).release(), 18);
    }
}
