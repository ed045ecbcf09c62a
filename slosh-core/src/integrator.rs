use crate::grid::{clamp01, Grid};
use crate::params::SimParams;

/// Read-only view of the pre-step state.
struct Current<'a> {
    width: usize,
    height: usize,
    h: &'a [f32],
    v: &'a [f32],
    obstacle: &'a [bool],
}

impl Current<'_> {
    /// Height of a neighbour, mirroring the centre through walls and edges.
    #[inline]
    fn neighbour(&self, row: Option<usize>, col: Option<usize>, centre: f32) -> f32 {
        match (row, col) {
            (Some(r), Some(c)) if r < self.height && c < self.width => {
                let i = r * self.width + c;
                if self.obstacle[i] { centre } else { self.h[i] }
            }
            _ => centre,
        }
    }

    /// Next `(height, velocity)` of cell `(r, c)`.
    fn advance(&self, r: usize, c: usize, params: &SimParams) -> (f32, f32) {
        let i = r * self.width + c;
        if self.obstacle[i] {
            return (0.0, 0.0);
        }

        let h = self.h[i];
        let up = self.neighbour(r.checked_sub(1), Some(c), h);
        let down = self.neighbour(Some(r + 1), Some(c), h);
        let left = self.neighbour(Some(r), c.checked_sub(1), h);
        let right = self.neighbour(Some(r), Some(c + 1), h);

        let lap = up + down + left + right - 4.0 * h;

        let mut vel = self.v[i] + params.wave_speed_sq * lap * params.dt;
        vel *= 1.0 - params.damping * params.dt;

        (clamp01(h + vel * params.dt), vel)
    }
}

/// Discrete Laplacian of the height field at `(row, col)` with reflective walls.
pub fn laplacian(grid: &Grid, row: usize, col: usize) -> f32 {
    let cur = current(grid);
    let h = grid.height_at(row, col);
    cur.neighbour(row.checked_sub(1), Some(col), h)
        + cur.neighbour(Some(row + 1), Some(col), h)
        + cur.neighbour(Some(row), col.checked_sub(1), h)
        + cur.neighbour(Some(row), Some(col + 1), h)
        - 4.0 * h
}

/// Advances the grid by one time step `params.dt`.
///
/// Reads only the current buffers and writes only the scratch buffers, then
/// swaps them.
pub fn step(grid: &mut Grid, params: &SimParams) {
    let (width, height) = (grid.width(), grid.height());
    let Grid {
        h,
        v,
        next_h,
        next_v,
        obstacle,
        ..
    } = &mut *grid;
    let cur = Current {
        width,
        height,
        h,
        v,
        obstacle,
    };

    for r in 0..height {
        let row = r * width;
        for c in 0..width {
            let (nh, nv) = cur.advance(r, c, params);
            next_h[row + c] = nh;
            next_v[row + c] = nv;
        }
    }

    grid.swap();
}

fn current(grid: &Grid) -> Current<'_> {
    Current {
        width: grid.width(),
        height: grid.height(),
        h: grid.heights(),
        v: grid.velocities(),
        obstacle: grid.obstacles(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::initialize;
    use crate::params::Domain;

    fn params() -> SimParams {
        SimParams::default()
    }

    fn flat(width: usize, height: usize, level: f32) -> Grid {
        let mut g = Grid::allocate(Domain::new(width, height).unwrap()).unwrap();
        initialize(
            &mut g,
            &SimParams {
                initial_tilt: 0.5,
                ..params()
            },
        );
        for r in 0..height {
            for c in 0..width {
                g.set_cell(r, c, level);
            }
        }
        g
    }

    #[test]
    fn flat_surface_is_a_fixed_point() {
        let mut g = flat(12, 7, 0.75);
        let before = g.heights().to_vec();
        for _ in 0..50 {
            step(&mut g, &params());
        }
        assert_eq!(g.heights(), &before[..]);
        assert!(g.velocities().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn walls_mirror_the_centre() {
        let mut g = flat(3, 3, 0.625);
        // Single water cell surrounded by walls: every neighbour is mirrored.
        assert_eq!(laplacian(&g, 1, 1), 0.0);
        step(&mut g, &params());
        assert_eq!(g.height_at(1, 1), 0.625);
    }

    #[test]
    fn single_step_matches_hand_computation() {
        let mut g = flat(5, 5, 0.5);
        g.set_cell(2, 2, 0.9);
        let p = SimParams {
            dt: 0.2,
            wave_speed_sq: 0.5,
            damping: 0.01,
            ..params()
        };

        // centre: L = 4*0.5 - 4*0.9 = -1.6
        let lap = laplacian(&g, 2, 2);
        assert!((lap + 1.6).abs() < 1e-6);
        let v = (0.5 * lap * 0.2) * (1.0 - 0.01 * 0.2);
        let h = 0.9 + v * 0.2;

        // edge neighbour (1, 2): up is a wall, so L = 0.5 + 0.9 + 0.5 + 0.5 - 2.0 = 0.4
        let vn = (0.5 * 0.4 * 0.2) * (1.0 - 0.01 * 0.2);
        let hn = 0.5 + vn * 0.2;

        step(&mut g, &p);

        assert!((g.velocity_at(2, 2) - v).abs() < 1e-6);
        assert!((g.height_at(2, 2) - h).abs() < 1e-6);
        assert!((g.velocity_at(1, 2) - vn).abs() < 1e-6);
        assert!((g.height_at(1, 2) - hn).abs() < 1e-6);
    }

    #[test]
    fn obstacles_stay_dry_after_step() {
        let mut g = flat(6, 6, 0.5);
        g.h[0] = 0.4;
        g.v[0] = 1.0;
        step(&mut g, &params());
        assert_eq!(g.height_at(0, 0), 0.0);
        assert_eq!(g.velocity_at(0, 0), 0.0);
    }

    #[test]
    fn heights_are_clamped() {
        let mut g = flat(5, 5, 1.0);
        let (centre, corner) = (g.index(2, 2), g.index(1, 1));
        g.v[centre] = 50.0;
        g.v[corner] = -50.0;
        step(&mut g, &params());
        assert_eq!(g.height_at(2, 2), 1.0);
        assert_eq!(g.height_at(1, 1), 0.0);
    }

    #[test]
    fn damping_slows_velocity() {
        let mut g = flat(3, 3, 0.5);
        let i = g.index(1, 1);
        g.v[i] = 1.0;
        let p = SimParams {
            damping: 0.5,
            dt: 0.2,
            ..params()
        };
        step(&mut g, &p);
        assert!((g.velocity_at(1, 1) - 0.9).abs() < 1e-6);
    }

    #[test]
    fn scratch_buffers_hold_previous_state_after_step() {
        let mut g = flat(5, 5, 0.5);
        g.set_cell(2, 2, 0.9);
        let before = g.heights().to_vec();
        step(&mut g, &params());
        assert_eq!(&g.next_h[..], &before[..]);
    }
}
