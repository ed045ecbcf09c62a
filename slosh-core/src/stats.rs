use crate::grid::Grid;

/// Aggregate measurements over the water (non-obstacle) cells.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldStats {
    pub water_cells: usize,
    pub mean_height: f32,
    pub min_height: f32,
    pub max_height: f32,
    /// Largest `|v|`.
    pub max_speed: f32,
    /// `0.5 * sum(v^2)`, kept wide so finite velocities give a finite sum.
    pub kinetic_energy: f64,
    pub non_finite: usize,
}

impl FieldStats {
    pub fn measure(grid: &Grid) -> FieldStats {
        let mut s = FieldStats {
            min_height: f32::INFINITY,
            max_height: f32::NEG_INFINITY,
            ..FieldStats::default()
        };
        let mut sum = 0.0f64;
        let mut energy = 0.0f64;

        let cells = grid
            .heights()
            .iter()
            .zip(grid.velocities())
            .zip(grid.obstacles());
        for ((&h, &v), &wall) in cells {
            if wall {
                continue;
            }
            if !h.is_finite() || !v.is_finite() {
                s.non_finite += 1;
                continue;
            }
            s.water_cells += 1;
            sum += h as f64;
            energy += 0.5 * (v as f64) * (v as f64);
            s.min_height = s.min_height.min(h);
            s.max_height = s.max_height.max(h);
            s.max_speed = s.max_speed.max(v.abs());
        }

        if s.water_cells == 0 {
            s.min_height = 0.0;
            s.max_height = 0.0;
        } else {
            s.mean_height = (sum / s.water_cells as f64) as f32;
        }
        s.kinetic_energy = energy;
        s
    }
}
