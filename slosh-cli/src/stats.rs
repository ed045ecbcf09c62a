use std::io::Write;

use serde::Serialize;
use slosh_core::{Flow, Frame, FrameSink};

use crate::error::CliError;

/// One JSON line per frame.
#[derive(Serialize)]
struct StatsRow {
    frame: u64,
    step: u64,
    time: f32,

    width: usize,
    height: usize,

    water_cells: usize,
    mean_height: f32,
    min_height: f32,
    max_height: f32,
    max_speed: f32,
    kinetic_energy: f64,
    non_finite: usize,
}

/// Headless sink writing field statistics as JSON lines.
pub struct StatsSink<W: Write> {
    out: W,
}

impl<W: Write> StatsSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameSink for StatsSink<W> {
    type Error = CliError;

    fn present(&mut self, frame: &Frame<'_>) -> Result<Flow, CliError> {
        let sim = frame.sim;
        let s = sim.stats();
        let row = StatsRow {
            frame: frame.index,
            step: sim.steps(),
            time: sim.elapsed(),

            width: sim.width(),
            height: sim.height(),

            water_cells: s.water_cells,
            mean_height: s.mean_height,
            min_height: s.min_height,
            max_height: s.max_height,
            max_speed: s.max_speed,
            kinetic_energy: s.kinetic_energy,
            non_finite: s.non_finite,
        };

        serde_json::to_writer(&mut self.out, &row)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(Flow::Continue)
    }
}
