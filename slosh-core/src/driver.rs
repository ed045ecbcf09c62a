use std::time::Duration;

use tracing::debug;

use crate::Simulation;

/// Whether the driver should keep going after a sink call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// A completed frame, handed to the sink between steps.
pub struct Frame<'a> {
    /// Zero-based frame number.
    pub index: u64,
    pub text: &'a str,
    pub sim: &'a Simulation,
}

/// Destination for rendered frames.
pub trait FrameSink {
    type Error;

    fn present(&mut self, frame: &Frame<'_>) -> Result<Flow, Self::Error>;

    /// Waits between frames. The default blocks the thread.
    fn pause(&mut self, delay: Duration) -> Result<Flow, Self::Error> {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        Ok(Flow::Continue)
    }
}

/// First step at which the field held NaN or infinite values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Divergence {
    pub step: u64,
    pub cells: usize,
}

/// Alternates step and render at the configured frame delay.
pub struct Driver {
    sim: Simulation,
    frame_limit: Option<u64>,
    frame: String,
    divergence: Option<Divergence>,
}

impl Driver {
    pub fn new(sim: Simulation) -> Driver {
        Driver {
            sim,
            frame_limit: None,
            frame: String::new(),
            divergence: None,
        }
    }

    /// Stops after `frames` frames instead of running forever.
    pub fn with_frame_limit(mut self, frames: u64) -> Driver {
        self.frame_limit = Some(frames);
        self
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Set once the field stops being finite; reported by the caller, which
    /// knows when the display is able to show it.
    pub fn divergence(&self) -> Option<Divergence> {
        self.divergence
    }

    pub fn into_simulation(self) -> Simulation {
        self.sim
    }

    /// Runs until the frame limit or until the sink asks to stop.
    ///
    /// Returns the number of frames presented.
    pub fn run<S: FrameSink>(&mut self, sink: &mut S) -> Result<u64, S::Error> {
        let delay = self.sim.params().frame_delay();
        let mut presented = 0u64;

        loop {
            if self.frame_limit.is_some_and(|n| presented >= n) {
                break;
            }

            self.sim.step();
            self.sim.render_into(&mut self.frame);
            self.check_finite();

            let frame = Frame {
                index: presented,
                text: &self.frame,
                sim: &self.sim,
            };
            let flow = sink.present(&frame)?;
            presented += 1;
            if flow == Flow::Stop || self.frame_limit.is_some_and(|n| presented >= n) {
                break;
            }

            if sink.pause(delay)? == Flow::Stop {
                break;
            }
        }

        debug!(frames = presented, steps = self.sim.steps(), "driver stopped");
        Ok(presented)
    }

    fn check_finite(&mut self) {
        if self.divergence.is_some() {
            return;
        }
        let cells = self.sim.non_finite_cells();
        if cells > 0 {
            let step = self.sim.steps();
            debug!(cells, step, "non-finite values in the field");
            self.divergence = Some(Divergence { step, cells });
        }
    }
}
