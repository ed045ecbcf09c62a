use wasm_bindgen::prelude::*;
use slosh_core::{Domain, SimParams, Simulation};

#[wasm_bindgen]
pub struct Sloshing {
    inner: Simulation,
    frame: String,
}

#[wasm_bindgen]
impl Sloshing {
    #[wasm_bindgen(constructor)]
    pub fn new(width: usize, height: usize, level: f32, tilt: f32) -> Result<Sloshing, JsValue> {
        let params = SimParams {
            initial_level: level,
            initial_tilt: tilt,
            ..SimParams::default()
        };
        Sloshing::with_params(width, height, params)
    }

    /// Full parameter set; `dt`, `speed_sq` and `damping` as on the command line.
    pub fn with_dynamics(
        width: usize,
        height: usize,
        level: f32,
        tilt: f32,
        dt: f32,
        speed_sq: f32,
        damping: f32,
    ) -> Result<Sloshing, JsValue> {
        let params = SimParams {
            dt,
            wave_speed_sq: speed_sq,
            damping,
            initial_level: level,
            initial_tilt: tilt,
            ..SimParams::default()
        };
        Sloshing::with_params(width, height, params)
    }

    pub fn width(&self) -> usize { self.inner.width() }
    pub fn height(&self) -> usize { self.inner.height() }
    pub fn steps(&self) -> u64 { self.inner.steps() }
    pub fn stability_metric(&self) -> f32 { self.inner.params().stability_metric() }
    pub fn is_stable(&self) -> bool { self.inner.params().is_stable() }

    pub fn reset(&mut self) { self.inner.reset(); }
    pub fn drop_water(&mut self, row: usize, col: usize, amount: f32) {
        self.inner.add_disturbance(row, col, amount);
    }

    // Copy-based JS access (reliable)
    pub fn get_heights(&self) -> Vec<f32> {
        self.inner.grid().heights().to_vec()
    }

    pub fn render(&mut self) -> String {
        self.inner.render_into(&mut self.frame);
        self.frame.clone()
    }

    pub fn step(&mut self, count: u32) {
        for _ in 0..count {
            self.inner.step();
        }
    }

    // Step + timing (WASM-only)
    pub fn step_timed(&mut self, count: u32) -> StepInfo {
        let t0 = now_ms();
        self.step(count);
        let t1 = now_ms();
        let stats = self.inner.stats();
        StepInfo {
            steps: count,
            compute_ms: t1 - t0,
            time: self.inner.elapsed(),
            max_speed: stats.max_speed,
            kinetic_energy: stats.kinetic_energy,
        }
    }
}

impl Sloshing {
    fn with_params(width: usize, height: usize, params: SimParams) -> Result<Sloshing, JsValue> {
        let domain = Domain::new(width, height).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let inner = Simulation::new(domain, params).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Sloshing { inner, frame: String::new() })
    }
}

#[wasm_bindgen]
pub struct StepInfo {
    steps: u32,
    compute_ms: f64,
    time: f32,
    max_speed: f32,
    kinetic_energy: f64,
}

#[wasm_bindgen]
impl StepInfo {
    pub fn steps(&self) -> u32 { self.steps }
    pub fn compute_ms(&self) -> f64 { self.compute_ms }
    pub fn time(&self) -> f32 { self.time }
    pub fn max_speed(&self) -> f32 { self.max_speed }
    pub fn kinetic_energy(&self) -> f64 { self.kinetic_energy }
}


fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_and_renders_on_native() {
        let mut s = match Sloshing::new(12, 6, 0.5, 0.0) {
            Ok(s) => s,
            Err(_) => panic!("valid parameters rejected"),
        };
        let first = s.render();
        assert_eq!(first.lines().count(), 6);
        assert!(first.contains('@'));

        s.step(10);
        assert_eq!(s.steps(), 10);
        assert_eq!(s.get_heights().len(), 72);

        s.reset();
        assert_eq!(s.render(), first);
    }

    #[test]
    fn dropped_water_raises_the_cell() {
        let mut s = match Sloshing::with_dynamics(10, 10, 0.3, 0.2, 0.1, 0.5, 0.0) {
            Ok(s) => s,
            Err(_) => panic!("valid parameters rejected"),
        };
        assert!(s.is_stable());
        let before = s.get_heights()[3 * 10 + 4];
        s.drop_water(3, 4, 0.25);
        assert!(s.get_heights()[3 * 10 + 4] > before);
    }
}
