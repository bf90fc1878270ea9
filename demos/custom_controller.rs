use nalgebra::Vector3;

use hover_sim::control::{Controller, PilotInput};
use hover_sim::dynamics::state::{EngineCommand, SimConfig, State};
use hover_sim::sim::{simulate_with, FlightPlan};
use hover_sim::vehicle::{presets, HoverCraft};
use hover_sim::world::Environment;

/// A bang-bang height keeper: full-ish throttle below the target band,
/// near-idle above it, no thrust vectoring at all. Useful as a baseline to
/// compare against the PID system.
struct BangBangController {
    target: f64,
    band: f64,
}

impl Controller for BangBangController {
    fn control(
        &mut self,
        state: &State,
        craft: &HoverCraft,
        env: &Environment,
        _pilot: &PilotInput,
        _dt: f64,
    ) -> Vec<EngineCommand> {
        let ground = env
            .terrain
            .contact_height(state.pos.x, state.pos.y, env.body.has_ocean);
        let agl = state.pos.z - ground;
        let throttle = if agl < self.target - self.band {
            0.8
        } else if agl > self.target + self.band {
            0.1
        } else {
            0.4
        };
        craft
            .engines
            .iter()
            .map(|_| EngineCommand { throttle, ..Default::default() })
            .collect()
    }

    fn target_height(&self) -> Option<f64> {
        Some(self.target)
    }

    fn name(&self) -> &str {
        "BangBang"
    }
}

fn main() {
    let craft = presets::skimmer();
    let env = Environment::flat_pad();
    let config = SimConfig { dt: 0.02, max_time: 45.0 };
    let plan = FlightPlan::new(Vector3::new(0.0, 0.0, 2.0))
        .until(f64::MAX, PilotInput { hover: true, ..Default::default() });

    let mut controller = BangBangController { target: 6.0, band: 0.5 };

    println!("Simulating with {} controller...", controller.name());
    let (trajectory, logs) = simulate_with(&craft, &env, &plan, &config, &mut controller);

    let max_agl = logs.iter().map(|l| l.agl).fold(0.0_f64, f64::max);
    let tail = &logs[logs.len().saturating_sub(500)..];
    let tail_mean = tail.iter().map(|l| l.agl).sum::<f64>() / tail.len() as f64;

    println!("Max AGL: {:.2} m", max_agl);
    println!("Mean AGL over last 10 s: {:.2} m (target 6.0)", tail_mean);
    println!("Flight time: {:.1} s", trajectory.last().unwrap().time);
    println!("Trajectory points: {}", trajectory.len());
}
