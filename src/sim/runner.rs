use nalgebra::Vector3;

use crate::control::{Controller, HoverControlSystem, PilotInput};
use crate::dynamics::state::{EngineCommand, SimConfig, State};
use crate::vehicle::HoverCraft;
use crate::world::Environment;

use super::integrator::rk4_step;

// ---------------------------------------------------------------------------
// Flight plan: piecewise-constant pilot input over time
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Segment {
    /// Segment applies while `time < until`.
    pub until: f64,
    pub input: PilotInput,
}

/// Scripted pilot. The last segment's input holds beyond its end time.
#[derive(Debug, Clone)]
pub struct FlightPlan {
    pub start: Vector3<f64>,
    pub initial_velocity: Vector3<f64>,
    pub segments: Vec<Segment>,
}

impl FlightPlan {
    pub fn new(start: Vector3<f64>) -> Self {
        Self {
            start,
            initial_velocity: Vector3::zeros(),
            segments: vec![],
        }
    }

    pub fn with_velocity(mut self, v: Vector3<f64>) -> Self {
        self.initial_velocity = v;
        self
    }

    /// Append a segment lasting until the given absolute time.
    pub fn until(mut self, time: f64, input: PilotInput) -> Self {
        self.segments.push(Segment { until: time, input });
        self
    }

    pub fn input_at(&self, time: f64) -> PilotInput {
        for s in &self.segments {
            if time < s.until {
                return s.input;
            }
        }
        self.segments.last().map(|s| s.input).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Per-tick control telemetry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TickLog {
    pub commands: Vec<EngineCommand>,
    /// Clearance above the contact surface below the craft center, m.
    pub agl: f64,
    /// Mean commanded hover height, when the controller regulates one.
    pub target: Option<f64>,
}

impl TickLog {
    /// Mean throttle across engines, for quick summaries.
    pub fn mean_throttle(&self) -> f64 {
        if self.commands.is_empty() {
            0.0
        } else {
            self.commands.iter().map(|c| c.throttle).sum::<f64>() / self.commands.len() as f64
        }
    }
}

// ---------------------------------------------------------------------------
// Full flight simulation
// ---------------------------------------------------------------------------

fn clearance(state: &State, env: &Environment) -> f64 {
    state.pos.z - env.terrain.contact_height(state.pos.x, state.pos.y, env.body.has_ocean)
}

/// Simulate a scripted flight with a custom controller.
/// Returns the trajectory and the per-tick control log. Ends on touchdown
/// (after having been airborne) or at `max_time`.
pub fn simulate_with(
    craft: &HoverCraft,
    env: &Environment,
    plan: &FlightPlan,
    config: &SimConfig,
    controller: &mut dyn Controller,
) -> (Vec<State>, Vec<TickLog>) {
    let mut state = State::at_rest(plan.start);
    state.vel = plan.initial_velocity;

    let capacity = (config.max_time / config.dt) as usize + 1;
    let cap = capacity.min(200_000);
    let mut trajectory = Vec::with_capacity(cap);
    let mut logs = Vec::with_capacity(cap);

    trajectory.push(state.clone());
    logs.push(TickLog {
        commands: vec![EngineCommand::default(); craft.engines.len()],
        agl: clearance(&state, env),
        target: controller.target_height(),
    });

    let mut airborne = false;

    while state.time < config.max_time {
        let pilot = plan.input_at(state.time);
        let commands = controller.control(&state, craft, env, &pilot, config.dt);

        state = rk4_step(&state, craft, env, &commands, config.dt);

        let agl = clearance(&state, env);
        if agl > 0.5 {
            airborne = true;
        }

        // Ground contact
        if airborne && agl <= 0.0 {
            state.pos.z -= agl;
            trajectory.push(state.clone());
            logs.push(TickLog {
                commands,
                agl: 0.0,
                target: controller.target_height(),
            });
            break;
        }

        trajectory.push(state.clone());
        logs.push(TickLog {
            commands,
            agl,
            target: controller.target_height(),
        });
    }

    (trajectory, logs)
}

/// Simulate with the stock `HoverControlSystem` (convenience wrapper).
pub fn simulate(
    craft: &HoverCraft,
    env: &Environment,
    plan: &FlightPlan,
    config: &SimConfig,
) -> (Vec<State>, Vec<TickLog>) {
    let mut controller = HoverControlSystem::new(craft);
    simulate_with(craft, env, plan, config, &mut controller)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
