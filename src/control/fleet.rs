use nalgebra::Vector3;

use crate::dynamics::state::{EngineCommand, State};
use crate::vehicle::HoverCraft;
use crate::world::Environment;

use super::altimetry::HeightMode;
use super::attitude::{AttitudeController, PilotInput, VesselSensors};
use super::controller::Controller;
use super::height::HeightController;

// ---------------------------------------------------------------------------
// Fleet orchestration: two-phase tick across all engines of one craft
// ---------------------------------------------------------------------------

/// Fraction of each engine's deviation from the fleet mean that is fed back
/// as a leveling correction. Empirical constant carried over from the
/// reference craft tuning, not derived.
pub const LEVEL_SHARE: f64 = 0.6666666;

/// Throttle below which an engine counts as not thrusting.
const THRUST_EPS: f64 = 1e-3;

struct EngineLoop {
    mount_pos: Vector3<f64>,
    height: HeightController,
    attitude: AttitudeController,
}

/// The stock controller: one height-hold and one attitude loop per engine,
/// advanced in the strict tick order the height fusion requires:
///
/// 1. gather height readings from every active engine,
/// 2. compute per-engine leveling corrections against the fleet mean,
/// 3. step each engine's PIDs exactly once.
///
/// Disabled engines contribute nothing to the mean, and the ordering keeps
/// cooperating engines from oscillating against each other without needing
/// a shared controller.
pub struct HoverControlSystem {
    engines: Vec<EngineLoop>,
}

impl HoverControlSystem {
    pub fn new(craft: &HoverCraft) -> Self {
        let engines = craft
            .engines
            .iter()
            .map(|e| EngineLoop {
                mount_pos: e.mount_pos,
                height: HeightController::new(
                    e.height_gains,
                    e.min_height,
                    e.max_height,
                    e.height_offset,
                    e.max_hover_height,
                ),
                attitude: AttitudeController::new(e.attitude, e.thrust_axis, e.mount_pos),
            })
            .collect();
        Self { engines }
    }

    /// Master hover switch. Turning hover off synchronously zeroes every
    /// engine's accumulators.
    pub fn set_hover(&mut self, on: bool) {
        for e in &mut self.engines {
            if e.height.hover_enabled() != on {
                e.height.set_hover(on);
                if !on {
                    e.attitude.reset();
                }
            }
        }
    }

    pub fn hover_enabled(&self) -> bool {
        self.engines.iter().any(|e| e.height.hover_enabled())
    }

    pub fn set_mode(&mut self, mode: HeightMode) {
        for e in &mut self.engines {
            e.height.set_mode(mode);
        }
    }

    /// Command the same target height on every engine.
    pub fn set_target_height(&mut self, target: f64) {
        for e in &mut self.engines {
            e.height.set_target_height(target);
        }
    }

    /// Mean captured target across locked engines, if any.
    pub fn mean_target_height(&self) -> Option<f64> {
        let locked: Vec<f64> = self
            .engines
            .iter()
            .filter(|e| e.height.height_locked())
            .map(|e| e.height.target_height())
            .collect();
        if locked.is_empty() {
            None
        } else {
            Some(locked.iter().sum::<f64>() / locked.len() as f64)
        }
    }

    /// Run one control tick for the whole fleet.
    pub fn tick(
        &mut self,
        state: &State,
        env: &Environment,
        pilot: &PilotInput,
        dt: f64,
    ) -> Vec<EngineCommand> {
        self.set_hover(pilot.hover);
        for e in &mut self.engines {
            e.height.trim_target(pilot.height_trim, dt);
        }

        // Phase 1: gather height readings.
        let readings: Vec<f64> = self
            .engines
            .iter()
            .map(|e| {
                if !e.height.hover_enabled() {
                    return f64::NAN;
                }
                let origin = state.pos + state.quat * e.mount_pos;
                e.height
                    .sense(&origin, origin.z, env.body.has_ocean, &env.terrain)
            })
            .collect();

        // Phase 2: leveling corrections against the fleet mean. Needs at
        // least two locked engines with valid readings to mean anything.
        let contributes: Vec<bool> = self
            .engines
            .iter()
            .zip(&readings)
            .map(|(e, h)| e.height.hover_enabled() && e.height.height_locked() && h.is_finite())
            .collect();
        let count = contributes.iter().filter(|c| **c).count();
        let corrections: Vec<f64> = if count >= 2 {
            let mean = readings
                .iter()
                .zip(&contributes)
                .filter(|(_, c)| **c)
                .map(|(h, _)| h)
                .sum::<f64>()
                / count as f64;
            readings
                .iter()
                .zip(&contributes)
                .map(|(h, c)| if *c { (h - mean) * LEVEL_SHARE } else { 0.0 })
                .collect()
        } else {
            vec![0.0; self.engines.len()]
        };

        // Phase 3: step each engine exactly once.
        let mut commands = Vec::with_capacity(self.engines.len());
        for ((e, reading), correction) in self.engines.iter_mut().zip(readings).zip(corrections) {
            let throttle = e.height.update(reading, correction, dt);
            let sensors = VesselSensors {
                attitude: state.quat,
                angular_velocity: state.omega,
                velocity: state.vel,
                position: state.pos,
                down: -Vector3::z(),
                thrusting: e.height.hover_enabled() && throttle > THRUST_EPS,
            };
            let gimbal = e.attitude.update(pilot, &sensors, dt);
            commands.push(EngineCommand { throttle, gimbal });
        }
        commands
    }
}

impl Controller for HoverControlSystem {
    fn control(
        &mut self,
        state: &State,
        _craft: &HoverCraft,
        env: &Environment,
        pilot: &PilotInput,
        dt: f64,
    ) -> Vec<EngineCommand> {
        self.tick(state, env, pilot, dt)
    }

    fn reset(&mut self) {
        self.set_hover(false);
    }

    fn target_height(&self) -> Option<f64> {
        self.mean_target_height()
    }

    fn name(&self) -> &str {
        "HoverControlSystem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::presets;
    use crate::world::{Body, Terrain};

    fn setup() -> (HoverControlSystem, HoverCraft, Environment, State) {
        let craft = presets::skimmer();
        let system = HoverControlSystem::new(&craft);
        let env = Environment::new(Body::temperate(), Terrain::flat(0.0));
        let state = State::at_rest(Vector3::new(0.0, 0.0, 5.0));
        (system, craft, env, state)
    }

    fn hover_pilot() -> PilotInput {
        PilotInput { hover: true, ..Default::default() }
    }

    #[test]
    fn one_command_per_engine() {
        let (mut system, craft, env, state) = setup();
        let commands = system.tick(&state, &env, &hover_pilot(), 0.02);
        assert_eq!(commands.len(), craft.engines.len());
    }

    #[test]
    fn first_tick_captures_targets() {
        let (mut system, _craft, env, state) = setup();
        assert!(system.mean_target_height().is_none());
        system.tick(&state, &env, &hover_pilot(), 0.02);
        let target = system.mean_target_height().expect("targets captured");
        assert!((target - 5.0).abs() < 1e-9, "Flat ground at 5 m, got {}", target);
    }

    #[test]
    fn hover_off_commands_zero_throttle() {
        let (mut system, _craft, env, state) = setup();
        let commands = system.tick(&state, &env, &PilotInput::default(), 0.02);
        assert!(commands.iter().all(|c| c.throttle == 0.0));
    }

    #[test]
    fn below_target_throttles_up() {
        let (mut system, _craft, env, mut state) = setup();
        system.set_target_height(10.0);
        state.pos.z = 5.0;
        let commands = system.tick(&state, &env, &hover_pilot(), 0.02);
        assert!(
            commands.iter().all(|c| c.throttle > 0.0),
            "5 m below target must demand thrust"
        );
    }

    #[test]
    fn level_craft_gets_no_differential_correction() {
        // On flat terrain with a level craft every engine reads the same
        // height, so the leveling correction cancels and all four engines
        // command the same throttle.
        let (mut system, _craft, env, mut state) = setup();
        system.set_target_height(10.0);
        state.pos.z = 6.0;
        system.tick(&state, &env, &hover_pilot(), 0.02);
        let commands = system.tick(&state, &env, &hover_pilot(), 0.02);
        let first = commands[0].throttle;
        for c in &commands {
            assert!(
                (c.throttle - first).abs() < 1e-12,
                "Symmetric geometry must give symmetric throttle"
            );
        }
    }

    #[test]
    fn rolled_craft_gets_differential_throttle() {
        // Roll the craft: engines on the low side read less clearance and
        // must throttle up relative to the high side.
        let (mut system, craft, env, mut state) = setup();
        system.set_target_height(10.0);
        state.pos.z = 8.0;
        state.quat = nalgebra::UnitQuaternion::from_axis_angle(&nalgebra::Vector3::x_axis(), 0.15);
        system.tick(&state, &env, &hover_pilot(), 0.02);
        let commands = system.tick(&state, &env, &hover_pilot(), 0.02);

        // Body +Y mounts end up higher after a positive roll about +X.
        let mut low = f64::NEG_INFINITY;
        let mut high = f64::INFINITY;
        for (engine, cmd) in craft.engines.iter().zip(&commands) {
            let z = (state.quat * engine.mount_pos).z;
            if z < 0.0 {
                low = low.max(cmd.throttle);
            } else {
                high = high.min(cmd.throttle);
            }
        }
        assert!(
            low > high,
            "Low-side engines should out-throttle high-side ones ({} vs {})",
            low,
            high
        );
    }

    #[test]
    fn disabling_hover_resets_and_zeroes() {
        let (mut system, _craft, env, state) = setup();
        system.set_target_height(20.0);
        for _ in 0..10 {
            system.tick(&state, &env, &hover_pilot(), 0.02);
        }
        let commands = system.tick(&state, &env, &PilotInput::default(), 0.02);
        assert!(commands.iter().all(|c| c.throttle == 0.0));
        assert!(!system.hover_enabled());
        assert!(system.mean_target_height().is_none(), "Lock must clear on disable");
    }
}
