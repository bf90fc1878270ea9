use nalgebra::UnitQuaternion;

use crate::dynamics;
use crate::dynamics::state::{EngineCommand, State};
use crate::vehicle::HoverCraft;
use crate::world::Environment;

// ---------------------------------------------------------------------------
// 6DOF RK4 integrator with constant engine commands over the step
// ---------------------------------------------------------------------------

/// Single RK4 step with the engine commands held constant over the step.
pub fn rk4_step(
    state: &State,
    craft: &HoverCraft,
    env: &Environment,
    commands: &[EngineCommand],
    dt: f64,
) -> State {
    let k1 = dynamics::derivatives(state, craft, env, commands);
    let k2 = dynamics::derivatives(&state.apply(&k1, dt * 0.5), craft, env, commands);
    let k3 = dynamics::derivatives(&state.apply(&k2, dt * 0.5), craft, env, commands);
    let k4 = dynamics::derivatives(&state.apply(&k3, dt), craft, env, commands);

    let new_quat_raw = state.quat.quaternion()
        + (k1.dquat + k2.dquat * 2.0 + k3.dquat * 2.0 + k4.dquat) * (dt / 6.0);

    State {
        time: state.time + dt,
        pos: state.pos + (k1.dpos + 2.0 * k2.dpos + 2.0 * k3.dpos + k4.dpos) * (dt / 6.0),
        vel: state.vel + (k1.dvel + 2.0 * k2.dvel + 2.0 * k3.dvel + k4.dvel) * (dt / 6.0),
        quat: UnitQuaternion::new_normalize(new_quat_raw),
        omega: state.omega
            + (k1.domega + 2.0 * k2.domega + 2.0 * k3.domega + k4.domega) * (dt / 6.0),
    }
}
