use nalgebra::{Quaternion, Vector3};

use crate::dynamics::state::{Deriv, EngineCommand, State};
use crate::vehicle::HoverCraft;
use crate::world::Environment;

// ---------------------------------------------------------------------------
// 6DOF equations of motion
// ---------------------------------------------------------------------------

/// Compute full 6DOF state derivatives.
///
/// Forces & moments:
///   1. Uniform gravity (world frame)
///   2. Per-engine thrust along the gimballed lift axis (body frame)
///   3. Aerodynamic drag (opposing velocity)
///   4. Engine-mount torques from thrust offsets
///   5. Passive angular damping
pub fn derivatives(
    state: &State,
    craft: &HoverCraft,
    env: &Environment,
    commands: &[EngineCommand],
) -> Deriv {
    // --- Engine thrust (body frame) ---
    let mut force_body = Vector3::zeros();
    let mut torque_body = Vector3::zeros();
    for (engine, cmd) in craft.engines.iter().zip(commands) {
        let throttle = cmd.throttle.clamp(0.0, 1.0);
        if throttle <= 0.0 {
            continue;
        }
        // Force is the reaction to the exhaust.
        let exhaust = cmd.gimbal * engine.thrust_axis;
        let f = -exhaust * (engine.max_thrust * throttle);
        force_body += f;
        torque_body += engine.mount_pos.cross(&f);
    }
    let f_thrust = state.quat * force_body;

    // --- Gravity (world frame) ---
    let f_gravity = Vector3::new(0.0, 0.0, -env.body.gravity * craft.mass);

    // --- Aerodynamic drag (world frame, opposing velocity) ---
    let speed = state.vel.norm();
    let f_drag = if speed > 1e-6 && env.body.air_density > 0.0 {
        let q_dyn = 0.5 * env.body.air_density * speed * speed;
        -state.vel.normalize() * (q_dyn * craft.cd * craft.area)
    } else {
        Vector3::zeros()
    };

    let accel = (f_thrust + f_gravity + f_drag) / craft.mass;

    // --- Passive angular damping (body frame) ---
    torque_body -= state.omega * craft.angular_damping;

    // --- Euler's equation: I * domega = torque - omega x (I * omega) ---
    let i = craft.inertia;
    let i_omega = Vector3::new(
        i.x * state.omega.x,
        i.y * state.omega.y,
        i.z * state.omega.z,
    );
    let domega = Vector3::new(
        (torque_body.x - (state.omega.y * i_omega.z - state.omega.z * i_omega.y)) / i.x,
        (torque_body.y - (state.omega.z * i_omega.x - state.omega.x * i_omega.z)) / i.y,
        (torque_body.z - (state.omega.x * i_omega.y - state.omega.y * i_omega.x)) / i.z,
    );

    // --- Quaternion kinematics: dq/dt = 0.5 * q * omega_quat ---
    let omega_quat = Quaternion::new(0.0, state.omega.x, state.omega.y, state.omega.z);
    let dquat = state.quat.quaternion() * omega_quat * 0.5;

    Deriv {
        dpos: state.vel,
        dvel: accel,
        dquat,
        domega,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
