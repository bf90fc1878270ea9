use nalgebra::{Quaternion, UnitQuaternion, Vector3};

// ---------------------------------------------------------------------------
// Rigid-body state: position, velocity, attitude, angular rate
// ---------------------------------------------------------------------------

/// Full vessel state at one point in time.
/// Frame: flat East-North-Up world, datum (sea level) at z = 0.
/// Body convention: +X forward, +Y left, +Z up; origin at the center of mass.
#[derive(Debug, Clone)]
pub struct State {
    pub time: f64,
    pub pos: Vector3<f64>,         // m, world
    pub vel: Vector3<f64>,         // m/s, world
    pub quat: UnitQuaternion<f64>, // body to world rotation
    pub omega: Vector3<f64>,       // rad/s, body frame
}

impl State {
    /// A vessel at rest at `pos`, level and pointing along +X.
    pub fn at_rest(pos: Vector3<f64>) -> Self {
        Self {
            time: 0.0,
            pos,
            vel: Vector3::zeros(),
            quat: UnitQuaternion::identity(),
            omega: Vector3::zeros(),
        }
    }

    /// Advance state by a derivative scaled by dt (used inside RK4).
    pub fn apply(&self, d: &Deriv, dt: f64) -> State {
        // Quaternion integration: q_new = normalize(q + dq * dt)
        let q_raw = self.quat.quaternion() + d.dquat * dt;
        State {
            time: self.time + dt,
            pos: self.pos + d.dpos * dt,
            vel: self.vel + d.dvel * dt,
            quat: UnitQuaternion::new_normalize(q_raw),
            omega: self.omega + d.domega * dt,
        }
    }

    /// Altitude above the datum, m.
    pub fn altitude(&self) -> f64 {
        self.pos.z
    }

    /// Tilt from level, rad. Zero when the body up axis matches world up.
    pub fn tilt(&self) -> f64 {
        let body_up = self.quat * Vector3::z();
        body_up.z.clamp(-1.0, 1.0).acos()
    }

    /// Ground speed (horizontal velocity magnitude), m/s.
    pub fn ground_speed(&self) -> f64 {
        (self.vel.x * self.vel.x + self.vel.y * self.vel.y).sqrt()
    }
}

// ---------------------------------------------------------------------------
// State derivative
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Deriv {
    pub dpos: Vector3<f64>,
    pub dvel: Vector3<f64>,
    pub dquat: Quaternion<f64>, // NOT unit, raw quaternion derivative
    pub domega: Vector3<f64>,   // angular acceleration, body frame
}

// ---------------------------------------------------------------------------
// Per-engine command output
// ---------------------------------------------------------------------------

/// What the control core hands back to the host each tick, per engine.
#[derive(Debug, Clone, Copy)]
pub struct EngineCommand {
    /// Thrust fraction in [0, 1].
    pub throttle: f64,
    /// Gimbal orientation, body-frame rotation from the neutral mount.
    pub gimbal: UnitQuaternion<f64>,
}

impl Default for EngineCommand {
    fn default() -> Self {
        Self {
            throttle: 0.0,
            gimbal: UnitQuaternion::identity(),
        }
    }
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub dt: f64,
    pub max_time: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.02,        // 50 Hz fixed physics step
            max_time: 120.0, // 2 min ceiling
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilt_zero_when_level() {
        let s = State::at_rest(Vector3::new(0.0, 0.0, 5.0));
        assert!(s.tilt().abs() < 1e-12);
    }

    #[test]
    fn tilt_measures_roll() {
        let mut s = State::at_rest(Vector3::zeros());
        s.quat = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.3);
        assert!((s.tilt() - 0.3).abs() < 1e-9, "Tilt should be 0.3, got {}", s.tilt());
    }

    #[test]
    fn apply_integrates_linearly() {
        let s = State::at_rest(Vector3::zeros());
        let d = Deriv {
            dpos: Vector3::new(1.0, 0.0, 2.0),
            dvel: Vector3::new(0.0, 0.0, -9.81),
            dquat: Quaternion::new(0.0, 0.0, 0.0, 0.0),
            domega: Vector3::zeros(),
        };
        let next = s.apply(&d, 0.5);
        assert!((next.pos.z - 1.0).abs() < 1e-12);
        assert!((next.vel.z + 4.905).abs() < 1e-12);
        assert!((next.time - 0.5).abs() < 1e-12);
    }
}
