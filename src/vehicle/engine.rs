use nalgebra::Vector3;

use crate::control::attitude::AttitudeConfig;
use crate::control::pid::PidGains;

// ---------------------------------------------------------------------------
// Hover engine definition (one thrust unit of a hover craft)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct HoverEngine {
    pub name: String,
    /// Thrust point in the body frame, relative to the center of mass, m.
    pub mount_pos: Vector3<f64>,
    /// Neutral exhaust direction, body frame unit vector.
    pub thrust_axis: Vector3<f64>,
    pub max_thrust: f64, // N
    /// Hover ceiling for terrain-follow mode, m. Also bounds the height
    /// sensor range.
    pub max_hover_height: f64,
    pub min_height: f64,
    pub max_height: f64,
    /// Static per-engine height trim, m.
    pub height_offset: f64,
    pub height_gains: PidGains,
    pub attitude: AttitudeConfig,
}

// ---------------------------------------------------------------------------
// Engine builder
// ---------------------------------------------------------------------------

pub struct EngineBuilder {
    name: String,
    mount_pos: Vector3<f64>,
    thrust_axis: Vector3<f64>,
    max_thrust: f64,
    max_hover_height: f64,
    min_height: f64,
    max_height: f64,
    height_offset: f64,
    height_gains: PidGains,
    attitude: AttitudeConfig,
}

impl EngineBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mount_pos: Vector3::zeros(),
            thrust_axis: -Vector3::z(),
            max_thrust: 7_500.0,
            max_hover_height: 30.0,
            min_height: 1.0,
            max_height: 30.0,
            height_offset: 0.0,
            height_gains: PidGains::new(2.0, 0.8, 3.0),
            attitude: AttitudeConfig::default(),
        }
    }

    pub fn mount_pos(mut self, v: Vector3<f64>) -> Self { self.mount_pos = v; self }
    pub fn thrust_axis(mut self, v: Vector3<f64>) -> Self { self.thrust_axis = v; self }
    pub fn max_thrust(mut self, v: f64) -> Self { self.max_thrust = v; self }
    pub fn max_hover_height(mut self, v: f64) -> Self { self.max_hover_height = v; self }
    pub fn min_height(mut self, v: f64) -> Self { self.min_height = v; self }
    pub fn max_height(mut self, v: f64) -> Self { self.max_height = v; self }
    pub fn height_offset(mut self, v: f64) -> Self { self.height_offset = v; self }
    pub fn height_gains(mut self, v: PidGains) -> Self { self.height_gains = v; self }
    pub fn attitude(mut self, v: AttitudeConfig) -> Self { self.attitude = v; self }

    pub fn build(self) -> HoverEngine {
        HoverEngine {
            name: self.name,
            mount_pos: self.mount_pos,
            thrust_axis: self.thrust_axis.normalize(),
            max_thrust: self.max_thrust,
            max_hover_height: self.max_hover_height,
            min_height: self.min_height,
            max_height: self.max_height,
            height_offset: self.height_offset,
            height_gains: self.height_gains,
            attitude: self.attitude,
        }
    }
}
