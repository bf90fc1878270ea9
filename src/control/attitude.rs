use nalgebra::{Unit, UnitQuaternion, Vector3};

use super::axis::{select_control_axis, ControlAxis, VesselFrame};
use super::pid::{Pid, PidConfig, PidGains};

// ---------------------------------------------------------------------------
// Attitude/velocity controller: three PID channels vectoring one engine
// ---------------------------------------------------------------------------

// Fixed per-channel scaling. The dividers keep user gains on the 0-5 scale.
const ROT_DIVIDER: f64 = 20.0;
const ROT_INTEGRAL_LIMIT: f64 = 4.0;
const ROT_DERIVATIVE_LIMIT: f64 = 3.0;
const ROT_OUTPUT_CLAMP: f64 = 2.0;
const ROT_SCALE: f64 = 0.2;
// Cancellation has no target overshoot to offset, so it gets gentler
// authority than command mode.
const ROT_CANCEL_SCALE: f64 = 0.5;

const LIN_DIVIDER: f64 = 6.5;
const LIN_INTEGRAL_LIMIT: f64 = 4.0;
const LIN_DERIVATIVE_LIMIT: f64 = 3.0;
const LIN_OUTPUT_CLAMP: f64 = 1.0;

/// Attitude slack beyond `max_angle` before the controller declares the
/// thrust geometry unrecoverable and goes inert, rad.
const STALL_TOLERANCE: f64 = std::f64::consts::FRAC_PI_3;

const EPS: f64 = 1e-9;

/// Raw pilot (or AI) commands for one tick. Stick axes are in [-1, 1].
#[derive(Debug, Clone, Copy, Default)]
pub struct PilotInput {
    /// Rotation about the primary axis.
    pub steer: f64,
    /// Forward/back translation.
    pub accel: f64,
    /// Lateral translation.
    pub drift: f64,
    /// Trim input feeding the hover target height.
    pub height_trim: f64,
    /// Forces every channel into cancellation and targets a full stop.
    pub brake: bool,
    /// Hover system master switch.
    pub hover: bool,
}

/// Geometry constants and gains for one engine's attitude loop.
#[derive(Debug, Clone, Copy)]
pub struct AttitudeConfig {
    /// Tilt authority per unit of combined channel output, rad.
    pub control_angle: f64,
    /// Hard limit on gimbal deviation from neutral, rad.
    pub max_angle: f64,
    /// Gimbal slew rate, rad/s.
    pub gimbal_rate: f64,
    /// Translation speed at full stick, m/s.
    pub max_speed: f64,
    /// Rotation rate at full stick, rad/s.
    pub max_turn_rate: f64,
    pub rotation_gains: PidGains,
    pub drift_gains: PidGains,
    pub speed_gains: PidGains,
}

impl Default for AttitudeConfig {
    fn default() -> Self {
        Self {
            control_angle: 0.35,
            max_angle: 0.45,
            gimbal_rate: 1.5,
            max_speed: 12.0,
            max_turn_rate: 0.5,
            rotation_gains: PidGains::new(4.0, 2.0, 0.5),
            drift_gains: PidGains::new(2.0, 0.4, 0.8),
            speed_gains: PidGains::new(2.0, 0.4, 0.8),
        }
    }
}

/// Vessel state sensed once per tick, handed to every engine's loop.
#[derive(Debug, Clone, Copy)]
pub struct VesselSensors {
    /// Body-to-world rotation.
    pub attitude: UnitQuaternion<f64>,
    /// Angular velocity, body frame, rad/s.
    pub angular_velocity: Vector3<f64>,
    /// Linear velocity, world frame, m/s.
    pub velocity: Vector3<f64>,
    /// Center of mass, world frame.
    pub position: Vector3<f64>,
    /// Unit vector toward the gravity body, world frame.
    pub down: Vector3<f64>,
    /// Whether the engine is actively producing thrust.
    pub thrusting: bool,
}

/// Closed-loop thrust vectoring for a single engine.
///
/// Derives a target gimbal orientation from stick input (or from
/// rate-cancellation feedback when the stick is neutral), slews toward it
/// and clamps the result to the gimbal cone. Inert whenever the engine is
/// not thrusting or the craft is tipped beyond recovery; inert ticks hold
/// the last pose and step no PID.
#[derive(Debug, Clone)]
pub struct AttitudeController {
    config: AttitudeConfig,
    thrust_axis: Vector3<f64>,
    mount_pos: Vector3<f64>,
    axis: ControlAxis,
    inverted: bool,
    rotation: Pid,
    drift: Pid,
    speed: Pid,
    gimbal: UnitQuaternion<f64>,
    active: bool,
}

impl AttitudeController {
    /// `thrust_axis` is the neutral exhaust direction and `mount_pos` the
    /// thrust point, both in the body frame relative to the center of mass.
    pub fn new(config: AttitudeConfig, thrust_axis: Vector3<f64>, mount_pos: Vector3<f64>) -> Self {
        let thrust_axis = thrust_axis.normalize();
        let (axis, inverted) = select_control_axis(&thrust_axis, &VesselFrame::body());
        Self {
            rotation: Pid::new(PidConfig::symmetric(
                config.rotation_gains,
                ROT_DIVIDER,
                ROT_INTEGRAL_LIMIT,
                ROT_DERIVATIVE_LIMIT,
                ROT_OUTPUT_CLAMP,
            )),
            drift: Pid::new(PidConfig::symmetric(
                config.drift_gains,
                LIN_DIVIDER,
                LIN_INTEGRAL_LIMIT,
                LIN_DERIVATIVE_LIMIT,
                LIN_OUTPUT_CLAMP,
            )),
            speed: Pid::new(PidConfig::symmetric(
                config.speed_gains,
                LIN_DIVIDER,
                LIN_INTEGRAL_LIMIT,
                LIN_DERIVATIVE_LIMIT,
                LIN_OUTPUT_CLAMP,
            )),
            config,
            thrust_axis,
            mount_pos,
            axis,
            inverted,
            gimbal: UnitQuaternion::identity(),
            active: false,
        }
    }

    pub fn gimbal(&self) -> UnitQuaternion<f64> {
        self.gimbal
    }

    pub fn control_axis(&self) -> (ControlAxis, bool) {
        (self.axis, self.inverted)
    }

    /// Re-point the controller at a new reference geometry. A change of
    /// primary axis changes what the rotation channel measures, so that
    /// channel resets.
    pub fn set_reference(&mut self, thrust_axis: Vector3<f64>, mount_pos: Vector3<f64>) {
        self.thrust_axis = thrust_axis.normalize();
        self.mount_pos = mount_pos;
        let (axis, inverted) = select_control_axis(&self.thrust_axis, &VesselFrame::body());
        if (axis, inverted) != (self.axis, self.inverted) {
            self.axis = axis;
            self.inverted = inverted;
            self.rotation.reset();
        }
    }

    /// Zero all channel accumulators. The gimbal pose is mechanical state
    /// and stays where it is.
    pub fn reset(&mut self) {
        self.rotation.reset();
        self.drift.reset();
        self.speed.reset();
        self.active = false;
    }

    /// Advance the loop by one tick and return the gimbal orientation as a
    /// body-frame rotation from the neutral mount.
    pub fn update(
        &mut self,
        pilot: &PilotInput,
        sensors: &VesselSensors,
        dt: f64,
    ) -> UnitQuaternion<f64> {
        let reference_forward = sensors.attitude * self.thrust_axis;
        let down_angle = reference_forward
            .dot(&sensors.down)
            .clamp(-1.0, 1.0)
            .acos();

        // Stall gating: no thrust, or the thrust vector physically cannot
        // reach a useful hover attitude. Hold the pose, step nothing.
        if !sensors.thrusting || down_angle > STALL_TOLERANCE + self.config.max_angle {
            if self.active {
                self.reset();
            }
            return self.gimbal;
        }
        self.active = true;

        // Combined translation input never exceeds unit magnitude.
        let accel_raw = pilot.accel.clamp(-1.0, 1.0);
        let drift_raw = pilot.drift.clamp(-1.0, 1.0);
        let scale = 1.0 / 1.0_f64.max((accel_raw * accel_raw + drift_raw * drift_raw).sqrt());
        let accel_cmd = accel_raw * scale;
        let drift_cmd = drift_raw * scale;
        let steer_cmd = pilot.steer.clamp(-1.0, 1.0);

        let frame = VesselFrame::from_attitude(&sensors.attitude);
        let primary = frame.direction(self.axis, self.inverted);
        let (fwd_id, lat_id) = self.axis.others();
        let fwd_dir = frame.direction(fwd_id, false);
        let lat_dir = frame.direction(lat_id, false);

        let omega_world = sensors.attitude * sensors.angular_velocity;
        let turn_rate = omega_world.dot(&primary);
        let fwd_speed = sensors.velocity.dot(&fwd_dir);
        let lat_speed = sensors.velocity.dot(&lat_dir);

        // Each channel runs exactly one of command / cancellation per tick.
        let steer_out = if !pilot.brake && steer_cmd != 0.0 && self.config.max_turn_rate > 0.0 {
            let error = steer_cmd * self.config.max_turn_rate - turn_rate;
            self.rotation.step(error, dt) * ROT_SCALE
        } else {
            self.rotation.step(-turn_rate, dt) * ROT_SCALE * ROT_CANCEL_SCALE
        };
        let accel_out = if !pilot.brake && accel_cmd != 0.0 && self.config.max_speed > 0.0 {
            let error = accel_cmd * self.config.max_speed - fwd_speed;
            self.speed.step(error, dt)
        } else {
            // Braking targets a full stop on the forward channel too.
            self.speed.step(-fwd_speed, dt)
        };
        let drift_out = if !pilot.brake && drift_cmd != 0.0 && self.config.max_speed > 0.0 {
            let error = drift_cmd * self.config.max_speed - lat_speed;
            self.drift.step(error, dt)
        } else {
            self.drift.step(-lat_speed, dt)
        };

        // Target exhaust direction: start pointing at the ground, tilt for
        // translation, then twist about the moment arm for rotation.
        let mut target = sensors.down;
        let tilt_mag = (accel_out.abs() + drift_out.abs()).min(1.0);
        let tilt_dir = fwd_dir * accel_out + lat_dir * drift_out;
        if tilt_mag > EPS {
            if let Some(tilt_axis) = Unit::try_new(tilt_dir.cross(&sensors.down), EPS) {
                target = UnitQuaternion::from_axis_angle(
                    &tilt_axis,
                    self.config.control_angle * tilt_mag,
                ) * target;
            }
        }

        // Moment arm: thrust point relative to the center of mass, projected
        // onto the plane perpendicular to the primary axis. The sign makes a
        // positive steer output raise the measured rate about that axis.
        let arm = sensors.attitude * self.mount_pos;
        let arm_perp = arm - primary * arm.dot(&primary);
        if steer_out.abs() > EPS && arm_perp.norm_squared() > EPS {
            let steer_axis = Unit::new_normalize(arm_perp);
            target = UnitQuaternion::from_axis_angle(
                &steer_axis,
                self.config.control_angle * steer_out,
            ) * target;
        }

        // Slew toward the commanded orientation, then clamp to the cone.
        let target_body = sensors.attitude.inverse_transform_vector(&target);
        let commanded = UnitQuaternion::rotation_between(&self.thrust_axis, &target_body)
            .unwrap_or(self.gimbal);

        let delta = self.gimbal.angle_to(&commanded);
        let step = self.config.gimbal_rate * dt.max(0.0);
        self.gimbal = if delta <= step || delta < EPS {
            commanded
        } else {
            self.gimbal.slerp(&commanded, step / delta)
        };
        if self.gimbal.angle() > self.config.max_angle {
            if let Some(axis) = self.gimbal.axis() {
                self.gimbal = UnitQuaternion::from_axis_angle(&axis, self.config.max_angle);
            }
        }
        self.gimbal
    }
}
