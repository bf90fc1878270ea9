use nalgebra::{UnitQuaternion, Vector3};

// ---------------------------------------------------------------------------
// Control axis selection: nearest principal direction to a reference vector
// ---------------------------------------------------------------------------

/// Vessel-local principal axis an engine gimbal is deemed to control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAxis {
    Forward,
    Right,
    Up,
}

impl ControlAxis {
    /// The two non-primary axes as (forward-like, lateral-like).
    /// Acceleration input maps onto the first, drift input onto the second.
    pub fn others(self) -> (ControlAxis, ControlAxis) {
        match self {
            ControlAxis::Up => (ControlAxis::Forward, ControlAxis::Right),
            ControlAxis::Forward => (ControlAxis::Up, ControlAxis::Right),
            ControlAxis::Right => (ControlAxis::Forward, ControlAxis::Up),
        }
    }
}

/// Vessel principal directions as unit vectors in some common frame.
///
/// Body convention: +X forward, +Y left, +Z up (right-handed), so the right
/// direction is -Y.
#[derive(Debug, Clone, Copy)]
pub struct VesselFrame {
    pub forward: Vector3<f64>,
    pub right: Vector3<f64>,
    pub up: Vector3<f64>,
}

impl VesselFrame {
    /// The canonical body frame (identity attitude).
    pub fn body() -> Self {
        Self {
            forward: Vector3::x(),
            right: -Vector3::y(),
            up: Vector3::z(),
        }
    }

    /// Principal directions in the world frame for a given attitude.
    pub fn from_attitude(quat: &UnitQuaternion<f64>) -> Self {
        Self {
            forward: quat * Vector3::x(),
            right: quat * -Vector3::y(),
            up: quat * Vector3::z(),
        }
    }

    /// Signed direction for an axis choice.
    pub fn direction(&self, axis: ControlAxis, inverted: bool) -> Vector3<f64> {
        let d = match axis {
            ControlAxis::Forward => self.forward,
            ControlAxis::Right => self.right,
            ControlAxis::Up => self.up,
        };
        if inverted {
            -d
        } else {
            d
        }
    }
}

/// Pick the vessel principal direction closest to `reference_forward` by
/// angle, over all six signed candidates. Lets the same controller drive
/// engines mounted in arbitrary orientations without per-part axis wiring.
///
/// Run once per reference change, not per tick; a change of selection must
/// reset the rotation channel.
pub fn select_control_axis(
    reference_forward: &Vector3<f64>,
    frame: &VesselFrame,
) -> (ControlAxis, bool) {
    let reference = reference_forward.normalize();
    let candidates = [
        (ControlAxis::Forward, false),
        (ControlAxis::Forward, true),
        (ControlAxis::Right, false),
        (ControlAxis::Right, true),
        (ControlAxis::Up, false),
        (ControlAxis::Up, true),
    ];

    let mut best = (ControlAxis::Up, false);
    let mut best_dot = f64::NEG_INFINITY;
    for (axis, inverted) in candidates {
        let dot = reference.dot(&frame.direction(axis, inverted));
        if dot > best_dot {
            best_dot = dot;
            best = (axis, inverted);
        }
    }
    best
}
