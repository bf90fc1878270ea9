use nalgebra::Vector3;

use super::altimetry::{resolve_height, DownRay, HeightMode};
use super::pid::{Pid, PidConfig, PidGains};

// ---------------------------------------------------------------------------
// Height-hold controller: PID over thrust fraction
// ---------------------------------------------------------------------------

/// Stick-to-target integration rate, m/s per unit input. Empirical constant
/// carried over from the reference craft tuning, not derived.
pub const HEIGHT_TRIM_RATE: f64 = 2.0;

const DIVIDER: f64 = 10.0;
const INTEGRAL_MIN: f64 = -3.0;
const INTEGRAL_MAX: f64 = 10.0;
const DERIVATIVE_LIMIT: f64 = 3.0;

fn height_pid(gains: PidGains) -> Pid {
    Pid::new(PidConfig {
        gains,
        divider: DIVIDER,
        integral_min: INTEGRAL_MIN,
        integral_max: INTEGRAL_MAX,
        derivative_limit: DERIVATIVE_LIMIT,
        output_min: 0.0,
        output_max: 1.0,
    })
}

/// Per-engine height-hold loop.
///
/// Outputs a throttle fraction in [0, 1]. Until a target has been captured
/// (`height_locked`) the contribution is zero; an invalid reading freezes
/// the previous output for that tick instead of propagating NaN into the
/// accumulators.
#[derive(Debug, Clone)]
pub struct HeightController {
    pid: Pid,
    mode: HeightMode,
    hover_enabled: bool,
    height_locked: bool,
    target_height: f64,
    min_height: f64,
    max_height: f64,
    height_offset: f64,
    max_hover_height: f64,
    last_output: f64,
}

impl HeightController {
    pub fn new(
        gains: PidGains,
        min_height: f64,
        max_height: f64,
        height_offset: f64,
        max_hover_height: f64,
    ) -> Self {
        Self {
            pid: height_pid(gains),
            mode: HeightMode::TerrainFollow,
            hover_enabled: false,
            height_locked: false,
            target_height: 0.0,
            min_height,
            max_height,
            height_offset,
            max_hover_height,
            last_output: 0.0,
        }
    }

    pub fn hover_enabled(&self) -> bool {
        self.hover_enabled
    }

    pub fn height_locked(&self) -> bool {
        self.height_locked
    }

    pub fn target_height(&self) -> f64 {
        self.target_height
    }

    pub fn mode(&self) -> HeightMode {
        self.mode
    }

    /// Enable or disable hovering. Disabling synchronously zeroes the PID
    /// accumulators so stale windup cannot reappear on re-enable.
    pub fn set_hover(&mut self, on: bool) {
        if on == self.hover_enabled {
            return;
        }
        self.hover_enabled = on;
        if !on {
            self.pid.reset();
            self.height_locked = false;
            self.last_output = 0.0;
        }
    }

    /// Switch between terrain-follow and absolute-altitude regulation.
    /// The controlled quantity changes meaning, so the loop re-captures.
    pub fn set_mode(&mut self, mode: HeightMode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        self.pid.reset();
        self.height_locked = false;
    }

    /// Set the target directly (external command). Clamped to the hover
    /// band in terrain mode; absolute mode is unclamped.
    pub fn set_target_height(&mut self, target: f64) {
        self.target_height = self.clamp_target(target);
        self.height_locked = true;
    }

    /// Integrate a [-1, 1] trim input into the target height.
    pub fn trim_target(&mut self, input: f64, dt: f64) {
        if !self.height_locked || input == 0.0 || dt <= 0.0 {
            return;
        }
        let input = input.clamp(-1.0, 1.0);
        self.target_height = self.clamp_target(self.target_height + input * HEIGHT_TRIM_RATE * dt);
    }

    /// Phase 1 of the control tick: resolve this engine's height reading.
    /// NaN when no valid reading exists.
    pub fn sense(
        &self,
        origin: &Vector3<f64>,
        altitude: f64,
        has_ocean: bool,
        ray: &dyn DownRay,
    ) -> f64 {
        resolve_height(
            self.mode,
            origin,
            altitude,
            has_ocean,
            self.max_hover_height,
            ray,
        )
    }

    /// Phase 3 of the control tick: step the PID against the fused reading
    /// and the fleet leveling correction. Returns the throttle fraction.
    pub fn update(&mut self, height: f64, correction: f64, dt: f64) -> f64 {
        if !self.hover_enabled {
            return 0.0;
        }
        if height.is_nan() {
            // Invalid sensor reading: hold the last command.
            return self.last_output;
        }
        if !self.height_locked {
            // First valid reading after enabling captures the target.
            self.target_height = self.clamp_target(height);
            self.height_locked = true;
        }
        // The leveling correction only makes sense against a shared terrain
        // reference; absolute mode ignores it.
        let correction = match self.mode {
            HeightMode::TerrainFollow => correction,
            HeightMode::AbsoluteAltitude => 0.0,
        };
        let error = self.target_height - height + self.height_offset - correction;
        self.last_output = self.pid.step(error, dt);
        self.last_output
    }

    fn clamp_target(&self, target: f64) -> f64 {
        match self.mode {
            HeightMode::TerrainFollow => target.clamp(self.min_height, self.max_height),
            HeightMode::AbsoluteAltitude => target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> HeightController {
        let mut c = HeightController::new(PidGains::new(1.0, 0.0, 0.0), 1.0, 40.0, 0.0, 30.0);
        c.set_hover(true);
        c
    }

    #[test]
    fn unlocked_contributes_nothing() {
        let mut c = controller();
        assert!(!c.height_locked());
        // NaN reading: never locks, never thrusts.
        assert_eq!(c.update(f64::NAN, 0.0, 0.02), 0.0);
        assert!(!c.height_locked());
    }

    #[test]
    fn disabled_outputs_zero() {
        let mut c = controller();
        c.set_hover(false);
        assert_eq!(c.update(10.0, 0.0, 0.02), 0.0);
    }

    #[test]
    fn first_reading_captures_target() {
        let mut c = controller();
        c.update(12.5, 0.0, 0.02);
        assert!(c.height_locked());
        assert!((c.target_height() - 12.5).abs() < 1e-12);
    }

    #[test]
    fn capture_clamps_to_hover_band() {
        let mut c = controller();
        c.update(55.0, 0.0, 0.02);
        assert_eq!(c.target_height(), 40.0, "Capture must clamp to max_height");
    }

    #[test]
    fn below_target_throttles_up_above_target_floors_at_zero() {
        let mut c = controller();
        c.set_target_height(50.0);
        let low = c.update(40.0, 0.0, 1.0);
        assert!(low > 0.0, "10 m below target must demand thrust, got {}", low);

        let mut c = controller();
        c.set_target_height(50.0);
        let high = c.update(60.0, 0.0, 1.0);
        assert_eq!(high, 0.0, "Above target the throttle clamps to the 0 floor");
    }

    #[test]
    fn invalid_reading_freezes_output() {
        let mut c = controller();
        c.set_target_height(20.0);
        let before = c.update(10.0, 0.0, 1.0);
        assert!(before > 0.0);
        let frozen = c.update(f64::NAN, 0.0, 1.0);
        assert_eq!(frozen, before, "NaN reading must freeze the last output");
    }

    #[test]
    fn disable_resets_windup() {
        let mut c = HeightController::new(PidGains::new(0.0, 5.0, 0.0), 1.0, 40.0, 0.0, 30.0);
        c.set_hover(true);
        c.set_target_height(30.0);
        for _ in 0..20 {
            c.update(10.0, 0.0, 1.0);
        }
        c.set_hover(false);
        c.set_hover(true);
        c.set_target_height(10.0);
        let out = c.update(10.0, 0.0, 1.0);
        assert!(out.abs() < 1e-12, "Stale integral must not survive a hover toggle, got {}", out);
    }

    #[test]
    fn correction_ignored_in_absolute_mode() {
        // A negative correction raises the terrain-mode error.
        let mut terrain = controller();
        terrain.set_target_height(20.0);
        let with_corr = terrain.update(20.0, -5.0, 1.0);
        assert!((with_corr - 0.5).abs() < 1e-10, "Terrain mode applies the correction, got {}", with_corr);

        let mut absolute = controller();
        absolute.set_mode(HeightMode::AbsoluteAltitude);
        absolute.set_target_height(20.0);
        let without = absolute.update(20.0, -5.0, 1.0);
        assert_eq!(without, 0.0, "Absolute mode ignores the correction entirely");
    }

    #[test]
    fn absolute_mode_target_is_unclamped() {
        let mut c = controller();
        c.set_mode(HeightMode::AbsoluteAltitude);
        c.set_target_height(250.0);
        assert_eq!(c.target_height(), 250.0, "Absolute targets ignore the hover band");
    }

    #[test]
    fn trim_integrates_and_clamps() {
        let mut c = controller();
        c.set_target_height(39.5);
        c.trim_target(1.0, 1.0);
        assert_eq!(c.target_height(), 40.0, "Trim must clamp to max_height");
        c.trim_target(-1.0, 0.5);
        assert!((c.target_height() - 39.0).abs() < 1e-12, "0.5 s at -1 trims 1 m down");
    }
}
