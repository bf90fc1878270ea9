// ---------------------------------------------------------------------------
// PID primitive (single channel, clamped integral and derivative)
// ---------------------------------------------------------------------------

/// User-facing PID gains, expected in a 0-5 range.
///
/// Each channel pairs its gains with a fixed `divider` (see [`PidConfig`])
/// so the same slider scale works for channels with very different physical
/// units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl PidGains {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }
}

/// Full per-channel tuning: gains plus the fixed scaling and limits.
///
/// Integral and output limits are asymmetric-capable (the height channel
/// floors its integral at -3 while allowing +10, and its output at 0).
#[derive(Debug, Clone, Copy)]
pub struct PidConfig {
    pub gains: PidGains,
    pub divider: f64,
    pub integral_min: f64,
    pub integral_max: f64,
    pub derivative_limit: f64,
    pub output_min: f64,
    pub output_max: f64,
}

impl PidConfig {
    /// Symmetric limits, the common case for the attitude channels.
    pub fn symmetric(
        gains: PidGains,
        divider: f64,
        integral_limit: f64,
        derivative_limit: f64,
        output_limit: f64,
    ) -> Self {
        Self {
            gains,
            divider,
            integral_min: -integral_limit,
            integral_max: integral_limit,
            derivative_limit,
            output_min: -output_limit,
            output_max: output_limit,
        }
    }
}

/// One discrete PID channel.
///
/// Pure accumulator: owns no state beyond the running integral and the
/// previous error, and is advanced only by explicit `step` calls.
#[derive(Debug, Clone)]
pub struct Pid {
    config: PidConfig,
    integral: f64,
    prev_error: f64,
}

impl Pid {
    pub fn new(config: PidConfig) -> Self {
        Self {
            config,
            integral: 0.0,
            prev_error: 0.0,
        }
    }

    /// Advance the channel by one tick and return the clamped output.
    ///
    /// A non-positive `dt` is treated as a zero-length step: no integral
    /// accumulation, no derivative contribution, and the derivative
    /// baseline is left untouched.
    pub fn step(&mut self, error: f64, dt: f64) -> f64 {
        let c = &self.config;
        let p = c.gains.kp * error / c.divider;

        let mut d = 0.0;
        if dt > 0.0 {
            self.integral = (self.integral + error * dt).clamp(c.integral_min, c.integral_max);
            let derivative = ((error - self.prev_error) / dt)
                .clamp(-c.derivative_limit, c.derivative_limit);
            d = c.gains.kd * derivative / c.divider;
            self.prev_error = error;
        }
        let i = c.gains.ki * self.integral / c.divider;

        (p + i + d).clamp(c.output_min, c.output_max)
    }

    /// Zero the accumulators. Required when the channel is disabled or its
    /// controlled axis changes meaning.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_error = 0.0;
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    pub fn config(&self) -> &PidConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(kp: f64, ki: f64, kd: f64) -> Pid {
        Pid::new(PidConfig::symmetric(
            PidGains::new(kp, ki, kd),
            1.0,
            10.0,
            100.0,
            100.0,
        ))
    }

    #[test]
    fn proportional_only() {
        let mut pid = plain(1.0, 0.0, 0.0);
        let out = pid.step(0.5, 0.01);
        assert!((out - 0.5).abs() < 1e-10, "Pure P should output kp * error");
    }

    #[test]
    fn integral_accumulates() {
        let mut pid = plain(0.0, 1.0, 0.0);
        pid.step(1.0, 0.1);
        let out = pid.step(1.0, 0.1);
        assert!((out - 0.2).abs() < 1e-10, "Integral should accumulate, got {}", out);
    }

    #[test]
    fn integral_stays_clamped() {
        let mut pid = Pid::new(PidConfig::symmetric(
            PidGains::new(0.0, 1.0, 0.0),
            1.0,
            2.0,
            100.0,
            100.0,
        ));
        for _ in 0..100 {
            pid.step(50.0, 1.0);
            assert!(
                pid.integral() <= 2.0 && pid.integral() >= -2.0,
                "Integral escaped clamp: {}",
                pid.integral()
            );
        }
        for _ in 0..100 {
            pid.step(-50.0, 1.0);
            assert!(pid.integral() >= -2.0, "Integral escaped floor: {}", pid.integral());
        }
    }

    #[test]
    fn asymmetric_integral_floor() {
        let mut pid = Pid::new(PidConfig {
            gains: PidGains::new(0.0, 1.0, 0.0),
            divider: 1.0,
            integral_min: -3.0,
            integral_max: 10.0,
            derivative_limit: 100.0,
            output_min: -100.0,
            output_max: 100.0,
        });
        for _ in 0..50 {
            pid.step(-1.0, 1.0);
        }
        assert!((pid.integral() + 3.0).abs() < 1e-10, "Floor should be -3, got {}", pid.integral());
        for _ in 0..50 {
            pid.step(1.0, 1.0);
        }
        assert!((pid.integral() - 10.0).abs() < 1e-10, "Cap should be +10, got {}", pid.integral());
    }

    #[test]
    fn derivative_is_clamped() {
        let mut pid = Pid::new(PidConfig::symmetric(
            PidGains::new(0.0, 0.0, 1.0),
            1.0,
            10.0,
            3.0,
            100.0,
        ));
        // Error jumps by 100 in one 1 s step: raw derivative 100, clamped to 3.
        pid.step(0.0, 1.0);
        let out = pid.step(100.0, 1.0);
        assert!((out - 3.0).abs() < 1e-10, "Derivative should clamp to 3, got {}", out);
    }

    #[test]
    fn zero_dt_is_a_zero_length_step() {
        let mut pid = plain(1.0, 1.0, 1.0);
        pid.step(2.0, 1.0);
        let integral_before = pid.integral();
        let out = pid.step(5.0, 0.0);
        assert!(
            (pid.integral() - integral_before).abs() < 1e-12,
            "dt=0 must not accumulate integral"
        );
        // P term plus held integral only; no derivative spike.
        assert!((out - (5.0 + integral_before)).abs() < 1e-10, "got {}", out);
    }

    #[test]
    fn zero_error_history_has_zero_p_and_d() {
        let mut pid = plain(2.0, 3.0, 4.0);
        for _ in 0..10 {
            let out = pid.step(0.0, 0.1);
            assert!(out.abs() < 1e-12, "Zero error history must give zero output");
        }
    }

    #[test]
    fn constant_error_sequence_scaled_by_divider() {
        // kp=1, ki=0, kd=0, divider=10, errors [5, 5, 5] at dt=1.
        let mut pid = Pid::new(PidConfig {
            gains: PidGains::new(1.0, 0.0, 0.0),
            divider: 10.0,
            integral_min: -10.0,
            integral_max: 10.0,
            derivative_limit: 3.0,
            output_min: 0.0,
            output_max: 1.0,
        });
        for _ in 0..3 {
            let out = pid.step(5.0, 1.0);
            assert!((out - 0.5).abs() < 1e-10, "Expected 0.5, got {}", out);
        }
    }

    #[test]
    fn output_floor_applies() {
        let mut pid = Pid::new(PidConfig {
            gains: PidGains::new(1.0, 0.0, 0.0),
            divider: 1.0,
            integral_min: -10.0,
            integral_max: 10.0,
            derivative_limit: 100.0,
            output_min: 0.0,
            output_max: 1.0,
        });
        let out = pid.step(-5.0, 1.0);
        assert_eq!(out, 0.0, "Negative demand must clamp to the 0 floor");
    }

    #[test]
    fn reset_clears_accumulators() {
        let mut pid = plain(1.0, 1.0, 1.0);
        pid.step(3.0, 1.0);
        pid.reset();
        assert_eq!(pid.integral(), 0.0);
        let out = pid.step(0.0, 1.0);
        assert!(out.abs() < 1e-12, "Reset channel with zero error must output zero");
    }
}
