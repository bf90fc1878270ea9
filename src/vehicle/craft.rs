use nalgebra::Vector3;

use super::engine::{EngineBuilder, HoverEngine};

// ---------------------------------------------------------------------------
// Hover craft: rigid body plus a set of hover engines
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct HoverCraft {
    pub name: String,
    pub mass: f64,                // kg
    pub inertia: Vector3<f64>,    // [Ixx, Iyy, Izz] principal moments, kg*m^2
    pub cd: f64,                  // drag coefficient (dimensionless)
    pub area: f64,                // aerodynamic reference area, m^2
    pub angular_damping: f64,     // N*m*s/rad, passive rotational damping
    pub engines: Vec<HoverEngine>,
}

impl HoverCraft {
    /// Combined maximum thrust of all engines, N.
    pub fn total_thrust(&self) -> f64 {
        self.engines.iter().map(|e| e.max_thrust).sum()
    }

    /// Thrust-to-weight ratio for a given surface gravity.
    pub fn twr(&self, gravity: f64) -> f64 {
        self.total_thrust() / (self.mass * gravity)
    }

    /// Throttle fraction that exactly balances weight, assuming vertical
    /// thrust. The height-hold integral converges to this value in steady
    /// hover.
    pub fn hover_throttle(&self, gravity: f64) -> f64 {
        self.mass * gravity / self.total_thrust()
    }
}

// ---------------------------------------------------------------------------
// Craft builder
// ---------------------------------------------------------------------------

pub struct CraftBuilder {
    name: String,
    mass: f64,
    inertia: Vector3<f64>,
    cd: f64,
    area: f64,
    angular_damping: f64,
    engines: Vec<HoverEngine>,
}

impl CraftBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mass: 1_000.0,
            inertia: Vector3::new(800.0, 800.0, 1_200.0),
            cd: 0.8,
            area: 4.0,
            angular_damping: 400.0,
            engines: vec![],
        }
    }

    pub fn mass(mut self, v: f64) -> Self { self.mass = v; self }
    pub fn inertia(mut self, v: Vector3<f64>) -> Self { self.inertia = v; self }
    pub fn cd(mut self, v: f64) -> Self { self.cd = v; self }
    pub fn area(mut self, v: f64) -> Self { self.area = v; self }
    pub fn angular_damping(mut self, v: f64) -> Self { self.angular_damping = v; self }

    pub fn engine(mut self, engine: HoverEngine) -> Self {
        self.engines.push(engine);
        self
    }

    pub fn build(self) -> HoverCraft {
        HoverCraft {
            name: self.name,
            mass: self.mass,
            inertia: self.inertia,
            cd: self.cd,
            area: self.area,
            angular_damping: self.angular_damping,
            engines: self.engines,
        }
    }
}

// ---------------------------------------------------------------------------
// Preset craft
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// Four-engine utility skimmer ("Dunefly"). Engines on the corners of
    /// the center-of-mass plane so a uniform tilt produces no pitch moment.
    pub fn skimmer() -> HoverCraft {
        let mut builder = CraftBuilder::new("Dunefly")
            .mass(1_200.0)
            .inertia(Vector3::new(900.0, 900.0, 1_500.0))
            .cd(0.8)
            .area(4.0)
            .angular_damping(400.0);

        let corners = [
            ("fore-port", Vector3::new(1.4, 1.4, 0.0)),
            ("fore-starboard", Vector3::new(1.4, -1.4, 0.0)),
            ("aft-port", Vector3::new(-1.4, 1.4, 0.0)),
            ("aft-starboard", Vector3::new(-1.4, -1.4, 0.0)),
        ];
        for (name, pos) in corners {
            builder = builder.engine(
                EngineBuilder::new(name)
                    .mount_pos(pos)
                    .max_thrust(7_500.0)
                    .max_hover_height(30.0)
                    .build(),
            );
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skimmer_has_margin_to_hover() {
        let craft = presets::skimmer();
        assert_eq!(craft.engines.len(), 4);
        let twr = craft.twr(9.81);
        assert!(twr > 1.5, "Skimmer needs thrust margin, got TWR {}", twr);
        let h = craft.hover_throttle(9.81);
        assert!(h > 0.0 && h < 1.0, "Hover throttle must be reachable, got {}", h);
    }

    #[test]
    fn builder_accumulates_engines() {
        let craft = CraftBuilder::new("T")
            .engine(EngineBuilder::new("a").build())
            .engine(EngineBuilder::new("b").build())
            .build();
        assert_eq!(craft.engines.len(), 2);
        assert_eq!(craft.engines[0].name, "a");
    }
}
