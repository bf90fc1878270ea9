// ---------------------------------------------------------------------------
// Gravity body properties
// ---------------------------------------------------------------------------

/// Standard gravity, m/s^2.
pub const G0: f64 = 9.80665;

/// The body a craft operates on. Near-surface model: uniform gravity,
/// constant air density, datum (sea level) at z = 0.
#[derive(Debug, Clone)]
pub struct Body {
    pub name: String,
    pub gravity: f64,     // m/s^2
    pub air_density: f64, // kg/m^3 at the surface
    pub has_ocean: bool,
}

impl Body {
    /// Earthlike: sea-level air, global ocean below the datum.
    pub fn temperate() -> Self {
        Self {
            name: "Temperate".into(),
            gravity: 9.81,
            air_density: 1.225,
            has_ocean: true,
        }
    }

    /// Airless, dry moon. No drag, no ocean fallback for the altimeter.
    pub fn barren_moon() -> Self {
        Self {
            name: "Barren Moon".into(),
            gravity: 1.62,
            air_density: 0.0,
            has_ocean: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_distinct() {
        let t = Body::temperate();
        let m = Body::barren_moon();
        assert!(t.has_ocean && !m.has_ocean);
        assert!(t.gravity > m.gravity);
        assert_eq!(m.air_density, 0.0);
    }
}
