use nalgebra::Vector3;

// ---------------------------------------------------------------------------
// Height source resolver: terrain raycast with ocean fallback
// ---------------------------------------------------------------------------

/// Extra sensing range beyond the configured hover ceiling, m.
pub const SENSOR_MARGIN: f64 = 50.0;

/// What the height-hold loop regulates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightMode {
    /// Clearance above the terrain directly below the engine.
    TerrainFollow,
    /// Altitude above the body datum (sea level), terrain ignored.
    AbsoluteAltitude,
}

/// Downward raycast primitive supplied by the environment.
///
/// Implementations decide what counts as a hit; water surfaces are expected
/// NOT to register, which is what makes the ocean fallback below meaningful.
pub trait DownRay {
    /// Cast straight down from `origin`. `Some(distance)` on a hit within
    /// `max_distance`, `None` on a miss.
    fn cast(&self, origin: &Vector3<f64>, max_distance: f64) -> Option<f64>;
}

/// Resolve the height reading for one engine. Returns NaN when no valid
/// reading exists (e.g. over a cliff beyond sensor range on an airless
/// body); callers must treat NaN as "hold, do not control".
///
/// Terrain mode over an ocean body has two special cases:
/// - a hit deeper than the raw altitude means the ray struck seafloor or a
///   noisy shoreline mesh below the water line, so the altitude wins;
/// - a miss with the altitude still in sensor range is open water, so the
///   altitude substitutes for the missing hit.
pub fn resolve_height(
    mode: HeightMode,
    origin: &Vector3<f64>,
    altitude: f64,
    has_ocean: bool,
    max_hover_height: f64,
    ray: &dyn DownRay,
) -> f64 {
    match mode {
        HeightMode::AbsoluteAltitude => altitude,
        HeightMode::TerrainFollow => {
            let range = max_hover_height + SENSOR_MARGIN;
            match ray.cast(origin, range) {
                Some(hit) => {
                    if has_ocean && altitude < hit {
                        altitude
                    } else {
                        hit
                    }
                }
                None => {
                    if has_ocean && altitude <= range {
                        altitude
                    } else {
                        f64::NAN
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed-distance ray for tests: `None` means a miss at any range.
    struct FixedRay(Option<f64>);

    impl DownRay for FixedRay {
        fn cast(&self, _origin: &Vector3<f64>, max_distance: f64) -> Option<f64> {
            self.0.filter(|d| *d <= max_distance)
        }
    }

    fn origin() -> Vector3<f64> {
        Vector3::new(0.0, 0.0, 20.0)
    }

    #[test]
    fn absolute_mode_passes_altitude_through() {
        let h = resolve_height(
            HeightMode::AbsoluteAltitude,
            &origin(),
            123.4,
            true,
            10.0,
            &FixedRay(None),
        );
        assert_eq!(h, 123.4);
    }

    #[test]
    fn terrain_hit_returns_distance() {
        let h = resolve_height(
            HeightMode::TerrainFollow,
            &origin(),
            500.0,
            false,
            30.0,
            &FixedRay(Some(12.0)),
        );
        assert_eq!(h, 12.0);
    }

    #[test]
    fn ocean_shallower_than_hit_wins() {
        // Hit at 15 m but only 9 m above sea level: craft is over water.
        let h = resolve_height(
            HeightMode::TerrainFollow,
            &origin(),
            9.0,
            true,
            30.0,
            &FixedRay(Some(15.0)),
        );
        assert_eq!(h, 9.0, "Altitude must override a deeper hit over ocean");
    }

    #[test]
    fn no_ocean_keeps_the_hit() {
        let h = resolve_height(
            HeightMode::TerrainFollow,
            &origin(),
            9.0,
            false,
            30.0,
            &FixedRay(Some(15.0)),
        );
        assert_eq!(h, 15.0);
    }

    #[test]
    fn miss_over_ocean_falls_back_to_altitude() {
        let h = resolve_height(
            HeightMode::TerrainFollow,
            &origin(),
            42.0,
            true,
            30.0,
            &FixedRay(None),
        );
        assert_eq!(h, 42.0, "Open water should substitute the altitude");
    }

    #[test]
    fn miss_over_ocean_beyond_range_is_nan() {
        // Range is 30 + 50 = 80; altitude 81 is out of sensor reach.
        let h = resolve_height(
            HeightMode::TerrainFollow,
            &origin(),
            81.0,
            true,
            30.0,
            &FixedRay(None),
        );
        assert!(h.is_nan(), "Out-of-range fallback must be NaN, got {}", h);
    }

    #[test]
    fn miss_without_ocean_is_nan() {
        let h = resolve_height(
            HeightMode::TerrainFollow,
            &origin(),
            10.0,
            false,
            30.0,
            &FixedRay(None),
        );
        assert!(h.is_nan(), "Airless-body miss must be NaN, got {}", h);
    }
}
