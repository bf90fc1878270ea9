use nalgebra::Vector3;

use crate::control::altimetry::DownRay;

// ---------------------------------------------------------------------------
// Terrain: procedural heightfield with a vertical-ray altimeter
// ---------------------------------------------------------------------------

/// Solid terrain under the craft. Heights are relative to the datum, so a
/// negative surface height is seafloor on an ocean body. The altimeter ray
/// only registers solid terrain; water never returns a hit, which is what
/// exercises the resolver's ocean fallback.
#[derive(Debug, Clone)]
pub enum Terrain {
    /// Constant surface height.
    Flat { height: f64 },
    /// Rolling dunes: smooth sinusoidal hills.
    Rolling {
        amplitude: f64,
        wavelength: f64,
        offset: f64,
    },
    /// A shore sloping down along +X, crossing the datum at x = 0 and
    /// continuing down to seafloor.
    Coastal { shore_height: f64, slope: f64 },
}

impl Terrain {
    pub fn flat(height: f64) -> Self {
        Terrain::Flat { height }
    }

    pub fn rolling(amplitude: f64, wavelength: f64) -> Self {
        Terrain::Rolling {
            amplitude,
            wavelength,
            offset: 0.0,
        }
    }

    pub fn coastal(shore_height: f64, slope: f64) -> Self {
        Terrain::Coastal { shore_height, slope }
    }

    /// Solid surface height at (x, y), m above datum. May be negative.
    pub fn surface_height(&self, x: f64, y: f64) -> f64 {
        match *self {
            Terrain::Flat { height } => height,
            Terrain::Rolling {
                amplitude,
                wavelength,
                offset,
            } => {
                let k = std::f64::consts::TAU / wavelength;
                offset + amplitude * (k * x).sin() * (k * y * 0.7).cos()
            }
            Terrain::Coastal {
                shore_height,
                slope,
            } => shore_height - slope * x,
        }
    }

    /// What the craft can actually touch down on: solid ground, or the
    /// water surface where the terrain is submerged on an ocean body.
    pub fn contact_height(&self, x: f64, y: f64, has_ocean: bool) -> f64 {
        let solid = self.surface_height(x, y);
        if has_ocean {
            solid.max(0.0)
        } else {
            solid
        }
    }
}

impl DownRay for Terrain {
    fn cast(&self, origin: &Vector3<f64>, max_distance: f64) -> Option<f64> {
        let distance = origin.z - self.surface_height(origin.x, origin.y);
        if distance <= max_distance {
            Some(distance.max(0.0))
        } else {
            None
        }
    }
}
