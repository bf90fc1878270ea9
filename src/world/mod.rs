pub mod body;
pub mod terrain;

pub use body::{Body, G0};
pub use terrain::Terrain;

/// Everything outside the craft: the gravity body and its terrain.
#[derive(Debug, Clone)]
pub struct Environment {
    pub body: Body,
    pub terrain: Terrain,
}

impl Environment {
    pub fn new(body: Body, terrain: Terrain) -> Self {
        Self { body, terrain }
    }

    /// Earthlike body over gentle dunes.
    pub fn temperate_dunes() -> Self {
        Self::new(Body::temperate(), Terrain::rolling(3.0, 60.0))
    }

    /// Earthlike body, flat pad at the datum.
    pub fn flat_pad() -> Self {
        Self::new(Body::temperate(), Terrain::flat(0.0))
    }

    /// Earthlike body with a shoreline sloping into open water along +X.
    pub fn coastline() -> Self {
        Self::new(Body::temperate(), Terrain::coastal(6.0, 0.02))
    }
}
