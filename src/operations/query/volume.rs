use crate::error::Result;
use crate::host::GeometryHost;
use crate::topology::{Mesh, SolidId};

/// Signed volume enclosed by a triangle mesh.
///
/// Sums `(1/6) * v0 . (v1 x v2)` over all triangles. Positive for a closed
/// mesh with outward winding, negative when the winding is inverted.
#[must_use]
pub fn signed_volume(mesh: &Mesh) -> f64 {
    let sum: f64 = (0..mesh.triangles.len())
        .map(|t| {
            let [v0, v1, v2] = mesh.corners(t);
            v0.coords.dot(&v1.coords.cross(&v2.coords))
        })
        .sum();
    sum / 6.0
}

/// Computes the volume of a solid.
pub struct Volume {
    solid: SolidId,
}

impl Volume {
    /// Creates a new `Volume` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the query, returning the signed volume.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid is not held by `host`.
    pub fn execute(&self, host: &impl GeometryHost) -> Result<f64> {
        Ok(signed_volume(host.solid(self.solid)?.mesh()))
    }
}
