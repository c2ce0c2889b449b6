use crate::error::Result;
use crate::host::GeometryHost;
use crate::math::{Point3, Vector3};
use crate::topology::SolidId;

/// Translates a solid by a displacement vector.
pub struct Translate {
    solid: SolidId,
    displacement: Vector3,
}

impl Translate {
    /// Creates a new `Translate` operation.
    #[must_use]
    pub fn new(solid: SolidId, displacement: Vector3) -> Self {
        Self {
            solid,
            displacement,
        }
    }

    /// Executes the translation, modifying the solid in-place.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid is missing.
    pub fn execute(&self, host: &mut impl GeometryHost) -> Result<()> {
        let d = self.displacement;
        host.solid_mut(self.solid)?
            .map_vertices(|p: &Point3| p + d);
        Ok(())
    }
}
