use crate::host::GeometryHost;
use crate::topology::SolidId;

use super::{shell_count, signed_volume};

/// Checks that a solid is a single closed, outward-oriented two-manifold.
pub struct IsValid {
    solid: SolidId,
}

impl IsValid {
    /// Creates a new `IsValid` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the validation, returning `true` if the solid is valid.
    /// A missing solid is not valid.
    #[must_use]
    pub fn execute(&self, host: &impl GeometryHost) -> bool {
        let Ok(solid) = host.solid(self.solid) else {
            return false;
        };
        let mesh = solid.mesh();
        solid.is_manifold() && shell_count(mesh) == 1 && signed_volume(mesh) > 0.0
    }
}
