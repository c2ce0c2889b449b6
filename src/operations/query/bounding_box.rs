use crate::error::{OperationError, Result};
use crate::geometry::Aabb;
use crate::host::GeometryHost;
use crate::topology::SolidId;

/// Computes the axis-aligned bounding box of a solid.
pub struct BoundingBox {
    solid: SolidId,
}

impl BoundingBox {
    /// Creates a new `BoundingBox` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the query, returning the AABB.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid is missing or has no vertices.
    pub fn execute(&self, host: &impl GeometryHost) -> Result<Aabb> {
        let solid = host.solid(self.solid)?;
        solid.mesh().aabb().ok_or_else(|| {
            OperationError::InvalidInput(format!("solid '{}' has no vertices", solid.name)).into()
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::host::Primitive;
    use crate::math::Point3;
    use crate::topology::{Mesh, SolidStore};

    #[test]
    fn cylinder_box_spans_radius_and_depth() {
        let mut store = SolidStore::new();
        let id = store
            .create_primitive("rod", &Primitive::cylinder(1.0, 4.0, 4).with_phase(0.0))
            .unwrap();
        let aabb = BoundingBox::new(id).execute(&store).unwrap();
        assert!((aabb.min - Point3::new(-1.0, -1.0, -2.0)).norm() < 1e-12);
        assert!((aabb.max - Point3::new(1.0, 1.0, 2.0)).norm() < 1e-12);
    }

    #[test]
    fn empty_solid_has_no_box() {
        let mut store = SolidStore::new();
        let id = store.create_from_mesh("empty", Mesh::default()).unwrap();
        assert!(BoundingBox::new(id).execute(&store).is_err());
    }
}
