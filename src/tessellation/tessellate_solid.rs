use crate::error::Result;
use crate::host::GeometryHost;
use crate::math::Vector3;
use crate::topology::{Mesh, SolidId};

use super::TriangleMesh;

/// Converts a solid into a flat-shaded triangle mesh.
pub struct TessellateSolid {
    solid: SolidId,
}

impl TessellateSolid {
    /// Creates a new `TessellateSolid` operation.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the tessellation, returning a flat-shaded triangle mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid is not held by `host`.
    pub fn execute(&self, host: &impl GeometryHost) -> Result<TriangleMesh> {
        let solid = host.solid(self.solid)?;
        Ok(flat_shaded(solid.mesh()))
    }
}

/// Splits `mesh` so every triangle carries its own face normal.
///
/// Degenerate (zero-area) triangles get a zero normal.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn flat_shaded(mesh: &Mesh) -> TriangleMesh {
    let mut out = TriangleMesh {
        vertices: Vec::with_capacity(mesh.triangles.len() * 3),
        normals: Vec::with_capacity(mesh.triangles.len() * 3),
        indices: Vec::with_capacity(mesh.triangles.len()),
    };
    for t in 0..mesh.triangles.len() {
        let normal = mesh
            .triangle_normal(t)
            .try_normalize(0.0)
            .unwrap_or_else(Vector3::zeros);
        let base = out.vertices.len() as u32;
        for corner in mesh.corners(t) {
            out.vertices.push(corner);
            out.normals.push(normal);
        }
        out.indices.push([base, base + 1, base + 2]);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::host::Primitive;
    use crate::topology::SolidStore;

    #[test]
    fn cuboid_has_outward_axis_normals() {
        let mut store = SolidStore::new();
        let id = store
            .create_primitive("box", &Primitive::cuboid(2.0, 2.0, 2.0))
            .unwrap();
        let mesh = TessellateSolid::new(id).execute(&store).unwrap();
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.vertices.len(), 36);
        for (tri_index, tri) in mesh.indices.iter().enumerate() {
            let n = mesh.normals[tri[0] as usize];
            let c = mesh.vertices[tri[0] as usize];
            assert!((n.norm() - 1.0).abs() < 1e-12, "triangle {tri_index}");
            // Every face of a centered cube points away from the origin.
            assert!(n.dot(&c.coords) > 0.0);
        }
    }

    #[test]
    fn missing_solid_is_an_error() {
        let mut store = SolidStore::new();
        let id = store
            .create_primitive("box", &Primitive::cuboid(1.0, 1.0, 1.0))
            .unwrap();
        store.destroy(id).unwrap();
        assert!(TessellateSolid::new(id).execute(&store).is_err());
    }
}
