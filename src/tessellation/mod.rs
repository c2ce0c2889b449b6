mod tessellate_solid;
mod triangulate;

pub use tessellate_solid::{flat_shaded, TessellateSolid};
pub(crate) use triangulate::{add_constraint_checked, classify_interior_faces, Cdt};
pub use triangulate::triangulate_polygon;

use crate::math::{Point3, Vector3};

/// A flat-shaded triangle mesh ready to hand to an export sink.
///
/// Every triangle owns its three vertices so each can carry the face normal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Vertex normals.
    pub normals: Vec<Vector3>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Returns a copy with every position multiplied by `scale`.
    ///
    /// A negative scale mirrors the mesh, so winding is reversed to keep the
    /// normals pointing outward.
    #[must_use]
    pub fn scaled(&self, scale: f64) -> Self {
        let mut out = self.clone();
        for v in &mut out.vertices {
            *v = Point3::from(v.coords * scale);
        }
        if scale < 0.0 {
            for tri in &mut out.indices {
                tri.swap(1, 2);
            }
            for n in &mut out.normals {
                *n = -*n;
            }
        }
        out
    }
}
