use crate::error::{OperationError, Result};
use crate::math::{Point3, TOLERANCE};
use crate::topology::Mesh;

/// Builds an axis-aligned box mesh from two corner points.
///
/// Vertex `i` sits at the corner selected by the bits of `i` (x, then y,
/// then z), so vertex 0 is `min_corner` and vertex 7 is `max_corner`.
pub struct MakeBox {
    min_corner: Point3,
    max_corner: Point3,
}

impl MakeBox {
    /// Creates a new `MakeBox` operation.
    #[must_use]
    pub fn new(min_corner: Point3, max_corner: Point3) -> Self {
        Self {
            min_corner,
            max_corner,
        }
    }

    /// Executes the operation, returning a closed 8-vertex, 12-triangle mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if any extent is not positive.
    pub fn execute(&self) -> Result<Mesh> {
        let size = self.max_corner - self.min_corner;
        if size.iter().any(|&s| s <= TOLERANCE || !s.is_finite()) {
            return Err(OperationError::InvalidInput(format!(
                "box extents must be positive, got ({}, {}, {})",
                size.x, size.y, size.z
            ))
            .into());
        }

        let (lo, hi) = (self.min_corner, self.max_corner);
        let vertices = (0..8)
            .map(|i| {
                Point3::new(
                    if i & 1 == 0 { lo.x } else { hi.x },
                    if i & 2 == 0 { lo.y } else { hi.y },
                    if i & 4 == 0 { lo.z } else { hi.z },
                )
            })
            .collect();

        #[rustfmt::skip]
        let triangles = vec![
            [0, 2, 3], [0, 3, 1], // -z
            [4, 5, 7], [4, 7, 6], // +z
            [0, 1, 5], [0, 5, 4], // -y
            [2, 6, 7], [2, 7, 3], // +y
            [0, 4, 6], [0, 6, 2], // -x
            [1, 3, 7], [1, 7, 5], // +x
        ];
        Ok(Mesh::new(vertices, triangles))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::query::signed_volume;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn box_is_closed_with_positive_volume() {
        let mesh = MakeBox::new(p(0.0, 0.0, 0.0), p(1.0, 2.0, 3.0))
            .execute()
            .unwrap();
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.triangles.len(), 12);
        assert!(mesh.is_closed_manifold());
        assert!((signed_volume(&mesh) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn flat_box_is_rejected() {
        assert!(MakeBox::new(p(0.0, 0.0, 0.0), p(1.0, 0.0, 1.0))
            .execute()
            .is_err());
        assert!(MakeBox::new(p(1.0, 1.0, 1.0), p(0.0, 2.0, 2.0))
            .execute()
            .is_err());
    }
}
