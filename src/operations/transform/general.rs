use crate::error::{OperationError, Result};
use crate::host::GeometryHost;
use crate::math::{Matrix4, Point3, TOLERANCE};
use crate::topology::SolidId;

/// Applies an arbitrary affine 4x4 transformation matrix to a solid.
pub struct GeneralTransform {
    solid: SolidId,
    matrix: Matrix4,
}

impl GeneralTransform {
    /// Creates a new `GeneralTransform` operation.
    #[must_use]
    pub fn new(solid: SolidId, matrix: Matrix4) -> Self {
        Self { solid, matrix }
    }

    /// Executes the transformation, modifying the solid in-place.
    ///
    /// A mirroring matrix (negative determinant) also reverses the winding so
    /// the mesh stays outward-facing.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid is missing or the matrix is singular.
    pub fn execute(&self, host: &mut impl GeometryHost) -> Result<()> {
        let det = self.matrix.fixed_view::<3, 3>(0, 0).determinant();
        if det.abs() < TOLERANCE || !det.is_finite() {
            return Err(
                OperationError::InvalidInput("transformation matrix is singular".into()).into(),
            );
        }

        let solid = host.solid_mut(self.solid)?;
        solid.map_vertices(|p| transform_point(&self.matrix, p));
        if det < 0.0 {
            let mut mesh = solid.mesh().clone();
            mesh.flip();
            solid.set_mesh(mesh);
        }
        Ok(())
    }
}

/// Transforms a point by a 4x4 affine matrix.
#[must_use]
pub fn transform_point(matrix: &Matrix4, point: &Point3) -> Point3 {
    matrix.transform_point(point)
}
