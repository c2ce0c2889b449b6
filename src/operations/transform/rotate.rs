use crate::error::{OperationError, Result};
use crate::host::GeometryHost;
use crate::math::{Matrix4, Point3, Vector3, TOLERANCE};
use crate::topology::SolidId;

use super::GeneralTransform;

/// Rotates a solid around an axis.
pub struct Rotate {
    solid: SolidId,
    axis_origin: Point3,
    axis_direction: Vector3,
    angle: f64,
}

impl Rotate {
    /// Creates a new `Rotate` operation.
    ///
    /// * `angle` - Rotation angle in radians.
    #[must_use]
    pub fn new(solid: SolidId, axis_origin: Point3, axis_direction: Vector3, angle: f64) -> Self {
        Self {
            solid,
            axis_origin,
            axis_direction,
            angle,
        }
    }

    /// Executes the rotation, modifying the solid in-place.
    ///
    /// # Errors
    ///
    /// Returns an error if the axis direction is zero-length or the solid is
    /// missing.
    pub fn execute(&self, host: &mut impl GeometryHost) -> Result<()> {
        let len = self.axis_direction.norm();
        if len < TOLERANCE {
            return Err(
                OperationError::InvalidInput("rotation axis must be non-zero".into()).into(),
            );
        }
        let axis = self.axis_direction / len;

        // Translate to origin, rotate, translate back
        let t_neg = Matrix4::new_translation(&(-self.axis_origin.coords));
        let rot = rotation_matrix(&axis, self.angle);
        let t_pos = Matrix4::new_translation(&self.axis_origin.coords);
        let matrix = t_pos * rot * t_neg;

        GeneralTransform::new(self.solid, matrix).execute(host)
    }
}

/// Builds a 4x4 rotation matrix around a unit axis by an angle (Rodrigues).
#[must_use]
#[allow(clippy::many_single_char_names)]
pub fn rotation_matrix(axis: &Vector3, angle: f64) -> Matrix4 {
    let c = angle.cos();
    let s = angle.sin();
    let t = 1.0 - c;
    let (x, y, z) = (axis.x, axis.y, axis.z);

    #[allow(clippy::suspicious_operation_groupings)]
    Matrix4::new(
        t * x * x + c,     t * x * y - s * z, t * x * z + s * y, 0.0,
        t * x * y + s * z, t * y * y + c,     t * y * z - s * x, 0.0,
        t * x * z - s * y, t * y * z + s * x, t * z * z + c,     0.0,
        0.0,               0.0,               0.0,               1.0,
    )
}
