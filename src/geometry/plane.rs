use crate::error::{OperationError, Result};
use crate::math::{Point2, Point3, Vector3, TOLERANCE};

/// An oriented plane in 3D space carrying a 2D coordinate frame.
///
/// Defined by an origin point and two orthonormal direction vectors
/// (`u_dir`, `v_dir`). The normal is `u_dir × v_dir`.
///
/// Parametric form: `P(u, v) = origin + u * u_dir + v * v_dir`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    origin: Point3,
    u_dir: Vector3,
    v_dir: Vector3,
    normal: Vector3,
}

impl Plane {
    /// Creates a new plane from an origin and two direction vectors.
    ///
    /// `v_dir` is re-orthogonalized against `u_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vectors are zero-length
    /// or parallel (degenerate plane).
    pub fn new(origin: Point3, u_dir: Vector3, v_dir: Vector3) -> Result<Self> {
        let u_len = u_dir.norm();
        if u_len < TOLERANCE {
            return Err(OperationError::InvalidInput("plane u direction is zero".into()).into());
        }
        let u_dir = u_dir / u_len;

        let v_dir = v_dir - u_dir * v_dir.dot(&u_dir);
        let v_len = v_dir.norm();
        if v_len < TOLERANCE {
            return Err(
                OperationError::InvalidInput("plane directions are parallel".into()).into(),
            );
        }
        let v_dir = v_dir / v_len;

        Ok(Self {
            origin,
            u_dir,
            v_dir,
            normal: u_dir.cross(&v_dir),
        })
    }

    /// The XY plane through the origin, normal +Z.
    #[must_use]
    pub fn xy() -> Self {
        Self {
            origin: Point3::origin(),
            u_dir: Vector3::x(),
            v_dir: Vector3::y(),
            normal: Vector3::z(),
        }
    }

    /// The XZ half-plane frame used for cross-sections swept around +Z:
    /// `u` is the radial direction (+X) and `v` the axial direction (+Z).
    #[must_use]
    pub fn radial_xz() -> Self {
        Self {
            origin: Point3::origin(),
            u_dir: Vector3::x(),
            v_dir: Vector3::z(),
            normal: -Vector3::y(),
        }
    }

    /// Returns the origin of the plane.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the U direction.
    #[must_use]
    pub fn u_dir(&self) -> &Vector3 {
        &self.u_dir
    }

    /// Returns the V direction.
    #[must_use]
    pub fn v_dir(&self) -> &Vector3 {
        &self.v_dir
    }

    /// Returns the unit normal.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Maps plane coordinates to a 3D point.
    #[must_use]
    pub fn point_at(&self, uv: &Point2) -> Point3 {
        self.origin + self.u_dir * uv.x + self.v_dir * uv.y
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normal_follows_right_hand_rule() {
        let plane = Plane::new(Point3::origin(), Vector3::y(), Vector3::z()).unwrap();
        assert!((plane.normal() - Vector3::x()).norm() < TOLERANCE);
    }

    #[test]
    fn skewed_v_is_orthogonalized() {
        let plane = Plane::new(Point3::origin(), Vector3::x(), Vector3::new(1.0, 1.0, 0.0)).unwrap();
        assert!(plane.u_dir().dot(plane.v_dir()).abs() < TOLERANCE);
        assert!((plane.normal() - Vector3::z()).norm() < TOLERANCE);
    }

    #[test]
    fn parallel_directions_are_rejected() {
        let result = Plane::new(Point3::origin(), Vector3::x(), Vector3::x() * 2.0);
        assert!(result.is_err());
    }

    #[test]
    fn radial_frame_maps_to_xz() {
        let p = Plane::radial_xz().point_at(&Point2::new(2.0, 3.0));
        assert!((p - Point3::new(2.0, 0.0, 3.0)).norm() < TOLERANCE);
    }
}
