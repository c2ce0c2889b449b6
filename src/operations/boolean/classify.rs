use std::f64::consts::PI;

use crate::math::Point3;
use crate::topology::Mesh;

/// Classification of a point relative to a closed mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointClassification {
    Inside,
    Outside,
}

/// Generalized winding number of `mesh` around `point`.
///
/// Sums the signed solid angle of every triangle (Van Oosterom and
/// Strackee) over `4π`. For a closed, outward-oriented mesh this is 1 inside
/// and 0 outside; it does not depend on casting rays, so there are no
/// grazing cases to retry.
#[must_use]
pub fn winding_number(mesh: &Mesh, point: &Point3) -> f64 {
    let mut total = 0.0;
    for t in 0..mesh.triangles.len() {
        let [a, b, c] = mesh.corners(t).map(|v| v - point);
        let (la, lb, lc) = (a.norm(), b.norm(), c.norm());
        let numerator = a.dot(&b.cross(&c));
        let denominator = la * lb * lc + a.dot(&b) * lc + a.dot(&c) * lb + b.dot(&c) * la;
        total += 2.0 * numerator.atan2(denominator);
    }
    total / (4.0 * PI)
}

/// Classifies `point` as inside or outside a closed mesh.
#[must_use]
pub fn classify_point(mesh: &Mesh, point: &Point3) -> PointClassification {
    if winding_number(mesh, point) > 0.5 {
        PointClassification::Inside
    } else {
        PointClassification::Outside
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::host::Primitive;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn winding_is_one_inside_zero_outside() {
        let mesh = Primitive::cylinder(1.0, 2.0, 32).mesh().unwrap();
        assert!((winding_number(&mesh, &p(0.1, 0.2, 0.3)) - 1.0).abs() < 1e-9);
        assert!(winding_number(&mesh, &p(3.0, 0.0, 0.0)).abs() < 1e-9);
    }

    #[test]
    fn classify_box_points() {
        let mesh = Primitive::cuboid(1.0, 1.0, 1.0).mesh().unwrap();
        assert_eq!(classify_point(&mesh, &p(0.0, 0.0, 0.0)), PointClassification::Inside);
        assert_eq!(classify_point(&mesh, &p(0.49, -0.49, 0.2)), PointClassification::Inside);
        assert_eq!(classify_point(&mesh, &p(0.51, 0.0, 0.0)), PointClassification::Outside);
    }

    #[test]
    fn inverted_mesh_has_negative_winding() {
        let mut mesh = Primitive::cuboid(1.0, 1.0, 1.0).mesh().unwrap();
        mesh.flip();
        assert!((winding_number(&mesh, &p(0.1, 0.1, 0.1)) + 1.0).abs() < 1e-9);
        assert_eq!(classify_point(&mesh, &p(0.1, 0.1, 0.1)), PointClassification::Outside);
    }
}
