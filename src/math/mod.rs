pub mod polygon_2d;
pub mod predicates;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Computes the (unnormalized) normal of a closed polygon using Newell's method.
///
/// The length equals twice the area of the polygon projected onto the plane
/// perpendicular to the result, so a zero vector signals a degenerate loop.
#[must_use]
pub fn newell_normal(points: &[Point3]) -> Vector3 {
    let n = points.len();
    let mut normal = Vector3::zeros();
    for i in 0..n {
        let curr = &points[i];
        let next = &points[(i + 1) % n];
        normal.x += (curr.y - next.y) * (curr.z + next.z);
        normal.y += (curr.z - next.z) * (curr.x + next.x);
        normal.z += (curr.x - next.x) * (curr.y + next.y);
    }
    normal
}

/// Index of the coordinate axis along which `normal` has its largest component.
#[must_use]
pub fn dominant_axis(normal: &Vector3) -> usize {
    let (ax, ay, az) = (normal.x.abs(), normal.y.abs(), normal.z.abs());
    if ax >= ay && ax >= az {
        0
    } else if ay >= az {
        1
    } else {
        2
    }
}

/// Drops coordinate `axis` from `p`, keeping the remaining two in cyclic order.
///
/// A polygon whose normal has a positive component along `axis` projects to a
/// counter-clockwise polygon.
#[must_use]
pub fn project_along(p: &Point3, axis: usize) -> [f64; 2] {
    match axis {
        0 => [p.y, p.z],
        1 => [p.z, p.x],
        _ => [p.x, p.y],
    }
}

/// Returns the component of `v` along coordinate `axis`.
#[must_use]
pub fn axis_component(v: &Vector3, axis: usize) -> f64 {
    match axis {
        0 => v.x,
        1 => v.y,
        _ => v.z,
    }
}

/// Builds two unit vectors completing `axis` to a right-handed orthonormal frame.
///
/// Returns `None` if `axis` is zero-length.
#[must_use]
pub fn orthonormal_frame(axis: &Vector3) -> Option<(Vector3, Vector3, Vector3)> {
    let len = axis.norm();
    if len < TOLERANCE {
        return None;
    }
    let w = axis / len;
    let seed = if w.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let u = (seed - w * seed.dot(&w)).normalize();
    let v = w.cross(&u);
    Some((u, v, w))
}
