//! Exact orientation predicates.
//!
//! Every topological decision of the boolean engine goes through these
//! wrappers so that the answer depends only on the input coordinates and
//! never on accumulated rounding.

use robust::{Coord, Coord3D};

use super::Point3;

/// Sign of an exact predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

impl Sign {
    /// Classifies a predicate value.
    #[must_use]
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Self::Positive
        } else if value < 0.0 {
            Self::Negative
        } else {
            Self::Zero
        }
    }
}

fn coord3(p: &Point3) -> Coord3D<f64> {
    Coord3D {
        x: p.x,
        y: p.y,
        z: p.z,
    }
}

fn coord2(p: [f64; 2]) -> Coord<f64> {
    Coord { x: p[0], y: p[1] }
}

/// Six times the signed volume of the tetrahedron `(a, b, c, d)`.
///
/// Positive when `d` lies on the side of plane `abc` that its normal
/// `(b - a) × (c - a)` points to. The sign is exact.
#[must_use]
pub fn orient3d(a: &Point3, b: &Point3, c: &Point3, d: &Point3) -> f64 {
    -robust::orient3d(coord3(a), coord3(b), coord3(c), coord3(d))
}

/// Twice the signed area of the triangle `(a, b, c)`; positive when counter-clockwise.
#[must_use]
pub fn orient2d(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    robust::orient2d(coord2(a), coord2(b), coord2(c))
}

/// Returns `true` if `p` lies inside or on the boundary of triangle `(a, b, c)`.
#[must_use]
pub fn point_in_triangle_2d(a: [f64; 2], b: [f64; 2], c: [f64; 2], p: [f64; 2]) -> bool {
    let s1 = Sign::of(orient2d(a, b, p));
    let s2 = Sign::of(orient2d(b, c, p));
    let s3 = Sign::of(orient2d(c, a, p));
    let has_neg = [s1, s2, s3].contains(&Sign::Negative);
    let has_pos = [s1, s2, s3].contains(&Sign::Positive);
    !(has_neg && has_pos)
}

/// Returns `true` if the closed segments `p1p2` and `q1q2` share at least one point.
#[must_use]
pub fn segments_intersect_2d(p1: [f64; 2], p2: [f64; 2], q1: [f64; 2], q2: [f64; 2]) -> bool {
    let d1 = Sign::of(orient2d(q1, q2, p1));
    let d2 = Sign::of(orient2d(q1, q2, p2));
    let d3 = Sign::of(orient2d(p1, p2, q1));
    let d4 = Sign::of(orient2d(p1, p2, q2));

    if ![d1, d2, d3, d4].contains(&Sign::Zero) {
        return d1 != d2 && d3 != d4;
    }

    (d1 == Sign::Zero && on_segment(q1, q2, p1))
        || (d2 == Sign::Zero && on_segment(q1, q2, p2))
        || (d3 == Sign::Zero && on_segment(p1, p2, q1))
        || (d4 == Sign::Zero && on_segment(p1, p2, q2))
}

/// For a point `p` known to be collinear with `a` and `b`, tests whether it lies
/// within the segment's bounding box.
fn on_segment(a: [f64; 2], b: [f64; 2], p: [f64; 2]) -> bool {
    p[0] >= a[0].min(b[0])
        && p[0] <= a[0].max(b[0])
        && p[1] >= a[1].min(b[1])
        && p[1] <= a[1].max(b[1])
}

/// Returns `true` if the closed segment `p1p2` touches the closed triangle `(a, b, c)`.
#[must_use]
pub fn segment_touches_triangle_2d(
    a: [f64; 2],
    b: [f64; 2],
    c: [f64; 2],
    p1: [f64; 2],
    p2: [f64; 2],
) -> bool {
    point_in_triangle_2d(a, b, c, p1)
        || point_in_triangle_2d(a, b, c, p2)
        || segments_intersect_2d(p1, p2, a, b)
        || segments_intersect_2d(p1, p2, b, c)
        || segments_intersect_2d(p1, p2, c, a)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn orient3d_positive_above_ccw_triangle() {
        let (a, b, c) = (p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0));
        assert!(orient3d(&a, &b, &c, &p(0.2, 0.2, 1.0)) > 0.0);
        assert!(orient3d(&a, &b, &c, &p(0.2, 0.2, -1.0)) < 0.0);
        assert_eq!(Sign::of(orient3d(&a, &b, &c, &p(5.0, -3.0, 0.0))), Sign::Zero);
    }

    #[test]
    fn orient2d_counter_clockwise_is_positive() {
        assert!(orient2d([0.0, 0.0], [1.0, 0.0], [0.0, 1.0]) > 0.0);
        assert!(orient2d([0.0, 0.0], [0.0, 1.0], [1.0, 0.0]) < 0.0);
    }

    #[test]
    fn point_in_triangle_includes_boundary() {
        let (a, b, c) = ([0.0, 0.0], [2.0, 0.0], [0.0, 2.0]);
        assert!(point_in_triangle_2d(a, b, c, [0.5, 0.5]));
        assert!(point_in_triangle_2d(a, b, c, [1.0, 0.0]));
        assert!(point_in_triangle_2d(a, b, c, [0.0, 0.0]));
        assert!(!point_in_triangle_2d(a, b, c, [1.5, 1.5]));
    }

    #[test]
    fn crossing_and_touching_segments_intersect() {
        assert!(segments_intersect_2d([0.0, 0.0], [2.0, 2.0], [0.0, 2.0], [2.0, 0.0]));
        assert!(segments_intersect_2d([0.0, 0.0], [1.0, 0.0], [1.0, 0.0], [1.0, 1.0]));
        assert!(segments_intersect_2d([0.0, 0.0], [2.0, 0.0], [1.0, 0.0], [3.0, 0.0]));
        assert!(!segments_intersect_2d([0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [3.0, 0.0]));
        assert!(!segments_intersect_2d([0.0, 0.0], [1.0, 1.0], [1.0, 0.0], [2.0, -1.0]));
    }

    #[test]
    fn segment_inside_triangle_touches_it() {
        let (a, b, c) = ([0.0, 0.0], [4.0, 0.0], [0.0, 4.0]);
        assert!(segment_touches_triangle_2d(a, b, c, [1.0, 1.0], [1.5, 1.0]));
        assert!(segment_touches_triangle_2d(a, b, c, [-1.0, 1.0], [1.0, 1.0]));
        assert!(!segment_touches_triangle_2d(a, b, c, [3.0, 3.0], [5.0, 5.0]));
    }
}
