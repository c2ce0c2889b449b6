use super::predicates::{orient2d, segments_intersect_2d, Sign};
use super::Point2;

/// Computes the signed area of a closed 2D polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns `true` if the closed polygon is simple: at least three vertices,
/// no repeated consecutive vertices, no two non-adjacent edges touching, and
/// no adjacent edges folding back over each other.
///
/// Uses exact predicates, so touching at a single point counts as an
/// intersection.
#[must_use]
pub fn is_simple_polygon(points: &[Point2]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let pt = |i: usize| -> [f64; 2] {
        let p = &points[i % n];
        [p.x, p.y]
    };

    for i in 0..n {
        let (a, b, c) = (pt(i), pt(i + 1), pt(i + 2));
        if a == b {
            return false;
        }
        // Adjacent edges may only share their common vertex: a collinear turn
        // that doubles back means the edges overlap.
        if Sign::of(orient2d(a, b, c)) == Sign::Zero {
            let forward = (b[0] - a[0]) * (c[0] - b[0]) + (b[1] - a[1]) * (c[1] - b[1]);
            if forward <= 0.0 {
                return false;
            }
        }
    }

    for i in 0..n {
        for j in (i + 2)..n {
            // Edge n-1 is adjacent to edge 0.
            if i == 0 && j == n - 1 {
                continue;
            }
            if segments_intersect_2d(pt(i), pt(i + 1), pt(j), pt(j + 1)) {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    fn q(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn signed_area_ccw_square() {
        let pts = [q(0.0, 0.0), q(1.0, 0.0), q(1.0, 1.0), q(0.0, 1.0)];
        assert!((signed_area_2d(&pts) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_cw_square() {
        let pts = [q(0.0, 0.0), q(0.0, 1.0), q(1.0, 1.0), q(1.0, 0.0)];
        assert!((signed_area_2d(&pts) + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area_2d(&[q(0.0, 0.0)]).abs() < TOLERANCE);
        assert!(signed_area_2d(&[]).abs() < TOLERANCE);
    }

    #[test]
    fn square_and_concave_shapes_are_simple() {
        assert!(is_simple_polygon(&[q(0.0, 0.0), q(1.0, 0.0), q(1.0, 1.0), q(0.0, 1.0)]));
        let l_shape = [
            q(0.0, 0.0),
            q(2.0, 0.0),
            q(2.0, 1.0),
            q(1.0, 1.0),
            q(1.0, 2.0),
            q(0.0, 2.0),
        ];
        assert!(is_simple_polygon(&l_shape));
    }

    #[test]
    fn bowtie_is_not_simple() {
        let bowtie = [q(0.0, 0.0), q(1.0, 1.0), q(1.0, 0.0), q(0.0, 1.0)];
        assert!(!is_simple_polygon(&bowtie));
    }

    #[test]
    fn repeated_vertex_is_not_simple() {
        let pts = [q(0.0, 0.0), q(1.0, 0.0), q(1.0, 0.0), q(0.0, 1.0)];
        assert!(!is_simple_polygon(&pts));
    }

    #[test]
    fn folded_edge_is_not_simple() {
        let pts = [q(0.0, 0.0), q(2.0, 0.0), q(1.0, 0.0), q(1.0, 1.0)];
        assert!(!is_simple_polygon(&pts));
    }
}
