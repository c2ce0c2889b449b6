use std::collections::HashMap;

use rayon::prelude::*;

use crate::error::{BooleanError, Result};
use crate::geometry::Aabb;
use crate::math::predicates::{
    orient3d, point_in_triangle_2d, segment_touches_triangle_2d, Sign,
};
use crate::math::{dominant_axis, project_along, Point3};
use crate::topology::{edge_key, EdgeKey, Mesh};

use super::Operand;

/// Both operands flattened into one index space: target vertices, then tool
/// vertices, then intersection points. Triangles are numbered the same way,
/// target first.
pub(super) struct Arrangement<'a> {
    pub positions: Vec<Point3>,
    pub triangles: Vec<[u32; 3]>,
    pub target_triangles: usize,
    pub target: &'a Mesh,
    pub tool: &'a Mesh,
}

impl<'a> Arrangement<'a> {
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(target: &'a Mesh, tool: &'a Mesh) -> Self {
        let offset = target.vertices.len() as u32;
        let mut positions = Vec::with_capacity(target.vertices.len() + tool.vertices.len());
        positions.extend_from_slice(&target.vertices);
        positions.extend_from_slice(&tool.vertices);
        let mut triangles = Vec::with_capacity(target.triangles.len() + tool.triangles.len());
        triangles.extend_from_slice(&target.triangles);
        triangles.extend(
            tool.triangles
                .iter()
                .map(|t| [t[0] + offset, t[1] + offset, t[2] + offset]),
        );
        Self {
            positions,
            triangles,
            target_triangles: target.triangles.len(),
            target,
            tool,
        }
    }

    /// Which operand triangle `t` came from.
    pub fn operand(&self, t: usize) -> Operand {
        if t < self.target_triangles {
            Operand::Target
        } else {
            Operand::Tool
        }
    }

    pub fn corners(&self, t: usize) -> [Point3; 3] {
        self.triangles[t].map(|v| self.positions[v as usize])
    }
}

/// Everything the retriangulation needs to know about where the operands
/// cross.
#[derive(Debug, Default)]
pub(super) struct Intersections {
    /// Points lying on an edge, with their parameter measured from the
    /// smaller vertex index toward the larger one.
    pub edge_points: HashMap<EdgeKey, Vec<(f64, u32)>>,
    /// Points strictly inside a triangle.
    pub face_points: HashMap<usize, Vec<u32>>,
    /// Cut segments each triangle must contain as edges.
    pub segments: HashMap<usize, Vec<[u32; 2]>>,
    /// Number of triangle pairs whose boxes overlapped.
    pub candidate_pairs: usize,
}

impl Intersections {
    /// Returns `true` if triangle `t` needs to be split.
    pub fn touches(&self, t: usize, tri: [u32; 3]) -> bool {
        self.face_points.contains_key(&t)
            || self.segments.contains_key(&t)
            || (0..3).any(|k| {
                self.edge_points
                    .contains_key(&edge_key(tri[k], tri[(k + 1) % 3]))
            })
    }
}

enum EdgeHit {
    Miss,
    Pierce(f64, Point3),
    Degenerate(Point3),
}

/// Classifies segment `uv` against the closed triangle `tri` exactly.
fn edge_triangle(u: &Point3, v: &Point3, tri: &[Point3; 3]) -> EdgeHit {
    let [p, q, r] = tri;
    let su = orient3d(p, q, r, u);
    let sv = orient3d(p, q, r, v);
    let axis = dominant_axis(&(q - p).cross(&(r - p)));
    let flat = |x: &Point3| project_along(x, axis);
    let (fp, fq, fr) = (flat(p), flat(q), flat(r));

    match (Sign::of(su), Sign::of(sv)) {
        (Sign::Zero, Sign::Zero) => {
            if segment_touches_triangle_2d(fp, fq, fr, flat(u), flat(v)) {
                EdgeHit::Degenerate(*u)
            } else {
                EdgeHit::Miss
            }
        }
        (Sign::Zero, _) => {
            if point_in_triangle_2d(fp, fq, fr, flat(u)) {
                EdgeHit::Degenerate(*u)
            } else {
                EdgeHit::Miss
            }
        }
        (_, Sign::Zero) => {
            if point_in_triangle_2d(fp, fq, fr, flat(v)) {
                EdgeHit::Degenerate(*v)
            } else {
                EdgeHit::Miss
            }
        }
        (a, b) if a == b => EdgeHit::Miss,
        _ => {
            let t = su / (su - sv);
            let point = u + (v - u) * t;
            let signs = [
                Sign::of(orient3d(u, v, p, q)),
                Sign::of(orient3d(u, v, q, r)),
                Sign::of(orient3d(u, v, r, p)),
            ];
            let pos = signs.contains(&Sign::Positive);
            let neg = signs.contains(&Sign::Negative);
            if pos && neg {
                EdgeHit::Miss
            } else if signs.contains(&Sign::Zero) {
                EdgeHit::Degenerate(point)
            } else {
                EdgeHit::Pierce(t, point)
            }
        }
    }
}

/// Finds every pair of target/tool triangles whose bounding boxes overlap.
fn candidate_pairs(arr: &Arrangement<'_>) -> Vec<(usize, usize)> {
    let boxes: Vec<Option<Aabb>> = (0..arr.triangles.len())
        .map(|t| Aabb::from_points(&arr.corners(t)))
        .collect();
    let split = arr.target_triangles;

    // Tool triangles sorted by their lower x bound for a sweep.
    let mut tool: Vec<(f64, usize)> = (split..arr.triangles.len())
        .filter_map(|t| boxes[t].map(|b| (b.min.x, t)))
        .collect();
    tool.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut pairs: Vec<(usize, usize)> = (0..split)
        .into_par_iter()
        .flat_map_iter(|ta| {
            let found: Vec<(usize, usize)> = match boxes[ta] {
                Some(a) => {
                    let end = tool.partition_point(|&(min_x, _)| min_x <= a.max.x);
                    tool[..end]
                        .iter()
                        .filter(|&&(_, tb)| boxes[tb].is_some_and(|b| a.overlaps(&b)))
                        .map(|&(_, tb)| (ta, tb))
                        .collect()
                }
                None => Vec::new(),
            };
            found
        })
        .collect();
    pairs.sort_unstable();
    pairs
}

/// Computes the intersection points and cut segments between the operands.
///
/// New points are appended to `arr.positions`.
///
/// # Errors
///
/// Returns [`BooleanError::CoincidentGeometry`] if the operands touch in a
/// degenerate way and [`BooleanError::InconsistentIntersection`] if a pair
/// of triangles yields other than zero or two crossing points.
#[allow(clippy::cast_possible_truncation)]
pub(super) fn intersect(arr: &mut Arrangement<'_>) -> Result<Intersections> {
    let pairs = candidate_pairs(arr);
    let mut out = Intersections {
        candidate_pairs: pairs.len(),
        ..Intersections::default()
    };
    // (edge, triangle) -> point id, so a shared edge gets one point.
    let mut memo: HashMap<(EdgeKey, usize), u32> = HashMap::new();

    for (ta, tb) in pairs {
        let mut hits: Vec<u32> = Vec::with_capacity(2);
        for (edge_tri, face_tri) in [(ta, tb), (tb, ta)] {
            let tri = arr.triangles[edge_tri];
            let face = arr.corners(face_tri);
            for k in 0..3 {
                let key = edge_key(tri[k], tri[(k + 1) % 3]);
                if let Some(&id) = memo.get(&(key, face_tri)) {
                    hits.push(id);
                    continue;
                }
                let (u, v) = (arr.positions[key.0 as usize], arr.positions[key.1 as usize]);
                match edge_triangle(&u, &v, &face) {
                    EdgeHit::Miss => {}
                    EdgeHit::Degenerate(at) => {
                        return Err(BooleanError::CoincidentGeometry([at.x, at.y, at.z]).into());
                    }
                    EdgeHit::Pierce(t, at) => {
                        let id = arr.positions.len() as u32;
                        arr.positions.push(at);
                        memo.insert((key, face_tri), id);
                        out.edge_points.entry(key).or_default().push((t, id));
                        out.face_points.entry(face_tri).or_default().push(id);
                        hits.push(id);
                    }
                }
            }
        }

        match hits.as_slice() {
            [] => {}
            &[a, b] if a != b => {
                out.segments.entry(ta).or_default().push([a, b]);
                out.segments.entry(tb).or_default().push([a, b]);
            }
            _ => return Err(BooleanError::InconsistentIntersection(ta, tb, hits.len()).into()),
        }
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ForgeError;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn tri() -> [Point3; 3] {
        [p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(0.0, 2.0, 0.0)]
    }

    #[test]
    fn edge_through_interior_pierces() {
        match edge_triangle(&p(0.5, 0.5, -1.0), &p(0.5, 0.5, 3.0), &tri()) {
            EdgeHit::Pierce(t, at) => {
                assert!((t - 0.25).abs() < 1e-15);
                assert!((at - p(0.5, 0.5, 0.0)).norm() < 1e-15);
            }
            _ => panic!("expected a pierce"),
        }
    }

    #[test]
    fn edge_past_triangle_misses() {
        assert!(matches!(
            edge_triangle(&p(1.5, 1.5, -1.0), &p(1.5, 1.5, 1.0), &tri()),
            EdgeHit::Miss
        ));
        assert!(matches!(
            edge_triangle(&p(0.5, 0.5, 1.0), &p(0.5, 0.5, 2.0), &tri()),
            EdgeHit::Miss
        ));
    }

    #[test]
    fn edge_through_triangle_edge_is_degenerate() {
        assert!(matches!(
            edge_triangle(&p(1.0, 0.0, -1.0), &p(1.0, 0.0, 1.0), &tri()),
            EdgeHit::Degenerate(_)
        ));
    }

    #[test]
    fn endpoint_on_face_is_degenerate() {
        assert!(matches!(
            edge_triangle(&p(0.5, 0.5, 0.0), &p(0.5, 0.5, 1.0), &tri()),
            EdgeHit::Degenerate(_)
        ));
    }

    #[test]
    fn coplanar_overlap_is_degenerate() {
        assert!(matches!(
            edge_triangle(&p(-1.0, 0.5, 0.0), &p(3.0, 0.5, 0.0), &tri()),
            EdgeHit::Degenerate(_)
        ));
        assert!(matches!(
            edge_triangle(&p(5.0, 5.0, 0.0), &p(6.0, 5.0, 0.0), &tri()),
            EdgeHit::Miss
        ));
    }

    #[test]
    fn crossing_triangles_give_one_segment_each() {
        let a = Mesh::new(vec![p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(0.0, 2.0, 0.0)], vec![[0, 1, 2]]);
        let b = Mesh::new(
            vec![p(0.5, 0.5, -1.0), p(0.5, 0.5, 1.0), p(0.7, 3.0, 0.1)],
            vec![[0, 1, 2]],
        );
        let mut arr = Arrangement::new(&a, &b);
        let found = intersect(&mut arr).unwrap();
        assert_eq!(found.candidate_pairs, 1);
        assert_eq!(found.segments[&0].len(), 1);
        assert_eq!(found.segments[&1], found.segments[&0]);
        assert_eq!(arr.positions.len(), 8);
    }

    #[test]
    fn touching_vertex_reports_coincidence() {
        let a = Mesh::new(vec![p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(0.0, 2.0, 0.0)], vec![[0, 1, 2]]);
        let b = Mesh::new(
            vec![p(0.5, 0.5, 0.0), p(0.5, 0.5, 1.0), p(0.7, 3.0, 0.1)],
            vec![[0, 1, 2]],
        );
        let mut arr = Arrangement::new(&a, &b);
        assert!(matches!(
            intersect(&mut arr),
            Err(ForgeError::Boolean(BooleanError::CoincidentGeometry(_)))
        ));
    }
}
