use std::collections::{HashMap, HashSet, VecDeque};

use spade::handles::{FixedFaceHandle, FixedVertexHandle, InnerTag};
use spade::{ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation};

use crate::error::{Result, TessellationError};

/// Constrained Delaunay triangulation over `f64` points.
pub(crate) type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Triangulates a simple polygon without adding vertices.
///
/// Returns index triples into `points`, each wound counter-clockwise in the
/// plane of `points`, covering exactly the polygon interior.
///
/// # Errors
///
/// Returns an error if a point is rejected by the triangulator, two points
/// coincide, or the polygon edges cross each other.
pub fn triangulate_polygon(points: &[[f64; 2]]) -> Result<Vec<[usize; 3]>> {
    if points.len() < 3 {
        return Err(TessellationError::InvalidPoint(format!(
            "polygon needs at least 3 points, got {}",
            points.len()
        ))
        .into());
    }

    let mut cdt = Cdt::new();
    let mut handles = Vec::with_capacity(points.len());
    let mut index_of: HashMap<usize, usize> = HashMap::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        let before = cdt.num_vertices();
        let handle = cdt
            .insert(SpadePoint2::new(p[0], p[1]))
            .map_err(|e: InsertionError| TessellationError::InvalidPoint(format!("{e}")))?;
        if cdt.num_vertices() == before {
            return Err(TessellationError::DuplicatePoint(i).into());
        }
        index_of.insert(handle.index(), i);
        handles.push(handle);
    }

    let mut boundary: HashSet<(usize, usize)> = HashSet::with_capacity(points.len());
    for i in 0..handles.len() {
        let j = (i + 1) % handles.len();
        add_constraint_checked(&mut cdt, handles[i], handles[j])?;
        boundary.insert(undirected(handles[i].index(), handles[j].index()));
    }

    let interior =
        classify_interior_faces(&cdt, |a, b| boundary.contains(&undirected(a, b)));

    let mut triangles = Vec::with_capacity(points.len() - 2);
    for face in cdt.inner_faces() {
        if !interior.contains(&face.fix().index()) {
            continue;
        }
        let [a, b, c] = face.vertices().map(|v| v.fix().index());
        let (Some(&a), Some(&b), Some(&c)) = (index_of.get(&a), index_of.get(&b), index_of.get(&c))
        else {
            continue;
        };
        triangles.push([a, b, c]);
    }
    Ok(triangles)
}

/// Adds a constraint edge, refusing edges that would cross an existing one.
pub(crate) fn add_constraint_checked(
    cdt: &mut Cdt,
    from: FixedVertexHandle,
    to: FixedVertexHandle,
) -> Result<()> {
    if from == to {
        return Ok(());
    }
    if !cdt.can_add_constraint(from, to) {
        return Err(TessellationError::CrossingConstraint(from.index(), to.index()).into());
    }
    cdt.add_constraint(from, to);
    Ok(())
}

fn undirected(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Classifies which inner faces of the CDT are inside a region using flood-fill.
///
/// Starts from faces adjacent to the outer (infinite) face at depth 0. Each time
/// an edge for which `is_boundary(from, to)` holds is crossed, depth increments.
/// Odd depth = interior. Other constraint edges (cut lines inside the region)
/// are crossed freely.
pub(crate) fn classify_interior_faces(
    cdt: &Cdt,
    is_boundary: impl Fn(usize, usize) -> bool,
) -> HashSet<usize> {
    let mut interior = HashSet::new();
    let mut depth_map: HashMap<usize, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<InnerTag>, u32)> = VecDeque::new();

    let outer_fix = cdt.outer_face().fix();

    // Seed: find inner faces adjacent to the outer face via directed edges
    for edge in cdt.directed_edges() {
        if edge.face().fix() == outer_fix {
            let rev_face = edge.rev().face();
            if let Some(inner) = rev_face.as_inner() {
                let idx = inner.fix().index();
                if depth_map.contains_key(&idx) {
                    continue;
                }
                let depth = u32::from(is_boundary(
                    edge.from().fix().index(),
                    edge.to().fix().index(),
                ));
                depth_map.insert(idx, depth);
                if depth % 2 == 1 {
                    interior.insert(idx);
                }
                queue.push_back((inner.fix(), depth));
            }
        }
    }

    // BFS flood-fill
    while let Some((face_fix, depth)) = queue.pop_front() {
        let face = cdt.face(face_fix);
        for edge in face.adjacent_edges() {
            let neighbor = edge.rev().face();
            if let Some(inner_neighbor) = neighbor.as_inner() {
                let n_idx = inner_neighbor.fix().index();
                if depth_map.contains_key(&n_idx) {
                    continue;
                }
                let crosses = is_boundary(edge.from().fix().index(), edge.to().fix().index());
                let new_depth = if crosses { depth + 1 } else { depth };
                depth_map.insert(n_idx, new_depth);
                if new_depth % 2 == 1 {
                    interior.insert(n_idx);
                }
                queue.push_back((inner_neighbor.fix(), new_depth));
            }
        }
    }

    interior
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ForgeError;
    use crate::math::predicates::orient2d;

    fn area(points: &[[f64; 2]], tris: &[[usize; 3]]) -> f64 {
        tris.iter()
            .map(|t| orient2d(points[t[0]], points[t[1]], points[t[2]]) * 0.5)
            .sum()
    }

    #[test]
    fn square_gives_two_triangles() {
        let pts = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let tris = triangulate_polygon(&pts).unwrap();
        assert_eq!(tris.len(), 2);
        assert!((area(&pts, &tris) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn concave_polygon_excludes_notch() {
        // U shape: the notch between the arms must stay empty.
        let pts = [
            [0.0, 0.0],
            [3.0, 0.0],
            [3.0, 3.0],
            [2.0, 3.0],
            [2.0, 1.0],
            [1.0, 1.0],
            [1.0, 3.0],
            [0.0, 3.0],
        ];
        let tris = triangulate_polygon(&pts).unwrap();
        assert_eq!(tris.len(), pts.len() - 2);
        assert!((area(&pts, &tris) - 7.0).abs() < 1e-12);
        for t in &tris {
            assert!(orient2d(pts[t[0]], pts[t[1]], pts[t[2]]) > 0.0);
        }
    }

    #[test]
    fn duplicate_point_is_rejected() {
        let pts = [[0.0, 0.0], [1.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        let result = triangulate_polygon(&pts);
        assert!(matches!(
            result,
            Err(ForgeError::Tessellation(TessellationError::DuplicatePoint(2)))
        ));
    }

    #[test]
    fn too_few_points_are_rejected() {
        assert!(triangulate_polygon(&[[0.0, 0.0], [1.0, 0.0]]).is_err());
    }
}
