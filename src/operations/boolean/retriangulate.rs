use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use spade::handles::FixedVertexHandle;
use spade::{Point2 as SpadePoint2, Triangulation};

use crate::error::{BooleanError, ForgeError, Result};
use crate::math::{axis_component, dominant_axis, project_along};
use crate::tessellation::{add_constraint_checked, classify_interior_faces, Cdt};
use crate::topology::edge_key;

use super::intersect::{Arrangement, Intersections};

/// A piece of an operand triangle after splitting along the cut curves.
#[derive(Debug, Clone, Copy)]
pub(super) struct Fragment {
    pub tri: [u32; 3],
    /// Index of the operand triangle it came from.
    pub source: usize,
}

/// Splits every triangle touched by an intersection so that all cut
/// segments become mesh edges. Untouched triangles pass through.
///
/// # Errors
///
/// Returns [`BooleanError::Retriangulation`] if a triangle cannot be split
/// consistently.
pub(super) fn retriangulate(arr: &Arrangement<'_>, inter: &Intersections) -> Result<Vec<Fragment>> {
    let pieces: Vec<Vec<Fragment>> = (0..arr.triangles.len())
        .into_par_iter()
        .map(|t| -> Result<Vec<Fragment>> {
            let tri = arr.triangles[t];
            if !inter.touches(t, tri) {
                return Ok(vec![Fragment { tri, source: t }]);
            }
            let split = split_triangle(arr, inter, t)?;
            Ok(split
                .into_iter()
                .map(|tri| Fragment { tri, source: t })
                .collect())
        })
        .collect::<Result<_>>()?;
    Ok(pieces.into_iter().flatten().collect())
}

fn failure(t: usize, reason: impl std::fmt::Display) -> ForgeError {
    BooleanError::Retriangulation(format!("triangle {t}: {reason}")).into()
}

fn undirected(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

/// Triangulates one operand triangle together with the points and segments
/// the other operand leaves on it.
fn split_triangle(arr: &Arrangement<'_>, inter: &Intersections, t: usize) -> Result<Vec<[u32; 3]>> {
    let tri = arr.triangles[t];
    let [c0, c1, c2] = arr.corners(t);
    let normal = (c1 - c0).cross(&(c2 - c0));
    let axis = dominant_axis(&normal);
    let reversed = axis_component(&normal, axis) < 0.0;

    // Corners and edge points in boundary order.
    let mut chain: Vec<u32> = Vec::new();
    for k in 0..3 {
        let (a, b) = (tri[k], tri[(k + 1) % 3]);
        chain.push(a);
        if let Some(points) = inter.edge_points.get(&edge_key(a, b)) {
            let mut sorted = points.clone();
            sorted.sort_by(|x, y| x.0.total_cmp(&y.0));
            if a > b {
                sorted.reverse();
            }
            chain.extend(sorted.into_iter().map(|(_, id)| id));
        }
    }
    let interior = inter.face_points.get(&t).map_or(&[][..], Vec::as_slice);

    let mut cdt = Cdt::new();
    let mut handle_of: HashMap<u32, FixedVertexHandle> = HashMap::new();
    let mut global_of: HashMap<usize, u32> = HashMap::new();
    for &id in chain.iter().chain(interior) {
        let q = project_along(&arr.positions[id as usize], axis);
        let before = cdt.num_vertices();
        let handle = cdt
            .insert(SpadePoint2::new(q[0], q[1]))
            .map_err(|e| failure(t, e))?;
        if cdt.num_vertices() == before {
            return Err(failure(t, format!("point {id} coincides with another point")));
        }
        handle_of.insert(id, handle);
        global_of.insert(handle.index(), id);
    }

    let mut constrain = |a: FixedVertexHandle, b: FixedVertexHandle| -> Result<()> {
        add_constraint_checked(&mut cdt, a, b).map_err(|e| failure(t, e))?;
        if cdt.get_edge_from_neighbors(a, b).is_none() {
            return Err(failure(t, "constraint passes through another point"));
        }
        Ok(())
    };

    let mut boundary: HashSet<(usize, usize)> = HashSet::with_capacity(chain.len());
    for i in 0..chain.len() {
        let a = handle_of[&chain[i]];
        let b = handle_of[&chain[(i + 1) % chain.len()]];
        constrain(a, b)?;
        boundary.insert(undirected(a.index(), b.index()));
    }
    for &[p, q] in inter.segments.get(&t).map_or(&[][..], Vec::as_slice) {
        let (Some(&a), Some(&b)) = (handle_of.get(&p), handle_of.get(&q)) else {
            return Err(failure(t, "cut segment endpoint is not on the triangle"));
        };
        constrain(a, b)?;
    }

    let inside = classify_interior_faces(&cdt, |a, b| boundary.contains(&undirected(a, b)));
    let mut out = Vec::with_capacity(inside.len());
    for face in cdt.inner_faces() {
        if !inside.contains(&face.fix().index()) {
            continue;
        }
        let [a, b, c] = face.vertices().map(|v| global_of[&v.fix().index()]);
        out.push(if reversed { [a, c, b] } else { [a, b, c] });
    }
    Ok(out)
}
