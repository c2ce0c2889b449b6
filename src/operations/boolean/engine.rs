use std::collections::{HashMap, HashSet, VecDeque};

use rayon::prelude::*;
use tracing::debug;

use crate::error::{BooleanError, Result};
use crate::math::Point3;
use crate::topology::{edge_key, EdgeKey, Mesh};

use super::classify::classify_point;
use super::intersect::{intersect, Arrangement, Intersections};
use super::retriangulate::{retriangulate, Fragment};
use super::select::{should_keep_fragment, BooleanOp, KeepDecision, Operand};
use super::validate::validate_result;

/// Computes `target op tool` on two closed meshes.
///
/// Runs the full pipeline: intersection, retriangulation, grouping of
/// fragments into patches bounded by cut curves, classification of each
/// patch against the other operand, selection, and validation.
///
/// # Errors
///
/// Returns [`BooleanError::NonManifoldInput`] if an operand is not closed,
/// any error raised while cutting the operands, and the validation errors
/// for results that are empty, open or split into several shells.
pub fn boolean_mesh(target: &Mesh, tool: &Mesh, op: BooleanOp) -> Result<Mesh> {
    if !target.is_closed_manifold() {
        return Err(BooleanError::NonManifoldInput("target").into());
    }
    if !tool.is_closed_manifold() {
        return Err(BooleanError::NonManifoldInput("tool").into());
    }

    let mut arr = Arrangement::new(target, tool);
    let inter = intersect(&mut arr)?;
    let fragments = retriangulate(&arr, &inter)?;
    let patches = group_patches(&arr, &inter, &fragments);

    let decisions: Vec<KeepDecision> = patches
        .par_iter()
        .map(|patch| {
            let source = arr.operand(fragments[patch[0]].source);
            let other = match source {
                Operand::Target => arr.tool,
                Operand::Tool => arr.target,
            };
            let probe = representative_point(&arr, &fragments, patch);
            should_keep_fragment(source, classify_point(other, &probe), op)
        })
        .collect();

    debug!(
        ?op,
        candidate_pairs = inter.candidate_pairs,
        cut_points = arr.positions.len() - target.vertices.len() - tool.vertices.len(),
        fragments = fragments.len(),
        patches = patches.len(),
        kept = decisions.iter().filter(|d| **d != KeepDecision::Discard).count(),
        "boolean arrangement"
    );

    let mesh = compact(&arr, &fragments, &patches, &decisions);
    validate_result(&mesh)?;
    Ok(mesh)
}

/// Groups fragments into patches: edge-connected pieces of one operand that
/// do not cross a cut segment.
fn group_patches(
    arr: &Arrangement<'_>,
    inter: &Intersections,
    fragments: &[Fragment],
) -> Vec<Vec<usize>> {
    let cuts: HashSet<EdgeKey> = inter
        .segments
        .values()
        .flatten()
        .map(|&[a, b]| edge_key(a, b))
        .collect();

    let mut by_edge: HashMap<(Operand, EdgeKey), Vec<usize>> = HashMap::new();
    for (i, f) in fragments.iter().enumerate() {
        let source = arr.operand(f.source);
        for k in 0..3 {
            let key = edge_key(f.tri[k], f.tri[(k + 1) % 3]);
            if !cuts.contains(&key) {
                by_edge.entry((source, key)).or_default().push(i);
            }
        }
    }

    let mut seen = vec![false; fragments.len()];
    let mut patches = Vec::new();
    let mut queue = VecDeque::new();
    for start in 0..fragments.len() {
        if seen[start] {
            continue;
        }
        seen[start] = true;
        queue.push_back(start);
        let mut patch = Vec::new();
        while let Some(i) = queue.pop_front() {
            patch.push(i);
            let f = fragments[i];
            let source = arr.operand(f.source);
            for k in 0..3 {
                let key = edge_key(f.tri[k], f.tri[(k + 1) % 3]);
                let Some(neighbors) = by_edge.get(&(source, key)) else {
                    continue;
                };
                for &n in neighbors {
                    if !seen[n] {
                        seen[n] = true;
                        queue.push_back(n);
                    }
                }
            }
        }
        patches.push(patch);
    }
    patches
}

/// Centroid of the largest fragment in a patch.
fn representative_point(
    arr: &Arrangement<'_>,
    fragments: &[Fragment],
    patch: &[usize],
) -> Point3 {
    let area = |i: usize| {
        let [a, b, c] = fragments[i].tri.map(|v| arr.positions[v as usize]);
        (b - a).cross(&(c - a)).norm_squared()
    };
    let best = patch
        .iter()
        .copied()
        .max_by(|&x, &y| area(x).total_cmp(&area(y)))
        .unwrap_or(patch[0]);
    let [a, b, c] = fragments[best].tri.map(|v| arr.positions[v as usize]);
    Point3::from((a.coords + b.coords + c.coords) / 3.0)
}

/// Collects kept fragments into a fresh mesh with only the vertices they use.
#[allow(clippy::cast_possible_truncation)]
fn compact(
    arr: &Arrangement<'_>,
    fragments: &[Fragment],
    patches: &[Vec<usize>],
    decisions: &[KeepDecision],
) -> Mesh {
    let mut remap: HashMap<u32, u32> = HashMap::new();
    let mut mesh = Mesh::default();
    for (patch, decision) in patches.iter().zip(decisions) {
        if *decision == KeepDecision::Discard {
            continue;
        }
        for &i in patch {
            let [a, b, c] = fragments[i].tri.map(|v| {
                *remap.entry(v).or_insert_with(|| {
                    mesh.vertices.push(arr.positions[v as usize]);
                    (mesh.vertices.len() - 1) as u32
                })
            });
            mesh.triangles.push(if *decision == KeepDecision::KeepFlipped {
                [a, c, b]
            } else {
                [a, b, c]
            });
        }
    }
    mesh
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ForgeError;
    use crate::operations::creation::MakeBox;
    use crate::operations::query::{euler_characteristic, signed_volume};

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn operands() -> (Mesh, Mesh) {
        let cube = MakeBox::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0)).execute().unwrap();
        let bar = MakeBox::new(p(0.5, 0.2, 0.3), p(1.5, 0.65, 0.85)).execute().unwrap();
        (cube, bar)
    }

    fn check(op: BooleanOp, expected: f64) {
        let (cube, bar) = operands();
        let result = boolean_mesh(&cube, &bar, op).unwrap();
        assert!(result.is_closed_manifold());
        assert_eq!(euler_characteristic(&result), 2);
        assert!((signed_volume(&result) - expected).abs() < 1e-9);
    }

    #[test]
    fn union_of_overlapping_boxes() {
        check(BooleanOp::Union, 1.12375);
    }

    #[test]
    fn difference_of_overlapping_boxes() {
        check(BooleanOp::Difference, 0.87625);
    }

    #[test]
    fn intersection_of_overlapping_boxes() {
        check(BooleanOp::Intersection, 0.12375);
    }

    #[test]
    fn disjoint_union_is_two_shells() {
        let (cube, _) = operands();
        let far = MakeBox::new(p(3.0, 0.0, 0.0), p(4.0, 1.0, 1.0)).execute().unwrap();
        assert!(matches!(
            boolean_mesh(&cube, &far, BooleanOp::Union),
            Err(ForgeError::Boolean(BooleanError::MultipleShells(2)))
        ));
        assert!(matches!(
            boolean_mesh(&cube, &far, BooleanOp::Intersection),
            Err(ForgeError::Boolean(BooleanError::EmptyResult))
        ));
    }

    #[test]
    fn open_operand_is_rejected() {
        let (cube, mut bar) = operands();
        bar.triangles.pop();
        assert!(matches!(
            boolean_mesh(&cube, &bar, BooleanOp::Union),
            Err(ForgeError::Boolean(BooleanError::NonManifoldInput("tool")))
        ));
    }

    #[test]
    fn shared_face_is_coincident() {
        let (cube, _) = operands();
        let touching = MakeBox::new(p(1.0, 0.2, 0.3), p(2.0, 0.65, 0.85)).execute().unwrap();
        assert!(matches!(
            boolean_mesh(&cube, &touching, BooleanOp::Union),
            Err(ForgeError::Boolean(BooleanError::CoincidentGeometry(_)))
        ));
    }
}
