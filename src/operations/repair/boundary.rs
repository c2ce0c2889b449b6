use std::collections::{BTreeMap, HashSet};

use crate::error::{RepairError, Result};
use crate::topology::Mesh;

/// Groups the mesh's boundary edges into closed vertex loops.
///
/// Each loop is ordered so that it runs opposite to the faces bordering it,
/// which is the winding a cap over the opening needs.
///
/// # Errors
///
/// Returns [`RepairError::NonManifoldEdge`] if an edge borders more than two
/// faces, and [`RepairError::OpenBoundaryChain`] if boundary edges meet at a
/// vertex more than twice or fail to close.
pub(super) fn boundary_loops(mesh: &Mesh) -> Result<Vec<Vec<u32>>> {
    let edge_faces = mesh.edge_faces();

    // Ordered so loop discovery does not depend on hash iteration order.
    let mut adjacency: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    let mut directed: HashSet<(u32, u32)> = HashSet::new();
    for (&(a, b), faces) in &edge_faces {
        match faces.len() {
            1 => {
                adjacency.entry(a).or_default().push(b);
                adjacency.entry(b).or_default().push(a);
                let tri = mesh.triangles[faces[0]];
                for k in 0..3 {
                    let (from, to) = (tri[k], tri[(k + 1) % 3]);
                    if (from == a && to == b) || (from == b && to == a) {
                        directed.insert((from, to));
                    }
                }
            }
            2 => {}
            _ => return Err(RepairError::NonManifoldEdge(a, b).into()),
        }
    }
    if let Some((&v, _)) = adjacency.iter().find(|(_, n)| n.len() != 2) {
        return Err(RepairError::OpenBoundaryChain(v).into());
    }

    let mut visited: HashSet<u32> = HashSet::new();
    let mut loops = Vec::new();
    for (&start, neighbors) in &adjacency {
        if visited.contains(&start) {
            continue;
        }
        let mut chain = vec![start];
        visited.insert(start);
        let (mut prev, mut cur) = (start, neighbors[0]);
        while cur != start {
            if !visited.insert(cur) {
                return Err(RepairError::OpenBoundaryChain(cur).into());
            }
            chain.push(cur);
            let next = &adjacency[&cur];
            let step = if next[0] == prev { next[1] } else { next[0] };
            prev = cur;
            cur = step;
        }
        if chain.len() < 3 {
            return Err(RepairError::OpenBoundaryChain(start).into());
        }
        if directed.contains(&(chain[0], chain[1])) {
            chain.reverse();
        }
        loops.push(chain);
    }
    Ok(loops)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ForgeError;
    use crate::host::Primitive;

    #[test]
    fn missing_cap_triangle_gives_one_loop() {
        let mut mesh = Primitive::cuboid(1.0, 1.0, 1.0).mesh().unwrap();
        let removed = mesh.triangles.remove(0);
        let loops = boundary_loops(&mesh).unwrap();
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 3);

        // The loop runs the same way as the removed triangle.
        let l = &loops[0];
        let pos = removed.iter().position(|&v| v == l[0]).unwrap();
        assert_eq!(removed[(pos + 1) % 3], l[1]);
    }

    #[test]
    fn closed_mesh_has_no_loops() {
        let mesh = Primitive::cylinder(1.0, 1.0, 8).mesh().unwrap();
        assert!(boundary_loops(&mesh).unwrap().is_empty());
    }

    #[test]
    fn fin_edge_is_non_manifold() {
        let mut mesh = Primitive::cuboid(1.0, 1.0, 1.0).mesh().unwrap();
        let first = mesh.triangles[0];
        mesh.vertices.push(crate::math::Point3::new(5.0, 5.0, 5.0));
        mesh.triangles.push([first[0], first[1], 8]);
        assert!(matches!(
            boundary_loops(&mesh),
            Err(ForgeError::Repair(RepairError::NonManifoldEdge(_, _)))
        ));
    }
}
