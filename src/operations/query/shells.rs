use std::collections::VecDeque;

use crate::topology::{edge_key, EdgeKey, Mesh};

/// Number of edge-connected triangle groups in `mesh`.
#[must_use]
pub fn shell_count(mesh: &Mesh) -> usize {
    let edge_faces = mesh.edge_faces();
    let mut seen = vec![false; mesh.triangles.len()];
    let mut shells = 0;
    let mut queue = VecDeque::new();

    for start in 0..mesh.triangles.len() {
        if seen[start] {
            continue;
        }
        shells += 1;
        seen[start] = true;
        queue.push_back(start);
        while let Some(t) = queue.pop_front() {
            let tri = mesh.triangles[t];
            for k in 0..3 {
                let Some(neighbors) = edge_faces.get(&edge_key(tri[k], tri[(k + 1) % 3])) else {
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
    }
    shells
}

/// Edges used by exactly one triangle, sorted.
#[must_use]
pub fn boundary_edges(mesh: &Mesh) -> Vec<EdgeKey> {
    let mut edges: Vec<EdgeKey> = mesh
        .edge_faces()
        .into_iter()
        .filter(|(_, faces)| faces.len() == 1)
        .map(|(edge, _)| edge)
        .collect();
    edges.sort_unstable();
    edges
}

/// Euler characteristic `V - E + F`, counting only referenced vertices.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn euler_characteristic(mesh: &Mesh) -> i64 {
    let mut used = vec![false; mesh.vertices.len()];
    for tri in &mesh.triangles {
        for &v in tri {
            used[v as usize] = true;
        }
    }
    let v = used.iter().filter(|&&u| u).count() as i64;
    let e = mesh.edge_faces().len() as i64;
    let f = mesh.triangles.len() as i64;
    v - e + f
}
