use std::collections::VecDeque;

use crate::error::{RepairError, Result};
use crate::topology::{edge_key, Mesh};

/// Returns `true` if `tri` traverses the edge `a -> b`.
fn traverses(tri: [u32; 3], a: u32, b: u32) -> bool {
    (0..3).any(|k| tri[k] == a && tri[(k + 1) % 3] == b)
}

/// Makes the winding consistent across each edge-connected component, then
/// flips any component whose enclosed volume comes out negative.
///
/// Returns the number of triangles flipped.
///
/// # Errors
///
/// Returns [`RepairError::NonOrientable`] if some component cannot be
/// oriented consistently.
pub(super) fn orient_outward(mesh: &mut Mesh) -> Result<usize> {
    let edge_faces = mesh.edge_faces();
    let count = mesh.triangles.len();
    let mut component: Vec<Option<usize>> = vec![None; count];
    let mut flipped = 0;
    let mut components = 0;
    let mut queue = VecDeque::new();

    for seed in 0..count {
        if component[seed].is_some() {
            continue;
        }
        component[seed] = Some(components);
        queue.push_back(seed);
        while let Some(t) = queue.pop_front() {
            let tri = mesh.triangles[t];
            for k in 0..3 {
                let (a, b) = (tri[k], tri[(k + 1) % 3]);
                let Some(neighbors) = edge_faces.get(&edge_key(a, b)) else {
                    continue;
                };
                for &n in neighbors {
                    if n == t {
                        continue;
                    }
                    // A consistent neighbor runs the shared edge b -> a.
                    let agrees = !traverses(mesh.triangles[n], a, b);
                    match component[n] {
                        Some(_) if !agrees => return Err(RepairError::NonOrientable.into()),
                        Some(_) => {}
                        None => {
                            if !agrees {
                                mesh.triangles[n].swap(1, 2);
                                flipped += 1;
                            }
                            component[n] = Some(components);
                            queue.push_back(n);
                        }
                    }
                }
            }
        }
        components += 1;
    }

    let mut volumes = vec![0.0; components];
    for (t, c) in component.iter().enumerate() {
        let [v0, v1, v2] = mesh.corners(t);
        if let Some(c) = c {
            volumes[*c] += v0.coords.dot(&v1.coords.cross(&v2.coords));
        }
    }
    for (t, c) in component.iter().enumerate() {
        if matches!(c, Some(c) if volumes[*c] < 0.0) {
            mesh.triangles[t].swap(1, 2);
            flipped += 1;
        }
    }
    Ok(flipped)
}
