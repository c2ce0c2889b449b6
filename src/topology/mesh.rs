use std::collections::HashMap;

use crate::geometry::Aabb;
use crate::math::{Point3, Vector3};

/// Undirected edge key, smaller vertex index first.
pub type EdgeKey = (u32, u32);

/// Returns the undirected key of the edge between `a` and `b`.
#[must_use]
pub fn edge_key(a: u32, b: u32) -> EdgeKey {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// A triangle mesh with counter-clockwise (outward) winding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Triangle vertex indices.
    pub triangles: Vec<[u32; 3]>,
}

impl Mesh {
    /// Creates a mesh from vertices and triangles.
    #[must_use]
    pub fn new(vertices: Vec<Point3>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            triangles,
        }
    }

    /// Returns `true` if the mesh has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Returns the three corner positions of triangle `t`.
    #[must_use]
    pub fn corners(&self, t: usize) -> [Point3; 3] {
        let [a, b, c] = self.triangles[t];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    /// Unnormalized normal of triangle `t` (twice its area in length).
    #[must_use]
    pub fn triangle_normal(&self, t: usize) -> Vector3 {
        let [a, b, c] = self.corners(t);
        (b - a).cross(&(c - a))
    }

    /// Bounding box of all vertices.
    #[must_use]
    pub fn aabb(&self) -> Option<Aabb> {
        Aabb::from_points(&self.vertices)
    }

    /// Reverses the winding of every triangle.
    pub fn flip(&mut self) {
        for tri in &mut self.triangles {
            tri.swap(1, 2);
        }
    }

    /// Maps every undirected edge to the triangles that use it.
    #[must_use]
    pub fn edge_faces(&self) -> HashMap<EdgeKey, Vec<usize>> {
        let mut map: HashMap<EdgeKey, Vec<usize>> = HashMap::new();
        for (t, tri) in self.triangles.iter().enumerate() {
            for k in 0..3 {
                map.entry(edge_key(tri[k], tri[(k + 1) % 3]))
                    .or_default()
                    .push(t);
            }
        }
        map
    }

    /// Counts how often each directed edge occurs.
    #[must_use]
    pub fn directed_edge_counts(&self) -> HashMap<(u32, u32), usize> {
        let mut counts = HashMap::new();
        for tri in &self.triangles {
            for k in 0..3 {
                *counts.entry((tri[k], tri[(k + 1) % 3])).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Returns `true` if every edge borders exactly two triangles that traverse
    /// it in opposite directions (closed, two-manifold, consistently oriented).
    #[must_use]
    pub fn is_closed_manifold(&self) -> bool {
        if self.triangles.is_empty() {
            return false;
        }
        let counts = self.directed_edge_counts();
        counts
            .iter()
            .all(|(&(a, b), &n)| n == 1 && counts.get(&(b, a)) == Some(&1))
    }

    /// Appends `other`, offsetting its indices.
    #[allow(clippy::cast_possible_truncation)]
    pub fn append(&mut self, other: &Self) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.triangles.extend(
            other
                .triangles
                .iter()
                .map(|t| [t[0] + offset, t[1] + offset, t[2] + offset]),
        );
    }
}
