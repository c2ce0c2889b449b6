use crate::math::Point3;

use super::mesh::Mesh;

slotmap::new_key_type! {
    /// Unique identifier for a solid held by a geometry host.
    pub struct SolidId;
}

/// A named triangle-mesh solid.
///
/// `manifold` caches whether the mesh is a closed, consistently oriented
/// two-manifold; it is refreshed by [`SolidData::set_mesh`].
#[derive(Debug, Clone)]
pub struct SolidData {
    /// Human-readable name, used in logs.
    pub name: String,
    mesh: Mesh,
    manifold: bool,
}

impl SolidData {
    /// Wraps a mesh, computing its manifold flag.
    #[must_use]
    pub fn new(name: impl Into<String>, mesh: Mesh) -> Self {
        let manifold = mesh.is_closed_manifold();
        Self {
            name: name.into(),
            mesh,
            manifold,
        }
    }

    /// Returns the mesh.
    #[must_use]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Returns whether the mesh is a closed two-manifold.
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.manifold
    }

    /// Replaces the mesh and recomputes the manifold flag.
    pub fn set_mesh(&mut self, mesh: Mesh) {
        self.manifold = mesh.is_closed_manifold();
        self.mesh = mesh;
    }

    /// Applies `f` to every vertex position. Winding is unaffected, so the
    /// manifold flag is kept.
    pub fn map_vertices(&mut self, f: impl Fn(&Point3) -> Point3) {
        for v in &mut self.mesh.vertices {
            *v = f(v);
        }
    }

    /// Consumes the solid, returning its mesh.
    #[must_use]
    pub fn into_mesh(self) -> Mesh {
        self.mesh
    }
}
