pub mod mesh;
pub mod solid;

pub use mesh::{edge_key, EdgeKey, Mesh};
pub use solid::{SolidData, SolidId};

use crate::error::HostError;
use slotmap::SlotMap;

/// Arena that owns every solid a part is working with.
///
/// Solids are referenced via typed IDs (generational indices); removing a
/// solid invalidates its ID, so a consumed tool can never be read again.
#[derive(Debug, Default)]
pub struct SolidStore {
    solids: SlotMap<SolidId, SolidData>,
}

impl SolidStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a solid and returns its ID.
    pub fn add_solid(&mut self, data: SolidData) -> SolidId {
        self.solids.insert(data)
    }

    /// Returns a reference to the solid data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid is not in the store.
    pub fn solid(&self, id: SolidId) -> Result<&SolidData, HostError> {
        self.solids
            .get(id)
            .ok_or_else(|| HostError::SolidNotFound(format!("{id:?}")))
    }

    /// Returns a mutable reference to the solid data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid is not in the store.
    pub fn solid_mut(&mut self, id: SolidId) -> Result<&mut SolidData, HostError> {
        self.solids
            .get_mut(id)
            .ok_or_else(|| HostError::SolidNotFound(format!("{id:?}")))
    }

    /// Removes a solid, handing ownership to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid is not in the store.
    pub fn remove_solid(&mut self, id: SolidId) -> Result<SolidData, HostError> {
        self.solids
            .remove(id)
            .ok_or_else(|| HostError::SolidNotFound(format!("{id:?}")))
    }

    /// Returns `true` if `id` refers to a live solid.
    #[must_use]
    pub fn contains(&self, id: SolidId) -> bool {
        self.solids.contains_key(id)
    }

    /// Number of live solids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.solids.len()
    }

    /// Returns `true` if the store holds no solids.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }

    /// Drops every solid.
    pub fn clear(&mut self) {
        self.solids.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn removed_solid_is_gone() {
        let mut store = SolidStore::new();
        let id = store.add_solid(SolidData::new("empty", Mesh::default()));
        assert!(store.contains(id));
        let data = store.remove_solid(id).unwrap();
        assert_eq!(data.name, "empty");
        assert!(!store.contains(id));
        assert!(store.solid(id).is_err());
        assert!(store.remove_solid(id).is_err());
    }

    #[test]
    fn empty_mesh_is_not_manifold() {
        let data = SolidData::new("empty", Mesh::default());
        assert!(!data.is_manifold());
    }
}
