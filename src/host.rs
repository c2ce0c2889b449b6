//! The geometry host: where solids live while a part is being built.
//!
//! Pipeline stages only talk to solids through [`GeometryHost`], so a part
//! can be built against any store that owns meshes by [`SolidId`].

use serde::{Deserialize, Serialize};

use crate::error::{HostError, Result};
use crate::math::Point3;
use crate::operations::creation::{MakeBox, MakeCylinder};
use crate::topology::{Mesh, SolidData, SolidId, SolidStore};

/// A solid the host can build from a handful of parameters.
///
/// Both shapes are centered at the origin; cylinders run along Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Cuboid {
        size: [f64; 3],
    },
    Cylinder {
        radius: f64,
        depth: f64,
        segments: usize,
        /// Angle of the first rim vertex; half a segment when absent.
        #[serde(default)]
        phase: Option<f64>,
    },
}

impl Primitive {
    /// A box with the given extents.
    #[must_use]
    pub fn cuboid(x: f64, y: f64, z: f64) -> Self {
        Self::Cuboid { size: [x, y, z] }
    }

    /// A cylinder with the default half-segment phase.
    #[must_use]
    pub fn cylinder(radius: f64, depth: f64, segments: usize) -> Self {
        Self::Cylinder {
            radius,
            depth,
            segments,
            phase: None,
        }
    }

    /// Sets the rim phase of a cylinder; boxes are returned unchanged.
    #[must_use]
    pub fn with_phase(self, angle: f64) -> Self {
        match self {
            Self::Cylinder {
                radius,
                depth,
                segments,
                ..
            } => Self::Cylinder {
                radius,
                depth,
                segments,
                phase: Some(angle),
            },
            cuboid @ Self::Cuboid { .. } => cuboid,
        }
    }

    /// Extent along Z.
    #[must_use]
    pub fn depth(&self) -> f64 {
        match self {
            Self::Cuboid { size } => size[2],
            Self::Cylinder { depth, .. } => *depth,
        }
    }

    /// Returns the same primitive lengthened along Z by `delta`.
    #[must_use]
    pub fn lengthened(self, delta: f64) -> Self {
        match self {
            Self::Cuboid { size } => Self::Cuboid {
                size: [size[0], size[1], size[2] + delta],
            },
            Self::Cylinder {
                radius,
                depth,
                segments,
                phase,
            } => Self::Cylinder {
                radius,
                depth: depth + delta,
                segments,
                phase,
            },
        }
    }

    /// Builds the primitive's mesh.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::InvalidPrimitive`] if a dimension is not positive
    /// or a cylinder has fewer than three segments.
    pub fn mesh(&self) -> Result<Mesh> {
        let built = match *self {
            Self::Cuboid { size } => {
                let half = Point3::new(size[0], size[1], size[2]) * 0.5;
                MakeBox::new(-half, half).execute()
            }
            Self::Cylinder {
                radius,
                depth,
                segments,
                phase,
            } => {
                let op = MakeCylinder::new(radius, depth, segments);
                match phase {
                    Some(angle) => op.with_phase(angle).execute(),
                    None => op.execute(),
                }
            }
        };
        built.map_err(|e| HostError::InvalidPrimitive(e.to_string()).into())
    }
}

/// Owns solids on behalf of the pipeline.
///
/// Operations borrow a host mutably for the duration of one call and hand
/// back plain [`SolidId`]s.
pub trait GeometryHost {
    /// Registers a mesh as a new solid.
    ///
    /// # Errors
    ///
    /// Implementations may refuse meshes they cannot hold.
    fn create_from_mesh(&mut self, name: &str, mesh: Mesh) -> Result<SolidId>;

    /// Removes a solid and returns its data.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::SolidNotFound`] if the solid does not exist.
    fn destroy(&mut self, solid: SolidId) -> Result<SolidData>;

    /// Borrows a solid.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::SolidNotFound`] if the solid does not exist.
    fn solid(&self, solid: SolidId) -> Result<&SolidData>;

    /// Mutably borrows a solid.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::SolidNotFound`] if the solid does not exist.
    fn solid_mut(&mut self, solid: SolidId) -> Result<&mut SolidData>;

    /// Builds a primitive and registers it.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::InvalidPrimitive`] for bad dimensions.
    fn create_primitive(&mut self, name: &str, primitive: &Primitive) -> Result<SolidId> {
        let mesh = primitive.mesh()?;
        self.create_from_mesh(name, mesh)
    }
}

impl GeometryHost for SolidStore {
    fn create_from_mesh(&mut self, name: &str, mesh: Mesh) -> Result<SolidId> {
        Ok(self.add_solid(SolidData::new(name, mesh)))
    }

    fn destroy(&mut self, solid: SolidId) -> Result<SolidData> {
        Ok(self.remove_solid(solid)?)
    }

    fn solid(&self, solid: SolidId) -> Result<&SolidData> {
        Ok(SolidStore::solid(self, solid)?)
    }

    fn solid_mut(&mut self, solid: SolidId) -> Result<&mut SolidData> {
        Ok(SolidStore::solid_mut(self, solid)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ForgeError;

    #[test]
    fn primitives_are_manifold_solids() {
        let mut store = SolidStore::new();
        let cube = store
            .create_primitive("cube", &Primitive::cuboid(1.0, 2.0, 3.0))
            .unwrap();
        let rod = store
            .create_primitive("rod", &Primitive::cylinder(0.5, 2.0, 16))
            .unwrap();
        assert!(GeometryHost::solid(&store, cube).unwrap().is_manifold());
        assert!(GeometryHost::solid(&store, rod).unwrap().is_manifold());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn cuboid_is_centered() {
        let aabb = Primitive::cuboid(2.0, 4.0, 6.0).mesh().unwrap().aabb().unwrap();
        assert_eq!(aabb.min, Point3::new(-1.0, -2.0, -3.0));
        assert_eq!(aabb.max, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn bad_primitive_is_reported() {
        let mut store = SolidStore::new();
        let result = store.create_primitive("bad", &Primitive::cylinder(1.0, 1.0, 2));
        assert!(matches!(
            result,
            Err(ForgeError::Host(HostError::InvalidPrimitive(_)))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn destroy_hands_back_the_mesh() {
        let mut store = SolidStore::new();
        let id = store
            .create_primitive("cube", &Primitive::cuboid(1.0, 1.0, 1.0))
            .unwrap();
        let data = store.destroy(id).unwrap();
        assert_eq!(data.mesh().triangles.len(), 12);
        assert!(store.destroy(id).is_err());
    }

    #[test]
    fn lengthened_grows_depth_only() {
        let rod = Primitive::cylinder(1.0, 2.0, 8).with_phase(0.0).lengthened(0.5);
        assert!((rod.depth() - 2.5).abs() < 1e-15);
        assert!(matches!(rod, Primitive::Cylinder { phase: Some(p), .. } if p.abs() < 1e-15));
    }

    #[test]
    fn primitive_parses_from_toml() {
        let rod: Primitive =
            toml::from_str("kind = \"cylinder\"\nradius = 1.0\ndepth = 2.0\nsegments = 12\n")
                .unwrap();
        assert_eq!(rod, Primitive::cylinder(1.0, 2.0, 12));
    }
}
