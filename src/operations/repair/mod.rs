//! Closing and orienting open meshes so they can serve as boolean operands.

mod boundary;
mod cap;
mod orient;

pub use cap::PLANARITY_TOLERANCE;

use tracing::{debug, warn};

use crate::error::{RepairError, Result};
use crate::topology::Mesh;

/// Outcome of a repair: the closed mesh plus any problems that were worked
/// around rather than fixed.
#[derive(Debug, Clone)]
pub struct RepairReport {
    /// The capped, outward-oriented mesh.
    pub mesh: Mesh,
    /// Number of boundary loops that were capped.
    pub loops_capped: usize,
    /// Number of triangles whose winding was reversed.
    pub triangles_flipped: usize,
    /// Loops that were only fan-capped. Empty for a clean repair.
    pub flags: Vec<RepairError>,
}

impl RepairReport {
    /// Returns `true` if every loop was capped without a flag.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.flags.is_empty()
    }
}

/// Caps every boundary loop of a mesh and orients it outward.
pub struct Repair {
    mesh: Mesh,
}

impl Repair {
    /// Creates a new `Repair` operation.
    #[must_use]
    pub fn new(mesh: Mesh) -> Self {
        Self { mesh }
    }

    /// Executes the repair.
    ///
    /// Non-planar and self-intersecting loops are fan-capped and reported in
    /// [`RepairReport::flags`]; the caller decides whether that is acceptable.
    ///
    /// # Errors
    ///
    /// Returns a [`RepairError`] if an edge borders more than two faces, the
    /// boundary does not split into closed loops, or the mesh is not
    /// orientable.
    pub fn execute(self) -> Result<RepairReport> {
        repair_mesh(self.mesh)
    }
}

/// Caps every boundary loop of `mesh` and orients it outward.
///
/// # Errors
///
/// See [`Repair::execute`].
pub fn repair_mesh(mut mesh: Mesh) -> Result<RepairReport> {
    let loops = boundary::boundary_loops(&mesh)?;
    let mut flags = Vec::new();
    for (index, ring) in loops.iter().enumerate() {
        let (caps, flag) = cap::cap_loop(&mut mesh.vertices, ring, index);
        mesh.triangles.extend(caps);
        if let Some(flag) = flag {
            warn!(loop_index = index, %flag, "boundary loop fan-capped");
            flags.push(flag);
        }
    }

    let triangles_flipped = orient::orient_outward(&mut mesh)?;
    debug!(
        loops = loops.len(),
        triangles_flipped,
        triangles = mesh.triangles.len(),
        "mesh repaired"
    );
    Ok(RepairReport {
        mesh,
        loops_capped: loops.len(),
        triangles_flipped,
        flags,
    })
}
