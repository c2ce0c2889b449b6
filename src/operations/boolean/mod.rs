//! Exact mesh booleans.
//!
//! Operands are cut against each other with exact orientation tests, split
//! into patches along the cut curves, and reassembled by keeping the patches
//! each operation calls for. Touching or coplanar operands are refused
//! rather than guessed at; callers keep a small overlap or clearance between
//! parts instead.

mod classify;
mod engine;
mod intersect;
mod retriangulate;
mod select;
mod validate;

pub use classify::{classify_point, winding_number, PointClassification};
pub use engine::boolean_mesh;
pub use select::{should_keep_fragment, BooleanOp, KeepDecision, Operand};

use tracing::debug;

use crate::error::Result;
use crate::host::GeometryHost;
use crate::topology::SolidId;

/// Applies a boolean operation to a target solid, consuming the tool.
///
/// The target keeps its id and receives the result. The tool is removed
/// from the host before the computation starts, so it is gone whether or
/// not the operation succeeds.
pub struct Boolean {
    target: SolidId,
    tool: SolidId,
    op: BooleanOp,
}

impl Boolean {
    /// Creates a new `Boolean` operation.
    #[must_use]
    pub fn new(target: SolidId, tool: SolidId, op: BooleanOp) -> Self {
        Self { target, tool, op }
    }

    /// Executes the operation, replacing the target's mesh in place.
    ///
    /// # Errors
    ///
    /// Returns an error if either solid is missing or the boolean fails. On
    /// failure the target is left unchanged.
    pub fn execute(&self, host: &mut impl GeometryHost) -> Result<()> {
        let tool = host.destroy(self.tool)?.into_mesh();
        let target = host.solid(self.target)?;
        let result = boolean_mesh(target.mesh(), &tool, self.op)?;
        debug!(
            op = ?self.op,
            target = %target.name,
            triangles = result.triangles.len(),
            "boolean applied"
        );
        host.solid_mut(self.target)?.set_mesh(result);
        Ok(())
    }
}
