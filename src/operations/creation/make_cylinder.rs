use std::f64::consts::TAU;

use crate::error::{OperationError, Result};
use crate::math::{Point3, TOLERANCE};
use crate::topology::Mesh;

/// Builds a faceted cylinder along Z, centered at the origin.
///
/// Rim vertex `i` of each ring sits at angle `phase + 2πi/segments`. Caps are
/// fans around a center vertex, giving `2n + 2` vertices and `4n` triangles.
pub struct MakeCylinder {
    radius: f64,
    depth: f64,
    segments: usize,
    phase: f64,
}

impl MakeCylinder {
    /// Creates a new `MakeCylinder` operation with the rim starting half a
    /// segment off the +X axis.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(radius: f64, depth: f64, segments: usize) -> Self {
        Self {
            radius,
            depth,
            segments,
            phase: std::f64::consts::PI / segments.max(1) as f64,
        }
    }

    /// Overrides the angle of the first rim vertex.
    #[must_use]
    pub fn with_phase(mut self, phase: f64) -> Self {
        self.phase = phase;
        self
    }

    /// Executes the operation, returning a closed cylinder mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius or depth is not positive, or fewer than
    /// three segments are requested.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn execute(&self) -> Result<Mesh> {
        if self.radius <= TOLERANCE || !self.radius.is_finite() {
            return Err(OperationError::InvalidInput(format!(
                "cylinder radius must be positive, got {}",
                self.radius
            ))
            .into());
        }
        if self.depth <= TOLERANCE || !self.depth.is_finite() {
            return Err(OperationError::InvalidInput(format!(
                "cylinder depth must be positive, got {}",
                self.depth
            ))
            .into());
        }
        if self.segments < 3 {
            return Err(OperationError::InvalidInput(format!(
                "cylinder needs at least 3 segments, got {}",
                self.segments
            ))
            .into());
        }

        let n = self.segments;
        let half = self.depth * 0.5;
        let mut vertices = Vec::with_capacity(2 * n + 2);
        for z in [-half, half] {
            for i in 0..n {
                let angle = self.phase + TAU * i as f64 / n as f64;
                vertices.push(Point3::new(
                    self.radius * angle.cos(),
                    self.radius * angle.sin(),
                    z,
                ));
            }
        }
        vertices.push(Point3::new(0.0, 0.0, -half));
        vertices.push(Point3::new(0.0, 0.0, half));

        let n32 = n as u32;
        let (bottom_center, top_center) = (2 * n32, 2 * n32 + 1);
        let mut triangles = Vec::with_capacity(4 * n);
        for i in 0..n32 {
            let j = (i + 1) % n32;
            let (bi, bj, ti, tj) = (i, j, n32 + i, n32 + j);
            triangles.push([bi, bj, tj]);
            triangles.push([bi, tj, ti]);
            triangles.push([bottom_center, bj, bi]);
            triangles.push([top_center, ti, tj]);
        }
        Ok(Mesh::new(vertices, triangles))
    }
}
