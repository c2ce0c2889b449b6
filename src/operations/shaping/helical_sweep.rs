use std::f64::consts::TAU;

use crate::error::{Result, SweepError};
use crate::geometry::{Plane, Profile};
use crate::math::{orthonormal_frame, Point3, Vector3};
use crate::topology::Mesh;

/// Minimum number of profile copies per turn.
pub const MIN_STEPS_PER_TURN: usize = 8;

/// Sweeps a cross-section along a helix around an axis through the origin.
///
/// The profile must lie in [`Plane::radial_xz`]; its coordinates are read as
/// `(radial distance, axial offset)` and any other plane is rejected. Each
/// step rotates the copy by `2π / steps_per_turn` and advances it by
/// `pitch / steps_per_turn`. The ribbon is left open at both ends; it must be
/// repaired before it can take part in a boolean.
pub struct HelicalSweep<'a> {
    profile: &'a Profile,
    axis: Vector3,
    pitch: f64,
    turns: f64,
    steps_per_turn: usize,
    phase: f64,
}

impl<'a> HelicalSweep<'a> {
    /// Creates a new `HelicalSweep` operation starting at angle zero.
    #[must_use]
    pub fn new(
        profile: &'a Profile,
        axis: Vector3,
        pitch: f64,
        turns: f64,
        steps_per_turn: usize,
    ) -> Self {
        Self {
            profile,
            axis,
            pitch,
            turns,
            steps_per_turn,
            phase: 0.0,
        }
    }

    /// Sets the angle of the first profile copy.
    #[must_use]
    pub fn with_phase(mut self, phase: f64) -> Self {
        self.phase = phase;
        self
    }

    /// Number of steps taken: `turns * steps_per_turn`, rounded up.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn step_count(&self) -> usize {
        (self.turns * self.steps_per_turn as f64).ceil() as usize
    }

    /// Executes the sweep, returning the open ribbon mesh.
    ///
    /// # Errors
    ///
    /// Returns a [`SweepError`] for a non-positive pitch or turn count, fewer
    /// than [`MIN_STEPS_PER_TURN`] steps, a zero axis, a profile outside the
    /// radial half-plane, or a profile vertex on or behind the axis.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn execute(&self) -> Result<Mesh> {
        if self.pitch <= 0.0 || !self.pitch.is_finite() {
            return Err(SweepError::NonPositivePitch(self.pitch).into());
        }
        if self.turns <= 0.0 || !self.turns.is_finite() {
            return Err(SweepError::NonPositiveTurns(self.turns).into());
        }
        if self.steps_per_turn < MIN_STEPS_PER_TURN {
            return Err(SweepError::TooFewSteps(self.steps_per_turn).into());
        }
        let (u, v, w) = orthonormal_frame(&self.axis).ok_or(SweepError::ZeroAxis)?;
        if *self.profile.plane() != Plane::radial_xz() {
            return Err(SweepError::NotRadialProfile.into());
        }
        if let Some(q) = self.profile.points().iter().find(|q| q.x <= 0.0) {
            return Err(SweepError::DegenerateProfile(format!(
                "radial coordinate {} must be positive",
                q.x
            ))
            .into());
        }

        let n = self.profile.len();
        let steps = self.step_count();
        let angle_step = TAU / self.steps_per_turn as f64;
        let rise_step = self.pitch / self.steps_per_turn as f64;

        let mut vertices: Vec<Point3> = Vec::with_capacity((steps + 1) * n);
        for s in 0..=steps {
            let angle = self.phase + s as f64 * angle_step;
            let radial = u * angle.cos() + v * angle.sin();
            let rise = s as f64 * rise_step;
            for q in self.profile.points() {
                vertices.push(Point3::from(radial * q.x + w * (q.y + rise)));
            }
        }

        let n32 = n as u32;
        let mut triangles = Vec::with_capacity(2 * steps * n);
        for s in 0..steps as u32 {
            let (ring, next) = (s * n32, (s + 1) * n32);
            for i in 0..n32 {
                let j = (i + 1) % n32;
                triangles.push([next + i, next + j, ring + j]);
                triangles.push([next + i, ring + j, ring + i]);
            }
        }
        Ok(Mesh::new(vertices, triangles))
    }
}
