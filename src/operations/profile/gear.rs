use std::f64::consts::TAU;

use crate::error::{ProfileError, Result};
use crate::geometry::{Plane, Profile};
use crate::math::Point2;

/// Angular offsets of a tooth's four corners, as fractions of the angular
/// pitch: root, tip, tip, root.
const TOOTH_CORNERS: [(f64, bool); 4] = [(-0.25, false), (-0.10, true), (0.10, true), (0.25, false)];

/// Builds a simplified spur gear outline in the XY plane.
///
/// Each tooth is a trapezoid: a flat tip on the outer radius between
/// `±0.10` of the angular pitch, flanks down to the root radius at `±0.25`,
/// and a flat root to the next tooth. This is not an involute profile.
pub struct GearProfile {
    teeth: usize,
    modulus: f64,
}

impl GearProfile {
    /// Creates a new `GearProfile` operation.
    #[must_use]
    pub fn new(teeth: usize, modulus: f64) -> Self {
        Self { teeth, modulus }
    }

    /// Pitch radius, `teeth * modulus / 2`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pitch_radius(&self) -> f64 {
        self.teeth as f64 * self.modulus / 2.0
    }

    /// Tip radius, one modulus beyond the pitch circle.
    #[must_use]
    pub fn outer_radius(&self) -> f64 {
        self.pitch_radius() + self.modulus
    }

    /// Root radius, 1.25 moduli inside the pitch circle.
    #[must_use]
    pub fn root_radius(&self) -> f64 {
        self.pitch_radius() - 1.25 * self.modulus
    }

    /// Executes the operation, returning a counter-clockwise `4 * teeth` gon.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::InvalidTeeth`] for fewer than three teeth and
    /// [`ProfileError::InvalidModulus`] for a non-positive or non-finite
    /// modulus.
    #[allow(clippy::cast_precision_loss)]
    pub fn execute(&self) -> Result<Profile> {
        if self.teeth < 3 {
            return Err(ProfileError::InvalidTeeth(self.teeth).into());
        }
        if self.modulus <= 0.0 || !self.modulus.is_finite() {
            return Err(ProfileError::InvalidModulus(self.modulus).into());
        }

        let angular_pitch = TAU / self.teeth as f64;
        let (outer, root) = (self.outer_radius(), self.root_radius());
        let mut points = Vec::with_capacity(4 * self.teeth);
        for i in 0..self.teeth {
            let base = i as f64 * angular_pitch;
            for (fraction, tip) in TOOTH_CORNERS {
                let angle = base + fraction * angular_pitch;
                let r = if tip { outer } else { root };
                points.push(Point2::new(r * angle.cos(), r * angle.sin()));
            }
        }
        Profile::new(points, Plane::xy())
    }
}
