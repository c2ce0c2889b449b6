use serde::{Deserialize, Serialize};

use crate::error::{ProfileError, Result};
use crate::geometry::{Plane, Profile};
use crate::math::Point2;

/// Cross-section of a single thread tooth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadShape {
    /// Sharp V: base `±pitch/2.1` at the minor radius, apex at the major radius.
    #[default]
    Triangle,
    /// Flat crest: `±pitch/4` at the minor radius, `±pitch/3` at the major radius.
    Trapezoid,
}

/// Builds a thread tooth in the radial half-plane (`u` = radius, `v` = axial).
pub struct ThreadProfile {
    minor_radius: f64,
    major_radius: f64,
    pitch: f64,
    shape: ThreadShape,
}

impl ThreadProfile {
    /// Creates a new `ThreadProfile` operation with a triangular tooth.
    #[must_use]
    pub fn new(minor_radius: f64, major_radius: f64, pitch: f64) -> Self {
        Self {
            minor_radius,
            major_radius,
            pitch,
            shape: ThreadShape::default(),
        }
    }

    /// Selects the tooth shape.
    #[must_use]
    pub fn with_shape(mut self, shape: ThreadShape) -> Self {
        self.shape = shape;
        self
    }

    /// Executes the operation, returning a counter-clockwise tooth outline.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::InvalidThread`] unless
    /// `0 < minor_radius < major_radius` and `pitch > 0`, all finite.
    pub fn execute(&self) -> Result<Profile> {
        let (minor, major, pitch) = (self.minor_radius, self.major_radius, self.pitch);
        if ![minor, major, pitch].iter().all(|x| x.is_finite()) {
            return Err(ProfileError::InvalidThread("parameters must be finite".into()).into());
        }
        if minor <= 0.0 || major <= minor {
            return Err(ProfileError::InvalidThread(format!(
                "need 0 < minor < major, got minor={minor} major={major}"
            ))
            .into());
        }
        if pitch <= 0.0 {
            return Err(
                ProfileError::InvalidThread(format!("pitch must be positive, got {pitch}")).into(),
            );
        }

        let points = match self.shape {
            ThreadShape::Triangle => {
                let half = pitch / 2.1;
                vec![
                    Point2::new(minor, -half),
                    Point2::new(major, 0.0),
                    Point2::new(minor, half),
                ]
            }
            ThreadShape::Trapezoid => {
                let (inner, outer) = (pitch / 4.0, pitch / 3.0);
                vec![
                    Point2::new(minor, -inner),
                    Point2::new(major, -outer),
                    Point2::new(major, outer),
                    Point2::new(minor, inner),
                ]
            }
        };
        Ok(Profile::new(points, Plane::radial_xz())?.counter_clockwise())
    }
}
