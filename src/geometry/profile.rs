use crate::error::{ProfileError, Result};
use crate::math::polygon_2d::{is_simple_polygon, signed_area_2d};
use crate::math::{Point2, Point3};

use super::Plane;

/// A simple closed polygon in a plane, used as the cross-section of a sweep.
///
/// The last point connects back to the first; it is not repeated.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    points: Vec<Point2>,
    plane: Plane,
}

impl Profile {
    /// Creates a profile from plane coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::SelfIntersecting`] if the points do not form a
    /// simple polygon with at least three vertices.
    pub fn new(points: Vec<Point2>, plane: Plane) -> Result<Self> {
        if !is_simple_polygon(&points) {
            return Err(ProfileError::SelfIntersecting.into());
        }
        Ok(Self { points, plane })
    }

    /// Returns the polygon vertices in plane coordinates.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Returns the plane the profile lives in.
    #[must_use]
    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Number of polygon vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the profile has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Signed area in plane coordinates; positive when counter-clockwise
    /// seen from the side the plane normal points to.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(&self.points)
    }

    /// Returns the same polygon wound counter-clockwise in plane coordinates.
    #[must_use]
    pub fn counter_clockwise(mut self) -> Self {
        if self.signed_area() < 0.0 {
            self.points.reverse();
        }
        self
    }

    /// Maps the polygon to 3D.
    #[must_use]
    pub fn to_world(&self) -> Vec<Point3> {
        self.points.iter().map(|uv| self.plane.point_at(uv)).collect()
    }
}
