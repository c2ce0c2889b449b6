use crate::error::{Result, SweepError};
use crate::geometry::Profile;
use crate::math::TOLERANCE;
use crate::tessellation::triangulate_polygon;
use crate::topology::Mesh;

/// Extrudes a profile along its plane normal into a closed prism.
///
/// The profile is the bottom cap; the top cap sits `thickness` along the
/// normal. The result has `2n` vertices and `4n - 4` triangles.
pub struct LinearExtrude<'a> {
    profile: &'a Profile,
    thickness: f64,
}

impl<'a> LinearExtrude<'a> {
    /// Creates a new `LinearExtrude` operation.
    #[must_use]
    pub fn new(profile: &'a Profile, thickness: f64) -> Self {
        Self { profile, thickness }
    }

    /// Executes the extrusion, returning a closed two-manifold mesh.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::NonPositiveThickness`] for a non-positive
    /// thickness, or [`SweepError::DegenerateProfile`] if the profile cannot
    /// be triangulated into caps.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self) -> Result<Mesh> {
        if self.thickness <= TOLERANCE || !self.thickness.is_finite() {
            return Err(SweepError::NonPositiveThickness(self.thickness).into());
        }
        if self.profile.signed_area().abs() < TOLERANCE * TOLERANCE {
            return Err(SweepError::DegenerateProfile("profile has zero area".into()).into());
        }

        // Wind the outline counter-clockwise about the plane normal so the
        // side quads face outward.
        let mut points = self.profile.points().to_vec();
        if self.profile.signed_area() < 0.0 {
            points.reverse();
        }
        let flat: Vec<[f64; 2]> = points.iter().map(|q| [q.x, q.y]).collect();
        let cap = triangulate_polygon(&flat)
            .map_err(|e| SweepError::DegenerateProfile(e.to_string()))?;

        let plane = self.profile.plane();
        let offset = plane.normal() * self.thickness;
        let n = points.len();
        let mut vertices = Vec::with_capacity(2 * n);
        vertices.extend(points.iter().map(|q| plane.point_at(q)));
        vertices.extend(points.iter().map(|q| plane.point_at(q) + offset));

        let n32 = n as u32;
        let mut triangles = Vec::with_capacity(4 * n - 4);
        for &[a, b, c] in &cap {
            let (a, b, c) = (a as u32, b as u32, c as u32);
            triangles.push([a, c, b]);
            triangles.push([n32 + a, n32 + b, n32 + c]);
        }
        for i in 0..n32 {
            let j = (i + 1) % n32;
            triangles.push([i, j, n32 + j]);
            triangles.push([i, n32 + j, n32 + i]);
        }
        Ok(Mesh::new(vertices, triangles))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::ForgeError;
    use crate::geometry::Plane;
    use crate::math::Point2;
    use crate::operations::profile::{GearProfile, ThreadProfile};
    use crate::operations::query::{euler_characteristic, signed_volume};

    #[test]
    fn gear_extrusion_is_genus_zero() {
        let profile = GearProfile::new(15, 0.001).execute().unwrap();
        let mesh = LinearExtrude::new(&profile, 0.006).execute().unwrap();
        assert_eq!(mesh.vertices.len(), 120);
        assert_eq!(mesh.triangles.len(), 4 * 60 - 4);
        assert!(mesh.is_closed_manifold());
        assert_eq!(euler_characteristic(&mesh), 2);
        assert_relative_eq!(
            signed_volume(&mesh),
            profile.signed_area() * 0.006,
            max_relative = 1e-9
        );
    }

    #[test]
    fn clockwise_profile_still_faces_outward() {
        let square = Profile::new(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(0.0, 1.0),
                Point2::new(1.0, 1.0),
                Point2::new(1.0, 0.0),
            ],
            Plane::xy(),
        )
        .unwrap();
        let mesh = LinearExtrude::new(&square, 2.0).execute().unwrap();
        assert!(mesh.is_closed_manifold());
        assert_relative_eq!(signed_volume(&mesh), 2.0, epsilon = 1e-12);
        let aabb = mesh.aabb().unwrap();
        assert_relative_eq!(aabb.max.z, 2.0);
    }

    #[test]
    fn radial_profile_extrudes_along_negative_y() {
        let tooth = ThreadProfile::new(1.0, 1.5, 0.5).execute().unwrap();
        let mesh = LinearExtrude::new(&tooth, 0.1).execute().unwrap();
        let aabb = mesh.aabb().unwrap();
        assert_relative_eq!(aabb.min.y, -0.1, epsilon = 1e-15);
        assert!(signed_volume(&mesh) > 0.0);
    }

    #[test]
    fn zero_thickness_is_rejected() {
        let profile = GearProfile::new(8, 1.0).execute().unwrap();
        assert!(matches!(
            LinearExtrude::new(&profile, 0.0).execute(),
            Err(ForgeError::Sweep(SweepError::NonPositiveThickness(_)))
        ));
        assert!(LinearExtrude::new(&profile, -1.0).execute().is_err());
    }
}
