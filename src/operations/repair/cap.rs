use crate::error::RepairError;
use crate::geometry::Aabb;
use crate::math::polygon_2d::is_simple_polygon;
use crate::math::{
    axis_component, dominant_axis, newell_normal, project_along, Point2, Point3, Vector3,
};
use crate::tessellation::triangulate_polygon;

/// Largest distance from the best-fit plane, relative to the loop's size,
/// for a loop to count as planar.
pub const PLANARITY_TOLERANCE: f64 = 1e-6;

/// Fills a boundary loop, appending any new vertices to `vertices`.
///
/// Planar simple loops get a constrained Delaunay cap. Anything else gets a
/// fan around the loop centroid and the matching flag. Cap triangles follow
/// the loop's winding.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub(super) fn cap_loop(
    vertices: &mut Vec<Point3>,
    ring: &[u32],
    loop_index: usize,
) -> (Vec<[u32; 3]>, Option<RepairError>) {
    let points: Vec<Point3> = ring.iter().map(|&v| vertices[v as usize]).collect();
    let normal = newell_normal(&points);
    let centroid = Point3::from(
        points.iter().map(|p| p.coords).sum::<Vector3>() / points.len() as f64,
    );

    let size = Aabb::from_points(&points).as_ref().map_or(0.0, Aabb::diagonal);
    let deviation = match normal.try_normalize(0.0) {
        Some(unit) if size > 0.0 => {
            points
                .iter()
                .map(|p| (p - centroid).dot(&unit).abs())
                .fold(0.0, f64::max)
                / size
        }
        _ => f64::INFINITY,
    };
    if deviation > PLANARITY_TOLERANCE {
        let flag = RepairError::NonPlanarLoop {
            loop_index,
            deviation,
        };
        return (fan(vertices, ring, centroid), Some(flag));
    }

    let axis = dominant_axis(&normal);
    let flat: Vec<[f64; 2]> = points.iter().map(|p| project_along(p, axis)).collect();
    let as_points: Vec<Point2> = flat.iter().map(|q| Point2::new(q[0], q[1])).collect();
    let triangulated = if is_simple_polygon(&as_points) {
        triangulate_polygon(&flat).ok()
    } else {
        None
    };
    let Some(local) = triangulated else {
        let flag = RepairError::SelfIntersectingLoop { loop_index };
        return (fan(vertices, ring, centroid), Some(flag));
    };

    let reversed = axis_component(&normal, axis) < 0.0;
    let triangles = local
        .into_iter()
        .map(|[a, b, c]| {
            let (a, b, c) = (ring[a], ring[b], ring[c]);
            if reversed {
                [a, c, b]
            } else {
                [a, b, c]
            }
        })
        .collect();
    (triangles, None)
}

#[allow(clippy::cast_possible_truncation)]
fn fan(vertices: &mut Vec<Point3>, ring: &[u32], centroid: Point3) -> Vec<[u32; 3]> {
    let center = vertices.len() as u32;
    vertices.push(centroid);
    (0..ring.len())
        .map(|i| [center, ring[i], ring[(i + 1) % ring.len()]])
        .collect()
}
