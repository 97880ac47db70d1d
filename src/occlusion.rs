//! Ray/building occlusion via Moller-Trumbore ray/triangle intersection.

use crate::geom::{Building, Point3, Polygon};

const EPSILON: f64 = 1e-7;

/// Moller-Trumbore intersection test. A hit requires the barycentric
/// coordinates to fall inside the triangle and the hit point to lie
/// strictly forward of the origin (t > epsilon). Near-parallel rays are a
/// definite miss, never an error.
pub fn ray_intersects_triangle(origin: Point3, dir: Point3, v0: Point3, v1: Point3, v2: Point3) -> bool {
    let edge1 = v1.sub(v0);
    let edge2 = v2.sub(v0);
    let h = dir.cross(edge2);
    let det = edge1.dot(h);

    if det.abs() < EPSILON {
        return false;
    }

    let inv_det = 1.0 / det;
    let s = origin.sub(v0);
    let u = inv_det * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return false;
    }

    let q = s.cross(edge1);
    let v = inv_det * dir.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return false;
    }

    let t = inv_det * edge2.dot(q);
    t > EPSILON
}

/// Fan-triangulate a polygon from vertex 0 and test each triangle.
fn polygon_occludes(origin: Point3, dir: Point3, polygon: &Polygon) -> bool {
    let verts = polygon.vertices();
    for i in 1..verts.len() - 1 {
        if ray_intersects_triangle(origin, dir, verts[0], verts[i], verts[i + 1]) {
            return true;
        }
    }
    false
}

/// True if any face of the building blocks the ray.
pub fn building_occludes(origin: Point3, dir: Point3, building: &Building) -> bool {
    building
        .polygons()
        .iter()
        .any(|polygon| polygon_occludes(origin, dir, polygon))
}

/// True if any candidate building blocks the ray (first hit wins).
pub fn blocked<'a, I>(origin: Point3, dir: Point3, candidates: I) -> bool
where
    I: IntoIterator<Item = &'a Building>,
{
    candidates
        .into_iter()
        .any(|building| building_occludes(origin, dir, building))
}
