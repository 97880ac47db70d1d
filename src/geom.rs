//! Geometry primitives shared by the store, occlusion and sunlight stages.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn sub(self, other: Point3) -> Point3 {
        Point3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn cross(self, other: Point3) -> Point3 {
        Point3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn dot(self, other: Point3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn distance(self, other: Point3) -> f64 {
        self.sub(other).norm()
    }
}

/// Ordered vertex ring in the projected coordinate system. Always has at
/// least 3 vertices; shorter rings are rejected at ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<Point3>,
}

impl Polygon {
    /// Returns `None` for degenerate rings (< 3 vertices).
    pub fn new(vertices: Vec<Point3>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        Some(Self { vertices })
    }

    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }
}

/// One building: the outer face polygons of an LOD1 solid. Non-empty by
/// construction; buildings with no usable polygons are dropped at ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    polygons: Vec<Polygon>,
}

impl Building {
    pub fn new(polygons: Vec<Polygon>) -> Option<Self> {
        if polygons.is_empty() {
            return None;
        }
        Some(Self { polygons })
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Mean of every vertex across every polygon, equally weighted.
    /// Not area-weighted; vertex-dense faces pull the centroid toward them.
    pub fn centroid(&self) -> Point3 {
        let mut sum = Point3::new(0.0, 0.0, 0.0);
        let mut count = 0usize;
        for polygon in &self.polygons {
            for vertex in polygon.vertices() {
                sum.x += vertex.x;
                sum.y += vertex.y;
                sum.z += vertex.z;
                count += 1;
            }
        }
        let n = count as f64;
        Point3::new(sum.x / n, sum.y / n, sum.z / n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn degenerate_polygon_rejected() {
        assert!(Polygon::new(vec![Point3::new(0.0, 0.0, 0.0)]).is_none());
        assert!(Polygon::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ])
        .is_none());
        assert!(Polygon::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ])
        .is_some());
    }

    #[test]
    fn empty_building_rejected() {
        assert!(Building::new(Vec::new()).is_none());
    }

    #[test]
    fn centroid_is_vertex_mean() {
        let poly = Polygon::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 2.0, 4.0),
            Point3::new(0.0, 2.0, 4.0),
        ])
        .unwrap();
        let building = Building::new(vec![poly]).unwrap();
        let c = building.centroid();
        assert_relative_eq!(c.x, 1.0);
        assert_relative_eq!(c.y, 1.0);
        assert_relative_eq!(c.z, 2.0);
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(3.0, 4.0, 12.0);
        assert_relative_eq!(a.distance(b), 13.0);
    }
}
