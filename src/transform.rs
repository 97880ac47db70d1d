//! Geodetic to projected coordinate conversion.
//!
//! The simulation consumes the transform as a pure function behind
//! [`GeoTransform`]; the bundled implementation projects JGD2011 geodetic
//! coordinates onto the Japan Plane Rectangular zones (EPSG 6669..6687,
//! Gauss-Krueger on GRS80, scale 0.9999). Axis order follows the source
//! data: `x` is northing from the zone origin, `y` is easting.

use thiserror::Error;

/// GRS80 ellipsoid.
const SEMI_MAJOR_M: f64 = 6_378_137.0;
const FLATTENING: f64 = 1.0 / 298.257_222_101;
const SCALE_FACTOR: f64 = 0.9999;

/// EPSG code of the geodetic system the tile files are published in.
pub const JGD2011_GEOGRAPHIC: u32 = 6697;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("unsupported source CRS {0} (expected JGD2011 geographic, 6697)")]
    UnsupportedSource(u32),
    #[error("unsupported target CRS {0} (expected a plane rectangular zone, 6669..6687)")]
    UnsupportedTarget(u32),
}

/// Pure geodetic-to-projected transform. Invertibility is not required.
pub trait GeoTransform: Sync {
    /// `(lat, lon)` in degrees to projected `(x, y)` in metres.
    fn project(&self, lat: f64, lon: f64) -> (f64, f64);
}

/// Zone origins (lat, lon in degrees) for EPSG 6669..6687, zones I..XIX.
const ZONE_ORIGINS: [(f64, f64); 19] = [
    (33.0, 129.5),          // I
    (33.0, 131.0),          // II
    (36.0, 132.0 + 10.0 / 60.0), // III
    (33.0, 133.5),          // IV
    (36.0, 134.0 + 20.0 / 60.0), // V
    (36.0, 136.0),          // VI
    (36.0, 137.0 + 10.0 / 60.0), // VII
    (36.0, 138.5),          // VIII
    (36.0, 139.0 + 50.0 / 60.0), // IX
    (40.0, 140.0 + 50.0 / 60.0), // X
    (44.0, 140.25),         // XI
    (44.0, 142.25),         // XII
    (44.0, 144.25),         // XIII
    (26.0, 142.0),          // XIV
    (26.0, 127.5),          // XV
    (26.0, 124.0),          // XVI
    (26.0, 131.0),          // XVII
    (20.0, 136.0),          // XVIII
    (26.0, 154.0),          // XIX
];

/// Transverse-Mercator projection onto one plane rectangular zone.
#[derive(Debug, Clone)]
pub struct PlaneRectangular {
    lat0_rad: f64,
    lon0_rad: f64,
    arc0: f64,
}

impl PlaneRectangular {
    /// Build the transform for a `(from, to)` EPSG pair as carried by the
    /// tile filenames and the run configuration.
    pub fn for_codes(from: u32, to: u32) -> Result<Self, TransformError> {
        if from != JGD2011_GEOGRAPHIC {
            return Err(TransformError::UnsupportedSource(from));
        }
        if !(6669..=6687).contains(&to) {
            return Err(TransformError::UnsupportedTarget(to));
        }
        let (lat0, lon0) = ZONE_ORIGINS[(to - 6669) as usize];
        let lat0_rad = lat0.to_radians();
        Ok(Self {
            lat0_rad,
            lon0_rad: lon0.to_radians(),
            arc0: meridian_arc(lat0_rad),
        })
    }
}

impl GeoTransform for PlaneRectangular {
    fn project(&self, lat: f64, lon: f64) -> (f64, f64) {
        let phi = lat.to_radians();
        let dlon = lon.to_radians() - self.lon0_rad;

        let e2 = FLATTENING * (2.0 - FLATTENING);
        let ep2 = e2 / (1.0 - e2);
        let sin_phi = phi.sin();
        let cos_phi = phi.cos();
        let tan_phi = phi.tan();

        let n = SEMI_MAJOR_M / (1.0 - e2 * sin_phi * sin_phi).sqrt();
        let t = tan_phi * tan_phi;
        let c = ep2 * cos_phi * cos_phi;
        let a = dlon * cos_phi;
        let a2 = a * a;
        let a3 = a2 * a;
        let a4 = a2 * a2;
        let a5 = a4 * a;
        let a6 = a4 * a2;

        let easting = SCALE_FACTOR
            * n
            * (a + (1.0 - t + c) * a3 / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a5 / 120.0);
        let northing = SCALE_FACTOR
            * (meridian_arc(phi) - self.arc0
                + n * tan_phi
                    * (a2 / 2.0
                        + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                        + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a6 / 720.0));

        // x = northing, y = easting: the plane rectangular axis order.
        (northing, easting)
    }
}

/// Meridian arc length from the equator to `phi`.
fn meridian_arc(phi: f64) -> f64 {
    let e2 = FLATTENING * (2.0 - FLATTENING);
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    SEMI_MAJOR_M
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}
