//! Solar position collaborator and sun-direction vectors.
//!
//! The calculator only needs `(lat, lon, instant) -> (altitude, azimuth)`;
//! [`NoaaSolar`] supplies it via the NOAA low-precision ephemeris
//! (fractional year -> equation of time and declination -> hour angle ->
//! zenith and azimuth). Azimuth is degrees clockwise from true north.

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::geom::Point3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
}

pub trait SolarEphemeris: Sync {
    fn position(&self, lat: f64, lon: f64, at: DateTime<Utc>) -> SolarPosition;
}

/// NOAA low-precision solar position algorithm. Accurate to a tenth of a
/// degree or so, which is far below the angular size of a building face at
/// the distances this simulation cares about.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoaaSolar;

impl SolarEphemeris for NoaaSolar {
    fn position(&self, lat: f64, lon: f64, at: DateTime<Utc>) -> SolarPosition {
        let hour = at.hour() as f64 + at.minute() as f64 / 60.0 + at.second() as f64 / 3600.0;
        let day_of_year = at.ordinal() as f64;
        let days_in_year = if at.date_naive().leap_year() { 366.0 } else { 365.0 };

        // Fractional year in radians.
        let gamma =
            2.0 * std::f64::consts::PI / days_in_year * (day_of_year - 1.0 + (hour - 12.0) / 24.0);

        // Equation of time (minutes) and declination (radians).
        let eqtime = 229.18
            * (0.000075 + 0.001868 * gamma.cos()
                - 0.032077 * gamma.sin()
                - 0.014615 * (2.0 * gamma).cos()
                - 0.040849 * (2.0 * gamma).sin());
        let decl = 0.006918 - 0.399912 * gamma.cos() + 0.070257 * gamma.sin()
            - 0.006758 * (2.0 * gamma).cos()
            + 0.000907 * (2.0 * gamma).sin()
            - 0.002697 * (3.0 * gamma).cos()
            + 0.00148 * (3.0 * gamma).sin();

        // True solar time against UTC; longitude east positive.
        let true_solar_minutes = hour * 60.0 + eqtime + 4.0 * lon;
        let hour_angle = (true_solar_minutes / 4.0 - 180.0).to_radians();

        let lat_rad = lat.to_radians();
        let cos_zenith = lat_rad.sin() * decl.sin() + lat_rad.cos() * decl.cos() * hour_angle.cos();
        let zenith = cos_zenith.clamp(-1.0, 1.0).acos();
        let altitude_deg = 90.0 - zenith.to_degrees();

        // Azimuth from south (westward positive), then rebased to
        // clockwise-from-north.
        let from_south = hour_angle.sin().atan2(
            hour_angle.cos() * lat_rad.sin() - decl.tan() * lat_rad.cos(),
        );
        let azimuth_deg = (from_south.to_degrees() + 180.0).rem_euclid(360.0);

        SolarPosition {
            altitude_deg,
            azimuth_deg,
        }
    }
}

/// Unit vector toward the sun in the tangent-plane basis the occlusion
/// stage uses: x toward north, y toward east, z up. `None` when the sun is
/// at or below the horizon.
pub fn sun_direction(position: SolarPosition) -> Option<Point3> {
    if position.altitude_deg <= 0.0 {
        return None;
    }
    let alt = position.altitude_deg.to_radians();
    let azi = position.azimuth_deg.to_radians();
    let v = Point3::new(alt.cos() * azi.cos(), alt.cos() * azi.sin(), alt.sin());
    let norm = v.norm();
    if norm < 1e-9 {
        return None;
    }
    Some(Point3::new(v.x / norm, v.y / norm, v.z / norm))
}
