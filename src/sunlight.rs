//! Per-calendar-day direct sunlight hours for one target point.

use std::collections::HashMap;

use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};

use crate::geom::{Building, Point3};
use crate::occlusion;
use crate::solar::{self, SolarEphemeris};
use crate::transform::GeoTransform;

/// Any leap year works here; the table is keyed by calendar position, not
/// by year, and a leap year guarantees a Feb 29 entry.
pub const REFERENCE_YEAR: i32 = 2024;

/// Local civil time of the building data's region.
pub const CIVIL_OFFSET_HOURS: i32 = 9;

pub const DAYS_IN_MONTH: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// A plant position in both coordinate systems: geodetic for the sun,
/// projected for the occlusion rays.
#[derive(Debug, Clone, Copy)]
pub struct TargetPoint {
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
    pub projected: Point3,
}

impl TargetPoint {
    pub fn new(transform: &dyn GeoTransform, lat: f64, lon: f64, alt: f64) -> Self {
        let (x, y) = transform.project(lat, lon);
        Self {
            lat,
            lon,
            alt,
            projected: Point3::new(x, y, alt),
        }
    }
}

/// Unblocked sunlight hours per (month, day), every valid calendar day of
/// the reference year present exactly once, values in 0..=24.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SunlightTable {
    hours: HashMap<(u32, u32), u32>,
}

impl SunlightTable {
    pub fn hours_on(&self, month: u32, day: u32) -> Option<u32> {
        self.hours.get(&(month, day)).copied()
    }

    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ((u32, u32), u32)> + '_ {
        self.hours.iter().map(|(&k, &v)| (k, v))
    }
}

/// Sample every hour of every valid calendar day of the reference year and
/// count the hours whose sun is above the horizon and not blocked by any
/// candidate building.
///
/// The sun vector lives in a local tangent-plane basis while the ray origin
/// is in the projected CRS; the two are combined directly, a documented
/// approximation inherited from the source data pipeline.
pub fn compute_table(
    candidates: &[(f64, &Building)],
    target: &TargetPoint,
    ephemeris: &dyn SolarEphemeris,
) -> SunlightTable {
    let civil = FixedOffset::east_opt(CIVIL_OFFSET_HOURS * 3600).expect("valid civil offset");
    let mut hours = HashMap::new();

    for (month_index, &day_count) in DAYS_IN_MONTH.iter().enumerate() {
        let month = month_index as u32 + 1;
        for day in 1..=day_count {
            let mut unblocked = 0u32;
            for hour in 0..24 {
                let local = NaiveDate::from_ymd_opt(REFERENCE_YEAR, month, day)
                    .expect("valid reference-year date")
                    .and_hms_opt(hour, 0, 0)
                    .expect("valid clock hour");
                let utc = civil
                    .from_local_datetime(&local)
                    .single()
                    .expect("fixed offset has no ambiguous times")
                    .with_timezone(&Utc);

                let position = ephemeris.position(target.lat, target.lon, utc);
                let Some(dir) = solar::sun_direction(position) else {
                    continue;
                };
                let blocked = occlusion::blocked(
                    target.projected,
                    dir,
                    candidates.iter().map(|(_, building)| *building),
                );
                if !blocked {
                    unblocked += 1;
                }
            }
            hours.insert((month, day), unblocked);
        }
    }

    SunlightTable { hours }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solar::SolarPosition;
    use chrono::{DateTime, Timelike};

    /// Sun fixed straight up between 06:00 and 17:59 UTC, down otherwise.
    struct TwelveHourSun;

    impl SolarEphemeris for TwelveHourSun {
        fn position(&self, _lat: f64, _lon: f64, at: DateTime<Utc>) -> SolarPosition {
            let up = (6..18).contains(&at.hour());
            SolarPosition {
                altitude_deg: if up { 90.0 } else { -10.0 },
                azimuth_deg: 180.0,
            }
        }
    }

    fn target() -> TargetPoint {
        TargetPoint {
            lat: 35.0,
            lon: 139.0,
            alt: 0.0,
            projected: Point3::new(0.0, 0.0, 0.0),
        }
    }

    #[test]
    fn covers_every_valid_day_exactly_once() {
        let table = compute_table(&[], &target(), &TwelveHourSun);
        assert_eq!(table.len(), 366);
        assert_eq!(table.hours_on(2, 29), Some(12));
        assert_eq!(table.hours_on(2, 30), None);
        assert_eq!(table.hours_on(4, 31), None);
        assert_eq!(table.hours_on(6, 31), None);
        assert_eq!(table.hours_on(9, 31), None);
        assert_eq!(table.hours_on(11, 31), None);
        assert_eq!(table.hours_on(12, 31), Some(12));
    }

    #[test]
    fn values_stay_in_range() {
        let table = compute_table(&[], &target(), &TwelveHourSun);
        for (_, hours) in table.iter() {
            assert!(hours <= 24);
        }
    }

    #[test]
    fn overhead_roof_blocks_every_hour() {
        use crate::geom::{Building, Polygon};
        let roof = Building::new(vec![Polygon::new(vec![
            Point3::new(-100.0, -100.0, 10.0),
            Point3::new(100.0, -100.0, 10.0),
            Point3::new(100.0, 100.0, 10.0),
            Point3::new(-100.0, 100.0, 10.0),
        ])
        .unwrap()])
        .unwrap();
        let candidates = vec![(1.0, &roof)];
        let table = compute_table(&candidates, &target(), &TwelveHourSun);
        for (day, hours) in table.iter() {
            assert_eq!(hours, 0, "day {day:?} should be fully shadowed");
        }
    }
}
