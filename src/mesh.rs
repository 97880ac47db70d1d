//! Standard-area mesh codes.
//!
//! A mesh code is the concatenation of three tiers of grid digits: a
//! two-digit latitude band (latitude scaled by 1.5) and two-digit longitude
//! band (longitude minus 100), an 8x8 second-tier cell, and a 10x10
//! third-tier cell. Building tiles are published one file per third-tier
//! code, so locating a point means deriving its code plus the 8 surrounding
//! codes.

const TIER2_DIV: i64 = 8;
const TIER3_DIV: i64 = 10;

/// One third-tier mesh code, kept as its digit fields so neighbor offsets
/// can borrow and carry across tiers exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshCode {
    lat1: i64,
    lon1: i64,
    lat2: i64,
    lon2: i64,
    lat3: i64,
    lon3: i64,
}

impl MeshCode {
    /// Derive the code containing a geodetic point.
    pub fn from_geodetic(lat: f64, lon: f64) -> Self {
        let lat_scaled = lat * 1.5;
        let lat1 = lat_scaled.floor();
        let lat2 = ((lat_scaled - lat1) * TIER2_DIV as f64).floor();
        let lat3 = (((lat_scaled - lat1) * TIER2_DIV as f64 - lat2) * TIER3_DIV as f64).floor();

        let lon_offset = lon - 100.0;
        let lon1 = lon_offset.floor();
        let lon2 = ((lon_offset - lon1) * TIER2_DIV as f64).floor();
        let lon3 = (((lon_offset - lon1) * TIER2_DIV as f64 - lon2) * TIER3_DIV as f64).floor();

        Self {
            lat1: lat1 as i64,
            lon1: lon1 as i64,
            lat2: lat2 as i64,
            lon2: lon2 as i64,
            lat3: lat3 as i64,
            lon3: lon3 as i64,
        }
    }

    /// Shift the code by whole third-tier cells on each axis, propagating
    /// borrows and carries up through the second and first tiers.
    pub fn offset(&self, dlat: i64, dlon: i64) -> Self {
        let (lat1, lat2, lat3) = shift_axis(self.lat1, self.lat2, self.lat3, dlat);
        let (lon1, lon2, lon3) = shift_axis(self.lon1, self.lon2, self.lon3, dlon);
        Self {
            lat1,
            lon1,
            lat2,
            lon2,
            lat3,
            lon3,
        }
    }

    /// The 3x3 neighborhood around this code, row-major over
    /// (dlat, dlon) in {-1, 0, 1}^2 with `self` at index 4.
    pub fn neighborhood(&self) -> Vec<MeshCode> {
        let mut codes = Vec::with_capacity(9);
        for dlat in -1..=1 {
            for dlon in -1..=1 {
                codes.push(self.offset(dlat, dlon));
            }
        }
        codes
    }
}

impl std::fmt::Display for MeshCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}{:02}{}{}{}{}",
            self.lat1, self.lon1, self.lat2, self.lon2, self.lat3, self.lon3
        )
    }
}

fn shift_axis(tier1: i64, tier2: i64, tier3: i64, delta: i64) -> (i64, i64, i64) {
    let mut t1 = tier1;
    let mut t2 = tier2;
    let mut t3 = tier3 + delta;
    if t3 < 0 {
        t3 += TIER3_DIV;
        t2 -= 1;
    } else if t3 >= TIER3_DIV {
        t3 -= TIER3_DIV;
        t2 += 1;
    }
    if t2 < 0 {
        t2 += TIER2_DIV;
        t1 -= 1;
    } else if t2 >= TIER2_DIV {
        t2 -= TIER2_DIV;
        t1 += 1;
    }
    (t1, t2, t3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_center_code() {
        let code = MeshCode::from_geodetic(35.713887740033876, 139.76016861370172);
        assert_eq!(code.to_string(), "53394650");
    }

    #[test]
    fn borrow_propagates_to_second_tier() {
        let code = MeshCode::from_geodetic(35.713887740033876, 139.76016861370172);
        // lon third digit is 0, so stepping west borrows from the 8-cell tier
        assert_eq!(code.offset(0, -1).to_string(), "53394559");
    }

    #[test]
    fn carry_propagates_to_first_tier() {
        // 53 39 7 7 9 9 is the north-east corner of its first-tier square
        let code = MeshCode::from_geodetic(35.9933, 139.99);
        assert_eq!(code.to_string(), "53397799");
        assert_eq!(code.offset(1, 1).to_string(), "54400000");
    }
}
