//! CityGML LOD1 solid extraction.
//!
//! Tile files expose buildings as `core:cityObjectMember` elements whose
//! `bldg:lod1Solid` faces carry `gml:posList` coordinate strings:
//! whitespace-separated (lat, lon, alt) triples. Only those three element
//! kinds matter here, so the parser is a focused scanner over the document
//! text rather than a full XML reader.

use thiserror::Error;

use crate::geom::{Building, Point3, Polygon};
use crate::transform::GeoTransform;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("posList token count {0} is not a multiple of 3")]
    MalformedPosList(usize),
    #[error("posList contains non-numeric token '{0}'")]
    InvalidNumber(String),
}

/// Parse every building in one tile document, converting each vertex from
/// geodetic (lat, lon, alt) to projected (x, y, z). Altitude passes through
/// unchanged. Buildings that yield no usable polygons are dropped.
pub fn parse_lod1_solids(
    text: &str,
    transform: &dyn GeoTransform,
) -> Result<Vec<Building>, ParseError> {
    let mut buildings = Vec::new();
    for member in element_bodies(text, "core:cityObjectMember") {
        let mut polygons = Vec::new();
        for solid in element_bodies(member, "bldg:lod1Solid") {
            for pos_list in element_bodies(solid, "gml:posList") {
                if let Some(polygon) = parse_pos_list(pos_list, transform)? {
                    polygons.push(polygon);
                }
            }
        }
        if let Some(building) = Building::new(polygons) {
            buildings.push(building);
        }
    }
    Ok(buildings)
}

/// Parse one whitespace-separated coordinate list into a projected polygon.
/// Returns `None` for degenerate rings (< 3 vertices); those are filtered,
/// not raised.
fn parse_pos_list(
    text: &str,
    transform: &dyn GeoTransform,
) -> Result<Option<Polygon>, ParseError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() % 3 != 0 {
        return Err(ParseError::MalformedPosList(tokens.len()));
    }

    let mut vertices = Vec::with_capacity(tokens.len() / 3);
    for triple in tokens.chunks_exact(3) {
        let lat = parse_number(triple[0])?;
        let lon = parse_number(triple[1])?;
        let alt = parse_number(triple[2])?;
        let (x, y) = transform.project(lat, lon);
        vertices.push(Point3::new(x, y, alt));
    }
    Ok(Polygon::new(vertices))
}

fn parse_number(token: &str) -> Result<f64, ParseError> {
    token
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidNumber(token.to_string()))
}

/// Inner text of every `<tag ...>...</tag>` occurrence, in document order.
fn element_bodies<'a>(text: &'a str, tag: &str) -> Vec<&'a str> {
    let open_prefix = format!("<{tag}");
    let close = format!("</{tag}>");
    let mut bodies = Vec::new();
    let mut cursor = 0;

    while let Some(found) = text[cursor..].find(&open_prefix) {
        let open_at = cursor + found;
        let after_prefix = open_at + open_prefix.len();
        // require the tag name to end here (avoid prefix collisions)
        match text[after_prefix..].chars().next() {
            Some(c) if c == '>' || c.is_whitespace() => {}
            _ => {
                cursor = after_prefix;
                continue;
            }
        }
        let Some(open_end) = text[after_prefix..].find('>') else {
            break;
        };
        let body_start = after_prefix + open_end + 1;
        let Some(close_found) = text[body_start..].find(&close) else {
            break;
        };
        bodies.push(&text[body_start..body_start + close_found]);
        cursor = body_start + close_found + close.len();
    }
    bodies
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Identity transform keeping (lat, lon) as (x, y) for readable tests.
    struct Passthrough;

    impl GeoTransform for Passthrough {
        fn project(&self, lat: f64, lon: f64) -> (f64, f64) {
            (lat, lon)
        }
    }

    fn tile(bodies: &[&str]) -> String {
        let mut doc = String::from("<core:CityModel>");
        for body in bodies {
            doc.push_str("<core:cityObjectMember><bldg:Building><bldg:lod1Solid>");
            for pos_list in body.split('|') {
                doc.push_str(&format!(
                    "<gml:Polygon><gml:posList>{pos_list}</gml:posList></gml:Polygon>"
                ));
            }
            doc.push_str("</bldg:lod1Solid></bldg:Building></core:cityObjectMember>");
        }
        doc.push_str("</core:CityModel>");
        doc
    }

    #[test]
    fn groups_polygons_per_building() {
        let doc = tile(&[
            "0 0 1 1 0 1 1 1 1|0 0 2 1 0 2 1 1 2",
            "5 5 0 6 5 0 6 6 0",
        ]);
        let buildings = parse_lod1_solids(&doc, &Passthrough).unwrap();
        assert_eq!(buildings.len(), 2);
        assert_eq!(buildings[0].polygons().len(), 2);
        assert_eq!(buildings[1].polygons().len(), 1);
    }

    #[test]
    fn altitude_passes_through() {
        let doc = tile(&["0 0 7.5 1 0 7.5 1 1 7.5"]);
        let buildings = parse_lod1_solids(&doc, &Passthrough).unwrap();
        let z = buildings[0].polygons()[0].vertices()[0].z;
        assert_eq!(z, 7.5);
    }

    #[test]
    fn malformed_triple_count_is_fatal() {
        let doc = tile(&["0 0 1 1 0 1 1 1"]);
        let err = parse_lod1_solids(&doc, &Passthrough).unwrap_err();
        assert!(matches!(err, ParseError::MalformedPosList(8)));
    }

    #[test]
    fn degenerate_rings_and_empty_buildings_are_dropped() {
        // two vertices only: filtered polygon, and the building that held
        // nothing else disappears with it
        let doc = tile(&["0 0 1 1 0 1"]);
        let buildings = parse_lod1_solids(&doc, &Passthrough).unwrap();
        assert!(buildings.is_empty());
    }

    #[test]
    fn non_numeric_token_is_fatal() {
        let doc = tile(&["0 0 abc 1 0 1 1 1 1"]);
        assert!(matches!(
            parse_lod1_solids(&doc, &Passthrough),
            Err(ParseError::InvalidNumber(_))
        ));
    }
}
