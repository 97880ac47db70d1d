//! Tile loading and nearest-building behavior against on-disk fixtures.

use std::fs;

use canopysim::config::SimConfig;
use canopysim::geom::Point3;
use canopysim::store::{GeometryStore, StoreError};
use canopysim::transform::GeoTransform;
use tempfile::TempDir;

/// Keeps (lat, lon) as (x, y) so fixture coordinates are easy to reason
/// about.
struct Identity;

impl GeoTransform for Identity {
    fn project(&self, lat: f64, lon: f64) -> (f64, f64) {
        (lat, lon)
    }
}

const LAT: f64 = 35.713887740033876;
const LON: f64 = 139.76016861370172;
const CENTER_CODE: &str = "53394650";
const EAST_NEIGHBOR_CODE: &str = "53394651";

fn tile_doc(pos_lists: &[&str]) -> String {
    let mut doc = String::from("<core:CityModel xmlns:gml=\"http://www.opengis.net/gml\">");
    for pos_list in pos_lists {
        doc.push_str("<core:cityObjectMember><bldg:Building><bldg:lod1Solid>");
        doc.push_str(&format!(
            "<gml:Polygon><gml:exterior><gml:LinearRing><gml:posList>{pos_list}\
             </gml:posList></gml:LinearRing></gml:exterior></gml:Polygon>"
        ));
        doc.push_str("</bldg:lod1Solid></bldg:Building></core:cityObjectMember>");
    }
    doc.push_str("</core:CityModel>");
    doc
}

fn write_tile(config: &SimConfig, code: &str, doc: &str) {
    fs::write(config.tile_path(code), doc).expect("fixture tile written");
}

#[test]
fn missing_center_tile_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = SimConfig::new(dir.path());
    let err = GeometryStore::load(&config, &Identity, LAT, LON).unwrap_err();
    match err {
        StoreError::MissingCenterTile { code, .. } => assert_eq!(code, CENTER_CODE),
        other => panic!("expected MissingCenterTile, got {other}"),
    }
}

#[test]
fn missing_neighbors_are_skipped_silently() {
    let dir = TempDir::new().unwrap();
    let config = SimConfig::new(dir.path());
    write_tile(
        &config,
        CENTER_CODE,
        &tile_doc(&["0 0 10 0 1 10 1 1 10 1 0 10"]),
    );

    let store = GeometryStore::load(&config, &Identity, LAT, LON).expect("center tile is enough");
    assert_eq!(store.buildings().len(), 1);
}

#[test]
fn neighbor_tiles_contribute_in_traversal_order() {
    let dir = TempDir::new().unwrap();
    let config = SimConfig::new(dir.path());
    write_tile(
        &config,
        CENTER_CODE,
        &tile_doc(&["0 0 10 0 1 10 1 1 10"]),
    );
    write_tile(
        &config,
        EAST_NEIGHBOR_CODE,
        &tile_doc(&["5 5 10 5 6 10 6 6 10", "7 7 10 7 8 10 8 8 10"]),
    );

    let store = GeometryStore::load(&config, &Identity, LAT, LON).unwrap();
    // center (index 4) loads before its east neighbor (index 5)
    assert_eq!(store.buildings().len(), 3);
    assert!(store.buildings()[0].centroid().x < 1.0);
    assert!(store.buildings()[1].centroid().x > 4.0);
}

#[test]
fn malformed_pos_list_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let config = SimConfig::new(dir.path());
    write_tile(&config, CENTER_CODE, &tile_doc(&["0 0 10 0 1 10 1 1"]));

    let err = GeometryStore::load(&config, &Identity, LAT, LON).unwrap_err();
    assert!(matches!(err, StoreError::Parse { .. }), "got {err}");
}

#[test]
fn nearest_count_is_capped_by_available_buildings() {
    let dir = TempDir::new().unwrap();
    let config = SimConfig::new(dir.path());
    write_tile(
        &config,
        CENTER_CODE,
        &tile_doc(&[
            "0 0 10 0 1 10 1 1 10",
            "20 20 10 20 21 10 21 21 10",
            "40 40 10 40 41 10 41 41 10",
        ]),
    );

    let store = GeometryStore::load(&config, &Identity, LAT, LON).unwrap();
    let target = Point3::new(0.0, 0.0, 0.0);

    let two = store.nearest(target, 2);
    assert_eq!(two.len(), 2);
    assert!(two[0].0 < two[1].0, "distances must ascend");

    let all = store.nearest(target, 99);
    assert_eq!(all.len(), 3, "oversized N returns every building");
    assert!(all.windows(2).all(|pair| pair[0].0 <= pair[1].0));
}
