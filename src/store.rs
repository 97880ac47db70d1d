//! Tile-set geometry loading and the nearest-building index.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::citygml::{self, ParseError};
use crate::config::SimConfig;
use crate::geom::{Building, Point3};
use crate::mesh::MeshCode;
use crate::transform::GeoTransform;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("mandatory center tile {code} has no geometry file at {path}")]
    MissingCenterTile { code: String, path: PathBuf },
    #[error("failed to read tile file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse tile file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Building solids for the 3x3 tile neighborhood around a point, loaded
/// once per run and held in projected coordinates.
#[derive(Debug)]
pub struct GeometryStore {
    buildings: Vec<Building>,
}

impl GeometryStore {
    /// Resolve the nine mesh codes around `(lat, lon)` and load every tile
    /// file that exists. The center tile (index 4) is mandatory; absent
    /// neighbor files are skipped without error. Building order is file
    /// traversal order and carries no geographic meaning.
    pub fn load(
        config: &SimConfig,
        transform: &dyn GeoTransform,
        lat: f64,
        lon: f64,
    ) -> Result<Self, StoreError> {
        let codes = MeshCode::from_geodetic(lat, lon).neighborhood();
        let mut buildings = Vec::new();

        for (index, code) in codes.iter().enumerate() {
            let code = code.to_string();
            let path = config.tile_path(&code);
            let is_center = index == 4;

            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    if is_center {
                        return Err(StoreError::MissingCenterTile { code, path });
                    }
                    log::debug!("neighbor tile {code} has no file, skipping");
                    continue;
                }
                Err(source) => return Err(StoreError::Io { path, source }),
            };

            let mut parsed = citygml::parse_lod1_solids(&text, transform)
                .map_err(|source| StoreError::Parse { path, source })?;
            log::debug!("tile {code}: {} buildings", parsed.len());
            buildings.append(&mut parsed);
        }

        log::info!("loaded {} buildings around ({lat:.6}, {lon:.6})", buildings.len());
        Ok(Self { buildings })
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    /// Top-N buildings by 3D distance from `target` to their centroids.
    pub fn nearest(&self, target: Point3, n: usize) -> Vec<(f64, &Building)> {
        nearest_buildings(&self.buildings, target, n)
    }
}

/// Rank buildings ascending by centroid distance to `target` and keep the
/// first `min(n, len)`. The sort is stable, so equidistant buildings keep
/// their input order.
pub fn nearest_buildings(buildings: &[Building], target: Point3, n: usize) -> Vec<(f64, &Building)> {
    let mut ranked: Vec<(f64, &Building)> = buildings
        .iter()
        .map(|building| (target.distance(building.centroid()), building))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    ranked.truncate(n);
    ranked
}
