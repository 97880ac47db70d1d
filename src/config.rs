//! Run configuration: everything the geometry store used to hardcode.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

fn default_from_epsg() -> u32 {
    6697
}

fn default_to_epsg() -> u32 {
    6677
}

fn default_file_pattern() -> String {
    "{code}_bldg_{from}_op.gml".to_string()
}

fn default_nearest_count() -> usize {
    20
}

/// Geometry-source and neighborhood settings shared by every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Directory holding one CityGML file per mesh code.
    pub data_dir: PathBuf,
    /// EPSG code of the geodetic system the tile files are written in.
    #[serde(default = "default_from_epsg")]
    pub from_epsg: u32,
    /// EPSG code of the projected plane rectangular zone.
    #[serde(default = "default_to_epsg")]
    pub to_epsg: u32,
    /// Tile filename template; `{code}` and `{from}` are substituted.
    #[serde(default = "default_file_pattern")]
    pub file_pattern: String,
    /// How many nearest buildings to keep as occluder candidates.
    #[serde(default = "default_nearest_count")]
    pub nearest_count: usize,
}

impl SimConfig {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            from_epsg: default_from_epsg(),
            to_epsg: default_to_epsg(),
            file_pattern: default_file_pattern(),
            nearest_count: default_nearest_count(),
        }
    }

    /// Path of the tile file for one mesh code.
    pub fn tile_path(&self, code: &str) -> PathBuf {
        let name = self
            .file_pattern
            .replace("{code}", code)
            .replace("{from}", &self.from_epsg.to_string());
        self.data_dir.join(name)
    }
}
