//! YAML scenario files: a named plant set plus its geometry configuration.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::config::SimConfig;
use crate::sim::{PlantSpec, RunRequest};

fn default_days() -> u32 {
    365
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub config: SimConfig,
    pub plants: Vec<PlantSpec>,
    pub start: NaiveDate,
    #[serde(default = "default_days")]
    pub days: u32,
    #[serde(default)]
    pub nearest_count: Option<usize>,
}

impl Scenario {
    pub fn request(&self, override_days: Option<u32>) -> RunRequest {
        RunRequest {
            plants: self.plants.clone(),
            start: self.start,
            days: override_days.unwrap_or(self.days),
            nearest_count: self.nearest_count,
        }
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(scenario)
    }
}
