//! Simulation orchestration: one geometry load, per-plant sunlight tables,
//! then the strictly sequential day-stepping loop.

use chrono::{Datelike, Days, NaiveDate};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SimConfig;
use crate::plant::{Plant, Species, Stage};
use crate::solar::{NoaaSolar, SolarEphemeris};
use crate::store::{GeometryStore, StoreError};
use crate::sunlight::{self, SunlightTable, TargetPoint};
use crate::transform::{GeoTransform, PlaneRectangular, TransformError};

/// One plant of the input descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantSpec {
    pub species: String,
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
    pub initial_height: f64,
}

/// A full run request: the plant set plus the simulated window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    pub plants: Vec<PlantSpec>,
    pub start: NaiveDate,
    pub days: u32,
    /// Overrides the configured nearest-building count when set.
    #[serde(default)]
    pub nearest_count: Option<usize>,
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("no plant with a known species remains in the request")]
    NoPlants,
}

/// One day of output: per-plant heights and stages in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineRow {
    pub date: NaiveDate,
    pub heights: Vec<f64>,
    pub stages: Vec<Stage>,
}

/// Ordered-by-day simulation output. Columns follow the order of the
/// surviving plants in the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    pub species: Vec<String>,
    pub rows: Vec<TimelineRow>,
}

/// Append-only row collector, finalized once after the day loop.
struct TimelineBuilder {
    species: Vec<String>,
    rows: Vec<TimelineRow>,
}

impl TimelineBuilder {
    fn new(species: Vec<String>, days: u32) -> Self {
        Self {
            species,
            rows: Vec::with_capacity(days as usize),
        }
    }

    fn push(&mut self, row: TimelineRow) {
        self.rows.push(row);
    }

    fn finish(self) -> Timeline {
        Timeline {
            species: self.species,
            rows: self.rows,
        }
    }
}

/// Run a simulation with the bundled transform and ephemeris.
pub fn run(config: &SimConfig, request: &RunRequest) -> Result<Timeline, SimError> {
    let transform = PlaneRectangular::for_codes(config.from_epsg, config.to_epsg)?;
    run_with(config, request, &transform, &NoaaSolar)
}

/// Run a simulation against explicit collaborators.
pub fn run_with(
    config: &SimConfig,
    request: &RunRequest,
    transform: &dyn GeoTransform,
    ephemeris: &dyn SolarEphemeris,
) -> Result<Timeline, SimError> {
    // Unknown species are dropped from the run, warned here at the seam.
    let mut plants: Vec<(&PlantSpec, Species)> = Vec::with_capacity(request.plants.len());
    for spec in &request.plants {
        match Species::from_label(&spec.species) {
            Some(species) => plants.push((spec, species)),
            None => log::warn!("unknown species '{}', dropping plant from run", spec.species),
        }
    }
    if plants.is_empty() {
        return Err(SimError::NoPlants);
    }

    // All plants of a run share one building neighborhood, resolved around
    // the mean position. A simplification for multi-tree sites.
    let count = plants.len() as f64;
    let rep_lat = plants.iter().map(|(s, _)| s.lat).sum::<f64>() / count;
    let rep_lon = plants.iter().map(|(s, _)| s.lon).sum::<f64>() / count;
    let rep_alt = plants.iter().map(|(s, _)| s.alt).sum::<f64>() / count;

    let store = GeometryStore::load(config, transform, rep_lat, rep_lon)?;
    let representative = TargetPoint::new(transform, rep_lat, rep_lon, rep_alt);
    let nearest_count = request.nearest_count.unwrap_or(config.nearest_count);
    let nearest = store.nearest(representative.projected, nearest_count);

    let targets: Vec<TargetPoint> = plants
        .iter()
        .map(|(spec, _)| TargetPoint::new(transform, spec.lat, spec.lon, spec.alt))
        .collect();

    // Independent per-plant tables; indexed collect keeps input order no
    // matter which worker finishes first.
    let tables: Vec<SunlightTable> = targets
        .par_iter()
        .map(|target| sunlight::compute_table(&nearest, target, ephemeris))
        .collect();

    let mut states: Vec<Plant> = plants
        .iter()
        .map(|(spec, species)| Plant::new(*species, spec.initial_height))
        .collect();

    let mut builder = TimelineBuilder::new(
        plants.iter().map(|(spec, _)| spec.species.clone()).collect(),
        request.days,
    );

    // Day d+1 depends on day d's heights: strictly sequential.
    for offset in 0..request.days {
        let date = request
            .start
            .checked_add_days(Days::new(u64::from(offset)))
            .expect("simulated window stays inside the supported calendar");
        let month = date.month();
        let day = date.day();

        let mut heights = Vec::with_capacity(states.len());
        let mut stages = Vec::with_capacity(states.len());
        for (plant, table) in states.iter_mut().zip(&tables) {
            let hours = table
                .hours_on(month, day)
                .expect("reference table covers every calendar day");
            plant.grow(hours);
            heights.push(plant.height());
            stages.push(plant.stage(month));
        }

        builder.push(TimelineRow {
            date,
            heights,
            stages,
        });
    }

    Ok(builder.finish())
}

/// Sequential twin of the parallel table stage, used to pin down the
/// deterministic-gather property in tests.
pub fn sunlight_tables_sequential(
    candidates: &[(f64, &crate::geom::Building)],
    targets: &[TargetPoint],
    ephemeris: &dyn SolarEphemeris,
) -> Vec<SunlightTable> {
    targets
        .iter()
        .map(|target| sunlight::compute_table(candidates, target, ephemeris))
        .collect()
}

/// Parallel per-target table computation with order-preserving gather.
pub fn sunlight_tables_parallel(
    candidates: &[(f64, &crate::geom::Building)],
    targets: &[TargetPoint],
    ephemeris: &dyn SolarEphemeris,
) -> Vec<SunlightTable> {
    targets
        .par_iter()
        .map(|target| sunlight::compute_table(candidates, target, ephemeris))
        .collect()
}
