pub mod citygml;
pub mod config;
pub mod geom;
pub mod mesh;
pub mod occlusion;
pub mod plant;
pub mod scenario;
pub mod sim;
pub mod solar;
pub mod store;
pub mod sunlight;
pub mod transform;
pub mod web;

pub use config::SimConfig;
pub use sim::{run, PlantSpec, RunRequest, Timeline};
