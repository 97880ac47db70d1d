//! Species growth and phenology.
//!
//! Species is a closed sum type: adding one means adding a variant plus its
//! growth constants and month table, nothing else. Growth is the only
//! height mutator and is capped per species, so height is monotonically
//! non-decreasing by construction.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Gingko,
    Cherry,
}

impl Species {
    /// Parse a label from the plant-set descriptor. Unknown labels return
    /// `None`; the orchestrator drops such plants from the run.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "gingko" => Some(Species::Gingko),
            "cherry" => Some(Species::Cherry),
            _ => None,
        }
    }

    /// Height gained per sunlight hour, in metres.
    fn growth_rate(self) -> f64 {
        match self {
            Species::Gingko => 0.0001,
            Species::Cherry => 0.0002,
        }
    }

    /// Mature height cap in metres.
    fn max_height(self) -> f64 {
        match self {
            Species::Gingko => 30.0,
            Species::Cherry => 20.0,
        }
    }

    /// Phenological stage for a calendar month. Pure in the month: no
    /// hysteresis, no dependence on growth history.
    pub fn stage(self, month: u32) -> Stage {
        match self {
            Species::Gingko => match month {
                4..=9 => Stage::Green,
                10 | 11 => Stage::Yellow,
                _ => Stage::NoLeaves,
            },
            Species::Cherry => match month {
                3 | 4 => Stage::Pink,
                5..=9 => Stage::Green,
                10 | 11 => Stage::Orange,
                _ => Stage::NoLeaves,
            },
        }
    }
}

/// Visible leaf state over the calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Green,
    Yellow,
    Pink,
    Orange,
    NoLeaves,
}

/// One tracked plant: species plus its current height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub species: Species,
    height: f64,
}

impl Plant {
    pub fn new(species: Species, initial_height: f64) -> Self {
        Self {
            species,
            height: initial_height.max(0.0),
        }
    }

    /// Apply one day of growth from that day's sunlight hours.
    pub fn grow(&mut self, sunlight_hours: u32) {
        let gained = self.height + f64::from(sunlight_hours) * self.species.growth_rate();
        self.height = gained.min(self.species.max_height()).max(self.height);
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn stage(&self, month: u32) -> Stage {
        self.species.stage(month)
    }
}
