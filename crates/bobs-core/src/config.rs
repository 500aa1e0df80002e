//! Configuration types for the simulation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Grid dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the grid (N)
    #[serde(alias = "N")]
    pub width: i32,
    /// Height of the grid (M)
    #[serde(alias = "M")]
    pub height: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
        }
    }
}

impl WorldConfig {
    /// Number of cells on the grid
    pub fn cell_count(&self) -> u64 {
        (self.width.max(0) as u64) * (self.height.max(0) as u64)
    }
}

/// Daily food supply
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodConfig {
    /// Food items spawned at the start of every day
    pub quantity_food: usize,
    /// Energy held by each freshly spawned food item
    pub energy_food: f64,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            quantity_food: 200,
            energy_food: 100.0,
        }
    }
}

/// Constants shared by every bob of a species.
///
/// One instance is created per simulation and shared (read-only) by all bobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeciesConfig {
    /// Energy of the bobs placed at simulation start
    pub initial_energy: f64,
    /// Movement budget per tick (|dx| + |dy|)
    pub speed: i32,
    pub mass: f64,
    /// Energy ceiling (Emax); reaching it triggers reproduction
    #[serde(alias = "Emax")]
    pub max_energy: f64,
    /// Energy a mother pays to give birth (Emother)
    #[serde(alias = "Emother")]
    pub reproduction_cost: f64,
    /// Energy given to a newborn (Echild)
    #[serde(alias = "Echild")]
    pub child_energy: f64,
    /// Floor applied to the kinetic part of the movement cost (Etmin)
    #[serde(alias = "Etmin")]
    pub min_move_cost: f64,
    /// Cost of staying on a cell that holds food
    pub idle_cost: f64,
}

impl Default for SpeciesConfig {
    fn default() -> Self {
        Self {
            initial_energy: 100.0,
            speed: 1,
            mass: 1.0,
            max_energy: 200.0,
            reproduction_cost: 150.0,
            child_energy: 50.0,
            min_move_cost: 0.5,
            idle_cost: 0.5,
        }
    }
}

/// Day and tick scheduling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    #[serde(alias = "nb_tick_day")]
    pub ticks_per_day: u32,
    /// Total number of days in a run
    #[serde(alias = "nb_day")]
    pub days: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            ticks_per_day: 100,
            days: 10,
        }
    }
}

/// Full configuration for one simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Number of bobs placed when the run starts (P0)
    #[serde(alias = "P0")]
    pub initial_population: usize,
    pub world_config: WorldConfig,
    pub food_config: FoodConfig,
    pub species: SpeciesConfig,
    pub schedule: ScheduleConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            initial_population: 100,
            world_config: WorldConfig::default(),
            food_config: FoodConfig::default(),
            species: SpeciesConfig::default(),
            schedule: ScheduleConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Reject configurations the engine cannot run.
    pub fn validate(&self) -> Result<()> {
        let world = &self.world_config;
        if world.width <= 0 || world.height <= 0 {
            return Err(Error::InvalidConfig(format!(
                "grid dimensions must be positive, got {}x{}",
                world.width, world.height
            )));
        }

        // Initial bobs need distinct cells.
        if self.initial_population as u64 > world.cell_count() {
            return Err(Error::InvalidConfig(format!(
                "initial population {} exceeds the {} cells of a {}x{} grid",
                self.initial_population,
                world.cell_count(),
                world.width,
                world.height
            )));
        }

        // Food with no energy would never be eaten nor removed.
        if !(self.food_config.energy_food > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "energy_food must be positive, got {}",
                self.food_config.energy_food
            )));
        }

        let species = &self.species;
        if species.speed < 0 {
            return Err(Error::InvalidConfig(format!(
                "speed must be non-negative, got {}",
                species.speed
            )));
        }

        let non_negative = [
            ("mass", species.mass),
            ("initial_energy", species.initial_energy),
            ("child_energy", species.child_energy),
            ("reproduction_cost", species.reproduction_cost),
            ("min_move_cost", species.min_move_cost),
            ("idle_cost", species.idle_cost),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }

        if !(species.max_energy > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "max_energy must be positive, got {}",
                species.max_energy
            )));
        }

        let capped = [
            ("initial_energy", species.initial_energy),
            ("child_energy", species.child_energy),
            ("reproduction_cost", species.reproduction_cost),
        ];
        for (name, value) in capped {
            if value > species.max_energy {
                return Err(Error::InvalidConfig(format!(
                    "{} {} exceeds max_energy {}",
                    name, value, species.max_energy
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let config = GameConfig::default();
        assert_eq!(config.world_config.width, 100);
        assert_eq!(config.world_config.height, 100);
        assert_eq!(config.initial_population, 100);
        assert_eq!(config.food_config.quantity_food, 200);
        assert_eq!(config.schedule.ticks_per_day, 100);
        assert_eq!(config.species.max_energy, 200.0);
        assert_eq!(config.species.reproduction_cost, 150.0);
        assert_eq!(config.species.child_energy, 50.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_population_larger_than_grid_is_rejected() {
        let config = GameConfig {
            initial_population: 26,
            world_config: WorldConfig {
                width: 5,
                height: 5,
            },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = GameConfig {
            initial_population: 25,
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_species_is_rejected() {
        let mut config = GameConfig::default();
        config.species.reproduction_cost = 250.0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.species.speed = -1;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.species.mass = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.world_config.height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_energies_above_max_energy_are_rejected() {
        let mut config = GameConfig::default();
        config.species.initial_energy = 200.5;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = GameConfig::default();
        config.species.child_energy = 201.0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = GameConfig::default();
        config.species.initial_energy = 200.0;
        config.species.child_energy = 200.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_food_without_energy_is_rejected() {
        let mut config = GameConfig::default();
        config.food_config.energy_food = 0.0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        config.food_config.quantity_food = 0;
        assert!(config.validate().is_err());

        config.food_config.energy_food = 0.5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_aliases_and_defaults() {
        let json = r#"{
            "seed": 7,
            "P0": 3,
            "world_config": { "N": 10, "M": 12 },
            "food_config": { "quantity_food": 5 },
            "schedule": { "nb_tick_day": 20, "nb_day": 2 },
            "species": { "Emax": 300.0 }
        }"#;

        let config = GameConfig::from_json_str(json).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.initial_population, 3);
        assert_eq!(config.world_config.width, 10);
        assert_eq!(config.world_config.height, 12);
        assert_eq!(config.food_config.quantity_food, 5);
        assert_eq!(config.food_config.energy_food, 100.0);
        assert_eq!(config.schedule.ticks_per_day, 20);
        assert_eq!(config.schedule.days, 2);
        assert_eq!(config.species.max_energy, 300.0);
        assert_eq!(config.species.child_energy, 50.0);
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let err = GameConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));

        let err = GameConfig::from_json_str(r#"{ "P0": 1000000 }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
