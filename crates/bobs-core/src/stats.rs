//! Population and day statistics.

use serde::{Deserialize, Serialize};

/// Energy distribution of the living bobs at one instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationStats {
    pub population: usize,
    pub total_energy: f64,
    pub min_energy: f64,
    pub max_energy: f64,
}

impl PopulationStats {
    /// Build stats from an iterator over bob energies
    pub fn from_energies(energies: impl IntoIterator<Item = f64>) -> Self {
        let mut stats = Self::default();
        for energy in energies {
            if stats.population == 0 {
                stats.min_energy = energy;
                stats.max_energy = energy;
            } else {
                stats.min_energy = stats.min_energy.min(energy);
                stats.max_energy = stats.max_energy.max(energy);
            }
            stats.total_energy += energy;
            stats.population += 1;
        }
        stats
    }

    pub fn avg_energy(&self) -> f64 {
        if self.population == 0 {
            0.0
        } else {
            self.total_energy / self.population as f64
        }
    }
}

/// Counters collected over one simulated day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayStats {
    /// Zero-based index of the day within the run
    pub day: u32,
    pub ticks: u32,
    pub population_start: usize,
    pub births: u64,
    pub starvation_deaths: u64,
    pub out_of_bounds_deaths: u64,
    pub combat_deaths: u64,
    pub food_spawned: u64,
    /// Food items fully consumed (removed because their energy hit 0)
    pub food_eaten: u64,
    /// Food items still on the grid at the end of the day
    pub food_discarded: u64,
    /// Energy transferred from food to bobs
    pub energy_eaten: f64,
    /// Population at the end of the day
    pub end: PopulationStats,
}

impl DayStats {
    pub fn new(day: u32, population_start: usize) -> Self {
        Self {
            day,
            population_start,
            ..Default::default()
        }
    }

    pub fn deaths(&self) -> u64 {
        self.starvation_deaths + self.out_of_bounds_deaths + self.combat_deaths
    }
}

/// Aggregate result of a full run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub days: Vec<DayStats>,
    pub initial_population: usize,
}

impl RunSummary {
    pub fn new(initial_population: usize) -> Self {
        Self {
            days: Vec::new(),
            initial_population,
        }
    }

    pub fn record(&mut self, day: DayStats) {
        self.days.push(day);
    }

    pub fn final_population(&self) -> usize {
        self.days
            .last()
            .map(|day| day.end.population)
            .unwrap_or(self.initial_population)
    }

    pub fn total_births(&self) -> u64 {
        self.days.iter().map(|day| day.births).sum()
    }

    pub fn total_deaths(&self) -> u64 {
        self.days.iter().map(DayStats::deaths).sum()
    }

    /// Largest end-of-day population seen during the run
    pub fn peak_population(&self) -> usize {
        self.days
            .iter()
            .map(|day| day.end.population)
            .max()
            .unwrap_or(self.initial_population)
            .max(self.initial_population)
    }
}
