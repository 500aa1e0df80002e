//! Food items scattered on the grid each day.

use serde::{Deserialize, Serialize};

/// A food item holding some energy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    energy: f64,
}

impl Food {
    pub fn new(energy: f64) -> Self {
        Self {
            energy: energy.max(0.0),
        }
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Food energy only ever goes down and never below zero.
    pub(crate) fn set_energy(&mut self, energy: f64) {
        self.energy = energy.clamp(0.0, self.energy);
    }

    /// Whether the food still has energy to give
    pub fn is_available(&self) -> bool {
        self.energy > 0.0
    }

    /// Fully consumed food must leave the grid
    pub fn is_dead(&self) -> bool {
        self.energy <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_food_creation() {
        let food = Food::new(100.0);
        assert_eq!(food.energy(), 100.0);
        assert!(food.is_available());
        assert!(!food.is_dead());

        let empty = Food::new(-5.0);
        assert_eq!(empty.energy(), 0.0);
        assert!(empty.is_dead());
    }

    #[test]
    fn test_energy_never_increases_or_goes_negative() {
        let mut food = Food::new(100.0);
        food.set_energy(40.0);
        assert_eq!(food.energy(), 40.0);

        food.set_energy(80.0);
        assert_eq!(food.energy(), 40.0);

        food.set_energy(-10.0);
        assert_eq!(food.energy(), 0.0);
        assert!(food.is_dead());
    }
}
