//! Bob state and behavior.

use crate::food::Food;
use bobs_core::SpeciesConfig;
use rand::Rng;
use std::sync::Arc;

/// A foraging agent.
///
/// Bobs decide how to move, eat and reproduce; placing them on the grid is
/// left to the simulation.
#[derive(Debug, Clone)]
pub struct Bob {
    species: Arc<SpeciesConfig>,
    pub speed: i32,
    pub mass: f64,
    pub energy: f64,
    pub last_move: (i32, i32),
    /// Ticks this bob has been processed
    pub age: u64,
    pub offspring_count: u32,
}

impl Bob {
    /// Create a bob with the species' initial energy
    pub fn new(species: Arc<SpeciesConfig>) -> Self {
        let energy = species.initial_energy;
        Self::with_energy(species, energy)
    }

    pub fn with_energy(species: Arc<SpeciesConfig>, energy: f64) -> Self {
        Self {
            speed: species.speed,
            mass: species.mass,
            species,
            energy,
            last_move: (0, 0),
            age: 0,
            offspring_count: 0,
        }
    }

    pub fn species(&self) -> &SpeciesConfig {
        &self.species
    }

    pub fn is_dead(&self) -> bool {
        self.energy <= 0.0
    }

    /// Deduct energy. The bob may end up dead.
    pub fn spend(&mut self, amount: f64) {
        self.energy -= amount;
    }

    /// Energy paid for one successful move: `max(Etmin, speed²) + mass·∛speed`
    pub fn movement_cost(&self) -> f64 {
        let speed = f64::from(self.speed);
        (speed * speed).max(self.species.min_move_cost) + self.mass * speed.cbrt()
    }

    /// Pick a random displacement spending the whole speed budget.
    ///
    /// `|dx|` is drawn uniformly from `0..=speed` and `|dy|` takes the rest,
    /// each with a random sign.
    pub fn next_move<R: Rng + ?Sized>(&mut self, rng: &mut R) -> (i32, i32) {
        let speed = self.speed.max(0);
        let along_x = rng.gen_range(0..=speed);
        let dx = along_x * random_sign(rng);
        let dy = (speed - along_x) * random_sign(rng);

        self.last_move = (dx, dy);
        self.last_move
    }

    /// Eat a food item, clamping at the species' maximum energy.
    ///
    /// Whatever does not fit stays on the food. Returns true when the food
    /// has been fully consumed and must be removed.
    pub fn eat(&mut self, food: &mut Food) -> bool {
        let max_energy = self.species.max_energy;
        let total = self.energy + food.energy();

        if total > max_energy {
            food.set_energy(total - max_energy);
            self.energy = max_energy;
        } else {
            food.set_energy(0.0);
            self.energy = total;
        }

        food.is_dead()
    }

    /// Parthenogenesis: a bob at maximum energy gives birth.
    ///
    /// The mother drops to `Emax - Emother` and the newborn starts with
    /// `Echild`, inheriting speed, mass and last move.
    pub fn reproduce(&mut self) -> Option<Bob> {
        if self.energy < self.species.max_energy {
            return None;
        }

        self.energy = self.species.max_energy - self.species.reproduction_cost;
        self.offspring_count += 1;

        let mut child = Bob::with_energy(self.species.clone(), self.species.child_energy);
        child.speed = self.speed;
        child.mass = self.mass;
        child.last_move = self.last_move;
        Some(child)
    }

    pub fn tick(&mut self) {
        self.age += 1;
    }
}

fn random_sign<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    if rng.gen_bool(0.5) {
        1
    } else {
        -1
    }
}
