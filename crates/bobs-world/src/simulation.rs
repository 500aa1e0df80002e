//! Simulation engine: ticks, days and full runs.

use crate::bob::Bob;
use crate::combat::{CombatRule, Pacifist};
use crate::food::Food;
use crate::grid::Grid;
use crate::snapshot::GridSnapshot;
use bobs_core::{
    DayStats, EntityId, EntityKind, Error, GameConfig, PopulationStats, Position, Result,
    RunSummary, SpeciesConfig,
};
use rand::seq::index;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, trace};

/// Why a bob left the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Starvation,
    OutOfBounds,
    Combat,
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeathCause::Starvation => write!(f, "starvation"),
            DeathCause::OutOfBounds => write!(f, "out_of_bounds"),
            DeathCause::Combat => write!(f, "combat"),
        }
    }
}

#[derive(Debug)]
pub struct Simulation {
    grid: Grid,
    bobs: BTreeMap<EntityId, Bob>,
    foods: BTreeMap<EntityId, Food>,
    species: Arc<SpeciesConfig>,
    combat: Box<dyn CombatRule>,
    config: GameConfig,
    rng: ChaCha8Rng,
    next_serial: u64,
    populated: bool,
    /// Days completed
    day: u32,
    /// Ticks completed across all days
    tick: u64,
    day_stats: DayStats,
}

impl Simulation {
    /// Build an empty simulation. No bobs are placed until [`Simulation::populate`].
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;

        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let grid = Grid::from_config(&config.world_config);
        let species = Arc::new(config.species.clone());

        Ok(Self {
            grid,
            bobs: BTreeMap::new(),
            foods: BTreeMap::new(),
            species,
            combat: Box::new(Pacifist),
            config,
            rng,
            next_serial: 0,
            populated: false,
            day: 0,
            tick: 0,
            day_stats: DayStats::default(),
        })
    }

    /// Replace the rule applied between bobs sharing a cell
    pub fn with_combat_rule(mut self, rule: impl CombatRule + 'static) -> Self {
        self.combat = Box::new(rule);
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn species(&self) -> Arc<SpeciesConfig> {
        self.species.clone()
    }

    pub fn bob(&self, id: EntityId) -> Option<&Bob> {
        self.bobs.get(&id)
    }

    pub fn food(&self, id: EntityId) -> Option<&Food> {
        self.foods.get(&id)
    }

    pub fn bobs(&self) -> impl Iterator<Item = (EntityId, &Bob)> + '_ {
        self.bobs.iter().map(|(id, bob)| (*id, bob))
    }

    pub fn population(&self) -> usize {
        self.bobs.len()
    }

    pub fn food_count(&self) -> usize {
        self.foods.len()
    }

    pub fn days_completed(&self) -> u32 {
        self.day
    }

    pub fn ticks_completed(&self) -> u64 {
        self.tick
    }

    pub fn population_stats(&self) -> PopulationStats {
        PopulationStats::from_energies(self.bobs.values().map(|bob| bob.energy))
    }

    /// Owned copy of the grid for presentation code
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot::capture(&self.grid, self.day, self.tick, |id| match id.kind {
            EntityKind::Bob => self.bobs.get(&id).map_or(0.0, |bob| bob.energy),
            EntityKind::Food => self.foods.get(&id).map_or(0.0, Food::energy),
        })
    }

    /// Put a bob on the grid
    pub fn add_bob(&mut self, bob: Bob, pos: Position) -> Result<EntityId> {
        let id = EntityId::bob(self.next_serial);
        self.grid.place(id, pos)?;
        self.next_serial += 1;
        self.bobs.insert(id, bob);
        Ok(id)
    }

    /// Put a food item on the grid
    pub fn add_food(&mut self, food: Food, pos: Position) -> Result<EntityId> {
        if food.is_dead() {
            return Err(Error::InvalidState(format!("food at {} has no energy", pos)));
        }
        let id = EntityId::food(self.next_serial);
        self.grid.place(id, pos)?;
        self.next_serial += 1;
        self.foods.insert(id, food);
        Ok(id)
    }

    /// Place the initial bobs, each on a distinct random cell
    pub fn populate(&mut self) -> Result<()> {
        if self.populated {
            return Err(Error::InvalidState(
                "initial population already placed".to_string(),
            ));
        }

        let width = self.grid.width as usize;
        let cells = self.config.world_config.cell_count() as usize;
        let picks = index::sample(&mut self.rng, cells, self.config.initial_population);

        for cell in picks.iter() {
            let pos = Position::new((cell % width) as i32, (cell / width) as i32);
            let bob = Bob::new(self.species.clone());
            self.add_bob(bob, pos)?;
        }

        self.populated = true;
        info!(
            event = "population_placed",
            population = self.bobs.len(),
            width = self.grid.width,
            height = self.grid.height,
            "Initial population placed"
        );
        Ok(())
    }

    /// Scatter the daily food supply on uniformly random cells
    pub fn spawn_food(&mut self) -> Result<usize> {
        let quantity = self.config.food_config.quantity_food;
        let energy = self.config.food_config.energy_food;

        for _ in 0..quantity {
            let x = self.rng.gen_range(0..self.grid.width);
            let y = self.rng.gen_range(0..self.grid.height);
            self.add_food(Food::new(energy), Position::new(x, y))?;
        }

        self.day_stats.food_spawned += quantity as u64;
        Ok(quantity)
    }

    /// Remove every food item from the grid
    pub fn clear_food(&mut self) -> usize {
        let leftovers = self.grid.ids_of_kind(EntityKind::Food);
        for id in &leftovers {
            self.grid.remove(*id);
            self.foods.remove(id);
        }
        leftovers.len()
    }

    /// Run one tick: every bob on the grid at tick start acts once
    pub fn tick(&mut self) -> Result<()> {
        // Bobs born during this tick act from the next one.
        let roster = self.grid.ids_of_kind(EntityKind::Bob);
        let mut eaten = HashSet::new();

        for id in roster {
            self.act(id, &mut eaten)?;
        }

        self.tick += 1;
        self.day_stats.ticks += 1;
        trace!(
            tick = self.tick,
            population = self.bobs.len(),
            food = self.foods.len(),
            "Tick complete"
        );
        Ok(())
    }

    /// Run one day: spawn food, run the ticks, then drop uneaten food
    #[instrument(skip(self), fields(day = self.day))]
    pub fn day(&mut self) -> Result<DayStats> {
        self.day_stats = DayStats::new(self.day, self.bobs.len());

        self.spawn_food()?;
        for _ in 0..self.config.schedule.ticks_per_day {
            self.tick()?;
        }
        self.day_stats.food_discarded = self.clear_food() as u64;
        self.day_stats.end = self.population_stats();

        let stats = std::mem::take(&mut self.day_stats);
        self.day += 1;
        self.emit_day_summary(&stats);
        Ok(stats)
    }

    /// Place the initial population and run `days` days.
    ///
    /// The run never stops early, even if every bob has died.
    #[instrument(skip(self))]
    pub fn run(&mut self, days: u32) -> Result<RunSummary> {
        self.populate()?;

        let mut summary = RunSummary::new(self.bobs.len());
        info!("Starting simulation for {} days", days);

        for _ in 0..days {
            let stats = self.day()?;
            summary.record(stats);
        }

        info!(
            event = "run_summary",
            days = summary.days.len(),
            initial_population = summary.initial_population,
            final_population = summary.final_population(),
            peak_population = summary.peak_population(),
            total_births = summary.total_births(),
            total_deaths = summary.total_deaths(),
            "Run complete"
        );
        Ok(summary)
    }

    /// Run the number of days named in the configuration
    pub fn run_configured(&mut self) -> Result<RunSummary> {
        self.run(self.config.schedule.days)
    }

    fn act(&mut self, id: EntityId, eaten: &mut HashSet<EntityId>) -> Result<()> {
        let Some(mut position) = self.grid.position_of(id) else {
            return Ok(());
        };
        let Some(bob) = self.bobs.get_mut(&id) else {
            return Ok(());
        };
        bob.tick();

        let food_here = self
            .grid
            .cell_contents(position)
            .iter()
            .any(|other| self.foods.get(other).is_some_and(Food::is_available));

        if food_here {
            bob.spend(self.species.idle_cost);
        } else {
            let (dx, dy) = bob.next_move(&mut self.rng);
            let Some(target) = self.grid.offset(position, dx, dy) else {
                self.destroy_bob(id, DeathCause::OutOfBounds);
                return Ok(());
            };

            let cost = bob.movement_cost();
            bob.spend(cost);
            self.grid.relocate(id, target)?;
            position = target;
        }

        if self.bobs.get(&id).map_or(true, Bob::is_dead) {
            self.destroy_bob(id, DeathCause::Starvation);
            return Ok(());
        }

        self.eat_here(id, position, eaten);

        let newborn = self.bobs.get_mut(&id).and_then(Bob::reproduce);
        if let Some(child) = newborn {
            let child_energy = child.energy;
            let child_id = self.add_bob(child, position)?;
            self.day_stats.births += 1;
            debug!(
                event = "bob_birth",
                parent_id = %id,
                child_id = %child_id,
                child_energy = child_energy,
                x = position.x,
                y = position.y,
                tick = self.tick,
                "Bob gave birth"
            );
        }

        if self.bobs.get(&id).map_or(false, Bob::is_dead) {
            self.destroy_bob(id, DeathCause::Starvation);
            return Ok(());
        }

        self.resolve_encounters(id, position);
        Ok(())
    }

    /// The bob eats the first food in its cell that nobody ate this tick
    fn eat_here(&mut self, id: EntityId, position: Position, eaten: &mut HashSet<EntityId>) {
        let target = self.grid.cell_contents(position).iter().copied().find(|other| {
            !eaten.contains(other) && self.foods.get(other).is_some_and(Food::is_available)
        });
        let Some(food_id) = target else {
            return;
        };

        let (Some(bob), Some(food)) = (self.bobs.get_mut(&id), self.foods.get_mut(&food_id))
        else {
            return;
        };

        let before = bob.energy;
        let consumed = bob.eat(food);
        self.day_stats.energy_eaten += bob.energy - before;
        eaten.insert(food_id);

        if consumed {
            self.foods.remove(&food_id);
            self.grid.remove(food_id);
            self.day_stats.food_eaten += 1;
        }
    }

    /// Let the combat rule act between this bob and its cell mates
    fn resolve_encounters(&mut self, id: EntityId, position: Position) {
        let others: Vec<EntityId> = self
            .grid
            .cell_contents(position)
            .iter()
            .copied()
            .filter(|other| other.is_bob() && *other != id)
            .collect();
        if others.is_empty() {
            return;
        }

        let Some(mut attacker) = self.bobs.remove(&id) else {
            return;
        };
        let mut defeated = Vec::new();
        let mut drained = Vec::new();
        for other in others {
            if let Some(defender) = self.bobs.get_mut(&other) {
                if self.combat.engage(&mut attacker, defender) {
                    defeated.push(other);
                } else if defender.is_dead() {
                    drained.push(other);
                }
            }
        }
        let attacker_dead = attacker.is_dead();
        self.bobs.insert(id, attacker);

        for other in defeated {
            self.destroy_bob(other, DeathCause::Combat);
        }
        for other in drained {
            self.destroy_bob(other, DeathCause::Starvation);
        }
        if attacker_dead {
            self.destroy_bob(id, DeathCause::Starvation);
        }
    }

    fn destroy_bob(&mut self, id: EntityId, cause: DeathCause) {
        let position = self.grid.remove(id);
        let Some(bob) = self.bobs.remove(&id) else {
            return;
        };

        match cause {
            DeathCause::Starvation => self.day_stats.starvation_deaths += 1,
            DeathCause::OutOfBounds => self.day_stats.out_of_bounds_deaths += 1,
            DeathCause::Combat => self.day_stats.combat_deaths += 1,
        }

        debug!(
            event = "bob_death",
            bob_id = %id,
            cause = %cause,
            age = bob.age,
            final_energy = bob.energy,
            offspring_count = bob.offspring_count,
            position = ?position,
            tick = self.tick,
            "Bob died"
        );
    }

    fn emit_day_summary(&self, stats: &DayStats) {
        info!(
            event = "day_summary",
            day = stats.day,
            ticks = stats.ticks,
            population_start = stats.population_start,
            population_end = stats.end.population,
            births = stats.births,
            starvation_deaths = stats.starvation_deaths,
            out_of_bounds_deaths = stats.out_of_bounds_deaths,
            combat_deaths = stats.combat_deaths,
            food_spawned = stats.food_spawned,
            food_eaten = stats.food_eaten,
            food_discarded = stats.food_discarded,
            energy_eaten = stats.energy_eaten,
            avg_energy = stats.end.avg_energy(),
            min_energy = stats.end.min_energy,
            max_energy = stats.end.max_energy,
            "Day complete"
        );
    }
}
