//! Stepping days on a worker thread while a snapshot is being presented.

use crate::simulation::Simulation;
use crate::snapshot::GridSnapshot;
use bobs_core::{DayStats, Error, Result};
use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::debug;

/// A simulation that can run its next day on a background thread.
///
/// Readers take owned snapshots; the day thread holds the write lock for the
/// whole day, so nothing observes a half-finished day.
#[derive(Debug, Clone)]
pub struct SharedSimulation {
    inner: Arc<RwLock<Simulation>>,
}

impl SharedSimulation {
    pub fn new(simulation: Simulation) -> Self {
        Self {
            inner: Arc::new(RwLock::new(simulation)),
        }
    }

    /// Copy of the grid as of the last completed day
    pub fn snapshot(&self) -> GridSnapshot {
        self.inner.read().snapshot()
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Simulation> {
        self.inner.read()
    }

    /// Start the next day on its own thread
    pub fn spawn_day(&self) -> Result<DayHandle> {
        let inner = self.inner.clone();
        let handle = thread::Builder::new()
            .name("bobs-day".to_string())
            .spawn(move || {
                let mut simulation = inner.write();
                debug!(day = simulation.days_completed(), "Day thread started");
                simulation.day()
            })?;

        Ok(DayHandle { handle })
    }

    /// Take the simulation back once no other handle shares it
    pub fn into_inner(self) -> Result<Simulation> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|_| Error::InvalidState("simulation is still shared".to_string()))
    }
}

/// A day running on a background thread. Its results are valid only after
/// [`DayHandle::join`].
#[derive(Debug)]
pub struct DayHandle {
    handle: JoinHandle<Result<DayStats>>,
}

impl DayHandle {
    /// Wait for the day to complete
    pub fn join(self) -> Result<DayStats> {
        self.handle
            .join()
            .map_err(|_| Error::InvalidState("day thread panicked".to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bobs_core::{FoodConfig, GameConfig, ScheduleConfig, WorldConfig};

    fn small_simulation() -> Simulation {
        let config = GameConfig {
            seed: 3,
            initial_population: 8,
            world_config: WorldConfig {
                width: 10,
                height: 10,
            },
            food_config: FoodConfig {
                quantity_food: 20,
                energy_food: 100.0,
            },
            schedule: ScheduleConfig {
                ticks_per_day: 5,
                days: 2,
            },
            ..Default::default()
        };
        let mut simulation = Simulation::new(config).unwrap();
        simulation.populate().unwrap();
        simulation
    }

    #[test]
    fn test_snapshot_taken_before_day_is_unchanged() {
        let shared = SharedSimulation::new(small_simulation());
        let before = shared.snapshot();

        let stats = shared.spawn_day().unwrap().join().unwrap();
        let after = shared.snapshot();

        assert_eq!(before.day, 0);
        assert_eq!(before.population(), 8);
        assert_eq!(after.day, 1);
        assert_eq!(after.tick, 5);
        assert_eq!(after.food_count(), 0);
        assert_eq!(stats.day, 0);
        assert_eq!(stats.end.population, after.population());
    }

    #[test]
    fn test_background_day_matches_inline_day() {
        let mut inline = small_simulation();
        let inline_stats = inline.day().unwrap();

        let shared = SharedSimulation::new(small_simulation());
        let threaded_stats = shared.spawn_day().unwrap().join().unwrap();

        assert_eq!(inline_stats, threaded_stats);
        assert_eq!(inline.snapshot(), shared.snapshot());
    }

    #[test]
    fn test_into_inner() {
        let shared = SharedSimulation::new(small_simulation());
        let other = shared.clone();
        assert!(matches!(other.into_inner(), Err(Error::InvalidState(_))));

        let simulation = shared.into_inner().unwrap();
        assert_eq!(simulation.population(), 8);
    }
}
