//! World simulation engine.
//!
//! Bobs forage for food on a bounded 2D grid. A day spawns food, runs a fixed
//! number of ticks and then clears whatever food is left.

pub mod background;
pub mod bob;
pub mod combat;
pub mod food;
pub mod grid;
pub mod simulation;
pub mod snapshot;

pub use background::{DayHandle, SharedSimulation};
pub use bob::Bob;
pub use combat::{CombatRule, Pacifist};
pub use food::Food;
pub use grid::Grid;
pub use simulation::{DeathCause, Simulation};
pub use snapshot::{CellView, EntityView, GridSnapshot};
