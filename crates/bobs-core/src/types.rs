//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of entity that can occupy a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Bob,
    Food,
}

/// Stable handle for an entity, assigned once at creation and never reused
/// within a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId {
    pub kind: EntityKind,
    pub serial: u64,
}

impl EntityId {
    pub fn bob(serial: u64) -> Self {
        Self {
            kind: EntityKind::Bob,
            serial,
        }
    }

    pub fn food(serial: u64) -> Self {
        Self {
            kind: EntityKind::Food,
            serial,
        }
    }

    pub fn is_bob(&self) -> bool {
        self.kind == EntityKind::Bob
    }

    pub fn is_food(&self) -> bool {
        self.kind == EntityKind::Food
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EntityKind::Bob => write!(f, "bob#{}", self.serial),
            EntityKind::Food => write!(f, "food#{}", self.serial),
        }
    }
}

/// 2D position on the grid. Ordering is by `x`, then `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset by `(dx, dy)`, or `None` when a coordinate leaves the `i32` range
    pub fn checked_add(&self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }

    /// Whether the position lies inside `[0, width) x [0, height)`
    pub fn is_within(&self, width: i32, height: i32) -> bool {
        (0..width).contains(&self.x) && (0..height).contains(&self.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Per-kind occupant counts for a single cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCounts {
    pub bobs: usize,
    pub foods: usize,
}

impl CellCounts {
    pub fn record(&mut self, kind: EntityKind) {
        match kind {
            EntityKind::Bob => self.bobs += 1,
            EntityKind::Food => self.foods += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.bobs + self.foods
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_bounds() {
        assert!(Position::new(0, 0).is_within(5, 5));
        assert!(Position::new(4, 4).is_within(5, 5));
        assert!(!Position::new(5, 0).is_within(5, 5));
        assert!(!Position::new(0, -1).is_within(5, 5));
        assert!(!Position::new(2, 3).is_within(5, 3));
    }

    #[test]
    fn test_position_ordering() {
        let mut positions = vec![
            Position::new(1, 0),
            Position::new(0, 2),
            Position::new(0, 1),
        ];
        positions.sort();
        assert_eq!(
            positions,
            vec![Position::new(0, 1), Position::new(0, 2), Position::new(1, 0)]
        );
    }

    #[test]
    fn test_checked_add_at_the_edge_of_i32() {
        let pos = Position::new(i32::MAX - 1, 0);
        assert_eq!(pos.checked_add(1, -1), Some(Position::new(i32::MAX, -1)));
        assert_eq!(pos.checked_add(2, 0), None);
        assert_eq!(Position::new(0, i32::MIN).checked_add(0, -1), None);
    }

    #[test]
    fn test_entity_id_kind() {
        assert!(EntityId::bob(3).is_bob());
        assert!(EntityId::food(3).is_food());
        assert_ne!(EntityId::bob(3), EntityId::food(3));
        assert_eq!(EntityId::bob(7).to_string(), "bob#7");
    }

    #[test]
    fn test_cell_counts() {
        let mut counts = CellCounts::default();
        counts.record(EntityKind::Bob);
        counts.record(EntityKind::Food);
        counts.record(EntityKind::Food);
        assert_eq!(counts.bobs, 1);
        assert_eq!(counts.foods, 2);
        assert_eq!(counts.total(), 3);
    }
}
