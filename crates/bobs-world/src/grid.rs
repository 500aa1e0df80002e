//! Sparse spatial index for the world.

use bobs_core::{CellCounts, EntityId, EntityKind, Error, Position, Result, WorldConfig};
use std::collections::{BTreeMap, HashMap};

/// A bounded 2D grid mapping cells to the entities standing on them.
///
/// Only occupied cells are stored. Each entity is indexed by handle so
/// position lookups never scan the cells.
#[derive(Debug, Clone)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    cells: BTreeMap<Position, Vec<EntityId>>,
    locations: HashMap<EntityId, Position>,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            cells: BTreeMap::new(),
            locations: HashMap::new(),
        }
    }

    /// Create an empty grid from world configuration
    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.width, config.height)
    }

    /// Whether a position lies on the grid
    pub fn contains(&self, pos: Position) -> bool {
        pos.is_within(self.width, self.height)
    }

    /// The in-bounds cell at `pos + (dx, dy)`, if any
    pub fn offset(&self, pos: Position, dx: i32, dy: i32) -> Option<Position> {
        pos.checked_add(dx, dy).filter(|target| self.contains(*target))
    }

    /// Append an entity to a cell, creating the cell if needed
    pub fn place(&mut self, id: EntityId, pos: Position) -> Result<()> {
        if !self.contains(pos) {
            return Err(Error::OutOfBounds { x: pos.x, y: pos.y });
        }
        if let Some(current) = self.locations.get(&id) {
            return Err(Error::AlreadyExists(format!("{} is already at {}", id, current)));
        }

        self.cells.entry(pos).or_default().push(id);
        self.locations.insert(id, pos);
        Ok(())
    }

    /// Remove an entity, dropping its cell if it becomes empty.
    ///
    /// Returns the position the entity occupied, or `None` if it was absent.
    pub fn remove(&mut self, id: EntityId) -> Option<Position> {
        let pos = self.locations.remove(&id)?;

        if let Some(occupants) = self.cells.get_mut(&pos) {
            occupants.retain(|&other| other != id);
            if occupants.is_empty() {
                self.cells.remove(&pos);
            }
        }

        Some(pos)
    }

    /// Move an entity to the end of another cell's collection
    pub fn relocate(&mut self, id: EntityId, pos: Position) -> Result<Option<Position>> {
        if !self.contains(pos) {
            return Err(Error::OutOfBounds { x: pos.x, y: pos.y });
        }
        let previous = self.remove(id);
        self.place(id, pos)?;
        Ok(previous)
    }

    pub fn position_of(&self, id: EntityId) -> Option<Position> {
        self.locations.get(&id).copied()
    }

    /// Entities in a cell, in insertion order
    pub fn cell_contents(&self, pos: Position) -> &[EntityId] {
        self.cells.get(&pos).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Count bobs and foods in a cell independently
    pub fn counts_at(&self, pos: Position) -> CellCounts {
        let mut counts = CellCounts::default();
        for id in self.cell_contents(pos) {
            counts.record(id.kind);
        }
        counts
    }

    /// In-bounds cells around a position.
    ///
    /// A distance of 1 yields the four orthogonal neighbours; any other
    /// distance yields the full square block (center included).
    pub fn neighbors(&self, pos: Position, distance: i32) -> Vec<Position> {
        let mut neighbors = Vec::new();

        if distance == 1 {
            for (dx, dy) in [(0, -1), (-1, 0), (1, 0), (0, 1)] {
                if let Some(candidate) = self.offset(pos, dx, dy) {
                    neighbors.push(candidate);
                }
            }
            return neighbors;
        }

        let distance = distance.saturating_abs();
        for dx in -distance..=distance {
            for dy in -distance..=distance {
                if let Some(candidate) = self.offset(pos, dx, dy) {
                    neighbors.push(candidate);
                }
            }
        }

        neighbors
    }

    /// Occupied cells in ascending position order
    pub fn iter(&self) -> impl Iterator<Item = (Position, &[EntityId])> + '_ {
        self.cells.iter().map(|(pos, ids)| (*pos, ids.as_slice()))
    }

    /// Handles of one kind in cell order, then insertion order
    pub fn ids_of_kind(&self, kind: EntityKind) -> Vec<EntityId> {
        self.cells
            .values()
            .flatten()
            .filter(|id| id.kind == kind)
            .copied()
            .collect()
    }

    pub fn entity_count(&self) -> usize {
        self.locations.len()
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}
