//! Read-only copies of the grid handed to presentation code.

use crate::grid::Grid;
use bobs_core::{CellCounts, EntityId, EntityKind, Position, Result};
use serde::{Deserialize, Serialize};

/// One entity as seen from outside the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub energy: f64,
}

/// An occupied cell and its entities in cell order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellView {
    pub position: Position,
    pub entities: Vec<EntityView>,
}

impl CellView {
    pub fn counts(&self) -> CellCounts {
        let mut counts = CellCounts::default();
        for entity in &self.entities {
            counts.record(entity.kind);
        }
        counts
    }
}

/// Owned copy of the grid at one instant.
///
/// Cells are sorted by position; empty cells are not listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub width: i32,
    pub height: i32,
    /// Days completed when the snapshot was taken
    pub day: u32,
    /// Ticks completed when the snapshot was taken
    pub tick: u64,
    cells: Vec<CellView>,
}

impl GridSnapshot {
    pub(crate) fn capture(
        grid: &Grid,
        day: u32,
        tick: u64,
        energy_of: impl Fn(EntityId) -> f64,
    ) -> Self {
        let cells = grid
            .iter()
            .map(|(position, ids)| CellView {
                position,
                entities: ids
                    .iter()
                    .map(|&id| EntityView {
                        id,
                        kind: id.kind,
                        energy: energy_of(id),
                    })
                    .collect(),
            })
            .collect();

        Self {
            width: grid.width,
            height: grid.height,
            day,
            tick,
            cells,
        }
    }

    pub fn cells(&self) -> &[CellView] {
        &self.cells
    }

    pub fn cell(&self, pos: Position) -> Option<&CellView> {
        self.cells
            .binary_search_by_key(&pos, |cell| cell.position)
            .ok()
            .map(|index| &self.cells[index])
    }

    pub fn counts_at(&self, pos: Position) -> CellCounts {
        self.cell(pos).map(CellView::counts).unwrap_or_default()
    }

    /// Number of bobs on the grid
    pub fn population(&self) -> usize {
        self.count_kind(EntityKind::Bob)
    }

    /// Number of food items on the grid
    pub fn food_count(&self) -> usize {
        self.count_kind(EntityKind::Food)
    }

    fn count_kind(&self, kind: EntityKind) -> usize {
        self.cells
            .iter()
            .flat_map(|cell| &cell.entities)
            .filter(|entity| entity.kind == kind)
            .count()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
