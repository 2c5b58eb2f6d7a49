//! The row x column cell matrix and the rule assigning publications to it.
//!
//! Membership is always what [`assignment`] says. Structural edits only
//! re-evaluate the publications whose membership can change: the former
//! members of the touched lines plus everything the touched filters now
//! accept. That keeps incremental edits equal to a full redistribution.

use crate::axis::GridAxis;
use crate::cell::Cell;
use pivotslice_core::{AxisKind, CellCoord, PublicationGraph, PublicationId};
use std::collections::BTreeSet;

/// Cells a publication belongs to, by precedence:
/// every matching (row, column) pair of constrained lines; else every
/// matching constrained row with the residual column; else every matching
/// constrained column with the residual row; else the residual cell.
pub fn assignment(
    graph: &PublicationGraph,
    rows: &GridAxis,
    cols: &GridAxis,
    publication: PublicationId,
) -> Vec<CellCoord> {
    let hits = |axis: &GridAxis| -> Vec<usize> {
        axis.filters()
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, filter)| filter.satisfies(graph, publication))
            .map(|(index, _)| index)
            .collect()
    };
    let row_hits = hits(rows);
    let col_hits = hits(cols);

    match (row_hits.is_empty(), col_hits.is_empty()) {
        (false, false) => row_hits
            .iter()
            .flat_map(|&row| col_hits.iter().map(move |&col| CellCoord::new(row, col)))
            .collect(),
        (false, true) => row_hits.into_iter().map(|row| CellCoord::new(row, 0)).collect(),
        (true, false) => col_hits.into_iter().map(|col| CellCoord::new(0, col)).collect(),
        (true, true) => vec![CellCoord::RESIDUAL],
    }
}

/// Cells stored row-major: `cells[row][col]`.
#[derive(Debug, Clone)]
pub struct CellMatrix {
    cells: Vec<Vec<Cell>>,
}

impl Default for CellMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl CellMatrix {
    pub fn new() -> Self {
        Self {
            cells: vec![vec![Cell::new()]],
        }
    }

    /// A single residual cell holding every publication of the graph.
    pub fn with_graph(graph: &PublicationGraph) -> Self {
        Self {
            cells: vec![vec![Cell::with_publications(graph.publication_ids().collect())]],
        }
    }

    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    pub fn col_count(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.cells.get(coord.row).and_then(|row| row.get(coord.col))
    }

    pub(crate) fn cell_mut(&mut self, coord: CellCoord) -> Option<&mut Cell> {
        self.cells.get_mut(coord.row).and_then(|row| row.get_mut(coord.col))
    }

    pub fn coords(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let cols = self.col_count();
        (0..self.row_count())
            .flat_map(move |row| (0..cols).map(move |col| CellCoord::new(row, col)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &Cell)> {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, cell)| (CellCoord::new(row, col), cell))
        })
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (CellCoord, &mut Cell)> {
        self.cells.iter_mut().enumerate().flat_map(|(row, cells)| {
            cells
                .iter_mut()
                .enumerate()
                .map(move |(col, cell)| (CellCoord::new(row, col), cell))
        })
    }

    /// Coordinates of every cell on line `index` of `axis`.
    pub fn line_coords(&self, axis: AxisKind, index: usize) -> Vec<CellCoord> {
        match axis {
            AxisKind::Row if index < self.row_count() => {
                (0..self.col_count()).map(|col| CellCoord::new(index, col)).collect()
            }
            AxisKind::Column if index < self.col_count() => {
                (0..self.row_count()).map(|row| CellCoord::new(row, index)).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Union of the publications held by line `index` of `axis`.
    pub fn line_members(&self, axis: AxisKind, index: usize) -> BTreeSet<PublicationId> {
        self.line_coords(axis, index)
            .into_iter()
            .filter_map(|coord| self.cell(coord))
            .flat_map(|cell| cell.publications().iter().copied())
            .collect()
    }

    /// Every cell holding `publication`, in row-major order.
    pub fn cells_holding(&self, publication: PublicationId) -> Vec<CellCoord> {
        self.iter()
            .filter(|(_, cell)| cell.contains(publication))
            .map(|(coord, _)| coord)
            .collect()
    }

    /// Inserts a line of empty cells before `index` of `axis`.
    pub(crate) fn insert_line(&mut self, axis: AxisKind, index: usize) {
        match axis {
            AxisKind::Row => {
                let index = index.min(self.row_count());
                let cols = self.col_count();
                self.cells.insert(index, (0..cols).map(|_| Cell::new()).collect());
            }
            AxisKind::Column => {
                let index = index.min(self.col_count());
                for row in &mut self.cells {
                    row.insert(index, Cell::new());
                }
            }
        }
    }

    /// Drops line `index` of `axis` and returns its cells. The residual line
    /// is never removed.
    pub(crate) fn remove_line(&mut self, axis: AxisKind, index: usize) -> Vec<Cell> {
        if index == 0 {
            return Vec::new();
        }
        match axis {
            AxisKind::Row if index < self.row_count() => self.cells.remove(index),
            AxisKind::Column if index < self.col_count() => {
                self.cells.iter_mut().map(|row| row.remove(index)).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Re-derives membership of `candidates` and returns the cells whose
    /// publication set changed. Candidates no longer in the graph are dropped.
    pub(crate) fn reassign(
        &mut self,
        graph: &PublicationGraph,
        rows: &GridAxis,
        cols: &GridAxis,
        candidates: &BTreeSet<PublicationId>,
    ) -> BTreeSet<CellCoord> {
        let mut dirty = BTreeSet::new();
        for &publication in candidates {
            let expected: BTreeSet<CellCoord> = if graph.contains(publication) {
                assignment(graph, rows, cols, publication).into_iter().collect()
            } else {
                BTreeSet::new()
            };
            for (coord, cell) in self.iter_mut() {
                let changed = if expected.contains(&coord) {
                    cell.insert(publication)
                } else {
                    cell.remove(publication)
                };
                if changed {
                    dirty.insert(coord);
                }
            }
        }
        tracing::debug!(
            "Reassigned {} publications, {} cells changed",
            candidates.len(),
            dirty.len()
        );
        dirty
    }
}
