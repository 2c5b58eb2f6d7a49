use crate::axis::GridAxis;
use crate::cell::{CellStats, NodeVisual};
use crate::edges::EdgeVisual;
use crate::filter::Filter;
use crate::partition::CellMatrix;
use pivotslice_core::{AxisKind, CellCoord, FacetId, PublicationId};
use serde::Serialize;

/// Read-only view of a session handed to renderers and the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct GridSnapshot {
    pub rows: Vec<LineSnapshot>,
    pub columns: Vec<LineSnapshot>,
    pub cells: Vec<CellSnapshot>,
    pub edges: Vec<EdgeVisual>,
    pub selected: Option<CellCoord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineSnapshot {
    pub index: usize,
    pub label: String,
    pub collapsed: bool,
    pub layout_facet: Option<FacetId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CellSnapshot {
    pub coord: CellCoord,
    pub publications: Vec<PublicationId>,
    pub visuals: Vec<NodeVisual>,
    pub stats: CellStats,
    pub collapse_x: bool,
    pub collapse_y: bool,
    pub matrix_mode: bool,
}

fn line_label(filter: &Filter) -> String {
    let parts: Vec<String> = filter
        .non_empty_constraints()
        .map(ToString::to_string)
        .collect();
    if parts.is_empty() {
        "*".to_string()
    } else {
        parts.join(" & ")
    }
}

fn lines(axis: &GridAxis) -> Vec<LineSnapshot> {
    axis.filters()
        .iter()
        .enumerate()
        .map(|(index, filter)| LineSnapshot {
            index,
            label: line_label(filter),
            collapsed: filter.is_collapsed(),
            layout_facet: filter.layout_facet(),
        })
        .collect()
}

impl GridSnapshot {
    pub(crate) fn capture(
        rows: &GridAxis,
        cols: &GridAxis,
        matrix: &CellMatrix,
        edges: impl IntoIterator<Item = EdgeVisual>,
        selected: Option<CellCoord>,
    ) -> Self {
        Self {
            rows: lines(rows),
            columns: lines(cols),
            cells: matrix
                .iter()
                .map(|(coord, cell)| CellSnapshot {
                    coord,
                    publications: cell.publications().iter().copied().collect(),
                    visuals: cell.visuals().to_vec(),
                    stats: *cell.stats(),
                    collapse_x: cell.collapse_flag(AxisKind::Column),
                    collapse_y: cell.collapse_flag(AxisKind::Row),
                    matrix_mode: cell.is_matrix_mode(),
                })
                .collect(),
            edges: edges.into_iter().collect(),
            selected,
        }
    }

    pub fn cell(&self, coord: CellCoord) -> Option<&CellSnapshot> {
        self.cells.iter().find(|cell| cell.coord == coord)
    }
}
