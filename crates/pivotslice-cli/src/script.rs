use anyhow::{Result, anyhow};
use pivotslice_core::{AxisKind, CellCoord, Citation, FacetId, Publication};
use pivotslice_grid::{GridSession, parse_constraint};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One step of a script file: a JSON array of objects tagged by `op`, e.g.
/// `{"op": "add_filter", "axis": "column", "query": "/year 2000-2002"}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    AddFilter {
        axis: AxisKind,
        query: String,
        #[serde(default)]
        at: Option<usize>,
    },
    RemoveFilter {
        axis: AxisKind,
        index: usize,
    },
    MergeInto {
        axis: AxisKind,
        index: usize,
        query: String,
    },
    Split {
        axis: AxisKind,
        index: usize,
    },
    ClearConstraint {
        axis: AxisKind,
        index: usize,
        facet: String,
    },
    MergeFilters {
        axis: AxisKind,
        from: usize,
        into: usize,
    },
    AddToSelection {
        query: String,
    },
    LayoutFacet {
        axis: AxisKind,
        index: usize,
        facet: String,
    },
    ToggleCollapsed {
        axis: AxisKind,
        index: usize,
    },
    CollapseCell {
        row: usize,
        col: usize,
        axis: AxisKind,
        collapsed: bool,
    },
    MatrixMode {
        row: usize,
        col: usize,
        on: bool,
    },
    Relayout {
        row: usize,
        col: usize,
    },
    Select {
        #[serde(default)]
        cell: Option<CellCoord>,
    },
    Grow {
        #[serde(default)]
        publications: Vec<Publication>,
        #[serde(default)]
        citations: Vec<Citation>,
    },
    PruneToCell {
        row: usize,
        col: usize,
    },
}

pub fn load(path: &Path) -> Result<Vec<Operation>> {
    let content = fs::read_to_string(path)?;
    let operations: Vec<Operation> = serde_json::from_str(&content)?;
    Ok(operations)
}

fn facet(name: &str) -> Result<FacetId> {
    Ok(name.parse::<FacetId>()?)
}

/// Applies one operation. Returns whether the session accepted it; malformed
/// queries and facet names are errors.
pub fn apply(session: &mut GridSession, operation: Operation) -> Result<bool> {
    let applied = match operation {
        Operation::AddFilter { axis, query, at } => {
            let constraint = parse_constraint(&query, session.graph())?;
            let at = at.unwrap_or_else(|| session.axis(axis).len());
            session.add_filter(axis, constraint, at)
        }
        Operation::RemoveFilter { axis, index } => session.remove_filter(axis, index),
        Operation::MergeInto { axis, index, query } => {
            let constraint = parse_constraint(&query, session.graph())?;
            session.merge_constraint_into(axis, index, constraint)
        }
        Operation::Split { axis, index } => session.split_filter(axis, index),
        Operation::ClearConstraint { axis, index, facet: name } => {
            session.clear_constraint(axis, index, facet(&name)?)
        }
        Operation::MergeFilters { axis, from, into } => session.merge_filters(axis, from, into),
        Operation::AddToSelection { query } => {
            let constraint = parse_constraint(&query, session.graph())?;
            session.add_constraint_to_selection(constraint)
        }
        Operation::LayoutFacet { axis, index, facet: name } => {
            session.select_layout_facet(axis, index, facet(&name)?)
        }
        Operation::ToggleCollapsed { axis, index } => session.toggle_filter_collapsed(axis, index),
        Operation::CollapseCell {
            row,
            col,
            axis,
            collapsed,
        } => session.set_cell_collapsed(CellCoord::new(row, col), axis, collapsed),
        Operation::MatrixMode { row, col, on } => {
            session.set_matrix_mode(CellCoord::new(row, col), on)
        }
        Operation::Relayout { row, col } => session.relayout_cell(CellCoord::new(row, col)),
        Operation::Select { cell } => session.select_cell(cell),
        Operation::Grow {
            publications,
            citations,
        } => !session.graph_grew(publications, citations).is_empty(),
        Operation::PruneToCell { row, col } => session.prune_to_cell(CellCoord::new(row, col)),
    };
    Ok(applied)
}

/// Applies every operation in order, stopping at the first malformed one.
pub fn run(session: &mut GridSession, operations: Vec<Operation>) -> Result<usize> {
    let mut applied = 0;
    for (step, operation) in operations.into_iter().enumerate() {
        let label = format!("{:?}", operation);
        if apply(session, operation).map_err(|err| anyhow!("step {}: {}", step, err))? {
            applied += 1;
        } else {
            tracing::info!("Step {} had no effect: {}", step, label);
        }
    }
    Ok(applied)
}
