//! Per-cell statistics for heat-map overlays.

use crate::cell::CellStats;
use crate::edges::{EdgeKey, EdgeVisual};
use crate::partition::CellMatrix;
use pivotslice_core::CellCoord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatMetric {
    /// Crossing edges touching the selected cell, per edge of the cell.
    TotalCrossing,
    CrossIn,
    CrossOut,
    /// Publications shared with the selected cell, per publication.
    Duplicates,
}

/// Recomputes every cell's [`CellStats`]. Crossing and duplicate counts stay
/// zero without a selection.
pub fn apply_stats(
    matrix: &mut CellMatrix,
    edges: &BTreeMap<EdgeKey, EdgeVisual>,
    selected: Option<CellCoord>,
) {
    let mut stats: BTreeMap<CellCoord, CellStats> =
        matrix.coords().map(|coord| (coord, CellStats::default())).collect();

    for edge in edges.values() {
        if let Some(from) = stats.get_mut(&edge.from_cell) {
            from.edge_total += edge.count;
        }
        if edge.to_cell != edge.from_cell
            && let Some(to) = stats.get_mut(&edge.to_cell)
        {
            to.edge_total += edge.count;
        }
    }

    if let Some(selected) = selected {
        for edge in edges.values() {
            if edge.from_cell == edge.to_cell {
                if edge.from_cell == selected
                    && let Some(own) = stats.get_mut(&selected)
                {
                    own.edge_cross_in += edge.count;
                    own.edge_cross_out += edge.count;
                }
            } else if edge.from_cell == selected {
                if let Some(to) = stats.get_mut(&edge.to_cell) {
                    to.edge_cross_in += edge.count;
                }
            } else if edge.to_cell == selected
                && let Some(from) = stats.get_mut(&edge.from_cell)
            {
                from.edge_cross_out += edge.count;
            }
        }

        if let Some(held) = matrix.cell(selected).map(|cell| cell.publications().clone()) {
            for (coord, cell) in matrix.iter() {
                if coord == selected {
                    continue;
                }
                if let Some(entry) = stats.get_mut(&coord) {
                    entry.duplicate_count = cell.publications().intersection(&held).count();
                }
            }
        }
    }

    for (coord, cell) in matrix.iter_mut() {
        if let Some(entry) = stats.remove(&coord) {
            cell.set_stats(entry);
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// `heat[row][col]` in `[0, 1]`: the metric's per-cell ratio divided by the
/// largest ratio on the grid.
pub fn heat_map(matrix: &CellMatrix, metric: HeatMetric) -> Vec<Vec<f64>> {
    let raw: Vec<Vec<f64>> = (0..matrix.row_count())
        .map(|row| {
            (0..matrix.col_count())
                .map(|col| {
                    let Some(cell) = matrix.cell(CellCoord::new(row, col)) else {
                        return 0.0;
                    };
                    let stats = cell.stats();
                    match metric {
                        HeatMetric::TotalCrossing => ratio(
                            stats.edge_cross_in + stats.edge_cross_out,
                            stats.edge_total,
                        ),
                        HeatMetric::CrossIn => ratio(stats.edge_cross_in, stats.edge_total),
                        HeatMetric::CrossOut => ratio(stats.edge_cross_out, stats.edge_total),
                        HeatMetric::Duplicates => {
                            ratio(stats.duplicate_count, cell.publications().len())
                        }
                    }
                })
                .collect()
        })
        .collect();

    let max = raw.iter().flatten().copied().fold(0.0_f64, f64::max);
    if max == 0.0 {
        return raw.into_iter().map(|row| vec![0.0; row.len()]).collect();
    }
    raw.into_iter()
        .map(|row| row.into_iter().map(|value| value / max).collect())
        .collect()
}
