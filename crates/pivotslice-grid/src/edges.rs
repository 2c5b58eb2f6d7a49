use crate::index::VisualIndex;
use crate::partition::CellMatrix;
use pivotslice_core::{CellCoord, PublicationGraph, VisualId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type EdgeKey = (VisualId, VisualId);

/// Aggregated citation link between two visuals, possibly in different
/// cells. `count` is the number of underlying citations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeVisual {
    pub from: VisualId,
    pub to: VisualId,
    pub from_cell: CellCoord,
    pub to_cell: CellCoord,
    pub count: usize,
    pub crossing: bool,
}

/// Every citation `a -> b` contributes one unit to each pair of distinct
/// visuals (one holding `a`, one holding `b`). Publications shown in several
/// cells therefore fan out to every copy of their endpoints.
pub fn compute_edges(
    graph: &PublicationGraph,
    matrix: &CellMatrix,
    index: &VisualIndex,
) -> BTreeMap<EdgeKey, EdgeVisual> {
    let mut edges: BTreeMap<EdgeKey, EdgeVisual> = BTreeMap::new();
    for (from_cell, cell) in matrix.iter() {
        for visual in cell.visuals() {
            for publication in &visual.members {
                for cited in graph.edges_out(*publication) {
                    for target in index.locations(cited) {
                        if target.visual == visual.id {
                            continue;
                        }
                        edges
                            .entry((visual.id, target.visual))
                            .or_insert_with(|| EdgeVisual {
                                from: visual.id,
                                to: target.visual,
                                from_cell,
                                to_cell: target.cell,
                                count: 0,
                                crossing: from_cell != target.cell,
                            })
                            .count += 1;
                    }
                }
            }
        }
    }
    tracing::debug!("Computed {} edge visuals", edges.len());
    edges
}
