use crate::edges::{EdgeKey, EdgeVisual};
use crate::index::VisualIndex;
use pivotslice_core::{PublicationId, VisualId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Visual status derived from a publication selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    /// Every visual holding a selected publication, in any cell.
    pub selected: BTreeSet<VisualId>,
    /// Unselected visuals at the other end of a selected edge.
    pub brushed: BTreeSet<VisualId>,
    /// Edges touching a selected visual.
    pub edges: BTreeSet<EdgeKey>,
}

impl Highlight {
    pub fn compute(
        publications: &[PublicationId],
        index: &VisualIndex,
        edges: &BTreeMap<EdgeKey, EdgeVisual>,
    ) -> Self {
        let selected: BTreeSet<VisualId> = publications
            .iter()
            .flat_map(|publication| index.locations(*publication))
            .map(|location| location.visual)
            .collect();

        let mut highlight = Highlight {
            selected,
            ..Highlight::default()
        };
        if highlight.selected.is_empty() {
            return highlight;
        }
        for (key, edge) in edges {
            let from = highlight.selected.contains(&edge.from);
            let to = highlight.selected.contains(&edge.to);
            if !from && !to {
                continue;
            }
            highlight.edges.insert(*key);
            if !from {
                highlight.brushed.insert(edge.from);
            }
            if !to {
                highlight.brushed.insert(edge.to);
            }
        }
        highlight
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
