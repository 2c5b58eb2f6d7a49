use crate::cell::Point;
use crate::partition::CellMatrix;
use pivotslice_core::{CellCoord, PublicationId, VisualId};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualLocation {
    pub cell: CellCoord,
    pub visual: VisualId,
    pub position: Point,
}

/// Session-wide lookup from publications to the visuals holding them,
/// rebuilt after every structural pass. Between passes it still describes
/// the previous layout, which is what continuity lookups need.
#[derive(Debug, Clone, Default)]
pub struct VisualIndex {
    by_publication: BTreeMap<PublicationId, Vec<VisualLocation>>,
}

impl VisualIndex {
    pub fn build(matrix: &CellMatrix) -> Self {
        let mut index = Self::default();
        for (coord, cell) in matrix.iter() {
            for visual in cell.visuals() {
                for publication in &visual.members {
                    index
                        .by_publication
                        .entry(*publication)
                        .or_default()
                        .push(VisualLocation {
                            cell: coord,
                            visual: visual.id,
                            position: visual.position,
                        });
                }
            }
        }
        index
    }

    /// Every visual holding `publication`, in row-major cell order.
    pub fn locations(&self, publication: PublicationId) -> &[VisualLocation] {
        self.by_publication
            .get(&publication)
            .map_or(&[], Vec::as_slice)
    }
}
