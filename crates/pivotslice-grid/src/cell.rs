use crate::constraint::Constraint;
use pivotslice_core::{AxisKind, PublicationId, VisualId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Position in the unit square of a cell. `y` grows downwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const CENTER: Point = Point { x: 0.5, y: 0.5 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn in_unit_square(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

/// One drawable unit inside a cell: a single publication or an aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeVisual {
    pub id: VisualId,
    pub members: BTreeSet<PublicationId>,
    pub position: Point,
    /// Where the visual was before the last structural pass, if anywhere.
    pub previous: Option<Point>,
    /// Position inherited verbatim; the layout pass never moves it.
    pub fixed: bool,
    /// Holds at least one publication from the latest graph growth.
    pub is_new: bool,
}

impl NodeVisual {
    pub fn contains(&self, publication: PublicationId) -> bool {
        self.members.contains(&publication)
    }
}

/// Overlay statistics. Crossing and duplicate counts are relative to the
/// currently selected cell and zero when nothing is selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStats {
    pub edge_total: usize,
    pub edge_cross_in: usize,
    pub edge_cross_out: usize,
    pub duplicate_count: usize,
}

/// Layout constraints a scattered cell derived its fixed coordinates from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScatterBasis {
    pub x: Option<Constraint>,
    pub y: Option<Constraint>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cell {
    publications: BTreeSet<PublicationId>,
    visuals: Vec<NodeVisual>,
    collapse_x: bool,
    collapse_y: bool,
    matrix_mode: bool,
    stats: CellStats,
    scatter_basis: Option<ScatterBasis>,
}

impl Cell {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_publications(publications: BTreeSet<PublicationId>) -> Self {
        Self {
            publications,
            ..Self::default()
        }
    }

    pub fn publications(&self) -> &BTreeSet<PublicationId> {
        &self.publications
    }

    pub fn contains(&self, publication: PublicationId) -> bool {
        self.publications.contains(&publication)
    }

    pub fn visuals(&self) -> &[NodeVisual] {
        &self.visuals
    }

    pub fn visual_of(&self, publication: PublicationId) -> Option<&NodeVisual> {
        self.visuals.iter().find(|visual| visual.contains(publication))
    }

    /// Cell-level collapse flag for the dimension driven by `axis`: column
    /// filters drive `x`, row filters drive `y`.
    pub fn collapse_flag(&self, axis: AxisKind) -> bool {
        match axis {
            AxisKind::Column => self.collapse_x,
            AxisKind::Row => self.collapse_y,
        }
    }

    pub fn is_matrix_mode(&self) -> bool {
        self.matrix_mode
    }

    pub fn stats(&self) -> &CellStats {
        &self.stats
    }

    pub fn scatter_basis(&self) -> Option<&ScatterBasis> {
        self.scatter_basis.as_ref()
    }

    pub(crate) fn insert(&mut self, publication: PublicationId) -> bool {
        self.publications.insert(publication)
    }

    pub(crate) fn remove(&mut self, publication: PublicationId) -> bool {
        self.publications.remove(&publication)
    }

    pub(crate) fn set_collapse_flag(&mut self, axis: AxisKind, collapsed: bool) {
        match axis {
            AxisKind::Column => self.collapse_x = collapsed,
            AxisKind::Row => self.collapse_y = collapsed,
        }
    }

    pub(crate) fn set_matrix_mode(&mut self, on: bool) {
        self.matrix_mode = on;
    }

    pub(crate) fn set_stats(&mut self, stats: CellStats) {
        self.stats = stats;
    }

    pub(crate) fn set_visuals(&mut self, visuals: Vec<NodeVisual>, basis: Option<ScatterBasis>) {
        self.visuals = visuals;
        self.scatter_basis = basis;
    }

    pub(crate) fn visuals_mut(&mut self) -> &mut [NodeVisual] {
        &mut self.visuals
    }
}

/// Hands out session-unique visual handles.
#[derive(Debug, Clone, Default)]
pub struct VisualIds {
    next: u64,
}

impl VisualIds {
    pub fn next_id(&mut self) -> VisualId {
        let id = VisualId(self.next);
        self.next += 1;
        id
    }
}
