//! The grid session: one publication graph, its two axes, the cell matrix and
//! every derived visual.
//!
//! All mutation goes through the methods here. Each applied edit runs the
//! whole pipeline before returning: membership reassignment, aggregation and
//! layout of the touched cells, then the session-wide visual index, edge
//! visuals and overlay statistics. Rejected edits return `false` and leave
//! the session untouched.

use crate::aggregate::{self, CellView};
use crate::axis::{AxisEdit, GridAxis};
use crate::cell::{Cell, VisualIds};
use crate::config::{LayoutSettings, SessionConfig};
use crate::constraint::Constraint;
use crate::edges::{EdgeKey, EdgeVisual, compute_edges};
use crate::error::InvariantViolation;
use crate::filter::Filter;
use crate::highlight::Highlight;
use crate::index::VisualIndex;
use crate::overlay::{self, HeatMetric};
use crate::partition::{CellMatrix, assignment};
use crate::snapshot::GridSnapshot;
use pivotslice_core::{
    AxisKind, CellCoord, Citation, FacetId, Publication, PublicationGraph, PublicationId,
};
use pivotslice_events::{Event, EventBus};
use std::collections::{BTreeMap, BTreeSet};

pub struct GridSession {
    graph: PublicationGraph,
    rows: GridAxis,
    cols: GridAxis,
    cells: CellMatrix,
    index: VisualIndex,
    edges: BTreeMap<EdgeKey, EdgeVisual>,
    selected: Option<CellCoord>,
    settings: LayoutSettings,
    ids: VisualIds,
    events: Option<EventBus>,
}

fn with_line(coord: CellCoord, axis: AxisKind, line: usize) -> CellCoord {
    match axis {
        AxisKind::Row => CellCoord::new(line, coord.col),
        AxisKind::Column => CellCoord::new(coord.row, line),
    }
}

impl GridSession {
    /// Starts with a single residual cell holding the whole graph.
    pub fn new(graph: PublicationGraph, config: SessionConfig) -> Self {
        let cells = CellMatrix::with_graph(&graph);
        let mut session = Self {
            graph,
            rows: GridAxis::new(AxisKind::Row),
            cols: GridAxis::new(AxisKind::Column),
            cells,
            index: VisualIndex::default(),
            edges: BTreeMap::new(),
            selected: None,
            settings: config.layout,
            ids: VisualIds::default(),
            events: None,
        };
        session.refresh_all();
        session
    }

    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn attach_event_bus(&mut self, bus: EventBus) {
        self.events = Some(bus);
    }

    pub fn graph(&self) -> &PublicationGraph {
        &self.graph
    }

    pub fn rows(&self) -> &GridAxis {
        &self.rows
    }

    pub fn cols(&self) -> &GridAxis {
        &self.cols
    }

    pub fn axis(&self, kind: AxisKind) -> &GridAxis {
        match kind {
            AxisKind::Row => &self.rows,
            AxisKind::Column => &self.cols,
        }
    }

    fn axis_mut(&mut self, kind: AxisKind) -> &mut GridAxis {
        match kind {
            AxisKind::Row => &mut self.rows,
            AxisKind::Column => &mut self.cols,
        }
    }

    pub fn row_count(&self) -> usize {
        self.cells.row_count()
    }

    pub fn col_count(&self) -> usize {
        self.cells.col_count()
    }

    pub fn cells(&self) -> &CellMatrix {
        &self.cells
    }

    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.cells.cell(coord)
    }

    pub fn visual_index(&self) -> &VisualIndex {
        &self.index
    }

    pub fn edges(&self) -> &BTreeMap<EdgeKey, EdgeVisual> {
        &self.edges
    }

    /// Edge visual joining the visuals that hold `from` and `to`, if both are
    /// shown exactly once.
    pub fn edge_between(&self, from: PublicationId, to: PublicationId) -> Option<&EdgeVisual> {
        let [from] = self.index.locations(from) else {
            return None;
        };
        let [to] = self.index.locations(to) else {
            return None;
        };
        self.edges.get(&(from.visual, to.visual))
    }

    pub fn selected_cell(&self) -> Option<CellCoord> {
        self.selected
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    // ========================================================================
    // Filter edits
    // ========================================================================

    pub fn add_filter(&mut self, axis: AxisKind, constraint: Constraint, at: usize) -> bool {
        let edit = self.axis_mut(axis).add_filter(constraint, at);
        self.commit(axis, edit, BTreeSet::new())
    }

    pub fn insert_filter(&mut self, axis: AxisKind, filter: Filter, at: usize) -> bool {
        let edit = self.axis_mut(axis).insert_filter(filter, at);
        self.commit(axis, edit, BTreeSet::new())
    }

    pub fn remove_filter(&mut self, axis: AxisKind, index: usize) -> bool {
        let before = self.members_of(axis, index);
        let edit = self.axis_mut(axis).remove_filter(index);
        self.commit(axis, edit, before)
    }

    pub fn merge_constraint_into(
        &mut self,
        axis: AxisKind,
        index: usize,
        constraint: Constraint,
    ) -> bool {
        let before = self.members_of(axis, index);
        let edit = self.axis_mut(axis).merge_constraint_into(index, constraint);
        self.commit(axis, edit, before)
    }

    pub fn split_filter(&mut self, axis: AxisKind, index: usize) -> bool {
        let before = self.members_of(axis, index);
        let edit = self.axis_mut(axis).split_filter(index);
        self.commit(axis, edit, before)
    }

    pub fn clear_constraint(&mut self, axis: AxisKind, index: usize, facet: FacetId) -> bool {
        let before = self.members_of(axis, index);
        let edit = self.axis_mut(axis).clear_constraint(index, facet);
        self.commit(axis, edit, before)
    }

    pub fn merge_filters(&mut self, axis: AxisKind, from: usize, into: usize) -> bool {
        let mut before = self.members_of(axis, from);
        before.extend(self.members_of(axis, into));
        let edit = self.axis_mut(axis).merge_filters(from, into);
        self.commit(axis, edit, before)
    }

    /// Routes a constraint to the axis with fewer lines (columns on ties):
    /// a new line without a selection, otherwise a merge into the selected
    /// cell's line on that axis.
    pub fn add_constraint_to_selection(&mut self, constraint: Constraint) -> bool {
        let axis = if self.cols.len() <= self.rows.len() {
            AxisKind::Column
        } else {
            AxisKind::Row
        };
        match self.selected {
            None => {
                let at = self.axis(axis).len();
                self.add_filter(axis, constraint, at)
            }
            Some(cell) => self.merge_constraint_into(axis, cell.line(axis), constraint),
        }
    }

    pub fn select_layout_facet(&mut self, axis: AxisKind, index: usize, facet: FacetId) -> bool {
        let edit = self.axis_mut(axis).select_layout_facet(index, facet);
        self.commit(axis, edit, BTreeSet::new())
    }

    pub fn toggle_filter_collapsed(&mut self, axis: AxisKind, index: usize) -> bool {
        let edit = self.axis_mut(axis).toggle_collapsed(index);
        self.commit(axis, edit, BTreeSet::new())
    }

    fn members_of(&self, axis: AxisKind, index: usize) -> BTreeSet<PublicationId> {
        if index == GridAxis::RESIDUAL {
            return BTreeSet::new();
        }
        self.cells.line_members(axis, index)
    }

    /// Mirrors an applied axis edit in the cell matrix and re-derives
    /// membership of `before` (the touched lines' former members) plus every
    /// publication the touched lines accept now.
    fn commit(
        &mut self,
        axis: AxisKind,
        edit: Option<AxisEdit>,
        before: BTreeSet<PublicationId>,
    ) -> bool {
        let Some(edit) = edit else {
            return false;
        };
        let (touched, event) = match edit {
            AxisEdit::Added(index) => {
                self.cells.insert_line(axis, index);
                self.selection_after_insert(axis, index, 1);
                (index..index + 1, Event::FilterAdded { axis, index })
            }
            AxisEdit::Removed(index) => {
                self.cells.remove_line(axis, index);
                self.selection_after_remove(axis, index);
                (0..0, Event::FilterRemoved { axis, index })
            }
            AxisEdit::Updated(index) => (index..index + 1, Event::FilterUpdated { axis, index }),
            AxisEdit::Split { index, pieces } => {
                self.cells.remove_line(axis, index);
                self.selection_after_remove(axis, index);
                for _ in 0..pieces {
                    self.cells.insert_line(axis, index);
                }
                self.selection_after_insert(axis, index, pieces);
                (
                    index..index + pieces,
                    Event::FilterSplit {
                        axis,
                        index,
                        pieces,
                    },
                )
            }
            AxisEdit::Merged { removed, into } => {
                self.cells.remove_line(axis, removed);
                self.selection_after_remove(axis, removed);
                (into..into + 1, Event::FiltersMerged { axis, removed, into })
            }
            AxisEdit::Relayout(index) => {
                let dirty = self.cells.line_coords(axis, index).into_iter().collect();
                self.refresh(&dirty);
                self.publish(Event::LineRelayout { axis, index });
                return true;
            }
        };

        let mut candidates = before;
        let lines = match axis {
            AxisKind::Row => &self.rows,
            AxisKind::Column => &self.cols,
        };
        for line in touched.clone() {
            if let Some(filter) = lines.filter(line) {
                candidates.extend(
                    self.graph
                        .publication_ids()
                        .filter(|publication| filter.satisfies(&self.graph, *publication)),
                );
            }
        }
        let mut dirty = self
            .cells
            .reassign(&self.graph, &self.rows, &self.cols, &candidates);
        for line in touched {
            dirty.extend(self.cells.line_coords(axis, line));
        }
        tracing::debug!(
            "{:?} on the {} axis: {} candidates, {} cells to rebuild",
            edit,
            axis,
            candidates.len(),
            dirty.len()
        );
        self.refresh(&dirty);
        self.publish(event);
        true
    }

    /// Keeps the selection on the same line after `count` lines were
    /// inserted at `index`.
    fn selection_after_insert(&mut self, axis: AxisKind, index: usize, count: usize) {
        if let Some(cell) = self.selected {
            let line = cell.line(axis);
            if line >= index {
                self.selected = Some(with_line(cell, axis, line + count));
            }
        }
    }

    fn selection_after_remove(&mut self, axis: AxisKind, index: usize) {
        if let Some(cell) = self.selected {
            let line = cell.line(axis);
            if line == index {
                tracing::debug!("Selected cell {} removed with its line", cell);
                self.selected = None;
            } else if line > index {
                self.selected = Some(with_line(cell, axis, line - 1));
            }
        }
    }

    // ========================================================================
    // Cell modes
    // ========================================================================

    /// Per-cell collapse of the dimension driven by `axis`. A no-op when the
    /// line itself is collapsed or the flag already has that value.
    pub fn set_cell_collapsed(
        &mut self,
        coord: CellCoord,
        axis: AxisKind,
        collapsed: bool,
    ) -> bool {
        let line_collapsed = self
            .axis(axis)
            .filter(coord.line(axis))
            .is_some_and(Filter::is_collapsed);
        let Some(cell) = self.cells.cell_mut(coord) else {
            return false;
        };
        if line_collapsed || cell.collapse_flag(axis) == collapsed {
            tracing::debug!("Collapse of {} on the {} axis unchanged", coord, axis);
            return false;
        }
        cell.set_collapse_flag(axis, collapsed);
        self.refresh(&BTreeSet::from([coord]));
        self.publish(Event::CellModeChanged { cell: coord });
        true
    }

    pub fn set_matrix_mode(&mut self, coord: CellCoord, on: bool) -> bool {
        let Some(cell) = self.cells.cell_mut(coord) else {
            return false;
        };
        if cell.is_matrix_mode() == on {
            return false;
        }
        cell.set_matrix_mode(on);
        self.refresh(&BTreeSet::from([coord]));
        self.publish(Event::CellModeChanged { cell: coord });
        true
    }

    /// Runs the layout of one cell again. Frozen visuals stay where they are.
    pub fn relayout_cell(&mut self, coord: CellCoord) -> bool {
        let (Some(row_filter), Some(col_filter)) =
            (self.rows.filter(coord.row), self.cols.filter(coord.col))
        else {
            return false;
        };
        let Some(cell) = self.cells.cell_mut(coord) else {
            return false;
        };
        let view = CellView::new(cell, row_filter, col_filter);
        aggregate::relayout_cell(cell, &view, &self.graph, &self.settings);
        self.reindex();
        self.publish(Event::CellRelayout { cell: coord });
        true
    }

    pub fn select_cell(&mut self, coord: Option<CellCoord>) -> bool {
        if coord.is_some_and(|coord| self.cells.cell(coord).is_none()) || coord == self.selected {
            return false;
        }
        self.selected = coord;
        overlay::apply_stats(&mut self.cells, &self.edges, self.selected);
        self.publish(Event::CellSelected { cell: coord });
        true
    }

    // ========================================================================
    // Graph changes
    // ========================================================================

    /// Adds fetched publications and links, then redistributes everything:
    /// new links change the degree facets of existing publications too.
    pub fn graph_grew(
        &mut self,
        publications: Vec<Publication>,
        citations: Vec<Citation>,
    ) -> Vec<PublicationId> {
        let added = self.graph.add_publications(publications, citations);
        let everyone: BTreeSet<PublicationId> = self.graph.publication_ids().collect();
        self.cells
            .reassign(&self.graph, &self.rows, &self.cols, &everyone);
        tracing::debug!("Graph grew by {} publications", added.len());
        self.refresh_all();
        self.publish(Event::GraphGrew {
            added: added.clone(),
        });
        added
    }

    /// Restricts the graph to `keep` and starts over from a single cell.
    pub fn prune_to_publications(&mut self, keep: &BTreeSet<PublicationId>) {
        self.graph.prune_to(keep);
        self.rows.reset();
        self.cols.reset();
        self.cells = CellMatrix::with_graph(&self.graph);
        self.selected = None;
        self.refresh_all();
        self.publish(Event::GraphPruned {
            remaining: self.graph.len(),
        });
    }

    pub fn prune_to_cell(&mut self, coord: CellCoord) -> bool {
        let Some(keep) = self.cells.cell(coord).map(|cell| cell.publications().clone()) else {
            return false;
        };
        self.prune_to_publications(&keep);
        true
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn highlight(&self, publications: &[PublicationId]) -> Highlight {
        Highlight::compute(publications, &self.index, &self.edges)
    }

    pub fn heat_map(&self, metric: HeatMetric) -> Vec<Vec<f64>> {
        overlay::heat_map(&self.cells, metric)
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot::capture(
            &self.rows,
            &self.cols,
            &self.cells,
            self.edges.values().cloned(),
            self.selected,
        )
    }

    /// Checks grid shape, facet slots, membership against the assignment
    /// rule and the visual partition of every cell.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        if self.cells.row_count() != self.rows.len() || self.cells.col_count() != self.cols.len() {
            return Err(InvariantViolation::ShapeMismatch {
                rows: self.cells.row_count(),
                cols: self.cells.col_count(),
                row_filters: self.rows.len(),
                col_filters: self.cols.len(),
            });
        }
        for axis in [&self.rows, &self.cols] {
            if let Some(index) = axis.first_slot_mismatch() {
                return Err(InvariantViolation::FacetSlots {
                    axis: axis.kind(),
                    index,
                });
            }
        }

        for (coord, cell) in self.cells.iter() {
            if let Some(&publication) = cell
                .publications()
                .iter()
                .find(|publication| !self.graph.contains(**publication))
            {
                return Err(InvariantViolation::UnknownPublication {
                    cell: coord,
                    publication,
                });
            }
            let mut seen = BTreeSet::new();
            for visual in cell.visuals() {
                if visual.members.is_empty() {
                    return Err(InvariantViolation::EmptyVisual {
                        cell: coord,
                        visual: visual.id,
                    });
                }
                if !visual.position.in_unit_square() {
                    return Err(InvariantViolation::OutOfBounds {
                        cell: coord,
                        visual: visual.id,
                    });
                }
                for member in &visual.members {
                    if !seen.insert(*member) {
                        return Err(InvariantViolation::VisualPartition { cell: coord });
                    }
                }
            }
            if &seen != cell.publications() {
                return Err(InvariantViolation::VisualPartition { cell: coord });
            }
        }

        for publication in self.graph.publication_ids() {
            let expected = assignment(&self.graph, &self.rows, &self.cols, publication);
            let actual = self.cells.cells_holding(publication);
            if expected != actual {
                return Err(InvariantViolation::Misplaced {
                    publication,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    // ========================================================================
    // Pipeline
    // ========================================================================

    fn refresh_all(&mut self) {
        let dirty = self.cells.coords().collect();
        self.refresh(&dirty);
    }

    /// Rebuilds the visuals of `dirty` cells, then every session-wide
    /// derivation.
    fn refresh(&mut self, dirty: &BTreeSet<CellCoord>) {
        for &coord in dirty {
            let (Some(row_filter), Some(col_filter)) =
                (self.rows.filter(coord.row), self.cols.filter(coord.col))
            else {
                continue;
            };
            let Some(cell) = self.cells.cell_mut(coord) else {
                continue;
            };
            let view = CellView::new(cell, row_filter, col_filter);
            aggregate::rebuild_cell(
                cell,
                &view,
                &self.graph,
                &self.index,
                &self.settings,
                &mut self.ids,
            );
        }
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = VisualIndex::build(&self.cells);
        self.edges = compute_edges(&self.graph, &self.cells, &self.index);
        overlay::apply_stats(&mut self.cells, &self.edges, self.selected);
    }

    fn publish(&self, event: Event) {
        if let Some(bus) = &self.events {
            bus.publish(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::NodeVisual;
    use pivotslice_core::GraphData;

    fn graph() -> PublicationGraph {
        PublicationGraph::from_data(GraphData {
            publications: (0..8)
                .map(|i| {
                    Publication::new(i, format!("p{i}"))
                        .with_year(2000 + i % 4)
                        .with_author(i % 3, format!("author{}", i % 3))
                })
                .collect(),
            citations: vec![Citation::new(1, 0), Citation::new(2, 1), Citation::new(5, 4)],
        })
        .unwrap()
    }

    fn year(from: i64, to: i64) -> Constraint {
        Constraint::numerical(FacetId::Year, from, to).unwrap()
    }

    #[test]
    fn test_new_session_is_one_residual_cell() {
        let session = GridSession::new(graph(), SessionConfig::default());
        assert_eq!((session.row_count(), session.col_count()), (1, 1));
        assert_eq!(session.cell(CellCoord::RESIDUAL).unwrap().publications().len(), 8);
        session.validate().unwrap();
    }

    #[test]
    fn test_rejected_edits_publish_nothing() {
        let bus = EventBus::new();
        let mut session =
            GridSession::new(graph(), SessionConfig::default()).with_event_bus(bus.clone());
        assert!(!session.remove_filter(AxisKind::Row, 0));
        assert!(!session.split_filter(AxisKind::Column, 3));
        assert!(!session.add_filter(AxisKind::Row, Constraint::empty(FacetId::Year), 1));
        assert!(bus.receiver().try_recv().is_err());
    }

    #[test]
    fn test_edits_publish_events() {
        let bus = EventBus::new();
        let mut session = GridSession::new(graph(), SessionConfig::default());
        session.attach_event_bus(bus.clone());
        assert!(session.add_filter(AxisKind::Column, year(2000, 2001), 1));
        assert!(session.split_filter(AxisKind::Column, 1));

        let events: Vec<Event> = bus.receiver().try_iter().collect();
        assert_eq!(
            events,
            vec![
                Event::FilterAdded {
                    axis: AxisKind::Column,
                    index: 1
                },
                Event::FilterSplit {
                    axis: AxisKind::Column,
                    index: 1,
                    pieces: 2
                },
            ]
        );
    }

    #[test]
    fn test_selection_follows_line_edits() {
        let mut session = GridSession::new(graph(), SessionConfig::default());
        session.add_filter(AxisKind::Row, year(2000, 2000), 1);
        assert!(session.select_cell(Some(CellCoord::new(1, 0))));

        session.add_filter(AxisKind::Row, year(2003, 2003), 1);
        assert_eq!(session.selected_cell(), Some(CellCoord::new(2, 0)));

        session.remove_filter(AxisKind::Row, 1);
        assert_eq!(session.selected_cell(), Some(CellCoord::new(1, 0)));

        session.remove_filter(AxisKind::Row, 1);
        assert_eq!(session.selected_cell(), None);
        session.validate().unwrap();
    }

    #[test]
    fn test_select_cell_rejects_unknown_coords() {
        let mut session = GridSession::new(graph(), SessionConfig::default());
        assert!(!session.select_cell(Some(CellCoord::new(0, 4))));
        assert!(!session.select_cell(None));
    }

    #[test]
    fn test_smart_target_prefers_columns_then_merges() {
        let mut session = GridSession::new(graph(), SessionConfig::default());
        assert!(session.add_constraint_to_selection(year(2000, 2000)));
        assert_eq!(session.cols().len(), 2);

        // rows now have fewer lines
        assert!(session.add_constraint_to_selection(year(2001, 2001)));
        assert_eq!(session.rows().len(), 2);

        session.select_cell(Some(CellCoord::new(1, 1)));
        assert!(session.add_constraint_to_selection(year(2002, 2002)));
        assert_eq!(session.cols().len(), 2);
        assert_eq!(
            session.cols().filter(1).unwrap().constraint(FacetId::Year),
            Some(&year(2000, 2002))
        );
        session.validate().unwrap();
    }

    #[test]
    fn test_cell_collapse_respects_line_collapse() {
        let mut session = GridSession::new(graph(), SessionConfig::default());
        session.add_filter(AxisKind::Column, year(2000, 2001), 1);
        let coord = CellCoord::new(0, 1);

        assert!(session.set_cell_collapsed(coord, AxisKind::Column, true));
        assert!(!session.set_cell_collapsed(coord, AxisKind::Column, true));
        assert!(session.set_cell_collapsed(coord, AxisKind::Row, true));
        assert_eq!(session.cell(coord).unwrap().visuals().len(), 1);

        assert!(session.toggle_filter_collapsed(AxisKind::Row, 0));
        assert!(!session.set_cell_collapsed(coord, AxisKind::Row, false));
        session.validate().unwrap();
    }

    #[test]
    fn test_graph_growth_marks_new_visuals() {
        let mut session = GridSession::new(graph(), SessionConfig::default());
        session.add_filter(AxisKind::Row, year(2004, 2005), 1);
        let added = session.graph_grew(
            vec![Publication::new(20, "fresh").with_year(2004), Publication::new(3, "dup")],
            vec![Citation::new(20, 0)],
        );
        assert_eq!(added, vec![PublicationId(20)]);

        let cell = session.cell(CellCoord::new(1, 0)).unwrap();
        assert!(cell.contains(PublicationId(20)));
        assert!(cell.visuals().iter().all(|visual| visual.is_new));
        let residual = session.cell(CellCoord::RESIDUAL).unwrap();
        assert!(residual.visuals().iter().all(|visual| !visual.is_new));
        session.validate().unwrap();
    }

    #[test]
    fn test_relayout_preserves_frozen_positions() {
        let mut session = GridSession::new(graph(), SessionConfig::default());
        session.graph_grew(vec![Publication::new(20, "fresh")], vec![Citation::new(20, 1)]);
        let frozen: Vec<NodeVisual> = session
            .cell(CellCoord::RESIDUAL)
            .unwrap()
            .visuals()
            .iter()
            .filter(|visual| visual.fixed)
            .cloned()
            .collect();
        assert_eq!(frozen.len(), 8);

        assert!(session.relayout_cell(CellCoord::RESIDUAL));
        let cell = session.cell(CellCoord::RESIDUAL).unwrap();
        for before in &frozen {
            let after = cell.visuals().iter().find(|visual| visual.id == before.id).unwrap();
            assert!(after.fixed);
            assert_eq!(after.position.x.to_bits(), before.position.x.to_bits());
            assert_eq!(after.position.y.to_bits(), before.position.y.to_bits());
        }
        session.validate().unwrap();
    }

    #[test]
    fn test_wide_ranges_never_overflow() {
        let mut session = GridSession::new(graph(), SessionConfig::default());
        assert!(session.add_filter(AxisKind::Column, year(0, i64::MAX), 1));
        assert!(session.select_layout_facet(AxisKind::Column, 1, FacetId::Year));
        assert!(!session.split_filter(AxisKind::Column, 1));

        assert!(session.add_filter(AxisKind::Row, year(i64::MIN, i64::MAX), 1));
        assert!(session.select_layout_facet(AxisKind::Row, 1, FacetId::Year));
        assert!(session.set_cell_collapsed(CellCoord::new(1, 1), AxisKind::Column, true));
        assert!(!session.split_filter(AxisKind::Row, 1));

        assert_eq!(session.cols().len(), 2);
        assert_eq!(session.cell(CellCoord::new(1, 1)).unwrap().publications().len(), 8);
        session.validate().unwrap();
    }

    #[test]
    fn test_prune_to_cell_resets_grid() {
        let mut session = GridSession::new(graph(), SessionConfig::default());
        session.add_filter(AxisKind::Column, year(2001, 2002), 1);
        session.select_cell(Some(CellCoord::new(0, 1)));
        assert!(session.prune_to_cell(CellCoord::new(0, 1)));

        assert_eq!((session.row_count(), session.col_count()), (1, 1));
        assert_eq!(session.graph().len(), 4);
        assert_eq!(session.selected_cell(), None);
        assert!(session.cols().active_facets().is_empty());
        session.validate().unwrap();
    }
}
