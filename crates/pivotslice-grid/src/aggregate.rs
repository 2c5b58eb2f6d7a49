//! Turns a cell's publication set into node visuals.

use crate::cell::{Cell, NodeVisual, Point, ScatterBasis, VisualIds};
use crate::config::LayoutSettings;
use crate::constraint::Constraint;
use crate::filter::Filter;
use crate::index::VisualIndex;
use crate::layout::{self, CellLinks, FreeAxes};
use pivotslice_core::{AxisKind, PublicationGraph, PublicationId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregationMode {
    /// One visual per publication.
    Scatter,
    /// One visual for the whole cell.
    Full,
    /// One visual per value of the layout facet of the filter on `AxisKind`;
    /// groups spread along the dimension that filter drives.
    Grouped(AxisKind),
}

/// How one cell is to be aggregated: its effective collapse state and the
/// layout constraints of its two filters.
#[derive(Debug, Clone, Copy)]
pub struct CellView<'a> {
    pub collapse_x: bool,
    pub collapse_y: bool,
    /// Layout constraint of the column filter, driving `x`.
    pub x: Option<&'a Constraint>,
    /// Layout constraint of the row filter, driving `y`.
    pub y: Option<&'a Constraint>,
    pub matrix_mode: bool,
}

impl<'a> CellView<'a> {
    pub fn new(cell: &Cell, row_filter: &'a Filter, col_filter: &'a Filter) -> Self {
        Self {
            collapse_x: col_filter.is_collapsed() || cell.collapse_flag(AxisKind::Column),
            collapse_y: row_filter.is_collapsed() || cell.collapse_flag(AxisKind::Row),
            x: col_filter.layout_constraint(),
            y: row_filter.layout_constraint(),
            matrix_mode: cell.is_matrix_mode(),
        }
    }

    pub fn mode(&self) -> AggregationMode {
        match (self.collapse_x, self.collapse_y) {
            (false, false) => AggregationMode::Scatter,
            (true, false) if self.y.is_some() => AggregationMode::Grouped(AxisKind::Row),
            (false, true) if self.x.is_some() => AggregationMode::Grouped(AxisKind::Column),
            _ => AggregationMode::Full,
        }
    }

    /// Axes left to the spring embedder: in scatter mode, those without a
    /// layout facet. Aggregated modes have fully determined positions.
    pub fn free_axes(&self) -> FreeAxes {
        match self.mode() {
            AggregationMode::Scatter => FreeAxes {
                x: self.x.is_none(),
                y: self.y.is_none(),
            },
            AggregationMode::Full | AggregationMode::Grouped(_) => FreeAxes::NONE,
        }
    }
}

/// A visual before identity and continuity are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub members: BTreeSet<PublicationId>,
    pub position: Point,
}

fn x_of(constraint: &Constraint, graph: &PublicationGraph, publication: PublicationId) -> f64 {
    constraint
        .slot_of(graph, publication)
        .map_or(0.5, |slot| constraint.slot_fraction(slot))
}

fn y_of(constraint: &Constraint, graph: &PublicationGraph, publication: PublicationId) -> f64 {
    1.0 - x_of(constraint, graph, publication)
}

/// Partitions `publications` according to the view's mode. Drafts never
/// come back empty, and every publication lands in exactly one draft.
pub fn aggregate(
    graph: &PublicationGraph,
    publications: &BTreeSet<PublicationId>,
    view: &CellView<'_>,
) -> Vec<Draft> {
    if publications.is_empty() {
        return Vec::new();
    }
    match view.mode() {
        AggregationMode::Scatter => publications
            .iter()
            .map(|&publication| Draft {
                members: BTreeSet::from([publication]),
                position: Point::new(
                    view.x.map_or(0.5, |c| x_of(c, graph, publication)),
                    view.y.map_or(0.5, |c| y_of(c, graph, publication)),
                ),
            })
            .collect(),
        AggregationMode::Full => vec![Draft {
            members: publications.clone(),
            position: Point::CENTER,
        }],
        AggregationMode::Grouped(axis) => {
            let constraint = match axis {
                AxisKind::Row => view.y,
                AxisKind::Column => view.x,
            };
            match constraint {
                Some(constraint) => grouped(graph, publications, constraint, axis),
                None => vec![Draft {
                    members: publications.clone(),
                    position: Point::CENTER,
                }],
            }
        }
    }
}

fn grouped(
    graph: &PublicationGraph,
    publications: &BTreeSet<PublicationId>,
    constraint: &Constraint,
    axis: AxisKind,
) -> Vec<Draft> {
    let mut slots: BTreeMap<usize, BTreeSet<PublicationId>> = BTreeMap::new();
    let mut remainder = BTreeSet::new();
    for &publication in publications {
        match constraint.slot_of(graph, publication) {
            Some(slot) => {
                slots.entry(slot).or_default().insert(publication);
            }
            None => {
                remainder.insert(publication);
            }
        }
    }

    let place = |offset: f64| match axis {
        AxisKind::Row => Point::new(0.5, 1.0 - offset),
        AxisKind::Column => Point::new(offset, 0.5),
    };
    let mut drafts: Vec<Draft> = slots
        .into_iter()
        .map(|(slot, members)| Draft {
            members,
            position: place(constraint.slot_fraction(slot)),
        })
        .collect();
    if !remainder.is_empty() {
        tracing::debug!(
            "{} publications outside every {} group",
            remainder.len(),
            constraint.facet()
        );
        drafts.push(Draft {
            members: remainder,
            position: Point::CENTER,
        });
    }
    drafts
}

/// Rebuilds a cell's visuals from its current publications and lays them
/// out. Each new visual inherits the previous position of a visual that held
/// one of its members, looking in the cell itself first and then in `index`.
/// In scatter mode a publication the cell already showed keeps its exact
/// position (and is frozen) when the layout constraints are unchanged.
pub fn rebuild_cell(
    cell: &mut Cell,
    view: &CellView<'_>,
    graph: &PublicationGraph,
    index: &VisualIndex,
    settings: &LayoutSettings,
    ids: &mut VisualIds,
) {
    let mode = view.mode();
    let basis = (mode == AggregationMode::Scatter && !view.matrix_mode).then(|| ScatterBasis {
        x: view.x.cloned(),
        y: view.y.cloned(),
    });
    let keep_positions = basis.is_some() && cell.scatter_basis() == basis.as_ref();

    let prior: BTreeMap<PublicationId, Point> = cell
        .visuals()
        .iter()
        .flat_map(|visual| visual.members.iter().map(move |m| (*m, visual.position)))
        .collect();

    let mut visuals: Vec<NodeVisual> = aggregate(graph, cell.publications(), view)
        .into_iter()
        .map(|draft| {
            let previous = draft.members.iter().find_map(|member| {
                prior.get(member).copied().or_else(|| {
                    index
                        .locations(*member)
                        .first()
                        .map(|location| location.position)
                })
            });
            let inherited = match draft.members.first() {
                Some(member) if keep_positions && draft.members.len() == 1 => {
                    prior.get(member).copied()
                }
                _ => None,
            };
            let is_new = draft
                .members
                .iter()
                .any(|member| graph.is_newly_added(*member));
            NodeVisual {
                id: ids.next_id(),
                position: inherited.unwrap_or(draft.position),
                fixed: inherited.is_some(),
                members: draft.members,
                previous,
                is_new,
            }
        })
        .collect();

    let links = CellLinks::build(graph, &visuals);
    layout::arrange(
        &mut visuals,
        &links,
        view.free_axes(),
        view.matrix_mode,
        settings,
    );
    cell.set_visuals(visuals, basis);
}

/// Re-runs the layout of a cell without re-aggregating. Frozen visuals keep
/// their exact positions; the others are re-seeded on the free axes.
pub fn relayout_cell(
    cell: &mut Cell,
    view: &CellView<'_>,
    graph: &PublicationGraph,
    settings: &LayoutSettings,
) {
    for visual in cell.visuals_mut() {
        visual.previous = Some(visual.position);
    }
    let links = CellLinks::build(graph, cell.visuals());
    layout::arrange(
        cell.visuals_mut(),
        &links,
        view.free_axes(),
        view.matrix_mode,
        settings,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pivotslice_core::{FacetId, GraphData, Publication, ValueId};

    fn graph() -> PublicationGraph {
        PublicationGraph::from_data(GraphData {
            publications: vec![
                Publication::new(1, "a").with_year(2000).with_author(1, "A"),
                Publication::new(2, "b").with_year(2001).with_author(2, "B"),
                Publication::new(3, "c").with_year(2001).with_author(1, "A").with_author(2, "B"),
            ],
            citations: Vec::new(),
        })
        .unwrap()
    }

    fn all(graph: &PublicationGraph) -> BTreeSet<PublicationId> {
        graph.publication_ids().collect()
    }

    fn view<'a>(
        x: Option<&'a Constraint>,
        y: Option<&'a Constraint>,
        cx: bool,
        cy: bool,
    ) -> CellView<'a> {
        CellView {
            collapse_x: cx,
            collapse_y: cy,
            x,
            y,
            matrix_mode: false,
        }
    }

    #[test]
    fn test_mode_table() {
        let year = Constraint::numerical(FacetId::Year, 2000, 2001).unwrap();
        assert_eq!(view(None, None, false, false).mode(), AggregationMode::Scatter);
        assert_eq!(view(None, None, true, true).mode(), AggregationMode::Full);
        assert_eq!(view(None, None, true, false).mode(), AggregationMode::Full);
        assert_eq!(
            view(None, Some(&year), true, false).mode(),
            AggregationMode::Grouped(AxisKind::Row)
        );
        assert_eq!(
            view(Some(&year), None, false, true).mode(),
            AggregationMode::Grouped(AxisKind::Column)
        );
        // the collapsed axis' own facet does not group
        assert_eq!(view(Some(&year), None, true, false).mode(), AggregationMode::Full);
    }

    #[test]
    fn test_scatter_positions_from_facets() {
        let graph = graph();
        let year = Constraint::numerical(FacetId::Year, 2000, 2001).unwrap();
        let drafts = aggregate(&graph, &all(&graph), &view(Some(&year), Some(&year), false, false));
        assert_eq!(drafts.len(), 3);
        // (2000 - 2000 + 1) / (2001 - 2000 + 2)
        assert!((drafts[0].position.x - 1.0 / 3.0).abs() < 1e-12);
        assert!((drafts[0].position.y - 2.0 / 3.0).abs() < 1e-12);
        assert!((drafts[1].position.x - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_grouped_categorical_uses_first_listed_value() {
        let graph = graph();
        let authors = Constraint::categorical(FacetId::Author, [ValueId(2), ValueId(1)]).unwrap();
        let drafts = aggregate(&graph, &all(&graph), &view(Some(&authors), None, false, true));
        assert_eq!(drafts.len(), 2);
        // slot 0 is author 2, shared by publications 2 and 3
        assert_eq!(drafts[0].members, BTreeSet::from([PublicationId(2), PublicationId(3)]));
        assert!((drafts[0].position.x - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(drafts[0].position.y, 0.5);
        assert_eq!(drafts[1].members, BTreeSet::from([PublicationId(1)]));
    }

    #[test]
    fn test_grouped_numerical_skips_empty_slots() {
        let graph = graph();
        let years = Constraint::numerical(FacetId::Year, 1999, 2001).unwrap();
        let drafts = aggregate(&graph, &all(&graph), &view(None, Some(&years), true, false));
        assert_eq!(drafts.len(), 2);
        // 2000 is slot 1 of 3: y = 1 - 2/4
        assert_eq!(drafts[0].position, Point::new(0.5, 0.5));
        assert_eq!(drafts[1].position, Point::new(0.5, 0.25));
    }

    #[test]
    fn test_grouped_remainder_keeps_partition() {
        let graph = graph();
        let years = Constraint::numerical(FacetId::Year, 2001, 2001).unwrap();
        let drafts = aggregate(&graph, &all(&graph), &view(Some(&years), None, false, true));
        let total: usize = drafts.iter().map(|d| d.members.len()).sum();
        assert_eq!(total, 3);
        assert_eq!(drafts.last().unwrap().members, BTreeSet::from([PublicationId(1)]));
    }

    #[test]
    fn test_empty_cell_has_no_drafts() {
        let graph = graph();
        assert!(aggregate(&graph, &BTreeSet::new(), &view(None, None, false, false)).is_empty());
    }

    #[test]
    fn test_rebuild_freezes_unchanged_scatter_points() {
        let graph = graph();
        let year = Constraint::numerical(FacetId::Year, 2000, 2001).unwrap();
        let scatter = view(Some(&year), None, false, false);
        let settings = LayoutSettings::default();
        let mut ids = VisualIds::default();
        let index = VisualIndex::default();

        let mut cell = Cell::with_publications(all(&graph));
        rebuild_cell(&mut cell, &scatter, &graph, &index, &settings, &mut ids);
        assert!(cell.visuals().iter().all(|v| !v.fixed && v.previous.is_none()));
        let before: Vec<Point> = cell.visuals().iter().map(|v| v.position).collect();

        rebuild_cell(&mut cell, &scatter, &graph, &index, &settings, &mut ids);
        assert!(cell.visuals().iter().all(|v| v.fixed));
        let after: Vec<Point> = cell.visuals().iter().map(|v| v.position).collect();
        assert_eq!(before, after);
        assert_eq!(cell.visuals()[0].previous, Some(before[0]));

        // a different basis releases the freeze
        let wider = Constraint::numerical(FacetId::Year, 1990, 2001).unwrap();
        rebuild_cell(
            &mut cell,
            &view(Some(&wider), None, false, false),
            &graph,
            &index,
            &settings,
            &mut ids,
        );
        assert!(cell.visuals().iter().all(|v| !v.fixed));
    }

    #[test]
    fn test_relayout_keeps_frozen_points() {
        let graph = graph();
        let scatter = view(None, None, false, false);
        let settings = LayoutSettings::default();
        let mut ids = VisualIds::default();
        let index = VisualIndex::default();
        let mut cell = Cell::with_publications(all(&graph));
        rebuild_cell(&mut cell, &scatter, &graph, &index, &settings, &mut ids);
        rebuild_cell(&mut cell, &scatter, &graph, &index, &settings, &mut ids);
        assert!(cell.visuals().iter().all(|v| v.fixed));
        let before: Vec<Point> = cell.visuals().iter().map(|v| v.position).collect();

        relayout_cell(&mut cell, &scatter, &graph, &settings);
        for (visual, position) in cell.visuals().iter().zip(&before) {
            assert!(visual.fixed);
            assert_eq!(visual.previous, Some(*position));
            assert_eq!(visual.position.x.to_bits(), position.x.to_bits());
            assert_eq!(visual.position.y.to_bits(), position.y.to_bits());
        }
    }
}
