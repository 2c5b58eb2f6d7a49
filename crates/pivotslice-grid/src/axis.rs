use crate::constraint::Constraint;
use crate::filter::Filter;
use pivotslice_core::{AxisKind, FacetId};
use serde::{Deserialize, Serialize};

/// What a successful structural operation did to the line list. Indices refer
/// to the axis after the edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisEdit {
    Added(usize),
    Removed(usize),
    Updated(usize),
    /// The filter at `index` was replaced by `pieces` single-value filters
    /// occupying `index..index + pieces`.
    Split { index: usize, pieces: usize },
    /// The filter formerly at `removed` was folded into the one now at `into`.
    Merged { removed: usize, into: usize },
    Relayout(usize),
}

/// An ordered chain of filters along one grid dimension, with the residual
/// filter fixed at index 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridAxis {
    kind: AxisKind,
    filters: Vec<Filter>,
    facets: Vec<FacetId>,
}

impl GridAxis {
    pub const RESIDUAL: usize = 0;

    pub fn new(kind: AxisKind) -> Self {
        Self {
            kind,
            filters: vec![Filter::new()],
            facets: Vec::new(),
        }
    }

    pub fn kind(&self) -> AxisKind {
        self.kind
    }

    /// Number of lines, residual included.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Never true: the residual line always exists.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn filter(&self, index: usize) -> Option<&Filter> {
        self.filters.get(index)
    }

    pub fn active_facets(&self) -> &[FacetId] {
        &self.facets
    }

    fn is_constrained_line(&self, index: usize) -> bool {
        index != Self::RESIDUAL && index < self.filters.len()
    }

    /// Drops every line but the residual.
    pub fn reset(&mut self) {
        self.filters.truncate(1);
        self.filters[Self::RESIDUAL] = Filter::new();
        self.facets.clear();
    }

    fn activate(&mut self, facet: FacetId) {
        if self.facets.contains(&facet) {
            return;
        }
        self.facets.push(facet);
        for filter in self.filters.iter_mut().skip(1) {
            filter.activate(facet);
        }
    }

    /// Deactivates facets whose constraint is empty on every filter.
    fn clear_empty_facets(&mut self) {
        let stale: Vec<FacetId> = self
            .facets
            .iter()
            .copied()
            .filter(|facet| {
                self.filters
                    .iter()
                    .skip(1)
                    .all(|filter| filter.constraint(*facet).is_none_or(Constraint::is_empty))
            })
            .collect();
        for facet in stale {
            tracing::debug!("Deactivating facet {} on the {} axis", facet, self.kind);
            self.facets.retain(|f| *f != facet);
            for filter in &mut self.filters {
                filter.deactivate(facet);
            }
        }
    }

    fn normalized(&mut self, filter: &Filter) -> Filter {
        for constraint in filter.non_empty_constraints() {
            self.activate(constraint.facet());
        }
        let mut normalized = Filter::from_constraints(filter.non_empty_constraints().cloned());
        for facet in &self.facets {
            normalized.activate(*facet);
        }
        normalized
    }

    /// Inserts a new line built from one non-empty constraint. Index 0 means
    /// "right after the residual"; indices past the end append.
    pub fn add_filter(&mut self, constraint: Constraint, at: usize) -> Option<AxisEdit> {
        if constraint.is_empty() {
            tracing::debug!("Ignoring empty constraint for new {} filter", self.kind);
            return None;
        }
        self.insert_filter(Filter::from_constraints([constraint]), at)
    }

    /// Inserts a copy of `filter`. Empty filters are rejected.
    pub fn insert_filter(&mut self, filter: Filter, at: usize) -> Option<AxisEdit> {
        if filter.is_empty() {
            tracing::debug!("Ignoring empty {} filter", self.kind);
            return None;
        }
        let index = at.clamp(1, self.filters.len());
        let filter = self.normalized(&filter);
        self.filters.insert(index, filter);
        Some(AxisEdit::Added(index))
    }

    pub fn remove_filter(&mut self, index: usize) -> Option<AxisEdit> {
        if !self.is_constrained_line(index) {
            tracing::debug!("Refusing to remove {} filter {}", self.kind, index);
            return None;
        }
        self.filters.remove(index);
        self.clear_empty_facets();
        Some(AxisEdit::Removed(index))
    }

    /// Merges into an existing filter. Targeting the residual creates a new
    /// line after it instead.
    pub fn merge_constraint_into(
        &mut self,
        index: usize,
        constraint: Constraint,
    ) -> Option<AxisEdit> {
        if index == Self::RESIDUAL {
            return self.add_filter(constraint, 1);
        }
        if index >= self.filters.len() || constraint.is_empty() {
            return None;
        }
        self.activate(constraint.facet());
        self.filters[index].merge_constraint(&constraint);
        Some(AxisEdit::Updated(index))
    }

    /// Replaces a filter whose only non-empty constraint covers at least two
    /// values with one filter per value, highest value first.
    pub fn split_filter(&mut self, index: usize) -> Option<AxisEdit> {
        if !self.is_constrained_line(index) {
            return None;
        }
        let Some(pieces) = self.filters[index].sole_constraint().and_then(Constraint::split) else {
            tracing::debug!("{} filter {} cannot be split", self.kind, index);
            return None;
        };
        let count = pieces.len();
        self.filters.remove(index);
        for piece in pieces {
            let filter = self.normalized(&Filter::from_constraints([piece]));
            self.filters.insert(index, filter);
        }
        Some(AxisEdit::Split {
            index,
            pieces: count,
        })
    }

    /// Empties one constraint; a filter left without constraints is removed.
    pub fn clear_constraint(&mut self, index: usize, facet: FacetId) -> Option<AxisEdit> {
        if !self.is_constrained_line(index) || !self.filters[index].clear_constraint(facet) {
            return None;
        }
        if self.filters[index].is_empty() {
            self.filters.remove(index);
            self.clear_empty_facets();
            return Some(AxisEdit::Removed(index));
        }
        self.clear_empty_facets();
        Some(AxisEdit::Updated(index))
    }

    /// Folds every constraint of filter `from` into filter `into` and drops
    /// `from`.
    pub fn merge_filters(&mut self, from: usize, into: usize) -> Option<AxisEdit> {
        if from == into || !self.is_constrained_line(from) || !self.is_constrained_line(into) {
            return None;
        }
        let source = self.filters.remove(from);
        let into = if from < into { into - 1 } else { into };
        for constraint in source.non_empty_constraints() {
            self.filters[into].merge_constraint(constraint);
        }
        self.clear_empty_facets();
        Some(AxisEdit::Merged {
            removed: from,
            into,
        })
    }

    pub fn select_layout_facet(&mut self, index: usize, facet: FacetId) -> Option<AxisEdit> {
        let filter = self.filters.get_mut(index)?;
        filter
            .select_layout_facet(facet)
            .then_some(AxisEdit::Relayout(index))
    }

    pub fn toggle_collapsed(&mut self, index: usize) -> Option<AxisEdit> {
        let filter = self.filters.get_mut(index)?;
        filter.toggle_collapsed();
        Some(AxisEdit::Relayout(index))
    }

    /// Facet slots are consistent: the residual holds none, every other
    /// filter holds exactly the active facets. Returns the first offender.
    pub fn first_slot_mismatch(&self) -> Option<usize> {
        if !self.filters[Self::RESIDUAL].constraints().is_empty() {
            return Some(Self::RESIDUAL);
        }
        self.filters
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, filter)| {
                filter.constraints().len() != self.facets.len()
                    || !self.facets.iter().all(|facet| filter.constraint(*facet).is_some())
            })
            .map(|(index, _)| index)
    }
}
