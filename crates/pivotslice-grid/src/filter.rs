use crate::constraint::Constraint;
use pivotslice_core::{FacetId, PublicationGraph, PublicationId};
use serde::{Deserialize, Serialize};

/// One grid line: a conjunction of constraints, one slot per active facet of
/// the owning axis. Also carries the line's layout facet and collapse state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    constraints: Vec<Constraint>,
    layout_facet: Option<FacetId>,
    collapsed: bool,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a filter from loose constraints; constraints on the same facet
    /// are merged. The owning axis adds the remaining facet slots on insert.
    pub fn from_constraints(constraints: impl IntoIterator<Item = Constraint>) -> Self {
        let mut filter = Self::new();
        for constraint in constraints {
            filter.merge_constraint(&constraint);
        }
        filter
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn constraint(&self, facet: FacetId) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.facet() == facet)
    }

    pub fn facets(&self) -> impl Iterator<Item = FacetId> + '_ {
        self.constraints.iter().map(Constraint::facet)
    }

    pub fn non_empty_constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter().filter(|c| !c.is_empty())
    }

    /// True when every constraint is a wildcard.
    pub fn is_empty(&self) -> bool {
        self.constraints.iter().all(Constraint::is_empty)
    }

    pub fn satisfies(&self, graph: &PublicationGraph, publication: PublicationId) -> bool {
        self.constraints
            .iter()
            .all(|constraint| constraint.satisfies(graph, publication))
    }

    /// The only non-empty constraint, if there is exactly one.
    pub fn sole_constraint(&self) -> Option<&Constraint> {
        let mut non_empty = self.non_empty_constraints();
        let first = non_empty.next()?;
        non_empty.next().is_none().then_some(first)
    }

    pub fn layout_facet(&self) -> Option<FacetId> {
        self.layout_facet
    }

    /// Constraint of the layout facet, as long as it still restricts something.
    pub fn layout_constraint(&self) -> Option<&Constraint> {
        self.layout_facet
            .and_then(|facet| self.constraint(facet))
            .filter(|constraint| !constraint.is_empty())
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub(crate) fn activate(&mut self, facet: FacetId) {
        if self.constraint(facet).is_none() {
            self.constraints.push(Constraint::empty(facet));
        }
    }

    pub(crate) fn deactivate(&mut self, facet: FacetId) {
        self.constraints.retain(|c| c.facet() != facet);
        if self.layout_facet == Some(facet) {
            self.layout_facet = None;
        }
    }

    pub(crate) fn merge_constraint(&mut self, constraint: &Constraint) -> bool {
        let facet = constraint.facet();
        self.activate(facet);
        self.constraints
            .iter_mut()
            .find(|c| c.facet() == facet)
            .is_some_and(|slot| slot.merge(constraint))
    }

    /// Empties one constraint slot. Returns false when it was already empty.
    pub(crate) fn clear_constraint(&mut self, facet: FacetId) -> bool {
        let Some(slot) = self.constraints.iter_mut().find(|c| c.facet() == facet) else {
            return false;
        };
        if slot.is_empty() {
            return false;
        }
        *slot = Constraint::empty(facet);
        if self.layout_facet == Some(facet) {
            self.layout_facet = None;
        }
        true
    }

    /// Selecting the current layout facet again clears it. A facet can only
    /// be selected while its constraint on this filter is non-empty.
    pub(crate) fn select_layout_facet(&mut self, facet: FacetId) -> bool {
        if self.layout_facet == Some(facet) {
            self.layout_facet = None;
            return true;
        }
        match self.constraint(facet) {
            Some(constraint) if !constraint.is_empty() => {
                self.layout_facet = Some(facet);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn toggle_collapsed(&mut self) {
        self.collapsed = !self.collapsed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pivotslice_core::{GraphData, Publication, ValueId};

    fn year(from: i64, to: i64) -> Constraint {
        Constraint::numerical(FacetId::Year, from, to).unwrap()
    }

    #[test]
    fn test_filter_is_conjunction_of_constraints() {
        let graph = PublicationGraph::from_data(GraphData {
            publications: vec![
                Publication::new(1, "a").with_year(2001).with_author(3, "Ann"),
                Publication::new(2, "b").with_year(2001),
            ],
            citations: Vec::new(),
        })
        .unwrap();
        let filter = Filter::from_constraints([
            year(2000, 2002),
            Constraint::categorical(FacetId::Author, [ValueId(3)]).unwrap(),
        ]);
        assert!(filter.satisfies(&graph, PublicationId(1)));
        assert!(!filter.satisfies(&graph, PublicationId(2)));
        assert!(Filter::new().satisfies(&graph, PublicationId(2)));
    }

    #[test]
    fn test_empty_slots_keep_filter_empty() {
        let mut filter = Filter::new();
        filter.activate(FacetId::Year);
        filter.activate(FacetId::Author);
        assert!(filter.is_empty());
        assert_eq!(filter.constraints().len(), 2);
        assert!(filter.sole_constraint().is_none());
    }

    #[test]
    fn test_sole_constraint_requires_exactly_one() {
        let mut filter = Filter::from_constraints([year(2000, 2001)]);
        filter.activate(FacetId::Author);
        assert_eq!(filter.sole_constraint(), Some(&year(2000, 2001)));
        filter.merge_constraint(&Constraint::categorical(FacetId::Author, [ValueId(1)]).unwrap());
        assert!(filter.sole_constraint().is_none());
    }

    #[test]
    fn test_layout_facet_selection_rules() {
        let mut filter = Filter::from_constraints([year(2000, 2001)]);
        filter.activate(FacetId::Author);

        assert!(!filter.select_layout_facet(FacetId::Author));
        assert!(filter.select_layout_facet(FacetId::Year));
        assert_eq!(filter.layout_constraint(), Some(&year(2000, 2001)));

        // toggles off
        assert!(filter.select_layout_facet(FacetId::Year));
        assert_eq!(filter.layout_facet(), None);

        filter.select_layout_facet(FacetId::Year);
        assert!(filter.clear_constraint(FacetId::Year));
        assert_eq!(filter.layout_facet(), None);
        assert!(!filter.clear_constraint(FacetId::Year));
    }

    #[test]
    fn test_deactivate_drops_slot_and_layout_facet() {
        let mut filter = Filter::from_constraints([year(2000, 2001)]);
        filter.select_layout_facet(FacetId::Year);
        filter.deactivate(FacetId::Year);
        assert!(filter.constraints().is_empty());
        assert_eq!(filter.layout_facet(), None);
    }
}
