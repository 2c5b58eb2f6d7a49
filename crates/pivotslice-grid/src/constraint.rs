use pivotslice_core::{FacetId, FacetKind, PublicationGraph, PublicationId, ValueId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Inclusive integer interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumericRange {
    pub from: i64,
    pub to: i64,
}

impl NumericRange {
    pub fn new(from: i64, to: i64) -> Option<Self> {
        (from <= to).then_some(Self { from, to })
    }

    pub fn single(value: i64) -> Self {
        Self {
            from: value,
            to: value,
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        self.from <= value && value <= self.to
    }

    /// Number of integers covered, saturating at `u64::MAX`.
    pub fn len(&self) -> u64 {
        self.to.abs_diff(self.from).saturating_add(1)
    }

    /// Zero-based position of `value` within the range.
    pub fn offset_of(&self, value: i64) -> Option<usize> {
        if !self.contains(value) {
            return None;
        }
        usize::try_from(value.abs_diff(self.from)).ok()
    }

    pub fn union(&self, other: &NumericRange) -> NumericRange {
        NumericRange {
            from: self.from.min(other.from),
            to: self.to.max(other.to),
        }
    }
}

/// A predicate over one facet. An empty constraint is a wildcard.
///
/// Categorical values keep their insertion order: it fixes the slot each
/// value occupies when a cell is grouped or scattered by this facet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Constraint {
    Categorical {
        facet: FacetId,
        values: Vec<ValueId>,
    },
    Numerical {
        facet: FacetId,
        range: Option<NumericRange>,
    },
}

impl Constraint {
    /// Upper bound on the number of lines one split may produce.
    pub const MAX_SPLIT_PIECES: usize = 256;

    pub fn empty(facet: FacetId) -> Self {
        match facet.kind() {
            FacetKind::Categorical => Constraint::Categorical {
                facet,
                values: Vec::new(),
            },
            FacetKind::Numerical => Constraint::Numerical { facet, range: None },
        }
    }

    /// Duplicate values are dropped, first occurrence wins. `None` when the
    /// facet is not categorical.
    pub fn categorical(facet: FacetId, values: impl IntoIterator<Item = ValueId>) -> Option<Self> {
        if facet.kind() != FacetKind::Categorical {
            return None;
        }
        let mut unique = Vec::new();
        for value in values {
            if !unique.contains(&value) {
                unique.push(value);
            }
        }
        Some(Constraint::Categorical {
            facet,
            values: unique,
        })
    }

    /// `None` when the facet is not numerical or the range is inverted.
    pub fn numerical(facet: FacetId, from: i64, to: i64) -> Option<Self> {
        if facet.kind() != FacetKind::Numerical {
            return None;
        }
        NumericRange::new(from, to).map(|range| Constraint::Numerical {
            facet,
            range: Some(range),
        })
    }

    pub fn facet(&self) -> FacetId {
        match self {
            Constraint::Categorical { facet, .. } | Constraint::Numerical { facet, .. } => *facet,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Constraint::Categorical { values, .. } => values.is_empty(),
            Constraint::Numerical { range, .. } => range.is_none(),
        }
    }

    pub fn satisfies(&self, graph: &PublicationGraph, publication: PublicationId) -> bool {
        match self {
            Constraint::Categorical { facet, values } => {
                values.is_empty()
                    || graph
                        .categorical_values(publication, *facet)
                        .iter()
                        .any(|value| values.contains(value))
            }
            Constraint::Numerical { facet, range } => match range {
                None => true,
                Some(range) => graph
                    .numeric_value(publication, *facet)
                    .is_some_and(|value| range.contains(value)),
            },
        }
    }

    /// Folds `other` into `self`: set union for categorical values, interval
    /// union for ranges, and an empty destination simply takes the source.
    /// Returns false, leaving `self` untouched, when the facets differ.
    pub fn merge(&mut self, other: &Constraint) -> bool {
        if self.facet() != other.facet() {
            return false;
        }
        match (self, other) {
            (
                Constraint::Categorical { values, .. },
                Constraint::Categorical { values: more, .. },
            ) => {
                for value in more {
                    if !values.contains(value) {
                        values.push(*value);
                    }
                }
                true
            }
            (Constraint::Numerical { range, .. }, Constraint::Numerical { range: more, .. }) => {
                if let Some(more) = more {
                    *range = Some(match range {
                        Some(current) => current.union(more),
                        None => *more,
                    });
                }
                true
            }
            _ => false,
        }
    }

    /// Number of discrete values the constraint admits (zero when empty).
    pub fn value_count(&self) -> usize {
        match self {
            Constraint::Categorical { values, .. } => values.len(),
            Constraint::Numerical { range, .. } => range.map_or(0, |range| {
                usize::try_from(range.len()).unwrap_or(usize::MAX)
            }),
        }
    }

    /// Single-value constraints covering `self`, in value order
    /// (insertion order for categorical values, ascending for ranges).
    /// `None` unless at least two and at most [`Self::MAX_SPLIT_PIECES`]
    /// values are covered.
    pub fn split(&self) -> Option<Vec<Constraint>> {
        let count = self.value_count();
        if !(2..=Self::MAX_SPLIT_PIECES).contains(&count) {
            return None;
        }
        let pieces = match self {
            Constraint::Categorical { facet, values } => values
                .iter()
                .map(|value| Constraint::Categorical {
                    facet: *facet,
                    values: vec![*value],
                })
                .collect(),
            Constraint::Numerical { facet, range } => {
                let range = (*range)?;
                (range.from..=range.to)
                    .map(|value| Constraint::Numerical {
                        facet: *facet,
                        range: Some(NumericRange::single(value)),
                    })
                    .collect()
            }
        };
        Some(pieces)
    }

    /// Index of the value slot a publication falls into: the first listed
    /// categorical value it holds, or its offset from the start of the range.
    pub fn slot_of(&self, graph: &PublicationGraph, publication: PublicationId) -> Option<usize> {
        match self {
            Constraint::Categorical { facet, values } => {
                let held = graph.categorical_values(publication, *facet);
                values.iter().position(|value| held.contains(value))
            }
            Constraint::Numerical { facet, range } => {
                let range = (*range)?;
                let value = graph.numeric_value(publication, *facet)?;
                range.offset_of(value)
            }
        }
    }

    /// Evenly spaced coordinate of slot `slot`, keeping every slot off the
    /// cell border: `(slot + 1) / (count + 1)`.
    pub fn slot_fraction(&self, slot: usize) -> f64 {
        (slot as f64 + 1.0) / (self.value_count() as f64 + 1.0)
    }

    /// Categorical values as a set, for order-insensitive comparisons.
    pub fn value_set(&self) -> BTreeSet<ValueId> {
        match self {
            Constraint::Categorical { values, .. } => values.iter().copied().collect(),
            Constraint::Numerical { .. } => BTreeSet::new(),
        }
    }
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Constraint::Categorical { facet: a, .. },
                Constraint::Categorical { facet: b, .. },
            ) => a == b && self.value_set() == other.value_set(),
            (
                Constraint::Numerical { facet: a, range: ra },
                Constraint::Numerical { facet: b, range: rb },
            ) => a == b && ra == rb,
            _ => false,
        }
    }
}

impl Eq for Constraint {}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Categorical { facet, values } => {
                let ids: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "{} {{{}}}", facet, ids.join(", "))
            }
            Constraint::Numerical { facet, range } => match range {
                Some(range) if range.from == range.to => write!(f, "{} {}", facet, range.from),
                Some(range) => write!(f, "{} {}-{}", facet, range.from, range.to),
                None => write!(f, "{} *", facet),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pivotslice_core::{GraphData, Publication};

    fn graph() -> PublicationGraph {
        PublicationGraph::from_data(GraphData {
            publications: vec![
                Publication::new(1, "a").with_year(2001).with_author(7, "Ada"),
                Publication::new(2, "b").with_year(2002).with_author(8, "Bo").with_author(9, "Cy"),
                Publication::new(3, "c"),
            ],
            citations: Vec::new(),
        })
        .unwrap()
    }

    fn values(ids: &[i64]) -> Vec<ValueId> {
        ids.iter().map(|id| ValueId(*id)).collect()
    }

    #[test]
    fn test_empty_constraint_matches_everything() {
        let graph = graph();
        for facet in [FacetId::Year, FacetId::Author] {
            let constraint = Constraint::empty(facet);
            assert!(constraint.is_empty());
            assert!(graph.publication_ids().all(|id| constraint.satisfies(&graph, id)));
        }
    }

    #[test]
    fn test_numerical_satisfies_inclusive_bounds() {
        let graph = graph();
        let year = Constraint::numerical(FacetId::Year, 2001, 2001).unwrap();
        assert!(year.satisfies(&graph, PublicationId(1)));
        assert!(!year.satisfies(&graph, PublicationId(2)));
        // no stored year
        assert!(!year.satisfies(&graph, PublicationId(3)));
    }

    #[test]
    fn test_categorical_satisfies_on_any_shared_value() {
        let graph = graph();
        let authors = Constraint::categorical(FacetId::Author, values(&[9, 100])).unwrap();
        assert!(authors.satisfies(&graph, PublicationId(2)));
        assert!(!authors.satisfies(&graph, PublicationId(1)));
    }

    #[test]
    fn test_constructors_reject_wrong_kind() {
        assert!(Constraint::numerical(FacetId::Author, 1, 2).is_none());
        assert!(Constraint::categorical(FacetId::Year, values(&[1])).is_none());
        assert!(Constraint::numerical(FacetId::Year, 2005, 2000).is_none());
    }

    #[test]
    fn test_numerical_merge_replaces_empty_then_unions() {
        let mut target = Constraint::empty(FacetId::Year);
        assert!(target.merge(&Constraint::numerical(FacetId::Year, 2000, 2001).unwrap()));
        assert_eq!(target, Constraint::numerical(FacetId::Year, 2000, 2001).unwrap());
        target.merge(&Constraint::numerical(FacetId::Year, 1999, 2003).unwrap());
        assert_eq!(target, Constraint::numerical(FacetId::Year, 1999, 2003).unwrap());
        target.merge(&Constraint::empty(FacetId::Year));
        assert_eq!(target, Constraint::numerical(FacetId::Year, 1999, 2003).unwrap());
    }

    #[test]
    fn test_categorical_merge_is_union_without_duplicates() {
        let mut target = Constraint::categorical(FacetId::Author, values(&[1, 2])).unwrap();
        target.merge(&Constraint::categorical(FacetId::Author, values(&[2, 3])).unwrap());
        assert_eq!(target.value_count(), 3);
        assert_eq!(target, Constraint::categorical(FacetId::Author, values(&[3, 2, 1])).unwrap());
    }

    #[test]
    fn test_merge_across_facets_is_rejected() {
        let mut target = Constraint::numerical(FacetId::Year, 2000, 2001).unwrap();
        let before = target.clone();
        assert!(!target.merge(&Constraint::numerical(FacetId::Citation, 0, 5).unwrap()));
        assert_eq!(target, before);
    }

    #[test]
    fn test_split_requires_two_values() {
        assert!(Constraint::numerical(FacetId::Year, 2001, 2001).unwrap().split().is_none());
        assert!(Constraint::empty(FacetId::Author).split().is_none());

        let pieces = Constraint::numerical(FacetId::Year, 2001, 2002).unwrap().split().unwrap();
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0], Constraint::numerical(FacetId::Year, 2001, 2001).unwrap());

        let pieces = Constraint::categorical(FacetId::Author, values(&[5, 4]))
            .unwrap()
            .split()
            .unwrap();
        assert_eq!(pieces[1], Constraint::categorical(FacetId::Author, values(&[4])).unwrap());
    }

    #[test]
    fn test_full_i64_range_saturates() {
        let graph = graph();
        let wide = Constraint::numerical(FacetId::Year, i64::MIN, i64::MAX).unwrap();
        assert_eq!(NumericRange::new(i64::MIN, i64::MAX).unwrap().len(), u64::MAX);
        assert_eq!(NumericRange::new(0, i64::MAX).unwrap().len(), 1 << 63);
        assert!(wide.value_count() > Constraint::MAX_SPLIT_PIECES);

        let slot = wide.slot_of(&graph, PublicationId(1)).unwrap();
        let fraction = wide.slot_fraction(slot);
        assert!(fraction > 0.0 && fraction < 1.0);
        assert!(wide.split().is_none());
    }

    #[test]
    fn test_split_rejects_too_many_pieces() {
        let huge = Constraint::numerical(FacetId::Year, 0, 1_000_000_000).unwrap();
        assert!(huge.split().is_none());

        let limit = Constraint::MAX_SPLIT_PIECES as i64;
        let largest = Constraint::numerical(FacetId::Year, 1, limit).unwrap();
        assert_eq!(
            largest.split().map(|pieces| pieces.len()),
            Some(Constraint::MAX_SPLIT_PIECES)
        );
        assert!(Constraint::numerical(FacetId::Year, 0, limit).unwrap().split().is_none());
    }

    #[test]
    fn test_slots_and_fractions() {
        let graph = graph();
        let years = Constraint::numerical(FacetId::Year, 2000, 2002).unwrap();
        assert_eq!(years.slot_of(&graph, PublicationId(1)), Some(1));
        assert_eq!(years.slot_fraction(1), 0.5);
        assert_eq!(years.slot_of(&graph, PublicationId(3)), None);

        let authors = Constraint::categorical(FacetId::Author, values(&[9, 8, 7])).unwrap();
        // first listed value wins
        assert_eq!(authors.slot_of(&graph, PublicationId(2)), Some(0));
        assert_eq!(authors.slot_fraction(0), 0.25);
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(
            Constraint::numerical(FacetId::Year, 2000, 2002).unwrap().to_string(),
            "Year 2000-2002"
        );
        assert_eq!(Constraint::empty(FacetId::Citation).to_string(), "Citation *");
    }
}
