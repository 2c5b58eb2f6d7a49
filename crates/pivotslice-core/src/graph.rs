use crate::error::GraphError;
use crate::facet::{FacetId, FacetKind};
use crate::{PublicationId, ValueId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A categorical value attached to a publication, with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetValue {
    pub id: ValueId,
    pub label: String,
}

impl FacetValue {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id: ValueId(id),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub id: PublicationId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub authors: Vec<FacetValue>,
    #[serde(default)]
    pub journal: Option<FacetValue>,
    #[serde(default)]
    pub conference: Option<FacetValue>,
    #[serde(default)]
    pub keywords: Vec<FacetValue>,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub citation_count: Option<i64>,
    #[serde(default)]
    pub reference_count: Option<i64>,
}

impl Publication {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id: PublicationId(id),
            title: title.into(),
            authors: Vec::new(),
            journal: None,
            conference: None,
            keywords: Vec::new(),
            year: None,
            citation_count: None,
            reference_count: None,
        }
    }

    pub fn with_year(mut self, year: i64) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_author(mut self, id: i64, name: impl Into<String>) -> Self {
        self.authors.push(FacetValue::new(id, name));
        self
    }

    pub fn with_keyword(mut self, id: i64, word: impl Into<String>) -> Self {
        self.keywords.push(FacetValue::new(id, word));
        self
    }

    pub fn with_journal(mut self, id: i64, name: impl Into<String>) -> Self {
        self.journal = Some(FacetValue::new(id, name));
        self
    }

    pub fn with_conference(mut self, id: i64, name: impl Into<String>) -> Self {
        self.conference = Some(FacetValue::new(id, name));
        self
    }

    pub fn with_counts(mut self, citations: i64, references: i64) -> Self {
        self.citation_count = Some(citations);
        self.reference_count = Some(references);
        self
    }

    /// Stored values of a categorical facet. Numerical facets have none.
    pub fn categorical(&self, facet: FacetId) -> &[FacetValue] {
        match facet {
            FacetId::Author => &self.authors,
            FacetId::Journal => self.journal.as_slice(),
            FacetId::Conference => self.conference.as_slice(),
            FacetId::Keyword => &self.keywords,
            FacetId::Year
            | FacetId::Citation
            | FacetId::Reference
            | FacetId::InDegree
            | FacetId::OutDegree => &[],
        }
    }
}

/// A directed citation link: `from` cites (references) `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Citation {
    pub from: PublicationId,
    pub to: PublicationId,
}

impl Citation {
    pub fn new(from: i64, to: i64) -> Self {
        Self {
            from: PublicationId(from),
            to: PublicationId(to),
        }
    }
}

/// Serialized form of a publication graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphData {
    pub publications: Vec<Publication>,
    #[serde(default)]
    pub citations: Vec<Citation>,
}

/// In-memory citation network the grid engine reads from.
#[derive(Debug, Clone, Default)]
pub struct PublicationGraph {
    publications: BTreeMap<PublicationId, Publication>,
    /// Publications referenced by the key.
    edges_out: BTreeMap<PublicationId, BTreeSet<PublicationId>>,
    /// Publications citing the key.
    edges_in: BTreeMap<PublicationId, BTreeSet<PublicationId>>,
    newly_added: BTreeSet<PublicationId>,
    labels: BTreeMap<FacetId, BTreeMap<ValueId, String>>,
}

impl PublicationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from loaded data. Citations with an unknown endpoint are
    /// dropped with a warning; duplicate publication ids are rejected.
    pub fn from_data(data: GraphData) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        for publication in data.publications {
            if graph.publications.contains_key(&publication.id) {
                return Err(GraphError::DuplicatePublication(publication.id));
            }
            graph.insert_publication(publication);
        }
        for citation in data.citations {
            if let Err(err) = graph.add_citation(citation) {
                tracing::warn!("Dropping citation: {}", err);
            }
        }
        graph.rebuild_labels();
        Ok(graph)
    }

    fn insert_publication(&mut self, publication: Publication) {
        let id = publication.id;
        self.edges_out.entry(id).or_default();
        self.edges_in.entry(id).or_default();
        self.publications.insert(id, publication);
    }

    /// Adds a link between two known publications. Returns `Ok(false)` when the
    /// link already existed or is a self-citation.
    pub fn add_citation(&mut self, citation: Citation) -> Result<bool, GraphError> {
        let Citation { from, to } = citation;
        if !self.contains(from) || !self.contains(to) {
            return Err(GraphError::MissingEndpoint { from, to });
        }
        if from == to {
            return Ok(false);
        }
        let inserted = self.edges_out.entry(from).or_default().insert(to);
        self.edges_in.entry(to).or_default().insert(from);
        Ok(inserted)
    }

    /// Merges newly fetched publications into the graph. Only ids not seen
    /// before are inserted; they become the new "newly added" set, replacing
    /// the previous one. Returns the inserted ids in ascending order.
    pub fn add_publications(
        &mut self,
        publications: Vec<Publication>,
        citations: Vec<Citation>,
    ) -> Vec<PublicationId> {
        let mut added = BTreeSet::new();
        for publication in publications {
            if self.publications.contains_key(&publication.id) {
                tracing::debug!("Publication {} already in graph", publication.id);
                continue;
            }
            added.insert(publication.id);
            self.insert_publication(publication);
        }
        for citation in citations {
            if let Err(err) = self.add_citation(citation) {
                tracing::warn!("Dropping citation: {}", err);
            }
        }
        self.rebuild_labels();
        self.newly_added = added.clone();
        added.into_iter().collect()
    }

    /// Restricts the graph to `keep`. Links leaving the subset are dropped and
    /// the newly-added marker is cleared.
    pub fn prune_to(&mut self, keep: &BTreeSet<PublicationId>) {
        self.publications.retain(|id, _| keep.contains(id));
        for edges in [&mut self.edges_out, &mut self.edges_in] {
            edges.retain(|id, _| keep.contains(id));
            for targets in edges.values_mut() {
                targets.retain(|id| keep.contains(id));
            }
        }
        self.newly_added.clear();
        self.rebuild_labels();
    }

    fn rebuild_labels(&mut self) {
        self.labels.clear();
        for publication in self.publications.values() {
            for facet in FacetId::ALL {
                for value in publication.categorical(facet) {
                    self.labels
                        .entry(facet)
                        .or_default()
                        .entry(value.id)
                        .or_insert_with(|| value.label.clone());
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.publications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.publications.is_empty()
    }

    pub fn contains(&self, id: PublicationId) -> bool {
        self.publications.contains_key(&id)
    }

    pub fn publication(&self, id: PublicationId) -> Option<&Publication> {
        self.publications.get(&id)
    }

    pub fn publication_ids(&self) -> impl Iterator<Item = PublicationId> + '_ {
        self.publications.keys().copied()
    }

    pub fn publications(&self) -> impl Iterator<Item = &Publication> {
        self.publications.values()
    }

    /// Publications referenced by `id`.
    pub fn edges_out(&self, id: PublicationId) -> impl Iterator<Item = PublicationId> + '_ {
        self.edges_out.get(&id).into_iter().flatten().copied()
    }

    /// Publications citing `id`.
    pub fn edges_in(&self, id: PublicationId) -> impl Iterator<Item = PublicationId> + '_ {
        self.edges_in.get(&id).into_iter().flatten().copied()
    }

    pub fn citation_count(&self) -> usize {
        self.edges_out.values().map(BTreeSet::len).sum()
    }

    pub fn is_newly_added(&self, id: PublicationId) -> bool {
        self.newly_added.contains(&id)
    }

    pub fn newly_added(&self) -> &BTreeSet<PublicationId> {
        &self.newly_added
    }

    /// Value ids a publication holds for a categorical facet.
    pub fn categorical_values(&self, id: PublicationId, facet: FacetId) -> Vec<ValueId> {
        self.publication(id)
            .map(|publication| {
                publication
                    .categorical(facet)
                    .iter()
                    .map(|value| value.id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Integer value of a numerical facet, derived from the graph for the
    /// degree facets. `None` for categorical facets and missing data.
    pub fn numeric_value(&self, id: PublicationId, facet: FacetId) -> Option<i64> {
        let publication = self.publication(id)?;
        match facet {
            FacetId::Year => publication.year,
            FacetId::Citation => publication.citation_count,
            FacetId::Reference => publication.reference_count,
            FacetId::InDegree => Some(self.edges_in.get(&id).map_or(0, BTreeSet::len) as i64),
            FacetId::OutDegree => Some(self.edges_out.get(&id).map_or(0, BTreeSet::len) as i64),
            FacetId::Author | FacetId::Journal | FacetId::Conference | FacetId::Keyword => None,
        }
    }

    pub fn label(&self, facet: FacetId, value: ValueId) -> Option<&str> {
        self.labels
            .get(&facet)
            .and_then(|labels| labels.get(&value))
            .map(String::as_str)
    }

    /// Exact, case-insensitive label match.
    pub fn find_value(&self, facet: FacetId, label: &str) -> Option<ValueId> {
        let needle = label.trim();
        self.labels.get(&facet).and_then(|labels| {
            labels
                .iter()
                .find(|(_, candidate)| candidate.eq_ignore_ascii_case(needle))
                .map(|(id, _)| *id)
        })
    }

    /// Values of a categorical facet whose label contains `needle`,
    /// case-insensitively, in value-id order.
    pub fn search_values(&self, facet: FacetId, needle: &str) -> Vec<(ValueId, &str)> {
        if facet.kind() != FacetKind::Categorical {
            return Vec::new();
        }
        let needle = needle.trim().to_lowercase();
        self.labels
            .get(&facet)
            .map(|labels| {
                labels
                    .iter()
                    .filter(|(_, label)| label.to_lowercase().contains(&needle))
                    .map(|(id, label)| (*id, label.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }
}
