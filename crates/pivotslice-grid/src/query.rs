//! Text form of a constraint, as typed into a search box:
//! `/year 2000-2005`, `/citation 10`, `/author Ada Lovelace`.

use crate::constraint::Constraint;
use crate::error::QueryError;
use pivotslice_core::{FacetId, FacetKind, PublicationGraph};

pub fn parse_constraint(text: &str, graph: &PublicationGraph) -> Result<Constraint, QueryError> {
    let rest = text
        .trim()
        .strip_prefix('/')
        .ok_or(QueryError::MissingFacetTag)?;
    let (tag, value) = match rest.split_once(char::is_whitespace) {
        Some((tag, value)) => (tag, value.trim()),
        None => (rest, ""),
    };
    let facet: FacetId = tag
        .parse()
        .map_err(|_| QueryError::UnknownFacet(tag.to_string()))?;
    if value.is_empty() {
        return Err(QueryError::MissingValue(facet));
    }

    match facet.kind() {
        FacetKind::Numerical => {
            let (from, to) = parse_range(facet, value)?;
            Constraint::numerical(facet, from, to).ok_or(QueryError::InvertedRange { from, to })
        }
        FacetKind::Categorical => {
            let id = graph
                .find_value(facet, value)
                .ok_or_else(|| QueryError::UnknownValue {
                    facet,
                    label: value.to_string(),
                })?;
            Constraint::categorical(facet, [id]).ok_or(QueryError::MissingValue(facet))
        }
    }
}

fn parse_range(facet: FacetId, text: &str) -> Result<(i64, i64), QueryError> {
    let invalid = || QueryError::InvalidNumber {
        facet,
        text: text.to_string(),
    };
    match text.split_once('-') {
        Some((from, to)) => {
            let from = from.trim().parse().map_err(|_| invalid())?;
            let to = to.trim().parse().map_err(|_| invalid())?;
            Ok((from, to))
        }
        None => {
            let value = text.parse().map_err(|_| invalid())?;
            Ok((value, value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pivotslice_core::{GraphData, Publication, ValueId};

    fn graph() -> PublicationGraph {
        PublicationGraph::from_data(GraphData {
            publications: vec![Publication::new(1, "p").with_author(4, "Ada Lovelace")],
            citations: Vec::new(),
        })
        .unwrap()
    }

    #[test]
    fn test_parse_numeric_range_and_single_value() {
        let graph = graph();
        assert_eq!(
            parse_constraint("/year 2000-2005", &graph),
            Ok(Constraint::numerical(FacetId::Year, 2000, 2005).unwrap())
        );
        assert_eq!(
            parse_constraint("  /Year 2001 ", &graph),
            Ok(Constraint::numerical(FacetId::Year, 2001, 2001).unwrap())
        );
        assert_eq!(
            parse_constraint("/out-degree 2 - 4", &graph),
            Ok(Constraint::numerical(FacetId::OutDegree, 2, 4).unwrap())
        );
    }

    #[test]
    fn test_parse_categorical_label() {
        let graph = graph();
        assert_eq!(
            parse_constraint("/author ada lovelace", &graph),
            Ok(Constraint::categorical(FacetId::Author, [ValueId(4)]).unwrap())
        );
        assert!(matches!(
            parse_constraint("/author Grace Hopper", &graph),
            Err(QueryError::UnknownValue { .. })
        ));
    }

    #[test]
    fn test_parse_failures() {
        let graph = graph();
        assert_eq!(parse_constraint("year 2000", &graph), Err(QueryError::MissingFacetTag));
        assert_eq!(
            parse_constraint("/venue x", &graph),
            Err(QueryError::UnknownFacet("venue".into()))
        );
        assert_eq!(
            parse_constraint("/year", &graph),
            Err(QueryError::MissingValue(FacetId::Year))
        );
        assert_eq!(
            parse_constraint("/year 2005-2000", &graph),
            Err(QueryError::InvertedRange { from: 2005, to: 2000 })
        );
        assert!(matches!(
            parse_constraint("/year twenty", &graph),
            Err(QueryError::InvalidNumber { .. })
        ));
    }
}
