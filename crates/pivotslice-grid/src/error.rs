use pivotslice_core::{CellCoord, FacetId, PublicationId, VisualId};
use thiserror::Error;

/// Failure to turn query text such as `/year 2000-2005` into a constraint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("query must start with '/<facet>'")]
    MissingFacetTag,
    #[error("unknown facet '{0}'")]
    UnknownFacet(String),
    #[error("no value given for facet {0}")]
    MissingValue(FacetId),
    #[error("'{text}' is not a valid number or range for {facet}")]
    InvalidNumber { facet: FacetId, text: String },
    #[error("range {from}-{to} is inverted")]
    InvertedRange { from: i64, to: i64 },
    #[error("no {facet} named '{label}'")]
    UnknownValue { facet: FacetId, label: String },
}

/// A broken grid invariant, reported by `GridSession::validate`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("grid is {rows}x{cols} but the axes hold {row_filters}x{col_filters} filters")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        row_filters: usize,
        col_filters: usize,
    },
    #[error("publication {publication} is in {actual:?} but belongs in {expected:?}")]
    Misplaced {
        publication: PublicationId,
        expected: Vec<CellCoord>,
        actual: Vec<CellCoord>,
    },
    #[error("cell {cell} holds unknown publication {publication}")]
    UnknownPublication {
        cell: CellCoord,
        publication: PublicationId,
    },
    #[error("visuals of cell {cell} do not partition its publications")]
    VisualPartition { cell: CellCoord },
    #[error("visual {visual} in cell {cell} is empty")]
    EmptyVisual { cell: CellCoord, visual: VisualId },
    #[error("visual {visual} in cell {cell} is outside the unit square")]
    OutOfBounds { cell: CellCoord, visual: VisualId },
    #[error("filter {index} on the {axis} axis does not match the active facets")]
    FacetSlots {
        axis: pivotslice_core::AxisKind,
        index: usize,
    },
}
