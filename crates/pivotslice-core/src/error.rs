use crate::PublicationId;
use thiserror::Error;

/// Error type for enum conversion failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnumConversionError {
    #[error("Invalid FacetId value: {0}")]
    InvalidFacetId(i32),
    #[error("Unknown facet name: {0}")]
    UnknownFacetName(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("publication {0} appears more than once")]
    DuplicatePublication(PublicationId),
    #[error("citation {from} -> {to} references an unknown publication")]
    MissingEndpoint {
        from: PublicationId,
        to: PublicationId,
    },
}
