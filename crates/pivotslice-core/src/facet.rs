use crate::error::EnumConversionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacetKind {
    /// Set-valued attribute; constraints hold a list of accepted value ids.
    Categorical,
    /// Integer attribute; constraints hold an inclusive range.
    Numerical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum FacetId {
    Author = 0,
    Journal = 1,
    Conference = 2,
    Year = 3,
    Keyword = 4,
    Citation = 5,
    Reference = 6,
    InDegree = 7,
    OutDegree = 8,
}

impl FacetId {
    pub const ALL: [FacetId; 9] = [
        FacetId::Author,
        FacetId::Journal,
        FacetId::Conference,
        FacetId::Year,
        FacetId::Keyword,
        FacetId::Citation,
        FacetId::Reference,
        FacetId::InDegree,
        FacetId::OutDegree,
    ];

    pub fn kind(self) -> FacetKind {
        match self {
            FacetId::Author | FacetId::Journal | FacetId::Conference | FacetId::Keyword => {
                FacetKind::Categorical
            }
            FacetId::Year
            | FacetId::Citation
            | FacetId::Reference
            | FacetId::InDegree
            | FacetId::OutDegree => FacetKind::Numerical,
        }
    }

    pub fn facet(self) -> &'static Facet {
        &CATALOG[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.facet().name
    }

    /// Facets derived from the citation graph rather than stored per publication.
    pub fn is_graph_derived(self) -> bool {
        matches!(self, FacetId::InDegree | FacetId::OutDegree)
    }
}

impl TryFrom<i32> for FacetId {
    type Error = EnumConversionError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FacetId::Author),
            1 => Ok(FacetId::Journal),
            2 => Ok(FacetId::Conference),
            3 => Ok(FacetId::Year),
            4 => Ok(FacetId::Keyword),
            5 => Ok(FacetId::Citation),
            6 => Ok(FacetId::Reference),
            7 => Ok(FacetId::InDegree),
            8 => Ok(FacetId::OutDegree),
            _ => Err(EnumConversionError::InvalidFacetId(value)),
        }
    }
}

impl FromStr for FacetId {
    type Err = EnumConversionError;

    /// Case-insensitive lookup by catalog name ("year", "In-degree", ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        CATALOG
            .iter()
            .find(|facet| facet.name.eq_ignore_ascii_case(needle))
            .map(|facet| facet.id)
            .ok_or_else(|| EnumConversionError::UnknownFacetName(needle.to_string()))
    }
}

impl fmt::Display for FacetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Facet {
    pub id: FacetId,
    pub name: &'static str,
    pub kind: FacetKind,
}

impl Facet {
    const fn new(id: FacetId, name: &'static str, kind: FacetKind) -> Self {
        Self { id, name, kind }
    }
}

/// The fixed facet registry, indexed by `FacetId as usize`.
pub const CATALOG: [Facet; 9] = [
    Facet::new(FacetId::Author, "Author", FacetKind::Categorical),
    Facet::new(FacetId::Journal, "Journal", FacetKind::Categorical),
    Facet::new(FacetId::Conference, "Conference", FacetKind::Categorical),
    Facet::new(FacetId::Year, "Year", FacetKind::Numerical),
    Facet::new(FacetId::Keyword, "Keyword", FacetKind::Categorical),
    Facet::new(FacetId::Citation, "Citation", FacetKind::Numerical),
    Facet::new(FacetId::Reference, "Reference", FacetKind::Numerical),
    Facet::new(FacetId::InDegree, "In-degree", FacetKind::Numerical),
    Facet::new(FacetId::OutDegree, "Out-degree", FacetKind::Numerical),
];
