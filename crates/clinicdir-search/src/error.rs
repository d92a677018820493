use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("Invalid {facet} filter: {value}")]
    InvalidFacet { facet: &'static str, value: String },

    #[error("Page numbers start at 1")]
    InvalidPage,

    #[error("Page size must be at least 1")]
    InvalidPageSize,
}

impl SearchError {
    pub fn invalid_facet(facet: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidFacet {
            facet,
            value: value.into(),
        }
    }
}
