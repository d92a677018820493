//! Filter facets for doctor search.
//!
//! Every facet has an "all" sentinel meaning "no constraint". Facets combine
//! with logical AND.

use std::fmt;
use std::str::FromStr;

use clinicdir_core::Rating;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Sentinel accepted in query strings for an unconstrained facet.
pub const ALL: &str = "all";

/// A single facet value: either unconstrained or one exact value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Facet<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Facet<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Facet::All => true,
            Facet::Only(expected) => expected == value,
        }
    }

    /// Like `matches`, but an absent value only passes an unconstrained facet.
    pub fn matches_opt(&self, value: Option<&T>) -> bool {
        match (self, value) {
            (Facet::All, _) => true,
            (Facet::Only(expected), Some(v)) => expected == v,
            (Facet::Only(_), None) => false,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Facet::All)
    }
}

impl<T: fmt::Display> fmt::Display for Facet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facet::All => f.write_str(ALL),
            Facet::Only(v) => v.fmt(f),
        }
    }
}

impl Facet<Rating> {
    /// Parses a rating facet: `all`, blank, or a rating code.
    pub fn parse_rating(raw: &str) -> Result<Self, SearchError> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(ALL) {
            return Ok(Facet::All);
        }
        Rating::from_str(raw)
            .map(Facet::Only)
            .map_err(|_| SearchError::invalid_facet("rating", raw))
    }
}

impl Facet<String> {
    /// Parses an id facet: `all`, blank, or an entity id.
    pub fn parse_id(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(ALL) {
            Facet::All
        } else {
            Facet::Only(raw.to_string())
        }
    }
}

// Facets travel as plain strings in query parameters and config.
impl<T: fmt::Display> Serialize for Facet<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Facet<Rating> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Facet::parse_rating(&raw).map_err(serde::de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Facet<String> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Facet::parse_id(&raw))
    }
}

/// The conjunction of all search predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoctorFilter {
    pub rating: Facet<Rating>,
    pub hospital: Facet<String>,
    pub department: Facet<String>,
    /// Case-insensitive substring over name or specialty; blank matches all.
    pub text: String,
}

impl DoctorFilter {
    /// The all-inclusive filter.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_rating(mut self, rating: Rating) -> Self {
        self.rating = Facet::Only(rating);
        self
    }

    pub fn with_hospital(mut self, id: impl Into<String>) -> Self {
        self.hospital = Facet::Only(id.into());
        self
    }

    pub fn with_department(mut self, id: impl Into<String>) -> Self {
        self.department = Facet::Only(id.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Lowercased needle, or `None` when the text predicate is inactive.
    /// Blank text disables the predicate; otherwise the text is matched as given.
    pub(crate) fn needle(&self) -> Option<String> {
        (!self.text.trim().is_empty()).then(|| self.text.to_lowercase())
    }

    pub fn is_unconstrained(&self) -> bool {
        self.rating.is_all()
            && self.hospital.is_all()
            && self.department.is_all()
            && self.needle().is_none()
    }
}

/// How unresolved references affect whether a doctor is listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinPolicy {
    /// Drop doctors whose hospital does not resolve; keep those with a
    /// missing or unresolved department.
    #[default]
    Lax,
    /// Also drop doctors whose department is set but does not resolve.
    Strict,
}

impl FromStr for JoinPolicy {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lax" => Ok(JoinPolicy::Lax),
            "strict" => Ok(JoinPolicy::Strict),
            other => Err(SearchError::invalid_facet("join_policy", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_sentinel_parses_to_unconstrained() {
        assert_eq!(Facet::parse_rating("all").unwrap(), Facet::All);
        assert_eq!(Facet::parse_rating("  ").unwrap(), Facet::All);
        assert_eq!(Facet::parse_rating("b").unwrap(), Facet::Only(Rating::B));
        assert!(Facet::parse_rating("Z").is_err());
        assert_eq!(Facet::parse_id("ALL"), Facet::All);
        assert_eq!(Facet::parse_id(" h1 "), Facet::Only("h1".to_string()));
    }

    #[test]
    fn facet_matching() {
        let only: Facet<String> = Facet::Only("d1".into());
        assert!(only.matches(&"d1".to_string()));
        assert!(!only.matches_opt(None));
        assert!(Facet::<String>::All.matches_opt(None));
    }

    #[test]
    fn filter_deserializes_from_query_shape() {
        let filter: DoctorFilter = serde_json::from_str(
            r#"{"rating":"A","hospital":"all","department":"d2","text":"kim"}"#,
        )
        .unwrap();
        assert_eq!(filter.rating, Facet::Only(Rating::A));
        assert!(filter.hospital.is_all());
        assert_eq!(filter.department, Facet::Only("d2".into()));

        let empty: DoctorFilter = serde_json::from_str("{}").unwrap();
        assert!(empty.is_unconstrained());
    }

    #[test]
    fn whitespace_text_is_inactive() {
        assert!(DoctorFilter::all().with_text("   ").is_unconstrained());
        assert_eq!(
            DoctorFilter::all().with_text(" KiM ").needle().as_deref(),
            Some(" kim ")
        );
    }

    #[test]
    fn join_policy_parses() {
        assert_eq!("Strict".parse::<JoinPolicy>().unwrap(), JoinPolicy::Strict);
        assert_eq!(JoinPolicy::default(), JoinPolicy::Lax);
        assert!("loose".parse::<JoinPolicy>().is_err());
    }
}
