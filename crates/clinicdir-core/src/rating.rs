use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// Physician rating tier.
///
/// The declaration order is the sort order: search results are ordered by
/// rating code and `A < B < C < D` must keep holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rating {
    A,
    B,
    C,
    D,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::A, Rating::B, Rating::C, Rating::D];

    /// Single-letter code as stored and transmitted.
    pub fn code(self) -> &'static str {
        match self {
            Rating::A => "A",
            Rating::B => "B",
            Rating::C => "C",
            Rating::D => "D",
        }
    }

    /// Display label shown next to the code.
    pub fn label(self) -> &'static str {
        match self {
            Rating::A | Rating::B => "Cooperating physician",
            Rating::C => "General physician",
            Rating::D => "Non-physician",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Rating {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Rating::A),
            "B" | "b" => Ok(Rating::B),
            "C" | "c" => Ok(Rating::C),
            "D" | "d" => Ok(Rating::D),
            other => Err(CoreError::invalid_rating(other)),
        }
    }
}

// Serialized as the bare code so every format (JSON, MessagePack) sees a string.
impl Serialize for Rating {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Rating::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_code() {
        let mut ratings = vec![Rating::D, Rating::A, Rating::C, Rating::B];
        ratings.sort();
        assert_eq!(ratings, Rating::ALL.to_vec());
        for pair in Rating::ALL.windows(2) {
            assert!(pair[0].code() < pair[1].code());
        }
    }

    #[test]
    fn parse_accepts_lowercase_and_rejects_unknown() {
        assert_eq!("a".parse::<Rating>().unwrap(), Rating::A);
        assert_eq!(" C ".parse::<Rating>().unwrap(), Rating::C);
        assert!("E".parse::<Rating>().is_err());
        assert!("all".parse::<Rating>().is_err());
    }

    #[test]
    fn serializes_as_code() {
        assert_eq!(serde_json::to_string(&Rating::B).unwrap(), "\"B\"");
        let r: Rating = serde_json::from_str("\"D\"").unwrap();
        assert_eq!(r, Rating::D);
    }
}
