//! Mapping paths: routes from a root table to a field.
//!
//! A path is a sequence of [`PathToken`]s such as
//! `accessionagents > #1 > agent > lastname` or `$Kingdom > name`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Prefix of a to-many reference marker (`#1`, `#2`, ...).
pub const REFERENCE_SYMBOL: char = '#';
/// Prefix of a tree rank marker (`$Kingdom`).
pub const TREE_SYMBOL: char = '$';
/// Separator used when rendering a path for humans.
pub const LEVEL_SEPARATOR: &str = " > ";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PathToken {
    /// A field or relationship name.
    Name(String),
    /// The n-th element of a to-many relationship, 1-based.
    Reference(u32),
    /// A level of a tree table.
    TreeRank(String),
}

impl PathToken {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn rank(rank: impl Into<String>) -> Self {
        Self::TreeRank(rank.into())
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_))
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for PathToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Reference(index) => write!(f, "{REFERENCE_SYMBOL}{index}"),
            Self::TreeRank(rank) => write!(f, "{TREE_SYMBOL}{rank}"),
        }
    }
}

impl FromStr for PathToken {
    type Err = ModelError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidPathToken(raw.to_string());
        if let Some(index) = raw.strip_prefix(REFERENCE_SYMBOL) {
            let index: u32 = index.parse().map_err(|_| invalid())?;
            if index == 0 {
                return Err(invalid());
            }
            return Ok(Self::Reference(index));
        }
        if let Some(rank) = raw.strip_prefix(TREE_SYMBOL) {
            if rank.is_empty() {
                return Err(invalid());
            }
            return Ok(Self::TreeRank(rank.to_string()));
        }
        if raw.trim().is_empty() {
            return Err(invalid());
        }
        Ok(Self::Name(raw.to_string()))
    }
}

impl TryFrom<String> for PathToken {
    type Error = ModelError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<PathToken> for String {
    fn from(token: PathToken) -> Self {
        token.to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingPath(Vec<PathToken>);

impl MappingPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens(&self) -> &[PathToken] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&PathToken> {
        self.0.last()
    }

    pub fn push(&mut self, token: PathToken) {
        self.0.push(token);
    }

    /// Returns a new path with `suffix` appended.
    pub fn joined(&self, suffix: &[PathToken]) -> Self {
        let mut tokens = Vec::with_capacity(self.0.len() + suffix.len());
        tokens.extend_from_slice(&self.0);
        tokens.extend_from_slice(suffix);
        Self(tokens)
    }

    /// Returns a new path with `token` appended.
    pub fn child(&self, token: PathToken) -> Self {
        self.joined(std::slice::from_ref(&token))
    }

    /// Name tokens and rank markers only, reference markers dropped.
    pub fn without_references(&self) -> impl Iterator<Item = &PathToken> {
        self.0.iter().filter(|t| !t.is_reference())
    }

    /// Overwrites the rightmost reference marker. Returns false if the path
    /// has none.
    pub fn set_last_reference(&mut self, index: u32) -> bool {
        match self.0.iter_mut().rev().find(|t| t.is_reference()) {
            Some(token) => {
                *token = PathToken::Reference(index);
                true
            }
            None => false,
        }
    }

    /// Increments the rightmost reference marker at position `floor` or later.
    ///
    /// Returns false when no such marker exists or its index already reached
    /// `ceiling`.
    pub fn bump_reference(&mut self, floor: usize, ceiling: u32) -> bool {
        let found = self
            .0
            .iter_mut()
            .enumerate()
            .rev()
            .take_while(|(position, _)| *position >= floor)
            .find_map(|(_, token)| match token {
                PathToken::Reference(index) => Some(index),
                _ => None,
            });
        match found {
            Some(index) if *index < ceiling => {
                *index += 1;
                true
            }
            _ => false,
        }
    }

    /// True when a to-many element sits directly inside another one: two
    /// reference markers separated by at most one other token.
    pub fn has_nested_to_many(&self) -> bool {
        let mut since_reference: Option<usize> = None;
        for token in &self.0 {
            if token.is_reference() {
                if since_reference.is_some_and(|gap| gap <= 1) {
                    return true;
                }
                since_reference = Some(0);
            } else if let Some(gap) = since_reference.as_mut() {
                *gap += 1;
            }
        }
        false
    }
}

impl fmt::Display for MappingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, token) in self.0.iter().enumerate() {
            if position > 0 {
                f.write_str(LEVEL_SEPARATOR)?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

impl FromStr for MappingPath {
    type Err = ModelError;

    /// Parses `a > #1 > b` (the [`fmt::Display`] form). An empty string is
    /// the empty path.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.split('>')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl From<Vec<PathToken>> for MappingPath {
    fn from(tokens: Vec<PathToken>) -> Self {
        Self(tokens)
    }
}

impl FromIterator<PathToken> for MappingPath {
    fn from_iter<I: IntoIterator<Item = PathToken>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a MappingPath {
    type Item = &'a PathToken;
    type IntoIter = std::slice::Iter<'a, PathToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(raw: &str) -> MappingPath {
        raw.parse().unwrap()
    }

    #[test]
    fn parses_tokens() {
        assert_eq!("#3".parse::<PathToken>().unwrap(), PathToken::Reference(3));
        assert_eq!(
            "$Kingdom".parse::<PathToken>().unwrap(),
            PathToken::rank("Kingdom")
        );
        assert_eq!(
            "remarks".parse::<PathToken>().unwrap(),
            PathToken::name("remarks")
        );
        assert!("#0".parse::<PathToken>().is_err());
        assert!("#x".parse::<PathToken>().is_err());
        assert!("$".parse::<PathToken>().is_err());
    }

    #[test]
    fn display_round_trips() {
        let p = path("accessionagents > #1 > agent > lastname");
        assert_eq!(p.to_string(), "accessionagents > #1 > agent > lastname");
        assert_eq!(p.len(), 4);
    }

    #[test]
    fn set_last_reference_touches_rightmost_only() {
        let mut p = path("a > #1 > b > c > #1 > d");
        assert!(p.set_last_reference(4));
        assert_eq!(p, path("a > #1 > b > c > #4 > d"));
        let mut plain = path("a > b");
        assert!(!plain.set_last_reference(2));
    }

    #[test]
    fn bump_respects_floor() {
        let mut p = path("a > #1 > b > c > #1 > d");
        assert!(p.bump_reference(0, 1024));
        assert_eq!(p, path("a > #1 > b > c > #2 > d"));

        let mut only_prefix = path("a > #1 > b");
        assert!(!only_prefix.bump_reference(2, 1024));
        assert!(only_prefix.bump_reference(1, 1024));
        assert_eq!(only_prefix, path("a > #2 > b"));
    }

    #[test]
    fn bump_stops_at_ceiling() {
        let mut p = path("a > #3 > b");
        assert!(!p.bump_reference(0, 3));
    }

    #[test]
    fn nested_to_many_detection() {
        assert!(path("a > #1 > #2 > b").has_nested_to_many());
        assert!(path("a > #1 > b > #1 > c").has_nested_to_many());
        assert!(!path("a > #1 > b > c > #1 > d").has_nested_to_many());
        assert!(!path("a > #1 > b").has_nested_to_many());
        assert!(!path("$Kingdom > name").has_nested_to_many());
    }

    #[test]
    fn serializes_as_string_list() {
        let p = path("accessionagents > #2 > remarks");
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r##"["accessionagents","#2","remarks"]"##);
        let back: MappingPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
