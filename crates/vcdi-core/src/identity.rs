//! # Identifier Newtypes
//!
//! Validated wrappers for implementation names and capability tags, and the
//! [`TagSet`] used to decide which implementations take part in a matrix.
//!
//! `TagSet` is backed by a `BTreeSet`, so iteration order and the
//! superset query are deterministic regardless of configuration order.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Name of an implementation under test (a matrix column).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImplementationName(String);

impl ImplementationName {
    /// Create a name, rejecting empty or whitespace-only input.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidImplementationName`] for blank names.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.trim().is_empty() {
            return Err(ValidationError::InvalidImplementationName(s));
        }
        Ok(Self(s))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ImplementationName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ImplementationName> for String {
    fn from(name: ImplementationName) -> Self {
        name.0
    }
}

impl fmt::Display for ImplementationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A capability tag declared by an endpoint (e.g. `eddsa-rdfc-2022`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CapabilityTag(String);

impl CapabilityTag {
    /// Create a tag, rejecting empty values and values containing whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTag`] for malformed tags.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.is_empty() || s.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidTag(s));
        }
        Ok(Self(s))
    }

    /// The tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CapabilityTag {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CapabilityTag> for String {
    fn from(tag: CapabilityTag) -> Self {
        tag.0
    }
}

impl fmt::Display for CapabilityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ordered set of capability tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(BTreeSet<CapabilityTag>);

impl TagSet {
    /// An empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tag set from raw strings.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    pub fn parse<I, S>(tags: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        tags.into_iter()
            .map(CapabilityTag::new)
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    /// Add a tag. Returns `false` if it was already present.
    pub fn insert(&mut self, tag: CapabilityTag) -> bool {
        self.0.insert(tag)
    }

    /// Whether `tag` is a member of this set.
    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t.as_str() == tag)
    }

    /// Whether every tag in `required` is also in `self`.
    ///
    /// Every set is a superset of the empty set.
    pub fn is_superset_of(&self, required: &TagSet) -> bool {
        self.0.is_superset(&required.0)
    }

    /// Tags in `required` that `self` lacks, in sorted order.
    pub fn missing_from<'a>(&'a self, required: &'a TagSet) -> Vec<&'a CapabilityTag> {
        required.0.difference(&self.0).collect()
    }

    /// Iterate tags in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &CapabilityTag> {
        self.0.iter()
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<CapabilityTag> for TagSet {
    fn from_iter<T: IntoIterator<Item = CapabilityTag>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.0.iter().map(CapabilityTag::as_str).collect();
        write!(f, "[{}]", joined.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(raw: &[&str]) -> TagSet {
        TagSet::parse(raw.iter().copied()).unwrap()
    }

    #[test]
    fn superset_query_is_order_independent() {
        let declared = tags(&["eddsa-rdfc-2022", "Ed25519", "vc2.0"]);
        let required = tags(&["vc2.0", "eddsa-rdfc-2022"]);
        assert!(declared.is_superset_of(&required));
        assert!(!required.is_superset_of(&declared));
    }

    #[test]
    fn every_set_is_superset_of_empty() {
        assert!(TagSet::new().is_superset_of(&TagSet::new()));
        assert!(tags(&["a"]).is_superset_of(&TagSet::new()));
    }

    #[test]
    fn missing_tags_are_reported_sorted() {
        let declared = tags(&["b"]);
        let required = tags(&["c", "a", "b"]);
        let missing: Vec<&str> = declared
            .missing_from(&required)
            .into_iter()
            .map(CapabilityTag::as_str)
            .collect();
        assert_eq!(missing, vec!["a", "c"]);
    }

    #[test]
    fn tag_rejects_whitespace() {
        assert!(CapabilityTag::new("eddsa rdfc").is_err());
        assert!(CapabilityTag::new("").is_err());
    }

    #[test]
    fn implementation_name_rejects_blank() {
        assert!(ImplementationName::new("   ").is_err());
        assert_eq!(
            ImplementationName::new("Digital Bazaar").unwrap().to_string(),
            "Digital Bazaar"
        );
    }

    #[test]
    fn tag_set_deserializes_from_json_array() {
        let set: TagSet = serde_json::from_str(r#"["vc2.0", "eddsa-rdfc-2022"]"#).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.to_string(), "[eddsa-rdfc-2022, vc2.0]");
        assert!(serde_json::from_str::<TagSet>(r#"["bad tag"]"#).is_err());
    }
}
