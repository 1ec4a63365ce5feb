// Copyright 2026 The notepick authors
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One selectable catalog entry: a named collection of notes such as a
/// scale, mode, or chord definition.
///
/// `pattern` is the ordered set of semitone offsets from the root
/// (Ionian: `0 2 4 5 7 9 11`); `pattern_short` is the ordered step sizes
/// between adjacent degrees (Ionian: `2 2 1 2 2 2 1`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteCollection {
    pub key: String,
    pub primary_name: String,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub intervals: Vec<String>,
    #[serde(default)]
    pub kind: Vec<String>,
    #[serde(default)]
    pub characteristics: Vec<String>,
    #[serde(default)]
    pub pattern: Vec<u8>,
    #[serde(default)]
    pub pattern_short: Vec<u8>,
}

/// A named, ordered subset of collections with display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionGroup {
    pub key: String,
    pub display_name: String,
    pub description: String,
    pub collections: Vec<NoteCollection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    NoGroups,
    EmptyGroup(String),
    EmptyGroupKey,
    EmptyCollectionKey(String),
    DuplicateGroupKey(String),
    DuplicateCollectionKey(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoGroups => f.write_str("catalog has no groups"),
            Self::EmptyGroup(group) => write!(f, "group {group:?} has no collections"),
            Self::EmptyGroupKey => f.write_str("group with empty key"),
            Self::EmptyCollectionKey(group) => {
                write!(f, "group {group:?} contains a collection with an empty key")
            }
            Self::DuplicateGroupKey(key) => write!(f, "duplicate group key {key:?}"),
            Self::DuplicateCollectionKey(key) => {
                write!(f, "duplicate collection key {key:?}")
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// The immutable grouped catalog: groups in display order plus a flat
/// key lookup covering every collection.
///
/// Built once by the data source, shared read-only, and never mutated;
/// selector instances borrow it for key resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    groups: Vec<CollectionGroup>,
    // collection key -> (group index, collection index within the group)
    index: BTreeMap<String, (usize, usize)>,
}

impl Catalog {
    /// Index the supplied groups, validating catalog invariants: at least
    /// one non-empty group, non-empty keys, group keys unique, collection
    /// keys unique across the whole catalog.
    pub fn new(groups: Vec<CollectionGroup>) -> Result<Self, CatalogError> {
        if groups.is_empty() {
            return Err(CatalogError::NoGroups);
        }

        let mut group_keys = BTreeMap::new();
        let mut index = BTreeMap::new();
        for (group_position, group) in groups.iter().enumerate() {
            if group.key.is_empty() {
                return Err(CatalogError::EmptyGroupKey);
            }
            if group_keys.insert(group.key.clone(), group_position).is_some() {
                return Err(CatalogError::DuplicateGroupKey(group.key.clone()));
            }
            if group.collections.is_empty() {
                return Err(CatalogError::EmptyGroup(group.key.clone()));
            }
            for (collection_position, collection) in group.collections.iter().enumerate() {
                if collection.key.is_empty() {
                    return Err(CatalogError::EmptyCollectionKey(group.key.clone()));
                }
                let existing = index.insert(
                    collection.key.clone(),
                    (group_position, collection_position),
                );
                if existing.is_some() {
                    return Err(CatalogError::DuplicateCollectionKey(collection.key.clone()));
                }
            }
        }

        Ok(Self { groups, index })
    }

    /// Groups in display order.
    pub fn groups(&self) -> &[CollectionGroup] {
        &self.groups
    }

    /// O(log n) lookup of a collection by key.
    pub fn get(&self, key: &str) -> Option<&NoteCollection> {
        let (group_position, collection_position) = self.index.get(key)?;
        Some(&self.groups[*group_position].collections[*collection_position])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Collection keys in display order (group order, then group-local order).
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .flat_map(|group| group.collections.iter().map(|c| c.key.as_str()))
    }

    /// Total number of collections across all groups.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, CatalogError, CollectionGroup, NoteCollection};

    fn collection(key: &str, name: &str) -> NoteCollection {
        NoteCollection {
            key: key.to_owned(),
            primary_name: name.to_owned(),
            names: vec![name.to_owned()],
            intervals: Vec::new(),
            kind: Vec::new(),
            characteristics: Vec::new(),
            pattern: Vec::new(),
            pattern_short: Vec::new(),
        }
    }

    fn group(key: &str, collections: Vec<NoteCollection>) -> CollectionGroup {
        CollectionGroup {
            key: key.to_owned(),
            display_name: key.to_owned(),
            description: String::new(),
            collections,
        }
    }

    #[test]
    fn indexes_groups_in_order() {
        let catalog = Catalog::new(vec![
            group("modes", vec![collection("ionian", "Ionian")]),
            group("chords", vec![collection("major_triad", "Major Triad")]),
        ])
        .expect("valid catalog");

        assert_eq!(catalog.groups().len(), 2);
        assert_eq!(catalog.groups()[0].key, "modes");
        assert_eq!(catalog.groups()[1].key, "chords");
        assert_eq!(
            catalog.keys().collect::<Vec<_>>(),
            vec!["ionian", "major_triad"]
        );
        assert_eq!(catalog.len(), 2);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn lookup_resolves_across_groups() {
        let catalog = Catalog::new(vec![
            group(
                "modes",
                vec![collection("ionian", "Ionian"), collection("dorian", "Dorian")],
            ),
            group("chords", vec![collection("major_triad", "Major Triad")]),
        ])
        .expect("valid catalog");

        assert_eq!(
            catalog.get("dorian").map(|c| c.primary_name.as_str()),
            Some("Dorian")
        );
        assert_eq!(
            catalog.get("major_triad").map(|c| c.primary_name.as_str()),
            Some("Major Triad")
        );
        assert!(catalog.get("mixolydian").is_none());
        assert!(catalog.contains("ionian"));
        assert!(!catalog.contains(""));
    }

    #[test]
    fn rejects_empty_catalog() {
        assert_eq!(Catalog::new(Vec::new()), Err(CatalogError::NoGroups));
    }

    #[test]
    fn rejects_empty_group() {
        let error = Catalog::new(vec![group("modes", Vec::new())]).expect_err("empty group");
        assert_eq!(error, CatalogError::EmptyGroup("modes".to_owned()));
    }

    #[test]
    fn rejects_empty_keys() {
        let error = Catalog::new(vec![group("", vec![collection("ionian", "Ionian")])])
            .expect_err("empty group key");
        assert_eq!(error, CatalogError::EmptyGroupKey);

        let error = Catalog::new(vec![group("modes", vec![collection("", "Ionian")])])
            .expect_err("empty collection key");
        assert_eq!(error, CatalogError::EmptyCollectionKey("modes".to_owned()));
    }

    #[test]
    fn rejects_duplicate_group_key() {
        let error = Catalog::new(vec![
            group("modes", vec![collection("ionian", "Ionian")]),
            group("modes", vec![collection("dorian", "Dorian")]),
        ])
        .expect_err("duplicate group key");
        assert_eq!(error, CatalogError::DuplicateGroupKey("modes".to_owned()));
    }

    #[test]
    fn rejects_duplicate_collection_key_across_groups() {
        let error = Catalog::new(vec![
            group("modes", vec![collection("ionian", "Ionian")]),
            group("scales", vec![collection("ionian", "Major Scale")]),
        ])
        .expect_err("duplicate collection key");
        assert_eq!(
            error,
            CatalogError::DuplicateCollectionKey("ionian".to_owned())
        );
    }

    #[test]
    fn error_messages_name_the_offender() {
        assert_eq!(
            CatalogError::DuplicateCollectionKey("ionian".to_owned()).to_string(),
            "duplicate collection key \"ionian\""
        );
        assert_eq!(
            CatalogError::EmptyGroup("modes".to_owned()).to_string(),
            "group \"modes\" has no collections"
        );
    }
}
