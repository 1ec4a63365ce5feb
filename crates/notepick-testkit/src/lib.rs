// Copyright 2026 The notepick authors
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use notepick_app::{Catalog, CollectionGroup, NoteCollection};
use std::path::PathBuf;

const MODE_NAMES: [&str; 7] = [
    "Ionian",
    "Dorian",
    "Phrygian",
    "Lydian",
    "Mixolydian",
    "Aeolian",
    "Locrian",
];

const KIND_TAGS: [&str; 6] = [
    "major",
    "minor",
    "diminished",
    "pentatonic",
    "symmetric",
    "chord",
];

const CHARACTERISTICS: [&str; 8] = [
    "bright",
    "dark",
    "bluesy",
    "modal",
    "tense",
    "open",
    "floating",
    "grounded",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Deterministic generator of synthetic catalog data. Same seed, same
/// catalog, so test failures reproduce.
#[derive(Debug, Clone)]
pub struct CatalogFaker {
    rng: DeterministicRng,
    seed: u64,
    counter: u64,
}

impl CatalogFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
            counter: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    /// A collection with a unique key and plausible, varied metadata.
    pub fn collection(&mut self) -> NoteCollection {
        self.counter += 1;
        let base = MODE_NAMES[self.rng.int_n(MODE_NAMES.len())];
        let name = format!("{base} {}", self.counter);
        let key = format!("{}_{}", base.to_lowercase(), self.counter);

        let degree_count = 3 + self.rng.int_n(5);
        let mut pattern = vec![0u8];
        let mut offset = 0u8;
        for _ in 1..degree_count {
            offset += 1 + self.rng.int_n(3) as u8;
            if offset >= 12 {
                break;
            }
            pattern.push(offset);
        }
        let pattern_short = octave_steps(&pattern);

        NoteCollection {
            key,
            primary_name: name.clone(),
            names: vec![name],
            intervals: pattern.iter().map(|p| format!("+{p}")).collect(),
            kind: vec![KIND_TAGS[self.rng.int_n(KIND_TAGS.len())].to_owned()],
            characteristics: vec![
                CHARACTERISTICS[self.rng.int_n(CHARACTERISTICS.len())].to_owned(),
            ],
            pattern,
            pattern_short,
        }
    }

    /// A group holding `size` freshly faked collections.
    pub fn group(&mut self, key: &str, size: usize) -> CollectionGroup {
        CollectionGroup {
            key: key.to_owned(),
            display_name: title_case(key),
            description: format!("Generated group {key}"),
            collections: (0..size).map(|_| self.collection()).collect(),
        }
    }

    /// A valid catalog with `groups` groups of `per_group` collections.
    pub fn catalog(&mut self, groups: usize, per_group: usize) -> Catalog {
        let groups = (0..groups)
            .map(|index| self.group(&format!("group_{index}"), per_group))
            .collect();
        Catalog::new(groups).expect("faked catalog is valid")
    }
}

/// Small fixed catalog used across crates: one diatonic-modes group plus
/// one triads group, seven plus two entries.
pub fn sample_catalog() -> Catalog {
    let modes = CollectionGroup {
        key: "diatonic_modes".to_owned(),
        display_name: "Diatonic Modes".to_owned(),
        description: "The seven modes of the major scale".to_owned(),
        collections: vec![
            sample_collection("ionian", "Ionian", &[0, 2, 4, 5, 7, 9, 11]),
            sample_collection("dorian", "Dorian", &[0, 2, 3, 5, 7, 9, 10]),
            sample_collection("phrygian", "Phrygian", &[0, 1, 3, 5, 7, 8, 10]),
            sample_collection("lydian", "Lydian", &[0, 2, 4, 6, 7, 9, 11]),
            sample_collection("mixolydian", "Mixolydian", &[0, 2, 4, 5, 7, 9, 10]),
            sample_collection("aeolian", "Aeolian", &[0, 2, 3, 5, 7, 8, 10]),
            sample_collection("locrian", "Locrian", &[0, 1, 3, 5, 6, 8, 10]),
        ],
    };
    let triads = CollectionGroup {
        key: "triads".to_owned(),
        display_name: "Triads".to_owned(),
        description: "Three-note chords".to_owned(),
        collections: vec![
            sample_collection("major_triad", "Major Triad", &[0, 4, 7]),
            sample_collection("minor_triad", "Minor Triad", &[0, 3, 7]),
        ],
    };
    Catalog::new(vec![modes, triads]).expect("sample catalog is valid")
}

fn sample_collection(key: &str, name: &str, pattern: &[u8]) -> NoteCollection {
    NoteCollection {
        key: key.to_owned(),
        primary_name: name.to_owned(),
        names: vec![name.to_owned()],
        intervals: pattern.iter().map(|p| format!("+{p}")).collect(),
        kind: vec!["sample".to_owned()],
        characteristics: Vec::new(),
        pattern: pattern.to_vec(),
        pattern_short: octave_steps(pattern),
    }
}

/// Step sizes between adjacent offsets, closed back to the octave:
/// `0 2 4 5 7 9 11` becomes `2 2 1 2 2 2 1`.
fn octave_steps(pattern: &[u8]) -> Vec<u8> {
    if pattern.len() < 2 {
        return Vec::new();
    }
    let mut steps: Vec<u8> = pattern.windows(2).map(|pair| pair[1] - pair[0]).collect();
    steps.push(12 - pattern[pattern.len() - 1]);
    steps
}

/// Temp directory plus a catalog file path inside it. Keep the directory
/// alive for as long as the path is used.
pub fn temp_catalog_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let catalog_path = dir.path().join("catalog.toml");
    Ok((dir, catalog_path))
}

fn title_case(raw: &str) -> String {
    raw.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::{CatalogFaker, sample_catalog, title_case};

    #[test]
    fn faker_is_deterministic() {
        let mut first = CatalogFaker::new(11);
        let mut second = CatalogFaker::new(11);
        assert_eq!(first.catalog(2, 4), second.catalog(2, 4));
    }

    #[test]
    fn faked_collections_have_unique_keys() {
        let mut faker = CatalogFaker::new(3);
        let catalog = faker.catalog(3, 5);
        assert_eq!(catalog.len(), 15);
    }

    #[test]
    fn faked_patterns_are_consistent() {
        let mut faker = CatalogFaker::new(5);
        for _ in 0..20 {
            let collection = faker.collection();
            assert_eq!(collection.pattern[0], 0);
            assert_eq!(collection.pattern_short.len(), collection.pattern.len());
            assert_eq!(
                collection
                    .pattern_short
                    .iter()
                    .map(|step| u32::from(*step))
                    .sum::<u32>(),
                12,
                "steps must close the octave"
            );
        }
    }

    #[test]
    fn sample_catalog_covers_both_groups() {
        let catalog = sample_catalog();
        assert_eq!(catalog.groups().len(), 2);
        assert_eq!(catalog.len(), 9);
        assert!(catalog.contains("dorian"));
        assert_eq!(
            catalog.get("major_triad").map(|c| c.pattern.as_slice()),
            Some(&[0, 4, 7][..])
        );
        assert_eq!(
            catalog.get("major_triad").map(|c| c.pattern_short.as_slice()),
            Some(&[4, 3, 5][..])
        );
    }

    #[test]
    fn title_case_handles_underscores() {
        assert_eq!(title_case("diatonic_modes"), "Diatonic Modes");
    }
}
