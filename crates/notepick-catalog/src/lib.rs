// Copyright 2026 The notepick authors
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use notepick_app::{Catalog, CollectionGroup, NoteCollection};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const APP_NAME: &str = "notepick";
pub const CATALOG_FILE_VERSION: u64 = 1;

const OCTAVE_SEMITONES: u8 = 12;

/// On-disk catalog document. Collections may omit `pattern_short`; it is
/// derived from `pattern` on load.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    version: u64,
    groups: Vec<GroupEntry>,
}

#[derive(Debug, Deserialize)]
struct GroupEntry {
    key: String,
    display_name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    collections: Vec<CollectionEntry>,
}

#[derive(Debug, Deserialize)]
struct CollectionEntry {
    key: String,
    primary_name: String,
    #[serde(default)]
    names: Vec<String>,
    #[serde(default)]
    intervals: Vec<String>,
    #[serde(default)]
    kind: Vec<String>,
    #[serde(default)]
    characteristics: Vec<String>,
    #[serde(default)]
    pattern: Vec<u8>,
    #[serde(default)]
    pattern_short: Vec<u8>,
}

/// Catalog paths are plain filesystem paths. URI forms and query strings
/// are rejected up front so a typo fails loudly instead of creating a
/// strangely named file.
pub fn validate_catalog_path(raw: &str) -> Result<()> {
    if raw.is_empty() {
        bail!("catalog path is empty");
    }
    if raw.contains("://") || raw.starts_with("file:") {
        bail!("catalog path {raw:?} looks like a URI; pass a plain file path");
    }
    if raw.contains('?') {
        bail!("catalog path {raw:?} contains a query string; pass a plain file path");
    }
    Ok(())
}

/// Load and validate a catalog from a TOML file.
pub fn load_path(path: &Path) -> Result<Catalog> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read catalog file {}", path.display()))?;
    let file: CatalogFile = toml::from_str(&raw)
        .with_context(|| format!("parse catalog file {}", path.display()))?;
    if file.version != CATALOG_FILE_VERSION {
        bail!(
            "catalog file {} has version {}, expected {CATALOG_FILE_VERSION}",
            path.display(),
            file.version
        );
    }

    let groups = file
        .groups
        .into_iter()
        .map(|group| {
            let collections = group
                .collections
                .into_iter()
                .map(resolve_entry)
                .collect::<Result<Vec<_>>>()?;
            Ok(CollectionGroup {
                key: group.key,
                display_name: group.display_name,
                description: group.description,
                collections,
            })
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("invalid catalog file {}", path.display()))?;
    Catalog::new(groups).with_context(|| format!("invalid catalog file {}", path.display()))
}

fn resolve_entry(entry: CollectionEntry) -> Result<NoteCollection> {
    if entry.pattern.windows(2).any(|pair| pair[1] <= pair[0]) {
        bail!(
            "collection {:?} pattern must be strictly increasing semitone offsets",
            entry.key
        );
    }
    if entry
        .pattern
        .iter()
        .any(|offset| *offset >= OCTAVE_SEMITONES)
    {
        bail!(
            "collection {:?} pattern offsets must stay below {OCTAVE_SEMITONES} semitones",
            entry.key
        );
    }

    let pattern_short = if entry.pattern_short.is_empty() && entry.pattern.len() > 1 {
        derive_steps(&entry.pattern)
    } else {
        entry.pattern_short
    };
    let names = if entry.names.is_empty() {
        vec![entry.primary_name.clone()]
    } else {
        entry.names
    };
    Ok(NoteCollection {
        key: entry.key,
        primary_name: entry.primary_name,
        names,
        intervals: entry.intervals,
        kind: entry.kind,
        characteristics: entry.characteristics,
        pattern: entry.pattern,
        pattern_short,
    })
}

/// Step sizes between adjacent degrees, closed back to the octave: the
/// Ionian offsets `0 2 4 5 7 9 11` become `2 2 1 2 2 2 1`. Callers
/// guarantee the offsets are strictly increasing and below an octave.
fn derive_steps(pattern: &[u8]) -> Vec<u8> {
    if pattern.len() < 2 {
        return Vec::new();
    }
    let mut steps: Vec<u8> = pattern.windows(2).map(|pair| pair[1] - pair[0]).collect();
    steps.push(OCTAVE_SEMITONES - pattern[pattern.len() - 1]);
    steps
}

struct Entry {
    key: &'static str,
    name: &'static str,
    names: &'static [&'static str],
    intervals: &'static [&'static str],
    kind: &'static [&'static str],
    characteristics: &'static [&'static str],
    pattern: &'static [u8],
}

fn build(entry: Entry) -> NoteCollection {
    let mut names: Vec<String> = vec![entry.name.to_owned()];
    names.extend(entry.names.iter().map(|n| (*n).to_owned()));
    NoteCollection {
        key: entry.key.to_owned(),
        primary_name: entry.name.to_owned(),
        names,
        intervals: entry.intervals.iter().map(|i| (*i).to_owned()).collect(),
        kind: entry.kind.iter().map(|k| (*k).to_owned()).collect(),
        characteristics: entry
            .characteristics
            .iter()
            .map(|c| (*c).to_owned())
            .collect(),
        pattern: entry.pattern.to_vec(),
        pattern_short: derive_steps(entry.pattern),
    }
}

/// The built-in catalog shipped with the binary: diatonic modes,
/// pentatonic and blues scales, symmetric scales, and common chords.
pub fn builtin() -> Catalog {
    let diatonic_modes = CollectionGroup {
        key: "diatonic_modes".to_owned(),
        display_name: "Diatonic Modes".to_owned(),
        description: "The seven modes of the major scale".to_owned(),
        collections: vec![
            build(Entry {
                key: "ionian",
                name: "Ionian",
                names: &["Major Scale"],
                intervals: &["1", "2", "3", "4", "5", "6", "7"],
                kind: &["mode", "major"],
                characteristics: &["bright", "resolved"],
                pattern: &[0, 2, 4, 5, 7, 9, 11],
            }),
            build(Entry {
                key: "dorian",
                name: "Dorian",
                names: &[],
                intervals: &["1", "2", "b3", "4", "5", "6", "b7"],
                kind: &["mode", "minor"],
                characteristics: &["jazzy", "hopeful minor"],
                pattern: &[0, 2, 3, 5, 7, 9, 10],
            }),
            build(Entry {
                key: "phrygian",
                name: "Phrygian",
                names: &[],
                intervals: &["1", "b2", "b3", "4", "5", "b6", "b7"],
                kind: &["mode", "minor"],
                characteristics: &["dark", "spanish"],
                pattern: &[0, 1, 3, 5, 7, 8, 10],
            }),
            build(Entry {
                key: "lydian",
                name: "Lydian",
                names: &[],
                intervals: &["1", "2", "3", "#4", "5", "6", "7"],
                kind: &["mode", "major"],
                characteristics: &["floating", "dreamy"],
                pattern: &[0, 2, 4, 6, 7, 9, 11],
            }),
            build(Entry {
                key: "mixolydian",
                name: "Mixolydian",
                names: &["Dominant Scale"],
                intervals: &["1", "2", "3", "4", "5", "6", "b7"],
                kind: &["mode", "major"],
                characteristics: &["bluesy major", "unresolved"],
                pattern: &[0, 2, 4, 5, 7, 9, 10],
            }),
            build(Entry {
                key: "aeolian",
                name: "Aeolian",
                names: &["Natural Minor Scale"],
                intervals: &["1", "2", "b3", "4", "5", "b6", "b7"],
                kind: &["mode", "minor"],
                characteristics: &["melancholic"],
                pattern: &[0, 2, 3, 5, 7, 8, 10],
            }),
            build(Entry {
                key: "locrian",
                name: "Locrian",
                names: &[],
                intervals: &["1", "b2", "b3", "4", "b5", "b6", "b7"],
                kind: &["mode", "diminished"],
                characteristics: &["unstable", "tense"],
                pattern: &[0, 1, 3, 5, 6, 8, 10],
            }),
        ],
    };

    let pentatonic_blues = CollectionGroup {
        key: "pentatonic_blues".to_owned(),
        display_name: "Pentatonic & Blues".to_owned(),
        description: "Five- and six-note scales from folk and blues traditions".to_owned(),
        collections: vec![
            build(Entry {
                key: "major_pentatonic",
                name: "Major Pentatonic",
                names: &[],
                intervals: &["1", "2", "3", "5", "6"],
                kind: &["pentatonic", "major"],
                characteristics: &["open", "folk"],
                pattern: &[0, 2, 4, 7, 9],
            }),
            build(Entry {
                key: "minor_pentatonic",
                name: "Minor Pentatonic",
                names: &[],
                intervals: &["1", "b3", "4", "5", "b7"],
                kind: &["pentatonic", "minor"],
                characteristics: &["rock", "bluesy"],
                pattern: &[0, 3, 5, 7, 10],
            }),
            build(Entry {
                key: "blues_minor",
                name: "Minor Blues",
                names: &["Blues Scale"],
                intervals: &["1", "b3", "4", "b5", "5", "b7"],
                kind: &["blues", "minor"],
                characteristics: &["gritty"],
                pattern: &[0, 3, 5, 6, 7, 10],
            }),
            build(Entry {
                key: "blues_major",
                name: "Major Blues",
                names: &[],
                intervals: &["1", "2", "b3", "3", "5", "6"],
                kind: &["blues", "major"],
                characteristics: &["playful"],
                pattern: &[0, 2, 3, 4, 7, 9],
            }),
        ],
    };

    let symmetric = CollectionGroup {
        key: "symmetric".to_owned(),
        display_name: "Symmetric Scales".to_owned(),
        description: "Scales built from a repeating interval cell".to_owned(),
        collections: vec![
            build(Entry {
                key: "chromatic",
                name: "Chromatic",
                names: &[],
                intervals: &[
                    "1", "b2", "2", "b3", "3", "4", "b5", "5", "b6", "6", "b7", "7",
                ],
                kind: &["symmetric"],
                characteristics: &["total"],
                pattern: &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
            }),
            build(Entry {
                key: "whole_tone",
                name: "Whole Tone",
                names: &[],
                intervals: &["1", "2", "3", "#4", "#5", "b7"],
                kind: &["symmetric"],
                characteristics: &["weightless", "ambiguous"],
                pattern: &[0, 2, 4, 6, 8, 10],
            }),
            build(Entry {
                key: "diminished_half_whole",
                name: "Half-Whole Diminished",
                names: &["Dominant Diminished"],
                intervals: &["1", "b2", "b3", "3", "#4", "5", "6", "b7"],
                kind: &["symmetric", "diminished"],
                characteristics: &["tense", "jazzy"],
                pattern: &[0, 1, 3, 4, 6, 7, 9, 10],
            }),
            build(Entry {
                key: "diminished_whole_half",
                name: "Whole-Half Diminished",
                names: &[],
                intervals: &["1", "2", "b3", "4", "b5", "b6", "6", "7"],
                kind: &["symmetric", "diminished"],
                characteristics: &["tense"],
                pattern: &[0, 2, 3, 5, 6, 8, 9, 11],
            }),
            build(Entry {
                key: "augmented",
                name: "Augmented",
                names: &[],
                intervals: &["1", "b3", "3", "5", "#5", "7"],
                kind: &["symmetric", "augmented"],
                characteristics: &["uncanny"],
                pattern: &[0, 3, 4, 7, 8, 11],
            }),
        ],
    };

    let chords = CollectionGroup {
        key: "triads_sevenths".to_owned(),
        display_name: "Triads & Sevenths".to_owned(),
        description: "Common chord structures as note collections".to_owned(),
        collections: vec![
            build(Entry {
                key: "major_triad",
                name: "Major Triad",
                names: &[],
                intervals: &["1", "3", "5"],
                kind: &["chord", "major"],
                characteristics: &["stable"],
                pattern: &[0, 4, 7],
            }),
            build(Entry {
                key: "minor_triad",
                name: "Minor Triad",
                names: &[],
                intervals: &["1", "b3", "5"],
                kind: &["chord", "minor"],
                characteristics: &["stable", "somber"],
                pattern: &[0, 3, 7],
            }),
            build(Entry {
                key: "diminished_triad",
                name: "Diminished Triad",
                names: &[],
                intervals: &["1", "b3", "b5"],
                kind: &["chord", "diminished"],
                characteristics: &["unstable"],
                pattern: &[0, 3, 6],
            }),
            build(Entry {
                key: "augmented_triad",
                name: "Augmented Triad",
                names: &[],
                intervals: &["1", "3", "#5"],
                kind: &["chord", "augmented"],
                characteristics: &["unresolved"],
                pattern: &[0, 4, 8],
            }),
            build(Entry {
                key: "major_seventh",
                name: "Major Seventh",
                names: &["maj7"],
                intervals: &["1", "3", "5", "7"],
                kind: &["chord", "major"],
                characteristics: &["lush"],
                pattern: &[0, 4, 7, 11],
            }),
            build(Entry {
                key: "dominant_seventh",
                name: "Dominant Seventh",
                names: &["7"],
                intervals: &["1", "3", "5", "b7"],
                kind: &["chord", "dominant"],
                characteristics: &["driving"],
                pattern: &[0, 4, 7, 10],
            }),
            build(Entry {
                key: "minor_seventh",
                name: "Minor Seventh",
                names: &["m7"],
                intervals: &["1", "b3", "5", "b7"],
                kind: &["chord", "minor"],
                characteristics: &["mellow"],
                pattern: &[0, 3, 7, 10],
            }),
            build(Entry {
                key: "half_diminished_seventh",
                name: "Half-Diminished Seventh",
                names: &["m7b5"],
                intervals: &["1", "b3", "b5", "b7"],
                kind: &["chord", "diminished"],
                characteristics: &["yearning"],
                pattern: &[0, 3, 6, 10],
            }),
            build(Entry {
                key: "diminished_seventh",
                name: "Diminished Seventh",
                names: &["dim7"],
                intervals: &["1", "b3", "b5", "bb7"],
                kind: &["chord", "diminished"],
                characteristics: &["restless"],
                pattern: &[0, 3, 6, 9],
            }),
        ],
    };

    Catalog::new(vec![diatonic_modes, pentatonic_blues, symmetric, chords])
        .expect("built-in catalog is valid")
}

#[cfg(test)]
mod tests {
    use super::{builtin, derive_steps};

    #[test]
    fn builtin_is_well_formed() {
        let catalog = builtin();
        assert_eq!(catalog.groups().len(), 4);
        assert!(catalog.len() >= 20);
        assert!(catalog.contains("ionian"));
        assert!(catalog.contains("blues_minor"));
        assert!(catalog.contains("whole_tone"));
        assert!(catalog.contains("dominant_seventh"));
    }

    #[test]
    fn builtin_patterns_start_at_root() {
        let catalog = builtin();
        for group in catalog.groups() {
            for collection in &group.collections {
                assert_eq!(
                    collection.pattern.first(),
                    Some(&0),
                    "collection {} must start at the root",
                    collection.key
                );
                assert_eq!(
                    collection.pattern_short.len(),
                    collection.pattern.len(),
                    "collection {} step list must match its pattern",
                    collection.key
                );
                assert_eq!(
                    collection
                        .pattern_short
                        .iter()
                        .map(|step| u32::from(*step))
                        .sum::<u32>(),
                    12,
                    "collection {} steps must close the octave",
                    collection.key
                );
            }
        }
    }

    #[test]
    fn ionian_steps_follow_the_major_scale() {
        let catalog = builtin();
        let ionian = catalog.get("ionian").expect("ionian exists");
        assert_eq!(ionian.pattern_short, vec![2, 2, 1, 2, 2, 2, 1]);
        assert!(ionian.names.iter().any(|n| n == "Major Scale"));
    }

    #[test]
    fn derive_steps_closes_the_octave() {
        assert_eq!(
            derive_steps(&[0, 2, 4, 5, 7, 9, 11]),
            vec![2, 2, 1, 2, 2, 2, 1]
        );
        assert_eq!(derive_steps(&[0, 4, 7]), vec![4, 3, 5]);
    }

    #[test]
    fn derive_steps_handles_short_patterns() {
        assert_eq!(derive_steps(&[]), Vec::<u8>::new());
        assert_eq!(derive_steps(&[0]), Vec::<u8>::new());
    }
}
