// Copyright 2026 The notepick authors
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use notepick_catalog::{builtin, load_path, validate_catalog_path};
use std::fs;

#[test]
fn validate_catalog_path_rejects_uri_forms() {
    assert!(validate_catalog_path("file:catalog.toml").is_err());
    assert!(validate_catalog_path("https://example.com/catalog.toml").is_err());
    assert!(validate_catalog_path("catalog.toml?version=1").is_err());
    assert!(validate_catalog_path("").is_err());
    assert!(validate_catalog_path("/tmp/catalog.toml").is_ok());
}

#[test]
fn load_path_round_trips_a_catalog_file() -> Result<()> {
    let (_dir, path) = notepick_testkit::temp_catalog_path()?;
    fs::write(
        &path,
        r#"
version = 1

[[groups]]
key = "modes"
display_name = "Modes"
description = "A couple of modes"

[[groups.collections]]
key = "ionian"
primary_name = "Ionian"
names = ["Ionian", "Major Scale"]
intervals = ["1", "2", "3", "4", "5", "6", "7"]
kind = ["mode"]
pattern = [0, 2, 4, 5, 7, 9, 11]

[[groups.collections]]
key = "dorian"
primary_name = "Dorian"
pattern = [0, 2, 3, 5, 7, 9, 10]
"#,
    )?;

    let catalog = load_path(&path)?;
    assert_eq!(catalog.groups().len(), 1);
    assert_eq!(catalog.len(), 2);

    let ionian = catalog.get("ionian").expect("ionian loads");
    assert_eq!(ionian.pattern_short, vec![2, 2, 1, 2, 2, 2, 1]);

    // names and pattern_short are filled in when omitted
    let dorian = catalog.get("dorian").expect("dorian loads");
    assert_eq!(dorian.names, vec!["Dorian".to_owned()]);
    assert_eq!(dorian.pattern_short, vec![2, 1, 2, 2, 2, 1, 2]);
    Ok(())
}

#[test]
fn load_path_rejects_non_increasing_pattern() -> Result<()> {
    let (_dir, path) = notepick_testkit::temp_catalog_path()?;
    fs::write(
        &path,
        r#"
version = 1

[[groups]]
key = "modes"
display_name = "Modes"

[[groups.collections]]
key = "broken"
primary_name = "Broken"
pattern = [0, 4, 3]
"#,
    )?;

    let error = load_path(&path).expect_err("non-increasing pattern must be rejected");
    assert!(format!("{error:#}").contains("strictly increasing"));
    Ok(())
}

#[test]
fn load_path_rejects_offsets_beyond_the_octave() -> Result<()> {
    let (_dir, path) = notepick_testkit::temp_catalog_path()?;
    fs::write(
        &path,
        r#"
version = 1

[[groups]]
key = "modes"
display_name = "Modes"

[[groups.collections]]
key = "wide"
primary_name = "Wide"
pattern = [0, 4, 12]
"#,
    )?;

    let error = load_path(&path).expect_err("offsets past the octave must be rejected");
    assert!(format!("{error:#}").contains("below 12 semitones"));
    Ok(())
}

#[test]
fn load_path_rejects_wrong_version() -> Result<()> {
    let (_dir, path) = notepick_testkit::temp_catalog_path()?;
    fs::write(
        &path,
        r#"
version = 2

[[groups]]
key = "modes"
display_name = "Modes"

[[groups.collections]]
key = "ionian"
primary_name = "Ionian"
"#,
    )?;

    let error = load_path(&path).expect_err("version 2 must be rejected");
    assert!(error.to_string().contains("version 2"));
    Ok(())
}

#[test]
fn load_path_rejects_duplicate_keys() -> Result<()> {
    let (_dir, path) = notepick_testkit::temp_catalog_path()?;
    fs::write(
        &path,
        r#"
version = 1

[[groups]]
key = "modes"
display_name = "Modes"

[[groups.collections]]
key = "ionian"
primary_name = "Ionian"

[[groups.collections]]
key = "ionian"
primary_name = "Major Scale"
"#,
    )?;

    let error = load_path(&path).expect_err("duplicate key must be rejected");
    assert!(format!("{error:#}").contains("duplicate collection key"));
    Ok(())
}

#[test]
fn load_path_reports_missing_file() {
    let error = load_path(std::path::Path::new("/nonexistent/catalog.toml"))
        .expect_err("missing file must fail");
    assert!(format!("{error:#}").contains("read catalog file"));
}

#[test]
fn builtin_keys_are_stable() {
    let catalog = builtin();
    let keys: Vec<&str> = catalog.keys().collect();

    // display order: modes first, chords last
    assert_eq!(keys.first(), Some(&"ionian"));
    assert_eq!(keys.last(), Some(&"diminished_seventh"));
    assert!(keys.contains(&"minor_pentatonic"));
    assert!(keys.contains(&"chromatic"));
}
