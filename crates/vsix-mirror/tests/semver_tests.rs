//! Integration tests for version parsing and engine-range matching

use vsix_mirror::semver::{EngineRange, Version};

#[test]
fn test_patch_ordering_agrees_with_integers() {
    // Versions differing only in patch order exactly like their patch numbers.
    let low = Version::parse("1.2.3").unwrap();
    let high = Version::parse("1.2.10").unwrap();
    assert!(low < high);
    assert!(Version::parse("1.2.9").unwrap() < high);
}

#[test]
fn test_sorting_picks_expected_latest() {
    let mut versions: Vec<Version> = ["0.9.0", "1.10.0", "1.2.0", "1.9.9"]
        .iter()
        .map(|s| Version::parse(s).unwrap())
        .collect();
    versions.sort();

    assert_eq!(versions.last().unwrap(), &Version::new(1, 10, 0));
}

#[test]
fn test_suffixed_build_sorts_after_bare_release() {
    let mut versions = vec![
        Version::parse("1.2.3-insider").unwrap(),
        Version::parse("1.2.3").unwrap(),
    ];
    versions.sort();

    // The suffixed build is treated as the newer of the two.
    assert_eq!(
        versions.last().unwrap(),
        &Version::new(1, 2, 3).with_suffix("insider")
    );
}

#[test]
fn test_wildcard_always_matches() {
    let range = EngineRange::parse("*").unwrap();
    for engine in ["0.0.1", "1.85.0", "2.0.0"] {
        assert!(range.matches(&Version::parse(engine).unwrap()));
    }
}

#[test]
fn test_missing_caret_never_matches() {
    let range = EngineRange::parse("1.50.0").unwrap();
    assert!(!range.matches(&Version::parse("1.60.0").unwrap()));
    assert!(!range.matches(&Version::parse("1.50.0").unwrap()));
}

#[test]
fn test_caret_matching_table() {
    let cases = [
        ("^1.50.0", "1.60.3", true),
        ("^1.50.0", "1.49.9", false),
        ("^1.50.3", "1.50.2", false),
        ("^1.50.0", "1.50.0", true),
        ("^1.50.3", "1.51.0", true),
        ("^2.0.0", "1.99.0", false),
    ];

    for (pattern, engine, expected) in cases {
        let range = EngineRange::parse(pattern).unwrap();
        let engine = Version::parse(engine).unwrap();
        assert_eq!(
            range.matches(&engine),
            expected,
            "{} against {}",
            pattern,
            engine
        );
    }
}

#[test]
fn test_insiders_floor_is_never_satisfied() {
    let range = EngineRange::parse("^1.70.0-insiders").unwrap();
    assert!(!range.matches(&Version::parse("1.70.0").unwrap()));
    assert!(!range.matches(&Version::parse("1.99.9").unwrap()));
}

#[test]
fn test_malformed_versions_are_rejected() {
    for bad in ["1.2", "1.2.3.4", "one.two.three", ""] {
        assert!(Version::parse(bad).is_err(), "{:?} should not parse", bad);
    }
}
