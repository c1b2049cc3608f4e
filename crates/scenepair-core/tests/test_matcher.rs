mod common;

use serde_json::json;

use common::{feature, square_polygon};
use scenepair_core::catalog::parse_feature;
use scenepair_core::matcher::{
    check_pair, comparison_count, find_pairs, find_pairs_with, is_pair, Mismatch,
};
use scenepair_core::pipeline::config::MatchConfig;
use scenepair_core::scene::SceneMetadata;

fn scene(id: &str, satellite: &str, strip: &str, acquired: &str, lon: f64) -> SceneMetadata {
    parse_feature(&feature(
        id,
        satellite,
        strip,
        acquired,
        square_polygon(lon, 37.7, 0.1),
    ))
    .unwrap()
}

fn base_pair() -> (SceneMetadata, SceneMetadata) {
    (
        scene("a", "0f02", "123", "2017-03-15T18:34:45.000000Z", -122.50),
        scene("b", "0f02", "123", "2017-03-15T18:34:46.500000Z", -122.45),
    )
}

// ---------------------------------------------------------------------------
// is_pair predicates
// ---------------------------------------------------------------------------

#[test]
fn test_matching_scenes_pair() {
    let (a, b) = base_pair();
    assert!(is_pair(&a, &b));
    assert!(is_pair(&b, &a));
}

#[test]
fn test_satellite_mismatch() {
    let (a, mut b) = base_pair();
    b.satellite_id = "1003".into();
    assert!(!is_pair(&a, &b));
    assert_eq!(check_pair(&a, &b, &MatchConfig::default()), Err(Mismatch::Satellite));
}

#[test]
fn test_strip_mismatch() {
    let (a, mut b) = base_pair();
    b.strip_id = "124".into();
    assert!(!is_pair(&a, &b));
    assert_eq!(check_pair(&a, &b, &MatchConfig::default()), Err(Mismatch::Strip));
}

#[test]
fn test_provider_mismatch() {
    let (a, mut b) = base_pair();
    b.provider = "rapideye".into();
    assert!(!is_pair(&a, &b));
    assert_eq!(check_pair(&a, &b, &MatchConfig::default()), Err(Mismatch::Provider));
}

#[test]
fn test_provider_check_can_be_disabled() {
    let (a, mut b) = base_pair();
    b.provider = "rapideye".into();
    let config = MatchConfig {
        require_provider: false,
        ..Default::default()
    };
    assert_eq!(check_pair(&a, &b, &config), Ok(()));
}

#[test]
fn test_exactly_two_seconds_is_inclusive() {
    let a = scene("a", "0f02", "123", "2017-03-15T18:34:45.000000Z", -122.50);
    let b = scene("b", "0f02", "123", "2017-03-15T18:34:47.000000Z", -122.45);
    assert!(is_pair(&a, &b));
}

#[test]
fn test_just_over_two_seconds_fails() {
    let a = scene("a", "0f02", "123", "2017-03-15T18:34:45.000000Z", -122.50);
    let b = scene("b", "0f02", "123", "2017-03-15T18:34:47.000001Z", -122.45);
    assert!(!is_pair(&a, &b));
    assert!(matches!(
        check_pair(&a, &b, &MatchConfig::default()),
        Err(Mismatch::TimeGap(gap)) if gap > 2.0
    ));
}

#[test]
fn test_time_gap_across_offsets() {
    let a = scene("a", "0f02", "123", "2017-03-15T18:34:45Z", -122.50);
    let b = scene("b", "0f02", "123", "2017-03-15T20:34:46+02:00", -122.45);
    assert!(is_pair(&a, &b));
}

#[test]
fn test_disjoint_footprints() {
    let a = scene("a", "0f02", "123", "2017-03-15T18:34:45Z", -122.50);
    let b = scene("b", "0f02", "123", "2017-03-15T18:34:46Z", -121.00);
    assert_eq!(check_pair(&a, &b, &MatchConfig::default()), Err(Mismatch::Disjoint));
}

#[test]
fn test_touching_footprints_pair() {
    let a = scene("a", "0f02", "123", "2017-03-15T18:34:45Z", -122.5);
    let b = scene("b", "0f02", "123", "2017-03-15T18:34:46Z", -122.4);
    assert!(is_pair(&a, &b));
}

#[test]
fn test_multipolygon_is_non_match() {
    let (a, _) = base_pair();
    let b = parse_feature(&feature(
        "b",
        "0f02",
        "123",
        "2017-03-15T18:34:46Z",
        json!({
            "type": "MultiPolygon",
            "coordinates": [[[[-122.5, 37.7], [-122.4, 37.7], [-122.4, 37.8], [-122.5, 37.7]]]]
        }),
    ))
    .unwrap();
    assert!(!is_pair(&a, &b));
    assert!(!is_pair(&b, &a));
    assert_eq!(
        check_pair(&b, &a, &MatchConfig::default()),
        Err(Mismatch::UnsupportedGeometry("MultiPolygon".into()))
    );
}

// ---------------------------------------------------------------------------
// find_pairs
// ---------------------------------------------------------------------------

#[test]
fn test_find_pairs_empty_and_single() {
    assert!(find_pairs(&[]).is_empty());
    let (a, _) = base_pair();
    assert!(find_pairs(&[a]).is_empty());
}

#[test]
fn test_find_pairs_groups_by_strip() {
    let scenes = vec![
        scene("s1", "0f02", "100", "2017-03-15T18:34:45.0Z", -122.50),
        scene("s2", "0f02", "100", "2017-03-15T18:34:46.0Z", -122.45),
        scene("t1", "0f02", "200", "2017-03-15T18:40:00.0Z", -122.50),
        scene("t2", "0f02", "200", "2017-03-15T18:40:01.5Z", -122.45),
        scene("u1", "1003", "300", "2017-03-15T19:00:00.0Z", -122.50),
    ];
    let pairs = find_pairs(&scenes);
    let ids: Vec<(&str, &str)> = pairs.iter().map(|p| p.ids()).collect();
    assert_eq!(ids, vec![("s1", "s2"), ("t1", "t2")]);
}

#[test]
fn test_find_pairs_never_duplicates() {
    // Three mutually matching scenes produce each combination once.
    let scenes = vec![
        scene("a", "0f02", "1", "2017-03-15T18:34:45.0Z", -122.50),
        scene("b", "0f02", "1", "2017-03-15T18:34:45.5Z", -122.48),
        scene("c", "0f02", "1", "2017-03-15T18:34:46.0Z", -122.46),
    ];
    let pairs = find_pairs(&scenes);
    let ids: Vec<(&str, &str)> = pairs.iter().map(|p| p.ids()).collect();
    assert_eq!(ids, vec![("a", "b"), ("a", "c"), ("b", "c")]);
    assert_eq!(pairs.len(), comparison_count(scenes.len()));
}

#[test]
fn test_find_pairs_with_wider_gap() {
    let scenes = vec![
        scene("a", "0f02", "1", "2017-03-15T18:34:45Z", -122.50),
        scene("b", "0f02", "1", "2017-03-15T18:34:50Z", -122.45),
    ];
    assert!(find_pairs(&scenes).is_empty());
    let config = MatchConfig {
        max_time_gap_secs: 5.0,
        ..Default::default()
    };
    assert_eq!(find_pairs_with(&scenes, &config).len(), 1);
}

#[test]
fn test_comparison_count() {
    assert_eq!(comparison_count(0), 0);
    assert_eq!(comparison_count(1), 0);
    assert_eq!(comparison_count(2), 1);
    assert_eq!(comparison_count(10), 45);
}
