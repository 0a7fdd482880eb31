//! Map files on disk: loading, validation errors and full matches.
//!
//! Run with: cargo test cli_maps

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::{Path, PathBuf};

use pursuit::game::TemplateCell;
use pursuit::tournament::{run_match, run_series};
use pursuit::{ConfigError, MapTemplate, Role};

fn write_map(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn arena() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("maps/arena.json")
}

#[test]
fn test_arena_map_loads() {
    let template = MapTemplate::load(&arena()).unwrap();
    assert_eq!(template.conf.width, 15);
    assert_eq!(template.conf.height, 12);
    assert_eq!(template.spawn_count(Role::Attacker), 2);
    assert_eq!(template.spawn_count(Role::Defender), 3);
    assert_eq!(template.count(|c| matches!(c, TemplateCell::Wall)), 20);
    assert_eq!(template.count(|c| matches!(c, TemplateCell::Portal { .. })), 4);
    assert_eq!(template.count(|c| matches!(c, TemplateCell::Powerup)), 6);
    assert_eq!(template.count(|c| matches!(c, TemplateCell::Coin)), 24);
    assert_eq!(template.powerups.extra_vision(), Some(6));
}

#[test]
fn test_arena_match_is_reproducible() {
    let template = MapTemplate::load(&arena()).unwrap();
    let a = run_match(&template, ["greedy", "random"], 2024).unwrap();
    let b = run_match(&template, ["greedy", "random"], 2024).unwrap();
    assert_eq!(a.totals, b.totals);
    assert_eq!(a.winner, b.winner);
    for round in &a.rounds {
        assert!(round.steps <= 1152);
    }
}

#[test]
fn test_arena_series() {
    let template = MapTemplate::load(&arena()).unwrap();
    let stats = run_series(&template, ["greedy", "stay"], 4, 7, |_| {}).unwrap();
    assert_eq!(stats.games_played, 4);
    assert_eq!(stats.wins[0] + stats.wins[1] + stats.draws, 4);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = MapTemplate::load(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

fn load_err(dir: &Path, name: &str, contents: &str) -> ConfigError {
    MapTemplate::load(&write_map(dir, name, contents)).unwrap_err()
}

#[test]
fn test_malformed_maps_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let dir = dir.path();
    let conf = r#""map_conf": {"width": 5, "height": 5, "coin_score": 10,
        "invulnerability_duration": 3, "max_steps": 50, "vision_range": 2}"#;
    let spawns = r#"{"x": 0, "y": 0, "type": "ATTACKER"}, {"x": 4, "y": 4, "type": "DEFENDER"}"#;

    let err = load_err(dir, "truncated.json", "{");
    assert!(matches!(err, ConfigError::Json(_)));

    let err = load_err(dir, "no_conf.json", &format!(r#"{{"map": [{spawns}]}}"#));
    assert!(matches!(err, ConfigError::Json(_)));

    let err = load_err(
        dir,
        "unknown_type.json",
        &format!(r#"{{{conf}, "map": [{spawns}, {{"x": 1, "y": 1, "type": "LAVA"}}]}}"#),
    );
    assert!(matches!(err, ConfigError::Json(_)));

    let err = load_err(
        dir,
        "outside.json",
        &format!(r#"{{{conf}, "map": [{spawns}, {{"x": 5, "y": 1, "type": "COIN"}}]}}"#),
    );
    assert_eq!(err, ConfigError::CellOutOfBounds { x: 5, y: 1 });

    let err = load_err(
        dir,
        "unpaired.json",
        &format!(r#"{{{conf}, "map": [{spawns}, {{"x": 1, "y": 1, "type": "PORTAL", "name": "A"}}]}}"#),
    );
    assert_eq!(err, ConfigError::MissingPortalPair { x: 1, y: 1 });

    let err = load_err(
        dir,
        "far_pair.json",
        &format!(
            r#"{{{conf}, "map": [{spawns}, {{"x": 1, "y": 1, "type": "PORTAL", "pair": {{"x": 9, "y": 9}}}}]}}"#
        ),
    );
    assert_eq!(err, ConfigError::PortalPairOutOfBounds { x: 9, y: 9 });

    let err = load_err(
        dir,
        "no_defender.json",
        &format!(r#"{{{conf}, "map": [{{"x": 0, "y": 0, "type": "ATTACKER"}}]}}"#),
    );
    assert_eq!(err, ConfigError::NoAgents { role: "DEFENDER" });

    let err = load_err(
        dir,
        "no_extra.json",
        &format!(r#"{{{conf}, "powerup_conf": {{"extravision": {{"duration": 3}}}}, "map": [{spawns}]}}"#),
    );
    assert_eq!(err, ConfigError::MissingExtraVision);

    let err = load_err(
        dir,
        "flat.json",
        r#"{"map_conf": {"width": 0, "height": 5, "coin_score": 1,
            "invulnerability_duration": 1, "max_steps": 1, "vision_range": 1}, "map": []}"#,
    );
    assert_eq!(err, ConfigError::EmptyBoard { width: 0, height: 5 });
}

#[test]
fn test_duplicate_positions_keep_last_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_map(
        dir.path(),
        "dup.json",
        r#"{
            "map_conf": {"width": 4, "height": 4, "coin_score": 10,
                         "invulnerability_duration": 3, "max_steps": 20, "vision_range": 2},
            "map": [
                {"x": 0, "y": 0, "type": "ATTACKER"},
                {"x": 2, "y": 2, "type": "WALL"},
                {"x": 3, "y": 3, "type": "DEFENDER"},
                {"x": 2, "y": 2, "type": "COIN"}
            ]
        }"#,
    );
    let template = MapTemplate::load(&path).unwrap();
    let cells: Vec<_> = template.cells().iter().map(|(_, c)| c.clone()).collect();
    assert_eq!(
        cells,
        vec![
            TemplateCell::Spawn(Role::Attacker),
            TemplateCell::Coin,
            TemplateCell::Spawn(Role::Defender),
        ]
    );
}

#[test]
fn test_refresh_interval_defaults_to_off() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_map(
        dir.path(),
        "plain.json",
        r#"{
            "map_conf": {"width": 3, "height": 3, "coin_score": 5,
                         "invulnerability_duration": 2, "max_steps": 9, "vision_range": 1},
            "map": [
                {"x": 0, "y": 0, "type": "ATTACKER"},
                {"x": 2, "y": 2, "type": "DEFENDER"},
                {"x": 1, "y": 1, "type": "COIN"}
            ]
        }"#,
    );
    let template = MapTemplate::load(&path).unwrap();
    assert_eq!(template.conf.refresh_interval, 0);
    assert_eq!(template.powerups.duration(pursuit::PowerupKind::Sword), None);

    let outcome = run_match(&template, ["stay", "stay"], 0).unwrap();
    assert_eq!(outcome.rounds[0].steps, 9);
}
