//! Integration tests for configuration management

use delay_atlas::config::{Config, ConfigOverrides};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a temporary config directory
fn setup_temp_config() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_file = temp_dir.path().join("delayatlas").join("config.toml");
    (temp_dir, config_file)
}

#[test]
fn test_config_from_defaults() {
    let config = Config::from_defaults();

    assert!(
        !config.logging.level.is_empty(),
        "Default log level should not be empty"
    );
    assert_eq!(config.paths.flights_file, "Train_with_Countries.csv");
    assert_eq!(config.paths.airports_file, "airports.dat");
    assert_eq!(config.git.remote, "origin");
    assert_eq!(config.git.branch, "main");

    let window = config.delay_window();
    assert!((window.min - 15.0).abs() < f64::EPSILON);
    assert!((window.max - 500.0).abs() < f64::EPSILON);
}

#[test]
fn test_config_from_toml_basic() {
    let toml_str = r#"
[logging]
level = "info"
file = "/tmp/test.log"
verbose = true

[paths]
flights_file = "data/flights.csv"
airports_file = "data/airports.dat"
out_dir = "site"

[filter]
min_delay = 30.0
max_delay = 240.0

[git]
remote = "upstream"
branch = "gh-pages"
push = false
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file, "/tmp/test.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.flights_file, "data/flights.csv");
    assert_eq!(config.paths.out_dir, "site");
    assert!((config.filter.min_delay - 30.0).abs() < f64::EPSILON);
    assert_eq!(config.git.remote, "upstream");
    assert_eq!(config.git.branch, "gh-pages");
    assert!(!config.git.push);
    assert_eq!(
        config.output_path("chart.html"),
        PathBuf::from("site").join("chart.html")
    );
}

#[test]
fn test_config_from_toml_partial() {
    // Missing sections and fields fall back to serde defaults
    let toml_str = r#"
[logging]
level = "error"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse partial TOML");

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "");
    assert!(!config.logging.verbose);
    assert_eq!(config.paths.flights_file, "");
    assert!((config.filter.max_delay - 500.0).abs() < f64::EPSILON);
}

#[test]
fn test_config_variable_expansion() {
    let toml_str = r#"
[logging]
file = "$DELAY_ATLAS/run.log"

[paths]
airports_file = "$DELAY_ATLAS/airports.dat"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML with variables");

    assert!(config.logging.file.contains("delayatlas"));
    assert!(!config.logging.file.contains("$DELAY_ATLAS"));
    assert!(config.paths.airports_file.ends_with("airports.dat"));
    assert!(!config.paths.airports_file.contains("$DELAY_ATLAS"));
}

#[test]
fn test_config_get_set() {
    let mut config = Config::from_defaults();

    assert!(config.get("level").is_some());

    config.set("level", "debug").expect("Failed to set level");
    assert_eq!(config.get("level").unwrap(), "debug");

    config
        .set("verbose", "true")
        .expect("Failed to set verbose");
    assert!(config.logging.verbose);

    config.set("min-delay", "20").expect("Failed to set min_delay");
    assert_eq!(config.get("min_delay").unwrap(), "20");

    config.set("push", "false").expect("Failed to set push");
    assert!(!config.git.push);

    assert!(config.get("unknown_key").is_none());
    assert!(config.set("unknown_key", "value").is_err());
    assert!(config.set("max_delay", "lots").is_err());
    assert!(config.set("level", "loud").is_err());
}

#[test]
fn test_config_unset() {
    let mut config = Config::from_defaults();
    let defaults = Config::from_defaults();

    config.set("branch", "gh-pages").expect("Failed to set branch");
    assert_eq!(config.git.branch, "gh-pages");

    config
        .unset("branch", &defaults)
        .expect("Failed to unset branch");
    assert_eq!(config.git.branch, defaults.git.branch);
    assert!(config.unset("nope", &defaults).is_err());
}

#[test]
fn test_config_save_and_load() {
    let (_temp_dir, config_file) = setup_temp_config();

    let mut config = Config::from_defaults();
    config.set("level", "info").expect("Failed to set level");
    config.set("out_dir", "public").expect("Failed to set out_dir");
    config.save_to(&config_file).expect("Failed to save config");

    let loaded = Config::load_from(&config_file);
    assert_eq!(loaded.logging.level, "info");
    assert_eq!(loaded.paths.out_dir, "public");
}

#[test]
fn test_load_creates_missing_file() {
    let (_temp_dir, config_file) = setup_temp_config();
    assert!(!config_file.exists());

    let config = Config::load_from(&config_file);
    assert!(config_file.exists());
    assert_eq!(config.git.remote, Config::from_defaults().git.remote);
}

#[test]
fn test_load_merges_new_defaults_into_old_file() {
    let (_temp_dir, config_file) = setup_temp_config();
    fs::create_dir_all(config_file.parent().unwrap()).unwrap();
    fs::write(&config_file, "[logging]\nlevel = \"error\"\n").unwrap();

    let config = Config::load_from(&config_file);
    assert_eq!(config.logging.level, "error");
    assert_eq!(config.paths.flights_file, "Train_with_Countries.csv");

    let saved = fs::read_to_string(&config_file).unwrap();
    assert!(saved.contains("flights_file"));
}

#[test]
fn test_config_overrides_apply() {
    let mut config = Config::from_defaults();

    let overrides = ConfigOverrides {
        level: Some("error".to_string()),
        file: Some("/custom/path.log".to_string()),
        verbose: Some(true),
        flights_file: Some("other.csv".to_string()),
        airports_file: Some("other.dat".to_string()),
        out_dir: Some("./custom_out".to_string()),
        remote: Some("mirror".to_string()),
        branch: Some("pages".to_string()),
        push: Some(false),
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/custom/path.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.flights_file, "other.csv");
    assert_eq!(config.paths.airports_file, "other.dat");
    assert_eq!(config.paths.out_dir, "./custom_out");
    assert_eq!(config.git.remote, "mirror");
    assert_eq!(config.git.branch, "pages");
    assert!(!config.git.push);
}

#[test]
fn test_config_overrides_partial() {
    let mut config = Config::from_defaults();
    let before = config.clone();

    let overrides = ConfigOverrides {
        level: Some("warn".to_string()),
        ..ConfigOverrides::default()
    };
    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.paths.flights_file, before.paths.flights_file);
    assert_eq!(config.git.push, before.git.push);
}

#[test]
fn test_config_display_format() {
    let display_str = format!("{}", Config::from_defaults());

    assert!(display_str.contains("[logging]"));
    assert!(display_str.contains("[paths]"));
    assert!(display_str.contains("[filter]"));
    assert!(display_str.contains("[git]"));
    assert!(display_str.contains("flights_file"));
    assert!(display_str.contains("max_delay"));
}

#[test]
fn test_merge_defaults_preserves_existing() {
    let toml_str = r#"
[logging]
level = "error"
file = "/my/custom/path.log"

[git]
remote = ""
branch = "release"
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse config");
    let defaults = Config::from_defaults();

    assert!(config.merge_defaults(&defaults));
    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/my/custom/path.log");
    assert_eq!(config.git.branch, "release");
    assert_eq!(config.git.remote, "origin");
}

#[test]
fn test_get_config_file_path() {
    let path = Config::get_config_file_path();
    let path_str = path.to_string_lossy();
    assert!(path_str.ends_with("config.toml") || path_str.ends_with("dconfig.toml"));
    assert!(Config::get_delayatlas_dir()
        .to_string_lossy()
        .contains("delayatlas"));
}
