//! Config command handler

use crate::args::ConfigSubcommand;
use delay_atlas::config::Config;
use delay_atlas::error;
use std::io::{self, Write};
use std::path::Path;

/// Dispatch config subcommands
///
/// `config` carries this run's CLI overrides and is only displayed; `set` and
/// `unset` edit the file on disk.
pub fn run(subcommand: Option<ConfigSubcommand>, config: &Config, defaults: &Config) {
    let config_file = Config::get_config_file_path();
    let result = match subcommand {
        None => handle_config_get(config, None),
        Some(ConfigSubcommand::Get { key }) => handle_config_get(config, key.as_deref()),
        Some(ConfigSubcommand::Set { key, value }) => {
            handle_config_set(&config_file, &key, &value)
        }
        Some(ConfigSubcommand::Unset { key }) => {
            handle_config_unset(&config_file, defaults, &key)
        }
        Some(ConfigSubcommand::Reset) => handle_config_reset(),
    };

    if let Err(e) = result {
        error!("config command failed: {e}");
        eprintln!("{e}");
        std::process::exit(1);
    }
}

/// Print one value, or the whole configuration when no key is given
pub fn handle_config_get(config: &Config, key: Option<&str>) -> Result<(), String> {
    match key {
        Some(k) => {
            let value = config
                .get(k)
                .ok_or_else(|| format!("✗ Unknown config key: '{k}'"))?;
            println!("{value}");
        }
        None => {
            println!("\n=== Configuration ===\n");
            print!("{config}");
        }
    }
    Ok(())
}

/// Set a key in `config_file` and save it
pub fn handle_config_set(config_file: &Path, key: &str, value: &str) -> Result<(), String> {
    let mut stored = Config::load_from(config_file);
    stored.set(key, value).map_err(|e| format!("✗ {e}"))?;
    stored
        .save_to(config_file)
        .map_err(|e| format!("✗ Failed to save config: {e}"))?;
    println!("✓ Set {key} = {value}");
    Ok(())
}

/// Restore a key in `config_file` to its default and save it
pub fn handle_config_unset(config_file: &Path, defaults: &Config, key: &str) -> Result<(), String> {
    let mut stored = Config::load_from(config_file);
    stored.unset(key, defaults).map_err(|e| format!("✗ {e}"))?;
    stored
        .save_to(config_file)
        .map_err(|e| format!("✗ Failed to save config: {e}"))?;
    println!("✓ Reset {key} to default");
    Ok(())
}

/// Delete the config file after confirmation
pub fn handle_config_reset() -> Result<(), String> {
    if !Config::get_config_file_path().exists() {
        println!("✓ Config is already at defaults");
        return Ok(());
    }

    print!("Reset delayatlas config to defaults? (y/n): ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin().read_line(&mut response).ok();

    if matches!(response.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
        Config::reset().map_err(|e| format!("✗ Failed to remove config file: {e}"))?;
        println!("✓ Config reset to defaults");
    } else {
        println!("✗ Reset cancelled");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use delay_atlas::config::ConfigOverrides;
    use tempfile::TempDir;

    #[test]
    fn test_set_keeps_run_overrides_out_of_the_file() {
        let dir = TempDir::new().unwrap();
        let config_file = dir.path().join("config.toml");
        let mut effective = Config::load_from(&config_file);
        effective.apply_overrides(&ConfigOverrides {
            remote: Some("mirror".to_string()),
            ..ConfigOverrides::default()
        });
        assert_eq!(effective.git.remote, "mirror");

        handle_config_set(&config_file, "branch", "gh-pages").unwrap();

        let saved = Config::load_from(&config_file);
        assert_eq!(saved.git.branch, "gh-pages");
        assert_eq!(saved.git.remote, "origin");
    }

    #[test]
    fn test_unset_restores_default_on_disk() {
        let dir = TempDir::new().unwrap();
        let config_file = dir.path().join("config.toml");
        let defaults = Config::from_defaults();
        handle_config_set(&config_file, "min_delay", "30").unwrap();
        assert!((Config::load_from(&config_file).filter.min_delay - 30.0).abs() < f64::EPSILON);

        handle_config_unset(&config_file, &defaults, "min_delay").unwrap();
        let saved = Config::load_from(&config_file);
        assert!((saved.filter.min_delay - defaults.filter.min_delay).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_rejects_unknown_key() {
        let dir = TempDir::new().unwrap();
        let err = handle_config_set(&dir.path().join("config.toml"), "colour", "red").unwrap_err();
        assert!(err.starts_with('✗'));
    }
}
