//! CLI argument definitions for `delay-atlas`

use clap::{builder::BoolishValueParser, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use delay_atlas::config::ConfigOverrides;
use delay_atlas::logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to lowercase
/// strings for config storage and to `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `flights_file`, `branch`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

/// Inputs and output shared by the chart subcommands
#[derive(Debug, Clone, Default, Args)]
pub struct ChartArgs {
    /// Flights CSV (defaults to config `flights_file`)
    #[arg(long, value_name = "FILE")]
    pub flights: Option<PathBuf>,

    /// Airports reference file (defaults to config `airports_file`)
    #[arg(long, value_name = "FILE")]
    pub airports: Option<PathBuf>,

    /// Output HTML path (defaults to the fixed chart name inside `out_dir`)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the chart but skip git commit/push
    #[arg(long)]
    pub no_push: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Draw delayed routes and airports on a world map.
    ///
    /// Routes are colored by mean delay and sized by flight count; the page is
    /// committed and force-pushed unless `--no-push` is given.
    Routes {
        #[command(flatten)]
        chart: ChartArgs,
    },
    /// Draw the airport connection network with a spring layout.
    ///
    /// Nodes are colored by their number of connections; the page is synced to
    /// the remote with a rebase unless `--no-push` is given.
    Network {
        #[command(flatten)]
        chart: ChartArgs,

        /// Seed for the initial node placement
        #[arg(long, value_name = "N", default_value_t = 42)]
        seed: u64,

        /// Maximum number of layout iterations
        #[arg(long, value_name = "N", default_value_t = 50)]
        iterations: usize,
    },
}

impl Command {
    /// Chart arguments of a chart subcommand
    #[must_use]
    pub const fn chart_args(&self) -> Option<&ChartArgs> {
        match self {
            Self::Routes { chart } | Self::Network { chart, .. } => Some(chart),
            Self::Config { .. } => None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "delayatlas",
    about = "Flight-delay route maps and airport networks as interactive HTML charts",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug", global = true)]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum, global = true)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH", global = true)]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new(), global = true)]
    pub config_verbose: Option<bool>,

    /// Override config output directory
    #[arg(long = "out-dir", value_name = "DIR", global = true)]
    pub out_dir: Option<PathBuf>,

    /// Override the git remote to push to
    #[arg(long, value_name = "NAME", global = true)]
    pub remote: Option<String>,

    /// Override the git branch to push to
    #[arg(long, value_name = "NAME", global = true)]
    pub branch: Option<String>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Transforms CLI arguments into a `ConfigOverrides` struct that can be applied to
    /// the loaded configuration. Input paths and `--no-push` come from the chart
    /// subcommand, when one is used.
    ///
    /// # Examples
    /// ```ignore
    /// let args = Cli::parse();
    /// let overrides = args.to_config_overrides();
    /// config.apply_overrides(&overrides);
    /// ```
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        let path_string = |p: &PathBuf| p.to_string_lossy().to_string();
        let chart = self.command.chart_args();

        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string().to_lowercase()),
            file: self.config_log_file.as_ref().map(path_string),
            verbose: self.config_verbose,
            flights_file: chart.and_then(|c| c.flights.as_ref()).map(path_string),
            airports_file: chart.and_then(|c| c.airports.as_ref()).map(path_string),
            out_dir: self.out_dir.as_ref().map(path_string),
            remote: self.remote.clone(),
            branch: self.branch.clone(),
            push: chart.and_then(|c| c.no_push.then_some(false)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(command: Command) -> Cli {
        Cli {
            log_level: None,
            verbose: false,
            debug_flag: false,
            log_file: None,
            config_level: None,
            config_log_file: None,
            config_verbose: None,
            out_dir: None,
            remote: None,
            branch: None,
            command,
        }
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevelArg::Error.to_string(), "error");
        assert_eq!(LogLevelArg::Warn.to_string(), "warn");
        assert_eq!(LogLevelArg::Info.to_string(), "info");
        assert_eq!(LogLevelArg::Debug.to_string(), "debug");
    }

    #[test]
    fn test_log_level_to_logger_level() {
        assert_eq!(Level::from(LogLevelArg::Error), Level::Error);
        assert_eq!(Level::from(LogLevelArg::Warn), Level::Warn);
        assert_eq!(Level::from(LogLevelArg::Info), Level::Info);
        assert_eq!(Level::from(LogLevelArg::Debug), Level::Debug);
    }

    #[test]
    fn test_to_config_overrides_empty() {
        let overrides = cli(Command::Config { subcommand: None }).to_config_overrides();
        assert!(overrides.level.is_none());
        assert!(overrides.file.is_none());
        assert!(overrides.verbose.is_none());
        assert!(overrides.flights_file.is_none());
        assert!(overrides.out_dir.is_none());
        assert!(overrides.push.is_none());
    }

    #[test]
    fn test_to_config_overrides_with_values() {
        let mut args = cli(Command::Routes {
            chart: ChartArgs {
                flights: Some(PathBuf::from("data/flights.csv")),
                airports: Some(PathBuf::from("data/airports.dat")),
                output: None,
                no_push: true,
            },
        });
        args.config_level = Some(LogLevelArg::Debug);
        args.config_log_file = Some(PathBuf::from("/tmp/test.log"));
        args.config_verbose = Some(true);
        args.out_dir = Some(PathBuf::from("/output"));
        args.branch = Some("gh-pages".to_string());

        let overrides = args.to_config_overrides();
        assert_eq!(overrides.level, Some("debug".to_string()));
        assert_eq!(overrides.file, Some("/tmp/test.log".to_string()));
        assert_eq!(overrides.verbose, Some(true));
        assert_eq!(overrides.flights_file, Some("data/flights.csv".to_string()));
        assert_eq!(overrides.airports_file, Some("data/airports.dat".to_string()));
        assert_eq!(overrides.out_dir, Some("/output".to_string()));
        assert_eq!(overrides.branch, Some("gh-pages".to_string()));
        assert!(overrides.remote.is_none());
        assert_eq!(overrides.push, Some(false));
    }

    #[test]
    fn test_push_left_to_config_without_flag() {
        let args = cli(Command::Network {
            chart: ChartArgs::default(),
            seed: 42,
            iterations: 50,
        });
        assert!(args.to_config_overrides().push.is_none());
    }

    #[test]
    fn test_parse_network_flags() {
        let args = Cli::try_parse_from([
            "delayatlas",
            "network",
            "--seed",
            "7",
            "--iterations",
            "10",
            "--no-push",
            "--log-level",
            "info",
        ])
        .unwrap();
        match args.command {
            Command::Network {
                chart,
                seed,
                iterations,
            } => {
                assert_eq!((seed, iterations), (7, 10));
                assert!(chart.no_push);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(args.log_level, Some(LogLevelArg::Info));
    }
}
