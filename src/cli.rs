use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;

use crate::config::WatchConfig;
use crate::sink::LineFormat;

#[derive(Parser)]
#[command(name = "pollwatch")]
#[command(version)]
#[command(about = "A polling-based directory monitor that reports added, removed, and modified entries")]
#[command(
    long_about = "pollwatch periodically rescans one or more directories, diffs the result against \
the previous scan, and reports every added, removed, or modified entry as a log line. Deliberately \
poll-based: no inotify, no daemons, predictable behavior on network filesystems."
)]
pub struct Cli {
    /// Directories to monitor
    #[arg(value_name = "PATH", help = "Directories to monitor")]
    pub paths: Vec<PathBuf>,

    /// Walk each directory tree recursively
    #[arg(short, long, help = "Scan directory trees recursively")]
    pub recursive: bool,

    /// Include hidden (dot) entries
    #[arg(long, help = "Include hidden entries; hidden directories are entered too")]
    pub include_hidden: bool,

    /// Glob patterns an entry must match to be watched
    #[arg(long, value_delimiter = ',', help = "Include glob patterns (e.g. *.txt,*.log)")]
    pub include: Option<Vec<String>>,

    /// Glob patterns that drop an entry
    #[arg(long, value_delimiter = ',', help = "Exclude glob patterns (exclude wins over include)")]
    pub exclude: Option<Vec<String>>,

    /// Seconds between poll ticks
    #[arg(short, long, value_name = "SECS", help = "Polling interval in seconds")]
    pub interval: Option<f64>,

    /// Append a copy of the log to this file
    #[arg(long, value_name = "FILE", help = "Optional log file (append-only)")]
    pub log_file: Option<PathBuf>,

    /// Load settings from a TOML config file; flags override it
    #[arg(short, long, value_name = "FILE", help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for change lines
    #[arg(long, default_value = "standard", help = "Output format")]
    pub output: LineFormat,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose diagnostics on stderr")]
    pub verbose: bool,
}

impl Cli {
    pub fn setup_logging(&self) {
        let level = if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .init();
    }

    pub fn validate(&self) -> Result<(), String> {
        for path in &self.paths {
            if !path.exists() {
                return Err(format!("Path does not exist: {}", path.display()));
            }
            if !path.is_dir() {
                return Err(format!("Path is not a directory: {}", path.display()));
            }
        }

        if let Some(interval) = self.interval {
            if !interval.is_finite() || interval <= 0.0 {
                return Err("Interval must be a positive number of seconds".to_string());
            }
        }

        Ok(())
    }

    /// Merge the config file (or env defaults) with CLI overrides.
    pub fn build_config(&self) -> Result<WatchConfig> {
        let mut config = match &self.config {
            Some(path) => WatchConfig::load(path)?,
            None => WatchConfig::from_env(),
        };

        for path in &self.paths {
            if !config.paths.contains(path) {
                config.paths.push(path.clone());
            }
        }
        if self.recursive {
            config.recursive = true;
        }
        if self.include_hidden {
            config.include_hidden = true;
        }
        if let Some(include) = &self.include {
            config.include = include.clone();
        }
        if let Some(exclude) = &self.exclude {
            config.exclude = exclude.clone();
        }
        if let Some(interval) = self.interval {
            config.interval_secs = interval;
        }
        if let Some(log_file) = &self.log_file {
            config.log_file = Some(log_file.clone());
        }

        config.validate().map_err(|msg| anyhow!(msg))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pollwatch").chain(args.iter().copied()))
            .expect("args should parse")
    }

    #[test]
    fn flags_override_defaults() {
        let cli = parse(&[
            "--recursive",
            "--include-hidden",
            "--include",
            "*.txt,*.log",
            "--exclude",
            "tmp*",
            "--interval",
            "0.5",
        ]);
        let config = cli.build_config().unwrap();

        assert!(config.recursive);
        assert!(config.include_hidden);
        assert_eq!(config.include, vec!["*.txt", "*.log"]);
        assert_eq!(config.exclude, vec!["tmp*"]);
        assert_eq!(config.interval_secs, 0.5);
    }

    #[test]
    fn defaults_survive_when_flags_absent() {
        let cli = parse(&[]);
        let config = cli.build_config().unwrap();

        assert!(!config.recursive);
        assert_eq!(config.interval_secs, 5.0);
        assert!(config.include.is_empty());
    }

    #[test]
    fn nonpositive_interval_rejected() {
        let cli = parse(&["--interval", "0"]);
        assert!(cli.validate().is_err());

        let cli = parse(&["--interval=-1"]);
        assert!(cli.build_config().is_err());
    }

    #[test]
    fn missing_path_rejected() {
        let cli = parse(&["/no/such/directory/anywhere"]);
        assert!(cli.validate().is_err());
    }
}
