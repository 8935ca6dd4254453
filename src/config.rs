//! Command-line configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::domain::{DEFAULT_ACCOUNT_NAME, SimulatedResolver};
use crate::infrastructure::resolve_log_dir;

#[derive(Debug, Parser)]
#[command(name = "recipient-form")]
#[command(about = "Collect recipient bank and contact details in the terminal", long_about = None)]
pub struct Cli {
    /// Delay before the simulated account lookup resolves.
    #[arg(long, default_value_t = 800)]
    pub lookup_latency_ms: u64,

    /// Name returned by the simulated account lookup.
    #[arg(long, default_value = DEFAULT_ACCOUNT_NAME)]
    pub account_name: String,

    /// Make every account lookup fail, to exercise the failure path.
    #[arg(long, default_value_t = false)]
    pub fail_lookups: bool,

    /// Append submissions to this file (`.csv` for CSV, anything else for JSON lines).
    #[arg(long)]
    pub submit_to: Option<PathBuf>,

    /// Directory for log files, or `off`.
    #[arg(long, default_value = "logs")]
    pub log_dir: String,

    /// Log level; falls back to RECIPIENT_FORM_LOG_LEVEL, then RUST_LOG.
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Settings resolved from [`Cli`].
#[derive(Debug, Clone)]
pub struct Settings {
    pub lookup_latency: Duration,
    pub account_name: String,
    pub fail_lookups: bool,
    pub submit_to: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub log_level: log::LevelFilter,
}

impl From<Cli> for Settings {
    fn from(cli: Cli) -> Self {
        Self {
            lookup_latency: Duration::from_millis(cli.lookup_latency_ms),
            account_name: cli.account_name,
            fail_lookups: cli.fail_lookups,
            submit_to: cli.submit_to,
            log_dir: resolve_log_dir(&cli.log_dir),
            log_level: crate::infrastructure::resolve_level(cli.log_level.as_deref()),
        }
    }
}

impl Settings {
    pub fn resolver(&self) -> SimulatedResolver {
        if self.fail_lookups {
            SimulatedResolver::fail_with("account service unavailable", self.lookup_latency)
        } else {
            SimulatedResolver::new(self.account_name.clone(), self.lookup_latency)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AccountResolver;

    #[test]
    fn test_defaults() {
        let settings = Settings::from(Cli::parse_from(["recipient-form", "--log-level", "info"]));

        assert_eq!(settings.lookup_latency, Duration::from_millis(800));
        assert_eq!(settings.account_name, "ODUTUGA GBEKE");
        assert_eq!(settings.log_dir, Some(PathBuf::from("logs")));
        assert_eq!(settings.log_level, log::LevelFilter::Info);
        assert!(settings.submit_to.is_none());
        assert!(!settings.fail_lookups);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "recipient-form",
            "--lookup-latency-ms",
            "50",
            "--account-name",
            "ADA OBI",
            "--submit-to",
            "out.csv",
            "--log-dir",
            "off",
        ]);
        let settings = Settings::from(cli);

        assert_eq!(settings.lookup_latency, Duration::from_millis(50));
        assert_eq!(settings.submit_to, Some(PathBuf::from("out.csv")));
        assert!(settings.log_dir.is_none());
        assert_eq!(settings.resolver().resolve("1234567890").unwrap(), "ADA OBI");
    }

    #[test]
    fn test_failing_resolver() {
        let settings = Settings::from(Cli::parse_from(["recipient-form", "--fail-lookups"]));
        assert!(settings.resolver().resolve("1234567890").is_err());
    }
}
