//! Command-line and environment configuration.
//!
//! # Invariants
//! - The resolved log directory is absolute.
//! - Without `--policy`, the built-in compensation policy applies.

use anyhow::{Context, Result};
use clap::Parser;
use payxpert_core::{default_log_level, CompensationPolicy, DbTarget};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "payxpert", version, about = "Payroll and HR record keeping console")]
pub struct Cli {
    /// SQLite database file.
    #[arg(long, env = "PAYXPERT_DB", default_value = "payxpert.sqlite3")]
    pub db: PathBuf,

    /// Use a throwaway in-memory database instead of `--db`.
    #[arg(long)]
    pub in_memory: bool,

    /// Log level: trace|debug|info|warn|error.
    #[arg(long, env = "PAYXPERT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rolling log files.
    #[arg(long, env = "PAYXPERT_LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,

    /// Disable file logging.
    #[arg(long)]
    pub no_log: bool,

    /// JSON file with pay rates and tax brackets.
    #[arg(long, env = "PAYXPERT_POLICY")]
    pub policy: Option<PathBuf>,
}

/// Logging settings after defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub dir: PathBuf,
}

#[derive(Debug)]
pub struct AppConfig {
    pub db: DbTarget,
    pub logging: Option<LogSettings>,
    pub policy: CompensationPolicy,
}

impl AppConfig {
    /// Resolves `cli` against `cwd`, loading the policy file if one is set.
    pub fn resolve(cli: Cli, cwd: &Path) -> Result<Self> {
        let db = if cli.in_memory {
            DbTarget::Memory
        } else {
            DbTarget::File(absolutize(&cli.db, cwd))
        };

        let logging = (!cli.no_log).then(|| LogSettings {
            level: cli
                .log_level
                .unwrap_or_else(|| default_log_level().to_string()),
            dir: absolutize(&cli.log_dir, cwd),
        });

        let policy = match cli.policy {
            Some(path) => {
                let path = absolutize(&path, cwd);
                CompensationPolicy::from_json_file(&path)
                    .with_context(|| format!("loading policy from `{}`", path.display()))?
            }
            None => CompensationPolicy::standard(),
        };

        Ok(Self {
            db,
            logging,
            policy,
        })
    }
}

fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("payxpert").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn relative_paths_resolve_against_cwd() {
        let cwd = Path::new("/srv/payxpert");
        let config = AppConfig::resolve(
            parse(&["--db", "data/hr.sqlite3", "--log-level", "warn"]),
            cwd,
        )
        .unwrap();

        assert_eq!(
            config.db,
            DbTarget::File(PathBuf::from("/srv/payxpert/data/hr.sqlite3"))
        );
        assert_eq!(
            config.logging,
            Some(LogSettings {
                level: "warn".to_string(),
                dir: PathBuf::from("/srv/payxpert/logs"),
            })
        );
        assert_eq!(config.policy, CompensationPolicy::standard());
    }

    #[test]
    fn in_memory_and_no_log_flags() {
        let config =
            AppConfig::resolve(parse(&["--in-memory", "--no-log"]), Path::new("/tmp")).unwrap();
        assert_eq!(config.db, DbTarget::Memory);
        assert!(config.logging.is_none());
    }

    #[test]
    fn policy_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.json");
        std::fs::write(
            &path,
            r#"{
                "pay_rates": { "annual_salaries": { "Baker": "40000" } },
                "tax_table": [ { "lower": "0", "rate": "0.05" } ]
            }"#,
        )
        .unwrap();

        let config = AppConfig::resolve(
            parse(&["--policy", path.to_str().unwrap()]),
            Path::new("/tmp"),
        )
        .unwrap();
        assert!(config.policy.pay_rates.annual_salary("baker").is_some());
    }

    #[test]
    fn unreadable_policy_file_is_an_error() {
        let err = AppConfig::resolve(
            parse(&["--policy", "/definitely/missing/policy.json"]),
            Path::new("/tmp"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("loading policy"));
    }
}
