//! CLI tool for the primary school database.
//!
//! Provides commands for:
//! - Deploying the `ps` schema into a database file
//! - Running fixture-verification scenarios and printing a JSON report each

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use school_db_core::{DbConfig, SqliteConnection};
use school_db_harness::{run_all, CreationPath, HarnessConfig, RemovalPath, Scenario};

/// Command-line arguments for the school database tool.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Database file (overrides PRIMARY_SCHOOL_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// JSON file with database settings (replaces environment settings)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the schema and sentinel rows if missing
    Deploy,
    /// Run create/verify/cleanup scenarios
    Check {
        /// How fixtures are created
        #[arg(long, value_enum, default_value_t = PathChoice::All)]
        creation: PathChoice,

        /// How fixtures are removed
        #[arg(long, value_enum, default_value_t = PathChoice::All)]
        removal: PathChoice,

        /// Skip the cross-check through ps.vTeacher
        #[arg(long)]
        skip_view: bool,

        /// Prefix for generated teacher names
        #[arg(long, default_value = "Test-")]
        prefix: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum PathChoice {
    Direct,
    Procedure,
    All,
}

impl PathChoice {
    fn creation_paths(self) -> Vec<CreationPath> {
        match self {
            PathChoice::Direct => vec![CreationPath::Direct],
            PathChoice::Procedure => vec![CreationPath::Procedure],
            PathChoice::All => vec![CreationPath::Direct, CreationPath::Procedure],
        }
    }

    fn removal_paths(self) -> Vec<RemovalPath> {
        match self {
            PathChoice::Direct => vec![RemovalPath::Direct],
            PathChoice::Procedure => vec![RemovalPath::Procedure],
            PathChoice::All => vec![RemovalPath::Direct, RemovalPath::Procedure],
        }
    }
}

fn db_config(args: &Args) -> anyhow::Result<DbConfig> {
    let mut config = match &args.config {
        Some(path) => DbConfig::from_json_file(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => DbConfig::from_env()?,
    };
    if let Some(db) = &args.db {
        config.database_path = db.clone();
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let db = db_config(&args)?;

    match &args.command {
        Command::Deploy => {
            let conn = SqliteConnection::open(&db)?;
            conn.deploy_schema()?;
            tracing::info!(database = conn.target(), "schema ready");
        }
        Command::Check {
            creation,
            removal,
            skip_view,
            prefix,
        } => {
            let harness = HarnessConfig {
                name_prefix: prefix.clone(),
                verify_view: !skip_view,
                ..Default::default()
            };
            let mut scenarios = Vec::new();
            for c in creation.creation_paths() {
                for r in removal.removal_paths() {
                    scenarios.push(Scenario::new(c, r));
                }
            }

            let mut failed = 0;
            let total = scenarios.len();
            for (scenario, result) in run_all(&db, &harness, &scenarios) {
                let line = match result {
                    Ok(report) => serde_json::json!({ "passed": true, "report": report }),
                    Err(e) => {
                        failed += 1;
                        tracing::error!(?scenario, error = %e, "scenario failed");
                        serde_json::json!({
                            "passed": false,
                            "scenario": scenario,
                            "kind": e.kind(),
                            "error": e.to_string(),
                        })
                    }
                };
                println!("{line}");
            }

            if failed > 0 {
                bail!("{failed} of {total} scenario(s) failed");
            }
        }
    }

    Ok(())
}
