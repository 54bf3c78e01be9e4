//! # Resume Matcher CLI (`rmatch`)
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rmatch init` | Create the history database |
//! | `rmatch match <resume> <jd>` | Score a resume against a job description |
//! | `rmatch history` | List recorded comparisons |
//! | `rmatch serve` | Start the JSON HTTP adapter |
//!
//! ## Examples
//!
//! ```bash
//! rmatch match ./cv.pdf ./jobs/backend.txt
//! rmatch history --limit 20
//! rmatch --config ./config/rmatch.toml serve
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_matcher::config;
use resume_matcher::history;
use resume_matcher::ledger::{Ledger, SqliteLedger};
use resume_matcher::server;
use resume_matcher::{MatchError, MatchService};

/// Resume Matcher: score a resume against a job description.
#[derive(Parser)]
#[command(
    name = "rmatch",
    about = "Score a resume against a job description (TF-IDF similarity and skill match)",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/rmatch.toml`. Built-in defaults are used when
    /// the file does not exist.
    #[arg(long, global = true, default_value = "./config/rmatch.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the history database and table. Safe to run repeatedly.
    Init,

    /// Compare a resume with a job description and record the result.
    ///
    /// Both files must be `.pdf` or `.txt`.
    Match {
        /// Resume file.
        resume: PathBuf,
        /// Job description file.
        jd: PathBuf,
    },

    /// List recorded comparisons, oldest first.
    History {
        /// Only show the most recent N records.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Start the JSON HTTP adapter on `[server].bind`.
    Serve,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = config::load_or_default(&cli.config)?;

    let ledger = SqliteLedger::open(&cfg.db.path).await?;

    match cli.command {
        Commands::Init => {
            ledger.close().await;
            println!("Database initialized at {}", cfg.db.path.display());
        }
        Commands::History { limit } => {
            if limit == Some(0) {
                anyhow::bail!("--limit must be >= 1");
            }
            history::run_history(&ledger, limit).await?;
            ledger.close().await;
        }
        Commands::Match { resume, jd } => {
            let ledger: Arc<dyn Ledger> = Arc::new(ledger);
            let service = MatchService::from_config(&cfg, ledger);
            match service.run_match(&resume, &jd).await {
                Ok(report) => {
                    println!(
                        "TF-IDF Similarity Score: {:.2}%",
                        report.tfidf_score * 100.0
                    );
                    println!("Skill Match Score: {:.2}%", report.skill_score * 100.0);
                    println!("Resume skills: {}", join_skills(report.resume_skills.iter()));
                    println!("Job skills: {}", join_skills(report.jd_skills.iter()));
                    println!("Recorded as match #{}", report.record_id);
                }
                Err(MatchError::NotRecorded { scores, source }) => {
                    println!("TF-IDF Similarity Score: {:.2}%", scores.tfidf_score * 100.0);
                    println!("Skill Match Score: {:.2}%", scores.skill_score * 100.0);
                    anyhow::bail!("result was not recorded in history: {}", source);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Serve => {
            let ledger: Arc<dyn Ledger> = Arc::new(ledger);
            let service = Arc::new(MatchService::from_config(&cfg, ledger));
            server::run_server(&cfg.server.bind, service).await?;
        }
    }

    Ok(())
}

fn join_skills<'a>(skills: impl Iterator<Item = &'a str>) -> String {
    let joined = skills.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "(none)".to_string()
    } else {
        joined
    }
}
