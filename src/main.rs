// SPDX-License-Identifier: PMPL-1.0-or-later

//! crelle: assemble a typeset problem set from a multilingual problem database

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use crelle::diagnostics::{self, Level};
use crelle::document::{merge_body, merge_preamble};
use crelle::problem::{load, Loaded, ProblemReference};
use crelle::{catalog, Assembler, DocumentConfig, FsStore, Lang, Settings};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "crelle")]
#[command(version)]
#[command(about = "Assemble multilingual problem sets from a YAML problem database")]
#[command(long_about = None)]
struct Cli {
    /// Settings file (default: <database>/crelle.yaml)
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Problem database root (default: $CRELLE_DB or the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    db: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a problem set from a document config
    Build {
        /// Document config (YAML)
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "out")]
        output: PathBuf,

        /// Print the build summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a single stored problem to stdout
    Show {
        /// Record identifier, relative to the problem directory
        #[arg(value_name = "PROBLEM")]
        problem: String,

        /// Language code
        #[arg(short, long, default_value = "eng")]
        lang: String,

        /// Include the solution block
        #[arg(long)]
        solutions: bool,
    },

    /// List stored problems and their tags
    List {
        /// Only show problems carrying this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check the problem database layout and templates
    Doctor,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::discover(cli.settings.as_deref(), cli.db.as_deref())
        .context("loading settings")?;
    debug!(database = %settings.database.display(), "settings loaded");

    match cli.command {
        Commands::Build {
            config,
            output,
            json,
        } => {
            let document = DocumentConfig::from_file(&config, &settings.default_language)
                .with_context(|| format!("reading document config {}", config.display()))?;
            let store = FsStore::new(&settings);
            let summary = Assembler::new(&settings, &store)
                .build(&document, &output)
                .with_context(|| format!("building {}", config.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "{} {} ({}, {} problems, {} dependencies)",
                    "Wrote".green().bold(),
                    summary.output.display(),
                    summary.language.name(),
                    summary.problems,
                    summary.dependencies.len()
                );
            }
        }

        Commands::Show {
            problem,
            lang,
            solutions,
        } => {
            let Some(language) = Lang::from_code(&lang) else {
                bail!("unknown language code '{}'", lang);
            };
            let store = FsStore::new(&settings);
            let loaded = load(
                &ProblemReference::Stored(problem.clone()),
                language.code(),
                &settings,
                &store,
            )
            .with_context(|| format!("loading {}", problem))?;
            let loaded = vec![loaded];

            if let Loaded::Problem(fragments) = &loaded[0] {
                if !fragments.preamble_fragment.is_empty() {
                    println!("{}", merge_preamble("", &loaded).trim_start());
                }
            }
            println!("{}", merge_body(&loaded, solutions).trim());
        }

        Commands::List { tag, json } => {
            let store = FsStore::new(&settings);
            let entries = catalog::list(&store, &settings, tag.as_deref())
                .with_context(|| format!("listing {}", store.problem_root().display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in &entries {
                    match &entry.error {
                        Some(err) => println!("{}  {}", entry.id.red(), err),
                        None => println!(
                            "{}  [{}]{}",
                            entry.id.bold(),
                            entry.tags.join(", "),
                            if entry.has_solution { "  (solution)" } else { "" }
                        ),
                    }
                }
                println!("\n{} records", entries.len());
            }
        }

        Commands::Doctor => {
            println!("crelle self-diagnostics\n");
            let checks = diagnostics::run(&settings);
            for check in &checks {
                let tag = match check.level {
                    Level::Ok => check.level.tag().green(),
                    Level::Warn => check.level.tag().yellow(),
                    Level::Error => check.level.tag().red(),
                };
                println!("  [{}] {:22} {}", tag, check.label, check.detail);
            }
            if diagnostics::has_errors(&checks) {
                bail!("self-diagnostics reported issues");
            }
        }
    }

    Ok(())
}
