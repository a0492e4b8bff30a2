//! # Tonecheck CLI (`tone`)
//!
//! The `tone` binary analyzes text through the external analysis service,
//! regenerates it from chosen suggestions, and manages the local history of
//! results.
//!
//! ## Usage
//!
//! ```bash
//! tone --config ./config/tone.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tone init` | Create the local history database |
//! | `tone analyze [TEXT]` | Analyze text and save the result |
//! | `tone generate` | Regenerate text from selected suggestions |
//! | `tone history list` | List saved results, newest first |
//! | `tone history show <id>` | Show one saved result |
//! | `tone history delete <id>` | Delete one saved result |
//! | `tone history clear` | Delete all saved results |
//! | `tone copy <id>` | Copy a saved result to the clipboard |
//! | `tone health` | Probe the analysis service |
//!
//! ## Examples
//!
//! ```bash
//! # Analyze with a warmer temperature and copy the alternative phrasing
//! tone analyze "Per my last email, this is overdue." --temperature 1.1 --copy
//!
//! # Analyze a file without saving it
//! tone analyze --file draft.txt --no-save
//!
//! # Apply suggestions 1 and 3 of a saved analysis
//! tone generate --from 3f2a9c... --select 1,3
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tonecheck::analyze::{self, AnalyzeOptions, GenerateOptions, GenerateSource};
use tonecheck::config;
use tonecheck::health;
use tonecheck::history_cmd::{self, CopyField};
use tonecheck::logging::{self, Verbosity};
use tonecheck::sqlite_store::SqliteStore;
use tonecheck_core::format::categorize_chain;

/// Tonecheck CLI: tone analysis and text regeneration with a local history.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. A missing file means built-in defaults.
#[derive(Parser)]
#[command(
    name = "tone",
    about = "Tonecheck: tone analysis and text regeneration with a local history",
    version,
    long_about = "Tonecheck sends text to an external analysis service, shows its tone, \
    suggestions, and an alternative phrasing, regenerates text from chosen suggestions, \
    and keeps a newest-first local history of every analysis."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/tone.toml`. The API URL and timeout can also be
    /// set with `TONECHECK_API_BASE_URL` and `TONECHECK_API_TIMEOUT_SECS`.
    #[arg(long, global = true, default_value = "./config/tone.toml")]
    config: PathBuf,

    /// Show debug logs on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only show errors on stderr.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Create the local history database.
    ///
    /// Other commands create it on demand as well; running this is
    /// idempotent.
    Init,

    /// Analyze text: tone, suggestions, and an alternative phrasing.
    ///
    /// Text comes from the argument, `--file`, or stdin (also with `-`).
    /// Successful results are saved to history unless `--no-save` is given.
    Analyze {
        /// Text to analyze.
        text: Option<String>,

        /// Read the text from a file.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Sampling temperature in [0, 2]. Defaults to `analysis.temperature`.
        #[arg(long)]
        temperature: Option<f64>,

        /// Do not save the result to history.
        #[arg(long)]
        no_save: bool,

        /// Copy the alternative phrasing to the clipboard.
        #[arg(long)]
        copy: bool,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Regenerate text from selected suggestions.
    ///
    /// Use `--from` to start from a saved analysis, or give `--text` and
    /// one `--suggestion` per suggestion.
    Generate {
        /// History entry id to take the text and suggestions from.
        #[arg(long, conflicts_with_all = ["text", "suggestion"])]
        from: Option<String>,

        /// Text to regenerate.
        #[arg(long, required_unless_present = "from", requires = "suggestion")]
        text: Option<String>,

        /// A suggestion to consider (repeatable).
        #[arg(long)]
        suggestion: Vec<String>,

        /// 1-based suggestion numbers to apply, comma separated. Default: all.
        #[arg(long, value_delimiter = ',')]
        select: Option<Vec<usize>>,

        /// Sampling temperature in [0, 2]. Defaults to `analysis.temperature`.
        #[arg(long)]
        temperature: Option<f64>,

        /// Copy the generated text to the clipboard.
        #[arg(long)]
        copy: bool,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Inspect and manage saved results.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Copy part of a saved result to the clipboard.
    Copy {
        /// History entry id.
        id: String,

        /// Which text to copy.
        #[arg(long, value_enum, default_value = "alternative")]
        field: CopyField,
    },

    /// Check that the analysis service is reachable and healthy.
    Health,
}

/// History subcommands.
#[derive(Subcommand)]
enum HistoryAction {
    /// List saved results, newest first.
    List {
        /// Show at most this many entries.
        #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
        limit: Option<usize>,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Show one saved result.
    Show {
        id: String,

        #[arg(long)]
        json: bool,
    },
    /// Delete one saved result. Unknown ids are ignored.
    Delete { id: String },
    /// Delete all saved results.
    Clear {
        /// Do not ask for confirmation.
        #[arg(long, short)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_subscriber(Verbosity::from_flags(cli.verbose, cli.quiet));

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", user_message(&e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            SqliteStore::open(&cfg).await?;
            println!(
                "Database initialized at {}.",
                cfg.storage.path.display()
            );
        }
        Commands::Analyze {
            text,
            file,
            temperature,
            no_save,
            copy,
            json,
        } => {
            analyze::run_analyze(
                &cfg,
                AnalyzeOptions {
                    text,
                    file,
                    temperature,
                    save: !no_save,
                    copy,
                    json,
                },
            )
            .await?;
        }
        Commands::Generate {
            from,
            text,
            suggestion,
            select,
            temperature,
            copy,
            json,
        } => {
            let source = match (from, text) {
                (Some(id), _) => GenerateSource::Entry(id),
                (None, Some(text)) => GenerateSource::Inline {
                    text,
                    suggestions: suggestion,
                },
                (None, None) => anyhow::bail!("either --from or --text is required"),
            };
            analyze::run_generate(
                &cfg,
                GenerateOptions {
                    source,
                    select,
                    temperature,
                    copy,
                    json,
                },
            )
            .await?;
        }
        Commands::History { action } => match action {
            HistoryAction::List { limit, json } => {
                history_cmd::run_list(&cfg, limit, json).await?;
            }
            HistoryAction::Show { id, json } => {
                history_cmd::run_show(&cfg, &id, json).await?;
            }
            HistoryAction::Delete { id } => {
                history_cmd::run_delete(&cfg, &id).await?;
            }
            HistoryAction::Clear { yes } => {
                history_cmd::run_clear(&cfg, yes).await?;
            }
        },
        Commands::Copy { id, field } => {
            history_cmd::run_copy(&cfg, &id, field).await?;
        }
        Commands::Health => {
            health::run_health(&cfg).await?;
        }
    }

    Ok(())
}

/// Categorized message for API and validation errors; the context chain
/// for everything else (config, storage, arguments).
fn user_message(err: &anyhow::Error) -> String {
    match categorize_chain(err.as_ref()) {
        Some(category) => category.message().to_string(),
        None => format!("{:#}", err),
    }
}
