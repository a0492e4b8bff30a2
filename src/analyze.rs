//! The `tone analyze` and `tone generate` commands.
//!
//! [`analyze_and_record`] is the workflow: call the service, and only on a
//! validated result, save it to history. A response that fails validation
//! leaves the history untouched. The `run_*` functions add input handling
//! and terminal output on top.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::warn;

use tonecheck_core::error::ClientError;
use tonecheck_core::history::HistoryStore;
use tonecheck_core::models::{AnalysisResult, GenerationResult, SavedEntry};

use crate::client::ApiClient;
use crate::clipboard;
use crate::config::Config;
use crate::history_cmd;

/// Result of one analysis, plus the history entry if it was recorded.
#[derive(Debug, Clone)]
pub struct AnalyzeOutcome {
    pub result: AnalysisResult,
    pub entry: Option<SavedEntry>,
}

/// Analyze `text` and, on success, prepend it to `history`.
///
/// Storage problems never fail this call; see [`HistoryStore::save_result`].
pub async fn analyze_and_record(
    client: &ApiClient,
    history: Option<&HistoryStore>,
    text: &str,
    temperature: f64,
) -> Result<AnalyzeOutcome, ClientError> {
    let result = client.analyze(text, temperature).await?;
    let entry = match history {
        Some(history) => Some(history.save_result(text, &result).await),
        None => None,
    };
    Ok(AnalyzeOutcome { result, entry })
}

pub struct AnalyzeOptions {
    pub text: Option<String>,
    pub file: Option<PathBuf>,
    pub temperature: Option<f64>,
    pub save: bool,
    pub copy: bool,
    pub json: bool,
}

/// CLI entry point for `tone analyze`.
pub async fn run_analyze(config: &Config, opts: AnalyzeOptions) -> Result<()> {
    let text = read_input(opts.text, opts.file.as_deref())?;
    let temperature = opts.temperature.unwrap_or(config.analysis.temperature);
    let client = ApiClient::from_config(&config.api)?;

    let history = if opts.save {
        match history_cmd::open_history(config).await {
            Ok(h) => Some(h),
            Err(e) => {
                let reason = format!("{:#}", e);
                warn!(error = %reason, "history unavailable; result will not be saved");
                None
            }
        }
    } else {
        None
    };

    let outcome = analyze_and_record(&client, history.as_ref(), &text, temperature).await?;

    if opts.json {
        let out = match &outcome.entry {
            Some(entry) => serde_json::to_string_pretty(entry)?,
            None => serde_json::to_string_pretty(&outcome.result)?,
        };
        println!("{}", out);
    } else {
        print_analysis(&outcome.result);
        if let Some(entry) = &outcome.entry {
            println!();
            println!("saved as {}", entry.id);
        }
    }

    if opts.copy {
        report_copy(clipboard::copy_to_clipboard(&outcome.result.alternative_text));
    }
    Ok(())
}

/// Where `tone generate` gets its text and suggestions from.
pub enum GenerateSource {
    /// A saved history entry, by id.
    Entry(String),
    Inline {
        text: String,
        suggestions: Vec<String>,
    },
}

pub struct GenerateOptions {
    pub source: GenerateSource,
    /// 1-based indices of suggestions to apply. `None` applies all.
    pub select: Option<Vec<usize>>,
    pub temperature: Option<f64>,
    pub copy: bool,
    pub json: bool,
}

/// CLI entry point for `tone generate`.
pub async fn run_generate(config: &Config, opts: GenerateOptions) -> Result<()> {
    let (text, suggestions) = match opts.source {
        GenerateSource::Entry(id) => {
            let history = history_cmd::open_history(config).await?;
            let entry = history
                .get_result(&id)
                .await
                .with_context(|| format!("no history entry with id {}", id))?;
            (entry.text, entry.result.suggestions)
        }
        GenerateSource::Inline { text, suggestions } => (text, suggestions),
    };

    let selected = selection_flags(suggestions.len(), opts.select.as_deref())?;
    let temperature = opts.temperature.unwrap_or(config.analysis.temperature);
    let client = ApiClient::from_config(&config.api)?;

    let generated: GenerationResult = client
        .generate(&text, &suggestions, &selected, temperature)
        .await?;

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&generated)?);
    } else {
        println!("{}", generated.generated_text);
    }

    if opts.copy {
        report_copy(clipboard::copy_to_clipboard(&generated.generated_text));
    }
    Ok(())
}

/// Turn 1-based suggestion indices into one flag per suggestion.
///
/// `None` selects every suggestion. Indices outside `1..=count` are an
/// error; duplicates are harmless.
pub fn selection_flags(count: usize, select: Option<&[usize]>) -> Result<Vec<bool>> {
    let Some(indices) = select else {
        return Ok(vec![true; count]);
    };
    let mut flags = vec![false; count];
    for &i in indices {
        if i == 0 || i > count {
            bail!(
                "suggestion {} does not exist (choose between 1 and {})",
                i,
                count
            );
        }
        flags[i - 1] = true;
    }
    Ok(flags)
}

/// Input text from the argument, a file, or stdin (in that order).
pub fn read_input(text: Option<String>, file: Option<&std::path::Path>) -> Result<String> {
    match (text, file) {
        (Some(_), Some(_)) => bail!("pass either TEXT or --file, not both"),
        (Some(t), None) if t != "-" => Ok(t),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read text from stdin")?;
            Ok(buf)
        }
    }
}

pub fn print_analysis(result: &AnalysisResult) {
    println!("tone:         {}", result.tone);
    println!("suggestions:");
    for (i, s) in result.suggestions.iter().enumerate() {
        println!("  {}. {}", i + 1, s);
    }
    println!("alternative:");
    println!("{}", result.alternative_text);
}

fn report_copy(copied: bool) {
    if copied {
        eprintln!("Copied to clipboard.");
    } else {
        eprintln!("Could not copy to clipboard.");
    }
}
