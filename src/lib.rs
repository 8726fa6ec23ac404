pub mod cli;
pub mod config;
pub mod error;
pub mod transcript;

pub use config::{ScanOptions, Tolerance};
pub use error::ParseError;
pub use transcript::parse_transcript;
pub use transcript::report::{Include, Outcome, ParseResult, Play, RecapStats, Task};

use crate::cli::{Cli, OutputFormat};
use anyhow::{Context, Result};
use log::info;
use std::io::{Read, Write};
use std::path::Path;

/// Scanner options from the config file, with command line overrides applied.
pub fn resolve_options(cli: &Cli) -> Result<ScanOptions> {
    let mut options = match &cli.config {
        Some(path) => config::load_options_file(path)?,
        None => ScanOptions::default(),
    };

    if cli.strict {
        options.unrecognized_lines = Tolerance::Reject;
        options.orphan_outcomes = Tolerance::Reject;
    }
    if cli.lenient_values {
        options.lenient_inline_values = true;
    }
    if cli.fatal_as_failed {
        options.fatal_as_failed = true;
    }
    if let Some(marker) = &cli.recap_marker {
        options.recap_marker = marker.clone();
    }
    if let Some(marker) = &cli.play_marker {
        options.play_marker_prefix = marker.clone();
    }
    if let Some(marker) = &cli.task_marker {
        options.task_marker_prefix = marker.clone();
    }

    Ok(options)
}

pub fn render_document(result: &ParseResult, format: OutputFormat) -> Result<String> {
    let document = match format {
        OutputFormat::Yaml => serde_yaml::to_string(result)?,
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(result)?;
            json.push('\n');
            json
        }
    };
    Ok(document)
}

fn read_transcript(path: Option<&Path>) -> Result<String> {
    let mut text = String::new();
    match path {
        Some(path) if path != Path::new("-") => {
            text = std::fs::read_to_string(path)
                .with_context(|| format!("could not read transcript {}", path.display()))?;
        }
        _ => {
            std::io::stdin()
                .read_to_string(&mut text)
                .context("could not read transcript from stdin")?;
        }
    }
    Ok(text)
}

pub fn run(cli: &Cli) -> Result<()> {
    let options = resolve_options(cli)?;
    let text = read_transcript(cli.transcript.as_deref())?;

    let result = parse_transcript(&text, &options)?;
    info!(
        "Parsed {} plays with {} tasks, recap for {} hosts",
        result.plays.len(),
        result.task_count(),
        result.recap.len()
    );

    let document = render_document(&result, cli.format)?;
    match &cli.output {
        Some(path) => std::fs::write(path, document)
            .with_context(|| format!("could not write {}", path.display()))?,
        None => std::io::stdout().write_all(document.as_bytes())?,
    }

    Ok(())
}
