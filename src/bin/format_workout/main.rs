// ABOUTME: format-workout command-line tool
// ABOUTME: Formats workout text from a file or stdin and prints the structured workout as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Format a file, grounding on a library
//! format-workout notes.txt --library exercises.json
//!
//! # Read from stdin with a smaller grounding subset
//! echo "Bench 4x8 @ 135" | format-workout --limit 50
//!
//! # Show the prompts without calling the provider
//! format-workout notes.txt --library exercises.json --print-prompt
//! ```

mod input;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use workout_formatter::{
    config::{formatter_options_from_env, LlmConfig},
    formatter::WorkoutFormatter,
    llm::{build_system_prompt, build_user_prompt, create_provider},
    logging::LoggingConfig,
};

use input::{load_library, read_workout_text};

#[derive(Parser)]
#[command(
    name = "format-workout",
    about = "Turn free-form workout notes into structured JSON",
    long_about = "Reads workout text from a file (or stdin), asks the configured language model to structure it, validates the result, and prints it as JSON."
)]
struct Cli {
    /// Workout text file; reads stdin when omitted or `-`
    input: Option<PathBuf>,

    /// Exercise library JSON file (an array of reference exercises)
    #[arg(long, short = 'l')]
    library: Option<PathBuf>,

    /// Number of library entries embedded in the prompt
    #[arg(long)]
    limit: Option<usize>,

    /// Model identifier override
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// Print the system and user prompts instead of calling the provider
    #[arg(long)]
    print_prompt: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    LoggingConfig::for_cli(if cli.verbose { "debug" } else { "warn" }).init()?;

    let mut options = formatter_options_from_env()?;
    if let Some(limit) = cli.limit {
        options.grounding_limit = limit;
    }
    if let Some(model) = cli.model {
        options.model = Some(model);
    }

    let raw_text = read_workout_text(cli.input.as_deref()).await?;
    let library = load_library(cli.library.as_deref()).await?;

    if cli.print_prompt {
        let grounding = library.select_grounding_subset(options.grounding_limit);
        println!("=== SYSTEM ===\n{}", build_system_prompt(&grounding));
        println!("\n=== USER ===\n{}", build_user_prompt(&raw_text));
        return Ok(());
    }

    let provider = create_provider(&LlmConfig::from_env()?)?;
    info!(
        provider = provider.display_name(),
        model = options.model.as_deref().unwrap_or(provider.default_model()),
        "Formatting workout"
    );

    let formatter = WorkoutFormatter::with_options(provider, options);
    let record = formatter.format(&raw_text, &library).await?;

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
