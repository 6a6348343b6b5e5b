//! Command-line interface module for cluttercut.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Rule loading from configuration files and flags
//! - Dry-run previews
//! - Running the engine and reporting its result

use crate::config::RulesConfig;
use crate::contract::{ExecuteRequest, ExecutionResult, ReadFolderRequest};
use crate::engine::{MoveOutcome, ReorganizeEngine};
use crate::folder_service::read_folder;
use crate::fs_ops::OsFileSystem;
use crate::output::OutputFormatter;
use crate::preview::preview;
use crate::rules::Rule;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Move the files at the top of a folder into subfolders by rule.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Folder to reorganize
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub folder: PathBuf,

    /// Rules file (defaults to .cluttercutrc.toml, then ~/.config/cluttercut/config.toml)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Extra rule as KIND:VALUE=FOLDER, e.g. ext:pdf=Documents or name:invoice=Invoices
    #[arg(short, long = "rule", num_args = 1, action = clap::ArgAction::Append)]
    pub rules: Vec<String>,

    /// Only show what would be moved
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Print debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Runs the CLI application for parsed arguments.
///
/// Returns an error if rules cannot be loaded or if any file failed to move.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use cluttercut::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["cluttercut", "/path/to/Downloads", "--rule", "ext:pdf=Documents"]);
/// if let Err(e) = run_cli(&cli) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<(), String> {
    let rules = load_rules(cli.config.as_deref(), &cli.rules)?;

    if cli.dry_run {
        organize_folder_dry_run(&cli.folder, &rules)
    } else {
        organize_folder(&cli.folder, rules, cli.json)
    }
}

/// Loads configured rules and appends the ones given as flags.
pub fn load_rules(config_path: Option<&Path>, specs: &[String]) -> Result<Vec<Rule>, String> {
    let mut config = RulesConfig::load(config_path)
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    config
        .extend_from_specs(specs.iter().map(String::as_str))
        .map_err(|e| format!("Error in --rule: {}", e))?;

    if config.rules.is_empty() {
        return Err("No rules given. Use --rule or a configuration file.".to_string());
    }
    Ok(config.rules)
}

/// Moves matched files and reports the result.
pub fn organize_folder(base_path: &Path, rules: Vec<Rule>, json: bool) -> Result<(), String> {
    let folder_path = base_path.to_string_lossy().to_string();
    let request = ExecuteRequest::new(folder_path.clone(), rules);
    let engine = ReorganizeEngine::new();

    let result = if json {
        engine.execute(&request)
    } else {
        OutputFormatter::info(&format!("Organizing contents of: {}", base_path.display()));

        // Advisory count for the progress bar; the engine rescans on its own.
        let listing = read_folder(&OsFileSystem, &ReadFolderRequest { folder_path });
        let expected = preview(&listing.files, &request.rules).planned.len();
        let pb = OutputFormatter::create_progress_bar(expected as u64);

        let result = engine.execute_with_observer(&request, |outcome| {
            match outcome {
                MoveOutcome::Moved(moved) => {
                    pb.set_message(format!("{} → {}/", moved.original_name, moved.destination))
                }
                MoveOutcome::Failed(failure) => {
                    pb.println(format!("✗ {}: {}", failure.file_name, failure.reason))
                }
            }
            pb.inc(1);
        });
        pb.finish_and_clear();
        result
    };

    report(&result, json)?;

    if result.success {
        Ok(())
    } else if result.is_partial_success() {
        Err(format!(
            "{} of {} files could not be moved",
            result.failed_count,
            result.moved_count + result.failed_count
        ))
    } else {
        Err("Reorganization failed".to_string())
    }
}

fn report(result: &ExecutionResult, json: bool) -> Result<(), String> {
    if json {
        let text = serde_json::to_string_pretty(result)
            .map_err(|e| format!("Error serializing result: {}", e))?;
        println!("{}", text);
        return Ok(());
    }

    if result.moved_count == 0 && result.failed_count == 0 && result.success {
        OutputFormatter::info("No files matched any rule. Nothing was moved.");
        return Ok(());
    }

    OutputFormatter::summary_table(result);
    OutputFormatter::failures(&result.errors);
    OutputFormatter::snapshots(result);

    if result.success {
        OutputFormatter::success("Reorganization complete!");
    } else if result.is_partial_success() {
        OutputFormatter::warning("Some files could not be moved. Please review errors above.");
    }
    Ok(())
}

/// Shows what would be moved without making any changes.
pub fn organize_folder_dry_run(base_path: &Path, rules: &[Rule]) -> Result<(), String> {
    OutputFormatter::dry_run_notice(&format!("Analyzing contents of: {}", base_path.display()));

    let listing = read_folder(
        &OsFileSystem,
        &ReadFolderRequest {
            folder_path: base_path.to_string_lossy().to_string(),
        },
    );
    if let Some(error) = listing.error {
        return Err(error);
    }

    let planned = preview(&listing.files, rules);
    OutputFormatter::header("PLANNED MOVES");
    OutputFormatter::preview(&planned);

    OutputFormatter::plain("");
    OutputFormatter::success(&format!(
        "Dry run complete. {} file(s) would be moved. No files were modified.",
        planned.planned.len()
    ));
    Ok(())
}
