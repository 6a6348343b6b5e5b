//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output, including colored output,
//! progress tracking, and formatted tables. This module abstracts away output details,
//! making it easy to change formatting globally.

use crate::contract::{ExecutionResult, MoveFailure};
use crate::preview::Preview;
use crate::snapshot::SnapshotEntry;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Progress bars for moves
/// - Summary tables, snapshots and previews
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use cluttercut::output::OutputFormatter;
    /// OutputFormatter::success("Folder reorganized!");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a progress bar for `total` file moves.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use cluttercut::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(10);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints how many files each touched folder received.
    pub fn summary_table(result: &ExecutionResult) {
        Self::header("SUMMARY");

        let mut folders: Vec<(&str, usize)> = result
            .after_snapshot
            .values()
            .flatten()
            .filter_map(|entry| match entry {
                SnapshotEntry::TouchedFolder { name, files } => Some((name.as_str(), files.len())),
                SnapshotEntry::Plain(_) => None,
            })
            .collect();
        folders.sort_by_key(|&(name, _)| name);

        let max_folder_len = folders
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max(6); // At least "Folder" width

        println!(
            "{:<width$} | {}",
            "Folder".bold(),
            "Files".bold(),
            width = max_folder_len
        );
        println!("{}", "-".repeat(max_folder_len + 10));

        for (folder, count) in &folders {
            println!(
                "{:<width$} | {} {}",
                folder,
                count.to_string().green(),
                pluralize(*count),
                width = max_folder_len
            );
        }

        println!("{}", "-".repeat(max_folder_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Moved".bold(),
            result.moved_count.to_string().green().bold(),
            pluralize(result.moved_count),
            width = max_folder_len
        );
        if result.failed_count > 0 {
            println!(
                "{:<width$} | {} {}",
                "Failed".bold(),
                result.failed_count.to_string().red().bold(),
                pluralize(result.failed_count),
                width = max_folder_len
            );
        }
    }

    /// Lists every failure with its raw reason.
    pub fn failures(errors: &[MoveFailure]) {
        if errors.is_empty() {
            return;
        }
        Self::header("FAILURES");
        for failure in errors {
            Self::error(&format!("{}: {}", failure.file_name, failure.reason));
        }
    }

    /// Prints the before and after listings of a run.
    pub fn snapshots(result: &ExecutionResult) {
        for (root, names) in &result.before_snapshot {
            Self::header(&format!("BEFORE  {}", root));
            for name in names {
                println!("  {}", name);
            }
        }
        for (root, entries) in &result.after_snapshot {
            Self::header(&format!("AFTER   {}", root));
            for entry in entries {
                match entry {
                    SnapshotEntry::Plain(name) => println!("  {}", name),
                    SnapshotEntry::TouchedFolder { name, files } => {
                        println!("  {}/", name.green().bold());
                        for file in files {
                            println!("    {} {}", "+".green(), file);
                        }
                    }
                }
            }
        }
    }

    /// Prints what a run would do.
    pub fn preview(preview: &Preview) {
        if preview.is_empty() {
            Self::info("No files match the current rules.");
        }

        for (destination, moves) in preview.by_destination() {
            let marker = if moves.iter().any(|m| m.destination_exists) {
                "existing"
            } else {
                "new"
            };
            println!("  {}/ ({})", destination.bold(), marker);
            for planned in moves {
                println!(
                    "    → {} {}",
                    planned.file_name,
                    format!("[rule {}]", planned.rule_index + 1).dimmed()
                );
            }
        }

        if !preview.unmatched_files.is_empty() || !preview.untouched_dirs.is_empty() {
            Self::header(&format!(
                "UNCHANGED ({} {}, {} {})",
                preview.untouched_dirs.len(),
                if preview.untouched_dirs.len() == 1 {
                    "folder"
                } else {
                    "folders"
                },
                preview.unmatched_files.len(),
                pluralize(preview.unmatched_files.len())
            ));
            for dir in &preview.untouched_dirs {
                println!("  {}/", dir);
            }
            for file in &preview.unmatched_files {
                println!("  {}", file);
            }
        }
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }
}

fn pluralize(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(0), "files");
        assert_eq!(pluralize(1), "file");
        assert_eq!(pluralize(2), "files");
    }

    #[test]
    fn test_progress_bar_length() {
        let pb = OutputFormatter::create_progress_bar(7);
        assert_eq!(pb.length(), Some(7));
        pb.finish_and_clear();
    }
}
