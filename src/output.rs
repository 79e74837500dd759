//! Output formatting and styling for the command line.
//!
//! Centralizes colored output, the scan spinner, and the per-run summary
//! so the run functions stay focused on orchestration.

use crate::duplicates::DuplicateGroup;
use crate::organizer::ActionRecord;
use colored::*;
use indexmap::IndexMap;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Writes styled terminal output.
///
/// Success lines get a green checkmark, errors a red cross, warnings a
/// yellow sign; informational lines print in cyan.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
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

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints one completed move as `name -> Category/`.
    pub fn record_moved(record: &ActionRecord) {
        let dest = record
            .dest_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| record.dest_dir.display().to_string());
        Self::success(&format!("{} -> {}/", record.file_name, dest));
    }

    /// Prints every duplicate group with its member paths.
    pub fn duplicate_groups(groups: &[DuplicateGroup]) {
        if groups.is_empty() {
            Self::success("No duplicate files found");
            return;
        }

        Self::header("DUPLICATES");
        for group in groups {
            let short = group.digest.get(..12).unwrap_or(&group.digest);
            println!("{} ({} files)", short.yellow(), group.paths.len());
            for path in &group.paths {
                println!("  {}", path.display());
            }
        }
    }

    /// Prints a summary table of one run, counting moves per category.
    pub fn summary(records: &[ActionRecord]) {
        if records.is_empty() {
            Self::plain("Nothing to organize");
            return;
        }

        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for record in records {
            let category = record
                .dest_dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| record.dest_dir.display().to_string());
            *counts.entry(category).or_insert(0) += 1;
        }

        Self::header("SUMMARY");

        let width = counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(8);

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));

        for (category, count) in &counts {
            let file_word = if *count == 1 { "file" } else { "files" };
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                file_word,
                width = width
            );
        }

        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            records.len().to_string().green().bold(),
            if records.len() == 1 { "file" } else { "files" },
            width = width
        );
    }

    /// Creates a spinner for long-running scans.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use fileflow::output::OutputFormatter;
    /// let spinner = OutputFormatter::scan_spinner("Scanning for duplicates...");
    /// // ... do the work ...
    /// spinner.finish_and_clear();
    /// ```
    pub fn scan_spinner(message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("Invalid progress bar template"),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(message.to_string());
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_duplicate_groups_accepts_any_digest_length() {
        let groups = vec![
            DuplicateGroup {
                digest: "ab12".to_string(),
                paths: vec![PathBuf::from("/a"), PathBuf::from("/b")],
            },
            DuplicateGroup {
                digest: "c".repeat(64),
                paths: vec![PathBuf::from("/c"), PathBuf::from("/d")],
            },
        ];

        OutputFormatter::duplicate_groups(&groups);
    }
}
