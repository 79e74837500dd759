//! Command-line run functions.
//!
//! This module wires the library together for the binary:
//! - One-shot organization of a directory
//! - Recursive duplicate scanning
//! - Continuous watch mode with Ctrl-C shutdown
//! - Optional JSON report of each run

use crate::config::Config;
use crate::duplicates::DuplicateFinder;
use crate::organizer::{ActionRecord, FileOrganizer};
use crate::output::OutputFormatter;
use crate::report::ReportWriter;
use crate::watch::DirectoryWatcher;
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{RecvTimeoutError, channel};
use std::time::Duration;

/// Organizes every top-level file in `dir` once.
///
/// Prints each move as it happens and a per-category summary at the end.
/// With `find_duplicates` set, the organized tree is scanned for
/// byte-identical files afterwards. With `write_report` set, a JSON
/// report of the run is written under the configured report directory.
///
/// # Examples
///
/// ```no_run
/// use fileflow::config::Config;
/// use fileflow::cli::run_organize;
/// use std::path::Path;
///
/// let config = Config::default();
/// match run_organize(Path::new("/tmp/downloads"), &config, false, false) {
///     Ok(()) => println!("Done"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_organize(
    dir: &Path,
    config: &Config,
    find_duplicates: bool,
    write_report: bool,
) -> Result<(), String> {
    OutputFormatter::info(&format!("Organizing contents of: {}", dir.display()));

    let organizer = FileOrganizer::new(dir, config.category_table())
        .map_err(|e| format!("Error preparing directory: {}", e))?;

    let records = organizer
        .organize_root()
        .map_err(|e| format!("Error organizing files: {}", e))?;

    for record in &records {
        OutputFormatter::record_moved(record);
    }
    OutputFormatter::summary(&records);

    if find_duplicates {
        run_duplicates(organizer.root())?;
    }

    if write_report {
        write_report_file(config, &records)?;
    }

    Ok(())
}

/// Scans `dir` recursively and prints groups of byte-identical files.
pub fn run_duplicates(dir: &Path) -> Result<(), String> {
    let spinner = OutputFormatter::scan_spinner(&format!(
        "Scanning {} for duplicates...",
        dir.display()
    ));
    let result = DuplicateFinder::find(dir);
    spinner.finish_and_clear();

    let groups = result.map_err(|e| format!("Error scanning {}: {}", dir.display(), e))?;

    OutputFormatter::duplicate_groups(&groups);
    if !groups.is_empty() {
        let redundant = DuplicateFinder::redundant_count(&groups);
        OutputFormatter::plain(&format!(
            "\n{} redundant {} across {} {}",
            redundant,
            if redundant == 1 { "copy" } else { "copies" },
            groups.len(),
            if groups.len() == 1 { "group" } else { "groups" },
        ));
    }

    Ok(())
}

/// Watches `dir` until Ctrl-C, organizing files as they appear.
///
/// Runs an initial sweep first so files already present get organized,
/// then keeps the directory tidy until the process is interrupted. Every
/// move is printed as it happens; the summary and optional report cover
/// the sweep and the watch phase together.
pub fn run_watch(dir: &Path, config: &Config, write_report: bool) -> Result<(), String> {
    let organizer = Arc::new(
        FileOrganizer::new(dir, config.category_table())
            .map_err(|e| format!("Error preparing directory: {}", e))?,
    );

    let mut records = organizer
        .organize_root()
        .map_err(|e| format!("Error organizing files: {}", e))?;
    for record in &records {
        OutputFormatter::record_moved(record);
    }

    let (record_tx, record_rx) = channel();
    let watcher = DirectoryWatcher::start(Arc::clone(&organizer), organizer.root(), record_tx)
        .map_err(|e| format!("Error starting watch: {}", e))?;

    let (stop_tx, stop_rx) = channel();
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(());
    })
    .map_err(|e| format!("Error installing signal handler: {}", e))?;

    OutputFormatter::info(&format!(
        "Watching {} (press Ctrl-C to stop)",
        organizer.root().display()
    ));

    loop {
        if stop_rx.try_recv().is_ok() {
            break;
        }
        match record_rx.recv_timeout(Duration::from_millis(200)) {
            Ok(record) => {
                OutputFormatter::record_moved(&record);
                records.push(record);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    watcher
        .stop()
        .map_err(|e| format!("Error stopping watch: {}", e))?;

    // Pick up anything organized between the signal and the stop.
    while let Ok(record) = record_rx.try_recv() {
        OutputFormatter::record_moved(&record);
        records.push(record);
    }

    OutputFormatter::summary(&records);

    if write_report {
        write_report_file(config, &records)?;
    }

    Ok(())
}

fn write_report_file(config: &Config, records: &[ActionRecord]) -> Result<(), String> {
    let writer = ReportWriter::new(&config.report_path);
    let path = writer
        .write(records)
        .map_err(|e| format!("Error writing report: {}", e))?;
    OutputFormatter::success(&format!("Report written to {}", path.display()));
    Ok(())
}
