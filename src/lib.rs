//! fileflow - automatic file organization by category
//!
//! This library moves files into category folders based on their extension,
//! resolves destination name collisions with a numeric suffix, detects
//! duplicate file content by digest, and can watch a directory tree so new
//! files are organized as they appear. Completed moves are reported as
//! [`ActionRecord`] values which a caller may collect, stream, or persist
//! as a JSON report.

pub mod category;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod hash;
pub mod organizer;
pub mod output;
pub mod report;
pub mod watch;

pub use category::{CategoryTable, DEFAULT_CATEGORY};
pub use config::{Config, ConfigError};
pub use duplicates::{DuplicateFinder, DuplicateGroup};
pub use organizer::{ActionKind, ActionRecord, FileOrganizer, OrganizeError, OrganizeResult};
pub use report::ReportWriter;
pub use watch::{DirectoryWatcher, WatchError};

pub use cli::{run_duplicates, run_organize, run_watch};
