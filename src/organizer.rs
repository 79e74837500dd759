/// File organization engine for moving files into category directories.
///
/// This module provides the engine that moves files into category-specific
/// subdirectories within a root directory. Construction validates the root
/// and creates every category folder up front; [`FileOrganizer::process`]
/// then moves a single file to a collision-free destination and returns an
/// [`ActionRecord`] describing the move, while [`FileOrganizer::organize_root`]
/// sweeps the whole top level of the root.
use crate::category::{CategoryTable, DEFAULT_CATEGORY};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Upper bound on candidate names tried when resolving a collision.
pub const MAX_COLLISION_ATTEMPTS: u32 = 10_000;

/// Errors that can occur during file organization operations.
#[derive(Debug)]
pub enum OrganizeError {
    /// The path does not refer to an existing regular file.
    NotAFile { path: PathBuf },
    /// The root directory path is invalid or doesn't exist.
    InvalidRoot {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to create a category directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to move a file to its category directory.
    MoveFailed {
        source_path: PathBuf,
        destination: PathBuf,
        source: std::io::Error,
    },
    /// Every candidate name up to the attempt cap was already taken.
    CollisionLimitReached { destination: PathBuf, attempts: u32 },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAFile { path } => {
                write!(f, "Not a regular file: {}", path.display())
            }
            Self::InvalidRoot { path, source } => {
                write!(f, "Invalid root directory {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::MoveFailed {
                source_path,
                destination,
                source,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source_path.display(),
                    destination.display(),
                    source
                )
            }
            Self::CollisionLimitReached {
                destination,
                attempts,
            } => {
                write!(
                    f,
                    "No free name for {} after {} attempts",
                    destination.display(),
                    attempts
                )
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// What was done to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Moved,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Moved => write!(f, "moved"),
        }
    }
}

/// A single completed file move.
///
/// Records the name the file had at its source, where it came from and
/// where it went, when the move happened, and what kind of action it was.
/// These records feed the per-run report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The file's name at its original location.
    pub file_name: String,
    /// Directory the file was moved out of.
    pub source_dir: PathBuf,
    /// Category directory the file was moved into.
    pub dest_dir: PathBuf,
    /// RFC 3339 timestamp (UTC) of the move.
    pub timestamp: String,
    /// The kind of action performed.
    pub action: ActionKind,
}

/// Picks a destination path in `dest_dir` that no existing entry occupies.
///
/// `file_name` itself is used when free. Otherwise a counter starting at 1
/// is appended to the stem (`cat.png`, `cat_1.png`, `cat_2.png`, ...) and
/// existence is re-checked against the live filesystem on every iteration.
///
/// The existence check and the move that follows it are two separate steps,
/// so a concurrent external writer can still claim the returned name in
/// between. That window is accepted; the move itself will then surface the
/// failure.
///
/// # Errors
///
/// Returns [`OrganizeError::CollisionLimitReached`] once
/// [`MAX_COLLISION_ATTEMPTS`] candidate names were all taken.
pub fn resolve_collision(dest_dir: &Path, file_name: &str) -> OrganizeResult<PathBuf> {
    let candidate = dest_dir.join(file_name);
    if !candidate.exists() {
        return Ok(candidate);
    }

    let (stem, suffix) = split_name(file_name);
    for counter in 1..=MAX_COLLISION_ATTEMPTS {
        let candidate = dest_dir.join(format!("{}_{}{}", stem, counter, suffix));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(OrganizeError::CollisionLimitReached {
        destination: dest_dir.join(file_name),
        attempts: MAX_COLLISION_ATTEMPTS,
    })
}

/// Splits a file name into stem and suffix, keeping the dot with the suffix.
/// A leading dot does not start a suffix, so ".gitignore" is all stem.
fn split_name(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => file_name.split_at(idx),
        _ => (file_name, ""),
    }
}

/// Moves files into category subdirectories beneath a root directory.
///
/// The engine owns the [`CategoryTable`] it classifies with and remembers
/// the category folders it created, so callers can ask whether a path is
/// already inside a destination folder.
pub struct FileOrganizer {
    root: PathBuf,
    table: CategoryTable,
    category_dirs: Vec<PathBuf>,
}

impl FileOrganizer {
    /// Creates an engine rooted at `root`, creating every category folder.
    ///
    /// The root is canonicalized so later path comparisons hold regardless
    /// of how callers spell the path. Each category in the table, plus the
    /// default category, gets its folder created here, once, before any
    /// file is moved.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizeError::InvalidRoot`] when `root` does not exist or
    /// is not a directory, and [`OrganizeError::DirectoryCreationFailed`]
    /// when a category folder cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fileflow::{CategoryTable, FileOrganizer};
    /// use std::path::Path;
    ///
    /// let organizer = FileOrganizer::new(Path::new("/tmp/downloads"), CategoryTable::new());
    /// match organizer {
    ///     Ok(engine) => println!("Organizing into {}", engine.root().display()),
    ///     Err(e) => eprintln!("Setup failed: {}", e),
    /// }
    /// ```
    pub fn new(root: &Path, table: CategoryTable) -> OrganizeResult<Self> {
        let root = root
            .canonicalize()
            .map_err(|e| OrganizeError::InvalidRoot {
                path: root.to_path_buf(),
                source: e,
            })?;

        if !root.is_dir() {
            return Err(OrganizeError::InvalidRoot {
                path: root,
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
            });
        }

        let mut names: Vec<&str> = table.names().collect();
        if !names.contains(&DEFAULT_CATEGORY) {
            names.push(DEFAULT_CATEGORY);
        }

        let mut category_dirs = Vec::with_capacity(names.len());
        for name in names {
            let dir = root.join(name);
            fs::create_dir_all(&dir).map_err(|e| OrganizeError::DirectoryCreationFailed {
                path: dir.clone(),
                source: e,
            })?;
            category_dirs.push(dir);
        }

        Ok(Self {
            root,
            table,
            category_dirs,
        })
    }

    /// The canonicalized root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The category table this engine classifies with.
    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// Whether `path` sits directly inside one of the category folders.
    pub fn is_destination(&self, path: &Path) -> bool {
        path.parent()
            .is_some_and(|parent| self.category_dirs.iter().any(|dir| dir == parent))
    }

    /// Classifies one file and moves it into its category folder.
    ///
    /// The path must refer to an existing regular file at call time;
    /// anything else fails with [`OrganizeError::NotAFile`]. The file is
    /// moved to a collision-free name inside the category folder, with
    /// `fs::rename` first and a verified copy-then-delete as the fallback
    /// for cross-device moves. The source is only removed after the copy
    /// is known to be complete.
    ///
    /// The engine keeps no memory of prior locations. Processing a file
    /// that already lives in a category folder classifies it again from
    /// where it is now, which renames it with a collision counter.
    pub fn process(&self, path: &Path) -> OrganizeResult<ActionRecord> {
        let is_file = fs::metadata(path).map(|m| m.is_file()).unwrap_or(false);
        if !is_file {
            return Err(OrganizeError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        let file_name = path
            .file_name()
            .ok_or_else(|| OrganizeError::NotAFile {
                path: path.to_path_buf(),
            })?
            .to_string_lossy()
            .to_string();

        let category = self.table.classify(path);
        let dest_dir = self.root.join(category);
        let destination = resolve_collision(&dest_dir, &file_name)?;

        Self::move_file(path, &destination)?;

        debug!(
            source = %path.display(),
            destination = %destination.display(),
            category,
            "moved file"
        );

        Ok(ActionRecord {
            file_name,
            source_dir: path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.root.clone()),
            dest_dir,
            timestamp: chrono::Utc::now().to_rfc3339(),
            action: ActionKind::Moved,
        })
    }

    /// Organizes every file sitting at the top level of the root.
    ///
    /// Entries are visited in name order. Directories (the category
    /// folders among them) and hidden dot-prefixed names are skipped. A
    /// file that vanishes between enumeration and processing is skipped
    /// too; any other failure stops the run and is returned.
    pub fn organize_root(&self) -> OrganizeResult<Vec<ActionRecord>> {
        let mut entries: Vec<PathBuf> = fs::read_dir(&self.root)
            .map_err(|e| OrganizeError::InvalidRoot {
                path: self.root.clone(),
                source: e,
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();
        entries.sort();

        let mut records = Vec::new();
        for path in entries {
            let name = match path.file_name() {
                Some(name) => name.to_string_lossy().to_string(),
                None => continue,
            };
            if name.starts_with('.') || path.is_dir() {
                continue;
            }

            match self.process(&path) {
                Ok(record) => records.push(record),
                Err(OrganizeError::NotAFile { path }) => {
                    debug!(path = %path.display(), "entry vanished before processing");
                }
                Err(error) => return Err(error),
            }
        }

        Ok(records)
    }

    fn move_file(source: &Path, destination: &Path) -> OrganizeResult<()> {
        if fs::rename(source, destination).is_ok() {
            return Ok(());
        }

        // rename fails across filesystems; copy then delete instead,
        // removing the source only after the copy has been verified.
        let expected = fs::metadata(source)
            .map_err(|e| OrganizeError::MoveFailed {
                source_path: source.to_path_buf(),
                destination: destination.to_path_buf(),
                source: e,
            })?
            .len();

        let written = fs::copy(source, destination).map_err(|e| OrganizeError::MoveFailed {
            source_path: source.to_path_buf(),
            destination: destination.to_path_buf(),
            source: e,
        })?;

        if written != expected {
            let _ = fs::remove_file(destination);
            return Err(OrganizeError::MoveFailed {
                source_path: source.to_path_buf(),
                destination: destination.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("copied {} bytes, expected {}", written, expected),
                ),
            });
        }

        fs::remove_file(source).map_err(|e| OrganizeError::MoveFailed {
            source_path: source.to_path_buf(),
            destination: destination.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn organizer_in(temp_dir: &TempDir) -> FileOrganizer {
        FileOrganizer::new(temp_dir.path(), CategoryTable::new())
            .expect("Failed to create organizer")
    }

    #[test]
    fn test_new_creates_category_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let organizer = organizer_in(&temp_dir);

        for name in ["Images", "Documents", "Audio", "Other"] {
            let dir = organizer.root().join(name);
            assert!(dir.is_dir(), "{} should exist", dir.display());
        }
    }

    #[test]
    fn test_new_rejects_missing_root() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let missing = temp_dir.path().join("gone");

        let result = FileOrganizer::new(&missing, CategoryTable::new());
        assert!(matches!(result, Err(OrganizeError::InvalidRoot { .. })));
    }

    #[test]
    fn test_new_rejects_file_root() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("not_a_dir.txt");
        fs::write(&file_path, "content").expect("Failed to write test file");

        let result = FileOrganizer::new(&file_path, CategoryTable::new());
        assert!(matches!(result, Err(OrganizeError::InvalidRoot { .. })));
    }

    #[test]
    fn test_process_moves_file_into_category() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let organizer = organizer_in(&temp_dir);

        let file_path = temp_dir.path().join("photo.jpg");
        fs::write(&file_path, "image bytes").expect("Failed to write test file");

        let record = organizer.process(&file_path).expect("Failed to process file");

        assert!(!file_path.exists());
        assert!(organizer.root().join("Images").join("photo.jpg").exists());
        assert_eq!(record.file_name, "photo.jpg");
        assert_eq!(record.dest_dir, organizer.root().join("Images"));
        assert_eq!(record.action, ActionKind::Moved);
        assert!(chrono::DateTime::parse_from_rfc3339(&record.timestamp).is_ok());
    }

    #[test]
    fn test_process_unknown_extension_goes_to_default() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let organizer = organizer_in(&temp_dir);

        let file_path = temp_dir.path().join("data.xyz");
        fs::write(&file_path, "bytes").expect("Failed to write test file");

        organizer.process(&file_path).expect("Failed to process file");
        assert!(organizer.root().join("Other").join("data.xyz").exists());
    }

    #[test]
    fn test_table_predicts_destination() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let organizer = organizer_in(&temp_dir);

        let file_path = temp_dir.path().join("track.mp3");
        fs::write(&file_path, "audio bytes").expect("Failed to write test file");

        let category = organizer.table().classify(&file_path);
        let record = organizer.process(&file_path).expect("Failed to process file");

        assert_eq!(record.dest_dir, organizer.root().join(category));
    }

    #[test]
    fn test_process_rejects_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let organizer = organizer_in(&temp_dir);

        let result = organizer.process(&organizer.root().join("Images"));
        assert!(matches!(result, Err(OrganizeError::NotAFile { .. })));
    }

    #[test]
    fn test_process_rejects_missing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let organizer = organizer_in(&temp_dir);

        let result = organizer.process(&temp_dir.path().join("gone.txt"));
        assert!(matches!(result, Err(OrganizeError::NotAFile { .. })));
    }

    #[test]
    fn test_process_preserves_content() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let organizer = organizer_in(&temp_dir);

        let file_path = temp_dir.path().join("notes.pdf");
        fs::write(&file_path, "%PDF-1.4 content").expect("Failed to write test file");

        organizer.process(&file_path).expect("Failed to process file");

        let moved = organizer.root().join("Documents").join("notes.pdf");
        let content = fs::read_to_string(&moved).expect("Failed to read moved file");
        assert_eq!(content, "%PDF-1.4 content");
    }

    #[test]
    fn test_process_resolves_repeated_collisions() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let organizer = organizer_in(&temp_dir);

        for _ in 0..3 {
            let file_path = temp_dir.path().join("cat.png");
            fs::write(&file_path, "png bytes").expect("Failed to write test file");
            organizer.process(&file_path).expect("Failed to process file");
        }

        let images = organizer.root().join("Images");
        assert!(images.join("cat.png").exists());
        assert!(images.join("cat_1.png").exists());
        assert!(images.join("cat_2.png").exists());
    }

    #[test]
    fn test_is_destination() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let organizer = organizer_in(&temp_dir);

        assert!(organizer.is_destination(&organizer.root().join("Images").join("cat.png")));
        assert!(organizer.is_destination(&organizer.root().join("Other").join("data.xyz")));
        assert!(!organizer.is_destination(&organizer.root().join("cat.png")));
        assert!(!organizer.is_destination(Path::new("/somewhere/else/cat.png")));
    }

    #[test]
    fn test_organize_root_sweeps_top_level() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let organizer = organizer_in(&temp_dir);

        fs::write(temp_dir.path().join("song.mp3"), "audio").expect("Failed to write test file");
        fs::write(temp_dir.path().join("photo.png"), "image").expect("Failed to write test file");
        fs::write(temp_dir.path().join(".hidden"), "dotfile").expect("Failed to write test file");
        fs::create_dir(temp_dir.path().join("keep")).expect("Failed to create subdirectory");
        fs::write(temp_dir.path().join("keep").join("inner.pdf"), "pdf")
            .expect("Failed to write test file");

        let records = organizer.organize_root().expect("Failed to organize");

        assert_eq!(records.len(), 2);
        // Name order: photo.png before song.mp3.
        assert_eq!(records[0].file_name, "photo.png");
        assert_eq!(records[1].file_name, "song.mp3");
        assert!(organizer.root().join("Audio").join("song.mp3").exists());
        assert!(organizer.root().join("Images").join("photo.png").exists());
        assert!(temp_dir.path().join(".hidden").exists());
        assert!(temp_dir.path().join("keep").join("inner.pdf").exists());
    }

    #[test]
    fn test_organize_root_is_idempotent() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let organizer = organizer_in(&temp_dir);

        fs::write(temp_dir.path().join("report.pdf"), "pdf").expect("Failed to write test file");

        let first = organizer.organize_root().expect("Failed to organize");
        let second = organizer.organize_root().expect("Failed to organize");

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert!(organizer.root().join("Documents").join("report.pdf").exists());
    }

    #[test]
    fn test_resolve_collision_prefers_plain_name() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let resolved = resolve_collision(temp_dir.path(), "cat.png").expect("Failed to resolve");
        assert_eq!(resolved, temp_dir.path().join("cat.png"));
    }

    #[test]
    fn test_resolve_collision_appends_counter() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("cat.png"), "a").expect("Failed to write test file");

        let resolved = resolve_collision(temp_dir.path(), "cat.png").expect("Failed to resolve");
        assert_eq!(resolved, temp_dir.path().join("cat_1.png"));

        fs::write(temp_dir.path().join("cat_1.png"), "b").expect("Failed to write test file");

        let resolved = resolve_collision(temp_dir.path(), "cat.png").expect("Failed to resolve");
        assert_eq!(resolved, temp_dir.path().join("cat_2.png"));
    }

    #[test]
    fn test_resolve_collision_without_extension() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("README"), "a").expect("Failed to write test file");

        let resolved = resolve_collision(temp_dir.path(), "README").expect("Failed to resolve");
        assert_eq!(resolved, temp_dir.path().join("README_1"));
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("cat.png"), ("cat", ".png"));
        assert_eq!(split_name("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_name("README"), ("README", ""));
        assert_eq!(split_name(".gitignore"), (".gitignore", ""));
    }

    #[test]
    fn test_action_record_serializes_action_lowercase() {
        let record = ActionRecord {
            file_name: "report.pdf".to_string(),
            source_dir: PathBuf::from("/downloads"),
            dest_dir: PathBuf::from("/downloads/Documents"),
            timestamp: chrono::Utc::now().to_rfc3339(),
            action: ActionKind::Moved,
        };

        let json = serde_json::to_string(&record).expect("Failed to serialize record");
        assert!(json.contains("\"action\":\"moved\""));
    }
}
