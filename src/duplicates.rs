//! Duplicate file detection by content digest.
//!
//! A scan walks a directory tree, hashes every regular file, and groups
//! paths by digest. Only groups with at least two members are reported.
//! Files that cannot be read are skipped rather than failing the scan;
//! a file vanishing mid-scan or sitting behind a permission wall is a
//! normal event for long-lived directories, not a reason to abort.

use crate::hash;
use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A set of files sharing one content digest.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup {
    /// Hex digest common to every member.
    pub digest: String,
    /// Absolute member paths, in the order the scan encountered them.
    pub paths: Vec<PathBuf>,
}

/// Scans directory trees for files with identical content.
pub struct DuplicateFinder;

impl DuplicateFinder {
    /// Finds all groups of byte-identical files under `root`.
    ///
    /// The walk is depth-first with each directory's entries visited in
    /// name order, so results are reproducible for an unchanged tree.
    /// Group order and the path order inside a group follow the walk.
    /// Symlinks and other non-regular entries are not followed, and
    /// unreadable files or subdirectories are skipped.
    ///
    /// # Errors
    ///
    /// Only a root that cannot be resolved or listed produces an error;
    /// everything below it is best-effort.
    pub fn find(root: &Path) -> io::Result<Vec<DuplicateGroup>> {
        let root = root.canonicalize()?;
        let mut groups: IndexMap<String, Vec<PathBuf>> = IndexMap::new();

        for (path, file_type) in Self::sorted_entries(&root)? {
            Self::visit(path, file_type, &mut groups);
        }

        Ok(groups
            .into_iter()
            .filter(|(_, paths)| paths.len() > 1)
            .map(|(digest, paths)| DuplicateGroup { digest, paths })
            .collect())
    }

    /// Total number of duplicate files a scan result describes, counting
    /// every member beyond the first in each group.
    pub fn redundant_count(groups: &[DuplicateGroup]) -> usize {
        groups.iter().map(|group| group.paths.len() - 1).sum()
    }

    fn visit(path: PathBuf, file_type: fs::FileType, groups: &mut IndexMap<String, Vec<PathBuf>>) {
        if file_type.is_file() {
            match hash::hash_file(&path) {
                Ok(digest) => {
                    let digest = digest.to_hex().to_string();
                    groups.entry(digest).or_default().push(path);
                }
                Err(error) => {
                    debug!(path = %path.display(), %error, "skipping unreadable file");
                }
            }
        } else if file_type.is_dir() {
            match Self::sorted_entries(&path) {
                Ok(entries) => {
                    for (child, child_type) in entries {
                        Self::visit(child, child_type, groups);
                    }
                }
                Err(error) => {
                    debug!(path = %path.display(), %error, "skipping unreadable directory");
                }
            }
        }
        // Symlinks and special files fall through untouched.
    }

    fn sorted_entries(dir: &Path) -> io::Result<Vec<(PathBuf, fs::FileType)>> {
        let mut entries: Vec<(PathBuf, fs::FileType)> = fs::read_dir(dir)?
            .filter_map(|entry| {
                let entry = entry.ok()?;
                let file_type = entry.file_type().ok()?;
                Some((entry.path(), file_type))
            })
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }
}
