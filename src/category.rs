/// Extension-based file categorization.
///
/// This module maps file extensions to category folder names through an
/// ordered [`CategoryTable`]. Lookup is pure string work with no I/O, so a
/// table can be shared freely between batch runs and a watcher.
///
/// # Examples
///
/// ```
/// use fileflow::category::{CategoryTable, DEFAULT_CATEGORY};
/// use std::path::Path;
///
/// let table = CategoryTable::new();
/// assert_eq!(table.classify(Path::new("photo.JPG")), "Images");
/// assert_eq!(table.classify(Path::new("notes.pdf")), "Documents");
/// assert_eq!(table.classify(Path::new("data.xyz")), DEFAULT_CATEGORY);
/// ```
use indexmap::IndexMap;
use std::path::Path;

/// Fallback category for files no table entry matches.
///
/// The default category always exists and is never listed in the table
/// itself; its folder is created alongside the configured ones.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Ordered mapping from category name to the extensions it claims.
///
/// Extensions are stored lower-cased with a leading dot. Iteration order is
/// insertion order, and classification returns the first category whose
/// extension list matches, so a table built from a configuration file
/// behaves deterministically even when an extension appears twice.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    categories: IndexMap<String, Vec<String>>,
}

impl CategoryTable {
    /// Creates a table with the built-in default categories.
    ///
    /// The defaults cover common image, document, and audio extensions.
    pub fn new() -> Self {
        let mut table = Self {
            categories: IndexMap::new(),
        };
        table.add_category("Images", &[".jpg", ".png", ".jpeg"]);
        table.add_category("Documents", &[".pdf", ".docx", ".xlsx"]);
        table.add_category("Audio", &[".mp3", ".wav"]);
        table
    }

    /// Creates a table from raw category entries, normalizing each extension.
    ///
    /// Entries keep the order of the input map. Extensions are lower-cased
    /// and given a leading dot when missing; empty strings are dropped.
    pub fn from_map(entries: IndexMap<String, Vec<String>>) -> Self {
        let mut table = Self {
            categories: IndexMap::new(),
        };
        for (name, extensions) in entries {
            let extensions: Vec<&str> = extensions.iter().map(String::as_str).collect();
            table.add_category(&name, &extensions);
        }
        table
    }

    /// Adds a category with its extensions, normalizing as in [`from_map`].
    ///
    /// Adding a name that already exists replaces its extension list but
    /// keeps its original position in the table.
    ///
    /// [`from_map`]: CategoryTable::from_map
    pub fn add_category(&mut self, name: &str, extensions: &[&str]) {
        let normalized = extensions
            .iter()
            .filter(|ext| !ext.is_empty())
            .map(|ext| {
                let lower = ext.to_lowercase();
                if lower.starts_with('.') {
                    lower
                } else {
                    format!(".{}", lower)
                }
            })
            .collect();
        self.categories.insert(name.to_string(), normalized);
    }

    /// Returns the category name for a file path.
    ///
    /// The extension is the part of the file name after the last dot,
    /// compared case-insensitively against the table in order. Files with
    /// no extension, and files whose extension matches nothing, classify
    /// as [`DEFAULT_CATEGORY`].
    pub fn classify(&self, path: &Path) -> &str {
        let Some(extension) = path.extension() else {
            return DEFAULT_CATEGORY;
        };
        let extension = format!(".{}", extension.to_string_lossy().to_lowercase());

        self.categories
            .iter()
            .find(|(_, extensions)| extensions.iter().any(|known| *known == extension))
            .map(|(name, _)| name.as_str())
            .unwrap_or(DEFAULT_CATEGORY)
    }

    /// Category names in table order, not including the default category.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Number of configured categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// True when no categories are configured.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::new()
    }
}
