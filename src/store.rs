//! User-defined categories and the keyword file they are persisted to.
//!
//! Categories are kept in insertion order. Categorization is first-match-wins,
//! so the order here decides which category a transaction lands in when
//! keywords of two categories both occur in its details.
//!
//! Category names are trimmed wherever they are accepted, so `"Groceries "`
//! and `"Groceries"` name the same category.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{FinPalError, FinPalResult};
use crate::types::UNCATEGORIZED;

/// Default location of the keyword file, relative to the working directory.
pub const DEFAULT_CATEGORY_FILE: &str = "categories.json";

/// Lower-cases and trims a keyword the way it is stored and matched.
pub fn normalize_keyword(keyword: &str) -> String {
    keyword.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    keywords: Vec<String>,
}

impl Category {
    fn new(name: String) -> Self {
        Self {
            name,
            keywords: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized keywords in the order they were added.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// True when any keyword occurs in `details_lower`, which must already be
    /// lower-cased.
    pub fn matches(&self, details_lower: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| details_lower.contains(keyword.as_str()))
    }

    fn insert_keyword(&mut self, keyword: &str) -> bool {
        let keyword = normalize_keyword(keyword);
        if keyword.is_empty() || self.keywords.contains(&keyword) {
            return false;
        }
        self.keywords.push(keyword);
        true
    }
}

/// Ordered mapping of category name to keyword set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryStore {
    categories: Vec<Category>,
}

impl CategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        let name = name.trim();
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    /// Categories a transaction can be assigned to by hand, ending with
    /// the uncategorized label.
    pub fn options(&self) -> Vec<&str> {
        let mut names = self.category_names();
        names.push(UNCATEGORIZED);
        names
    }

    fn position(&self, name: &str) -> FinPalResult<usize> {
        let name = name.trim();
        self.categories
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| FinPalError::UnknownCategory(name.to_string()))
    }

    fn validate_new_name(&self, name: &str) -> FinPalResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FinPalError::InvalidCategoryName);
        }
        if name == UNCATEGORIZED {
            return Err(FinPalError::ReservedCategory(name.to_string()));
        }
        if self.contains(name) {
            return Err(FinPalError::DuplicateCategory(name.to_string()));
        }
        Ok(name.to_string())
    }

    /// Appends an empty category.
    pub fn add_category(&mut self, name: &str) -> FinPalResult<()> {
        let name = self.validate_new_name(name)?;
        self.categories.push(Category::new(name));
        Ok(())
    }

    /// Renames in place; position and keywords are kept.
    pub fn rename_category(&mut self, old: &str, new: &str) -> FinPalResult<()> {
        let old = old.trim();
        if old == UNCATEGORIZED {
            return Err(FinPalError::ReservedCategory(old.to_string()));
        }
        let index = self.position(old)?;
        if old == new.trim() {
            return Ok(());
        }
        let new = self.validate_new_name(new)?;
        self.categories[index].name = new;
        Ok(())
    }

    /// Removes the category. Transactions tagged with it must be moved to
    /// the uncategorized label by the caller.
    pub fn delete_category(&mut self, name: &str) -> FinPalResult<Category> {
        let name = name.trim();
        if name == UNCATEGORIZED {
            return Err(FinPalError::ReservedCategory(name.to_string()));
        }
        let index = self.position(name)?;
        Ok(self.categories.remove(index))
    }

    /// Returns `false` when the keyword was empty or already present.
    pub fn add_keyword(&mut self, category: &str, keyword: &str) -> FinPalResult<bool> {
        let index = self.position(category)?;
        Ok(self.categories[index].insert_keyword(keyword))
    }

    /// Returns `false` when the keyword was not present.
    pub fn remove_keyword(&mut self, category: &str, keyword: &str) -> FinPalResult<bool> {
        let index = self.position(category)?;
        let keyword = normalize_keyword(keyword);
        let keywords = &mut self.categories[index].keywords;

        let before = keywords.len();
        keywords.retain(|k| *k != keyword);
        Ok(keywords.len() != before)
    }
}

impl Serialize for CategoryStore {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.name, &category.keywords)?;
        }
        map.end()
    }
}

struct CategoryStoreVisitor;

impl<'de> Visitor<'de> for CategoryStoreVisitor {
    type Value = CategoryStore;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of category names to keyword lists")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut store = CategoryStore::new();

        while let Some((name, keywords)) = access.next_entry::<String, Vec<String>>()? {
            let name = name.trim().to_string();
            if name.is_empty() || name == UNCATEGORIZED {
                tracing::debug!(category = %name, "ignoring reserved category in keyword file");
                continue;
            }

            let index = match store.categories.iter().position(|c| c.name == name) {
                Some(index) => index,
                None => {
                    store.categories.push(Category::new(name));
                    store.categories.len() - 1
                }
            };
            for keyword in &keywords {
                store.categories[index].insert_keyword(keyword);
            }
        }

        Ok(store)
    }
}

impl<'de> Deserialize<'de> for CategoryStore {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(CategoryStoreVisitor)
    }
}

/// The JSON keyword file backing a [`CategoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFile {
    path: PathBuf,
}

impl Default for CategoryFile {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORY_FILE)
    }
}

impl CategoryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the store. A missing file is a first run and yields an empty
    /// store, as does a file that cannot be parsed.
    pub fn load(&self) -> FinPalResult<CategoryStore> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no category file yet, starting empty");
                return Ok(CategoryStore::new());
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<CategoryStore>(&content) {
            Ok(store) => {
                tracing::debug!(path = %self.path.display(), categories = store.len(), "loaded categories");
                Ok(store)
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "category file is corrupt, starting with no categories"
                );
                Ok(CategoryStore::new())
            }
        }
    }

    /// Writes to a sibling temporary file first and renames it over the
    /// original, so an interrupted write leaves the previous file intact.
    pub fn save(&self, store: &CategoryStore) -> FinPalResult<()> {
        let json = serde_json::to_string_pretty(store)?;

        let filename = self
            .path
            .file_name()
            .ok_or_else(|| {
                FinPalError::Io(std::io::Error::new(
                    ErrorKind::InvalidInput,
                    format!("category file path has no file name: {}", self.path.display()),
                ))
            })?
            .to_string_lossy();
        let tmppath = self.path.with_file_name(format!("{}.tmp", filename));

        fs::write(&tmppath, json)?;
        fs::rename(&tmppath, &self.path)?;

        tracing::info!(path = %self.path.display(), categories = store.len(), "saved categories");
        Ok(())
    }
}
