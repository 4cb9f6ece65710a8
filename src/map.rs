//! Per-record row storage.
//!
//! This module provides [`RowStore`], the flat working set for one record: a
//! map from rendered field path to [`Cell`]. The encode engine fills one store
//! per record; the decode engine reads one store per table row.
//!
//! ## Cell states
//!
//! - key absent: nothing was encoded for this path
//! - [`Cell::Missing`]: an explicit nil, rendered as an empty cell
//! - [`Cell::Placeholder`]: a list was entered but no element written yet, so
//!   an empty list still yields a column
//! - [`Cell::Value`]: cell text
//!
//! ## Examples
//!
//! ```rust
//! use serde_marktable::{Cell, RowStore};
//!
//! let mut row = RowStore::new();
//! row.write_placeholder("tags");
//! row.write("tags", "rust", true);
//! row.write("tags", "serde", true);
//! assert_eq!(row.get("tags"), Some(&Cell::Value("rust,serde".to_string())));
//! ```

use crate::path::{FieldPath, PATH_SEPARATOR};
use indexmap::{IndexMap, IndexSet};

/// Separator between list elements inside one cell.
pub const LIST_SEPARATOR: char = ',';

/// Contents of one table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Explicit nil
    Missing,
    /// An entered list with no elements yet
    Placeholder,
    /// Cell text
    Value(String),
}

impl Cell {
    /// The text this cell renders as. Nil and placeholder cells are empty.
    #[must_use]
    pub fn as_text(&self) -> &str {
        match self {
            Cell::Value(text) => text,
            Cell::Missing | Cell::Placeholder => "",
        }
    }

    /// Whether the cell renders as an empty table cell.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.as_text().is_empty()
    }
}

/// An ordered map from rendered field path to cell, for exactly one record.
///
/// Keys keep first-write order; the table assembler sorts columns itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowStore(IndexMap<String, Cell>);

impl RowStore {
    #[must_use]
    pub fn new() -> Self {
        RowStore(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RowStore(IndexMap::with_capacity(capacity))
    }

    /// Writes scalar text at `key`.
    ///
    /// A pending list placeholder is replaced by the first element. Otherwise,
    /// when `appending` is set and the key already holds text, the value is
    /// joined with a comma; when it is not, the value replaces the cell.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_marktable::{Cell, RowStore};
    ///
    /// let mut row = RowStore::new();
    /// row.write("name", "first", false);
    /// row.write("name", "second", false);
    /// assert_eq!(row.get("name"), Some(&Cell::Value("second".to_string())));
    /// ```
    pub fn write(&mut self, key: &str, value: &str, appending: bool) {
        match self.0.get_mut(key) {
            Some(Cell::Value(existing)) if appending => {
                existing.push(LIST_SEPARATOR);
                existing.push_str(value);
            }
            Some(cell) => *cell = Cell::Value(value.to_string()),
            None => {
                self.0.insert(key.to_string(), Cell::Value(value.to_string()));
            }
        }
    }

    /// Records an explicit nil at `key`.
    pub fn write_nil(&mut self, key: &str) {
        self.0.insert(key.to_string(), Cell::Missing);
    }

    /// Marks `key` as an entered list so it gets a column even when empty.
    pub fn write_placeholder(&mut self, key: &str) {
        self.0.insert(key.to_string(), Cell::Placeholder);
    }

    /// Inserts a cell as read from a table.
    pub fn insert(&mut self, key: String, cell: Cell) -> Option<Cell> {
        self.0.insert(key, cell)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Cell> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the row, in write order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Cell> {
        self.0.keys()
    }

    /// Returns an iterator over the key-cell pairs of the row, in write order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Cell> {
        self.0.iter()
    }

    /// Whether anything was stored at `path` or beneath it.
    #[must_use]
    pub fn has_data(&self, path: &FieldPath) -> bool {
        let key = path.to_string();
        let found = self.0.contains_key(&key) || self.cells_under(&key).next().is_some();
        found
    }

    /// Whether any non-empty cell exists strictly beneath `path`.
    #[must_use]
    pub fn has_value_under(&self, path: &FieldPath) -> bool {
        let key = path.to_string();
        let found = self.cells_under(&key).any(|(_, cell)| !cell.is_blank());
        found
    }

    /// Distinct first segments of the keys beneath `path`, in write order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_marktable::{FieldPath, RowStore};
    ///
    /// let mut row = RowStore::new();
    /// row.write("pairs.eyes", "blue", false);
    /// row.write("pairs.hair", "fair", false);
    /// row.write("name", "test", false);
    ///
    /// let keys = row.child_keys(&FieldPath::parse("pairs"));
    /// assert_eq!(keys.into_iter().collect::<Vec<_>>(), vec!["eyes", "hair"]);
    /// ```
    #[must_use]
    pub fn child_keys(&self, path: &FieldPath) -> IndexSet<String> {
        let key = path.to_string();
        let mut children = IndexSet::new();
        for (rest, _) in self.cells_under(&key) {
            let first = rest.split(PATH_SEPARATOR).next().unwrap_or(rest);
            children.insert(first.to_string());
        }
        children
    }

    /// Cells beneath `key`, yielding the key remainder after the prefix.
    /// Every key lies beneath the root.
    fn cells_under<'a>(&'a self, key: &'a str) -> impl Iterator<Item = (&'a str, &'a Cell)> + 'a {
        self.0.iter().filter_map(move |(candidate, cell)| {
            if key.is_empty() {
                return (!candidate.is_empty()).then_some((candidate.as_str(), cell));
            }
            candidate
                .strip_prefix(key)
                .and_then(|rest| rest.strip_prefix(PATH_SEPARATOR))
                .filter(|rest| !rest.is_empty())
                .map(|rest| (rest, cell))
        })
    }
}

impl IntoIterator for RowStore {
    type Item = (String, Cell);
    type IntoIter = indexmap::map::IntoIter<String, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, Cell)> for RowStore {
    fn from_iter<T: IntoIterator<Item = (String, Cell)>>(iter: T) -> Self {
        RowStore(IndexMap::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_replaced_not_joined() {
        let mut row = RowStore::new();
        row.write_placeholder("ints");
        assert_eq!(row.get("ints"), Some(&Cell::Placeholder));

        row.write("ints", "1", true);
        row.write("ints", "2", true);
        assert_eq!(row.get("ints"), Some(&Cell::Value("1,2".to_string())));
    }

    #[test]
    fn test_nil_renders_blank() {
        let mut row = RowStore::new();
        row.write_nil("name");
        assert!(row.get("name").unwrap().is_blank());
        assert!(row.has_data(&FieldPath::parse("name")));
    }

    #[test]
    fn test_has_data_matches_nested_cells() {
        let mut row = RowStore::new();
        row.write("pig.name", "Napoleon", false);
        row.write_nil("pig.color");

        assert!(row.has_data(&FieldPath::parse("pig")));
        assert!(!row.has_data(&FieldPath::parse("pi")));
        assert!(row.has_value_under(&FieldPath::parse("pig")));

        let mut empty = RowStore::new();
        empty.write_nil("pig.name");
        assert!(!empty.has_value_under(&FieldPath::parse("pig")));
    }

    #[test]
    fn test_child_keys_at_root() {
        let mut row = RowStore::new();
        row.write("street", "Main", false);
        row.write("price.amount", "1.0", false);
        row.write("price.currency", "USD", false);

        let keys: Vec<_> = row.child_keys(&FieldPath::root()).into_iter().collect();
        assert_eq!(keys, vec!["street", "price"]);
    }
}
