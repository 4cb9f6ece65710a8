//! Markdown table text and its assembly from row stores.
//!
//! A [`Table`] is an ordered header of column names plus body rows of cell
//! text aligned to the header by position. On the way out, one
//! [`RowStore`] per record is merged into a table whose columns are the sorted
//! union of every field path written; on the way in, each body row is zipped
//! with the header to rebuild a row store.
//!
//! ## Examples
//!
//! ```rust
//! use serde_marktable::Table;
//!
//! let table = Table::parse("| number | street   |\n|---|---|\n| 134 | main st. |").unwrap();
//! assert_eq!(table.columns(), ["number", "street"]);
//! assert_eq!(table.rows()[0], ["134", "main st."]);
//!
//! assert_eq!(table.render(true), "|number|street  |\n|------|--------|\n|134   |main st.|");
//! ```

use crate::map::{Cell, RowStore};
use crate::{Error, Result};
use markdown::mdast::{Node, TableCell, TableRow};
use markdown::{to_mdast, Constructs, ParseOptions};
use std::collections::BTreeSet;
use std::fmt;
use tracing::trace;

const COLUMN_DELIMITER: char = '|';
const ESCAPE: char = '\\';

/// A parsed or assembled table: column names plus rows of cell text.
///
/// Every row holds exactly one cell per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds a table, padding or truncating each row to the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut cells| {
                cells.resize(width, String::new());
                cells
            })
            .collect();
        Table { columns, rows }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Finds the first table in a Markdown document.
    ///
    /// The document is parsed as GitHub Flavored Markdown. The first table row
    /// is the header; cell text is taken verbatim from the source between the
    /// cell's first and last inline node, trimmed, with `\|` and `\\` unescaped. Body
    /// rows shorter than the header are padded with empty cells.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnexpectedSourceFormat`] when the text holds no table.
    pub fn parse(text: &str) -> Result<Self> {
        let options = ParseOptions {
            constructs: Constructs::gfm(),
            ..Default::default()
        };

        let mdast = to_mdast(text, &options).map_err(|e| {
            Error::unexpected_source_format(&format!("failed to parse markdown: {}", e))
        })?;

        let table = mdast
            .children()
            .and_then(|children| {
                children.iter().find_map(|node| match node {
                    Node::Table(table) => Some(table),
                    _ => None,
                })
            })
            .ok_or_else(|| Error::unexpected_source_format("no table found in the document"))?;

        let mut rows = table.children.iter().filter_map(|node| match node {
            Node::TableRow(row) => Some(row_cells(text, row)),
            _ => None,
        });

        let columns = rows
            .next()
            .ok_or_else(|| Error::unexpected_source_format("table has no header row"))?;
        let table = Table::new(columns, rows.collect());

        trace!(
            "found table with {} columns and {} body rows",
            table.columns.len(),
            table.rows.len()
        );
        Ok(table)
    }

    /// Renders the table as Markdown.
    ///
    /// With `padded`, every column is padded with trailing spaces to its widest
    /// cell and the separator row is as wide as the column. Lines are joined by
    /// `\n` with no trailing newline.
    #[must_use]
    pub fn render(&self, padded: bool) -> String {
        let header: Vec<String> = self.columns.iter().map(|c| escape_cell(c)).collect();
        let body: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|cells| cells.iter().map(|c| escape_cell(c)).collect())
            .collect();

        let widths: Vec<usize> = (0..header.len())
            .map(|i| {
                if !padded {
                    return 1;
                }
                body.iter()
                    .map(|cells| cells[i].chars().count())
                    .chain(std::iter::once(header[i].chars().count()))
                    .max()
                    .unwrap_or(0)
                    .max(1)
            })
            .collect();

        let mut lines = Vec::with_capacity(body.len() + 2);
        lines.push(render_line(&header, &widths, padded));
        lines.push(render_separator(&widths));
        for cells in &body {
            lines.push(render_line(cells, &widths, padded));
        }
        lines.join("\n")
    }

    /// Assembles one table from per-record row stores.
    ///
    /// Columns are the lexicographically sorted union of every key in every
    /// store, so explicit nils and empty lists still produce a column. A
    /// record that lacks a column gets an empty cell.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValue`] when no store holds any key, or when
    /// a column name or cell contains a line break.
    pub fn from_row_stores(stores: &[RowStore]) -> Result<Self> {
        let columns: BTreeSet<&str> = stores
            .iter()
            .flat_map(|store| store.keys())
            .map(String::as_str)
            .collect();

        if columns.is_empty() {
            return Err(Error::unsupported_value(
                "",
                "nothing was encoded, a table needs at least one column",
            ));
        }

        for column in &columns {
            ensure_single_line(column, column)?;
        }

        let rows = stores
            .iter()
            .map(|store| {
                columns
                    .iter()
                    .map(|column| {
                        let text = store.get(column).map(Cell::as_text).unwrap_or("");
                        ensure_single_line(column, text)?;
                        Ok(text.to_string())
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Table {
            columns: columns.into_iter().map(str::to_string).collect(),
            rows,
        })
    }

    /// Splits the table into one row store per body row, keyed by the header.
    ///
    /// At most `limit` rows are returned when a limit is given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataCorrupted`] when no body row remains.
    pub fn into_row_stores(self, limit: Option<usize>) -> Result<Vec<RowStore>> {
        let Table { columns, rows } = self;
        let stores: Vec<RowStore> = rows
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|cells| {
                columns
                    .iter()
                    .cloned()
                    .zip(cells.into_iter().map(Cell::Value))
                    .collect()
            })
            .collect();

        if stores.is_empty() {
            return Err(Error::data_corrupted("", "No decodable data found"));
        }
        Ok(stores)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(true))
    }
}

fn row_cells(source: &str, row: &TableRow) -> Vec<String> {
    row.children
        .iter()
        .filter_map(|node| match node {
            Node::TableCell(cell) => Some(cell_text(source, cell)),
            _ => None,
        })
        .collect()
}

fn cell_text(source: &str, cell: &TableCell) -> String {
    let first = cell.children.first().and_then(Node::position);
    let last = cell.children.last().and_then(Node::position);

    let raw = match (first, last) {
        (Some(first), Some(last)) => source
            .get(first.start.offset..last.end.offset)
            .map(str::to_string),
        _ => None,
    };
    let raw = raw.unwrap_or_else(|| cell.children.iter().map(plain_text).collect());

    unescape_cell(raw.trim())
}

/// Text content of an inline node, used when source positions are missing.
fn plain_text(node: &Node) -> String {
    match node {
        Node::Text(text) => text.value.clone(),
        Node::InlineCode(code) => code.value.clone(),
        other => other
            .children()
            .map(|children| children.iter().map(plain_text).collect())
            .unwrap_or_default(),
    }
}

fn escape_cell(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == ESCAPE || ch == COLUMN_DELIMITER {
            escaped.push(ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

/// Reverses [`escape_cell`]. Any other backslash is kept as written, so
/// hand-written Markdown escapes such as `\*` survive verbatim.
fn unescape_cell(text: &str) -> String {
    let mut unescaped = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == ESCAPE {
            if let Some(&next) = chars.peek() {
                if next == ESCAPE || next == COLUMN_DELIMITER {
                    unescaped.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        unescaped.push(ch);
    }
    unescaped
}

fn ensure_single_line(column: &str, text: &str) -> Result<()> {
    if text.contains(['\n', '\r']) {
        Err(Error::unsupported_value(
            column,
            "cell text contains a line break, which a table row cannot hold",
        ))
    } else {
        Ok(())
    }
}

fn render_line(cells: &[String], widths: &[usize], padded: bool) -> String {
    let mut line = String::new();
    line.push(COLUMN_DELIMITER);
    for (cell, width) in cells.iter().zip(widths) {
        line.push_str(cell);
        if padded {
            let used = cell.chars().count();
            line.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
        }
        line.push(COLUMN_DELIMITER);
    }
    line
}

fn render_separator(widths: &[usize]) -> String {
    let mut line = String::new();
    line.push(COLUMN_DELIMITER);
    for width in widths {
        line.extend(std::iter::repeat('-').take(*width));
        line.push(COLUMN_DELIMITER);
    }
    line
}
