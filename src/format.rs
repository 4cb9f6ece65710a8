//! Markdown Table Format
//!
//! This module documents the table text this library reads and writes.
//!
//! # Overview
//!
//! A document holds records as one GitHub Flavored Markdown table: a header
//! row of column names, a separator row of dashes, and one body row per
//! record. Every column is a scalar slot of the record, named by its dotted
//! field path.
//!
//! ```text
//! |number|price.amount|price.currency|street  |
//! |------|------------|--------------|--------|
//! |134   |2000001.0   |USD           |main st.|
//! ```
//!
//! # Columns
//!
//! - A struct field or map entry adds one path segment: `price.currency`
//! - Integer map keys are written as digits: `pairs.1`
//! - Columns are sorted lexicographically by full path, so the same records
//!   always produce the same bytes
//! - When records differ in shape, the header is the union of every record's
//!   columns and a record lacking a column has an empty cell there
//! - A field written as nil, a list with no elements, or a map with no entries
//!   still gets a column
//!
//! # Cells
//!
//! | Rust value | Cell text |
//! |------------|-----------|
//! | `bool` | `true` or `false` |
//! | integers | decimal digits, optional `-` |
//! | floats | shortest round-trip form with `.0` on integral values: `1.0`, `320.12`, `NaN`, `inf` |
//! | `String`, `char` | the text itself |
//! | `None`, `()` | empty cell |
//! | unit enum variant | variant name: `Premium` |
//! | `Vec`, tuple, array | elements joined by `,` with no spaces: `-1,40,50` |
//!
//! A `None` inside a list is written `nil` (`false,nil`), and so is a bare
//! `None` at the document root, where an empty cell would be an empty column:
//!
//! ```text
//! |   |
//! |---|
//! |nil|
//! ```
//!
//! A `|` inside a cell is escaped as `\|` and a backslash as `\\`; any other
//! backslash read from a hand-written table is kept as written.
//!
//! # Whitespace
//!
//! Padding is cosmetic. Output pads each column with trailing spaces to its
//! widest cell unless [`MarkOptions::compact`](crate::MarkOptions::compact)
//! is used; input cells are trimmed before they are read, so hand-aligned
//! tables parse the same as compact ones.
//!
//! # Reading
//!
//! - The first table in the document is used; text around it is ignored
//! - The first table row is the header, regardless of column order
//! - Body rows shorter than the header are padded with empty cells
//! - An empty cell reads as `None` for optional fields, as an empty list for
//!   lists, and as an empty string for strings
//! - An optional list or map written empty reads back as `None`
//!
//! # Limitations
//!
//! - **Nesting**: a list element must be a scalar; structs, maps and lists
//!   inside a list are rejected on both encode and decode
//! - **Enums**: only unit variants have a cell form
//! - **Separators**: strings inside lists must not contain `,` and map keys
//!   must not contain `.`, which would read back as extra elements or segments
//! - **Line breaks**: a cell is one line; text with a line break is rejected
//! - **Empty strings**: `Some(String::new())` is written as an empty cell and
//!   reads back as `None`
//! - **One table**: additional tables in a document are ignored

// This module contains only documentation; no implementation code
