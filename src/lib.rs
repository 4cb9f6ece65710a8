//! # serde_marktable
//!
//! A Serde-compatible codec between typed records and Markdown tables.
//!
//! ## What does it do?
//!
//! Each record becomes one table row; each scalar field becomes one column,
//! named by its dotted field path (`price.currency`). Reading a table rebuilds
//! the typed records from the cells. The output is plain GitHub Flavored
//! Markdown, easy to read in a pull request and easy to edit by hand.
//!
//! ## Key Features
//!
//! - **Flattening**: nested structs and maps become dotted columns at any depth
//! - **Union Columns**: records with different optional fields share one table;
//!   columns are sorted, so output is byte-stable
//! - **Lists in Cells**: lists of scalars are comma-joined into a single cell
//! - **Serde Compatible**: works with `#[derive(Serialize, Deserialize)]`
//! - **Typed Errors**: every error names the field path at fault
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! serde_marktable = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Basic Serialization and Deserialization
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_marktable::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct House {
//!     street: String,
//!     number: u32,
//! }
//!
//! let house = House { street: "main st.".to_string(), number: 134 };
//!
//! let table = to_string(&house).unwrap();
//! assert_eq!(table, "|number|street  |\n|------|--------|\n|134   |main st.|");
//!
//! let back: House = from_str(&table).unwrap();
//! assert_eq!(house, back);
//! ```
//!
//! ### Many Records
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_marktable::{from_str_many, to_string_many};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Price {
//!     amount: f64,
//!     currency: String,
//! }
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Listing {
//!     id: u32,
//!     price: Price,
//!     tags: Vec<String>,
//! }
//!
//! let listings = vec![
//!     Listing {
//!         id: 1,
//!         price: Price { amount: 250000.0, currency: "EUR".to_string() },
//!         tags: vec!["garden".to_string(), "garage".to_string()],
//!     },
//!     Listing {
//!         id: 2,
//!         price: Price { amount: 99.5, currency: "USD".to_string() },
//!         tags: vec![],
//!     },
//! ];
//!
//! let table = to_string_many(&listings).unwrap();
//! assert!(table.starts_with("|id|price.amount|price.currency|tags         |"));
//!
//! let back: Vec<Listing> = from_str_many(&table).unwrap();
//! assert_eq!(back, listings);
//! ```
//!
//! ## What a table cannot hold
//!
//! A cell holds one line of text, so some shapes are rejected rather than
//! silently mangled:
//!
//! - structs, maps or lists *inside* a list
//! - enum variants that carry data (unit variants are written by name)
//! - text containing a line break
//!
//! List elements are split on `,` and field paths on `.`, so strings inside a
//! list and map keys should avoid those characters.
//!
//! See the [`format`] module for the exact text format.

pub mod de;
pub mod error;
pub mod format;
pub mod map;
pub mod options;
pub mod path;
pub mod ser;
pub mod table;
pub mod user_info;

pub use de::Deserializer;
pub use error::{Error, Result};
pub use map::{Cell, RowStore};
pub use options::MarkOptions;
pub use path::{Breadcrumb, ContainerKind, FieldPath, PathSegment};
pub use ser::Serializer;
pub use table::Table;
pub use user_info::UserInfo;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;
use tracing::debug;

fn encode_row<T>(value: &T, validate: bool) -> Result<RowStore>
where
    T: ?Sized + Serialize,
{
    let mut serializer = Serializer::new();
    serializer.encode(value)?;
    if validate {
        serializer.validate_tracked()?;
    }
    Ok(serializer.into_row())
}

fn render(rows: &[RowStore], options: &MarkOptions) -> Result<String> {
    let table = Table::from_row_stores(rows)?;
    debug!(
        "encoded {} rows into {} columns",
        table.rows().len(),
        table.columns().len()
    );
    Ok(table.render(options.padded))
}

fn decode_rows<T>(s: &str, limit: Option<usize>, options: &MarkOptions) -> Result<Vec<T>>
where
    T: DeserializeOwned,
{
    let _scope = user_info::enter(&options.user_info);
    let rows = Table::parse(s)?.into_row_stores(limit)?;
    debug!("decoding {} rows", rows.len());
    rows.iter().map(from_row).collect()
}

/// Serialize one record to a Markdown table with a single body row.
///
/// # Examples
///
/// ```rust
/// use serde_marktable::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Pet { name: Option<String> }
///
/// let table = to_string(&Pet { name: None }).unwrap();
/// assert_eq!(table, "|name|\n|----|\n|    |");
/// ```
///
/// # Errors
///
/// Returns an error if the record has a shape a flat row cannot hold, or if
/// a nested struct wrote no fields at all.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, MarkOptions::default())
}

/// Serialize one record to a Markdown table with custom options.
///
/// # Errors
///
/// Returns an error if the record cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: MarkOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let _scope = user_info::enter(&options.user_info);
    let row = encode_row(value, true)?;
    render(&[row], &options)
}

/// Serialize a collection of records to one Markdown table, one row each.
///
/// The records need not share a shape: the header is the sorted union of
/// every record's columns, and a record lacking a column gets an empty cell.
///
/// # Examples
///
/// ```rust
/// use serde_marktable::to_string_many;
/// use std::collections::BTreeMap;
///
/// let rows = vec![
///     BTreeMap::from([("street", "Elm"), ("number", "1")]),
///     BTreeMap::from([("street", "Oak"), ("zip", "90210")]),
/// ];
/// let table = to_string_many(&rows).unwrap();
/// assert_eq!(
///     table,
///     "|number|street|zip  |\n|------|------|-----|\n|1     |Elm   |     |\n|      |Oak   |90210|"
/// );
/// ```
///
/// # Errors
///
/// Returns an error if a record cannot be serialized, or if the collection
/// produced no column at all.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_many<I>(values: I) -> Result<String>
where
    I: IntoIterator,
    I::Item: Serialize,
{
    to_string_many_with_options(values, MarkOptions::default())
}

/// Serialize a collection of records to one Markdown table with custom options.
///
/// # Errors
///
/// Returns an error if a record cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_many_with_options<I>(values: I, options: MarkOptions) -> Result<String>
where
    I: IntoIterator,
    I::Item: Serialize,
{
    let _scope = user_info::enter(&options.user_info);
    let rows = values
        .into_iter()
        .map(|value| encode_row(&value, false))
        .collect::<Result<Vec<_>>>()?;
    render(&rows, &options)
}

/// Serialize one record to a writer as a Markdown table.
///
/// # Examples
///
/// ```rust
/// use serde_marktable::to_writer;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(buffer, b"|x|y|\n|-|-|\n|1|2|");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, MarkOptions::default())
}

/// Serialize one record to a writer with custom options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: MarkOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let table = to_string_with_options(value, options)?;
    writer
        .write_all(table.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Serialize one record into its flat [`RowStore`] without rendering a table.
///
/// # Examples
///
/// ```rust
/// use serde_marktable::{to_row, Cell};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Pig { name: String, tags: Vec<u8> }
///
/// let row = to_row(&Pig { name: "Napoleon".to_string(), tags: vec![] }).unwrap();
/// assert_eq!(row.get("name"), Some(&Cell::Value("Napoleon".to_string())));
/// assert_eq!(row.get("tags"), Some(&Cell::Placeholder));
/// ```
///
/// # Errors
///
/// Returns an error if the record cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_row<T>(value: &T) -> Result<RowStore>
where
    T: ?Sized + Serialize,
{
    encode_row(value, true)
}

/// Deserialize a record from a [`RowStore`].
///
/// # Errors
///
/// Returns an error if the cells cannot be read as type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_row<T>(row: &RowStore) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(Deserializer::new(row))
}

/// Deserialize the first body row of the first table in `s`.
///
/// # Examples
///
/// ```rust
/// use serde_marktable::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let text = "Points of interest:\n\n| x | y |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |\n";
/// let point: Point = from_str(text).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the text holds no table, the table has no body rows,
/// or the first row cannot be read as type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_str_with_options(s, MarkOptions::default())
}

/// Deserialize the first body row with custom options.
///
/// # Errors
///
/// Returns an error if the text holds no table, the table has no body rows,
/// or the first row cannot be read as type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<T>(s: &str, options: MarkOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    decode_rows(s, Some(1), &options)?
        .into_iter()
        .next()
        .ok_or_else(|| Error::data_corrupted("", "No decodable data found"))
}

/// Deserialize every body row of the first table in `s`.
///
/// # Errors
///
/// Returns an error if the text holds no table, the table has no body rows,
/// or any row cannot be read as type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_many<T>(s: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
{
    from_str_many_with_options(s, MarkOptions::default())
}

/// Deserialize body rows with custom options, reading at most
/// [`MarkOptions::max_rows`] rows.
///
/// # Examples
///
/// ```rust
/// use serde_marktable::{from_str_many_with_options, MarkOptions};
/// use std::collections::BTreeMap;
///
/// let text = "|n|\n|-|\n|1|\n|2|\n|3|";
/// let rows: Vec<BTreeMap<String, u8>> =
///     from_str_many_with_options(text, MarkOptions::new().with_max_rows(2)).unwrap();
/// assert_eq!(rows.len(), 2);
/// ```
///
/// # Errors
///
/// Returns an error if the text holds no table, no body row is read, or any
/// row cannot be read as type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_many_with_options<T>(s: &str, options: MarkOptions) -> Result<Vec<T>>
where
    T: DeserializeOwned,
{
    decode_rows(s, options.max_rows, &options)
}

/// Deserialize the first body row from an I/O stream of Markdown.
///
/// # Examples
///
/// ```rust
/// use serde_marktable::from_reader;
/// use serde::Deserialize;
/// use std::io::Cursor;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let cursor = Cursor::new(b"|x|y|\n|-|-|\n|1|2|");
/// let point: Point = from_reader(cursor).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if reading from the reader fails or the text cannot be
/// deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Deserialize the first body row from bytes of Markdown text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 or cannot be
/// deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::unexpected_source_format(&e.to_string()))?;
    from_str(s)
}
