//! Error types for Markdown table encoding and decoding.
//!
//! Every failure aborts the whole encode or decode call. Errors are typed
//! values rather than plain strings, and all data-related variants carry the
//! dotted field path of the offending cell so tooling can point at the exact
//! column at fault.
//!
//! ## Error Categories
//!
//! - **Structural**: the text has no table, or the table has no body rows
//!   ([`Error::UnexpectedSourceFormat`], [`Error::DataCorrupted`])
//! - **Shape**: the requested type conflicts with the cells, or a table would
//!   have to live inside a cell ([`Error::UnsupportedNestedContainer`],
//!   [`Error::UnsupportedFormat`], [`Error::KeyNotFound`], [`Error::ValueNotFound`])
//! - **Value**: a present cell cannot be parsed as the requested scalar
//!   ([`Error::TypeMismatch`])
//! - **Developer-shape**: a value has no single-cell representation, such as an
//!   enum variant carrying data ([`Error::UnsupportedValue`])
//!
//! ## Examples
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_marktable::{from_str, Error};
//!
//! #[derive(Deserialize, Debug)]
//! struct Point { x: i32, y: i32 }
//!
//! let result: Result<Point, Error> = from_str("|x|\n|-|\n|1|");
//! match result {
//!     Err(Error::KeyNotFound { path }) => assert_eq!(path, "y"),
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```

use crate::path::FieldPath;
use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur during table encoding/decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// The source text does not contain a table
    #[error("Unexpected source format: {0}")]
    UnexpectedSourceFormat(String),

    /// The table, or one of its cells, cannot be decoded
    #[error("Data corrupted at '{path}': {msg}")]
    DataCorrupted { path: String, msg: String },

    /// A required cell has no column in the table
    #[error("No value associated with key '{path}'")]
    KeyNotFound { path: String },

    /// A list ran out of elements before the requested type was complete
    #[error("Value not found at '{path}': {msg}")]
    ValueNotFound { path: String, msg: String },

    /// A cell exists but cannot be read as the requested type
    #[error("Type mismatch at '{path}': expected {expected}, found '{found}'")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// Decoding requested a shape a flat table cannot hold
    #[error("Unsupported format at '{path}': {msg}")]
    UnsupportedFormat { path: String, msg: String },

    /// A value has no single-cell representation
    #[error("Unsupported value at '{path}': {msg}")]
    UnsupportedValue { path: String, msg: String },

    /// A keyed or unkeyed container was encoded inside a list
    #[error("Unsupported nested container at '{path}': a table cell cannot hold a nested table")]
    UnsupportedNestedContainer { path: String },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates an error for text that does not contain a table.
    pub fn unexpected_source_format(msg: &str) -> Self {
        Error::UnexpectedSourceFormat(msg.to_string())
    }

    /// Creates a data corruption error at the given path.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_marktable::Error;
    ///
    /// let err = Error::data_corrupted("", "No decodable data found");
    /// assert!(err.to_string().contains("No decodable data"));
    /// ```
    pub fn data_corrupted(path: &str, msg: &str) -> Self {
        Error::DataCorrupted {
            path: path.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates a missing key error for the given field path.
    pub fn key_not_found(path: &str) -> Self {
        Error::KeyNotFound {
            path: path.to_string(),
        }
    }

    /// Creates an error for a list that ended too early.
    pub fn value_not_found(path: &str, msg: &str) -> Self {
        Error::ValueNotFound {
            path: path.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates a type mismatch error when a cell cannot be parsed as `expected`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_marktable::Error;
    ///
    /// let err = Error::type_mismatch("price.amount", "f64", "cheap");
    /// assert!(err.to_string().contains("expected f64"));
    /// assert_eq!(err.path(), Some("price.amount"));
    /// ```
    pub fn type_mismatch(path: &str, expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            path: path.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an error for a decode request a flat table cannot satisfy.
    pub fn unsupported_format(path: &str, msg: &str) -> Self {
        Error::UnsupportedFormat {
            path: path.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates an error for a value that has no single-cell representation.
    pub fn unsupported_value(path: &str, msg: &str) -> Self {
        Error::UnsupportedValue {
            path: path.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates an error for a container nested inside a list.
    pub fn unsupported_nested_container(path: &str) -> Self {
        Error::UnsupportedNestedContainer {
            path: path.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the dotted field path the error refers to, if it has one.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::DataCorrupted { path, .. }
            | Error::KeyNotFound { path }
            | Error::ValueNotFound { path, .. }
            | Error::TypeMismatch { path, .. }
            | Error::UnsupportedFormat { path, .. }
            | Error::UnsupportedValue { path, .. }
            | Error::UnsupportedNestedContainer { path } => Some(path),
            Error::Io(_) | Error::UnexpectedSourceFormat(_) | Error::Custom(_) => None,
        }
    }

    /// Returns the offending field path parsed into segments.
    #[must_use]
    pub fn field_path(&self) -> Option<FieldPath> {
        self.path().map(FieldPath::parse)
    }

    /// Stamps `path` onto errors raised by serde visitors, which do not know
    /// where in the record they were produced. Errors that already carry a
    /// path are returned unchanged.
    pub(crate) fn at(self, at: &FieldPath) -> Self {
        match self {
            Error::Custom(msg) => Error::data_corrupted(&at.to_string(), &msg),
            Error::DataCorrupted { path, msg } if path.is_empty() => Error::DataCorrupted {
                path: at.to_string(),
                msg,
            },
            Error::ValueNotFound { path, msg } if path.is_empty() => Error::ValueNotFound {
                path: at.to_string(),
                msg,
            },
            Error::TypeMismatch {
                path,
                expected,
                found,
            } if path.is_empty() => Error::TypeMismatch {
                path: at.to_string(),
                expected,
                found,
            },
            other => other,
        }
    }

    /// Rewrites a bare `missing_field` error into the full path of the field
    /// inside the struct at `parent`.
    pub(crate) fn within_struct(mut self, parent: &FieldPath, fields: &[&str]) -> Self {
        if let Error::KeyNotFound { path } = &mut self {
            if !parent.is_root() && fields.contains(&path.as_str()) {
                *path = format!("{}.{}", parent, path);
            }
        }
        self
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    fn invalid_type(unexp: serde::de::Unexpected, exp: &dyn serde::de::Expected) -> Self {
        Error::TypeMismatch {
            path: String::new(),
            expected: exp.to_string(),
            found: unexp.to_string(),
        }
    }

    fn invalid_value(unexp: serde::de::Unexpected, exp: &dyn serde::de::Expected) -> Self {
        Error::TypeMismatch {
            path: String::new(),
            expected: exp.to_string(),
            found: unexp.to_string(),
        }
    }

    fn invalid_length(len: usize, exp: &dyn serde::de::Expected) -> Self {
        Error::ValueNotFound {
            path: String::new(),
            msg: format!("list ended after {} element(s), expected {}", len, exp),
        }
    }

    fn missing_field(field: &'static str) -> Self {
        Error::key_not_found(field)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
