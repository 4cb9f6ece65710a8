//! Configuration options for table encoding and decoding.
//!
//! ## Examples
//!
//! ```rust
//! use serde_marktable::{to_string_with_options, MarkOptions};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Data { x: i32, y: i32 }
//!
//! // Aligned columns (default)
//! let table = to_string_with_options(&Data { x: 1, y: 20 }, MarkOptions::new()).unwrap();
//! assert_eq!(table, "|x|y |\n|-|--|\n|1|20|");
//!
//! // No padding
//! let table = to_string_with_options(&Data { x: 1, y: 20 }, MarkOptions::compact()).unwrap();
//! assert_eq!(table, "|x|y|\n|-|-|\n|1|20|");
//! ```

use crate::user_info::UserInfo;

/// Configuration options for table encoding and decoding.
///
/// Controls column padding when rendering, the number of rows read when
/// decoding, and the out-of-band context handed to custom field logic.
///
/// # Examples
///
/// ```rust
/// use serde_marktable::{MarkOptions, UserInfo};
///
/// let options = MarkOptions::new()
///     .with_max_rows(10)
///     .with_user_info(UserInfo::new().with("locale", "en_US"));
/// assert!(options.padded);
/// assert_eq!(options.max_rows, Some(10));
/// ```
#[derive(Clone, Debug)]
pub struct MarkOptions {
    /// Pad every column to its widest cell.
    pub padded: bool,
    /// Upper bound on body rows decoded; `None` reads them all.
    pub max_rows: Option<usize>,
    pub user_info: UserInfo,
}

impl Default for MarkOptions {
    fn default() -> Self {
        MarkOptions {
            padded: true,
            max_rows: None,
            user_info: UserInfo::default(),
        }
    }
}

impl MarkOptions {
    /// Creates default options (padded columns, all rows, empty user info).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that render cells without alignment padding.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_marktable::MarkOptions;
    ///
    /// assert!(!MarkOptions::compact().padded);
    /// ```
    #[must_use]
    pub fn compact() -> Self {
        MarkOptions {
            padded: false,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_padding(mut self, padded: bool) -> Self {
        self.padded = padded;
        self
    }

    /// Limits decoding to the first `max_rows` body rows.
    #[must_use]
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    /// Sets the context visible to custom `Serialize`/`Deserialize` impls
    /// through [`user_info::current`](crate::user_info::current).
    #[must_use]
    pub fn with_user_info(mut self, user_info: UserInfo) -> Self {
        self.user_info = user_info;
        self
    }
}
