//! Out-of-band context for custom field logic.
//!
//! Serde's `Serialize` and `Deserialize` traits have no slot for caller data,
//! so a [`UserInfo`] supplied through [`MarkOptions`](crate::MarkOptions) is
//! made visible to hand-written impls via [`current`] for the duration of one
//! encode or decode call. The context is per thread and read-only: the engine
//! never mutates it, and nested calls restore the outer context on return.
//!
//! ## Examples
//!
//! ```rust
//! use serde::{Serialize, Serializer};
//! use serde_marktable::{to_string_with_options, user_info, MarkOptions, UserInfo};
//!
//! struct Greeting;
//!
//! impl Serialize for Greeting {
//!     fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
//!         let lang = user_info::current().get("lang").unwrap_or("en").to_string();
//!         serializer.serialize_str(if lang == "nl" { "hallo" } else { "hello" })
//!     }
//! }
//!
//! #[derive(Serialize)]
//! struct Card { greeting: Greeting }
//!
//! let options = MarkOptions::new().with_user_info(UserInfo::new().with("lang", "nl"));
//! let table = to_string_with_options(&Card { greeting: Greeting }, options).unwrap();
//! assert!(table.contains("hallo"));
//! ```

use indexmap::IndexMap;
use std::cell::RefCell;
use std::sync::Arc;

/// Caller-supplied key/value context, cheap to clone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserInfo(Arc<IndexMap<String, String>>);

impl UserInfo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the context with `key` set to `value`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        Arc::make_mut(&mut self.0).insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, String> {
        self.0.iter()
    }
}

thread_local! {
    static ACTIVE: RefCell<Vec<UserInfo>> = const { RefCell::new(Vec::new()) };
}

/// Returns the context of the encode or decode call running on this thread,
/// or an empty context outside of one.
#[must_use]
pub fn current() -> UserInfo {
    ACTIVE.with(|active| active.borrow().last().cloned().unwrap_or_default())
}

/// Keeps a context active until dropped.
#[must_use = "the context is deactivated when the guard is dropped"]
pub(crate) struct Scope(());

impl Drop for Scope {
    fn drop(&mut self) {
        ACTIVE.with(|active| {
            active.borrow_mut().pop();
        });
    }
}

/// Makes `info` the current context until the returned guard is dropped.
pub(crate) fn enter(info: &UserInfo) -> Scope {
    ACTIVE.with(|active| active.borrow_mut().push(info.clone()));
    Scope(())
}
