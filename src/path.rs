//! Field paths and traversal breadcrumbs.
//!
//! A [`FieldPath`] names one scalar slot in a record tree and renders as the
//! dot-joined column name used in the table header (`price.currency`). A
//! [`Breadcrumb`] records where a traversal currently sits, including the kind
//! of container each step entered, so the engines can reject shapes a flat
//! table cannot hold.
//!
//! ## Examples
//!
//! ```rust
//! use serde_marktable::{FieldPath, PathSegment};
//!
//! let path = FieldPath::root()
//!     .child(PathSegment::name("price"))
//!     .child(PathSegment::name("currency"));
//! assert_eq!(path.to_string(), "price.currency");
//! assert_eq!(FieldPath::parse("price.currency"), path);
//! ```
//!
//! Segment text must not itself contain `.`; a key like `example.com` renders
//! fine but cannot be told apart from two nested segments when reading back.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Separator between segments of a rendered field path.
pub const PATH_SEPARATOR: char = '.';

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A struct field or string-like map key
    Name(String),
    /// An unsigned integer map key
    Index(usize),
}

impl PathSegment {
    /// Segment under which a record delegates part of its shape to a base
    /// shape. Fields renamed to `super` land in `super.*` columns of the same row.
    pub const SUPER: &'static str = "super";

    pub fn name(name: impl Into<String>) -> Self {
        PathSegment::Name(name.into())
    }

    /// The `super` delegation segment.
    #[must_use]
    pub fn super_segment() -> Self {
        PathSegment::Name(Self::SUPER.to_string())
    }

    fn parse(text: &str) -> Self {
        if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = text.parse() {
                return PathSegment::Index(index);
            }
        }
        PathSegment::Name(text.to_string())
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Name(name) => f.write_str(name),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Ordered sequence of segments locating a scalar slot in a record tree.
///
/// The empty path denotes the record root. Equality and hashing go through the
/// rendered string, so `Name("1")` and `Index(1)` address the same column.
#[derive(Debug, Clone, Default)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The empty path of the record root.
    #[must_use]
    pub fn root() -> Self {
        FieldPath(Vec::new())
    }

    /// Parses a dot-joined column name. The empty string is the root path.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_marktable::{FieldPath, PathSegment};
    ///
    /// let path = FieldPath::parse("pairs.1");
    /// assert_eq!(path.segments()[1], PathSegment::Index(1));
    /// assert!(FieldPath::parse("").is_root());
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return Self::root();
        }
        FieldPath(text.split(PATH_SEPARATOR).map(PathSegment::parse).collect())
    }

    /// Returns a new path extended by `segment`.
    #[must_use]
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        FieldPath(segments)
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    #[must_use]
    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", PATH_SEPARATOR)?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl PartialEq for FieldPath {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for FieldPath {}

impl Hash for FieldPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

/// The kind of container a traversal step entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerKind {
    /// Named fields: structs and maps
    Keyed,
    /// Ordered elements: sequences and tuples
    Unkeyed,
    /// One scalar
    #[default]
    SingleValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Crumb {
    segment: Option<PathSegment>,
    kind: ContainerKind,
}

/// Immutable trail of path segments and container kinds.
///
/// Extending a breadcrumb returns a new value, so sibling traversals that
/// share a prefix never observe each other's steps.
///
/// # Examples
///
/// ```rust
/// use serde_marktable::{Breadcrumb, ContainerKind, PathSegment};
///
/// let root = Breadcrumb::root();
/// let tags = root
///     .with_container_kind(ContainerKind::Keyed)
///     .with_segment(PathSegment::name("tags"))
///     .with_container_kind(ContainerKind::Unkeyed);
///
/// assert!(tags.inside_unkeyed());
/// assert!(!root.inside_unkeyed());
/// assert_eq!(tags.field_path().to_string(), "tags");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breadcrumb {
    trail: Vec<Crumb>,
}

impl Breadcrumb {
    #[must_use]
    pub fn root() -> Self {
        Breadcrumb { trail: Vec::new() }
    }

    /// Returns a breadcrumb one field deeper.
    #[must_use]
    pub fn with_segment(&self, segment: PathSegment) -> Self {
        self.extend(Crumb {
            segment: Some(segment),
            kind: ContainerKind::SingleValue,
        })
    }

    /// Returns a breadcrumb that has entered a container of `kind` at the
    /// current path.
    #[must_use]
    pub fn with_container_kind(&self, kind: ContainerKind) -> Self {
        self.extend(Crumb {
            segment: None,
            kind,
        })
    }

    fn extend(&self, crumb: Crumb) -> Self {
        let mut trail = Vec::with_capacity(self.trail.len() + 1);
        trail.extend_from_slice(&self.trail);
        trail.push(crumb);
        Breadcrumb { trail }
    }

    /// The field path addressed by this breadcrumb.
    #[must_use]
    pub fn field_path(&self) -> FieldPath {
        FieldPath(
            self.trail
                .iter()
                .filter_map(|crumb| crumb.segment.clone())
                .collect(),
        )
    }

    /// Whether any enclosing step entered a list.
    #[must_use]
    pub fn inside_unkeyed(&self) -> bool {
        self.trail
            .iter()
            .any(|crumb| crumb.kind == ContainerKind::Unkeyed)
    }

    /// Kind of the innermost step, `SingleValue` at the root.
    #[must_use]
    pub fn container_kind(&self) -> ContainerKind {
        self.trail.last().map(|crumb| crumb.kind).unwrap_or_default()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.trail.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_root_renders_empty() {
        assert_eq!(FieldPath::root().to_string(), "");
        assert!(Breadcrumb::root().field_path().is_root());
    }

    #[test]
    fn test_equality_by_rendering() {
        let by_index = FieldPath::root()
            .child(PathSegment::name("pairs"))
            .child(PathSegment::Index(1));
        let by_name = FieldPath::root()
            .child(PathSegment::name("pairs"))
            .child(PathSegment::name("1"));
        assert_eq!(by_index, by_name);

        let mut set = HashSet::new();
        set.insert(by_index);
        assert!(set.contains(&by_name));
    }

    #[test]
    fn test_breadcrumb_is_copy_on_extend() {
        let parent = Breadcrumb::root().with_segment(PathSegment::name("pig"));
        let left = parent.with_segment(PathSegment::name("name"));
        let right = parent.with_segment(PathSegment::name("color"));

        assert_eq!(parent.field_path().to_string(), "pig");
        assert_eq!(left.field_path().to_string(), "pig.name");
        assert_eq!(right.field_path().to_string(), "pig.color");
        assert_eq!(parent.depth(), 1);
    }

    #[test]
    fn test_container_kind_tracking() {
        let crumb = Breadcrumb::root().with_container_kind(ContainerKind::Keyed);
        assert_eq!(crumb.container_kind(), ContainerKind::Keyed);
        assert_eq!(Breadcrumb::root().container_kind(), ContainerKind::SingleValue);

        let list = crumb
            .with_segment(PathSegment::name("tags"))
            .with_container_kind(ContainerKind::Unkeyed);
        assert!(list.inside_unkeyed());
        assert_eq!(list.field_path().to_string(), "tags");
    }

    #[test]
    fn test_super_segment() {
        let path = FieldPath::root()
            .child(PathSegment::super_segment())
            .child(PathSegment::name("id"));
        assert_eq!(path.to_string(), "super.id");
    }
}
