//! Dot-separated paths into a value tree.
//!
//! The [`Path`]/[`PathBuf`] types follow the same borrowed/owned pattern as
//! `std::path::Path`/`PathBuf`. Paths are always normalized: empty
//! components are dropped, so `"a..b"` and `".a.b."` both mean `a.b`.
//!
//! Each component is classified lexically, before any value is inspected:
//! a component made only of ASCII digits is an index, anything else is a
//! key. The traversal engine in [`traverse`] then checks the classification
//! against the actual container kind.
//!
//! ```rust
//! use pathstore::path::{PathBuf, Segment};
//! use std::str::FromStr;
//!
//! let path = PathBuf::from_str("items..3.name.").unwrap();
//! assert_eq!(path.as_str(), "items.3.name");
//!
//! let segments = path.segments()?;
//! assert_eq!(segments[1], Segment::Index(3));
//! # Ok::<(), pathstore::path::PathError>(())
//! ```

use std::{borrow::Borrow, fmt, ops::Deref, str::FromStr};

pub mod errors;
pub mod traverse;

pub use errors::PathError;
pub use traverse::{
    DEFAULT_MAX_GROWTH, OnError, TraverseOptions, container_for, delete_at, root_matches_segment,
    traverse, write_at, write_at_with,
};

/// Largest index an index segment may carry (2^53 - 1).
pub const MAX_INDEX: i64 = (1 << 53) - 1;

/// Normalizes a path string by dropping empty components.
///
/// ```rust
/// # use pathstore::path::normalize_path;
/// assert_eq!(normalize_path(""), "");
/// assert_eq!(normalize_path(".user"), "user");
/// assert_eq!(normalize_path("user..profile."), "user.profile");
/// assert_eq!(normalize_path("..."), "");
/// ```
pub fn normalize_path(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    input
        .split('.')
        .filter(|component| !component.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

/// Returns true if the component is an index segment (`^\d+$`).
///
/// Leading zeros are allowed, so `"007"` is an index.
pub fn is_index_segment(component: &str) -> bool {
    !component.is_empty() && component.bytes().all(|b| b.is_ascii_digit())
}

/// A classified path component.
///
/// Segments parsed from strings never carry a negative index, but callers
/// building segments directly may, and traversal rejects them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Index(i64),
    Key(String),
}

impl Segment {
    /// Classifies one component.
    ///
    /// # Errors
    /// [`PathError::IndexOverflow`] if an index component is larger than
    /// [`MAX_INDEX`].
    pub fn parse(component: &str) -> Result<Self, PathError> {
        if !is_index_segment(component) {
            return Ok(Segment::Key(component.to_string()));
        }

        match component.parse::<i64>() {
            Ok(index) if index <= MAX_INDEX => Ok(Segment::Index(index)),
            _ => Err(PathError::IndexOverflow {
                path: component.to_string(),
                segment: component.to_string(),
                max: MAX_INDEX,
            }),
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Segment::Index(_))
    }

    pub fn key(key: impl Into<String>) -> Self {
        Segment::Key(key.into())
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Index(index) => write!(f, "{index}"),
            Segment::Key(key) => write!(f, "{key}"),
        }
    }
}

/// An owned, normalized path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PathBuf {
    inner: String,
}

/// A borrowed, normalized path.
///
/// This type is unsized and must always be used behind a reference.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Path {
    inner: str,
}

impl PathBuf {
    /// Creates a new empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a PathBuf by normalizing the input string.
    pub fn normalize(path: &str) -> Self {
        PathBuf {
            inner: normalize_path(path),
        }
    }

    /// Appends a path string, normalizing it.
    ///
    /// ```rust
    /// # use pathstore::path::PathBuf;
    /// let path = PathBuf::new().push("user").push("prefs..theme");
    /// assert_eq!(path.as_str(), "user.prefs.theme");
    /// ```
    pub fn push(mut self, path: impl AsRef<str>) -> Self {
        let normalized = normalize_path(path.as_ref());
        if normalized.is_empty() {
            return self;
        }

        if !self.inner.is_empty() {
            self.inner.push('.');
        }
        self.inner.push_str(&normalized);
        self
    }

    /// Returns the parent path, or `None` for a single-component path.
    pub fn parent(&self) -> Option<PathBuf> {
        self.inner.rfind('.').map(|last_dot| PathBuf {
            inner: self.inner[..last_dot].to_string(),
        })
    }
}

impl Path {
    /// Creates a Path from a string without normalizing it.
    ///
    /// # Safety
    /// The caller must ensure the string is already normalized: no leading,
    /// trailing or consecutive dots.
    unsafe fn from_str_unchecked(s: &str) -> &Path {
        // SAFETY: Path has the same memory layout as str
        unsafe { &*(s as *const str as *const Path) }
    }

    /// Returns an iterator over the path components as string slices.
    pub fn components(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.inner.split('.').filter(|s| !s.is_empty())
    }

    /// Returns the number of components in the path.
    pub fn len(&self) -> usize {
        self.components().count()
    }

    /// Returns `true` if the path has no components.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the first component, if any.
    pub fn first(&self) -> Option<&str> {
        self.components().next()
    }

    /// Returns the last component, if any.
    pub fn last(&self) -> Option<&str> {
        self.components().next_back()
    }

    /// Classifies every component.
    pub fn segments(&self) -> Result<Vec<Segment>, PathError> {
        self.components()
            .enumerate()
            .map(|(position, component)| {
                Segment::parse(component).map_err(|err| match err {
                    PathError::IndexOverflow { segment, max, .. } => PathError::IndexOverflow {
                        path: self.components().take(position + 1).collect::<Vec<_>>().join("."),
                        segment,
                        max,
                    },
                    other => other,
                })
            })
            .collect()
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf {
            inner: self.inner.to_string(),
        }
    }
}

impl Deref for PathBuf {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        // SAFETY: PathBuf only ever holds normalized strings
        unsafe { Path::from_str_unchecked(self.inner.as_str()) }
    }
}

impl AsRef<Path> for PathBuf {
    fn as_ref(&self) -> &Path {
        self
    }
}

impl AsRef<Path> for Path {
    fn as_ref(&self) -> &Path {
        self
    }
}

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl AsRef<str> for PathBuf {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl Borrow<Path> for PathBuf {
    fn borrow(&self) -> &Path {
        self
    }
}

impl FromStr for PathBuf {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::normalize(s))
    }
}

impl From<&str> for PathBuf {
    fn from(s: &str) -> Self {
        Self::normalize(s)
    }
}

impl fmt::Display for PathBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&**self, f)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inner.is_empty() {
            write!(f, "(empty path)")
        } else {
            write!(f, "{}", &self.inner)
        }
    }
}
