//! Walking and mutating a value tree along a segment path.
//!
//! All functions here are pure: they operate on an in-memory [`Value`] and
//! never touch storage. The façade in [`crate::store`] loads a root value,
//! runs one of these functions on it and writes the result back.
//!
//! Segment classification is decided lexically before traversal (see
//! [`Segment`]); each step then checks the classification against the node
//! it finds. When `create_path` is set, missing intermediate containers are
//! created, and the kind of each new container is chosen by looking ahead at
//! the segment that will be applied to it.

use std::mem;

use super::{PathError, Segment};
use crate::Value;

/// What [`traverse`] does when a step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnError {
    /// Return the error to the caller.
    #[default]
    Propagate,
    /// Stop walking and report "no value" instead.
    Suppress,
}

/// Most empty slots a single auto-extension may add to a list.
pub const DEFAULT_MAX_GROWTH: usize = 10_000;

/// Options for [`traverse`].
#[derive(Debug, Clone, Copy)]
pub struct TraverseOptions {
    /// Stop before the last segment and return its container.
    pub stop_before_last: bool,
    /// Create missing intermediate containers instead of failing.
    pub create_path: bool,
    /// Whether a failed step is returned or turned into "no value".
    pub on_error: OnError,
    /// Most slots one index may add to a list when `create_path` is set.
    pub max_growth: usize,
}

impl Default for TraverseOptions {
    fn default() -> Self {
        Self {
            stop_before_last: false,
            create_path: false,
            on_error: OnError::Propagate,
            max_growth: DEFAULT_MAX_GROWTH,
        }
    }
}

impl TraverseOptions {
    /// Options for reading a leaf value.
    pub fn read() -> Self {
        Self::default()
    }

    /// Options for locating the container of the last segment.
    pub fn parent(create_path: bool) -> Self {
        Self {
            stop_before_last: true,
            create_path,
            ..Self::default()
        }
    }

    pub fn suppress_errors(mut self) -> Self {
        self.on_error = OnError::Suppress;
        self
    }

    pub fn with_max_growth(mut self, max_growth: usize) -> Self {
        self.max_growth = max_growth;
        self
    }
}

/// Returns an empty container suited to receive `next`.
///
/// Index segments get a list, key segments (and no segment) get a map.
pub fn container_for(next: Option<&Segment>) -> Value {
    match next {
        Some(Segment::Index(_)) => Value::list(),
        _ => Value::map(),
    }
}

/// Checks that a stored root value can be addressed by `first_segment`.
///
/// Index segments require a list root, key segments a map root.
pub fn root_matches_segment(root: &Value, first_segment: &Segment) -> bool {
    match first_segment {
        Segment::Index(_) => matches!(root, Value::List(_)),
        Segment::Key(_) => matches!(root, Value::Map(_)),
    }
}

/// Walks `segments` from `root`.
///
/// With `stop_before_last` the walk skips the final segment and yields the
/// container that holds (or will hold) it; an empty path yields `root`.
/// Otherwise it yields the value at the final segment.
///
/// `Ok(None)` means there is no value: either the final key is missing from
/// its map, or a step failed and `on_error` is [`OnError::Suppress`].
///
/// # Errors
/// Any [`PathError`] raised by a step, when `on_error` is
/// [`OnError::Propagate`].
pub fn traverse<'a>(
    root: &'a mut Value,
    segments: &[Segment],
    options: TraverseOptions,
) -> Result<Option<&'a mut Value>, PathError> {
    match walk(root, segments, &options) {
        Ok(found) => Ok(found),
        Err(err) => match options.on_error {
            OnError::Propagate => Err(err),
            OnError::Suppress => Ok(None),
        },
    }
}

/// Assigns `value` at the position addressed by `segments`.
///
/// Returns the previous value at that position, if there was a real one.
///
/// # Errors
/// The same kinds as [`traverse`], plus [`PathError::EmptyPath`].
pub fn write_at(
    root: &mut Value,
    segments: &[Segment],
    value: Value,
    create_path: bool,
) -> Result<Option<Value>, PathError> {
    write_at_with(root, segments, value, TraverseOptions::parent(create_path))
}

/// [`write_at`] with explicit options. Only `create_path` and `max_growth`
/// are consulted.
///
/// # Errors
/// The same kinds as [`write_at`].
pub fn write_at_with(
    root: &mut Value,
    segments: &[Segment],
    value: Value,
    options: TraverseOptions,
) -> Result<Option<Value>, PathError> {
    let (last, _) = segments.split_last().ok_or(PathError::EmptyPath)?;
    let parent = locate_parent(root, segments, options)?;
    let consumed = || render(segments, segments.len() - 1);

    match last {
        Segment::Index(index) => {
            let items = match parent {
                Value::List(items) => items,
                other => {
                    return Err(PathError::NotAnArray {
                        path: consumed(),
                        found: other.type_name(),
                    });
                }
            };
            let index = checked_index(*index, &consumed)?;
            ensure_len(items, index, &options, &consumed)?;
            let previous = mem::replace(&mut items[index], value);
            Ok(Some(previous).filter(|v| !v.is_empty_marker()))
        }
        Segment::Key(key) => match parent {
            Value::Map(map) => Ok(map.insert(key.clone(), value)),
            other => Err(PathError::NotAnObject {
                path: consumed(),
                found: other.type_name(),
            }),
        },
    }
}

/// Removes the value addressed by `segments`.
///
/// Map entries are removed outright. List elements are replaced with
/// [`Value::Empty`]; the list keeps its length. Removing something that is
/// already absent succeeds and returns `None`.
///
/// # Errors
/// The same kinds as [`traverse`] for the parent walk, plus
/// [`PathError::EmptyPath`].
pub fn delete_at(root: &mut Value, segments: &[Segment]) -> Result<Option<Value>, PathError> {
    let (last, _) = segments.split_last().ok_or(PathError::EmptyPath)?;
    let parent = locate_parent(root, segments, TraverseOptions::parent(false))?;
    let consumed = || render(segments, segments.len() - 1);

    match last {
        Segment::Index(index) => {
            let items = match parent {
                Value::List(items) => items,
                other => {
                    return Err(PathError::NotAnArray {
                        path: consumed(),
                        found: other.type_name(),
                    });
                }
            };
            let index = checked_index(*index, &consumed)?;
            let removed = items
                .get_mut(index)
                .map(|slot| mem::replace(slot, Value::Empty));
            Ok(removed.filter(|v| !v.is_empty_marker()))
        }
        Segment::Key(key) => match parent {
            Value::Map(map) => Ok(map.remove(key)),
            other => Err(PathError::NotAnObject {
                path: consumed(),
                found: other.type_name(),
            }),
        },
    }
}

fn locate_parent<'a>(
    root: &'a mut Value,
    segments: &[Segment],
    options: TraverseOptions,
) -> Result<&'a mut Value, PathError> {
    let options = TraverseOptions {
        stop_before_last: true,
        on_error: OnError::Propagate,
        ..options
    };
    // The final segment is never visited when stopping before it, so the
    // walk cannot end on a missing key.
    walk(root, segments, &options)?.ok_or_else(|| {
        PathError::PathNotFound {
            path: render(segments, segments.len().saturating_sub(1)),
        }
    })
}

fn walk<'a>(
    root: &'a mut Value,
    segments: &[Segment],
    options: &TraverseOptions,
) -> Result<Option<&'a mut Value>, PathError> {
    let stop = if options.stop_before_last {
        segments.len().saturating_sub(1)
    } else {
        segments.len()
    };

    let mut current = root;
    for (position, segment) in segments[..stop].iter().enumerate() {
        let consumed = || render(segments, position);
        let is_terminal = position + 1 == segments.len();

        let slot = match segment {
            Segment::Index(index) => {
                let items = match current {
                    Value::List(items) => items,
                    other => {
                        return Err(PathError::NotAnArray {
                            path: consumed(),
                            found: other.type_name(),
                        });
                    }
                };
                let index = checked_index(*index, &consumed)?;
                ensure_len(items, index, options, &consumed)?;
                &mut items[index]
            }
            Segment::Key(key) => {
                let map = match current {
                    Value::Map(map) => map,
                    other => {
                        return Err(PathError::NotAnObject {
                            path: consumed(),
                            found: other.type_name(),
                        });
                    }
                };
                if options.create_path && !is_terminal {
                    map.entry(key.clone()).or_insert(Value::Empty)
                } else {
                    match map.get_mut(key) {
                        Some(value) => value,
                        None if is_terminal => return Ok(None),
                        None => return Err(PathError::PropertyMissing { path: consumed() }),
                    }
                }
            }
        };

        if !is_terminal && slot.is_absent() {
            if options.create_path {
                *slot = container_for(segments.get(position + 1));
            } else if slot.is_null() {
                return Err(PathError::NullInPath { path: consumed() });
            } else {
                return Err(PathError::PathNotFound { path: consumed() });
            }
        }

        current = slot;
    }

    Ok(Some(current))
}

fn checked_index(index: i64, consumed: &impl Fn() -> String) -> Result<usize, PathError> {
    if index < 0 {
        return Err(PathError::NegativeIndex {
            path: consumed(),
            index,
        });
    }
    usize::try_from(index).map_err(|_| PathError::IndexOverflow {
        path: consumed(),
        segment: index.to_string(),
        max: super::MAX_INDEX,
    })
}

/// Grows `items` with empty-markers so that `index` is in range.
///
/// Growth is bounded by `options.max_growth`, and the allocation itself is
/// fallible, so an oversized index is an error rather than an abort.
fn ensure_len(
    items: &mut Vec<Value>,
    index: usize,
    options: &TraverseOptions,
    consumed: &impl Fn() -> String,
) -> Result<(), PathError> {
    if index < items.len() {
        return Ok(());
    }
    if !options.create_path {
        return Err(PathError::IndexOutOfBounds {
            path: consumed(),
            index,
            len: items.len(),
        });
    }
    let len = items.len();
    let too_large = || PathError::GrowthLimit {
        path: consumed(),
        index,
        len,
        max: options.max_growth,
    };
    let growth = index - len + 1;
    if growth > options.max_growth {
        return Err(too_large());
    }
    items.try_reserve(growth).map_err(|_| too_large())?;
    items.resize(index + 1, Value::Empty);
    Ok(())
}

/// Joins `segments[..=upto]` with dots.
fn render(segments: &[Segment], upto: usize) -> String {
    segments
        .iter()
        .take(upto + 1)
        .map(Segment::to_string)
        .collect::<Vec<_>>()
        .join(".")
}
