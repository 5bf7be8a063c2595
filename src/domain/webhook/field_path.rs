//! Nil-safe probing of dynamically shaped event objects.
//!
//! A [`FieldPath`] is a sequence of object keys and array indices such as
//! `display_items[0].custom.name`. Evaluation never fails: a missing key, an
//! out-of-range index, or a container of the wrong shape yields `None`.

use serde_json::Value;

/// One step into a JSON value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object member lookup.
    Key(String),
    /// Array element lookup.
    Index(usize),
}

/// Path into a JSON object graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The empty path, resolving to the root value.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns a new path extended by an object key.
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.push(PathSegment::Key(key.into()))
    }

    /// Returns a new path extended by an array index.
    pub fn index(&self, index: usize) -> Self {
        self.push(PathSegment::Index(index))
    }

    fn push(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }
}

/// Walks `graph` along `path`, returning the value found at the end.
///
/// A numeric key applied to an array is treated as an index, so
/// `["display_items", "0"]` and `display_items[0]` resolve the same element.
pub fn get_path<'a>(graph: &'a Value, path: &[PathSegment]) -> Option<&'a Value> {
    path.iter().try_fold(graph, |current, segment| match (current, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map.get(key),
        (Value::Array(items), PathSegment::Index(index)) => items.get(*index),
        (Value::Array(items), PathSegment::Key(key)) => {
            key.parse::<usize>().ok().and_then(|index| items.get(index))
        }
        _ => None,
    })
}

/// True when `path` resolves to a non-null value.
pub fn is_present(graph: &Value, path: &[PathSegment]) -> bool {
    !matches!(get_path(graph, path), None | Some(Value::Null))
}
