//! Purpose: Split a keypath string into ordered member-name segments.
//! Exports: `KeyPath`, `KeySegment`, `DEFAULT_SEPARATOR`.
//! Role: Input model for the navigator; splitting never fails.
//! Invariants: Empty input yields no segments (decode at the document root).
//! Invariants: Empty segments are preserved and looked up literally as `""`.
//! Invariants: Segments address object members by name only, never array positions.

use std::fmt;

pub const DEFAULT_SEPARATOR: &str = ".";

/// One navigation step: the name of an object member.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct KeySegment<'a> {
    name: &'a str,
}

impl<'a> KeySegment<'a> {
    pub const fn new(name: &'a str) -> Self {
        Self { name }
    }

    pub const fn as_str(&self) -> &'a str {
        self.name
    }

    /// Always `None`: segments carry no positional meaning.
    pub const fn as_index(&self) -> Option<usize> {
        None
    }
}

impl fmt::Display for KeySegment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct KeyPath<'a> {
    segments: Vec<KeySegment<'a>>,
}

impl<'a> KeyPath<'a> {
    /// Splits `key_path` on every occurrence of `separator`.
    ///
    /// The caller guarantees `separator` is non-empty; an empty separator
    /// treats the whole input as a single segment.
    pub fn split(key_path: &'a str, separator: &str) -> Self {
        if key_path.is_empty() {
            return Self::default();
        }
        if separator.is_empty() {
            return Self {
                segments: vec![KeySegment::new(key_path)],
            };
        }
        let segments = key_path.split(separator).map(KeySegment::new).collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[KeySegment<'a>] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn join(&self, separator: &str) -> String {
        self.segments
            .iter()
            .map(KeySegment::as_str)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl fmt::Display for KeyPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(DEFAULT_SEPARATOR))
    }
}
