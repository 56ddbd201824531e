//! Parent-key context
//!
//! The same option name can mean different things depending on where it
//! appears: `platform` inside a `hostRules` entry is a host type, while a
//! top-level `platform` is the hosting platform itself. Every level of the
//! walk therefore knows the key it was reached through.

use std::fmt;

/// Key under which the mapping being migrated appears in its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParentKey<'a> {
    /// Configuration root
    #[default]
    Root,

    /// Nested under this key (directly, or as an element of its array)
    Key(&'a str),
}

impl<'a> ParentKey<'a> {
    /// Check if this level sits under `key`
    #[inline]
    #[must_use]
    pub fn is(self, key: &str) -> bool {
        matches!(self, ParentKey::Key(parent) if parent == key)
    }

    /// Check if this is the configuration root
    #[inline]
    #[must_use]
    pub fn is_root(self) -> bool {
        matches!(self, ParentKey::Root)
    }

    /// Parent key name, if not at the root
    #[inline]
    #[must_use]
    pub fn as_str(self) -> Option<&'a str> {
        match self {
            ParentKey::Root => None,
            ParentKey::Key(key) => Some(key),
        }
    }
}

impl<'a> From<&'a str> for ParentKey<'a> {
    fn from(key: &'a str) -> Self {
        ParentKey::Key(key)
    }
}

impl<'a> From<Option<&'a str>> for ParentKey<'a> {
    fn from(key: Option<&'a str>) -> Self {
        key.map_or(ParentKey::Root, ParentKey::Key)
    }
}

impl fmt::Display for ParentKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentKey::Root => f.write_str("<root>"),
            ParentKey::Key(key) => f.write_str(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_key_matching() {
        let parent = ParentKey::from("hostRules");
        assert!(parent.is("hostRules"));
        assert!(!parent.is("packageRules"));
        assert!(!ParentKey::Root.is("hostRules"));
    }

    #[test]
    fn parent_key_from_option() {
        assert_eq!(ParentKey::from(None), ParentKey::Root);
        assert_eq!(ParentKey::from(Some("node")).as_str(), Some("node"));
    }

    #[test]
    fn parent_key_display() {
        assert_eq!(ParentKey::Root.to_string(), "<root>");
        assert_eq!(ParentKey::Key("packages").to_string(), "packages");
    }
}
