//! Key paths and resolution options.
//!
//! A key path is a delimiter-separated list of field names such as
//! `"name.first"`. Paths are split once per call and resolved segment by
//! segment against the model tree.

use serde::{Deserialize, Serialize};

/// Default segment delimiter.
pub const DEFAULT_DELIMITER: char = '.';

/// How unmatched path segments are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathPolicy {
    /// An unmatched segment is skipped; resolution stays at the last matched
    /// node and continues with the next segment.
    #[default]
    Permissive,
    /// Every segment must name a field, up to the first collection reached.
    /// Segments after a collection address the element appended to it.
    Strict,
}

/// Options carried by a model and inherited by every detached model it builds.
///
/// # Example
///
/// ```
/// use reflex::{Options, PathPolicy};
///
/// let options = Options::default().with_delimiter('/').with_policy(PathPolicy::Strict);
/// assert_eq!(options.delimiter, '/');
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Segment delimiter.
    pub delimiter: char,
    /// Treatment of unmatched segments.
    pub policy: PathPolicy,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            policy: PathPolicy::Permissive,
        }
    }
}

impl Options {
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_policy(mut self, policy: PathPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Split a key path into segments.
///
/// The empty path addresses the root and has no segments. Empty segments
/// inside a path are kept; they never match a field.
///
/// # Example
///
/// ```
/// use reflex::split_path;
///
/// assert_eq!(split_path("", '.'), Vec::<&str>::new());
/// assert_eq!(split_path("member.name", '.'), vec!["member", "name"]);
/// assert_eq!(split_path("a..b", '.'), vec!["a", "", "b"]);
/// ```
pub fn split_path(path: &str, delimiter: char) -> Vec<&str> {
    if path.is_empty() {
        return Vec::new();
    }
    path.split(delimiter).collect()
}

/// Join segments back into a key path.
pub fn join_path<S: AsRef<str>>(segments: &[S], delimiter: char) -> String {
    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            out.push(delimiter);
        }
        out.push_str(segment.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("", '.'), Vec::<&str>::new());
        assert_eq!(split_path("location", '.'), vec!["location"]);
        assert_eq!(split_path("name.first", '.'), vec!["name", "first"]);
        assert_eq!(split_path("name/first", '/'), vec!["name", "first"]);
        // Other delimiters are part of the segment.
        assert_eq!(split_path("name.first", '/'), vec!["name.first"]);
        assert_eq!(split_path(".", '.'), vec!["", ""]);
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path::<&str>(&[], '.'), "");
        assert_eq!(join_path(&["member", "name"], '.'), "member.name");
        assert_eq!(join_path(&["a".to_string(), "b".to_string()], '/'), "a/b");
    }

    #[test]
    fn test_split_join_roundtrip() {
        for path in ["", "a", "a.b", "a..b", "x.y.z"] {
            assert_eq!(join_path(&split_path(path, '.'), '.'), path);
        }
    }

    #[test]
    fn test_options_default() {
        let options = Options::default();
        assert_eq!(options.delimiter, '.');
        assert_eq!(options.policy, PathPolicy::Permissive);
    }
}
