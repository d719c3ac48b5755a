// ── Table paths ──

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Absolute, `/`-separated path to a table, normalized so that
/// `"Vision Server/Cameras/"` and `"/Vision Server//Cameras"` compare equal.
///
/// Segments may contain spaces; the store's own table names do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TablePath(String);

impl TablePath {
    pub const SEPARATOR: char = '/';

    pub fn root() -> Self {
        Self(Self::SEPARATOR.to_string())
    }

    pub fn new(raw: impl AsRef<str>) -> Self {
        let mut out = String::new();
        for segment in raw.as_ref().split(Self::SEPARATOR).filter(|s| !s.is_empty()) {
            out.push(Self::SEPARATOR);
            out.push_str(segment);
        }
        if out.is_empty() {
            return Self::root();
        }
        Self(out)
    }

    /// Append `name` below this path. A `name` containing `/` is split
    /// like any other path, adding one segment per part.
    pub fn child(&self, name: &str) -> Self {
        Self::new(format!("{}{}{}", self.0, Self::SEPARATOR, name))
    }

    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        let cut = self.0.rfind(Self::SEPARATOR).unwrap_or(0);
        Some(Self::new(&self.0[..cut]))
    }

    /// Last segment of the path; empty for the root.
    pub fn base_name(&self) -> &str {
        self.0
            .rsplit(Self::SEPARATOR)
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(Self::SEPARATOR).filter(|s| !s.is_empty())
    }

    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TablePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TablePath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for TablePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_separators() {
        let a = TablePath::new("Vision Server/Cameras/");
        let b = TablePath::new("/Vision Server//Cameras");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "/Vision Server/Cameras");
    }

    #[test]
    fn empty_input_is_root() {
        assert!(TablePath::new("").is_root());
        assert!(TablePath::new("///").is_root());
        assert_eq!(TablePath::root().base_name(), "");
    }

    #[test]
    fn child_and_parent() {
        let cams = TablePath::new("/Vision Server").child("Cameras");
        assert_eq!(cams.as_str(), "/Vision Server/Cameras");
        assert_eq!(cams.base_name(), "Cameras");
        assert_eq!(cams.parent().unwrap().as_str(), "/Vision Server");
        assert!(cams.parent().unwrap().parent().unwrap().is_root());
        assert!(TablePath::root().parent().is_none());
    }

    #[test]
    fn child_with_separator_adds_nested_segments() {
        let upper = TablePath::new("/Targets").child("goal/upper");
        assert_eq!(
            upper.segments().collect::<Vec<_>>(),
            vec!["Targets", "goal", "upper"]
        );
        assert_eq!(upper.base_name(), "upper");
        assert_eq!(upper.parent().unwrap().as_str(), "/Targets/goal");
    }

    #[test]
    fn segments_skip_empty() {
        let path: TablePath = "/a/b c/d".parse().unwrap();
        assert_eq!(path.segments().collect::<Vec<_>>(), vec!["a", "b c", "d"]);
    }
}
