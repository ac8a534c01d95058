use super::violation::Violation;
use crate::error::{Error, Result};
use roxmltree::Node;
use std::path::Path;

const FILE_SEPARATOR: char = '/';

/// A source file entry of a PMD report
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedFile {
    /// Path as written in the report
    pub absolute_path: String,
    /// Path relative to the project root, or the absolute path when outside of it
    pub relative_path: String,
    /// Violations in report order
    pub violations: Vec<Violation>,
}

impl AnalyzedFile {
    pub fn new(root_path: &str, absolute_path: &str, violations: Vec<Violation>) -> Self {
        Self {
            absolute_path: absolute_path.to_string(),
            relative_path: relative_path(root_path, absolute_path).to_string(),
            violations,
        }
    }

    /// Build a file record from a `<file>` element of the report at `report`
    pub fn from_node(root_path: &str, node: Node<'_, '_>, report: &Path) -> Result<Self> {
        let name = node.attribute("name").ok_or_else(|| Error::MissingAttribute {
            path: report.to_path_buf(),
            element: "file",
            attribute: "name",
        })?;

        let violations = node
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == "violation")
            .map(|n| Violation::from_node(n, report))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(root_path, name, violations))
    }
}

/// Strip `root_path` from `absolute_path`
///
/// The root is compared with exactly one trailing separator, so `/x/y` and
/// `/x/y/` behave the same. Paths outside of the root are returned unchanged.
pub fn relative_path<'a>(root_path: &str, absolute_path: &'a str) -> &'a str {
    let mut prefix = root_path.to_string();
    if !prefix.ends_with(FILE_SEPARATOR) {
        prefix.push(FILE_SEPARATOR);
    }

    absolute_path
        .strip_prefix(prefix.as_str())
        .unwrap_or(absolute_path)
}
