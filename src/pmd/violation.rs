use crate::comment::CommentKind;
use crate::error::{Error, Result};
use roxmltree::Node;
use std::path::Path;

/// Priorities below this value are reported as warnings, the rest as failures
pub const PRIORITY_ERROR_THRESHOLD: u32 = 2;

/// A single PMD finding inside an analyzed file
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// PMD priority (1 is the most severe)
    pub priority: u32,
    /// Start line (1-indexed)
    pub line: u32,
    /// End line (inclusive), when PMD reports it
    pub end_line: Option<u32>,
    /// Message with newlines removed
    pub description: String,
    /// Rule name, e.g. `ClassNamingConventions`
    pub rule: Option<String>,
    /// Ruleset name, e.g. `Code Style`
    pub ruleset: Option<String>,
    pub kind: CommentKind,
}

impl Violation {
    pub fn new(priority: u32, line: u32, description: &str) -> Self {
        Self {
            priority,
            line,
            end_line: None,
            description: description.replace('\n', ""),
            rule: None,
            ruleset: None,
            kind: classify(priority),
        }
    }

    /// Build a violation from a `<violation>` element of the report at `report`
    pub fn from_node(node: Node<'_, '_>, report: &Path) -> Result<Self> {
        let priority = required_number(node, "priority", report)?;
        let line = required_number(node, "beginline", report)?;
        let end_line = node
            .attribute("endline")
            .map(|value| parse_number(value, "endline", report))
            .transpose()?;

        let text: String = node
            .descendants()
            .filter(|n| n.is_text())
            .filter_map(|n| n.text())
            .collect();

        Ok(Self {
            end_line,
            rule: node.attribute("rule").map(str::to_string),
            ruleset: node.attribute("ruleset").map(str::to_string),
            ..Self::new(priority, line, &text)
        })
    }
}

/// Map a PMD priority to the comment kind it is reported with
pub fn classify(priority: u32) -> CommentKind {
    if priority < PRIORITY_ERROR_THRESHOLD {
        CommentKind::Warn
    } else {
        CommentKind::Fail
    }
}

fn required_number(node: Node<'_, '_>, attribute: &'static str, report: &Path) -> Result<u32> {
    let value = node
        .attribute(attribute)
        .ok_or_else(|| Error::MissingAttribute {
            path: report.to_path_buf(),
            element: "violation",
            attribute,
        })?;
    parse_number(value, attribute, report)
}

fn parse_number(value: &str, attribute: &'static str, report: &Path) -> Result<u32> {
    value.trim().parse().map_err(|_| Error::InvalidAttribute {
        path: report.to_path_buf(),
        attribute,
        value: value.to_string(),
    })
}
