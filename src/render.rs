use crate::comment::{Comment, CommentKind};

/// Heading used for comments without a file location
const SUMMARY_HEADING: &str = "PMD";

/// Format comments as Markdown, grouped by file in emission order
pub fn format_markdown(comments: &[Comment]) -> String {
    if comments.is_empty() {
        return "No violations found".to_string();
    }

    let mut groups: Vec<(&str, Vec<&Comment>)> = Vec::new();
    for comment in comments {
        let file = comment
            .location
            .as_ref()
            .map_or(SUMMARY_HEADING, |l| l.file.as_str());
        match groups.iter_mut().find(|(f, _)| *f == file) {
            Some((_, group)) => group.push(comment),
            None => groups.push((file, vec![comment])),
        }
    }

    let mut output = String::new();
    for (file, comments) in groups {
        output.push_str(&format!("# Violations in {}\n\n", file));
        for comment in comments {
            let marker = match comment.kind {
                CommentKind::Warn => "warning",
                CommentKind::Fail => "**error**",
            };
            match &comment.location {
                Some(location) => output.push_str(&format!(
                    "- Line {} ({}): {}\n",
                    location.line, marker, comment.message
                )),
                None => output.push_str(&format!("- ({}) {}\n", marker, comment.message)),
            }
        }
        output.push('\n');
    }
    output.trim_end().to_string()
}

/// Format comments as a JSON array
pub fn format_json(comments: &[Comment]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(comments)
}

/// Format comments as GitHub Actions workflow commands, one per line
pub fn format_github(comments: &[Comment]) -> String {
    comments
        .iter()
        .map(|comment| {
            let command = match comment.kind {
                CommentKind::Warn => "warning",
                CommentKind::Fail => "error",
            };
            let properties = comment
                .location
                .as_ref()
                .map(|l| format!(" file={},line={}", escape_property(&l.file), l.line))
                .unwrap_or_default();
            format!(
                "::{}{}::{}",
                command,
                properties,
                escape_data(&comment.message)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::Location;

    fn inline(kind: CommentKind, file: &str, line: u32, message: &str) -> Comment {
        Comment {
            kind,
            message: message.into(),
            location: Some(Location {
                file: file.into(),
                line,
            }),
        }
    }

    #[test]
    fn test_markdown_empty() {
        assert_eq!(format_markdown(&[]), "No violations found");
    }

    #[test]
    fn test_markdown_groups_by_file() {
        let comments = vec![
            inline(CommentKind::Fail, "app/A.java", 12, "first"),
            inline(CommentKind::Warn, "app/B.java", 3, "second"),
            inline(CommentKind::Fail, "app/A.java", 18, "third"),
        ];
        assert_eq!(
            format_markdown(&comments),
            "# Violations in app/A.java\n\n\
             - Line 12 (**error**): first\n\
             - Line 18 (**error**): third\n\n\
             # Violations in app/B.java\n\n\
             - Line 3 (warning): second"
        );
    }

    #[test]
    fn test_markdown_summary_comments() {
        let comments = vec![Comment {
            kind: CommentKind::Warn,
            message: "app/A.java : bad at 4".into(),
            location: None,
        }];
        assert_eq!(
            format_markdown(&comments),
            "# Violations in PMD\n\n- (warning) app/A.java : bad at 4"
        );
    }

    #[test]
    fn test_github_commands() {
        let comments = vec![
            inline(CommentKind::Fail, "app/A,B.java", 5, "100% wrong"),
            Comment {
                kind: CommentKind::Warn,
                message: "summary".into(),
                location: None,
            },
        ];
        assert_eq!(
            format_github(&comments),
            "::error file=app/A%2CB.java,line=5::100%25 wrong\n::warning::summary"
        );
    }

    #[test]
    fn test_json() {
        let comments = vec![inline(CommentKind::Warn, "a.java", 1, "m")];
        let value: serde_json::Value =
            serde_json::from_str(&format_json(&comments).unwrap()).unwrap();
        assert_eq!(value[0]["kind"], "warn");
        assert_eq!(value[0]["line"], 1);
    }
}
