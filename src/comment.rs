use serde::Serialize;

/// Severity a comment is posted with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
    /// Advisory, does not block the review
    Warn,
    /// Blocking
    Fail,
}

/// File and line a comment is attached to in inline mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub kind: CommentKind,
    pub message: String,
    #[serde(flatten)]
    pub location: Option<Location>,
}

/// Receiver of review comments
pub trait Commenter {
    /// Post an advisory comment
    fn warn(&mut self, message: &str, location: Option<Location>);
    /// Post a blocking comment
    fn fail(&mut self, message: &str, location: Option<Location>);

    fn comment(&mut self, kind: CommentKind, message: &str, location: Option<Location>) {
        match kind {
            CommentKind::Warn => self.warn(message, location),
            CommentKind::Fail => self.fail(message, location),
        }
    }
}

/// Collects comments in the order they were posted
#[derive(Debug, Default)]
pub struct CommentLog {
    pub comments: Vec<Comment>,
}

impl CommentLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_failures(&self) -> bool {
        self.comments.iter().any(|c| c.kind == CommentKind::Fail)
    }

    fn push(&mut self, kind: CommentKind, message: &str, location: Option<Location>) {
        self.comments.push(Comment {
            kind,
            message: message.to_string(),
            location,
        });
    }
}

impl Commenter for CommentLog {
    fn warn(&mut self, message: &str, location: Option<Location>) {
        self.push(CommentKind::Warn, message, location);
    }

    fn fail(&mut self, message: &str, location: Option<Location>) {
        self.push(CommentKind::Fail, message, location);
    }
}
