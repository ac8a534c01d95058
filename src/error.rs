use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a PMD review run
#[derive(Debug, Error)]
pub enum Error {
    #[error("Could not find `gradlew` inside current directory")]
    GradlewNotFound,

    #[error("PMD report file not found: {}", patterns.join(", "))]
    ReportNotFound { patterns: Vec<String> },

    #[error("Invalid report file pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: globset::Error,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed PMD report {}: not valid UTF-8: {source}", path.display())]
    Encoding {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },

    #[error("Malformed PMD report {}: {source}", path.display())]
    Xml {
        path: PathBuf,
        source: roxmltree::Error,
    },

    #[error("Malformed PMD report {}: <{element}> is missing attribute '{attribute}'", path.display())]
    MissingAttribute {
        path: PathBuf,
        element: &'static str,
        attribute: &'static str,
    },

    #[error("Malformed PMD report {}: attribute '{attribute}' is not a number: '{value}'", path.display())]
    InvalidAttribute {
        path: PathBuf,
        attribute: &'static str,
        value: String,
    },

    #[error("git {} failed: {stderr}", args.join(" "))]
    Git { args: Vec<String>, stderr: String },

    #[error("Failed to run Gradle: {0}")]
    Gradle(#[source] std::io::Error),

    #[error("Invalid output: {0}")]
    Output(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
