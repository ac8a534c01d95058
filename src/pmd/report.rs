use super::file::AnalyzedFile;
use crate::error::{Error, Result};
use roxmltree::Document;
use std::path::Path;
use tracing::{debug, warn};

/// Load a PMD XML report and extract its file entries in document order
pub fn load(report: &Path, root_path: &str) -> Result<Vec<AnalyzedFile>> {
    debug!("Loading PMD report {}", report.display());
    let bytes = std::fs::read(report).map_err(|source| Error::Io {
        path: report.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8(bytes).map_err(|source| Error::Encoding {
        path: report.to_path_buf(),
        source,
    })?;
    parse(&content, report, root_path)
}

/// Parse report content; `report` is only used in error messages
pub fn parse(content: &str, report: &Path, root_path: &str) -> Result<Vec<AnalyzedFile>> {
    let doc = Document::parse(content).map_err(|source| Error::Xml {
        path: report.to_path_buf(),
        source,
    })?;

    for error in doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "error")
    {
        warn!(
            "PMD could not analyze {}: {}",
            error.attribute("filename").unwrap_or("<unknown>"),
            error.attribute("msg").unwrap_or("no message")
        );
    }

    let files = doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "file")
        .map(|n| AnalyzedFile::from_node(root_path, n, report))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "Report {} lists {} files",
        report.display(),
        files.len()
    );
    Ok(files)
}
