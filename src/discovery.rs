use crate::error::{Error, Result};
use globset::{GlobBuilder, GlobMatcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

const MAX_GLOB_DEPTH: usize = 20;
const GLOB_META_CHARS: &[char] = &['*', '?', '[', '{'];

/// Expand report file patterns relative to `cwd`
///
/// Returns the sorted, deduplicated union of all matches. Fails when no
/// pattern matches any file.
pub fn find_reports(patterns: &[String], cwd: &Path) -> Result<Vec<PathBuf>> {
    let mut found = BTreeSet::new();

    for pattern in patterns {
        let matches = expand(pattern, cwd)?;
        debug!("Pattern '{}' matched {} files", pattern, matches.len());
        if matches.is_empty() {
            warn!("No PMD report matches '{}'", pattern);
        }
        found.extend(matches);
    }

    if found.is_empty() {
        return Err(Error::ReportNotFound {
            patterns: patterns.to_vec(),
        });
    }

    Ok(found.into_iter().map(PathBuf::from).collect())
}

fn expand(pattern: &str, cwd: &Path) -> Result<Vec<String>> {
    if !pattern.contains(GLOB_META_CHARS) {
        return Ok(if cwd.join(pattern).is_file() {
            vec![pattern.to_string()]
        } else {
            vec![]
        });
    }

    // Candidates never carry a leading "./", so neither may the pattern
    let mut pattern = pattern;
    while let Some(rest) = pattern.strip_prefix("./") {
        pattern = rest;
    }

    let matcher = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?
        .compile_matcher();

    let base = literal_base(pattern);
    let start = cwd.join(&base);
    if !start.is_dir() {
        return Ok(vec![]);
    }

    // Relative patterns are matched, and reported, relative to cwd
    let strip = if Path::new(pattern).is_absolute() {
        None
    } else {
        Some(cwd)
    };

    let mut matches = Vec::new();
    glob_recursive(&start, strip, &matcher, &mut matches, 0).map_err(|source| Error::Io {
        path: start.clone(),
        source,
    })?;
    Ok(matches)
}

/// Leading path components of `pattern` that contain no glob syntax
fn literal_base(pattern: &str) -> String {
    let mut components: Vec<&str> = pattern.split('/').collect();
    // The last component names files, never a directory to start from
    components.pop();
    let literal: Vec<&str> = components
        .into_iter()
        .take_while(|c| !c.contains(GLOB_META_CHARS))
        .collect();

    if literal.is_empty() {
        ".".to_string()
    } else if literal == [""] {
        "/".to_string()
    } else {
        literal.join("/")
    }
}

fn glob_recursive(
    path: &Path,
    strip: Option<&Path>,
    matcher: &GlobMatcher,
    matches: &mut Vec<String>,
    depth: usize,
) -> std::io::Result<()> {
    if depth > MAX_GLOB_DEPTH {
        return Ok(());
    }

    let entries = match std::fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) if depth > 0 => {
            warn!("Skipping unreadable directory {}: {}", path.display(), e);
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    for entry in entries {
        let entry = entry?;
        let entry_path = entry.path();

        // file_type does not follow symlinks, so linked directories are not walked
        if entry.file_type()?.is_dir() {
            glob_recursive(&entry_path, strip, matcher, matches, depth + 1)?;
            continue;
        }

        let candidate = match strip {
            Some(cwd) => entry_path.strip_prefix(cwd).unwrap_or(entry_path.as_path()),
            None => entry_path.as_path(),
        };
        let Some(candidate) = candidate.to_str() else {
            continue;
        };
        let candidate = candidate.strip_prefix("./").unwrap_or(candidate);

        trace!("Matching '{}'", candidate);
        if matcher.is_match(candidate) {
            matches.push(candidate.to_string());
        }
    }

    Ok(())
}
