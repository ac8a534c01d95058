use crate::error::{Error, Result};
use std::process::Command;
use tracing::{debug, trace};

/// Reference the changed files are computed against
#[derive(Debug, PartialEq)]
pub enum Base {
    /// Every tracked file counts as changed
    Root,
    /// Files changed since a specific commit
    Commit(String),
}

impl Base {
    /// Resolve the `--base` argument
    ///
    /// An empty value picks HEAD when the worktree has uncommitted changes and
    /// HEAD^ otherwise. "ROOT" treats every tracked file as changed, a leading
    /// "^" or "~" is relative to HEAD, anything else is passed to git as is.
    pub fn parse(diff_base: &str) -> Self {
        let base = if diff_base.is_empty() {
            debug!("Base is empty, checking for uncommitted changes");
            let has_uncommitted = Command::new("git")
                .args(["diff", "--quiet", "HEAD"])
                .status()
                .map(|s| !s.success())
                .unwrap_or(false);
            let detected = if has_uncommitted { "HEAD" } else { "^" };
            debug!("Auto-detected base: {}", detected);
            detected
        } else {
            diff_base
        };

        if base == "ROOT" {
            Self::Root
        } else if base.starts_with('~') || base.starts_with('^') {
            Self::Commit(format!("HEAD{}", base))
        } else {
            Self::Commit(base.to_string())
        }
    }
}

/// Files added or modified since `base`, deleted files excluded
///
/// Paths are relative to the repository top level.
pub fn changed_files(base: &Base) -> Result<Vec<String>> {
    let output = match base {
        Base::Root => git(&["ls-files"])?,
        Base::Commit(commit) => git(&["diff", "--name-only", "--diff-filter=d", commit.as_str()])?,
    };

    let files: Vec<String> = output
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    trace!("Changed files: {:?}", files);
    Ok(files)
}

/// Absolute path of the repository top level directory
pub fn toplevel() -> Result<String> {
    Ok(git(&["rev-parse", "--show-toplevel"])?.trim().to_string())
}

fn git(args: &[&str]) -> Result<String> {
    let to_error = |stderr: String| Error::Git {
        args: args.iter().map(|a| a.to_string()).collect(),
        stderr,
    };

    let output = Command::new("git")
        .args(args)
        .output()
        .map_err(|e| to_error(e.to_string()))?;

    if !output.status.success() {
        return Err(to_error(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
