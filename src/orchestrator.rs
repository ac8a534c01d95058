use crate::cli::OutputFormat;
use crate::comment::{CommentKind, CommentLog, Commenter, Location};
use crate::config::Config;
use crate::discovery;
use crate::error::{Error, Result};
use crate::gradle;
use crate::pmd::{self, AnalyzedFile};
use crate::render;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Run PMD and comment on the violations in changed files
///
/// This function coordinates the whole review:
/// - Runs the Gradle task unless skipped
/// - Resolves report patterns to report files
/// - Loads every report before anything is emitted
/// - Keeps files whose relative path is in `changed_files`
/// - Posts one comment per violation of the kept files
///
/// Returns the kept files with their violations.
pub async fn report(
    config: &Config,
    cwd: &Path,
    changed_files: &HashSet<String>,
    commenter: &mut impl Commenter,
) -> Result<Vec<AnalyzedFile>> {
    if config.skip_gradle_task {
        debug!("Skipping Gradle task");
    } else {
        let status = gradle::run_task(cwd, &config.gradle_task).await?;
        if !status.success() {
            warn!(
                "Gradle task '{}' exited with {}, reading reports anyway",
                config.gradle_task, status
            );
        }
    }

    let report_paths = discovery::find_reports(&config.report_files, cwd)?;
    info!("Found {} PMD report(s)", report_paths.len());

    let mut analyzed = Vec::new();
    for path in &report_paths {
        analyzed.extend(pmd::report::load(&cwd.join(path), &config.root_path)?);
    }
    debug!("Reports list {} files", analyzed.len());

    let kept: Vec<AnalyzedFile> = analyzed
        .into_iter()
        .filter(|file| changed_files.contains(&file.relative_path))
        .collect();
    info!(
        "{} changed file(s) with PMD violations",
        kept.len()
    );

    for file in &kept {
        send_comments(file, config.inline_mode, commenter);
    }

    Ok(kept)
}

fn send_comments(file: &AnalyzedFile, inline_mode: bool, commenter: &mut impl Commenter) {
    for violation in &file.violations {
        debug!(
            "{}:{}-{} priority {} rule {}/{}",
            file.relative_path,
            violation.line,
            violation.end_line.unwrap_or(violation.line),
            violation.priority,
            violation.ruleset.as_deref().unwrap_or("-"),
            violation.rule.as_deref().unwrap_or("-")
        );
        if inline_mode {
            commenter.comment(
                violation.kind,
                &violation.description,
                Some(Location {
                    file: file.relative_path.clone(),
                    line: violation.line,
                }),
            );
        } else {
            let message = format!(
                "{} : {} at {}",
                file.relative_path, violation.description, violation.line
            );
            commenter.comment(violation.kind, &message, None);
        }
    }
}

/// Run the review and deliver the collected comments
///
/// Returns whether any blocking comment was posted.
pub async fn orchestrate_and_run(
    config: &Config,
    cwd: &Path,
    changed_files: &HashSet<String>,
    output: Option<&str>,
    format: OutputFormat,
) -> Result<bool> {
    let mut log = CommentLog::new();
    let files = report(config, cwd, changed_files, &mut log).await?;
    let violations: usize = files.iter().map(|f| f.violations.len()).sum();
    info!(
        "Review complete: {} violation(s) in {} file(s)",
        violations,
        files.len()
    );

    match format {
        OutputFormat::Console => print_comments(&log),
        OutputFormat::Github => {
            if !log.comments.is_empty() {
                println!("{}", render::format_github(&log.comments));
            }
        }
    }

    if let Some(path) = output {
        write_output(path, &log)?;
    }

    if log.has_failures() {
        error!("PMD reported blocking violations in changed files");
    }
    Ok(log.has_failures())
}

fn print_comments(log: &CommentLog) {
    if log.comments.is_empty() {
        info!("No violations found");
        return;
    }

    for comment in &log.comments {
        let text = match &comment.location {
            Some(location) => format!("{}:{}: {}", location.file, location.line, comment.message),
            None => comment.message.clone(),
        };
        match comment.kind {
            CommentKind::Warn => warn!("{}", text),
            CommentKind::Fail => error!("{}", text),
        }
    }
}

fn write_output(path: &str, log: &CommentLog) -> Result<()> {
    let content = if path.ends_with(".json") {
        render::format_json(&log.comments)
            .map_err(|e| Error::Output(e.to_string()))?
    } else if path.ends_with(".md") {
        render::format_markdown(&log.comments)
    } else {
        return Err(Error::Output("file must end with .md or .json".into()));
    };

    std::fs::write(path, content).map_err(|source| Error::Io {
        path: path.into(),
        source,
    })?;

    info!("Results written to {}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::Comment;
    use tempfile::TempDir;

    const ROOT: &str = "/Users/developer/sample";
    const MAIN_ACTIVITY: &str = "app/src/main/java/com/android/sample/MainActivity.java";
    const TOOLS: &str = "app/src/main/java/com/android/sample/Tools.java";
    const TOOLS_TEST: &str = "app/src/test/java/com/android/sample/ToolsTest.java";

    fn fixture_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let reports = dir.path().join("app/build/reports/pmd");
        std::fs::create_dir_all(&reports).unwrap();
        std::fs::copy(
            Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/pmd_report.xml"),
            reports.join("pmd.xml"),
        )
        .unwrap();
        dir
    }

    fn config(inline_mode: bool) -> Config {
        Config {
            gradle_task: "pmd".into(),
            skip_gradle_task: true,
            root_path: ROOT.into(),
            report_files: vec!["app/build/reports/pmd/pmd.xml".into()],
            inline_mode,
        }
    }

    fn changed(files: &[&str]) -> HashSet<String> {
        files.iter().map(|f| f.to_string()).collect()
    }

    #[tokio::test]
    async fn test_report_keeps_changed_files_only() {
        let dir = fixture_dir();
        let mut log = CommentLog::new();

        let files = report(
            &config(true),
            dir.path(),
            &changed(&[TOOLS_TEST, MAIN_ACTIVITY]),
            &mut log,
        )
        .await
        .unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].relative_path, MAIN_ACTIVITY);
        assert_eq!(files[0].violations.len(), 1);
        assert_eq!(files[0].violations[0].line, 39);
        assert_eq!(files[1].relative_path, TOOLS_TEST);
        let lines: Vec<u32> = files[1].violations.iter().map(|v| v.line).collect();
        assert_eq!(lines, vec![12, 18]);

        assert_eq!(
            log.comments,
            vec![
                Comment {
                    kind: CommentKind::Fail,
                    message: "Use equals() to compare strings instead of '==' or '!='".into(),
                    location: Some(Location {
                        file: MAIN_ACTIVITY.into(),
                        line: 39
                    }),
                },
                Comment {
                    kind: CommentKind::Warn,
                    message: "The JUnit 4 test method name 'getLabel_1' doesn't match '[a-z][a-zA-Z0-9]*'"
                        .into(),
                    location: Some(Location {
                        file: TOOLS_TEST.into(),
                        line: 12
                    }),
                },
                Comment {
                    kind: CommentKind::Fail,
                    message: "The JUnit 4 test method name 'getLabel_2' doesn't match '[a-z][a-zA-Z0-9]*'"
                        .into(),
                    location: Some(Location {
                        file: TOOLS_TEST.into(),
                        line: 18
                    }),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_report_returns_tools_pair_in_report_order() {
        let dir = fixture_dir();
        let mut log = CommentLog::new();

        let files = report(
            &config(true),
            dir.path(),
            &changed(&[TOOLS_TEST, TOOLS]),
            &mut log,
        )
        .await
        .unwrap();

        let paths: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(paths, vec![TOOLS, TOOLS_TEST]);
        assert_eq!(files[0].absolute_path, format!("{}/{}", ROOT, TOOLS));

        let lines: Vec<Vec<u32>> = files
            .iter()
            .map(|f| f.violations.iter().map(|v| v.line).collect())
            .collect();
        assert_eq!(lines, vec![vec![5], vec![12, 18]]);
        assert_eq!(
            files[1].violations[0].description,
            "The JUnit 4 test method name 'getLabel_1' doesn't match '[a-z][a-zA-Z0-9]*'"
        );
        assert_eq!(log.comments.len(), 3);
    }

    #[tokio::test]
    async fn test_report_summary_mode() {
        let dir = fixture_dir();
        let mut log = CommentLog::new();

        let files = report(&config(false), dir.path(), &changed(&[MAIN_ACTIVITY]), &mut log)
            .await
            .unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(log.comments.len(), 1);
        assert_eq!(log.comments[0].location, None);
        assert_eq!(
            log.comments[0].message,
            format!(
                "{} : Use equals() to compare strings instead of '==' or '!=' at 39",
                MAIN_ACTIVITY
            )
        );
    }

    #[tokio::test]
    async fn test_report_absolute_paths_do_not_match() {
        let dir = fixture_dir();
        let mut log = CommentLog::new();
        let absolute = format!("{}/{}", ROOT, MAIN_ACTIVITY);

        let files = report(&config(true), dir.path(), &changed(&[&absolute]), &mut log)
            .await
            .unwrap();

        assert!(files.is_empty());
        assert!(log.comments.is_empty());
    }

    #[tokio::test]
    async fn test_report_missing_report_file() {
        let dir = TempDir::new().unwrap();
        let mut config = config(true);
        config.report_files = vec!["missing/pmd.xml".into(), "other/**/pmd.xml".into()];
        let mut log = CommentLog::new();

        let err = report(&config, dir.path(), &changed(&[]), &mut log)
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "PMD report file not found: missing/pmd.xml, other/**/pmd.xml"
        );
        assert!(log.comments.is_empty());
    }

    #[tokio::test]
    async fn test_report_requires_gradlew() {
        let dir = fixture_dir();
        let mut config = config(true);
        config.skip_gradle_task = false;
        let mut log = CommentLog::new();

        let err = report(&config, dir.path(), &changed(&[MAIN_ACTIVITY]), &mut log)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::GradlewNotFound));
        assert!(log.comments.is_empty());
    }

    #[tokio::test]
    async fn test_report_malformed_report_emits_nothing() {
        let dir = fixture_dir();
        let broken = dir.path().join("lib/build/reports/pmd");
        std::fs::create_dir_all(&broken).unwrap();
        std::fs::write(broken.join("pmd.xml"), "<pmd><file").unwrap();

        let mut config = config(true);
        config.report_files = vec!["*/build/reports/pmd/pmd.xml".into()];
        let mut log = CommentLog::new();

        let err = report(&config, dir.path(), &changed(&[MAIN_ACTIVITY]), &mut log)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Xml { .. }));
        assert!(log.comments.is_empty());
    }

    #[tokio::test]
    async fn test_orchestrate_and_run_writes_markdown() {
        let dir = fixture_dir();
        let output = dir.path().join("review.md");

        let blocking = orchestrate_and_run(
            &config(true),
            dir.path(),
            &changed(&[MAIN_ACTIVITY]),
            output.to_str(),
            OutputFormat::Console,
        )
        .await
        .unwrap();

        assert!(blocking);
        let content = std::fs::read_to_string(output).unwrap();
        assert!(content.starts_with(&format!("# Violations in {}", MAIN_ACTIVITY)));
        assert!(content.contains("- Line 39 (**error**)"));
    }

    #[tokio::test]
    async fn test_orchestrate_and_run_rejects_unknown_output() {
        let dir = fixture_dir();
        let output = dir.path().join("review.txt");

        let err = orchestrate_and_run(
            &config(true),
            dir.path(),
            &changed(&[]),
            output.to_str(),
            OutputFormat::Console,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains(".md or .json"));
    }
}
