use crate::error::{Error, Result};
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::{debug, info};

/// Name of the Gradle wrapper script expected in the project directory
pub const GRADLEW: &str = "gradlew";

/// Check whether the Gradle wrapper is present in `dir`
pub fn gradlew_exists(dir: &Path) -> bool {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return false;
    };
    entries
        .filter_map(|entry| entry.ok())
        .any(|entry| entry.file_name() == GRADLEW)
}

/// Run `./gradlew <task>` in `dir` and wait for it to exit
///
/// Output is inherited so the build log stays visible. The exit status is
/// returned as-is; only a failure to spawn the process is an error.
pub async fn run_task(dir: &Path, task: &str) -> Result<ExitStatus> {
    if !gradlew_exists(dir) {
        return Err(Error::GradlewNotFound);
    }

    info!("Running ./{} {}", GRADLEW, task);
    let status = Command::new(dir.join(GRADLEW))
        .arg(task)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(Error::Gradle)?;
    debug!("Gradle exited with {}", status);

    Ok(status)
}
