use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "pmd-review.toml";

/// Content written by `pmd-review init`
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Gradle task producing the PMD report(s)
gradle_task = "pmd"

# Use existing reports instead of running Gradle
skip_gradle_task = false

# Prefix stripped from report paths before matching changed files
# (defaults to the git top level directory)
# root_path = "/path/to/project"

# Report location, used when report_files is not set
report_file = "app/build/reports/pmd/pmd.xml"

# Report locations, glob patterns allowed
# report_files = ["app/build/reports/pmd/pmd.xml", "modules/**/build/reports/pmd/pmd.xml"]

# Attach comments to file and line instead of one summary line per violation
inline_mode = true
"#;

/// Configuration as read from file and overrides, before defaults that need
/// the environment are resolved
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default = "default_gradle_task")]
    pub gradle_task: String,
    #[serde(default)]
    pub skip_gradle_task: bool,
    #[serde(default)]
    pub root_path: Option<String>,
    #[serde(default = "default_report_file")]
    pub report_file: String,
    #[serde(default)]
    pub report_files: Option<Vec<String>>,
    #[serde(default = "default_inline_mode")]
    pub inline_mode: bool,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            gradle_task: default_gradle_task(),
            skip_gradle_task: false,
            root_path: None,
            report_file: default_report_file(),
            report_files: None,
            inline_mode: default_inline_mode(),
        }
    }
}

fn default_gradle_task() -> String {
    "pmd".to_string()
}

fn default_report_file() -> String {
    "app/build/reports/pmd/pmd.xml".to_string()
}

fn default_inline_mode() -> bool {
    true
}

/// Settings of a single review run, fixed before the run starts
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub gradle_task: String,
    pub skip_gradle_task: bool,
    pub root_path: String,
    pub report_files: Vec<String>,
    pub inline_mode: bool,
}

impl ConfigFile {
    /// Load a config file and apply `key=value` overrides on top of it
    ///
    /// A missing file is only an error when `required` is set.
    pub fn load(path: &str, required: bool, overrides: &[String]) -> Result<Self> {
        let mut table = if Path::new(path).exists() || required {
            debug!("Loading config from {}", path);
            let content = fs::read_to_string(path).map_err(|source| Error::Io {
                path: path.into(),
                source,
            })?;
            toml::from_str::<toml::Table>(&content)
                .map_err(|e| Error::Config(format!("{}: {}", path, e)))?
        } else {
            debug!("No config file at {}, using defaults", path);
            toml::Table::new()
        };

        for entry in overrides {
            let (key, value) = parse_override(entry)?;
            debug!("Config override: {} = {}", key, value);
            table.insert(key, value);
        }

        toml::Value::Table(table)
            .try_into()
            .map_err(|e| Error::Config(e.to_string()))
    }

    /// Fill in remaining defaults and validate
    ///
    /// `default_root` is only called when no root path was configured.
    pub fn resolve(self, default_root: impl FnOnce() -> String) -> Result<Config> {
        let report_files = self.report_files.unwrap_or_else(|| vec![self.report_file]);
        if report_files.is_empty() {
            return Err(Error::Config("report_files must not be empty".into()));
        }
        if !self.skip_gradle_task && self.gradle_task.trim().is_empty() {
            return Err(Error::Config("gradle_task must not be empty".into()));
        }

        Ok(Config {
            gradle_task: self.gradle_task,
            skip_gradle_task: self.skip_gradle_task,
            root_path: self.root_path.unwrap_or_else(default_root),
            report_files,
            inline_mode: self.inline_mode,
        })
    }
}

/// Split `key=value`, reading the value as TOML and falling back to a string
fn parse_override(entry: &str) -> Result<(String, toml::Value)> {
    let Some((key, raw)) = entry.split_once('=') else {
        return Err(Error::Config(format!(
            "override '{}' must have the form key=value",
            entry
        )));
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::Config(format!("override '{}' has an empty key", entry)));
    }

    let raw = raw.trim();
    let value = toml::from_str::<toml::Table>(&format!("value = {}", raw))
        .ok()
        .and_then(|mut t| t.remove("value"))
        .unwrap_or_else(|| toml::Value::String(raw.to_string()));

    Ok((key.to_string(), value))
}
