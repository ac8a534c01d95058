use clap::{Parser, Subcommand, ValueEnum};

// Display order for log level option (placed at end of help text)
const LOG_LEVEL_DISPLAY_ORDER: usize = 100;

/// CLI arguments
#[derive(Parser)]
#[command(name = "pmd-review", version, about = "Report PMD violations on changed files", long_about = None)]
pub struct Cli {
    /// Log level (see https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
    /// [env: PMD_REVIEW_LOG=] [default: info]
    #[arg(
        long,
        env = "PMD_REVIEW_LOG",
        default_value = "info",
        global = true,
        hide_default_value = true,
        hide_env = true,
        display_order = LOG_LEVEL_DISPLAY_ORDER,
        verbatim_doc_comment
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a default pmd-review.toml config file
    Init(InitArgs),
    /// Run PMD and report violations in changed files
    Report(ReportArgs),
}

/// Arguments for the init command
#[derive(Parser)]
pub struct InitArgs {
    /// Path to config file
    #[arg(long, default_value = crate::config::DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Override existing config file
    #[arg(long)]
    pub r#override: bool,
}

/// How comments are printed
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Log lines on stderr
    #[default]
    Console,
    /// GitHub Actions workflow commands on stdout
    Github,
}

/// Arguments for the report command
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Path to config file (initialize with `pmd-review init`).
    /// A missing file is ignored unless given explicitly
    #[arg(long)]
    pub config: Option<String>,

    /// Override config values (e.g. gradle_task=app:pmd)
    #[arg(long = "config-override")]
    pub config_overrides: Vec<String>,

    /// Gradle task to run [default: pmd]
    #[arg(long)]
    pub gradle_task: Option<String>,

    /// Use existing reports instead of running Gradle
    #[arg(long)]
    pub skip_gradle_task: bool,

    /// Prefix stripped from report paths [default: git top level]
    #[arg(long)]
    pub root_path: Option<String>,

    /// Report file or glob pattern, repeatable [default: app/build/reports/pmd/pmd.xml]
    #[arg(long = "report-file")]
    pub report_files: Vec<String>,

    /// Post one summary line per violation instead of inline comments
    #[arg(long)]
    pub summary: bool,

    /// Base commit to compare against.
    /// Examples: HEAD^ or ^, HEAD~1 or ~1, commit hash, origin/main.
    /// HEAD for uncommitted changes, ROOT for all files
    /// [default: HEAD if uncommitted changes exist, otherwise ^]
    #[arg(
        long,
        default_value = "",
        hide_default_value = true,
        verbatim_doc_comment
    )]
    pub base: String,

    /// Changed file relative to the root path, repeatable (skips git)
    #[arg(long = "changed-file")]
    pub changed_files: Vec<String>,

    /// Output file path (.md or .json)
    #[arg(long)]
    pub output: Option<String>,

    /// Console output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
    pub format: OutputFormat,
}
