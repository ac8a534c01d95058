mod cli;
mod comment;
mod config;
mod discovery;
mod error;
mod git;
mod gradle;
mod orchestrator;
mod pmd;
mod render;

use anyhow::{Context, bail};
use clap::Parser;
use cli::{Cli, Commands, InitArgs, ReportArgs};
use config::{ConfigFile, DEFAULT_CONFIG_PATH, DEFAULT_CONFIG_TEMPLATE};
use std::collections::HashSet;
use std::io::IsTerminal;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const EXIT_FAILURE: i32 = 1;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cli.log_level))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Init(args) => init(&args).map(|()| false),
        Commands::Report(args) => report(&args).await,
    };

    match result {
        Ok(false) => {}
        Ok(true) => std::process::exit(EXIT_FAILURE),
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(EXIT_FAILURE);
        }
    }
}

fn init(args: &InitArgs) -> anyhow::Result<()> {
    if Path::new(&args.config).exists() && !args.r#override {
        bail!(
            "{} already exists, use --override to replace it",
            args.config
        );
    }
    std::fs::write(&args.config, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {}", args.config))?;
    info!("Config written to {}", args.config);
    Ok(())
}

/// Returns whether blocking violations were found
async fn report(args: &ReportArgs) -> anyhow::Result<bool> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut file = ConfigFile::load(config_path, args.config.is_some(), &args.config_overrides)
        .context("Failed to load config")?;

    if let Some(task) = &args.gradle_task {
        file.gradle_task = task.clone();
    }
    if args.skip_gradle_task {
        file.skip_gradle_task = true;
    }
    if let Some(root) = &args.root_path {
        file.root_path = Some(root.clone());
    }
    if !args.report_files.is_empty() {
        file.report_files = Some(args.report_files.clone());
    }
    if args.summary {
        file.inline_mode = false;
    }

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let config = file.resolve(|| default_root(&cwd))?;
    debug!("Config: {:?}", config);

    let changed_files: HashSet<String> = if args.changed_files.is_empty() {
        let base = git::Base::parse(&args.base);
        debug!("Resolved base: {:?}", base);
        git::changed_files(&base)
            .context("Failed to list changed files")?
            .into_iter()
            .collect()
    } else {
        args.changed_files.iter().cloned().collect()
    };
    info!("Found {} changed files", changed_files.len());

    let blocking = orchestrator::orchestrate_and_run(
        &config,
        &cwd,
        &changed_files,
        args.output.as_deref(),
        args.format,
    )
    .await?;
    Ok(blocking)
}

fn default_root(cwd: &Path) -> String {
    git::toplevel().unwrap_or_else(|e| {
        warn!("{}, using {} as root path", e, cwd.display());
        cwd.to_string_lossy().into_owned()
    })
}
