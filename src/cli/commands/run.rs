use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::analyzer::{self, compose};
use crate::cli::Output;
use crate::cli::commands::existing_file;
use crate::compile_db::{CompileDatabase, PathConverter};
use crate::config::overrides::ParallelOverrides;
use crate::config::{ConfigOverrides, RunConfiguration};
use crate::external::{LauncherKind, ShellLauncher, locate_analyzer};
use crate::parallel::CancellationToken;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Compilation database to analyze (compile_commands.json)
    #[arg(value_name = "COMPILE_COMMANDS", value_parser = existing_file)]
    pub compile_commands: PathBuf,

    /// Directory for findings (one file per translation unit)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Number of worker threads (default: sized from CPU cores)
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<usize>,

    /// clang-tidy check specifier
    #[arg(long, allow_hyphen_values = true)]
    pub checks: Option<String>,

    /// Path to the clang-tidy binary
    #[arg(long, value_name = "PATH")]
    pub clang_tidy: Option<String>,

    /// Path conversion applied to every path in the command line
    #[arg(long, value_enum)]
    pub path_converter: Option<PathConverter>,

    /// Extra option appended to every analyzer command (repeatable)
    #[arg(long = "extra-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub extra_args: Vec<String>,

    /// Process launch strategy
    #[arg(long, value_enum)]
    pub launcher: Option<LauncherKind>,

    /// Print the analyzer command lines without running them
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            clang_tidy: self.clang_tidy.clone(),
            checks: self.checks.clone(),
            path_converter: self.path_converter,
            output_directory: self.output_dir.clone(),
            launcher: self.launcher,
            parallel: ParallelOverrides { workers: self.jobs },
            ..Default::default()
        }
        .with_additional_opts(self.extra_args.clone())
    }
}

pub fn execute(args: RunArgs, config_path: Option<&Path>, output: &Output) -> Result<()> {
    let config = RunConfiguration::load(config_path, Some(&args.overrides()))?;

    // Loading is all-or-nothing and happens before any worker starts
    let database = CompileDatabase::load(&args.compile_commands)
        .with_context(|| format!("Cannot analyze {}", args.compile_commands.display()))?;

    let launcher_kind = config.launcher.resolve();

    if args.dry_run {
        return print_commands(&database, &config, launcher_kind, output);
    }

    match locate_analyzer(&config.clang_tidy) {
        Some(path) => output.verbose(&format!("Using analyzer {}", path.display())),
        None => output.warning(&format!(
            "Analyzer '{}' not found; every job will report no findings",
            config.clang_tidy
        )),
    }

    std::fs::create_dir_all(&config.output_directory).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.output_directory.display()
        )
    })?;

    // First signal stops new claims, a second one terminates immediately
    let cancel = CancellationToken::new();
    for signal in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
        signal_hook::flag::register_conditional_shutdown(signal, 1, cancel.flag())
            .context("Failed to install signal handler")?;
        signal_hook::flag::register(signal, cancel.flag())
            .context("Failed to install signal handler")?;
    }

    let workers = config.worker_count();
    let launcher = launcher_kind.build();

    output.info(&format!(
        "Analyzing {} translation units with {} workers",
        database.len(),
        workers
    ));

    let start = Instant::now();
    let report = analyzer::run(
        &database,
        &config,
        &config.output_directory,
        workers,
        launcher.as_ref(),
        &cancel,
    )?;
    let elapsed = start.elapsed().as_secs_f64();

    if report.cancelled {
        anyhow::bail!(
            "Cancelled after {}/{} translation units ({:.2}s); findings in {} are incomplete",
            report.claimed,
            report.total,
            elapsed,
            config.output_directory.display()
        );
    }

    output.success(&format!(
        "Finished {} translation units in {:.2}s; findings are in {}",
        report.total,
        elapsed,
        config.output_directory.display()
    ));

    Ok(())
}

fn print_commands(
    database: &CompileDatabase,
    config: &RunConfiguration,
    launcher: LauncherKind,
    output: &Output,
) -> Result<()> {
    output.info(&format!(
        "Dry run: {} commands ({:?} launcher)",
        database.len(),
        launcher
    ));

    for (index, job) in database.iter().enumerate() {
        let argv = compose(job, config);
        output.command_line(index, &ShellLauncher::command_line(&argv));
    }

    Ok(())
}
