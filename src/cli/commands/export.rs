//! Export command implementation
//!
//! Writes the compilation database back out with the configured path
//! conversion applied and the additional options appended to every command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use crate::analyzer::dump_entries;
use crate::cli::Output;
use crate::cli::commands::existing_file;
use crate::compile_db::{CompileDatabase, PathConverter};
use crate::config::{ConfigOverrides, RunConfiguration};

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Compilation database to rewrite (compile_commands.json)
    #[arg(value_name = "COMPILE_COMMANDS", value_parser = existing_file)]
    pub compile_commands: PathBuf,

    /// Destination file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path conversion applied to every path
    #[arg(long, value_enum)]
    pub path_converter: Option<PathConverter>,

    /// Extra option appended to every command (repeatable)
    #[arg(long = "extra-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub extra_args: Vec<String>,
}

pub fn execute(args: ExportArgs, config_path: Option<&Path>, output: &Output) -> Result<()> {
    let overrides = ConfigOverrides {
        path_converter: args.path_converter,
        ..Default::default()
    }
    .with_additional_opts(args.extra_args);
    let config = RunConfiguration::load(config_path, Some(&overrides))?;

    let database = CompileDatabase::load(&args.compile_commands)
        .with_context(|| format!("Cannot export {}", args.compile_commands.display()))?;

    let entries = dump_entries(&database, &config);
    let json = serde_json::to_string_pretty(&entries).context("Failed to serialize entries")?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, format!("{json}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            output.success(&format!(
                "Exported {} entries to {}",
                entries.len(),
                path.display()
            ));
        }
        None => println!("{json}"),
    }

    Ok(())
}
