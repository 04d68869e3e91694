//! Command-line interface for tidyrun
//!
//! Argument parsing with clap, logging setup, and dispatch to the command
//! implementations in [`commands`].

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;
mod output;

pub use output::Output;

/// tidyrun - parallel clang-tidy over a compilation database
#[derive(Parser)]
#[command(name = "tidyrun", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Run as if started in <DIR> instead of the current working directory
    #[arg(short = 'C', long = "directory", value_name = "DIR", global = true)]
    pub directory: Option<PathBuf>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use this configuration file instead of the user and repository ones
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run clang-tidy on every translation unit of a compilation database
    Run(commands::run::RunArgs),
    /// Write a compilation database with converted paths and extra options
    Export(commands::export::ExportArgs),
    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Show version information
    Version,
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the merged configuration as JSON
    Show,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.verbose > 0, self.quiet);
        let config_path = self.config.as_deref();

        match self.command {
            Some(Commands::Run(args)) => commands::run::execute(args, config_path, &output),
            Some(Commands::Export(args)) => commands::export::execute(args, config_path, &output),
            Some(Commands::Config(cmd)) => commands::config::execute(cmd, config_path),
            Some(Commands::Version) => commands::version::execute(&output),
            None => {
                let mut cmd = Cli::command();
                cmd.print_help()?;
                Ok(())
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // stdout is reserved for command output (export writes JSON there)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
