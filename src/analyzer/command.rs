//! Analyzer command composition
//!
//! Pure translation from a compile command plus configuration into the
//! clang-tidy argument vector, and into rewritten compilation database
//! entries for export. Neither function touches the filesystem.

use serde::Serialize;

use crate::compile_db::{CompileCommand, CompileDatabase, convert_path};
use crate::config::RunConfiguration;

/// Fixed flags that follow the analyzer binary on every command line.
pub const QUIET_FLAG: &str = "--quiet";
pub const HEADER_FILTER_FLAG: &str = "--header-filter=\".*\"";

/// Separates analyzer options from the compiler command line.
pub const ARGS_SEPARATOR: &str = "--";

/// Build the analyzer command line for one job.
///
/// Order is part of clang-tidy's CLI contract: binary, `--quiet`,
/// `--header-filter`, `--checks`, converted input path, `--`, converted
/// compiler arguments, then the additional options verbatim.
pub fn compose(job: &CompileCommand, config: &RunConfiguration) -> Vec<String> {
    let converter = config.path_converter;
    let mut argv = Vec::with_capacity(job.arguments.len() + config.additional_opts.len() + 6);

    argv.push(config.clang_tidy.clone());
    argv.push(QUIET_FLAG.to_string());
    argv.push(HEADER_FILTER_FLAG.to_string());
    argv.push(format!("--checks=\"{}\"", config.checks));
    argv.push(convert_path(&job.input_path, converter));
    argv.push(ARGS_SEPARATOR.to_string());

    argv.extend(job.arguments.iter().map(|arg| convert_path(arg, converter)));
    argv.extend(config.additional_opts.iter().cloned());

    argv
}

/// One entry of a rewritten compilation database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportEntry {
    pub directory: String,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Rewrite every database entry with converted paths and the additional
/// options appended to its command string.
pub fn dump_entries(database: &CompileDatabase, config: &RunConfiguration) -> Vec<ExportEntry> {
    let converter = config.path_converter;
    let non_empty = |path: &str| (!path.is_empty()).then(|| convert_path(path, converter));

    database
        .iter()
        .map(|job| {
            let tokens = job
                .arguments
                .iter()
                .map(|arg| convert_path(arg, converter))
                .chain(config.additional_opts.iter().cloned());

            ExportEntry {
                directory: convert_path(&job.directory, converter),
                command: join_command(tokens),
                file: non_empty(&job.input_path),
                output: non_empty(&job.output_path),
            }
        })
        .collect()
}

// A separator is only inserted once the command is non-empty, so empty
// leading tokens do not produce leading spaces.
fn join_command(tokens: impl Iterator<Item = String>) -> String {
    tokens.fold(String::new(), |mut command, token| {
        if !command.is_empty() {
            command.push(' ');
        }
        command.push_str(&token);
        command
    })
}
