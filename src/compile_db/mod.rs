//! Compilation database loading
//!
//! Reads a clang JSON compilation database (`compile_commands.json`) into an
//! immutable, ordered list of [`CompileCommand`] records. Each record becomes
//! one analysis job; the index of a record in the database is its job index.
//!
//! Records may carry either an `arguments` array or a single shell-quoted
//! `command` string. Both are normalized to an argument vector at load time so
//! the rest of the crate never has to care which form the build system wrote.

pub mod path;

pub use path::{PathConverter, convert_path};

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a compilation database.
///
/// All of these are fatal: nothing is analyzed when the database cannot be
/// loaded completely.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("compilation database not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read compilation database {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse compilation database {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("entry {index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("entry {index} has an unparsable `command` string")]
    InvalidCommand {
        index: usize,
        #[source]
        source: shell_words::ParseError,
    },
}

/// One translation unit's compiler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileCommand {
    /// Working directory of the compiler invocation
    pub directory: String,
    /// Compiler command line, including the compiler itself
    pub arguments: Vec<String>,
    /// Main source file; empty when the record has no `file`
    pub input_path: String,
    /// Compiler output; empty when the record has no `output`
    pub output_path: String,
}

/// Raw record as it appears on disk.
#[derive(Debug, Deserialize)]
struct RawEntry {
    directory: Option<String>,
    arguments: Option<Vec<String>>,
    command: Option<String>,
    file: Option<String>,
    output: Option<String>,
}

impl RawEntry {
    fn into_command(self, index: usize) -> Result<CompileCommand, LoadError> {
        let directory = self.directory.ok_or(LoadError::MissingField {
            index,
            field: "directory",
        })?;

        let arguments = match (self.arguments, self.command) {
            (Some(arguments), _) => arguments,
            (None, Some(command)) => shell_words::split(&command)
                .map_err(|source| LoadError::InvalidCommand { index, source })?,
            (None, None) => {
                return Err(LoadError::MissingField {
                    index,
                    field: "arguments",
                });
            }
        };

        Ok(CompileCommand {
            directory,
            arguments,
            input_path: self.file.unwrap_or_default(),
            output_path: self.output.unwrap_or_default(),
        })
    }
}

/// Ordered, fixed-length list of compile commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileDatabase {
    entries: Vec<CompileCommand>,
}

impl CompileDatabase {
    /// Load and fully validate a database file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let database = Self::from_json(&content).map_err(|e| match e {
            LoadError::Parse { source, .. } => LoadError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        tracing::debug!(
            "Loaded {} compile commands from {}",
            database.len(),
            path.display()
        );
        Ok(database)
    }

    /// Parse a database from its JSON text.
    pub fn from_json(content: &str) -> Result<Self, LoadError> {
        let raw: Vec<RawEntry> =
            serde_json::from_str(content).map_err(|source| LoadError::Parse {
                path: PathBuf::new(),
                source,
            })?;

        let entries = raw
            .into_iter()
            .enumerate()
            .map(|(index, entry)| entry.into_command(index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CompileCommand> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompileCommand> {
        self.entries.iter()
    }
}

impl From<Vec<CompileCommand>> for CompileDatabase {
    fn from(entries: Vec<CompileCommand>) -> Self {
        Self { entries }
    }
}

impl std::ops::Index<usize> for CompileDatabase {
    type Output = CompileCommand;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}

impl<'a> IntoIterator for &'a CompileDatabase {
    type Item = &'a CompileCommand;
    type IntoIter = std::slice::Iter<'a, CompileCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
