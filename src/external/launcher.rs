//! Process launching strategies
//!
//! The analyzer is either executed directly from its argument vector or, where
//! the host needs a command interpreter to honor shell-style quoting, through
//! a shell. The strategy is picked once at startup and shared by all workers.

use serde::{Deserialize, Serialize};
use std::io;
use std::process::{Command, Stdio};

/// Result of running one process to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Standard output, decoded lossily as UTF-8
    pub stdout: String,
    /// Exit code; `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs a command line and captures its standard output.
///
/// Implementations attach no stdin, discard stderr and block until the child
/// exits. An `Err` means the process could not be started at all.
pub trait ProcessLauncher: Send + Sync {
    fn name(&self) -> &'static str;

    fn capture_stdout(&self, argv: &[String]) -> io::Result<CapturedOutput>;
}

/// Executes `argv[0]` with the remaining arguments, no shell involved.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectLauncher;

impl ProcessLauncher for DirectLauncher {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn capture_stdout(&self, argv: &[String]) -> io::Result<CapturedOutput> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command line"))?;

        let mut cmd = Command::new(program);
        cmd.args(args);
        capture(cmd)
    }
}

/// Joins the argument vector into one command line for the platform shell.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellLauncher;

impl ShellLauncher {
    /// Join `argv` so the shell hands the same tokens back.
    ///
    /// Empty tokens and tokens with whitespace are double-quoted, with inner
    /// quotes and the backslashes preceding them escaped. Other tokens pass
    /// through as-is, so pre-quoted flags like `--checks="-*"` keep their
    /// quotes for the shell to strip.
    pub fn command_line(argv: &[String]) -> String {
        argv.iter()
            .map(|arg| quote_arg(arg))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn quote_arg(arg: &str) -> String {
    if !arg.is_empty() && !arg.chars().any(char::is_whitespace) {
        return arg.to_string();
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    let mut backslashes = 0usize;
    quoted.push('"');

    for c in arg.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                quoted.extend(std::iter::repeat_n('\\', backslashes * 2 + 1));
                quoted.push('"');
                backslashes = 0;
            }
            _ => {
                quoted.extend(std::iter::repeat_n('\\', backslashes));
                quoted.push(c);
                backslashes = 0;
            }
        }
    }

    // Trailing backslashes would otherwise escape the closing quote
    quoted.extend(std::iter::repeat_n('\\', backslashes * 2));
    quoted.push('"');
    quoted
}

impl ProcessLauncher for ShellLauncher {
    fn name(&self) -> &'static str {
        "shell"
    }

    fn capture_stdout(&self, argv: &[String]) -> io::Result<CapturedOutput> {
        if argv.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "empty command line",
            ));
        }

        let line = Self::command_line(argv);
        let cmd = if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(line);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(line);
            cmd
        };
        capture(cmd)
    }
}

fn capture(mut cmd: Command) -> io::Result<CapturedOutput> {
    let output = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()?;

    Ok(CapturedOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        exit_code: output.status.code(),
    })
}

/// Launcher selection as written in configuration.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LauncherKind {
    /// Shell on Windows, direct execution elsewhere
    #[default]
    Auto,
    Direct,
    Shell,
}

impl LauncherKind {
    /// Resolve `Auto` against the host platform.
    pub fn resolve(self) -> LauncherKind {
        match self {
            LauncherKind::Auto if cfg!(windows) => LauncherKind::Shell,
            LauncherKind::Auto => LauncherKind::Direct,
            other => other,
        }
    }

    pub fn build(self) -> Box<dyn ProcessLauncher> {
        match self.resolve() {
            LauncherKind::Shell => Box::new(ShellLauncher),
            _ => Box::new(DirectLauncher),
        }
    }
}
