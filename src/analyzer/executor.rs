use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::command::compose;
use crate::compile_db::CompileCommand;
use crate::config::RunConfiguration;
use crate::external::ProcessLauncher;

/// How a single job ended.
///
/// The analyzer's exit code is carried for logging only. A non-zero exit with
/// no output is reported as `Clean`, exactly like a run without findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// The analyzer printed something; it was written to `path`
    Findings { path: PathBuf, exit_code: Option<i32> },
    /// The analyzer printed nothing; no file was written
    Clean { exit_code: Option<i32> },
}

/// Per-job failure. Never fatal to the pool.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("failed to start analyzer `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write findings to {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Output file name for a job: `<basename>.<sha256 of the input path>`.
///
/// The digest covers the full input path, so two sources sharing a basename
/// in different directories never collide.
pub fn output_file_name(input_path: &str) -> String {
    let basename = Path::new(input_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let digest = Sha256::digest(input_path.as_bytes());

    format!("{basename}.{digest:x}")
}

/// Run the analyzer for one job and persist its output.
pub fn run_one(
    job: &CompileCommand,
    config: &RunConfiguration,
    output_dir: &Path,
    launcher: &dyn ProcessLauncher,
) -> Result<JobOutcome, JobError> {
    let argv = compose(job, config);

    let captured = launcher
        .capture_stdout(&argv)
        .map_err(|source| JobError::Spawn {
            program: config.clang_tidy.clone(),
            source,
        })?;

    if !captured.success() {
        tracing::debug!(
            "{}: analyzer exited with {:?}, {} bytes of output",
            job.input_path,
            captured.exit_code,
            captured.stdout.len()
        );
    }

    if captured.stdout.is_empty() {
        return Ok(JobOutcome::Clean {
            exit_code: captured.exit_code,
        });
    }

    let path = output_dir.join(output_file_name(&job.input_path));
    std::fs::write(&path, format!("{}\n", captured.stdout))
        .map_err(|source| JobError::Write {
            path: path.clone(),
            source,
        })?;

    Ok(JobOutcome::Findings {
        path,
        exit_code: captured.exit_code,
    })
}
