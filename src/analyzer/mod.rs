//! Analyzer job execution
//!
//! Ties the pieces together: every worker of a [`WorkerPool`] claims a job
//! index, [`command::compose`] turns the job into a clang-tidy command line,
//! and [`executor::run_one`] runs it and writes the findings.
//!
//! Per-job failures are logged and never stop the pool. The analyzer's exit
//! status is not interpreted: an invocation that fails without printing
//! anything is indistinguishable from one with no findings. The exit code is
//! logged at debug level so the gap can at least be observed.

pub mod command;
pub mod executor;

pub use command::{ExportEntry, compose, dump_entries};
pub use executor::{JobError, JobOutcome, output_file_name, run_one};

use anyhow::Result;
use std::path::Path;

use crate::compile_db::CompileDatabase;
use crate::config::RunConfiguration;
use crate::external::ProcessLauncher;
use crate::parallel::{CancellationToken, ClaimCounter, WorkerPool};

/// What a finished run can say about itself without looking at findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Jobs handed to a worker
    pub claimed: usize,
    /// Jobs in the database
    pub total: usize,
    /// Whether the run stopped early on cancellation
    pub cancelled: bool,
}

/// Analyze every job of `database` on `workers` threads.
///
/// Blocks until all workers are done. `output_dir` must already exist.
pub fn run(
    database: &CompileDatabase,
    config: &RunConfiguration,
    output_dir: &Path,
    workers: usize,
    launcher: &dyn ProcessLauncher,
    cancel: &CancellationToken,
) -> Result<RunReport> {
    let counter = ClaimCounter::new(database.len());
    let pool = WorkerPool::new(workers);

    tracing::info!(
        "Analyzing {} translation units with {} workers ({} launcher)",
        database.len(),
        pool.workers(),
        launcher.name()
    );

    pool.run(&counter, cancel, |index, worker_id| {
        let job = &database[index];
        tracing::debug!("worker-{worker_id}: job {index} {}", job.input_path);

        match run_one(job, config, output_dir, launcher) {
            Ok(JobOutcome::Findings { path, .. }) => {
                tracing::info!("{}: findings written to {}", job.input_path, path.display());
            }
            Ok(JobOutcome::Clean { .. }) => {
                tracing::debug!("{}: no findings", job.input_path);
            }
            Err(e) => {
                let cause = std::error::Error::source(&e)
                    .map(|source| format!(": {source}"))
                    .unwrap_or_default();
                tracing::warn!("{}: {e}{cause}", job.input_path);
            }
        }
    })?;

    let report = RunReport {
        claimed: counter.issued(),
        total: database.len(),
        cancelled: cancel.is_cancelled() && !counter.is_exhausted(),
    };
    tracing::info!("Claimed {}/{} jobs", report.claimed, report.total);

    Ok(report)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::compile_db::CompileCommand;
    use crate::external::{CapturedOutput, DirectLauncher};
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn database(inputs: &[&str]) -> CompileDatabase {
        inputs
            .iter()
            .map(|input| CompileCommand {
                directory: "/build".to_string(),
                arguments: vec!["c++".to_string(), "-c".to_string(), input.to_string()],
                input_path: input.to_string(),
                output_path: String::new(),
            })
            .collect::<Vec<_>>()
            .into()
    }

    fn analyzer(binary: &str) -> RunConfiguration {
        RunConfiguration {
            clang_tidy: binary.to_string(),
            checks: "-*".to_string(),
            ..Default::default()
        }
    }

    fn written_files(dir: &Path) -> HashSet<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_echo_analyzer_writes_one_file_per_job() {
        let temp_dir = TempDir::new().unwrap();
        let db = database(&["a.cpp", "b.cpp", "c.cpp"]);

        let report = run(
            &db,
            &analyzer("echo"),
            temp_dir.path(),
            2,
            &DirectLauncher,
            &CancellationToken::new(),
        )
        .unwrap();

        assert_eq!(
            report,
            RunReport {
                claimed: 3,
                total: 3,
                cancelled: false
            }
        );

        let expected: HashSet<_> = ["a.cpp", "b.cpp", "c.cpp"]
            .iter()
            .map(|input| output_file_name(input))
            .collect();
        assert_eq!(written_files(temp_dir.path()), expected);

        for input in ["a.cpp", "b.cpp", "c.cpp"] {
            let content =
                std::fs::read_to_string(temp_dir.path().join(output_file_name(input))).unwrap();
            // echo prints the whole command line, input path included
            assert_eq!(
                content,
                format!(
                    "--quiet --header-filter=\".*\" --checks=\"-*\" {input} -- c++ -c {input}\n\n"
                )
            );
        }
    }

    /// Analyzer stand-in that prints only the input path it was given.
    struct InputEcho;

    impl ProcessLauncher for InputEcho {
        fn name(&self) -> &'static str {
            "input-echo"
        }

        fn capture_stdout(&self, argv: &[String]) -> std::io::Result<CapturedOutput> {
            // binary, --quiet, --header-filter, --checks, input path
            let input = argv[4].clone();
            DirectLauncher.capture_stdout(&["printf".to_string(), "%s".to_string(), input])
        }
    }

    #[test]
    fn test_three_jobs_two_workers_write_input_paths() {
        let temp_dir = TempDir::new().unwrap();
        let inputs = ["src/a.cpp", "src/b.cpp", "test/a.cpp"];

        let report = run(
            &database(&inputs),
            &analyzer("clang-tidy"),
            temp_dir.path(),
            2,
            &InputEcho,
            &CancellationToken::new(),
        )
        .unwrap();

        assert_eq!(report.claimed, 3);
        assert_eq!(written_files(temp_dir.path()).len(), 3);

        for input in inputs {
            let content =
                std::fs::read_to_string(temp_dir.path().join(output_file_name(input))).unwrap();
            assert_eq!(content, format!("{input}\n"));
        }
    }

    #[test]
    fn test_failing_analyzer_produces_nothing_and_no_error() {
        let temp_dir = TempDir::new().unwrap();
        let db = database(&["a.cpp", "b.cpp", "c.cpp"]);

        let report = run(
            &db,
            &analyzer("false"),
            temp_dir.path(),
            2,
            &DirectLauncher,
            &CancellationToken::new(),
        )
        .unwrap();

        assert_eq!(report.claimed, 3);
        assert!(written_files(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_missing_analyzer_is_isolated_per_job() {
        let temp_dir = TempDir::new().unwrap();
        let db = database(&["a.cpp", "b.cpp"]);

        let report = run(
            &db,
            &analyzer("tidyrun-no-such-analyzer-41c7"),
            temp_dir.path(),
            4,
            &DirectLauncher,
            &CancellationToken::new(),
        )
        .unwrap();

        assert_eq!(report.claimed, 2);
        assert!(written_files(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_empty_database() {
        let temp_dir = TempDir::new().unwrap();
        let report = run(
            &CompileDatabase::default(),
            &analyzer("echo"),
            temp_dir.path(),
            3,
            &DirectLauncher,
            &CancellationToken::new(),
        )
        .unwrap();

        assert_eq!(report.claimed, 0);
        assert_eq!(report.total, 0);
        assert!(!report.cancelled);
    }

    #[test]
    fn test_cancelled_run_claims_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = run(
            &database(&["a.cpp"]),
            &analyzer("echo"),
            temp_dir.path(),
            2,
            &DirectLauncher,
            &cancel,
        )
        .unwrap();

        assert_eq!(report.claimed, 0);
        assert!(report.cancelled);
        assert!(written_files(temp_dir.path()).is_empty());
    }
}
