//! Configuration management for tidyrun
//!
//! A run is driven by one [`RunConfiguration`], assembled by figment from
//! layered sources (see [`core`]) and then shared read-only by every worker.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::compile_db::PathConverter;
use crate::external::LauncherKind;
use crate::parallel::calculate_optimal_workers;

pub mod core;
pub mod overrides;
pub mod smart_load;

pub use overrides::ConfigOverrides;

/// Everything a run needs besides the compilation database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfiguration {
    /// Analyzer executable (name on PATH or a path)
    pub clang_tidy: String,

    /// Check-set specifier, passed as `--checks="<checks>"`
    pub checks: String,

    /// Options appended verbatim to every analyzer command line
    #[serde(default)]
    pub additional_opts: Vec<String>,

    /// How paths are rewritten before they reach the analyzer
    #[serde(default)]
    pub path_converter: PathConverter,

    /// Where findings are written
    pub output_directory: PathBuf,

    /// Process launch strategy
    #[serde(default)]
    pub launcher: LauncherKind,

    /// Worker pool sizing
    #[serde(default)]
    pub parallel: ParallelConfig,
}

/// Worker pool sizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// Fixed number of workers (0 = size from CPU cores)
    #[serde(default)]
    pub workers: usize,

    /// Upper bound for the automatic size (0 = unbounded)
    #[serde(default)]
    pub max_threads: usize,

    /// Percentage of CPU cores used by the automatic size (1-100)
    #[serde(default = "default_thread_percentage")]
    pub thread_percentage: u8,
}

fn default_thread_percentage() -> u8 {
    75
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            max_threads: 0,
            thread_percentage: default_thread_percentage(),
        }
    }
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self {
            clang_tidy: "clang-tidy".to_string(),
            checks: "clang-diagnostic-*,clang-analyzer-*".to_string(),
            additional_opts: vec![],
            path_converter: PathConverter::None,
            output_directory: PathBuf::from("tidy-reports"),
            launcher: LauncherKind::Auto,
            parallel: ParallelConfig::default(),
        }
    }
}

impl RunConfiguration {
    /// Number of workers the pool should run with.
    pub fn worker_count(&self) -> usize {
        if self.parallel.workers > 0 {
            self.parallel.workers
        } else {
            calculate_optimal_workers(self.parallel.max_threads, self.parallel.thread_percentage)
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.clang_tidy.trim().is_empty() {
            anyhow::bail!("Analyzer path (clang_tidy) cannot be empty");
        }

        if self.output_directory.as_os_str().is_empty() {
            anyhow::bail!("Output directory cannot be empty");
        }

        if !(1..=100).contains(&self.parallel.thread_percentage) {
            anyhow::bail!(
                "parallel.thread_percentage must be between 1 and 100, got {}",
                self.parallel.thread_percentage
            );
        }

        Ok(())
    }
}
