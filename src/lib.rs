//! # tidyrun - parallel clang-tidy over a compilation database
//!
//! tidyrun reads a `compile_commands.json`, turns every entry into a
//! clang-tidy command line and runs those commands on a pool of worker
//! threads. Each translation unit that produces diagnostics gets its own
//! findings file in the output directory.
//!
//! ## Features
//!
//! - **Lock-free job claiming**: workers pull job indices from a shared atomic counter
//! - **Path conversion**: rewrite WSL paths to Windows paths and back
//! - **Layered configuration**: defaults, user and repository files, environment, CLI flags
//! - **Database export**: write the rewritten compilation database back out
//!
//! ## Quick Start
//!
//! ```bash
//! # Analyze every translation unit with 8 workers
//! tidyrun run build/compile_commands.json -j 8
//!
//! # See what would run
//! tidyrun run build/compile_commands.json --dry-run
//! ```

pub mod analyzer;
pub mod cli;
pub mod compile_db;
pub mod config;
pub mod external;
pub mod parallel;

pub use cli::{Cli, Output};
pub use config::RunConfiguration;
