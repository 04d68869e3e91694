//! Command implementations for the tidyrun CLI
//!
//! Each command is organized into its own module.

pub mod config;
pub mod export;
pub mod run;
pub mod version;

use std::path::PathBuf;

/// clap value parser: the argument must name an existing regular file.
pub fn existing_file(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("File {value} not found or invalid."))
    }
}
