//! External process integration
//!
//! Everything that starts other programs lives here: the launch strategies
//! used for analyzer invocations and the startup check that the analyzer can
//! be found at all.

pub mod launcher;

pub use launcher::{CapturedOutput, DirectLauncher, LauncherKind, ProcessLauncher, ShellLauncher};

use std::path::PathBuf;

/// Locate the analyzer binary on `PATH` (or verify an explicit path).
///
/// Returns `None` when it cannot be found; callers warn rather than fail,
/// since every job would then silently produce no findings.
pub fn locate_analyzer(binary: &str) -> Option<PathBuf> {
    which::which(binary).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_missing_analyzer() {
        assert!(locate_analyzer("tidyrun-no-such-analyzer-9f2c").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_locate_common_binary() {
        assert!(locate_analyzer("sh").is_some());
    }
}
