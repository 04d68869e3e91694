use serde::Serialize;
use std::path::PathBuf;

use crate::compile_db::PathConverter;
use crate::external::LauncherKind;

/// Configuration values given on the command line.
///
/// Only fields that are set are serialized, so unset flags leave the lower
/// configuration layers untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clang_tidy: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<String>,

    /// Replaces the configured list when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_opts: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_converter: Option<PathConverter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub launcher: Option<LauncherKind>,

    #[serde(skip_serializing_if = "ParallelOverrides::is_empty")]
    pub parallel: ParallelOverrides,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ParallelOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
}

impl ParallelOverrides {
    pub fn is_empty(&self) -> bool {
        self.workers.is_none()
    }
}

impl ConfigOverrides {
    /// An empty extra-arg list means "not given", not "clear the list".
    pub fn with_additional_opts(mut self, opts: Vec<String>) -> Self {
        if !opts.is_empty() {
            self.additional_opts = Some(opts);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_fields_are_not_serialized() {
        let value = serde_json::to_value(ConfigOverrides::default()).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn test_set_fields_are_serialized() {
        let overrides = ConfigOverrides {
            checks: Some("-*,modernize-*".to_string()),
            path_converter: Some(PathConverter::WslToWindows),
            parallel: ParallelOverrides { workers: Some(3) },
            ..Default::default()
        }
        .with_additional_opts(vec![]);

        let value = serde_json::to_value(overrides).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "checks": "-*,modernize-*",
                "path_converter": "wsl-to-windows",
                "parallel": { "workers": 3 }
            })
        );
    }
}
