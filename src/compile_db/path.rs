//! Host path conversion
//!
//! Compilation databases produced inside WSL reference sources as
//! `/mnt/c/...`, while a Windows-hosted clang-tidy expects `C:\...` (and the
//! other way around). Conversion applies to whole path tokens and to paths
//! glued onto compiler flags such as `-I/mnt/c/inc` or `--sysroot=C:\sdk`.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Path conversion strategy applied to every path embedded in a command line.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum PathConverter {
    /// Leave paths untouched
    #[default]
    None,
    /// `/mnt/c/src/a.cpp` -> `C:\src\a.cpp`
    WslToWindows,
    /// `C:\src\a.cpp` -> `/mnt/c/src/a.cpp`
    WindowsToWsl,
}

lazy_static! {
    // Optional flag prefix: `--flag=`/`-flag=` or a short flag such as `-I`/`-isystem`.
    static ref WSL_PATH: Regex =
        Regex::new(r"^(?P<prefix>--?[\w-]*=|-[A-Za-z]+)?/mnt/(?P<drive>[A-Za-z])(?P<rest>/.*)?$")
            .unwrap();
    static ref WINDOWS_PATH: Regex =
        Regex::new(r"^(?P<prefix>--?[\w-]*=|-[A-Za-z]+)?(?P<drive>[A-Za-z]):[\\/](?P<rest>.*)$")
            .unwrap();
}

impl PathConverter {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathConverter::None => "none",
            PathConverter::WslToWindows => "wsl-to-windows",
            PathConverter::WindowsToWsl => "windows-to-wsl",
        }
    }
}

impl std::fmt::Display for PathConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert `path` with the given strategy. Tokens that are not paths in the
/// source convention are returned unchanged.
pub fn convert_path(path: &str, converter: PathConverter) -> String {
    match converter {
        PathConverter::None => path.to_string(),
        PathConverter::WslToWindows => wsl_to_windows(path),
        PathConverter::WindowsToWsl => windows_to_wsl(path),
    }
}

fn wsl_to_windows(path: &str) -> String {
    let Some(caps) = WSL_PATH.captures(path) else {
        return path.to_string();
    };

    let prefix = caps.name("prefix").map_or("", |m| m.as_str());
    let drive = caps["drive"].to_ascii_uppercase();
    let rest = caps.name("rest").map_or("", |m| m.as_str());

    let rest = if rest.is_empty() {
        "\\".to_string()
    } else {
        rest.replace('/', "\\")
    };

    format!("{prefix}{drive}:{rest}")
}

fn windows_to_wsl(path: &str) -> String {
    let Some(caps) = WINDOWS_PATH.captures(path) else {
        return path.to_string();
    };

    let prefix = caps.name("prefix").map_or("", |m| m.as_str());
    let drive = caps["drive"].to_ascii_lowercase();
    let rest = caps["rest"].replace('\\', "/");

    format!("{prefix}/mnt/{drive}/{rest}")
}
