//! Version command implementation

use crate::cli::Output;
use anyhow::Result;

/// Execute the version command
pub fn execute(output: &Output) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let name = env!("CARGO_PKG_NAME");
    let description = env!("CARGO_PKG_DESCRIPTION");
    let repository = env!("CARGO_PKG_REPOSITORY");

    output.header("tidyrun Version Information");
    output.key_value("Version:", &format!("{name} v{version}"), true);

    output.category("About");
    output.key_value("Description:", description, false);
    output.key_value("Repository:", repository, false);

    output.category("Build Information");
    output.key_value("Target:", std::env::consts::ARCH, false);
    output.key_value("OS:", std::env::consts::OS, false);
    output.key_value(
        "Profile:",
        if cfg!(debug_assertions) { "debug" } else { "release" },
        false,
    );

    output.blank_line();
    output.success("Run 'tidyrun --help' for usage information");

    Ok(())
}
