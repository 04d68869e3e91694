use anyhow::Result;
use clap::Parser;

use tidyrun::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
