use anyhow::Context;
use clap::Parser;
use vhi_analyzer::cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli).context("vhi-analyzer failed")
}
