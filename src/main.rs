//! `reqcov`: command-line front end for requirement coverage reports.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
