//! # c2n — compose2nomad CLI
//!
//! Converts a docker-compose file into a Nomad job specification.
//! Logs go to stderr so the generated job can be piped from stdout.

mod commands;
mod output;

use clap::Parser;

use crate::commands::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    commands::execute(cli)
}
