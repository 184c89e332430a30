//! CLI command definitions and dispatch.

pub mod convert;
pub mod fmt;

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};
use compose2nomad_common::error::ConvertError;

/// compose2nomad — Convert docker-compose services into Nomad jobs.
#[derive(Parser, Debug)]
#[command(name = compose2nomad_common::constants::BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a docker-compose.yml to a Nomad job specification.
    Convert(convert::ConvertArgs),
    /// Canonically format an HCL file.
    Fmt(fmt::FmtArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Convert(args) => convert::execute(args),
        Command::Fmt(args) => fmt::execute(args),
    }
}

/// Reads a file, or stdin when the path is `-`.
///
/// # Errors
///
/// Returns an error if the file does not exist or cannot be read.
pub fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        let _ = std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    if !path.exists() {
        anyhow::bail!("file not found: {}", path.display());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConvertError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text)
}
