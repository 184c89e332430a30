//! `c2n fmt` — Canonically format an HCL file.

use std::path::PathBuf;

use clap::Args;
use compose2nomad_common::error::ConvertError;

/// Arguments for the `fmt` subcommand.
#[derive(Args, Debug)]
pub struct FmtArgs {
    /// Path to the HCL file, or `-` for stdin.
    pub file: PathBuf,

    /// Rewrite the file in place instead of printing to stdout.
    #[arg(short, long, conflicts_with = "check")]
    pub write: bool,

    /// Exit with an error if the file is not already formatted.
    #[arg(long)]
    pub check: bool,
}

/// Executes the `fmt` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or written, or
/// if `--check` finds unformatted input.
#[allow(clippy::print_stdout)]
pub fn execute(args: FmtArgs) -> anyhow::Result<()> {
    tracing::info!(path = %args.file.display(), "formatting HCL file");
    let source = super::read_input(&args.file)?;
    let formatted = compose2nomad_hcl::format::format(&source)?;

    if args.check {
        if formatted != source {
            anyhow::bail!("{} is not formatted", args.file.display());
        }
        return Ok(());
    }

    if args.write {
        if formatted != source {
            std::fs::write(&args.file, &formatted).map_err(|source| ConvertError::Io {
                path: args.file.clone(),
                source,
            })?;
            tracing::info!(path = %args.file.display(), "rewrote file");
        }
    } else {
        print!("{formatted}");
    }
    Ok(())
}
