//! `c2n convert` — Convert a docker-compose.yml to a Nomad job specification.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use compose2nomad_common::config::ConvertOptions;
use compose2nomad_common::error::ConvertError;

/// Output encodings for the `convert` subcommand.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Formatted Nomad HCL.
    #[default]
    Hcl,
    /// The intermediate job tree as pretty JSON.
    Json,
}

/// Arguments for the `convert` subcommand.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Path to the docker-compose.yml file, or `-` for stdin.
    #[arg(default_value = "docker-compose.yml")]
    pub file: PathBuf,

    /// Write output to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Name of the generated Nomad job.
    #[arg(long, env = "C2N_JOB_NAME")]
    pub job_name: Option<String>,

    /// Datacenter for the job (repeatable).
    #[arg(long = "datacenter", value_name = "DC")]
    pub datacenters: Vec<String>,

    /// Output encoding.
    #[arg(long, value_enum, default_value_t = OutputFormat::Hcl)]
    pub format: OutputFormat,
}

impl ConvertArgs {
    /// Builds conversion options, keeping defaults for unset flags.
    pub fn options(&self) -> ConvertOptions {
        let mut options = ConvertOptions::default();
        if let Some(name) = &self.job_name {
            options.job_name.clone_from(name);
        }
        if !self.datacenters.is_empty() {
            options.datacenters.clone_from(&self.datacenters);
        }
        options
    }
}

/// Executes the `convert` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read, converted, or written.
#[allow(clippy::print_stdout, clippy::print_stderr)]
pub fn execute(args: ConvertArgs) -> anyhow::Result<()> {
    let input = &args.file;
    tracing::info!(path = %input.display(), "converting docker-compose file");

    let yaml = super::read_input(input)?;
    let options = args.options();

    let rendered = match args.format {
        OutputFormat::Hcl => compose2nomad_nomad::convert_with_options(&yaml, &options)?,
        OutputFormat::Json => {
            let mut json = compose2nomad_nomad::convert_to_json(&yaml, &options)?;
            json.push('\n');
            json
        }
    };

    if let Some(ref out_path) = args.output {
        std::fs::write(out_path, &rendered).map_err(|source| ConvertError::Io {
            path: out_path.clone(),
            source,
        })?;
        eprintln!("Converted {} -> {}", input.display(), out_path.display());
        if args.format == OutputFormat::Hcl {
            eprintln!("{}", crate::output::Summary::of(&rendered));
        }
    } else {
        print!("{rendered}");
    }

    Ok(())
}
