// SPDX-License-Identifier: MIT OR Apache-2.0
//! patchwork CLI binary - apply a JSON patch document to a commented JSON file

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use patchwork_cli::config::{Comparison, Emit, Mode, PipelineConfig};
use patchwork_cli::error::PipelineError;
use patchwork_cli::io::{InputSource, OutputTarget, read_inputs};
use patchwork_cli::{pipeline, telemetry};

#[derive(Parser)]
#[command(name = "patchwork")]
#[command(version, about, long_about = None)]
struct Args {
    /// Document to patch (`-` for stdin)
    #[arg(value_name = "INPUT")]
    input: String,

    /// Patch document (`-` for stdin)
    #[arg(value_name = "PATCH")]
    patch: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// How the patch document becomes operations
    #[arg(long, value_enum, default_value_t = Mode::Merge, env = "PATCHWORK_MODE")]
    mode: Mode,

    /// Comparator deciding whether a value changed
    #[arg(long, value_enum, default_value_t = Comparison::Structural, env = "PATCHWORK_EQUALITY")]
    equality: Comparison,

    /// Keep the patched document's layout instead of re-indenting it
    #[arg(long)]
    no_format: bool,

    /// What to write
    #[arg(long, value_enum, default_value_t = Emit::Document)]
    emit: Emit,

    /// More log output on stderr (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    fn config(&self) -> PipelineConfig {
        PipelineConfig {
            mode: self.mode,
            equality: self.equality.into(),
            reformat: !self.no_format,
            emit: self.emit,
        }
    }

    fn output(&self) -> OutputTarget {
        self.output
            .clone()
            .map_or(OutputTarget::Stdout, OutputTarget::File)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    telemetry::init(args.verbose, args.quiet);

    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn execute(args: &Args) -> Result<(), PipelineError> {
    let (input, patch) = read_inputs(
        &InputSource::from_arg(&args.input),
        &InputSource::from_arg(&args.patch),
    )?;
    let rendered = pipeline::run(&args.config(), &input, &patch)?;
    args.output().write(&rendered)
}
