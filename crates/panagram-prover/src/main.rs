//! FFI entry point: writes the ABI-encoded proof to stdout, or a diagnostic to stderr and exits 1.

use std::{
    env,
    ffi::OsString,
    io::{self, Write},
    process::ExitCode,
};

use anyhow::Context;
use clap::Parser;
use panagram_prover::{inputs::USAGE, logging, run, AdapterError, Config, EncodedOutput};

/// Positional circuit inputs; no flags are accepted.
#[derive(Parser, Debug)]
#[command(name = "generate-proof")]
#[command(about = "Generate an ABI-encoded zk_panagram proof for FFI callers", long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// guess_hash answer_double_hash user_address
    #[arg(value_name = "INPUT", num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
    inputs: Vec<String>,
}

/// Parses the full argv, program name included. Every value after the program
/// name must come back as an input.
fn parse_inputs(argv: Vec<OsString>) -> Result<Vec<String>, AdapterError> {
    let cli = Cli::try_parse_from(&argv).map_err(|e| AdapterError::InputMapping(e.to_string()))?;
    let given = argv.len().saturating_sub(1);
    // clap consumes a bare `--` as its end-of-options marker
    if cli.inputs.len() != given {
        return Err(AdapterError::InputMapping(format!(
            "expected 3 arguments, got {given}; {USAGE}"
        )));
    }
    Ok(cli.inputs)
}

fn emit(output: &EncodedOutput) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(output.as_str().as_bytes())
        .context("writing proof to stdout")?;
    stdout.flush().context("flushing stdout")?;
    Ok(())
}

fn main() -> ExitCode {
    let config = Config::from_env();
    logging::init(&config.log_filter);

    let result = parse_inputs(env::args_os().collect()).and_then(|inputs| run(&inputs, &config));

    match result.map_err(anyhow::Error::from).and_then(|out| emit(&out)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error during proof generation: {err:#}");
            ExitCode::FAILURE
        }
    }
}
