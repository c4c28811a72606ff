//! DTlang compiler driver
//!
//! Run with: `dtlc <FILE>`

use std::{fs::read_to_string, path::PathBuf, process::ExitCode, time::Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use dtlang::{
    format_error,
    toolchain::{build, write_output, BuildConfig, BuildOutcome},
    translate,
};

/// Exit code for a translation error.
const EXIT_TRANSLATION_FAILED: u8 = 1;
/// Exit code for a successful translation whose native build failed.
const EXIT_BUILD_FAILED: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "dtlc")]
#[command(about = "Translates DTlang programs to C++ and builds them")]
#[command(version)]
struct Cli {
    /// DTlang source file
    input: PathBuf,

    /// Output directory (its contents are deleted on every run)
    #[arg(short, long, default_value = "out")]
    out_dir: PathBuf,

    /// C++ compiler used for the native build
    #[arg(long, env = "DTL_CXX", default_value = "g++")]
    cxx: String,

    /// Extra flag passed to the C++ compiler (repeatable)
    #[arg(long = "flag", allow_hyphen_values = true)]
    flags: Vec<String>,

    /// Name of the produced binary
    #[arg(short, long, default_value = "main")]
    binary_name: String,

    /// Only write the C++ file, skip the native build
    #[arg(long)]
    emit_only: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn build_config(&self) -> BuildConfig {
        let mut config = BuildConfig {
            out_dir: self.out_dir.clone(),
            binary_name: self.binary_name.clone(),
            compiler: self.cxx.clone(),
            ..BuildConfig::default()
        };
        config.flags.extend(self.flags.iter().cloned());
        config
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let start = Instant::now();

    let source = read_to_string(&cli.input)
        .with_context(|| format!("failed to read '{}'", cli.input.display()))?;
    let file_name = cli
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.input.display().to_string());

    let code = match translate(&source, &file_name) {
        Ok(code) => code,
        Err(error) => {
            debug!(
                kind = error.get_error_name(),
                offset = error.get_position().0,
                "translation failed"
            );
            eprintln!("{}", format_error(&error, &source, &file_name));
            return Ok(ExitCode::from(EXIT_TRANSLATION_FAILED));
        }
    };

    let config = cli.build_config();
    write_output(&config, &code).context("failed to write the generated C++")?;

    if cli.emit_only {
        info!("Total time: {:?}", start.elapsed());
        return Ok(ExitCode::SUCCESS);
    }

    match build(&config) {
        BuildOutcome::Built { binary } => {
            info!("Built {} in {:?}", binary.display(), start.elapsed());
            Ok(ExitCode::SUCCESS)
        }
        BuildOutcome::Failed { compiler, output } => {
            if !output.trim().is_empty() {
                eprintln!("{}", output.trim_end());
            }
            eprintln!("Compilation failed [{}]", compiler);
            Ok(ExitCode::from(EXIT_BUILD_FAILED))
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("Error: {:#}", error);
            ExitCode::from(EXIT_TRANSLATION_FAILED)
        }
    }
}
