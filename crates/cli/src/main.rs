// revstate CLI - review project extraction, headless

mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use revstate_extract::{DescribeOptions, ExtractOptions, OutputFormat};

use exit_codes::{extract_exit_code, EXIT_SUCCESS};

fn long_version() -> &'static str {
    concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_GIT_HASH"), ")")
}

#[derive(Parser)]
#[command(name = "revstate")]
#[command(about = "Extract labeling state from review project archives")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a project's labeling state with its original dataset
    #[command(after_help = "\
Examples:
  revstate extract review.revstate -o merged.xlsx
  revstate extract review.revstate -o merged.csv
  revstate extract review.revstate -o merged.dat -f csv
  revstate extract review.revstate --sort-training -o merged.csv
  revstate extract review.revstate --quiet")]
    Extract {
        /// Path to the project archive
        project: PathBuf,

        /// Output file (omit to only print a preview)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Output format: csv or xlsx (default: from output extension,
        /// falling back to xlsx)
        #[arg(long, short = 'f')]
        format: Option<String>,

        /// Surface training-set records before unlabeled ones
        #[arg(long)]
        sort_training: bool,

        /// Suppress progress output
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Print project details and model settings as a key/value table
    #[command(after_help = "\
Examples:
  revstate describe review.revstate
  revstate describe review.revstate -o details.csv
  revstate describe review.revstate -o details.xlsx")]
    Describe {
        /// Path to the project archive
        project: PathBuf,

        /// Output file (omit for stdout only)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Output format: csv or xlsx (default: from output extension,
        /// falling back to csv)
        #[arg(long, short = 'f')]
        format: Option<String>,

        /// Suppress the key/value listing on stdout
        #[arg(long, short = 'q')]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract { project, output, format, sort_training, quiet } => {
            cmd_extract(project, output, format, sort_training, quiet)
        }
        Commands::Describe { project, output, format, quiet } => {
            cmd_describe(project, output, format, quiet)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            eprintln!("error: {message}");
            if let Some(hint) = hint {
                eprintln!("hint:  {hint}");
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl From<revstate_extract::ExtractError> for CliError {
    fn from(err: revstate_extract::ExtractError) -> Self {
        let hint = match &err {
            revstate_extract::ExtractError::ArchiveUnreadable(_) => {
                Some("expected a project archive exported by the review tool".to_string())
            }
            _ => None,
        };
        Self { code: extract_exit_code(&err), message: err.to_string(), hint }
    }
}

/// Parse the format flag eagerly so a bad value fails before the archive
/// is touched.
fn parse_format(format: Option<String>) -> Result<Option<OutputFormat>, CliError> {
    format.map(|f| f.parse()).transpose().map_err(CliError::from)
}

fn cmd_extract(
    project: PathBuf,
    output: Option<PathBuf>,
    format: Option<String>,
    sort_training: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let options = ExtractOptions {
        output,
        format: parse_format(format)?,
        sort_by_training: sort_training,
        quiet,
    };
    revstate_extract::extract(&project, &options)?;
    Ok(())
}

fn cmd_describe(
    project: PathBuf,
    output: Option<PathBuf>,
    format: Option<String>,
    quiet: bool,
) -> Result<(), CliError> {
    let options = DescribeOptions {
        output,
        format: parse_format(format)?,
        quiet,
    };
    revstate_extract::describe(&project, &options)?;
    Ok(())
}
