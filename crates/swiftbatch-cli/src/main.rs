mod commands;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::run::RunCommand;

#[derive(Parser)]
#[command(
    name = "swiftbatch",
    version,
    about = "Record pipeline engine for newline-delimited text"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a line pipeline over a text file
    Run {
        /// Input file, or "-" for stdin
        input: PathBuf,
        /// Path to a run options YAML file
        #[arg(long)]
        options: Option<PathBuf>,
        /// Pipeline name (overrides the options file)
        #[arg(long)]
        name: Option<String>,
        /// Number of leading lines to skip
        #[arg(long)]
        skip: Option<u64>,
        /// Maximum number of lines to read
        #[arg(long)]
        limit: Option<u64>,
        /// Abort the run on the first processing failure
        #[arg(long)]
        strict: bool,
        /// Filter out blank lines
        #[arg(long)]
        drop_blank: bool,
        /// Reject lines longer than this many bytes
        #[arg(long)]
        max_len: Option<usize>,
        /// Uppercase every line before processing
        #[arg(long)]
        uppercase: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a run options file
    Check {
        /// Path to a run options YAML file
        options: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    match cli.command {
        Commands::Run {
            input,
            options,
            name,
            skip,
            limit,
            strict,
            drop_blank,
            max_len,
            uppercase,
            json,
        } => commands::run::execute(RunCommand {
            input,
            options,
            name,
            skip,
            limit,
            strict,
            drop_blank,
            max_len,
            uppercase,
            json,
        }),
        Commands::Check { options } => commands::check::execute(&options),
    }
}
