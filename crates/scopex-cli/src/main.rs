mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "scopex",
    version,
    about = "Extract reported figures (e.g. Scope 1/2/3 emissions) from PDF reports"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract keyword-group values from one or more PDF reports
    Extract {
        /// Paths to PDF files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Custom JSON extraction config
        #[arg(short, long, value_name = "FILE", conflicts_with = "preset")]
        config: Option<PathBuf>,

        /// Predefined config (default: ghg)
        #[arg(short, long, value_name = "NAME")]
        preset: Option<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write all reports as JSON to a file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Show the positioned text layout the extractor sees
    Inspect {
        /// Path to PDF file
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Manage and inspect extraction configs
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// List predefined configs
    List,
    /// Print a predefined config as JSON
    Show {
        /// Preset name (e.g., "ghg")
        preset: String,
    },
    /// Validate a custom config file
    Validate {
        /// Path to JSON config file
        file: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Extract {
            files,
            config,
            preset,
            output,
            out,
        } => commands::extract::run(files, config, preset, &output, out),
        Commands::Inspect { input_file, output } => commands::inspect::run(input_file, &output),
        Commands::Config { action } => match action {
            ConfigAction::List => commands::config::list(),
            ConfigAction::Show { preset } => commands::config::show(&preset),
            ConfigAction::Validate { file } => commands::config::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
