use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use dockboard_config::ConfigDocument;
use dockboard_core::logging::{self, LogFormat};
use dockboard_core::{Pipeline, PipelineError};
use dockboard_layout::{CrosstermTerminal, FixedTerminal, TerminalProbe};
use tracing::Level;

/// Docker Compose dashboard configuration tool
#[derive(Debug, Parser)]
#[command(name = "dockboard", version, about)]
struct Cli {
    /// Dashboard configuration file
    #[arg(long, env = "DOCKBOARD_PATH", default_value = "dockboard.yml")]
    path: PathBuf,

    /// Compose file overriding the ones in the configuration (repeatable)
    #[arg(long = "compose-file", value_name = "FILE")]
    compose_files: Vec<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Log debug events
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Migrate and validate the configuration
    Check,
    /// Print the canonical configuration with its box layout
    Plan {
        #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,

        /// Terminal width used for planning instead of the real one
        #[arg(long, requires = "lines")]
        columns: Option<u16>,

        /// Terminal height used for planning instead of the real one
        #[arg(long, requires = "columns")]
        lines: Option<u16>,
    },
    /// Print the JSON schema of the canonical configuration
    Schema,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    if let Err(e) = logging::init(level, cli.log_format) {
        eprintln!("failed to initialize logging: {e}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<PipelineError>() {
                Some(PipelineError::Invalid(report)) => {
                    eprintln!("Invalid configuration:");
                    eprintln!("{report}");
                }
                _ => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let pipeline = Pipeline::new(cli.compose_files);

    match cli.command {
        Command::Check => {
            let loaded = pipeline.load(&cli.path, &CrosstermTerminal)?;
            println!(
                "{}: valid ({} compose file(s), {} box(es))",
                cli.path.display(),
                loaded.config.compose_files.len(),
                loaded.config.boxes.len()
            );
        }
        Command::Plan {
            format,
            columns,
            lines,
        } => {
            let terminal: Box<dyn TerminalProbe> = match (columns, lines) {
                (Some(columns), Some(lines)) => Box::new(FixedTerminal::new(columns, lines)),
                _ => Box::new(CrosstermTerminal),
            };
            let loaded = pipeline.load(&cli.path, terminal.as_ref())?;
            let raw = loaded.config.to_raw()?;
            let out = match format {
                OutputFormat::Yaml => raw.to_yaml()?,
                OutputFormat::Json => raw.to_json()?,
            };
            println!("{out}");
        }
        Command::Schema => {
            let schema = ConfigDocument::json_schema();
            let out = serde_json::to_string_pretty(&schema).context("serializing schema")?;
            println!("{out}");
        }
    }

    Ok(())
}
