mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use treedump_core::{Dump, DumpError};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Type-tree dump inspection tool.
#[derive(Parser)]
#[command(name = "treedump", version, about = "Type-tree dump inspection tool")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Emit diagnostic logs on stderr (honours RUST_LOG)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a dump and verify it against its footer
    Check {
        /// Path to the dump file
        file: PathBuf,
    },

    /// List every class record in a dump
    List {
        /// Path to the dump file
        file: PathBuf,
    },

    /// Print the type tree of one class
    Tree {
        /// Path to the dump file
        file: PathBuf,
        /// Class name or numeric class ID
        class: String,
    },
}

fn init_tracing(cli: &Cli) {
    // --quiet wins over everything; without --verbose logging stays off so
    // stray RUST_LOG settings don't mix log lines into command output.
    let filter = if cli.quiet || !cli.verbose {
        tracing_subscriber::EnvFilter::new("off")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    match &cli.command {
        Commands::Check { file } => {
            commands::check::cmd_check(file, cli.output, cli.quiet);
        }
        Commands::List { file } => {
            commands::list::cmd_list(file, cli.output, cli.quiet);
        }
        Commands::Tree { file, class } => {
            commands::tree::cmd_tree(file, class, cli.output, cli.quiet);
        }
    }
}

/// Read a dump or exit with the failure reported in the selected format.
pub(crate) fn load_dump(file: &std::path::Path, output: OutputFormat, quiet: bool) -> Dump {
    tracing::debug!(file = %file.display(), "loading dump");
    match Dump::read_file(file) {
        Ok(dump) => dump,
        Err(e) => {
            report_dump_error(&e, output, quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn report_dump_error(e: &DumpError, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("error: {}", e),
        OutputFormat::Json => eprintln!("{:#}", e.to_json_value()),
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => eprintln!("{:#}", serde_json::json!({ "error": msg })),
    }
}
