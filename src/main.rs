//! Browser Extension Wizard CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use extwizard::cli::{commands, history};
use extwizard::WizardConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "extwizard")]
#[command(about = "Package, preview and manage generated browser extensions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Package an extension into an installable ZIP
    Pack {
        /// Extension directory or ZIP archive
        #[arg(short, long)]
        input: PathBuf,

        /// Output archive (defaults to the configured archive name)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Image to derive the 16/48/128 px icons from
        #[arg(long)]
        icon: Option<PathBuf>,

        /// Extra files copied into the archive before the extension files
        #[arg(long)]
        aux: Vec<PathBuf>,
    },

    /// Extract an extension archive into a directory
    Unpack {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Render the extension popup into a standalone HTML page
    Preview {
        /// Extension directory or ZIP archive
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, default_value = "preview.html")]
        output: PathBuf,
    },

    /// Manage previously generated extensions
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// List saved extensions, most recent first
    List,

    /// Show one entry with its files
    Show { id: String },

    /// Save a directory or ZIP archive as a new entry
    Add {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Delete entries by id
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Delete every entry
    Clear {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Package an entry into a ZIP
    Export {
        id: String,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("extwizard=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", "❌ Command failed!".red().bold());
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = WizardConfig::load()?;
    let runtime = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Pack {
            input,
            output,
            icon,
            aux,
        } => runtime.block_on(commands::pack(
            &config,
            &input,
            output.as_deref(),
            icon.as_deref(),
            &aux,
        )),

        Commands::Unpack { input, output } => commands::unpack(&input, &output),

        Commands::Preview { input, output } => commands::preview(&input, &output),

        Commands::History { command } => match command {
            HistoryCommands::List => history::list(&config),
            HistoryCommands::Show { id } => history::show(&config, &id),
            HistoryCommands::Add { input } => history::add(&config, &input),
            HistoryCommands::Delete { ids } => history::delete(&config, &ids),
            HistoryCommands::Clear { yes } => history::clear(&config, yes),
            HistoryCommands::Export { id, output } => {
                runtime.block_on(history::export(&config, &id, output.as_deref()))
            }
        },
    }
}
