//! Whisky CLI - manage bottles and the WhiskyWine runtime from a terminal.
//!
//! Every command prints a JSON document on stdout; logs go to stderr.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;
use whisky_kit::wine::{WhiskyWineInstaller, WineLayout};
use whisky_kit::WinVersion;
use whisky_manager::{BottleRegistry, RegistryConfig, WineCommand};

#[derive(Parser, Debug)]
#[command(name = "whisky")]
#[command(about = "Manage Whisky bottles and the WhiskyWine runtime")]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// WhiskyWine application folder (defaults to the platform data folder)
    #[arg(long, global = true)]
    app_dir: Option<PathBuf>,

    /// Folder holding the bottle list (defaults to the platform container folder)
    #[arg(long, global = true)]
    container_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Install WhiskyWine from an archive, replacing any existing install
    Install {
        /// Path to a .tar.gz, .tar or .zip archive (deleted after install)
        archive: PathBuf,
    },
    /// Remove the installed WhiskyWine libraries
    Uninstall,
    /// Show whether WhiskyWine is installed and its version
    Status,
    /// Compare the installed WhiskyWine with the published version
    CheckUpdate {
        /// Override the version descriptor URL
        #[arg(long)]
        url: Option<String>,
    },
    /// List registered bottles
    List,
    /// Create a new bottle and wait for it to be ready
    Create {
        name: String,
        /// Windows version reported inside the bottle
        #[arg(long, default_value_t = WinVersion::Win10)]
        windows_version: WinVersion,
        /// Parent directory for the bottle (defaults to <container>/Bottles)
        #[arg(long)]
        parent: Option<PathBuf>,
    },
    /// Unregister a bottle; its directory is kept
    Remove { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let layout = match args.app_dir {
        Some(path) => WineLayout::new(path),
        None => WineLayout::default_location()?,
    };
    let registry_config = match args.container_dir {
        Some(path) => RegistryConfig::new(path),
        None => RegistryConfig::default_location()?,
    };
    debug!("WhiskyWine folder: {}", layout.application_folder().display());
    debug!("Container folder: {}", registry_config.container_folder.display());

    let runtime = Arc::new(WineCommand::new(&layout));
    let context = commands::Context {
        installer: WhiskyWineInstaller::new(layout)?,
        registry: BottleRegistry::new(registry_config, runtime),
    };

    let output = match args.command {
        Command::Install { archive } => commands::install(&context, &archive).await?,
        Command::Uninstall => commands::uninstall(&context)?,
        Command::Status => commands::status(&context),
        Command::CheckUpdate { url } => commands::check_update(context, url.as_deref()).await?,
        Command::List => commands::list(&context).await?,
        Command::Create {
            name,
            windows_version,
            parent,
        } => commands::create(&context, name, windows_version, parent).await?,
        Command::Remove { path } => commands::remove(&context, &path).await?,
    };

    // Intentional stdout: the command's result document
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
