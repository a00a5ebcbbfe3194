//! # CertInk CLI
//!
//! Command-line tools for certificate layouts.
//!
//! ## Usage
//!
//! ```bash
//! # Convert an editor-space layout to the persisted document format
//! certink export layout.json -o document.json
//!
//! # Convert back, with a custom canvas/document size
//! certink import document.json --config certink.json
//!
//! # Print a shape outline as SVG path data
//! certink outline star --width 120 --height 120
//!
//! # Keep persisted layouts in a local store
//! certink store save award document.json --dir ./layouts
//! certink store list --dir ./layouts
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use thiserror::Error;

use certink_core::{
    ConfigError, EditorConfig, Layout, LayoutError, PersistedLayout, Reconciler, ShapeType,
    StorageError, ValidationError,
    elements::UnknownShapeType,
    geometry::outline,
    storage::{FileStorage, Storage},
};

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("Layout cannot be saved: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Shape(#[from] UnknownShapeType),
}

/// CertInk - certificate layout tools
#[derive(Parser, Debug)]
#[command(name = "certink")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config with canvas/document widths, backend origin and fonts
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert an editor layout to the persisted document format
    Export {
        input: PathBuf,

        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Convert a persisted document back to an editor layout
    Import {
        input: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Print the outline of a shape kind as SVG path data
    Outline {
        kind: String,

        #[arg(long, default_value = "100")]
        width: f64,

        #[arg(long, default_value = "100")]
        height: f64,

        /// Corner radius (rectangles only)
        #[arg(long)]
        radius: Option<f64>,
    },
    /// List the font table
    Fonts,
    /// Manage persisted layouts in a local directory
    Store {
        #[command(subcommand)]
        command: StoreCommands,

        /// Store directory (defaults to the platform data directory)
        #[arg(long, global = true, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum StoreCommands {
    /// Store a persisted document under a key
    Save { key: String, input: PathBuf },
    /// Print the document stored under a key
    Load { key: String },
    /// List stored keys
    List,
    /// Remove a stored document
    Delete { key: String },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let reconciler = Reconciler::new(&config.coordinates);

    match cli.command {
        Commands::Export { input, output } => {
            let layout = Layout::from_json(&std::fs::read_to_string(&input)?)?;
            let persisted = reconciler.save(&layout)?;
            log::info!(
                "Exported '{}' with {} elements (r = {:.4})",
                persisted.name,
                persisted.elements.len(),
                config.coordinates.ratio()
            );
            write_output(output.as_deref(), &persisted.to_json()?)
        }
        Commands::Import { input, output } => {
            let persisted = PersistedLayout::from_json(&std::fs::read_to_string(&input)?)?;
            let layout = reconciler.load(&persisted)?;
            write_output(output.as_deref(), &layout.to_json()?)
        }
        Commands::Outline {
            kind,
            width,
            height,
            radius,
        } => {
            let kind: ShapeType = kind.parse()?;
            let shape = outline(kind, width, height, radius);
            println!("{}", shape.to_svg());
            log::info!(
                "{} {}x{}: area {:.2}, {}",
                kind,
                width,
                height,
                shape.area(),
                if shape.filled { "filled" } else { "stroked" }
            );
            Ok(())
        }
        Commands::Fonts => {
            for entry in reconciler.fonts().entries() {
                println!("{:<20} {}/{}", entry.family, entry.folder, entry.base_name);
            }
            Ok(())
        }
        Commands::Store { command, dir } => {
            let storage = match dir {
                Some(dir) => FileStorage::new(dir)?,
                None => FileStorage::default_location()?,
            };
            log::debug!("Using store at {}", storage.base_path().display());
            pollster::block_on(run_store(&storage, command))
        }
    }
}

async fn run_store(storage: &FileStorage, command: StoreCommands) -> Result<(), CliError> {
    match command {
        StoreCommands::Save { key, input } => {
            let persisted = PersistedLayout::from_json(&std::fs::read_to_string(&input)?)?;
            storage.save(&key, &persisted).await?;
            println!("Saved {}", key);
        }
        StoreCommands::Load { key } => {
            let persisted = storage.load(&key).await?;
            println!("{}", persisted.to_json()?);
        }
        StoreCommands::List => {
            for key in storage.list().await? {
                println!("{}", key);
            }
        }
        StoreCommands::Delete { key } => {
            storage.delete(&key).await?;
            println!("Deleted {}", key);
        }
    }
    Ok(())
}

fn write_output(path: Option<&Path>, json: &str) -> Result<(), CliError> {
    match path {
        Some(path) => {
            std::fs::write(path, json)?;
            log::info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
