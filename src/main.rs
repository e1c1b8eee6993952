// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use polaroid_booth::app::{Booth, FilterType};
use polaroid_booth::backends::virtual_camera::open_source;
use polaroid_booth::board::Point;
use polaroid_booth::config::Config;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "polaroid-booth")]
#[command(about = "Instant camera with a drag-and-drop photo board")]
#[command(version = env!("BOOTH_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    /// Config file (default: ~/.config/polaroid-booth/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the photo collection and images
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Still image to use as the camera (default: generated test pattern)
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive board in the terminal (default)
    Terminal,

    /// List photos on the board
    List,

    /// List available filters
    Filters,

    /// Take a photo and place it on the board
    Snap {
        /// Filter to apply (default: from config)
        #[arg(short, long, value_enum)]
        filter: Option<FilterType>,

        /// Where to place the photo (default: where it lands)
        #[arg(long, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
        at: Option<Vec<f32>>,
    },

    /// Drag a photo to a new position (dropping it on the trash deletes it)
    Move {
        id: String,
        #[arg(allow_negative_numbers = true)]
        x: f32,
        #[arg(allow_negative_numbers = true)]
        y: f32,
    },

    /// Pin or unpin a photo
    Pin { id: String },

    /// Delete a photo
    Delete { id: String },

    /// Download a photo as a polaroid PNG
    Export {
        id: String,

        /// Output directory (default: ~/Pictures/polaroid-booth)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path),
        None => Config::load_default(),
    };
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = Some(dir);
    }

    let interactive = matches!(cli.command, None | Some(Commands::Terminal));
    init_logging(&config, interactive)?;

    let mut booth = Booth::open(config, open_source(cli.source.as_deref()));

    match cli.command {
        None | Some(Commands::Terminal) => polaroid_booth::terminal::run(booth),
        Some(Commands::List) => cli::list_photos(&booth),
        Some(Commands::Filters) => cli::list_filters(),
        Some(Commands::Snap { filter, at }) => {
            let at = at.and_then(|v| match v.as_slice() {
                [x, y] => Some(Point::new(*x, *y)),
                _ => None,
            });
            cli::snap(&mut booth, filter, at)
        }
        Some(Commands::Move { id, x, y }) => cli::move_photo(&mut booth, &id, x, y),
        Some(Commands::Pin { id }) => cli::pin_photo(&mut booth, &id),
        Some(Commands::Delete { id }) => cli::delete_photo(&mut booth, &id),
        Some(Commands::Export { id, output }) => cli::export_photo(&booth, &id, output),
    }
}

/// Initialize logging
///
/// Set RUST_LOG environment variable to control log level
/// Examples: RUST_LOG=debug, RUST_LOG=polaroid_booth=debug, RUST_LOG=info
///
/// The terminal board owns the screen, so its logs go to a file in the data
/// directory instead of stderr.
fn init_logging(config: &Config, interactive: bool) -> Result<(), Box<dyn std::error::Error>> {
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    if interactive {
        let dir = config.data_dir();
        std::fs::create_dir_all(&dir)?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("polaroid-booth.log"))?;

        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .with_level(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .init();
    }
    Ok(())
}
