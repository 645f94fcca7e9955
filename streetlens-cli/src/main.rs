//! Streetlens CLI - match a street photo against the historical archive.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod exit_codes;
mod output;
mod share_targets;

#[derive(Parser)]
#[command(name = "streetlens")]
#[command(author, version, about = "See what your street looked like decades ago", long_about = None)]
struct Cli {
    /// Backend origin (overrides STREETLENS_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a photo with location context and show the match
    Capture {
        /// Path to the photo to submit
        #[arg(value_name = "PHOTO")]
        photo: PathBuf,

        /// Latitude of the capture position
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude of the capture position
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,

        /// GPS accuracy radius in meters
        #[arg(long, default_value_t = 25.0)]
        accuracy: f64,

        /// Compass heading in degrees (0 = north, clockwise)
        #[arg(long)]
        heading: Option<f64>,

        /// Save the matched historical image beside the photo
        #[arg(long)]
        save: bool,

        /// Offer the result to the configured share targets
        #[arg(long)]
        share: bool,
    },

    /// Download a historical image by its archive path
    Fetch {
        /// Archive path, e.g. /historical/abc.jpg
        #[arg(value_name = "PATH")]
        path: String,

        /// Output file (defaults to the archive file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Capture {
            photo,
            lat,
            lon,
            accuracy,
            heading,
            save,
            share,
        } => {
            commands::capture::execute(commands::capture::CaptureArgs {
                photo,
                lat,
                lon,
                accuracy,
                heading,
                save,
                share,
                api_url: cli.api_url,
            })
            .await
        }
        Commands::Fetch { path, output } => {
            commands::fetch::execute(path, output, cli.api_url).await
        }
    }
}
