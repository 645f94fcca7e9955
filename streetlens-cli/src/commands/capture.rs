//! Capture command implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use streetlens_core::{
    CaptureSession, FailureKind, GeoOrientationCollector, LocationSample, LocationSource,
    OrientationSource, PhotoAsset, RenderPhase, ScriptedOrientationSource,
    SharePayload, ShareDispatcher, SilentOrientationSource, StaticLocationSource,
    StreetlensError, SubmissionClient, UnavailableLocationSource, UnsupportedShareTarget,
};
use tracing::{info, warn};

use crate::exit_codes;
use crate::output;
use crate::share_targets::ConsoleShareTarget;

pub struct CaptureArgs {
    pub photo: PathBuf,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub accuracy: f64,
    pub heading: Option<f64>,
    pub save: bool,
    pub share: bool,
    pub api_url: Option<String>,
}

/// Sensor sources for this capture: flags stand in for hardware.
fn build_sources(
    args: &CaptureArgs,
) -> (Arc<dyn LocationSource>, Arc<dyn OrientationSource>) {
    let location: Arc<dyn LocationSource> = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => Arc::new(StaticLocationSource::new(LocationSample {
            latitude: lat,
            longitude: lon,
            accuracy: args.accuracy,
        })),
        (None, None) => Arc::new(UnavailableLocationSource::new("no --lat/--lon provided")),
        _ => {
            warn!("only one of --lat/--lon provided; a fix needs both");
            Arc::new(UnavailableLocationSource::new(
                "both --lat and --lon are required for a fix",
            ))
        }
    };

    let orientation: Arc<dyn OrientationSource> = match args.heading {
        Some(heading) => Arc::new(ScriptedOrientationSource::fixed_compass(heading)),
        None => Arc::new(SilentOrientationSource),
    };

    (location, orientation)
}

/// Execute the capture command.
pub async fn execute(args: CaptureArgs) -> Result<()> {
    // Validate the photo locally before anything leaves the machine.
    let bytes = std::fs::read(&args.photo)
        .with_context(|| format!("Failed to read photo: {}", args.photo.display()))?;
    let file_name = args
        .photo
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("photo.jpg")
        .to_string();
    let asset = match PhotoAsset::from_bytes(bytes, file_name) {
        Ok(asset) => asset,
        Err(e) => {
            eprintln!("{}", format!("{e}").red());
            std::process::exit(exit_codes::INPUT_ERROR);
        }
    };

    let config = super::client_config(args.api_url.clone())?;
    let client = SubmissionClient::new(config)?;
    let fetcher = client.clone();

    let (location, orientation) = build_sources(&args);
    let collector = GeoOrientationCollector::new(location, orientation);
    let mut session = CaptureSession::new(
        collector,
        client,
        format!("streetlens-cli/{}", env!("CARGO_PKG_VERSION")),
    );

    session.start();
    eprintln!("{}", "Getting your position...".dimmed());
    session.location_settled().await;

    // The flag-backed heading arrives through the event pump; give it a
    // moment so the metadata record carries it.
    if args.heading.is_some() {
        for _ in 0..100 {
            if session.snapshot().heading.is_some() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
    }

    session.select_photo(asset);
    eprintln!("{}", "Searching the archive...".dimmed());

    if let Err(e) = session.submit().await {
        // Local validation: nothing was sent, the user can fix it and retry.
        let hint = match e {
            StreetlensError::MissingLocation => {
                "A position is required; pass --lat and --lon."
            }
            _ => "Select a photo and try again.",
        };
        eprintln!("{}", format!("{e}").yellow());
        eprintln!("{}", hint.dimmed());
        std::process::exit(exit_codes::USAGE_ERROR);
    }

    // Pull the rendered payload out of the state machine before tearing the
    // session down.
    let resolved = match session.state().phase() {
        RenderPhase::Success(result) => {
            Some(Ok((result.clone(), session.state().compare_pair())))
        }
        RenderPhase::Failure(descriptor) => Some(Err(descriptor.clone())),
        _ => None,
    };
    let snapshot = session.snapshot();
    session.stop();

    match resolved {
        Some(Ok((result, pair))) => {
            output::render_success(&result, pair.as_ref(), &snapshot);

            if args.save {
                let bytes = fetcher.fetch_historical(&result.historical_url).await?;
                let out = historical_path(&args.photo);
                std::fs::write(&out, bytes)
                    .with_context(|| format!("Failed to write {}", out.display()))?;
                info!(path = %out.display(), "historical image saved");
                println!();
                println!("   {} {}", "Saved:".dimmed(), out.display());
            }

            if args.share {
                let dispatcher = ShareDispatcher::new(
                    Arc::new(ConsoleShareTarget),
                    Arc::new(UnsupportedShareTarget),
                );
                let payload =
                    SharePayload::from_result(&result, result.historical_url.as_str());
                match dispatcher.dispatch(&payload).await {
                    streetlens_core::ShareReceipt::Shared => {}
                    streetlens_core::ShareReceipt::CopiedLink => {
                        println!("{}", "Link copied.".green());
                    }
                    streetlens_core::ShareReceipt::Unavailable => {
                        println!("{}", "Sharing isn't available here.".yellow());
                    }
                }
            }

            Ok(())
        }
        Some(Err(descriptor)) => {
            output::render_failure(&descriptor.message);
            let code = match descriptor.kind {
                FailureKind::Transport => exit_codes::NETWORK_ERROR,
                _ => exit_codes::GENERAL_ERROR,
            };
            std::process::exit(code);
        }
        // submit() returned Ok, so the attempt resolved one way or the other.
        None => Ok(()),
    }
}

/// Output path for the saved historical image: `<stem>_historical.jpg`.
fn historical_path(photo: &Path) -> PathBuf {
    let stem = photo
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("photo");
    photo.with_file_name(format!("{stem}_historical.jpg"))
}
