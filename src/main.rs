use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use photobooth::{
    BoothConfig, BoothOrchestrator, Exporter, GalleryFilter, NoShareSink, PendingPhoto,
    SyntheticCamera, TokioClock,
};

#[derive(Parser, Debug)]
#[command(name = "photobooth")]
#[command(about = "Headless photo booth engine with filtered capture sessions and a local memory store")]
#[command(version)]
#[command(long_about = "A headless photo booth engine that drives timed capture sessions \
against a frame source, applies per-pixel color filters, renders themed photo strips and \
collages, and persists finished photos as memories in an on-device embedded database.")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "photobooth.toml", help = "Path to TOML configuration file")]
    config: String,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging")]
    debug: bool,

    /// Enable verbose logging (info level)
    #[arg(short, long, help = "Enable verbose info level logging")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration file and exit without running a session")]
    validate_config: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in TOML format and exit")]
    print_config: bool,

    /// Dry run mode - open the store but don't run a session
    #[arg(long, help = "Perform dry run - initialize components but don't run a capture session")]
    dry_run: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        print_default_config();
        return Ok(());
    }

    init_logging(&args)?;

    info!("Starting photobooth v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", args.config);

    let config = match BoothConfig::load_from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if args.validate_config {
        match config.validate() {
            Ok(()) => {
                println!("✓ Configuration is valid");
                return Ok(());
            }
            Err(e) => {
                eprintln!("✗ Configuration validation failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    config.validate().map_err(|e| {
        error!("Configuration validation failed: {}", e);
        e
    })?;

    let booth = BoothOrchestrator::new(config).map_err(|e| {
        error!("Failed to create orchestrator: {}", e);
        anyhow::anyhow!(e.to_string())
    })?;

    booth.initialize().await.map_err(|e| {
        error!("Failed to initialize: {}", e);
        anyhow::anyhow!(e.to_string())
    })?;

    if args.dry_run {
        info!("Dry run mode - store opened, no session started");
        println!("✓ Dry run completed successfully");
        return Ok(());
    }

    run_booth_session(&booth).await.map_err(|e| {
        error!("Session error: {}", e);
        anyhow::anyhow!(e.to_string())
    })?;

    booth
        .shutdown()
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    Ok(())
}

/// Drive one full booth flow: capture session, themed strip export,
/// memory persistence and a journal summary.
async fn run_booth_session(booth: &BoothOrchestrator) -> photobooth::error::Result<()> {
    let stills = booth
        .run_capture_session(Box::new(SyntheticCamera::new()), Arc::new(TokioClock))
        .await?;

    let exporter = Exporter::new(&booth.config().export.dir);
    let strip_path = booth.export_strip(&stills, &[], &exporter).await?;
    println!("Photo strip exported to {}", strip_path.display());

    let photos: Vec<PendingPhoto> = stills
        .into_iter()
        .map(|image| PendingPhoto {
            image,
            caption: String::new(),
            reflection: None,
            mood: None,
        })
        .collect();
    let saved = booth.save_photos(photos).await?;
    println!("Saved {} new memories", saved.len());

    let ids: Vec<String> = saved.iter().map(|m| m.id.clone()).collect();
    let (_, outcome) = booth
        .make_collage(&ids, "grid2x2", &["♥", "★"], &NoShareSink, &exporter)
        .await?;
    println!("Collage export: {:?}", outcome);

    let journal = booth.journal(GalleryFilter::All, None).await;
    let summary = booth.summary().await;
    println!(
        "Journal: {} memories ({} favorites, {} with reflections)",
        summary.total, summary.favorites, summary.with_reflections
    );
    for memory in journal.iter().take(5) {
        println!("  [{}] {}", memory.timestamp, memory.caption);
    }

    Ok(())
}

fn init_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("photobooth={}", log_level)));

    let fmt_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("compact") => fmt::layer()
            .compact()
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        Some("pretty") | None => fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer().with_target(true).boxed()
        }
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .init();

    Ok(())
}

/// Print default configuration in TOML format
fn print_default_config() {
    println!("# Photobooth Configuration File");
    println!("# This is the default configuration with all available options");
    println!();

    let default_config = r##"[camera]
# Preferred capture resolution hint (width, height)
width = 1280
height = 720

[session]
# Number of shots per capture session
shots = 4
# Countdown ticks before each shot
countdown_ticks = 3
# Countdown cadence in milliseconds
tick_interval_ms = 1000
# Settle pause after each shot in milliseconds
settle_ms = 500
# Pause between shots in milliseconds
inter_shot_pause_ms = 1000
# Default capture filter
filter = "dreamy"
# JPEG quality for captured stills (1-100)
still_jpeg_quality = 70

[canvas]
# Composition canvas size in pixels
width = 800
height = 800
# Canvas background color
background = "#e8dcd9"
# Resolution multiplier for flattened exports
export_multiplier = 2
# TrueType font for sticker glyphs and captions
font_path = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"

[strip]
# Strip theme: vintage-rose, lavender-dreams, wildflower, garden-party, cherry-blossom
theme = "vintage-rose"

[storage]
# Embedded memory database
database_path = "./booth-data/memories.db"
# Persisted animation preferences
prefs_path = "./booth-data/animation.toml"

[export]
# Directory for downloaded exports
dir = "./exports"
# JPEG quality for the share path (1-100)
share_jpeg_quality = 90

[system]
# Event bus capacity
event_bus_capacity = 100
"##;

    println!("{}", default_config);
}
