use anyhow::{Context, Result};
use clap::Parser;
use rle_display::FrameCapture;
use rle_input::{ScriptedInput, SystemClock};
use rleviewer::{Args, FileStorage, Session, StorageProvider, ViewerConfig};
use tracing::info;

fn init_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("rleviewer={},rle_codec=info,rle_display=info", log_level).into()
            }),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging first
    init_logging(args.verbose)?;

    info!("Starting rleviewer {}", env!("CARGO_PKG_VERSION"));

    let config = ViewerConfig::resolve(&args).context("Failed to load configuration")?;

    let storage = FileStorage::open(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let mut input: ScriptedInput = config
        .input
        .script
        .as_deref()
        .unwrap_or("")
        .parse()
        .context("Invalid key script")?;

    let mut session = Session::open(storage.data(), &config)
        .with_context(|| format!("Failed to open {}", storage.path().display()))?;

    let clock = SystemClock::new();
    let mut screen = FrameCapture::new();
    let stats = session.run(&mut input, &clock, &mut screen)?;

    if let Some(path) = &config.output.snapshot {
        screen
            .save_png(path)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
    }

    info!("Exiting after {} frames", stats.frames);
    Ok(())
}
