//! haul-replay — watch a finished shift's haul-cycle table as a live feed.
//!
//! Loads a CSV, JSON or Excel table, keeps the trips of one truck model, and
//! replays them one per tick.  Each payload is checked against the normal
//! band, underloads raise an alert, and loaders are ranked by under-fills.
//!
//! ```text
//! haul-replay shift.csv --model 777 --min 90 --max 120 --speed fast
//! RUST_LOG=debug haul-replay shift.json --format json --export trace/
//! ```

mod render;


use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};

use hr_core::{PlaybackSpeed, SimulationConfig};
use hr_ingest::load_table;
use hr_output::{CsvWriter, OutputWriter, ReplayOutputObserver};
use hr_replay::{Replay, ReplayBuilder, ReplayObserver, RunOutcome, StopSignal};

use render::{ConsoleRenderer, JsonLinesRenderer};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Speed {
    /// 1 trip per second
    Slow,
    /// 2 trips per second
    Normal,
    /// 10 trips per second
    Fast,
    /// 100 trips per second
    Turbo,
    /// No pause between trips
    Instant,
}

impl From<Speed> for PlaybackSpeed {
    fn from(s: Speed) -> Self {
        match s {
            Speed::Slow    => PlaybackSpeed::Slow,
            Speed::Normal  => PlaybackSpeed::Normal,
            Speed::Fast    => PlaybackSpeed::Fast,
            Speed::Turbo   => PlaybackSpeed::Turbo,
            Speed::Instant => PlaybackSpeed::Instant,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Human-readable live feed
    Console,
    /// One JSON object per event on stdout
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "haul-replay", version)]
#[command(about = "Replay a haul-cycle table as a live payload feed")]
struct Args {
    /// Input table (.csv, .json or .xlsx)
    input: PathBuf,

    /// JSON config file; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Underload threshold in tonnes
    #[arg(long)]
    min: Option<f64>,

    /// Overload threshold in tonnes
    #[arg(long)]
    max: Option<f64>,

    /// Truck model filter (case-insensitive substring)
    #[arg(long)]
    model: Option<String>,

    /// Playback speed
    #[arg(long, value_enum)]
    speed: Option<Speed>,

    /// Trips kept in the recent window
    #[arg(long)]
    window: Option<usize>,

    /// Do not rank loaders
    #[arg(long)]
    no_leaderboard: bool,

    /// Write events, tick summaries and the leaderboard as CSV into DIR
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,

    /// Export into DIR/replay.db instead of CSV files
    #[cfg(feature = "sqlite")]
    #[arg(long, requires = "export")]
    sqlite: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Console)]
    format: Format,

    /// Trips listed in the closing feed (console format)
    #[arg(long, default_value_t = 5)]
    feed: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = resolve_config(&args)?;
    let table = load_table(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let mut replay = ReplayBuilder::new(config.clone(), &table)
        .build()
        .context("replay could not start")?;

    let report = replay.report();
    log::info!(
        "{} trips ordered by {}; {} rows for other models, {} rows with unreadable payload",
        replay.records().len(),
        report.ordered_by,
        report.filtered_out,
        report.dropped_payload,
    );

    let stop = StopSignal::new();
    stop_on_enter(stop.clone());

    let mut renderer: Box<dyn ReplayObserver> = match args.format {
        Format::Console => Box::new(ConsoleRenderer::new(&config, args.feed)),
        Format::Json    => Box::new(JsonLinesRenderer::new(std::io::stdout().lock())),
    };

    let outcome = match &args.export {
        Some(dir) if use_sqlite(&args) => open_sqlite(dir)
            .map(|w| run_exported(&mut replay, renderer.as_mut(), w, &stop))?,
        Some(dir) => {
            let writer = CsvWriter::new(dir)
                .with_context(|| format!("failed to open export directory {}", dir.display()))?;
            run_exported(&mut replay, renderer.as_mut(), writer, &stop)
        }
        None => replay.run(renderer.as_mut(), &stop),
    };

    match outcome {
        RunOutcome::Completed(_) | RunOutcome::Cancelled(_) => Ok(()),
        RunOutcome::Failed(e) => bail!("replay failed: {e}"),
    }
}

/// Drives the renderer and an export writer side by side.
fn run_exported<W: OutputWriter>(
    replay:   &mut Replay,
    renderer: &mut dyn ReplayObserver,
    writer:   W,
    stop:     &StopSignal,
) -> RunOutcome {
    let mut export = ReplayOutputObserver::new(writer);
    let outcome = replay.run(&mut (renderer, &mut export), stop);
    match export.take_error() {
        Some(e) => log::warn!("export incomplete: {e}"),
        None    => log::info!("exported {} rows", export.rows_written()),
    }
    outcome
}

#[cfg(feature = "sqlite")]
fn use_sqlite(args: &Args) -> bool {
    args.sqlite
}

#[cfg(not(feature = "sqlite"))]
fn use_sqlite(_args: &Args) -> bool {
    false
}

#[cfg(feature = "sqlite")]
fn open_sqlite(dir: &Path) -> Result<hr_output::SqliteWriter> {
    hr_output::SqliteWriter::new(dir)
        .with_context(|| format!("failed to open {}/replay.db", dir.display()))
}

#[cfg(not(feature = "sqlite"))]
fn open_sqlite(_dir: &Path) -> Result<CsvWriter> {
    bail!("built without the `sqlite` feature")
}

/// Defaults, then the config file, then individual flags.
fn resolve_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open config {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };

    if let Some(min) = args.min {
        config.min_payload = min;
    }
    if let Some(max) = args.max {
        config.max_payload = max;
    }
    if let Some(model) = &args.model {
        config.model_filter = model.clone();
    }
    if let Some(speed) = args.speed {
        config.speed = speed.into();
    }
    if let Some(window) = args.window {
        config.window_size = window;
    }
    if args.no_leaderboard {
        config.leaderboard = false;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Stop playback when a line arrives on stdin.  EOF leaves the run alone.
fn stop_on_enter(stop: StopSignal) {
    std::thread::spawn(move || {
        let mut line = String::new();
        if std::io::stdin().read_line(&mut line).is_ok_and(|n| n > 0) {
            stop.stop();
        }
    });
}
