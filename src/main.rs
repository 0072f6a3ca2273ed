//! Block Pilot CLI
//!
//! Command-line interface for running the game-playing agent against a
//! live screen, or on scripted frames when the capture and input
//! features are disabled.

use block_pilot::agent::{Session, SessionStats, TraceHeader, TraceRecorder};
use block_pilot::capture::FrameSource;
use block_pilot::config::AgentConfig;
use block_pilot::input::InputDriver;
use block_pilot::score::StrategyKind;
use block_pilot::snapshot::SnapshotWriter;
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Watches a falling-block puzzle game and plays it.
#[derive(Debug, Parser)]
#[command(name = "block-pilot", version, about)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured scoring strategy.
    #[arg(long, value_enum)]
    strategy: Option<StrategyKind>,

    /// Score candidates by pressing them on the live game instead of
    /// simulating.
    #[arg(long)]
    live_probe: bool,

    /// Stop after this many iterations instead of running until
    /// interrupted.
    #[arg(short = 'n', long)]
    iterations: Option<u64>,

    /// Write per-iteration frame and board snapshots to this directory.
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Write a JSONL decision trace to this file.
    #[arg(long)]
    trace: Option<PathBuf>,

    /// List capturable windows and exit.
    #[arg(long)]
    list_windows: bool,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    if cli.list_windows {
        list_windows();
        return;
    }

    let mut config = match &cli.config {
        Some(path) => match AgentConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => AgentConfig::default(),
    };

    // Command-line flags win over the config file
    if let Some(strategy) = cli.strategy {
        config.score.strategy = strategy;
    }
    if cli.live_probe {
        config.score.live_probe = true;
    }
    if let Some(dir) = cli.snapshot_dir {
        config.debug.snapshot_dir = Some(dir);
    }
    if let Some(path) = cli.trace {
        config.debug.trace_path = Some(path);
    }

    info!("Block Pilot v{}", block_pilot::VERSION);

    run(&config, cli.iterations);
}

/// Plays against the live screen with synthesized key presses.
#[cfg(all(feature = "screen", feature = "input"))]
fn run(config: &AgentConfig, iterations: Option<u64>) {
    use block_pilot::capture::{WindowLocator, XcapLocator, XcapScreen};
    use block_pilot::input::EnigoDriver;

    let region = match config.capture.region {
        Some(region) => region,
        None => match XcapLocator::new().locate(&config.capture.window_title) {
            Ok(region) => region,
            Err(e) => {
                eprintln!("Failed to locate game window: {}", e);
                std::process::exit(1);
            }
        },
    };

    info!("Capturing screen region {}", region);

    let screen = match XcapScreen::new(region) {
        Ok(screen) => screen,
        Err(e) => {
            eprintln!("Failed to open screen capture: {}", e);
            std::process::exit(1);
        }
    };

    let driver = match EnigoDriver::new(config.timing.key_hold()) {
        Ok(driver) => driver,
        Err(e) => {
            eprintln!("Failed to open input driver: {}", e);
            std::process::exit(1);
        }
    };

    drive(config, iterations, screen, driver);
}

/// Plays scripted frames with a recording driver.
#[cfg(not(all(feature = "screen", feature = "input")))]
fn run(config: &AgentConfig, iterations: Option<u64>) {
    use block_pilot::capture::{Frame, ScriptedScreen};
    use block_pilot::input::RecordingDriver;

    warn!("Built without the screen and input features; playing scripted frames");

    const CELL: usize = 8;
    const PIECE: (u8, u8, u8) = (220, 60, 60);

    let rows = config.board.rows;
    let cols = config.board.cols;
    let width = (cols * CELL) as u32;
    let height = (rows * CELL) as u32;

    let paint = |frame: &mut Frame, row: usize, col: usize| {
        let x = (col * CELL + CELL / 2) as u32;
        let y = (row * CELL + CELL / 2) as u32;
        frame.set_pixel(x, y, PIECE);
    };

    let count = iterations.unwrap_or(20);
    let frames = (1..=count).map(|sequence| {
        let mut frame = Frame::filled(width, height, config.board.background, sequence);
        // Two separated dominoes near the floor; a shift either way
        // merges them into one scoring cluster
        if rows >= 2 && cols >= 4 {
            paint(&mut frame, rows - 2, 2);
            paint(&mut frame, rows - 2, 3);
            paint(&mut frame, rows - 1, 0);
            paint(&mut frame, rows - 1, 1);
        }
        frame
    });

    drive(
        config,
        iterations,
        ScriptedScreen::from_frames(frames),
        RecordingDriver::new(),
    );
}

/// Assembles the session around the given backends and runs it.
fn drive<S: FrameSource, D: InputDriver>(
    config: &AgentConfig,
    iterations: Option<u64>,
    screen: S,
    driver: D,
) {
    let mut session = Session::new(config, screen, driver);

    if let Some(dir) = &config.debug.snapshot_dir {
        match SnapshotWriter::new(dir.clone()) {
            Ok(writer) => {
                info!("Writing snapshots to {}", writer.dir().display());
                session = session.with_snapshots(writer);
            }
            Err(e) => {
                eprintln!("Failed to open snapshot directory: {}", e);
                std::process::exit(1);
            }
        }
    }

    if let Some(path) = &config.debug.trace_path {
        let header = TraceHeader::new(session.strategy(), config.board.rows, config.board.cols);
        match TraceRecorder::create(path.clone(), header) {
            Ok(recorder) => {
                info!("Tracing decisions to {}", recorder.path().display());
                session = session.with_trace(recorder);
            }
            Err(e) => {
                eprintln!("Failed to open trace file: {}", e);
                std::process::exit(1);
            }
        }
    }

    #[cfg(feature = "metrics")]
    {
        if config.metrics.port != 0 {
            match block_pilot::metrics::MetricsRegistry::new() {
                Ok(registry) => {
                    let registry = Arc::new(registry);
                    session = session.with_metrics(Arc::clone(&registry));
                    spawn_metrics_server(registry, config.metrics.port);
                }
                Err(e) => {
                    eprintln!("Failed to create metrics registry: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    let stats = match iterations {
        Some(n) => {
            info!("Running for at most {} iterations", n);
            session.run_for(n)
        }
        None => {
            let stop = Arc::new(AtomicBool::new(false));
            let handler_stop = Arc::clone(&stop);
            if let Err(e) = ctrlc::set_handler(move || {
                handler_stop.store(true, Ordering::SeqCst);
            }) {
                eprintln!("Failed to install interrupt handler: {}", e);
                std::process::exit(1);
            }
            info!("Running until interrupted (ctrl-c to stop)");
            session.run(&stop)
        }
    };

    report(&stats);
}

fn report(stats: &SessionStats) {
    info!(
        "Played {} iterations: {} left, {} right, {} down, {} rotate",
        stats.iterations,
        stats.decisions_left,
        stats.decisions_right,
        stats.decisions_down,
        stats.decisions_rotate
    );
    if stats.capture_failures > 0 || stats.dispatch_failures > 0 {
        warn!(
            "Absorbed {} capture failures and {} dispatch failures",
            stats.capture_failures, stats.dispatch_failures
        );
    }
}

/// Serves Prometheus metrics from a background thread.
#[cfg(feature = "metrics")]
fn spawn_metrics_server(registry: Arc<block_pilot::metrics::MetricsRegistry>, port: u16) {
    use block_pilot::metrics::{MetricsServer, MetricsServerConfig};

    let server = MetricsServer::new(MetricsServerConfig::with_port(port), registry);
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!("Failed to start metrics runtime: {}", e);
                return;
            }
        };
        if let Err(e) = runtime.block_on(server.run()) {
            warn!("Metrics server exited: {}", e);
        }
    });
}

/// Prints every capturable window with its screen region.
#[cfg(feature = "screen")]
fn list_windows() {
    match block_pilot::capture::list_windows() {
        Ok(windows) => {
            for (title, region) in windows {
                println!("{:>16}  {}", region.to_string(), title);
            }
        }
        Err(e) => {
            eprintln!("Failed to enumerate windows: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "screen"))]
fn list_windows() {
    eprintln!("Window listing requires the screen feature");
    std::process::exit(1);
}
