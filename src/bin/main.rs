use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use embassy_executor::Spawner;
use embassy_time::Instant;
use ledboard_core::{
    frame::FrameLoop,
    gesture::GestureDecoder,
    registry::AppCatalog,
    scheduler::Scheduler,
    settings::{DeckSettings, SettingsStore},
};
use ledboard_hal_linux::{
    input::keyboard::KeyboardConfig,
    platform::{
        display::{HeadlessPanel, HostPanel, TerminalPanel},
        terminal::TerminalSession,
    },
    storage::config_file::{DEFAULT_CONFIG_PATH, TomlSettingsStore},
};
use log::{LevelFilter, error, info, warn};

use runtime::Board;

#[path = "main/host_io.rs"]
mod host_io;
#[path = "main/runtime.rs"]
mod runtime;
#[path = "main/shutdown.rs"]
mod shutdown;

/// Runs the LED board apps against a terminal-emulated 64x32 panel.
#[derive(Parser, Debug)]
#[command(name = "ledboard", version)]
struct Args {
    /// Settings file. Created with defaults when missing.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// No terminal panel; gestures come from stdin commands.
    #[arg(long)]
    headless: bool,

    /// Log level; RUST_LOG overrides it.
    #[arg(long, value_name = "LEVEL", default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,

    /// Exit after this many frames.
    #[arg(long, value_name = "N")]
    frames: Option<u64>,
}

pub(crate) fn now_ms() -> u64 {
    Instant::now().as_millis()
}

fn init_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .init();
}

/// Loads settings and brings existing configs up to date with the catalog.
/// A broken file is left untouched and the board runs on defaults.
fn load_settings(store: &mut TomlSettingsStore, catalog: &AppCatalog) -> DeckSettings {
    let (mut settings, mut dirty) = match store.load() {
        Ok(Some(settings)) => (settings, false),
        Ok(None) => (DeckSettings::default(), true),
        Err(err) => {
            warn!(
                "config: {} unusable, using defaults err={}",
                store.path().display(),
                err
            );
            let mut settings = DeckSettings::default();
            catalog.reconcile(&mut settings.apps);
            return settings;
        }
    };
    let added = catalog.reconcile(&mut settings.apps);
    if added > 0 {
        info!("config: added {} new apps", added);
        dirty = true;
    }

    if dirty {
        if let Err(err) = store.save(&settings) {
            warn!("config: save failed err={}", err);
        }
    }
    settings
}

fn boot(args: &Args) -> Result<Board> {
    let mut catalog = AppCatalog::new();
    ledboard_apps::register_builtin(&mut catalog);

    let mut store = TomlSettingsStore::new(&args.config);
    let settings = load_settings(&mut store, &catalog);

    let apps = catalog.create_enabled(&settings.apps);
    let scheduler = Scheduler::new(apps, settings.scheduler_config())
        .with_context(|| format!("no enabled apps in {}", store.path().display()))?;
    info!(
        "boot: apps={} frame_interval_ms={} brightness_pct={}",
        scheduler.app_count(),
        settings.display.frame_interval_ms,
        settings.display.brightness_pct
    );

    let (panel, terminal) = if args.headless {
        host_io::spawn_stdin_commands().context("starting stdin command reader")?;
        (HostPanel::Headless(HeadlessPanel::new()), None)
    } else {
        let terminal = TerminalSession::enter().context("entering raw terminal mode")?;
        let keyboard = KeyboardConfig::default().with_release_events(terminal.reports_key_release());
        host_io::spawn_keyboard(keyboard).context("starting keyboard reader")?;
        let panel = TerminalPanel::new(std::io::stdout(), settings.display.brightness_pct);
        (HostPanel::Terminal(panel), Some(terminal))
    };

    Ok(Board {
        scheduler,
        decoder: GestureDecoder::new(settings.decoder),
        frames: FrameLoop::new(panel),
        frame_interval_ms: settings.display.frame_interval_ms as u64,
        frame_limit: args.frames,
        terminal,
    })
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let args = Args::parse();
    init_logging(args.log_level);

    let board = match boot(&args) {
        Ok(board) => board,
        Err(err) => {
            error!("boot: {err:#}");
            std::process::exit(1);
        }
    };

    runtime::run(board).await;
    std::process::exit(0);
}
