mod app;
mod assets;
mod config;
mod input;
mod rating;
mod state;
mod transition;
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use parking_lot::Mutex;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use app::App;
use assets::AssetManager;
use config::Config;
use input::InputPump;

#[derive(Parser, Debug)]
#[command(name = "rating")]
#[command(about = "TUI rating card - pick 1 to 5 stars and submit")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(long)]
    config: Option<String>,

    /// Theme preset (amber, catppuccin-mocha, nord, gruvbox)
    #[arg(long)]
    theme: Option<String>,

    /// Swap cards instantly instead of animating
    #[arg(long)]
    no_animation: bool,

    /// Never draw images, use text art only
    #[arg(long)]
    no_graphics: bool,

    /// Print the outcome to stdout after exit
    #[arg(long, value_enum)]
    print: Option<PrintFormat>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PrintFormat {
    Text,
    Json,
}

fn init_logging(log_file: Option<&str>) -> Result<()> {
    match log_file {
        Some(path) => {
            let path = shellexpand::tilde(path);
            let file = File::create(&*path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            tracing_subscriber::registry()
                .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "rating=info".into()))
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::sync::Mutex::new(file))
                        .with_ansi(false),
                )
                .init();
        }
        None => {
            // Anything chattier than warn would land on top of the alternate screen
            tracing_subscriber::registry()
                .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "rating=warn".into()))
                .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    // Load config
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| Config::default_path().to_string_lossy().into_owned());
    let mut config = Config::load(&config_path)?;
    if let Some(theme) = cli.theme {
        config.appearance.theme = theme;
    }
    if cli.no_animation {
        config.animation.enabled = false;
    }
    if cli.no_graphics {
        config.assets.graphics = false;
    }

    // Graphics detection talks to the terminal, do it before raw mode
    let manager = AssetManager::new(&config.assets);
    let assets = manager
        .supports_graphics()
        .then(|| Arc::new(Mutex::new(manager)));
    let preload = assets.clone().map(|mgr| {
        tokio::task::spawn_blocking(move || {
            mgr.lock().preload();
            tracing::debug!("Assets preloaded");
        })
    });

    // Create app state
    let mut app = App::new(config);

    // Setup terminal
    install_panic_hook();
    let mut terminal = setup_terminal()?;

    // Run main loop
    let result = run_app(&mut terminal, &mut app, assets.as_ref(), preload).await;

    // Restore terminal, even if the loop failed
    let restored = restore_terminal();
    result?;
    restored.context("Failed to restore terminal")?;

    let outcome = app.outcome();
    match cli.print {
        Some(PrintFormat::Text) => println!("{}", outcome),
        Some(PrintFormat::Json) => println!("{}", serde_json::to_string(&outcome)?),
        None => {}
    }

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    let terminal = execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .and_then(|()| Terminal::new(CrosstermBackend::new(stdout)));
    match terminal {
        Ok(terminal) => Ok(terminal),
        Err(e) => {
            let _ = restore_terminal();
            Err(e).context("Failed to set up terminal")
        }
    }
}

/// Leave raw mode and the alternate screen. Every step runs even if an
/// earlier one fails; the first error is returned.
fn restore_terminal() -> io::Result<()> {
    let raw = disable_raw_mode();
    let mut stdout = io::stdout();
    let screen = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture, Show);
    raw.and(screen)
}

/// Restore the terminal before the panic message is printed. Only panics on
/// the UI thread tear the screen down; a panicking worker leaves it alone.
fn install_panic_hook() {
    let ui_thread = std::thread::current().id();
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if std::thread::current().id() == ui_thread {
            let _ = restore_terminal();
        }
        hook(info);
    }));
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    assets: Option<&Arc<Mutex<AssetManager>>>,
    mut preload: Option<JoinHandle<()>>,
) -> Result<()> {
    let mut input = InputPump::new();
    let mut frames = tokio::time::interval(app.config().animation.frame_interval());
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut dirty = true;

    let result = loop {
        let now = Instant::now();
        app.tick(now);

        if dirty {
            if let Err(e) = terminal.draw(|f| ui::draw(f, app, assets, now)) {
                break Err(e).context("Failed to draw frame");
            }
            app.mark_mounted();
            dirty = false;
        }

        if app.should_quit() {
            break Ok(());
        }

        let mut preloaded = false;
        tokio::select! {
            ev = input.next() => match ev {
                Ok(Some(ev)) => {
                    if let Some(command) = input::command_for_event(&ev) {
                        app.handle(command);
                    }
                    // Resizes and focus changes need a redraw too
                    dirty = true;
                }
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            },
            _ = frames.tick(), if app.is_animating() => dirty = true,
            _ = wait_for(&mut preload), if preload.is_some() => {
                preloaded = true;
            }
        }
        if preloaded {
            preload = None;
            dirty = true;
        }
    };

    input.shutdown().await;
    result
}

/// Resolve when the background task finishes. Pending forever without one.
async fn wait_for(task: &mut Option<JoinHandle<()>>) {
    match task {
        Some(handle) => {
            if let Err(e) = handle.await {
                tracing::warn!("Asset preload failed: {}", e);
            }
        }
        None => std::future::pending().await,
    }
}
