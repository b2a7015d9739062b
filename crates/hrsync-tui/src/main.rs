//! hrsync-tui: HR/Payroll sync dashboard
//!
//! Two views over one backend: the employee directory with search and
//! department filters, and the sync center that checks and executes
//! HR to Payroll synchronization.

mod app;
mod events;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing::{info, warn};

use hrsync_core::config::{HrSyncConfig, LogConfig};
use hrsync_gateway::{HrGateway, HttpGateway, MemoryGateway};
use hrsync_state::{EmployeeDirectory, SyncWorkflow};

use app::App;
use events::UiEvent;

#[derive(Parser, Debug)]
#[command(name = "hrsync-tui", version, about = "HR/Payroll sync dashboard")]
struct Cli {
    /// Path to hrsync.toml configuration file
    #[arg(
        long,
        short = 'c',
        env = "HRSYNC_CONFIG",
        default_value = "/etc/hrsync/config.toml"
    )]
    config: PathBuf,

    /// Override api.base_url from the config file
    #[arg(long, env = "HRSYNC_BASE_URL")]
    base_url: Option<String>,

    /// Run against built-in sample data instead of a backend
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = HrSyncConfig::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    let found = loaded.is_some();
    let mut config = loaded.unwrap_or_default();
    if let Some(url) = cli.base_url {
        config.api.base_url = url;
        config.validate().context("invalid --base-url")?;
    }

    init_logging(&config.log)?;
    if !found {
        warn!("config file not found: {}  (using defaults)", cli.config.display());
    }

    let (gateway, backend): (Arc<dyn HrGateway>, String) = if cli.demo {
        let gw = MemoryGateway::demo().with_latency(Duration::from_millis(300));
        (Arc::new(gw), "demo".into())
    } else {
        let gw = HttpGateway::new(&config.api).context("building HTTP client")?;
        (Arc::new(gw), config.api.base_url.clone())
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = %backend,
        "hrsync-tui starting"
    );

    let directory = Arc::new(EmployeeDirectory::new(gateway.clone()));
    let workflow = Arc::new(SyncWorkflow::new(gateway));

    // Set up terminal
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    stdout
        .execute(EnterAlternateScreen)
        .context("enter alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout)).context("create terminal")?;

    // Panic hook: restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = io::stdout().execute(LeaveAlternateScreen);
        original_hook(info);
    }));

    let (tx, mut rx) = mpsc::unbounded_channel::<UiEvent>();
    let tick = config.ui.tick();
    let mut app = App::new(config, backend, directory, workflow, tx);
    app.start();

    let result = run(&mut terminal, &mut app, &mut rx, tick);

    // Restore terminal
    disable_raw_mode().context("disable raw mode")?;
    io::stdout()
        .execute(LeaveAlternateScreen)
        .context("leave alternate screen")?;

    info!("hrsync-tui exiting");
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    tick: Duration,
) -> Result<()> {
    let mut dirty = true;
    loop {
        dirty |= app.take_changes();

        // Drain results reported by background tasks
        while let Ok(event) = rx.try_recv() {
            app.apply(event);
            dirty = true;
        }

        if dirty {
            terminal.draw(|f| ui::draw(f, app))?;
            dirty = false;
        }

        // Blocks this worker for at most one tick; state updates run on the others
        if tokio::task::block_in_place(|| event::poll(tick)).context("event poll")? {
            match event::read().context("event read")? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key);
                    dirty = true;
                }
                Event::Resize(..) => dirty = true,
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// The terminal belongs to the UI, so logs only go to `log.file` when set.
fn init_logging(log: &LogConfig) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let Some(path) = log.file.as_deref() else {
        return Ok(());
    };
    let file = open_log(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));

    match log.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(Mutex::new(file)))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
    }
    Ok(())
}

fn open_log(path: &Path) -> Result<std::fs::File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))
}
