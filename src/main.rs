//! Aethernet live dashboard
//!
//! Polls the sensor server and redraws the terminal on every change.
//! Operator commands are read from stdin:
//!
//! - `override <action>` - force a system decision (`store`, `redirect`, `clear`, ...)
//! - `thresholds <humidity> <temperature>` - submit the threshold form
//! - `refresh` - poll immediately
//! - `quit` - exit

use aethernet::{
    Config, DashboardClient, DashboardEvent, SensorClient, TerminalView, ThresholdForm,
};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

#[derive(Parser)]
#[command(name = "aethernet")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Live terminal dashboard for Aethernet sensor telemetry")]
struct Args {
    /// Config file (default: search standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sensor server URL (overrides config)
    #[arg(long)]
    base_url: Option<String>,

    /// Poll interval in milliseconds (overrides config)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Disable coloured charts
    #[arg(long)]
    no_color: bool,
}

const HELP: &str =
    "commands: override <action> | thresholds <humidity> <temperature> | refresh | quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (mut config, discovery) = match &args.config {
        Some(path) => (Config::load_with_env(path)?, None),
        None => {
            let discovery = Config::discover();
            (discovery.config.clone(), Some(discovery))
        }
    };
    if let Some(url) = args.base_url {
        config.server.base_url = url;
    }
    if let Some(ms) = args.interval_ms {
        config.dashboard.refresh_interval_ms = ms;
    }
    if args.no_color {
        config.dashboard.color = false;
    }

    aethernet::logging::init(&config.logging)?;
    tracing::info!("Aethernet dashboard v{}", env!("CARGO_PKG_VERSION"));
    match &discovery {
        Some(discovery) => discovery.log(),
        None => tracing::info!("Loaded config from {:?}", args.config),
    }
    tracing::info!("Sensor server: {}", config.server.base_url);

    let api = SensorClient::new(config.server.client_config())?;
    let dashboard = DashboardClient::new(Arc::new(api), config.dashboard.options());
    let view = match config.dashboard.width {
        Some(width) => TerminalView::new(width, config.dashboard.color),
        None => TerminalView::responsive(config.dashboard.color),
    };

    let mut events = dashboard.subscribe();
    dashboard.initialize().await?;
    draw(&dashboard, &view).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            event = events.recv() => {
                let mut redraw = match event {
                    Ok(event) => changes_screen(event),
                    Err(RecvError::Lagged(_)) => true,
                    Err(RecvError::Closed) => break,
                };
                // Coalesce a burst (readouts + three charts) into one redraw
                loop {
                    match events.try_recv() {
                        Ok(event) => redraw |= changes_screen(event),
                        Err(TryRecvError::Lagged(_)) => redraw = true,
                        Err(_) => break,
                    }
                }
                if redraw {
                    draw(&dashboard, &view).await;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => {
                        if !handle_command(&dashboard, line.trim()) {
                            break;
                        }
                    }
                    None => {
                        tracing::debug!("stdin closed, commands disabled");
                        stdin_open = false;
                    }
                }
            }
            _ = &mut shutdown => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    dashboard.dispose().await;
    tracing::info!("Dashboard stopped");
    Ok(())
}

/// Dispatch one stdin command; `false` means quit
fn handle_command(dashboard: &Arc<DashboardClient>, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    let dashboard = Arc::clone(dashboard);

    match (parts.next(), parts.next(), parts.next()) {
        (None, _, _) => {}
        (Some("quit") | Some("exit"), _, _) => return false,
        (Some("refresh"), _, _) => {
            tokio::spawn(async move {
                dashboard.refresh().await;
            });
        }
        (Some("override"), Some(action), _) => {
            let action = action.to_string();
            tokio::spawn(async move {
                dashboard.submit_override(&action).await;
            });
        }
        (Some("thresholds"), Some(humidity), Some(temperature)) => {
            let form = ThresholdForm::new(humidity, temperature);
            tokio::spawn(async move {
                form.submit(&dashboard).await;
            });
        }
        _ => tracing::warn!(command = line, "Unknown command; {}", HELP),
    }

    true
}

/// Failed refreshes are logged only; the screen keeps the last good data
fn changes_screen(event: DashboardEvent) -> bool {
    !matches!(event, DashboardEvent::RefreshFailed)
}

async fn draw(dashboard: &DashboardClient, view: &TerminalView) {
    let frame = dashboard.frame().await;
    // Clear screen, cursor home
    print!("\x1b[2J\x1b[H{}\n{}\n> ", view.render(&frame), HELP);
    let _ = std::io::stdout().flush();
}
