use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use owobridge_core::models::ControlCommand;
use owobridge_core::{AppConfig, Error, OwoSuit};
use owobridge_osc::{OscDispatcher, OscListener};

mod console;
use console::ConsoleModule;

#[derive(Parser, Debug, Clone)]
#[command(name = "owobridge")]
#[command(author, version, about = "Bridges VRChat avatar collisions to an OWO haptic suit")]
struct Args {
    /// Path to config.json (created with defaults if missing)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the UDP address to receive OSC on, e.g. 127.0.0.1:9001
    #[arg(long)]
    listen: Option<String>,

    /// Run without the interactive console
    #[arg(long, default_value = "false")]
    headless: bool,

    /// Don't start connecting to the suit until asked
    #[arg(long, default_value = "false")]
    no_auto_connect: bool,

    /// Debug-level logging unless RUST_LOG says otherwise
    #[arg(long, short = 'v', default_value = "false")]
    verbose: bool,
}

/// `rust_log` (normally `RUST_LOG`) wins whenever it parses; otherwise the
/// bridge crates log at info, or debug with `--verbose`.
fn build_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if let Some(filter) = rust_log.and_then(|s| EnvFilter::try_new(s).ok()) {
        return filter;
    }
    let level = if verbose { "debug" } else { "info" };
    EnvFilter::new(format!(
        "owobridge={level},owobridge_core={level},owobridge_osc={level}"
    ))
}

fn init_tracing(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(verbose, rust_log.as_deref());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub)
        .expect("Failed to set global subscriber");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);
    info!("owobridge starting. headless={}, auto_connect={}", args.headless, !args.no_auto_connect);

    if let Err(e) = run_bridge(args).await {
        error!("Bridge error: {:?}", e);
    }
    info!("Main finished. Goodbye!");
    Ok(())
}

async fn run_bridge(args: Args) -> Result<(), Error> {
    // 1) Config
    let config_path = args.config.clone().unwrap_or_else(AppConfig::default_path);
    let mut config = AppConfig::load_or_create(&config_path)?;
    if let Some(listen) = args.listen {
        config.osc_listen_addr = listen;
    }
    let listen_addr = config.osc_listen_addr()?;
    info!("Using config at {}", config_path.display());

    // 2) Suit + OSC wiring
    let backend = OwoSuit::backend_from_config(&config)?;
    let suit = OwoSuit::new(config, backend);

    let mut dispatcher = OscDispatcher::new();
    suit.map_parameters(&mut dispatcher);
    let listener = OscListener::bind(listen_addr, dispatcher).await?;

    // 3) Background tasks
    let (cmd_tx, cmd_rx) = mpsc::channel(32);
    let handles = suit.init(cmd_rx);
    let osc_task = tokio::spawn(listener.run(suit.event_bus().shutdown_rx.clone()));

    if !args.headless {
        let console = ConsoleModule::new(suit.clone(), cmd_tx.clone());
        console.spawn_event_printer().await;
        console.spawn_console_thread();
    }

    if !args.no_auto_connect {
        cmd_tx
            .send(ControlCommand::Connect)
            .await
            .map_err(|e| Error::EventBus(e.to_string()))?;
    }

    // 4) Run until Ctrl-C or the console asks to quit
    let mut shutdown_rx = suit.event_bus().shutdown_rx.clone();
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down.");
            suit.shutdown();
        }
        _ = shutdown_rx.wait_for(|stop| *stop) => {
            info!("Shutdown requested.");
        }
    }

    osc_task.await??;
    for h in handles {
        let _ = h.await;
    }
    Ok(())
}
