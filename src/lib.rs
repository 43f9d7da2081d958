// Module declarations for the application's core components
pub mod api;         // Gateway wire format and priority values
pub mod channels;    // Inter-component communication channels
pub mod command;     // Control commands and their outcomes
pub mod config;      // Configuration management
pub mod coordinator; // Gateway request coordinator
pub mod gateway;     // HTTP client for axpert-gateway
pub mod options;     // Command line options parsing
pub mod panel;       // Panel state machine
pub mod prelude;     // Common imports and types
pub mod scheduler;   // Periodic settings refresh
pub mod settings;    // Last known settings per inverter
pub mod tui;         // Terminal user interface

// Get the package version from Cargo.toml
const CARGO_PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

use crate::prelude::*;
use crate::tui::Tui;
use std::error::Error;
use std::io::Write;
use std::sync::Arc;

/// Manages all application components and their lifecycle
#[derive(Clone)]
pub struct Components {
    pub coordinator: Arc<Coordinator>,
    pub scheduler: Arc<Scheduler>,
    pub channels: Channels,
}

impl Components {
    /// Gracefully stops all components. The coordinator fans the shutdown
    /// out to everything listening on the channels.
    pub async fn stop(&mut self) {
        info!("Stopping all components...");
        self.coordinator.stop();
        info!("Shutdown complete");
    }
}

/// Main application entry point
///
/// Loads configuration, initialises logging and starts the coordinator,
/// scheduler and terminal UI. Returns once every component has wound down
/// after a shutdown signal, whether that came from the UI quitting or from
/// an external SIGINT.
pub async fn app(
    shutdown_tx: broadcast::Sender<()>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let options = Options::new();

    let config = ConfigWrapper::new(options.config_file.clone()).unwrap_or_else(|err| {
        // logging is not up yet, this has to go to the console directly
        eprintln!("Failed to load config {}: {:?}", options.config_file, err);
        std::process::exit(255);
    });

    if let Some(url) = &options.url {
        config.set_gateway_url(url.clone());
    }

    // Logging goes to stderr unless a logfile is configured. With the panel
    // occupying the terminal a logfile is the only readable option.
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.loglevel()),
    );
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.module_path().unwrap_or(""),
                record.args()
            )
        })
        .write_style(env_logger::WriteStyle::Never);
    if let Some(logfile) = config.logfile() {
        let file = std::fs::File::create(&logfile)
            .map_err(|err| anyhow!("error opening logfile {}: {}", logfile, err))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();

    info!(
        "axpert-panel {} starting, gateway: {}",
        CARGO_PKG_VERSION,
        config.gateway().url()
    );

    let mut shutdown_rx = shutdown_tx.subscribe();
    let channels = Channels::new();

    info!("Initializing components...");

    let coordinator = Coordinator::new(config.clone(), channels.clone())?;
    let coordinator_clone = coordinator.clone();
    let coordinator_handle = tokio::spawn(async move {
        if let Err(e) = coordinator_clone.start().await {
            error!("Coordinator task failed: {}", e);
        }
    });

    let scheduler = Scheduler::new(config.clone(), channels.clone());
    let scheduler_clone = scheduler.clone();
    let scheduler_handle = tokio::spawn(async move {
        if let Err(e) = scheduler_clone.start().await {
            error!("Scheduler task failed: {}", e);
        }
    });

    let panel = Tui::new(config.clone(), channels.clone(), shutdown_tx.clone());
    let panel_handle = tokio::spawn(async move {
        if let Err(e) = panel.start().await {
            error!("Terminal UI task failed: {}", e);
        }
    });

    // Wait for shutdown, requested by the UI or delivered as a signal
    let _ = shutdown_rx.recv().await;

    info!("Shutdown signal received, stopping components...");
    let mut components = Components {
        coordinator: Arc::new(coordinator),
        scheduler: Arc::new(scheduler),
        channels: channels.clone(),
    };
    components.stop().await;

    if let Err(e) = panel_handle.await {
        error!("Error waiting for terminal UI task: {}", e);
    }
    if let Err(e) = coordinator_handle.await {
        error!("Error waiting for coordinator task: {}", e);
    }
    if let Err(e) = scheduler_handle.await {
        error!("Error waiting for scheduler task: {}", e);
    }

    info!("Application shutdown complete");
    Ok(())
}
