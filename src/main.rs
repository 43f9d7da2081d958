use anyhow::Result;
use log::error;
use std::error::Error;
use tokio::sync::broadcast;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    // Create a channel for shutdown signaling
    let (shutdown_tx, _) = broadcast::channel(1);

    // Forward SIGINT as a shutdown signal. With the terminal in raw mode
    // Ctrl+C arrives as a key event instead, so this covers signals sent
    // from outside.
    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
        let _ = shutdown_tx_clone.send(());
    });

    // Run the application
    let app_handle = tokio::spawn(axpert_panel::app(shutdown_tx));

    // Wait for the application to complete
    if let Err(e) = app_handle.await? {
        error!("Application error: {}", e);
    }

    Ok(())
}
