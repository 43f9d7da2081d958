use crate::prelude::*;

pub mod commands;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum ChannelData {
    /// Fetch the inverter list, then sweep settings for everything found.
    LoadInverters,
    /// Sweep settings for all known inverters.
    RefreshAll,
    /// Fetch settings for one inverter.
    Refresh(String),
    /// Send a control command to the gateway.
    SendCommand(PanelCommand),
    Shutdown,
}

#[derive(Default)]
pub struct RequestStats {
    inverter_lists_fetched: u64,
    inverter_list_errors: u64,
    settings_fetched: u64,
    settings_not_ready: u64,
    settings_errors: u64,
    commands_sent: u64,
    commands_succeeded: u64,
    commands_failed: u64,
    // Last command sent per inverter
    last_commands: HashMap<String, String>,
}

impl RequestStats {
    pub fn print_summary(&self) {
        info!("Request statistics:");
        info!("  Inverter list:");
        info!("    Fetches: {}", self.inverter_lists_fetched);
        info!("    Errors: {}", self.inverter_list_errors);
        info!("  Settings:");
        info!("    Fetched: {}", self.settings_fetched);
        info!("    Not ready: {}", self.settings_not_ready);
        info!("    Errors: {}", self.settings_errors);
        info!("  Commands:");
        info!("    Sent: {}", self.commands_sent);
        info!("    Succeeded: {}", self.commands_succeeded);
        info!("    Failed: {}", self.commands_failed);
        if !self.last_commands.is_empty() {
            info!("    Last command by inverter:");
            for (serialno, command) in &self.last_commands {
                info!("      {}: {}", serialno, command);
            }
        }
    }
}

/// Serialises all gateway traffic. The panel and scheduler only ever talk to
/// the gateway through this component, so requests are processed one at a
/// time in arrival order; the per-serial fetches inside a settings sweep are
/// the only concurrent requests.
#[derive(Clone)]
pub struct Coordinator {
    channels: Channels,
    gateway: GatewayClient,
    pub stats: Arc<Mutex<RequestStats>>,
}

impl Coordinator {
    pub fn new(config: ConfigWrapper, channels: Channels) -> Result<Self> {
        let gateway = config.gateway();
        let gateway = GatewayClient::new(gateway.url(), gateway.timeout())?;

        Ok(Self {
            channels,
            gateway,
            stats: Arc::new(Mutex::new(RequestStats::default())),
        })
    }

    pub async fn start(&self) -> Result<()> {
        use ChannelData::*;

        let mut receiver = self.channels.to_coordinator.subscribe();

        if !self.gateway.health().await {
            warn!("gateway health check failed - requests will be retried as they come");
        }

        // Serials from the last successful list fetch; RefreshAll sweeps these
        let mut serials: Vec<String> = Vec::new();

        loop {
            match receiver.recv().await? {
                LoadInverters => match self.load_inverters().await {
                    Ok(list) => {
                        serials = list.into_iter().map(|i| i.serialno).collect();
                        if let Err(e) = self.refresh_all(&serials).await {
                            warn!("settings sweep after discovery failed: {}", e);
                        }
                    }
                    Err(e) => warn!("failed to load inverters: {}", e),
                },
                RefreshAll => {
                    if serials.is_empty() {
                        debug!("no inverters known yet, skipping settings sweep");
                    } else if let Err(e) = self.refresh_all(&serials).await {
                        warn!("settings sweep failed: {}", e);
                    }
                }
                Refresh(serialno) => {
                    if let Err(e) = self.refresh_one(&serialno).await {
                        warn!("settings refresh for {} failed: {}", serialno, e);
                    }
                }
                SendCommand(command) => {
                    if let Err(e) = self.process_command(command).await {
                        warn!("failed to process command: {}", e);
                    }
                }
                Shutdown => {
                    info!("Received shutdown signal, printing final statistics:");
                    if let Ok(stats) = self.stats.lock() {
                        stats.print_summary();
                    }
                    break;
                }
            }
        }

        Ok(())
    }

    pub fn stop(&self) {
        let _ = self.channels.to_coordinator.send(ChannelData::Shutdown);
        let _ = self.channels.to_panel.send(panel::ChannelData::Shutdown);
    }

    async fn load_inverters(&self) -> Result<Vec<InverterInfo>> {
        let result = commands::load_inverters::LoadInverters::new(
            self.gateway.clone(),
            self.channels.clone(),
        )
        .run()
        .await;

        if let Ok(mut stats) = self.stats.lock() {
            match &result {
                Ok(_) => stats.inverter_lists_fetched += 1,
                Err(_) => stats.inverter_list_errors += 1,
            }
        }

        result
    }

    async fn refresh_all(&self, serials: &[String]) -> Result<()> {
        let outcomes = commands::refresh_settings::RefreshSettings::refresh_all(
            self.gateway.clone(),
            self.channels.clone(),
            serials,
        )
        .await?;

        self.record_settings_outcomes(&outcomes);
        Ok(())
    }

    async fn refresh_one(&self, serialno: &str) -> Result<()> {
        let outcome = commands::refresh_settings::RefreshSettings::new(
            self.gateway.clone(),
            self.channels.clone(),
            serialno.to_string(),
        )
        .run()
        .await?;

        self.record_settings_outcomes(&[(serialno.to_string(), outcome)]);
        Ok(())
    }

    async fn process_command(&self, command: PanelCommand) -> Result<()> {
        info!(
            "Processing {} for inverter {}",
            command.endpoint(),
            command.serialno()
        );

        if let Ok(mut stats) = self.stats.lock() {
            stats.commands_sent += 1;
            stats.last_commands.insert(
                command.serialno().to_string(),
                format!("{} {}", command.endpoint(), command.wire_value()),
            );
        }

        let serialno = command.serialno().to_string();
        let result = commands::send_command::SendCommand::new(
            self.gateway.clone(),
            self.channels.clone(),
            command,
        )
        .run()
        .await?;

        match result {
            CommandResult::Success => {
                if let Ok(mut stats) = self.stats.lock() {
                    stats.commands_succeeded += 1;
                }
                // Re-read the inverter so the panel reflects what the
                // hardware actually accepted. A failed refresh here must not
                // retroactively fail the command.
                if let Err(e) = self.refresh_one(&serialno).await {
                    warn!("settings refresh after command failed: {}", e);
                }
            }
            CommandResult::Failed(_) => {
                if let Ok(mut stats) = self.stats.lock() {
                    stats.commands_failed += 1;
                }
            }
        }

        Ok(())
    }

    fn record_settings_outcomes(&self, outcomes: &[(String, SettingsOutcome)]) {
        if let Ok(mut stats) = self.stats.lock() {
            for (_, outcome) in outcomes {
                match outcome {
                    SettingsOutcome::Current(_) => stats.settings_fetched += 1,
                    SettingsOutcome::NotReady => stats.settings_not_ready += 1,
                    SettingsOutcome::Failed(_) => stats.settings_errors += 1,
                }
            }
        }
    }
}
