use crate::prelude::*;

use futures::future::join_all;

/// Fetch current settings for one inverter and classify the result.
///
/// `refresh_all` runs one fetch per serial concurrently and publishes the
/// whole sweep as a single batch, so the panel reconciles once per sweep
/// instead of once per inverter. Fetches are independent: one inverter
/// answering 503 or failing outright never blocks the others.
pub struct RefreshSettings {
    gateway: GatewayClient,
    channels: Channels,
    serialno: String,
}

impl RefreshSettings {
    pub fn new(gateway: GatewayClient, channels: Channels, serialno: String) -> Self {
        Self {
            gateway,
            channels,
            serialno,
        }
    }

    pub async fn run(&self) -> Result<SettingsOutcome> {
        let (serialno, outcome) = self.fetch().await;

        if self
            .channels
            .to_panel
            .send(panel::ChannelData::SettingsBatch(vec![(
                serialno,
                outcome.clone(),
            )]))
            .is_err()
        {
            bail!("send(to_panel) failed - channel closed?");
        }

        Ok(outcome)
    }

    pub async fn refresh_all(
        gateway: GatewayClient,
        channels: Channels,
        serials: &[String],
    ) -> Result<Vec<(String, SettingsOutcome)>> {
        let fetches = serials.iter().map(|serialno| {
            let fetch =
                RefreshSettings::new(gateway.clone(), channels.clone(), serialno.clone());
            async move { fetch.fetch().await }
        });

        let outcomes: Vec<(String, SettingsOutcome)> = join_all(fetches).await;

        if channels
            .to_panel
            .send(panel::ChannelData::SettingsBatch(outcomes.clone()))
            .is_err()
        {
            bail!("send(to_panel) failed - channel closed?");
        }

        Ok(outcomes)
    }

    async fn fetch(&self) -> (String, SettingsOutcome) {
        let outcome = match self.gateway.current_settings(&self.serialno).await {
            Ok(Some(settings)) => SettingsOutcome::Current(settings),
            Ok(None) => SettingsOutcome::NotReady,
            Err(e) => {
                warn!("settings fetch for {} failed: {}", self.serialno, e);
                SettingsOutcome::Failed(e.to_string())
            }
        };

        (self.serialno.clone(), outcome)
    }
}
