use crate::prelude::*;

/// Fetch the inverter list and publish it to the panel. A failed fetch still
/// notifies the panel so the selector can show the failure instead of
/// spinning forever.
pub struct LoadInverters {
    gateway: GatewayClient,
    channels: Channels,
}

impl LoadInverters {
    pub fn new(gateway: GatewayClient, channels: Channels) -> Self {
        Self { gateway, channels }
    }

    pub async fn run(&self) -> Result<Vec<InverterInfo>> {
        match self.gateway.inverters().await {
            Ok(list) => {
                if self
                    .channels
                    .to_panel
                    .send(panel::ChannelData::Inverters(list.clone()))
                    .is_err()
                {
                    bail!("send(to_panel) failed - channel closed?");
                }
                Ok(list)
            }
            Err(e) => {
                let _ = self.channels.to_panel.send(panel::ChannelData::InvertersFailed);
                Err(anyhow!("inverter list fetch failed: {}", e))
            }
        }
    }
}
