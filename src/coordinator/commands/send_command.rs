use crate::prelude::*;

/// Send one control command to the gateway and publish the outcome. A
/// rejected or failed command is a normal outcome here, not an error; Err is
/// reserved for a closed panel channel.
pub struct SendCommand {
    gateway: GatewayClient,
    channels: Channels,
    command: PanelCommand,
}

impl SendCommand {
    pub fn new(gateway: GatewayClient, channels: Channels, command: PanelCommand) -> Self {
        Self {
            gateway,
            channels,
            command,
        }
    }

    pub async fn run(&self) -> Result<CommandResult> {
        let result = match self.gateway.send_command(&self.command).await {
            Ok(reply) => {
                info!(
                    "command {} for {} succeeded: {}",
                    self.command.endpoint(),
                    self.command.serialno(),
                    reply.message
                );
                CommandResult::Success
            }
            Err(GatewayError::Command { message }) => CommandResult::Failed(message),
            Err(GatewayError::Http(e)) => {
                warn!("command {} transport error: {}", self.command.endpoint(), e);
                CommandResult::Failed("Network error - please try again".to_string())
            }
            Err(e) => CommandResult::Failed(e.to_string()),
        };

        if self
            .channels
            .to_panel
            .send(panel::ChannelData::CommandOutcome(
                self.command.clone(),
                result.clone(),
            ))
            .is_err()
        {
            bail!("send(to_panel) failed - channel closed?");
        }

        Ok(result)
    }
}
