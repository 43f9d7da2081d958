use crate::prelude::*;

/// Emits a settings sweep request on a fixed cadence. The first interval
/// tick fires immediately and is a no-op until discovery has completed, so
/// the effective cadence starts counting from startup.
#[derive(Clone)]
pub struct Scheduler {
    config: ConfigWrapper,
    channels: Channels,
}

impl Scheduler {
    pub fn new(config: ConfigWrapper, channels: Channels) -> Self {
        Self { config, channels }
    }

    pub async fn start(&self) -> Result<()> {
        let mut interval = tokio::time::interval(self.config.refresh().interval());
        let mut receiver = self.channels.to_coordinator.subscribe();

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if self
                        .channels
                        .to_coordinator
                        .send(coordinator::ChannelData::RefreshAll)
                        .is_err()
                    {
                        bail!("send(to_coordinator) failed - channel closed?");
                    }
                }
                message = receiver.recv() => {
                    if matches!(message, Ok(coordinator::ChannelData::Shutdown) | Err(broadcast::error::RecvError::Closed)) {
                        break;
                    }
                }
            }
        }

        Ok(())
    }
}
