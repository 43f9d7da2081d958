pub use {
    anyhow::{anyhow, bail, Error, Result},
    log::{debug, error, info, trace, warn},
    tokio::sync::broadcast,
};

pub use crate::{
    api::{ChargerSourcePriority, CurrentSettings, InverterInfo, OutputSourcePriority},
    channels::Channels,
    command::{CommandResult, PanelCommand},
    config::{self, Config, ConfigWrapper},
    coordinator::{self, Coordinator},
    gateway::{GatewayClient, GatewayError},
    options::Options,
    panel::{self, PanelState},
    scheduler::Scheduler,
    settings::{SettingsOutcome, SettingsStore},
};
