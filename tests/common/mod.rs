#![allow(dead_code)]

use axpert_panel::prelude::*;
use std::time::Duration;

pub fn common_setup() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Receive the next panel event, failing the test instead of hanging when
/// nothing arrives.
pub async fn recv_panel(
    receiver: &mut broadcast::Receiver<panel::ChannelData>,
) -> panel::ChannelData {
    tokio::time::timeout(Duration::from_secs(5), receiver.recv())
        .await
        .expect("timed out waiting for a panel event")
        .expect("panel channel closed")
}

pub struct Factory();

impl Factory {
    pub fn inverter(serialno: &str) -> InverterInfo {
        InverterInfo {
            serialno: serialno.to_string(),
            model: None,
            status: None,
        }
    }

    pub fn settings(output: &str, charger: &str) -> CurrentSettings {
        CurrentSettings {
            output_source_priority: output.to_string(),
            charger_source_priority: charger.to_string(),
        }
    }

    pub fn gateway(url: &str) -> GatewayClient {
        GatewayClient::new(url, Duration::from_secs(5)).unwrap()
    }

    pub fn config(gateway_url: &str) -> Config {
        Config {
            gateway: config::Gateway {
                url: gateway_url.to_string(),
                timeout_secs: 5,
            },
            refresh: config::Refresh { interval_secs: 60 },
            loglevel: "info".to_string(),
            logfile: None,
        }
    }

    pub fn config_wrapper(gateway_url: &str) -> ConfigWrapper {
        ConfigWrapper::from_config(Self::config(gateway_url))
    }
}
