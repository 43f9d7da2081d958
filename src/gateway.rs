use crate::api::{
    CommandResponse, CurrentSettings, InverterInfo, InvertersResponse, SettingsRequest,
    SettingsResponse,
};
use crate::command::PanelCommand;

use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("gateway returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("inverter not found: {0}")]
    InverterNotFound(String),

    #[error("command failed: {message}")]
    Command { message: String },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// HTTP client for the axpert-gateway control API.
#[derive(Clone)]
pub struct GatewayClient {
    base_url: String,
    client: Client,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to build HTTP client: {}", e)))?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { base_url, client })
    }

    /// Liveness probe against /healthz. Transport failures report as
    /// unhealthy rather than erroring; the panel starts either way.
    pub async fn health(&self) -> bool {
        let url = format!("{}/healthz", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => {
                let healthy = response.status().is_success();
                if healthy {
                    debug!("gateway health check passed");
                } else {
                    warn!("gateway health check failed: status {}", response.status());
                }
                healthy
            }
            Err(e) => {
                warn!("gateway health check failed: {}", e);
                false
            }
        }
    }

    /// Fetch the list of inverters the gateway knows about.
    pub async fn inverters(&self) -> GatewayResult<Vec<InverterInfo>> {
        let url = format!("{}/api/inverters", self.base_url);
        debug!("fetching inverter list from {}", url);

        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::OK => {
                let list = response.json::<InvertersResponse>().await?;
                info!("gateway reports {} inverter(s)", list.count);
                Ok(list.inverters)
            }
            status => Err(GatewayError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }

    /// Fetch the last collected settings for one inverter.
    ///
    /// Returns `Ok(None)` when the gateway answers 503: it has not completed
    /// a metrics collection cycle for this inverter yet. That is an expected
    /// state shortly after gateway startup, not an error.
    pub async fn current_settings(
        &self,
        serialno: &str,
    ) -> GatewayResult<Option<CurrentSettings>> {
        let url = format!("{}/api/settings", self.base_url);
        debug!("fetching current settings for {}", serialno);

        let request = SettingsRequest {
            serialno: serialno.to_string(),
        };
        let response = self.client.post(&url).json(&request).send().await?;

        match response.status() {
            StatusCode::OK => {
                let settings = response.json::<SettingsResponse>().await?;
                debug!(
                    "settings for {}: output={} charger={}",
                    settings.serialno,
                    settings.settings.output_source_priority,
                    settings.settings.charger_source_priority
                );
                Ok(Some(settings.settings))
            }
            StatusCode::SERVICE_UNAVAILABLE => {
                debug!("settings for {} not collected yet", serialno);
                Ok(None)
            }
            StatusCode::NOT_FOUND => Err(GatewayError::InverterNotFound(serialno.to_string())),
            status => Err(GatewayError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }

    /// Send a control command. The gateway reports failures two ways: a JSON
    /// body with `status: "error"`, or a plain-text error for rejected
    /// routes. Both surface as `GatewayError::Command` carrying the server's
    /// message so the operator sees it verbatim.
    pub async fn send_command(&self, command: &PanelCommand) -> GatewayResult<CommandResponse> {
        let url = format!("{}/api/command/{}", self.base_url, command.endpoint());
        info!(
            "sending {} value={} for inverter {}",
            command.endpoint(),
            command.wire_value(),
            command.serialno()
        );

        let request = command.to_request();
        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<CommandResponse>(&body).ok();

        if status.is_success() {
            match parsed {
                Some(reply) if reply.is_success() => {
                    info!("{} accepted: {}", command.endpoint(), reply.message);
                    Ok(reply)
                }
                Some(reply) => Err(GatewayError::Command {
                    message: failure_message(reply.message),
                }),
                None => Err(GatewayError::Command {
                    message: failure_message(body),
                }),
            }
        } else {
            let message = match parsed {
                Some(reply) => reply.message,
                None => body.trim().to_string(),
            };
            warn!(
                "{} rejected with status {}: {}",
                command.endpoint(),
                status,
                message
            );
            Err(GatewayError::Command {
                message: failure_message(message),
            })
        }
    }
}

fn failure_message(message: String) -> String {
    if message.trim().is_empty() {
        "Command failed".to_string()
    } else {
        message
    }
}
