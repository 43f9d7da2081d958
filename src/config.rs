use crate::prelude::*;

use serde::Deserialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub gateway: Gateway,

    #[serde(default = "Config::default_refresh")]
    pub refresh: Refresh,

    #[serde(default = "Config::default_loglevel")]
    pub loglevel: String,

    /// Optional log destination. Without it logs go to stderr, which is only
    /// readable when stderr is redirected away from the panel's terminal.
    pub logfile: Option<String>,
}

// Gateway {{{
#[derive(Clone, Debug, Deserialize)]
pub struct Gateway {
    pub url: String,

    #[serde(default = "Config::default_gateway_timeout")]
    pub timeout_secs: u64,
}

impl Gateway {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
} // }}}

// Refresh {{{
#[derive(Clone, Debug, Deserialize)]
pub struct Refresh {
    #[serde(default = "Config::default_refresh_interval")]
    pub interval_secs: u64,
}

impl Refresh {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
} // }}}

pub struct ConfigWrapper {
    config: Arc<Mutex<Config>>,
}

impl Clone for ConfigWrapper {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
        }
    }
}

impl ConfigWrapper {
    pub fn new(file: String) -> Result<Self> {
        let config = Config::new(file)?;
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: Config) -> Self {
        Self {
            config: Arc::new(Mutex::new(config)),
        }
    }

    pub fn gateway(&self) -> Gateway {
        self.config.lock().unwrap().gateway.clone()
    }

    /// Replace the gateway URL at runtime (command line override).
    pub fn set_gateway_url(&self, url: String) {
        self.config.lock().unwrap().gateway.url = url;
    }

    pub fn refresh(&self) -> Refresh {
        self.config.lock().unwrap().refresh.clone()
    }

    pub fn loglevel(&self) -> String {
        self.config.lock().unwrap().loglevel.clone()
    }

    pub fn logfile(&self) -> Option<String> {
        self.config.lock().unwrap().logfile.clone()
    }
}

impl Config {
    pub fn new(file: String) -> Result<Self> {
        let content = std::fs::read_to_string(&file)
            .map_err(|err| anyhow!("error reading {}: {}", file, err))?;

        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.gateway.url.is_empty() {
            bail!("gateway.url cannot be empty");
        }
        if let Err(e) = reqwest::Url::parse(&self.gateway.url) {
            bail!("invalid gateway.url: {}", e);
        }
        if self.gateway.timeout_secs == 0 {
            bail!("gateway.timeout_secs must be at least 1");
        }
        if self.refresh.interval_secs == 0 {
            bail!("refresh.interval_secs must be at least 1");
        }

        Ok(())
    }

    fn default_gateway_timeout() -> u64 {
        10
    }

    fn default_refresh() -> Refresh {
        Refresh {
            interval_secs: Self::default_refresh_interval(),
        }
    }

    fn default_refresh_interval() -> u64 {
        60
    }

    fn default_loglevel() -> String {
        "info".to_string()
    }
}
