use clap::Parser;

/// Axpert Panel - terminal control panel for axpert-gateway
#[derive(Debug, Parser)]
#[clap(author, version)]
pub struct Options {
    /// Config file to read
    #[clap(short = 'c', long = "config", default_value = "config.yaml")]
    pub config_file: String,

    /// Gateway URL, overriding the config file
    #[clap(short = 'u', long = "url")]
    pub url: Option<String>,
}

impl Options {
    pub fn new() -> Self {
        Self::parse()
    }
}
