//! Handles settings for the application. Configuration is written in
//! `config/settings.toml`, may be overridden by `USERS_API__*` environment
//! variables and finally by command line flags.
use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/settings";

#[derive(Debug, Parser)]
#[command(name = "users_api", disable_version_flag = true)]
pub struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    pub config: Option<String>,
    /// Override the bind address (e.g. 0.0.0.0).
    #[arg(long)]
    pub bind: Option<String>,
    /// Override the listening port.
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    /// Base used for `Location` and pagination links, e.g.
    /// `https://users.example.org`. Falls back to the request host.
    pub public_url: Option<String>,
}

impl Server {
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new(args: &Args) -> Result<Self, ConfigError> {
        let path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);

        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.bind", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("USERS_API").separator("__"))
            .set_override_option("server.bind", args.bind.clone())?
            .set_override_option("server.port", args.port.map(i64::from))?
            .build()?;

        settings.try_deserialize()
    }
}
