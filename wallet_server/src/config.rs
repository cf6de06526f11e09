use std::env;

use log::*;
use wallet_engine::GatewayConfig;

const DEFAULT_GWS_HOST: &str = "127.0.0.1";
const DEFAULT_GWS_PORT: u16 = 8480;
const DEFAULT_GWS_DATABASE_URL: &str = "sqlite://data/wallet_store.db";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Connection settings for the external payment gateway.
    pub gateway: GatewayConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_GWS_HOST.to_string(),
            port: DEFAULT_GWS_PORT,
            database_url: DEFAULT_GWS_DATABASE_URL.to_string(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("GWS_HOST").ok().unwrap_or_else(|| DEFAULT_GWS_HOST.into());
        let port = env::var("GWS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for GWS_PORT. {e} Using the default, {DEFAULT_GWS_PORT}, instead."
                    );
                    DEFAULT_GWS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_GWS_PORT);
        let database_url = env::var("GWS_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ GWS_DATABASE_URL is not set. Using the default, {DEFAULT_GWS_DATABASE_URL}, instead.");
            DEFAULT_GWS_DATABASE_URL.into()
        });
        let gateway = GatewayConfig::from_env_or_default();
        Self { host, port, database_url, gateway }
    }
}
