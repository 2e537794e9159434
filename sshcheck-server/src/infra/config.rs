use std::{
    net::{IpAddr, SocketAddr},
    time::Duration,
};

use anyhow::Context;
use clap::Parser;
use sshcheck_core::registry::DEFAULT_STALENESS;

/// Command line and environment surface of the registry service.
#[derive(Parser, Debug, Clone)]
#[command(name = "sshcheck-server")]
#[command(about = "Credential registry for sshcheck scan loops and dashboards")]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "SSHCHECK_SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind
    #[arg(short, long, env = "SSHCHECK_SERVER_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Age after which `POST /api/clear_creds` drops an entry (e.g. 60s, 2m)
    #[arg(
        long,
        env = "SSHCHECK_STALENESS",
        default_value = "1m",
        value_parser = humantime::parse_duration
    )]
    pub staleness: Duration,

    /// Comma-separated origins allowed by CORS. Any origin when empty.
    #[arg(long, env = "SSHCHECK_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    /// Verbose logging
    #[arg(long, env = "SSHCHECK_DEBUG", default_value_t = false)]
    pub debug: bool,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub staleness: Duration,
    pub cors_allowed_origins: Vec<String>,
    pub debug: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            staleness: DEFAULT_STALENESS,
            cors_allowed_origins: Vec::new(),
            debug: false,
        }
    }
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        let cors_allowed_origins = args
            .cors_origins
            .into_iter()
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Self {
            host: args.host,
            port: args.port,
            staleness: args.staleness,
            cors_allowed_origins,
            debug: args.debug,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("invalid bind host {:?}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
