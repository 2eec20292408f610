use std::net::{IpAddr, SocketAddr};

use clap::Parser;

use log::LevelFilter;

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ArgsError {
    #[error("Couldn't parse log level: {0}")]
    LogLevel(String),
}

/// Toy account ledger HTTP server
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LEDGER_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "LEDGER_PORT", default_value_t = 3000)]
    pub port: u16,

    /// One of: off, error, warn, info, debug, trace
    #[arg(long, env = "LEDGER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ArgsError> {
        self.log_level
            .parse()
            .map_err(|_| ArgsError::LogLevel(self.log_level.clone()))
    }
}
