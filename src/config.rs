use std::{
    net::{IpAddr, Ipv6Addr, SocketAddr},
    path::PathBuf,
};

use clap::Parser;

/// The money manager REST API server.
///
/// Every option can also be set through the environment, including from a
/// `.env` file in the working directory.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// The address to bind to.
    #[arg(long, env = "BIND_ADDRESS", default_value_t = IpAddr::V6(Ipv6Addr::UNSPECIFIED))]
    pub bind: IpAddr,

    /// File path to the SQLite database. Without one the transactions are
    /// kept in memory and lost on exit.
    #[arg(long, env = "DATABASE_PATH")]
    pub db_path: Option<PathBuf>,

    /// Log filter directives, e.g. `info` or `money_manager=debug`.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,
}

impl Config {
    /// Reads `.env` if present, then the command line and environment.
    pub fn load() -> Config {
        dotenvy::dotenv().ok();
        Config::parse()
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((self.bind, self.port))
    }
}
