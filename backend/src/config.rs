use std::convert::Infallible;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

pub const DEFAULT_PORT: u16 = 5555;
pub const DEFAULT_STORE_URL: &str = "redis://127.0.0.1:6379";

/// Server settings. Every flag can also be supplied through its environment variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "backend", about = "Task tracking REST API")]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Redis URL, or `memory` for a non-persistent in-process store.
    #[arg(long = "store-url", env = "REDIS_URL", default_value = DEFAULT_STORE_URL)]
    pub store: StoreTarget,

    /// Directory of compiled client assets, served for paths no API route matches.
    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<PathBuf>,
}

impl Config {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    Memory,
    Redis(String),
}

impl FromStr for StoreTarget {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("memory") {
            Ok(StoreTarget::Memory)
        } else {
            Ok(StoreTarget::Redis(s.to_owned()))
        }
    }
}

impl fmt::Display for StoreTarget {
    // Only the scheme is shown so credentials embedded in the URL stay out of logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreTarget::Memory => f.write_str("memory"),
            StoreTarget::Redis(url) => {
                let scheme = url.split("://").next().unwrap_or("redis");
                write!(f, "{scheme}://…")
            }
        }
    }
}
