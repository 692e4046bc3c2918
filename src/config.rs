//! Command-line and environment configuration.
//!
//! Every flag can be overridden through the environment, which is how the
//! service is normally configured inside a container:
//!
//! | Flag | Env | Default |
//! |---|---|---|
//! | `--port` | `PORT` | `5117` |
//! | `--text` | `TEXT` | empty |
//! | `--grace-period-secs` | `GRACE_PERIOD_SECS` | `5` |
//! | `--inject-footer` | `INJECT_FOOTER` | off |

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::Parser;

use crate::server::DEFAULT_GRACE_PERIOD;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 5117;

#[derive(Clone, Debug, Parser)]
#[command(name = "webtester", version, about = "Reports host, text, health and synthetic status codes over HTTP")]
pub struct Config {
    /// Port to listen on (all interfaces)
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Free text returned by `/` under the hostname
    #[arg(long, env = "TEXT", default_value = "")]
    pub text: String,

    /// Seconds in-flight requests get to finish on shutdown
    #[arg(long, env = "GRACE_PERIOD_SECS", default_value_t = DEFAULT_GRACE_PERIOD.as_secs())]
    pub grace_period_secs: u64,

    /// Append hostname and text to every response body
    #[arg(long, env = "INJECT_FOOTER")]
    pub inject_footer: bool,
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_secs)
    }
}
