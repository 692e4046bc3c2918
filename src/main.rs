//! webtester binary.
//!
//! Run with:
//!   RUST_LOG=info cargo run -- --port 5117 --text "hello"
//!
//! Try:
//!   curl http://localhost:5117/
//!   curl http://localhost:5117/healthz
//!   curl -i http://localhost:5117/status/418
//!   curl http://localhost:5117/metrics

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use webtester::{Config, Error, Host, Server, metrics, routes};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "webtester exiting");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), Error> {
    let metrics = metrics::create_metrics()?;
    let host = Arc::new(Host::detect(config.text.clone()));
    info!(
        hostname = host.name(),
        version = routes::VERSION,
        inject_footer = config.inject_footer,
        "starting webtester"
    );

    let app = routes::app(host, metrics, config.inject_footer);

    Server::bind(config.listen_addr())
        .await?
        .grace_period(config.grace_period())
        .serve(app)
        .await
}
