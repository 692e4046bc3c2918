//! HTTP server and graceful shutdown.
//!
//! # Lifecycle
//!
//! ```text
//! Starting ──bind ok──▶ Listening ──signal──▶ ShuttingDown ──drained──▶ Stopped
//!    │                                             │
//!    └─bind error: Error::Bind                     └─grace period elapsed: abort,
//!                                                    Error::DrainTimeout
//! ```
//!
//! When Kubernetes terminates a pod it sends **SIGTERM**. The server reacts by:
//! 1. Dropping the listener: no new connections are accepted.
//! 2. Asking every open connection to finish its in-flight request and close.
//!    Idle keep-alive connections close at once.
//! 3. Waiting up to the grace period (5 s by default) for those connections.
//!    Whatever is still running afterwards is aborted and the drain is
//!    reported as failed.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::error::Error;
use crate::router::{Dispatcher, Router};

/// How long in-flight requests get to finish once shutdown starts.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Where the server is in its lifecycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    /// Before the listener is bound. Only the initial value of the channel:
    /// receivers come from [`Server::state`], which needs a bound server, so
    /// they always start at [`State::Listening`] or later.
    Starting,
    Listening,
    ShuttingDown,
    Stopped,
}

/// The HTTP server.
pub struct Server {
    listener: TcpListener,
    addr: SocketAddr,
    grace_period: Duration,
    state: watch::Sender<State>,
}

impl Server {
    /// Binds `addr` and moves to [`State::Listening`].
    ///
    /// A bind failure is returned as [`Error::Bind`]; nothing is retried.
    ///
    /// ```rust,no_run
    /// # async fn run() -> Result<(), webtester::Error> {
    /// use webtester::Server;
    /// let server = Server::bind(([0, 0, 0, 0], 5117).into()).await?;
    /// # Ok(()) }
    /// ```
    pub async fn bind(addr: SocketAddr) -> Result<Self, Error> {
        let (state, _) = watch::channel(State::Starting);
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| Error::Bind { addr, source })?;
        let addr = listener.local_addr()?;

        state.send_replace(State::Listening);
        info!(%addr, "webtester listening");

        Ok(Self { listener, addr, grace_period: DEFAULT_GRACE_PERIOD, state })
    }

    /// The bound address. Useful after binding port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Overrides [`DEFAULT_GRACE_PERIOD`].
    pub fn grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Observes lifecycle transitions from [`State::Listening`] on. The
    /// receiver keeps reporting the last state after the server is gone.
    pub fn state(&self) -> watch::Receiver<State> {
        self.state.subscribe()
    }

    /// Serves `router` until SIGTERM or Ctrl-C, then drains.
    ///
    /// Returns `Ok(())` only after a complete drain.
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        self.serve_with_shutdown(router, shutdown_signal()).await
    }

    /// Serves `router` until `signal` resolves, then drains.
    pub async fn serve_with_shutdown<F>(self, router: Router, signal: F) -> Result<(), Error>
    where
        F: Future<Output = ()>,
    {
        let Server { listener, addr, grace_period, state } = self;
        let dispatcher = Arc::new(router.into_dispatcher());

        // Flipped to `true` once shutdown starts; every connection task holds
        // a receiver.
        let (stop_tx, stop_rx) = watch::channel(false);
        let mut tasks = JoinSet::new();

        tokio::pin!(signal);

        loop {
            tokio::select! {
                // Shutdown is checked first so a signal stops accepting even
                // when more connections are queued.
                biased;

                () = &mut signal => break,

                res = listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };
                    let dispatcher = Arc::clone(&dispatcher);
                    tasks.spawn(serve_connection(stream, remote_addr, dispatcher, stop_rx.clone()));
                }

                // Reap finished connection tasks so the JoinSet does not grow
                // without bound.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        state.send_replace(State::ShuttingDown);
        drop(listener);
        let _ = stop_tx.send(true);
        info!(%addr, in_flight = tasks.len(), ?grace_period, "shutdown signal received, draining connections");

        let drained = tokio::time::timeout(grace_period, async {
            while tasks.join_next().await.is_some() {}
        })
        .await;

        let result = match drained {
            Ok(()) => {
                info!("webtester stopped");
                Ok(())
            }
            Err(_) => {
                let in_flight = tasks.len();
                warn!(in_flight, "grace period elapsed, aborting connections");
                tasks.shutdown().await;
                Err(Error::DrainTimeout { grace: grace_period, in_flight })
            }
        };

        state.send_replace(State::Stopped);
        result
    }
}

/// Serves one connection until the client closes it or shutdown is requested.
async fn serve_connection(
    stream: TcpStream,
    remote_addr: SocketAddr,
    dispatcher: Arc<Dispatcher>,
    mut stop: watch::Receiver<bool>,
) {
    // Called once per request on the connection, not once per connection.
    let svc = service_fn(move |req| {
        let dispatcher = Arc::clone(&dispatcher);
        async move { Ok::<_, Infallible>(dispatcher.dispatch(req).await.into_inner()) }
    });

    // `auto::Builder` handles both HTTP/1.1 and HTTP/2, whatever the client
    // negotiates.
    let builder = ConnBuilder::new(TokioExecutor::new());
    let conn = builder.serve_connection(TokioIo::new(stream), svc);
    tokio::pin!(conn);

    let mut stopping = false;
    loop {
        tokio::select! {
            res = conn.as_mut() => {
                if let Err(e) = res {
                    debug!(peer = %remote_addr, "connection error: {e}");
                }
                break;
            }
            _ = stop.changed(), if !stopping => {
                stopping = true;
                conn.as_mut().graceful_shutdown();
            }
        }
    }
}

/// Resolves on the first shutdown signal the process receives.
///
/// On Unix this listens for both **SIGTERM** and **SIGINT** (Ctrl-C). On
/// Windows only Ctrl-C is available. A handler that cannot be installed is
/// logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received SIGINT"),
        () = sigterm => info!("received SIGTERM"),
    }
}
