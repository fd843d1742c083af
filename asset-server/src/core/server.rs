//! Server Implementation
//!
//! HTTP 服务器启动和优雅关闭

use std::future::{Future, IntoFuture};
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::core::{Config, Result, ServerError, ServerState};

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    /// Bind the configured port and serve until SIGINT/SIGTERM
    pub async fn run(&self) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, environment = %self.config.environment, "Asset server listening");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on `listener` until `signal` resolves, then drain
    ///
    /// In-flight requests get `shutdown_timeout_ms` to finish; anything still
    /// running after that is dropped.
    pub async fn serve<F>(&self, listener: TcpListener, signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        let app = crate::api::build_app(&self.state).with_state(self.state.clone());
        let token = CancellationToken::new();

        let mut server = tokio::spawn(
            axum::serve(listener, app)
                .with_graceful_shutdown(token.clone().cancelled_owned())
                .into_future(),
        );

        tokio::select! {
            // Server stopped on its own (accept loop failure)
            res = &mut server => return flatten(res),
            _ = signal => {}
        }

        tracing::info!("Shutting down, draining in-flight requests...");
        token.cancel();

        let grace = self.config.shutdown_timeout();
        match tokio::time::timeout(grace, &mut server).await {
            Ok(res) => {
                flatten(res)?;
                tracing::info!("Server stopped");
                Ok(())
            }
            Err(_) => {
                tracing::warn!(grace_ms = grace.as_millis() as u64, "Grace period elapsed, aborting remaining connections");
                server.abort();
                Ok(())
            }
        }
    }
}

fn flatten(res: std::result::Result<std::io::Result<()>, tokio::task::JoinError>) -> Result<()> {
    match res {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(ServerError::Io(e)),
        Err(e) => Err(ServerError::Internal(anyhow::anyhow!("server task failed: {e}"))),
    }
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
