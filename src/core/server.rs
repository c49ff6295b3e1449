use crate::adapters::http::{self, AppState};
use crate::adapters::storage::{InMemoryLineRepository, InMemoryStationRepository};
use crate::config::ServerSettings;
use crate::core::{LineRepository, StationRepository};
use crate::domain::services::{LineService, StationService};
use crate::utils::error::Result;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub struct LineServer {
    settings: ServerSettings,
    state: AppState,
}

impl LineServer {
    pub fn new(
        settings: ServerSettings,
        lines: Arc<dyn LineRepository>,
        stations: Arc<dyn StationRepository>,
    ) -> Self {
        let state = AppState {
            lines: LineService::new(lines, Arc::clone(&stations), settings.pagination),
            stations: StationService::new(stations),
        };
        Self { settings, state }
    }

    /// Server backed by empty in-memory repositories.
    pub fn in_memory(settings: ServerSettings) -> Self {
        Self::new(
            settings,
            Arc::new(InMemoryLineRepository::new()),
            Arc::new(InMemoryStationRepository::new()),
        )
    }

    pub fn router(&self) -> Router {
        http::router(self.state.clone())
    }

    /// Binds the configured address and serves until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.settings.bind).await?;
        self.serve(listener, shutdown).await
    }

    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!("🚇 Line service listening on http://{}", addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("🛑 Line service stopped");
        Ok(())
    }

    /// Binds and serves on a background task.
    pub async fn spawn(self) -> Result<RunningServer> {
        let listener = TcpListener::bind(self.settings.bind).await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(self.serve(listener, async move {
            let _ = shutdown_rx.await;
        }));

        Ok(RunningServer {
            addr,
            shutdown_tx: Some(shutdown_tx),
            handle,
        })
    }
}

/// Handle to a server started with [`LineServer::spawn`].
pub struct RunningServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<()>>,
}

impl RunningServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(crate::utils::error::SubwayError::IoError(std::io::Error::other(e))),
        }
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ephemeral() -> ServerSettings {
        ServerSettings {
            bind: SocketAddr::from(([127, 0, 0, 1], 0)),
            ..ServerSettings::default()
        }
    }

    #[tokio::test]
    async fn test_spawn_binds_ephemeral_port_and_shuts_down() {
        let server = LineServer::in_memory(ephemeral()).spawn().await.unwrap();

        assert_ne!(server.addr().port(), 0);
        assert!(server.base_url().starts_with("http://127.0.0.1:"));
        assert!(server.shutdown().await.is_ok());
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let server = LineServer::in_memory(ephemeral()).spawn().await.unwrap();

        let body: serde_json::Value = reqwest::get(format!("{}/health", server.base_url()))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "UP");

        server.shutdown().await.unwrap();
    }
}
