/// Control API Server implementation
use super::routes::{create_router, AppState};
use anyhow::Result;
use mediabridge_core::MediaBridge;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// HTTP Control API Server
pub struct ControlServer {
    addr: SocketAddr,
    bridge: MediaBridge,
    poll_interval: Duration,
    local_addr: Option<SocketAddr>,
    server_handle: Option<JoinHandle<()>>,
}

impl ControlServer {
    /// Create a new control server
    ///
    /// # Arguments
    /// * `addr` - Address to bind to (e.g., "0.0.0.0:3728"); port 0 picks a free port
    /// * `bridge` - Media bridge answering the requests
    /// * `poll_interval` - Delay between snapshots on the media stream
    pub fn new(addr: SocketAddr, bridge: MediaBridge, poll_interval: Duration) -> Self {
        Self {
            addr,
            bridge,
            poll_interval,
            local_addr: None,
            server_handle: None,
        }
    }

    /// Start the control server
    pub async fn start(&mut self) -> Result<()> {
        info!("Starting Control API server on {}", self.addr);

        let state = AppState {
            bridge: self.bridge.clone(),
            poll_interval: self.poll_interval,
        };

        let app = create_router(state);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        info!("Control API listening on {}", local_addr);

        // Spawn server task
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("Control API server error: {}", e);
            }
        });

        self.local_addr = Some(local_addr);
        self.server_handle = Some(handle);

        Ok(())
    }

    /// Stop the control server
    pub async fn stop(&mut self) {
        if let Some(handle) = self.server_handle.take() {
            info!("Stopping Control API server");
            handle.abort();
        }
        self.local_addr = None;
    }

    /// Whether the server task is still serving
    pub fn is_running(&self) -> bool {
        self.server_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Get the configured address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get the bound address while the server is running
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }
}

impl Drop for ControlServer {
    fn drop(&mut self) {
        if let Some(handle) = self.server_handle.take() {
            handle.abort();
        }
    }
}
