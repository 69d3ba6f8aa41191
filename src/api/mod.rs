//! HTTP service module
//!
//! Exposes the transcribe and save-transcript operations over REST for the
//! web UI, plus a liveness probe.

use anyhow::Result;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::Config;

pub mod handlers;
pub mod models;
pub mod server;

/// API server handling REST requests
#[derive(Debug)]
pub struct ApiServer {
    config: Arc<Config>,
    port: u16,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(config: Arc<Config>, port: u16) -> Self {
        Self { config, port }
    }

    /// Start the API server in the background
    pub fn start_background(self) -> JoinHandle<Result<()>> {
        tokio::spawn(async move { self.start().await })
    }

    /// Start the API server
    pub async fn start(self) -> Result<()> {
        info!("🚀 Starting API server on port {}", self.port);
        server::start_http_server(self.config, self.port).await
    }
}
