//! Dashboard server.
//!
//! Serves the views over HTTP (the dashboard page plus a JSON API) or as
//! JSON lines over stdio for scripting.

pub mod routes;
pub mod stdio;

use crate::config::Config;
use crate::views::{self, DashboardView, ViewContext};

/// ImpactSpark dashboard server.
pub struct DashboardServer {
    /// View execution context.
    ctx: ViewContext,

    /// Registered views.
    views: Vec<Box<dyn DashboardView>>,
}

impl DashboardServer {
    /// Create a new dashboard server.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP clients cannot be initialized.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let ctx = ViewContext::new(config)?;
        let views = views::register_all_views();

        Ok(Self { ctx, views })
    }

    /// Run the server in stdio mode.
    ///
    /// # Errors
    ///
    /// Returns error on I/O failure.
    pub async fn run_stdio(self) -> anyhow::Result<()> {
        tracing::info!("Starting dashboard in stdio mode");
        tracing::info!("Registered {} views", self.views.len());

        std::sync::Arc::clone(&self.ctx.results).start_cleanup_task();
        stdio::run_stdio(self.views, self.ctx).await
    }

    /// Run the server in HTTP mode on the configured host and port.
    ///
    /// # Errors
    ///
    /// Returns error if the address cannot be bound or the server fails.
    pub async fn run_http(self) -> anyhow::Result<()> {
        let host = self.ctx.config.host.clone();
        let port = self.ctx.config.port;
        tracing::info!(host = %host, port, "Starting dashboard in HTTP mode");
        tracing::info!("Registered {} views", self.views.len());

        let router = routes::create_router(self.views, self.ctx);
        let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;

        tracing::info!("Dashboard listening on http://{}", listener.local_addr()?);

        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }

    /// Get view by name.
    #[must_use]
    pub fn get_view(&self, name: &str) -> Option<&dyn DashboardView> {
        self.views.iter().find(|v| v.name() == name).map(|v| v.as_ref())
    }

    /// List all available views.
    #[must_use]
    pub fn list_views(&self) -> Vec<(&str, &str)> {
        self.views.iter().map(|v| (v.name(), v.description())).collect()
    }

    /// Get view context for execution.
    #[must_use]
    pub const fn context(&self) -> &ViewContext {
        &self.ctx
    }
}

impl std::fmt::Debug for DashboardServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardServer").field("views", &self.views.len()).finish()
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received shutdown signal"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    }
}
