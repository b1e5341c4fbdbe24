mod resources;
mod server;
mod tools;

pub use resources::*;
pub use server::*;
pub use tools::*;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use rmcp::transport::stdio;
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use rmcp::ServiceExt;
use tracing::{error, info};

use crate::connector::api::Container;

/// Serves MCP over stdin/stdout until the client disconnects.
pub async fn serve_stdio(container: Arc<Container>) -> Result<()> {
    info!("Starting MCP server on stdio");
    let service = SpydrMcpServer::new(container)
        .serve(stdio())
        .await
        .inspect_err(|e| error!("Failed to start MCP server: {}", e))?;

    let reason = service.waiting().await?;
    info!("MCP session ended: {:?}", reason);
    Ok(())
}

/// Serves streamable HTTP at `/mcp` until ctrl-c.
pub async fn serve_http(container: Arc<Container>, port: u16, public: bool) -> Result<()> {
    let ct = tokio_util::sync::CancellationToken::new();

    let service = StreamableHttpService::new(
        move || Ok(SpydrMcpServer::new(container.clone())),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig {
            cancellation_token: ct.child_token(),
            ..Default::default()
        },
    );

    let router = axum::Router::new().nest_service("/mcp", service);

    let host = if public { [0, 0, 0, 0] } else { [127, 0, 0, 1] };
    let addr = SocketAddr::from((host, port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("MCP server listening on http://{}/mcp", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received");
            ct.cancel();
        })
        .await?;

    Ok(())
}
