//! Binding, serving, and the startup endpoint listing.

use axum::Router;
use tokio::net::TcpListener;

use crate::GatewayError;
use crate::compiler::CompiledEndpoint;

/// Listen on every interface at `port`.
pub async fn bind(port: u16) -> Result<TcpListener, GatewayError> {
    let addr = format!("0.0.0.0:{port}");
    TcpListener::bind(&addr)
        .await
        .map_err(|e| GatewayError::Bind {
            addr,
            reason: e.to_string(),
        })
}

/// Serve `router` on `listener` until Ctrl+C or SIGTERM.
pub async fn serve(listener: TcpListener, router: Router) -> Result<(), GatewayError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(addr = %addr, "HTTP server listening");
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(wait_for_signal())
        .await
        .map_err(|e| GatewayError::Serve(e.to_string()))
}

/// Bind `0.0.0.0:<port>` and serve `router` there.
pub async fn start(router: Router, port: u16) -> Result<(), GatewayError> {
    let listener = bind(port).await?;
    serve(listener, router).await
}

/// One line per endpoint: behavior, method, and the local URL.
pub fn endpoint_table<'a, I>(endpoints: I, port: u16) -> String
where
    I: IntoIterator<Item = &'a CompiledEndpoint>,
{
    endpoints
        .into_iter()
        .map(|e| {
            let behavior = format!("   {}:  ", e.behavior());
            format!(
                "{behavior:<15}{:<7} http://localhost:{port}{}",
                e.method(),
                e.path()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
