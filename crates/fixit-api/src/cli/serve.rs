//! `fixit serve`: run the HTTP + WebSocket server.

use std::future::Future;

use anyhow::Result;
use console::style;
use tokio::net::TcpListener;

use crate::http::router::build_router;
use crate::state::AppState;

/// Bind the configured address and serve until Ctrl+C or SIGTERM.
pub async fn run(state: AppState, quiet: bool) -> Result<()> {
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let listener = TcpListener::bind(&addr).await?;

    if !quiet {
        println!(
            "  {} Fixit chat listening on {}",
            style("⚡").bold(),
            style(format!("http://{addr}")).cyan()
        );
        println!("  {}", style("Press Ctrl+C to stop").dim());
    }
    tracing::info!(%addr, "server started");

    serve(state, listener, shutdown_signal()).await?;

    if !quiet {
        println!("\n  Server stopped.");
    }
    Ok(())
}

/// Serve on `listener` until `signal` resolves.
///
/// On shutdown the state's cancellation token is cancelled so every open
/// channel closes and unregisters itself.
pub async fn serve<F>(state: AppState, listener: TcpListener, signal: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let shutdown = state.shutdown.clone();
    let router = build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            signal.await;
            tracing::info!("shutdown requested, closing chat channels");
            shutdown.cancel();
        })
        .await
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("failed to install SIGTERM handler: {err}");
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

// ---------------------------------------------------------------------------
// End-to-end tests: real server on an ephemeral port
// ---------------------------------------------------------------------------
