//! `telephonist serve` -- run the HTTP relay with its idle sweeper.

use std::sync::Arc;
use std::time::Duration;

use telephonist_core::sweep::IdleSweeper;
use telephonist_types::config::TelephonistConfig;

use crate::http::router::build_router;
use crate::state::AppState;

/// Apply CLI overrides, start the sweeper and serve until a shutdown signal.
///
/// On shutdown the listener stops accepting, the sweeper is cancelled, and
/// background translations are drained only when `drain_timeout_secs` is set.
pub async fn serve(
    mut config: TelephonistConfig,
    addr: Option<String>,
    database_url: Option<String>,
    quiet: bool,
) -> anyhow::Result<()> {
    if let Some(addr) = addr {
        config.server.addr = addr;
    }
    if let Some(url) = database_url {
        config.database.url = Some(url);
    }

    let addr = config.server.addr.clone();
    let sweep_every = Duration::from_secs(config.session.sweep_interval_secs.max(1));
    let drain_timeout = config.session.drain_timeout_secs.map(Duration::from_secs);

    let state = AppState::init(config).await?;

    let sweeper = IdleSweeper::new(sweep_every);
    let stop_sweeper = sweeper.cancellation_token();
    let sweeper_task = sweeper.spawn(Arc::clone(&state.engine));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Telephonist listening");
    if !quiet {
        println!(
            "  {} Telephonist listening on {}",
            console::style("☎").bold(),
            console::style(format!("http://{addr}")).cyan()
        );
        println!("  {}", console::style("Press Ctrl+C to stop").dim());
    }

    axum::serve(listener, build_router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    stop_sweeper.cancel();
    if let Err(e) = sweeper_task.await {
        tracing::warn!(error = %e, "Idle sweeper task failed");
    }

    let pending = state.engine.pending_translations();
    match drain_timeout {
        Some(deadline) => {
            state.engine.drain(deadline).await;
        }
        None if pending > 0 => {
            tracing::warn!(pending, "Dropping in-flight translations");
        }
        None => {}
    }

    if !quiet {
        println!("\n  Server stopped.");
    }
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
///
/// If a handler cannot be installed that branch never completes.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
