// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use partsheet_app::Gateway;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn serve(gateway: Arc<dyn Gateway>, listen: SocketAddr) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    // The last gateway handle must drop outside the runtime; the blocking
    // HTTP client cannot be torn down from async context.
    let served = runtime.block_on(serve_until_shutdown(Arc::clone(&gateway), listen));
    drop(gateway);
    served
}

async fn serve_until_shutdown(gateway: Arc<dyn Gateway>, listen: SocketAddr) -> Result<()> {
    let app = partsheet_web::router(gateway)?;
    let listener = TcpListener::bind(listen).await.with_context(|| {
        format!("bind {listen} -- pick a free port with --listen or [server].listen")
    })?;
    info!(address = %listener.local_addr()?, "serving inventory");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve HTTP")?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "cannot listen for ctrl-c; shutting down");
    }
}
